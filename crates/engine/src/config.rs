//! Engine configuration.
//!
//! This module defines the value that parameterizes one engine instance. It provides:
//! 1. **Memory Configurations:** The named address-space layouts and their segment boundaries.
//! 2. **Run Settings:** Word width, pseudo-instruction policy, entry point choice and step limit.
//!
//! A [`SimConfig`] is built once by the caller and moved into the engine; nothing
//! here is process-global. It can also be deserialized from JSON.

use serde::Deserialize;

/// Named memory layouts.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryConfiguration {
    /// Text at `0x00400000`, data at `0x10010000`, full 32-bit space.
    #[default]
    Default,
    /// 32 KiB space with the data segment at address 0.
    CompactDataAtZero,
    /// 32 KiB space with the text segment at address 0.
    CompactTextAtZero,
}

impl MemoryConfiguration {
    /// Every configuration, in presentation order.
    pub const ALL: [Self; 3] = [Self::Default, Self::CompactDataAtZero, Self::CompactTextAtZero];

    /// The identifier accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::CompactDataAtZero => "CompactDataAtZero",
            Self::CompactTextAtZero => "CompactTextAtZero",
        }
    }

    /// Looks up a configuration by its exact identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|config| config.name() == name)
    }

    /// Segment boundaries for this configuration.
    pub const fn layout(self) -> MemoryLayout {
        match self {
            Self::Default => MemoryLayout {
                text_base: 0x0040_0000,
                text_limit: 0x0fff_fffc,
                data_segment_base: 0x1000_0000,
                extern_base: 0x1000_0000,
                global_pointer: 0x1000_8000,
                data_base: 0x1001_0000,
                heap_base: 0x1004_0000,
                stack_pointer: 0x7fff_effc,
                stack_base: 0x7fff_fffc,
                user_high: 0x7fff_ffff,
                kernel_base: 0x8000_0000,
                mmio_base: 0xffff_0000,
                memory_high: 0xffff_ffff,
                data_segment_limit: 0x7fff_ffff,
            },
            Self::CompactDataAtZero => MemoryLayout {
                text_base: 0x3000,
                text_limit: 0x3ffc,
                data_segment_base: 0x0000,
                extern_base: 0x1000,
                global_pointer: 0x1800,
                data_base: 0x0000,
                heap_base: 0x2000,
                stack_pointer: 0x2ffc,
                stack_base: 0x2ffc,
                user_high: 0x3fff,
                kernel_base: 0x4000,
                mmio_base: 0x7f00,
                memory_high: 0x7fff,
                data_segment_limit: 0x2fff,
            },
            Self::CompactTextAtZero => MemoryLayout {
                text_base: 0x0000,
                text_limit: 0x0ffc,
                data_segment_base: 0x1000,
                extern_base: 0x1000,
                global_pointer: 0x1800,
                data_base: 0x2000,
                heap_base: 0x3000,
                stack_pointer: 0x3ffc,
                stack_base: 0x3ffc,
                user_high: 0x3fff,
                kernel_base: 0x4000,
                mmio_base: 0x7f00,
                memory_high: 0x7fff,
                data_segment_limit: 0x3fff,
            },
        }
    }
}

/// Segment boundaries of one memory configuration.
///
/// All limits are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryLayout {
    /// First address of the text segment.
    pub text_base: u32,
    /// Last word address of the text segment.
    pub text_limit: u32,
    /// First address of the data segment (extern area included).
    pub data_segment_base: u32,
    /// First address of the extern (small global) area.
    pub extern_base: u32,
    /// Initial value of `gp`.
    pub global_pointer: u32,
    /// First address used by `.data`.
    pub data_base: u32,
    /// First address of the heap.
    pub heap_base: u32,
    /// Initial value of `sp`.
    pub stack_pointer: u32,
    /// Highest word address of the stack.
    pub stack_base: u32,
    /// Highest user-mode address.
    pub user_high: u32,
    /// First kernel address.
    pub kernel_base: u32,
    /// First memory-mapped I/O address.
    pub mmio_base: u32,
    /// Highest addressable byte.
    pub memory_high: u32,
    /// Last address of the data segment.
    pub data_segment_limit: u32,
}

/// Settings for one engine instance.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    /// Use 64-bit registers and enable the RV64-only instructions.
    pub rv64: bool,
    /// Address-space layout.
    pub memory: MemoryConfiguration,
    /// Accept pseudo-instructions in source.
    pub pseudo_instructions: bool,
    /// Fail assembly when a warning is reported.
    pub warnings_are_errors: bool,
    /// Begin execution at the global `main` label when one exists.
    pub start_at_main: bool,
    /// Allow stores into the text segment and fetches outside it.
    pub self_modifying_code: bool,
    /// Instructions per simulate call; zero or negative means unbounded.
    pub max_steps: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rv64: false,
            memory: MemoryConfiguration::Default,
            pseudo_instructions: true,
            warnings_are_errors: false,
            start_at_main: false,
            self_modifying_code: false,
            max_steps: 0,
        }
    }
}

impl SimConfig {
    /// The step limit, if one applies.
    pub fn step_limit(&self) -> Option<u64> {
        u64::try_from(self.max_steps).ok().filter(|&steps| steps > 0)
    }

    /// Segment boundaries of the selected memory configuration.
    pub const fn layout(&self) -> MemoryLayout {
        self.memory.layout()
    }
}
