//! Engine-wide constants.

/// Size of a memory word in bytes.
pub const WORD_LENGTH_BYTES: u32 = 4;

/// Size of an encoded instruction in bytes.
pub const INSTRUCTION_LENGTH_BYTES: u32 = 4;

/// File extensions (compared case-insensitively) treated as assembly sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["asm", "s"];

/// Number of integer registers.
pub const GPR_COUNT: usize = 32;

/// Number of floating-point registers.
pub const FPR_COUNT: usize = 32;

/// Returns true if `path` carries one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}
