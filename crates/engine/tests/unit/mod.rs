//! # Unit Components
//!
//! Tests for the engine building blocks, from literal parsing up to whole
//! programs assembled and simulated through the [`Engine`](rars_engine::Engine) trait.

/// Assembler tests: labels, directives, pseudo-instructions and diagnostics.
pub mod assembler;


/// Sparse memory tests: alignment, ranges, byte merging and first-null search.
pub mod memory;

/// Integer literal parsing tests.
pub mod numbers;

/// Program setup tests: entry point, stack pointer and program arguments.
pub mod program;
