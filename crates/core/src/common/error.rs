//! Fatal core errors.
//!
//! Almost everything a running program can do wrong (unknown opcodes,
//! misaligned addresses, undefined operands) degrades gracefully inside the
//! pipeline and is reported through tracing. [`CoreError`] is reserved for
//! conditions that indicate a broken host integration or configuration and
//! from which the model cannot meaningfully continue.

use thiserror::Error;

/// A fatal error surfaced to the host simulator.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A register index escaped the architectural file.
    #[error("register index {index} out of range (file holds {limit} cells)")]
    RegisterIndexOutOfRange {
        /// The offending index.
        index: u8,
        /// Number of cells in the file.
        limit: usize,
    },

    /// The configured retirement buffer length is outside the supported range.
    #[error("invalid retirement buffer length {0} (expected 1..=256)")]
    InvalidBufferLength(usize),

    /// A configuration document failed to parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
