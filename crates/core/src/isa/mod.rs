//! Instruction set definition: field layout, decoded records, and the
//! decoder itself.

pub mod decode;
pub mod instruction;
pub mod opcodes;

pub use decode::decode;
pub use instruction::{Instruction, Mnemonic, OpClass};
