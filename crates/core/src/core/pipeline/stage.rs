//! Pipeline stage registers.

use std::fmt;

use crate::isa::Instruction;

/// PC value marking a stage that has never held a real instruction.
pub const RESET_PC: u32 = 0xFFFF_FFFC;

/// One pipeline latch: the instruction occupying a stage and the address it
/// was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRegister {
    /// The occupying instruction.
    pub inst: Instruction,
    /// Fetch address of `inst`.
    pub pc: u32,
}

impl Default for StageRegister {
    fn default() -> Self {
        Self {
            inst: Instruction::bubble(),
            pc: RESET_PC,
        }
    }
}

impl fmt::Display for StageRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}: {}", self.pc, self.inst)
    }
}
