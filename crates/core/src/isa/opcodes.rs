//! Instruction word field layout and opcode constants.
//!
//! The encoding is the standard 32-bit base layout: a 7-bit major opcode in
//! the low bits, 5-bit register fields, and a 3-bit minor opcode (`funct3`)
//! selecting within a major group. Register-register instructions carry a
//! second minor field (`funct7`).

/// Major opcode mask (bits `[6:0]`).
pub const OPCODE_MASK: u32 = 0x7F;

/// Register-register ALU operations.
pub const OP_REG: u32 = 0x33;
/// Register-immediate ALU operations and immediate shifts.
pub const OP_IMM: u32 = 0x13;
/// Memory loads.
pub const OP_LOAD: u32 = 0x03;
/// Memory stores.
pub const OP_STORE: u32 = 0x23;
/// Conditional branches (plus branch-and-link, see [`F3_BAL`]).
pub const OP_BRANCH: u32 = 0x63;
/// Load upper immediate.
pub const OP_LUI: u32 = 0x37;
/// Add upper immediate to PC.
pub const OP_AUIPC: u32 = 0x17;
/// Jump and link.
pub const OP_JAL: u32 = 0x6F;
/// Jump and link register.
pub const OP_JALR: u32 = 0x67;
/// Coprocessor-zero moves.
pub const OP_SYSTEM: u32 = 0x73;

/// Canonical no-operation (`addi x0, x0, 0`).
pub const WORD_NOP: u32 = 0x0000_0013;
/// System call.
pub const WORD_SYSCALL: u32 = 0x0000_0006;
/// Breakpoint.
pub const WORD_BREAK: u32 = 0x0000_0007;
/// Return from exception.
pub const WORD_ERET: u32 = 0x2200_0006;

/// `add`/`sub`/`mul` selector within [`OP_REG`]; `addi` within [`OP_IMM`].
pub const F3_ADD_SUB: u32 = 0x0;
/// Shift left logical.
pub const F3_SLL: u32 = 0x1;
/// Set if less than, signed.
pub const F3_SLT: u32 = 0x2;
/// Set if less than, unsigned.
pub const F3_SLTU: u32 = 0x3;
/// Bitwise exclusive or.
pub const F3_XOR: u32 = 0x4;
/// Shift right, logical or arithmetic per `funct7`.
pub const F3_SRL_SRA: u32 = 0x5;
/// Bitwise or.
pub const F3_OR: u32 = 0x6;
/// Bitwise and.
pub const F3_AND: u32 = 0x7;

/// Load byte, sign-extended.
pub const F3_LB: u32 = 0x0;
/// Load halfword, sign-extended.
pub const F3_LH: u32 = 0x1;
/// Load word.
pub const F3_LW: u32 = 0x2;
/// Load byte, zero-extended.
pub const F3_LBU: u32 = 0x4;
/// Load halfword, zero-extended.
pub const F3_LHU: u32 = 0x5;

/// Store byte.
pub const F3_SB: u32 = 0x0;
/// Store halfword.
pub const F3_SH: u32 = 0x1;
/// Store word.
pub const F3_SW: u32 = 0x2;

/// Branch if equal.
pub const F3_BEQ: u32 = 0x0;
/// Branch if not equal.
pub const F3_BNE: u32 = 0x1;
/// Unconditional branch-and-link into `x1`.
pub const F3_BAL: u32 = 0x2;
/// Branch if less than, signed.
pub const F3_BLT: u32 = 0x4;
/// Branch if greater or equal, signed.
pub const F3_BGE: u32 = 0x5;
/// Branch if less than, unsigned.
pub const F3_BLTU: u32 = 0x6;
/// Branch if greater or equal, unsigned.
pub const F3_BGEU: u32 = 0x7;

/// Move a general register into a control register.
pub const F3_MTC0: u32 = 0x1;
/// Move a control register into a general register.
pub const F3_MFC0: u32 = 0x2;

/// Base variant under [`OP_REG`].
pub const F7_BASE: u32 = 0x00;
/// Selects `sub` under [`F3_ADD_SUB`] and `sra` under [`F3_SRL_SRA`].
pub const F7_ALT: u32 = 0x20;
/// Selects `mul` under [`F3_ADD_SUB`].
pub const F7_MUL: u32 = 0x01;

/// Extracts the major opcode.
#[inline]
pub const fn opcode(word: u32) -> u32 {
    word & OPCODE_MASK
}

/// Extracts the destination register field (bits `[11:7]`).
#[inline]
pub const fn rd(word: u32) -> u8 {
    ((word >> 7) & 0x1F) as u8
}

/// Extracts the minor opcode (bits `[14:12]`).
#[inline]
pub const fn funct3(word: u32) -> u32 {
    (word >> 12) & 0x7
}

/// Extracts the first source register field (bits `[19:15]`).
#[inline]
pub const fn rs1(word: u32) -> u8 {
    ((word >> 15) & 0x1F) as u8
}

/// Extracts the second source register field (bits `[24:20]`).
#[inline]
pub const fn rs2(word: u32) -> u8 {
    ((word >> 20) & 0x1F) as u8
}

/// Extracts the second minor opcode (bits `[31:25]`).
#[inline]
pub const fn funct7(word: u32) -> u32 {
    (word >> 25) & 0x7F
}
