//! The decoded instruction record carried through the pipeline.
//!
//! An [`Instruction`] is both the static decode of a fetched word and the
//! vessel for the dynamic operand values attached to it as it moves through
//! the stages. Forwarding rewrites `rs_value`/`rt_value` while the
//! instruction sits in decode; execute fills `rd_value`; a load's completed
//! data lands in `rt_value` in the memory stage.
//!
//! Register field conventions follow the encoding, with one twist: for
//! immediate forms, loads, and upper-immediate forms the destination field is
//! mirrored into both `rd` and `rt`, so hazard tracking can treat `rt` as the
//! destination of those classes uniformly. Shift-by-register places the
//! shift amount in `rs` and the shiftee in `rt`.

use std::fmt;

use crate::common::Value;

/// Coarse instruction class, selecting hazard, forwarding, and write-back
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Register-register ALU operation; writes `rd`.
    RegReg,
    /// Register-immediate ALU operation; writes `rt` (aliased to `rd`).
    RegImm,
    /// Shift by immediate amount; shiftee in `rt`, writes `rd`.
    ShiftImm,
    /// Shift by register amount; amount in `rs`, shiftee in `rt`, writes `rd`.
    ShiftReg,
    /// Memory load; base in `rs`, destination in `rt`.
    Load,
    /// Memory store; base in `rs`, data in `rt`, no destination.
    Store,
    /// Conditional branch; compares `rs` and `rt`, no destination.
    Branch,
    /// Unconditional branch that links into `x1`.
    BranchLink,
    /// PC-relative or absolute jump that links into `rd`.
    Jump,
    /// Register-indirect jump that links into `rd`.
    JumpReg,
    /// Upper-immediate forms (`lui`, `auipc`); write `rt` (aliased to `rd`).
    LoadUpper,
    /// Moves between the general file and control registers.
    Cop0Move,
    /// `nop`, `syscall`, `break`, `eret`.
    System,
    /// Unrecognized word; architecturally inert.
    Invalid,
    /// The instruction port carried an undefined wire state; no word was
    /// fetched at all. Architecturally inert, but distinguishable from a
    /// fetched word that failed to decode.
    Undefined,
}

/// Exact operation within an [`OpClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Mnemonic {
    Add,
    Sub,
    Mul,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
    And,
    Or,
    Xor,
    Addi,
    Slti,
    Sltiu,
    Andi,
    Ori,
    Xori,
    Slli,
    Srli,
    Srai,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Bal,
    Jal,
    Jalr,
    Lui,
    Auipc,
    Mfc0,
    Mtc0,
    Syscall,
    Break,
    Eret,
    Nop,
    Invalid,
}

/// A decoded instruction plus its in-flight operand values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The fetched word, kept for history and diagnostics.
    pub raw: u32,
    /// Coarse class.
    pub class: OpClass,
    /// Exact operation.
    pub mnemonic: Mnemonic,
    /// First source register.
    pub rs: u8,
    /// Second source register (or destination for immediate-form classes).
    pub rt: u8,
    /// Destination register.
    pub rd: u8,
    /// Decoded immediate, already shifted/extended to its final signed form.
    pub imm: i32,
    /// Value read or forwarded for `rs`.
    pub rs_value: Value,
    /// Value read or forwarded for `rt`; result slot for immediate-form
    /// classes and completed loads.
    pub rt_value: Value,
    /// Result slot for register-destination classes.
    pub rd_value: Value,
    /// Whether the word decoded to a recognized operation.
    pub valid: bool,
    /// Squashed by a redirect; carried through the stages as a no-op but the
    /// flag itself is never dropped.
    pub flush: bool,
}

impl Instruction {
    /// A pipeline bubble: a valid `nop` that reads and writes nothing.
    pub const fn bubble() -> Self {
        Self {
            raw: crate::isa::opcodes::WORD_NOP,
            class: OpClass::System,
            mnemonic: Mnemonic::Nop,
            rs: 0,
            rt: 0,
            rd: 0,
            imm: 0,
            rs_value: Value::ZERO,
            rt_value: Value::ZERO,
            rd_value: Value::ZERO,
            valid: true,
            flush: false,
        }
    }

    /// An inert record for a word that failed to decode (or was undefined on
    /// the instruction port).
    pub const fn invalid(raw: u32) -> Self {
        Self {
            raw,
            class: OpClass::Invalid,
            mnemonic: Mnemonic::Invalid,
            rs: 0,
            rt: 0,
            rd: 0,
            imm: 0,
            rs_value: Value::ZERO,
            rt_value: Value::ZERO,
            rd_value: Value::ZERO,
            valid: false,
            flush: false,
        }
    }

    /// The record entered into fetch when the instruction port is undefined.
    pub const fn undefined() -> Self {
        let mut inst = Self::invalid(0);
        inst.class = OpClass::Undefined;
        inst
    }

    /// Whether this instruction does architectural work this cycle.
    #[inline]
    pub const fn active(&self) -> bool {
        self.valid && !self.flush
    }

    /// Whether this is a memory load.
    #[inline]
    pub const fn is_load(&self) -> bool {
        matches!(self.class, OpClass::Load)
    }

    /// Whether this is a memory store.
    #[inline]
    pub const fn is_store(&self) -> bool {
        matches!(self.class, OpClass::Store)
    }

    /// Whether this instruction can redirect the PC from the decode stage.
    #[inline]
    pub const fn is_control_transfer(&self) -> bool {
        matches!(
            self.class,
            OpClass::Branch | OpClass::BranchLink | OpClass::Jump | OpClass::JumpReg
        )
    }

    /// The general register written at retirement, `0` if none.
    pub const fn gpr_dest(&self) -> u8 {
        match self.class {
            OpClass::RegReg
            | OpClass::ShiftReg
            | OpClass::ShiftImm
            | OpClass::Jump
            | OpClass::JumpReg
            | OpClass::BranchLink => self.rd,
            OpClass::RegImm | OpClass::Load | OpClass::LoadUpper => self.rt,
            OpClass::Cop0Move => match self.mnemonic {
                Mnemonic::Mfc0 => self.rt,
                _ => 0,
            },
            OpClass::Store
            | OpClass::Branch
            | OpClass::System
            | OpClass::Invalid
            | OpClass::Undefined => 0,
        }
    }

    /// Whether the `rs` operand is architecturally read.
    pub const fn reads_rs(&self) -> bool {
        matches!(
            self.class,
            OpClass::RegReg
                | OpClass::RegImm
                | OpClass::ShiftReg
                | OpClass::Load
                | OpClass::Store
                | OpClass::Branch
                | OpClass::JumpReg
        )
    }

    /// Whether the `rt` operand is architecturally read.
    pub const fn reads_rt(&self) -> bool {
        match self.class {
            OpClass::RegReg | OpClass::ShiftReg | OpClass::ShiftImm | OpClass::Store
            | OpClass::Branch => true,
            OpClass::Cop0Move => matches!(self.mnemonic, Mnemonic::Mtc0),
            _ => false,
        }
    }

    /// Whether this instruction reads `reg` through either source port.
    pub const fn uses(&self, reg: u8) -> bool {
        if reg == 0 {
            return false;
        }
        (self.reads_rs() && self.rs == reg) || (self.reads_rt() && self.rt == reg)
    }

    /// The value a younger instruction should receive when forwarding from
    /// this one: completed load data for loads, the ALU result otherwise.
    #[inline]
    pub const fn forward_value(&self) -> Value {
        if self.is_load() {
            self.rt_value
        } else {
            self.rd_value
        }
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::bubble()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return if matches!(self.class, OpClass::Undefined) {
                write!(f, "<undefined>")
            } else {
                write!(f, "<invalid {:#010x}>", self.raw)
            };
        }
        let tag = if self.flush { "~" } else { "" };
        write!(
            f,
            "{tag}{:?} rd=x{} rs=x{} rt=x{} imm={:#x}",
            self.mnemonic, self.rd, self.rs, self.rt, self.imm
        )
    }
}
