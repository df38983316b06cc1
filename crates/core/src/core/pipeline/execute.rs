//! The execute stage.
//!
//! Computes ALU results for the instruction entering execute on each trigger
//! edge. Operands were already resolved (forwarded or register-read) while
//! the instruction sat in decode; the result lands in `rd_value`, from where
//! younger instructions forward it and write-back commits it.
//!
//! All arithmetic is 32-bit architectural arithmetic carried sign-extended
//! in 64 bits: wrapping add/sub/multiply, shifts masked to five bits, and
//! unsigned comparisons on the low 32 bits.
//!
//! `eret` also resolves here, returning the restored PC so the sequencer can
//! steer fetch and flush the two younger stages.

use tracing::{debug, warn};

use crate::common::Value;
use crate::core::pipeline::stage::StageRegister;
use crate::core::regfile::{EPC, RegisterFile};
use crate::isa::{Mnemonic, OpClass};

/// Masks a shift amount to the architectural five bits.
const fn shamt(amount: i64) -> u32 {
    (amount as u32) & 0x1F
}

/// Low-32-bit unsigned view of a sign-extended value.
const fn unsigned(v: i64) -> u64 {
    (v as u64) & 0xFFFF_FFFF
}

/// Runs the execute stage for one trigger edge. Returns the restored PC when
/// the instruction is `eret`.
pub fn step(execute: &mut StageRegister, regs: &RegisterFile) -> Option<u32> {
    let inst = &mut execute.inst;
    if !inst.active() {
        return None;
    }

    if inst.mnemonic == Mnemonic::Eret {
        return match regs.cell_bits(EPC) {
            Some(target) => {
                debug!(target = %format_args!("{target:#010x}"), "eret");
                Some(target)
            }
            None => {
                warn!("eret with undefined EPC; no redirect");
                None
            }
        };
    }

    let rs = inst.rs_value;
    let rt = inst.rt_value;

    let result = match inst.mnemonic {
        Mnemonic::Add | Mnemonic::Addi => rs.zip(rt, i64::wrapping_add),
        Mnemonic::Sub => rs.zip(rt, i64::wrapping_sub),
        Mnemonic::Mul => rs.zip(rt, |a, b| i64::from((a as i32).wrapping_mul(b as i32))),
        Mnemonic::And | Mnemonic::Andi => rs.zip(rt, |a, b| a & b),
        Mnemonic::Or | Mnemonic::Ori => rs.zip(rt, |a, b| a | b),
        Mnemonic::Xor | Mnemonic::Xori => rs.zip(rt, |a, b| a ^ b),
        Mnemonic::Slt | Mnemonic::Slti => rs.zip(rt, |a, b| i64::from(a < b)),
        Mnemonic::Sltu | Mnemonic::Sltiu => {
            rs.zip(rt, |a, b| i64::from(unsigned(a) < unsigned(b)))
        }
        // Shift amount in rs (register forms) or the immediate; shiftee in rt.
        Mnemonic::Sll => rt.zip(rs, |v, sh| i64::from(((v as u32) << shamt(sh)) as i32)),
        Mnemonic::Srl => rt.zip(rs, |v, sh| i64::from(((v as u32) >> shamt(sh)) as i32)),
        Mnemonic::Sra => rt.zip(rs, |v, sh| i64::from((v as i32) >> shamt(sh))),
        Mnemonic::Slli => rt.map(|v| i64::from(((v as u32) << (inst.imm as u32 & 0x1F)) as i32)),
        Mnemonic::Srli => rt.map(|v| i64::from(((v as u32) >> (inst.imm as u32 & 0x1F)) as i32)),
        Mnemonic::Srai => rt.map(|v| i64::from((v as i32) >> (inst.imm as u32 & 0x1F))),
        Mnemonic::Lui => Value::Known(i64::from(inst.imm)),
        Mnemonic::Auipc => Value::Known(i64::from((execute.pc as i32).wrapping_add(inst.imm))),
        Mnemonic::Syscall | Mnemonic::Break => {
            debug!(pc = %format_args!("{:#010x}", execute.pc), op = ?inst.mnemonic, "trap instruction reached execute");
            return None;
        }
        // Loads, stores, transfers, and coprocessor moves do no ALU work here.
        _ => return None,
    };

    if result.is_undefined() && matches!(inst.class, OpClass::RegReg | OpClass::ShiftReg) {
        warn!(inst = %inst, "ALU operand undefined; result undefined");
    }
    inst.rd_value = result;
    None
}
