//! Branch and jump resolution.
//!
//! Control transfers resolve from the decode stage at the rest level, using
//! the forwarded operand values already attached to the instruction. A taken
//! redirect squashes exactly one instruction: the word sitting in the fetch
//! latch, which was fetched down the fall-through path.
//!
//! Linking forms write `PC + 8` (two instructions ahead of the transfer)
//! into the link register, reflecting the pipeline's two-cycle transfer
//! latency; the result is staged in `rd_value` here and committed by
//! write-back like any other register result.
//!
//! A comparison or indirect target built from an undefined operand cannot be
//! decided; the transfer falls through with a warning rather than steering
//! fetch to an undefined address.

use tracing::{debug, warn};

use crate::common::Value;
use crate::core::pipeline::stage::StageRegister;
use crate::isa::{Mnemonic, OpClass};

/// Return-address offset for linking transfers.
const LINK_OFFSET: u32 = 8;

/// High PC bits preserved by direct jumps.
const JUMP_REGION_MASK: u32 = 0xF000_0000;

/// Resolves a control transfer in the decode stage. Returns the redirect
/// target if the transfer is taken. Idempotent across repeated resolve
/// phases within one cycle.
pub fn resolve(decode: &mut StageRegister) -> Option<u32> {
    if !decode.inst.active() {
        return None;
    }

    let target = match decode.inst.class {
        OpClass::Branch => {
            let taken = compare(&decode.inst)?;
            taken.then(|| decode.pc.wrapping_add(decode.inst.imm as u32))
        }
        OpClass::BranchLink => {
            link(decode);
            Some(decode.pc.wrapping_add(decode.inst.imm as u32))
        }
        OpClass::Jump => {
            link(decode);
            Some((decode.pc & JUMP_REGION_MASK) | (decode.inst.imm as u32 & !JUMP_REGION_MASK))
        }
        // The link is staged only once the target is known; a transfer that
        // falls through must not commit a return address.
        OpClass::JumpReg => match decode.inst.rs_value.bits() {
            Some(bits) => {
                link(decode);
                Some(bits)
            }
            None => {
                warn!(inst = %decode.inst, "indirect jump target undefined; not taken");
                None
            }
        },
        _ => None,
    };

    if let Some(target) = target {
        debug!(inst = %decode.inst, target = %format_args!("{target:#010x}"), "redirect");
    }
    target
}

/// Stages the return address into the link destination.
fn link(decode: &mut StageRegister) {
    decode.inst.rd_value = Value::from_u32(decode.pc.wrapping_add(LINK_OFFSET));
}

/// Evaluates a conditional branch. `None` means an operand was undefined and
/// the branch falls through.
fn compare(inst: &crate::isa::Instruction) -> Option<bool> {
    let (Some(rs), Some(rt)) = (inst.rs_value.known(), inst.rt_value.known()) else {
        warn!(inst = %inst, "branch comparison on undefined operand; not taken");
        return None;
    };
    let taken = match inst.mnemonic {
        Mnemonic::Beq => rs == rt,
        Mnemonic::Bne => rs != rt,
        Mnemonic::Blt => rs < rt,
        Mnemonic::Bge => rs >= rt,
        Mnemonic::Bltu => (rs as u64 & 0xFFFF_FFFF) < (rt as u64 & 0xFFFF_FFFF),
        Mnemonic::Bgeu => (rs as u64 & 0xFFFF_FFFF) >= (rt as u64 & 0xFFFF_FFFF),
        _ => false,
    };
    Some(taken)
}
