//! Operand forwarding into the decode stage.
//!
//! Register operands are resolved while an instruction sits in decode. If an
//! older in-flight instruction will write a source register, its result is
//! taken from the pipeline instead of the (stale) register file. Priority is
//! youngest-producer-first: execute over memory over write-back.
//!
//! Matching uses a three-deep shift register of destination-register numbers,
//! advanced once per cycle, rather than inspecting the stage latches
//! directly: the snapshot is taken on the trigger edge, so forwarding
//! decisions are stable for the whole cycle no matter how often the host
//! re-propagates at the rest level. Only the *values* are re-read at resolve
//! time, which is what lets a load's late-arriving data flow through an
//! already-matched path.

use tracing::trace;

use crate::common::Value;
use crate::core::regfile::RegisterFile;
use crate::isa::{Instruction, Mnemonic, OpClass};

/// Destination registers of the instructions in execute, memory, and
/// write-back, youngest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardSnapshot {
    slots: [u8; 3],
}

impl HazardSnapshot {
    /// Shifts in the destination of the instruction leaving decode.
    pub const fn shift(&mut self, dest: u8) {
        self.slots[2] = self.slots[1];
        self.slots[1] = self.slots[0];
        self.slots[0] = dest;
    }

    /// Destination of the instruction now in execute.
    pub const fn execute(&self) -> u8 {
        self.slots[0]
    }

    /// Destination of the instruction now in memory.
    pub const fn memory(&self) -> u8 {
        self.slots[1]
    }

    /// Destination of the instruction now in write-back.
    pub const fn write_back(&self) -> u8 {
        self.slots[2]
    }
}

/// Which stage a source operand is forwarded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Execute,
    Memory,
    WriteBack,
}

/// Per-cycle forwarding decisions for the decode-stage instruction.
#[derive(Debug, Clone, Default)]
pub struct ForwardingUnit {
    snapshot: HazardSnapshot,
    rs_from: Option<Source>,
    rt_from: Option<Source>,
}

impl ForwardingUnit {
    /// Matches the decode instruction's sources against the in-flight
    /// destinations, then advances the snapshot. Runs once per trigger edge,
    /// after stall handling has settled what actually occupies decode.
    pub fn observe(
        &mut self,
        decode: &Instruction,
        execute: &Instruction,
        memory: &Instruction,
        write_back: &Instruction,
    ) {
        let snapshot = self.snapshot;
        let pick = |reg: u8| -> Option<Source> {
            if reg == 0 {
                return None;
            }
            if snapshot.execute() == reg && execute.active() {
                Some(Source::Execute)
            } else if snapshot.memory() == reg && memory.active() {
                Some(Source::Memory)
            } else if snapshot.write_back() == reg && write_back.active() {
                Some(Source::WriteBack)
            } else {
                None
            }
        };

        if decode.active() {
            self.rs_from = decode.reads_rs().then(|| pick(decode.rs)).flatten();
            self.rt_from = decode.reads_rt().then(|| pick(decode.rt)).flatten();
        } else {
            self.rs_from = None;
            self.rt_from = None;
        }

        self.snapshot.shift(decode.gpr_dest());
    }

    /// Fills the decode instruction's operand values. Idempotent; runs on
    /// every resolve, after any memory-stage load has completed.
    pub fn resolve(
        &self,
        decode: &mut Instruction,
        execute: &Instruction,
        memory: &Instruction,
        write_back: &Instruction,
        regs: &RegisterFile,
    ) {
        if !decode.active() {
            return;
        }

        if decode.mnemonic == Mnemonic::Mfc0 {
            decode.rd_value = RegisterFile::control_cell(decode.rd).map_or_else(
                || {
                    trace!(selector = decode.rd, "mfc0 of unknown control register");
                    Value::Undefined
                },
                |cell| regs.cell(cell),
            );
            return;
        }

        let fetch = |from: Option<Source>, reg: u8| -> Value {
            match from {
                Some(Source::Execute) => execute.forward_value(),
                Some(Source::Memory) => memory.forward_value(),
                Some(Source::WriteBack) => write_back.forward_value(),
                None => regs.read(reg),
            }
        };

        decode.rs_value = fetch(self.rs_from, decode.rs);
        decode.rt_value = if decode.class == OpClass::RegImm {
            Value::Known(i64::from(decode.imm))
        } else {
            fetch(self.rt_from, decode.rt)
        };
        if decode.class != OpClass::Cop0Move {
            decode.rd_value = regs.read(decode.rd);
        }

        if self.rs_from.is_some() || self.rt_from.is_some() {
            trace!(
                inst = %decode,
                rs_from = ?self.rs_from,
                rt_from = ?self.rt_from,
                "forwarded operands"
            );
        }
    }
}
