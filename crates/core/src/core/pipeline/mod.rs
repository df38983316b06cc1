//! The five-stage pipeline and its per-phase sequencing.
//!
//! Stage order is fetch, decode, execute, memory, write-back. On each
//! trigger edge the latches shift back-to-front, so every stage consumes
//! what the stage ahead of it produced *last* cycle. The decode stage is the
//! nerve center: operands are forwarded there, control transfers resolve
//! there, and load-use stalls hold instructions there.

pub mod branch;
pub mod exception;
pub mod execute;
pub mod forward;
pub mod hazard;
pub mod memory;
pub mod stage;
pub mod writeback;

use tracing::{debug, trace, warn};

use crate::common::{Bit, CoreError, Value};
use crate::core::regfile::RegisterFile;
use crate::isa::{self, Instruction};
use self::forward::ForwardingUnit;
use self::hazard::HazardUnit;
use self::memory::BusDrive;
use self::stage::StageRegister;
use self::writeback::RetireLog;

/// The pipeline latches and the combinational units hanging off them.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Most recently fetched instruction.
    pub fetch: StageRegister,
    /// Instruction having operands resolved.
    pub decode: StageRegister,
    /// Instruction in the ALU.
    pub execute: StageRegister,
    /// Instruction on the data bus.
    pub memory: StageRegister,
    /// Instruction retiring.
    pub write_back: StageRegister,
    hazard: HazardUnit,
    forward: ForwardingUnit,
}

impl Pipeline {
    /// Runs one trigger edge: shift, stall bookkeeping, fetch, execute, bus
    /// drive, and interrupt entry. `pc` is the externally visible fetch
    /// address and may be redirected here by `eret` or an interrupt.
    pub fn advance(
        &mut self,
        op: Value,
        irq: Bit,
        regs: &mut RegisterFile,
        pc: &mut u32,
    ) -> BusDrive {
        let fetched = op.bits().map_or_else(
            || {
                warn!("instruction port undefined; inert record enters fetch");
                Instruction::undefined()
            },
            |word| {
                let inst = isa::decode(word);
                if !inst.valid {
                    debug!(word = %format_args!("{word:#010x}"), "unrecognized instruction word");
                }
                inst
            },
        );

        self.write_back = std::mem::replace(
            &mut self.memory,
            std::mem::replace(
                &mut self.execute,
                std::mem::replace(&mut self.decode, self.fetch.clone()),
            ),
        );

        self.hazard.restore(&mut self.decode);
        let stalled = self.hazard.step(&mut self.decode, &self.execute, &self.memory);
        self.forward.observe(
            &self.decode.inst,
            &self.execute.inst,
            &self.memory.inst,
            &self.write_back.inst,
        );

        // A stalled cycle holds the fetch address; the host re-presents the
        // same word next edge and nothing is lost.
        self.fetch.inst = fetched;
        self.fetch.pc = *pc;
        if !stalled {
            *pc = pc.wrapping_add(4);
        }

        if let Some(target) = execute::step(&mut self.execute, regs) {
            *pc = target;
            self.fetch.inst.flush = true;
            self.decode.inst.flush = true;
            self.hazard.squash_pending();
        }

        let bus = memory::drive(&self.memory, regs);

        let transfer_pending = (self.decode.inst.active()
            && self.decode.inst.is_control_transfer())
            || self.hazard.pending_transfer();
        let _ = exception::step(regs, irq, &mut self.fetch, transfer_pending, pc);

        trace!(
            fetch = %self.fetch,
            decode = %self.decode,
            execute = %self.execute,
            memory = %self.memory,
            write_back = %self.write_back,
            stalled,
            "edge"
        );
        bus
    }

    /// Runs one commit edge: retire the write-back stage.
    ///
    /// # Errors
    ///
    /// Propagates register-file failures from retirement.
    pub fn commit(&mut self, regs: &mut RegisterFile, log: &mut RetireLog) -> Result<(), CoreError> {
        writeback::commit(&self.write_back, regs, log)
    }

    /// Runs the rest-level phase: load completion, operand forwarding, and
    /// control-transfer resolution. Idempotent within a cycle; `pc` may be
    /// redirected by a taken transfer.
    pub fn resolve(&mut self, din: Value, regs: &RegisterFile, pc: &mut u32) {
        memory::complete(&mut self.memory, &self.write_back, din);
        self.forward.resolve(
            &mut self.decode.inst,
            &self.execute.inst,
            &self.memory.inst,
            &self.write_back.inst,
            regs,
        );
        if let Some(target) = branch::resolve(&mut self.decode) {
            *pc = target;
            self.fetch.inst.flush = true;
        }
    }

    /// Whether the current cycle took a load-use stall.
    pub const fn stalled(&self) -> bool {
        self.hazard.stalled()
    }
}
