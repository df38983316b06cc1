//! Load-use hazard detection and stall replay.
//!
//! A load's data is not available until the end of its memory-stage cycle,
//! so a dependent instruction entering decode while the load sits in execute
//! (or in memory, one cycle later) cannot be forwarded to yet. The hazard
//! unit holds such an instruction back: it saves the decode latch, injects a
//! bubble in its place, and re-injects the saved instruction on the next
//! advance. The fetch address holds while a stall is pending, so the host
//! refetches the same word and no instruction is lost.
//!
//! An instruction adjacent to the load it depends on stalls exactly once:
//! during its replay cycle the load has reached the memory stage and its
//! completed data is forwarded from there, so re-stalling on the
//! memory-stage match would add a second dead cycle for nothing. The
//! `replaying` flag suppresses that match.

use tracing::debug;

use crate::core::pipeline::stage::StageRegister;
use crate::isa::Instruction;

/// Detects load-use hazards and replays stalled instructions.
#[derive(Debug, Clone, Default)]
pub struct HazardUnit {
    saved: Option<StageRegister>,
    replaying: bool,
    stalled: bool,
}

impl HazardUnit {
    /// Whether the current cycle is stalled. Valid after [`Self::step`].
    pub const fn stalled(&self) -> bool {
        self.stalled
    }

    /// Re-injects a previously saved instruction into the decode latch.
    ///
    /// Must run directly after the stage shift, before hazard evaluation, so
    /// the replayed instruction is the one examined for further stalls and
    /// forwarding.
    pub fn restore(&mut self, decode: &mut StageRegister) {
        if let Some(saved) = self.saved.take() {
            debug!(%saved, "replaying stalled instruction");
            *decode = saved;
            self.replaying = true;
        } else {
            self.replaying = false;
        }
    }

    /// Evaluates the hazard condition and, when it holds, parks the decode
    /// instruction and injects a bubble. Returns whether a stall was taken.
    pub fn step(
        &mut self,
        decode: &mut StageRegister,
        execute: &StageRegister,
        memory: &StageRegister,
    ) -> bool {
        let ex_match = Self::load_feeds(&execute.inst, &decode.inst);
        let mem_match = !self.replaying && Self::load_feeds(&memory.inst, &decode.inst);
        self.stalled = ex_match || mem_match;

        if self.stalled {
            debug!(
                inst = %decode.inst,
                from_execute = ex_match,
                "load-use stall"
            );
            self.saved = Some(decode.clone());
            decode.inst = Instruction::bubble();
        }
        self.stalled
    }

    /// Whether a control transfer is parked awaiting replay. Interrupt entry
    /// must wait for it: the replayed transfer can still redirect the PC,
    /// and an EPC captured before that would point into the abandoned path.
    pub fn pending_transfer(&self) -> bool {
        self.saved
            .as_ref()
            .is_some_and(|saved| saved.inst.active() && saved.inst.is_control_transfer())
    }

    /// Squashes a parked instruction. Used when an older redirect (`eret`)
    /// invalidates work younger than itself, including work waiting out a
    /// stall.
    pub fn squash_pending(&mut self) {
        if let Some(saved) = &mut self.saved {
            saved.inst.flush = true;
        }
    }

    /// Whether `producer` is a live load whose destination `consumer` reads.
    fn load_feeds(producer: &Instruction, consumer: &Instruction) -> bool {
        producer.is_load() && producer.active() && consumer.uses(producer.gpr_dest())
    }
}
