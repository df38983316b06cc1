//! Interrupt entry and the Status/Cause bookkeeping around it.
//!
//! A simplified, non-nested model: one external level-sensitive request
//! line, one fixed handler address. Taking an interrupt captures the
//! fetch-stage PC (the oldest instruction that has not yet entered the
//! pipeline's architectural work) into EPC, clears the interrupt-enable bit,
//! and steers fetch to the handler while flushing the word already fetched
//! down the old path. Handler software must re-arm the enable bit itself;
//! `eret` only restores the PC.
//!
//! Entry is deferred while a control transfer is still unresolved, whether
//! it occupies decode or sits parked behind a load-use stall: redirect and
//! interrupt entry both steer the PC, and letting the older transfer finish
//! first keeps EPC pointing at a real resume address.

use tracing::{debug, trace, warn};

use crate::common::Bit;
use crate::core::pipeline::stage::StageRegister;
use crate::core::regfile::{CAUSE, EPC, RegisterFile, STATUS};

/// Fixed handler entry point.
pub const HANDLER_BASE: u32 = 0x0080_0000;

/// Status: interrupt-enable bit.
pub const STATUS_IE: u32 = 1 << 0;
/// Status: user-mode bit, pinned high every cycle in this model.
pub const STATUS_USER: u32 = 1 << 4;
/// Cause: hardware interrupt pending bit, mirroring the request line.
pub const CAUSE_IP_HW: u32 = 1 << 10;
/// Cause: exception-code field, bits `[6:2]`. Code 0 is "interrupt".
pub const CAUSE_EXC_MASK: u32 = 0x7C;

/// Runs the per-edge interrupt logic. Returns whether an interrupt was
/// taken this cycle.
pub fn step(
    regs: &mut RegisterFile,
    irq: Bit,
    fetch: &mut StageRegister,
    transfer_pending: bool,
    pc_out: &mut u32,
) -> bool {
    regs.or_cell(STATUS, STATUS_USER);

    match irq {
        Bit::One => {
            regs.or_cell(CAUSE, CAUSE_IP_HW);
            regs.clear_cell(CAUSE, CAUSE_EXC_MASK);
        }
        Bit::Zero => regs.clear_cell(CAUSE, CAUSE_IP_HW),
        Bit::Undefined => warn!("interrupt request line undefined; treated as deasserted"),
    }

    if !irq.is_one() {
        return false;
    }

    let enabled = match regs.cell_bits(STATUS) {
        Some(bits) => bits & STATUS_IE != 0,
        None => {
            warn!("status register undefined; interrupts treated as disabled");
            false
        }
    };
    if !enabled {
        return false;
    }

    if transfer_pending {
        trace!("interrupt entry deferred behind an unresolved control transfer");
        return false;
    }

    regs.set_cell(EPC, fetch.pc);
    regs.clear_cell(STATUS, STATUS_IE);
    fetch.inst.flush = true;
    *pc_out = HANDLER_BASE;
    debug!(
        epc = %format_args!("{:#010x}", fetch.pc),
        "interrupt taken, entering handler"
    );
    true
}
