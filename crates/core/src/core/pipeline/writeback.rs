//! The write-back stage and the retirement history.
//!
//! Register-file commits happen on the clock's opposite edge, mid-cycle, so
//! a reader three stages behind the writer sees the committed value without
//! needing a forwarding path of its own. Each committed instruction is also
//! appended to a bounded retirement log the host can inspect. No-ops never
//! enter the log: an injected stall bubble shares its victim's PC and a
//! fetched filler `nop` carries no architectural effect, so recording either
//! would crowd the history with duplicates.

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::common::{CoreError, Value};
use crate::core::pipeline::stage::{RESET_PC, StageRegister};
use crate::core::regfile::{EPC, RegisterFile};
use crate::isa::{Mnemonic, OpClass};

/// One retired instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retirement {
    /// Fetch address.
    pub pc: u32,
    /// The instruction word.
    pub raw: u32,
    /// General register written, `0` if none.
    pub dest: u8,
    /// Value written to `dest`.
    pub value: Value,
}

/// Bounded history of retired instructions, oldest first.
#[derive(Debug, Clone)]
pub struct RetireLog {
    entries: VecDeque<Retirement>,
    capacity: usize,
}

impl RetireLog {
    /// Creates an empty log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest once full.
    pub fn push(&mut self, entry: Retirement) {
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Retirement> {
        self.entries.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Commits the write-back stage's result. Runs once per commit edge.
///
/// # Errors
///
/// Propagates [`CoreError::RegisterIndexOutOfRange`] from the register file;
/// decode only produces five-bit fields, so this indicates internal
/// corruption rather than a program error.
pub fn commit(
    write_back: &StageRegister,
    regs: &mut RegisterFile,
    log: &mut RetireLog,
) -> Result<(), CoreError> {
    let inst = &write_back.inst;
    if !inst.active() || write_back.pc == RESET_PC || inst.mnemonic == Mnemonic::Nop {
        return Ok(());
    }

    let mut dest = 0;
    let mut value = Value::ZERO;

    if inst.class == OpClass::Cop0Move && inst.mnemonic == Mnemonic::Mtc0 {
        match RegisterFile::control_cell(inst.rd) {
            // EPC is owned by the interrupt logic; software writes via the
            // other selectors only.
            Some(EPC) | None => {
                warn!(selector = inst.rd, "mtc0 to unwritable control register ignored");
            }
            Some(cell) => regs.set_cell_value(cell, inst.rt_value),
        }
    } else {
        dest = inst.gpr_dest();
        if dest != 0 {
            value = inst.forward_value();
            regs.write(dest, value)?;
            trace!(dest, %value, inst = %inst, "commit");
        }
    }

    log.push(Retirement {
        pc: write_back.pc,
        raw: inst.raw,
        dest,
        value,
    });
    Ok(())
}
