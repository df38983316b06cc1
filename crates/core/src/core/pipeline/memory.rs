//! The memory stage: bus transaction drive and load completion.
//!
//! The core owns no data memory. The memory stage drives a word address,
//! byte-lane selects, and (for stores) lane-positioned data out of the port;
//! the host's memory system answers loads on the data-in pins within the
//! same cycle, and completion folds the returned word into the load's
//! destination slot at the rest level.
//!
//! Addresses are byte addresses internally; the bus address is the word
//! address, truncated to 24 bits. Sub-word accesses select lanes from the
//! low address bits. A misaligned address is masked down to its natural
//! alignment, with the offending byte address captured in `BadVAddr`.
//!
//! A load may need data a just-retiring store has not yet pushed through the
//! host's memory: when the write-back stage holds a store to the same word
//! whose lanes cover the load, the store's data is taken directly instead of
//! the data-in pins.

use tracing::{trace, warn};

use crate::common::Value;
use crate::core::pipeline::stage::StageRegister;
use crate::core::regfile::{BADVADDR, RegisterFile};
use crate::isa::{Instruction, Mnemonic};

/// Bus address width in bits.
const ADDR_BITS: u32 = 24;

/// What the memory stage drives on the port this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusDrive {
    /// Word address, [`ADDR_BITS`] wide.
    pub addr: u32,
    /// Lane-positioned store data.
    pub dout: u32,
    /// Store strobe.
    pub store: bool,
    /// Load strobe.
    pub load: bool,
    /// Byte-lane select.
    pub sel: u8,
}

/// One decoded sub-word access.
#[derive(Debug, Clone, Copy)]
struct Access {
    /// Full byte address.
    byte_addr: u32,
    /// Lanes touched within the word.
    sel: u8,
    /// Bit offset of the low touched lane.
    shift: u32,
}

impl Access {
    const fn word_addr(self) -> u32 {
        (self.byte_addr >> 2) & ((1 << ADDR_BITS) - 1)
    }
}

/// Computes the access for a load or store whose base operand is known.
fn access_of(inst: &Instruction) -> Option<Access> {
    let base = inst.rs_value.known()?;
    let byte_addr = (base.wrapping_add(i64::from(inst.imm))) as u32;
    let (sel, shift): (u8, u32) = match inst.mnemonic {
        Mnemonic::Lb | Mnemonic::Lbu | Mnemonic::Sb => {
            (1 << (byte_addr & 3), 8 * (byte_addr & 3))
        }
        Mnemonic::Lh | Mnemonic::Lhu | Mnemonic::Sh => {
            (3 << (byte_addr & 2), 8 * (byte_addr & 2))
        }
        Mnemonic::Lw | Mnemonic::Sw => (0xF, 0),
        _ => return None,
    };
    Some(Access {
        byte_addr,
        sel,
        shift,
    })
}

/// Whether the access is misaligned for its width.
const fn misaligned(inst: &Instruction, byte_addr: u32) -> bool {
    match inst.mnemonic {
        Mnemonic::Lh | Mnemonic::Lhu | Mnemonic::Sh => byte_addr & 1 != 0,
        Mnemonic::Lw | Mnemonic::Sw => byte_addr & 3 != 0,
        _ => false,
    }
}

/// Drives the bus for the instruction entering the memory stage. Runs once
/// per trigger edge.
pub fn drive(memory: &StageRegister, regs: &mut RegisterFile) -> BusDrive {
    let inst = &memory.inst;
    if !inst.active() || !(inst.is_load() || inst.is_store()) {
        return BusDrive::default();
    }

    let Some(access) = access_of(inst) else {
        warn!(inst = %inst, "memory access with undefined base address; bus idle");
        return BusDrive::default();
    };

    if misaligned(inst, access.byte_addr) {
        warn!(
            inst = %inst,
            addr = %format_args!("{:#010x}", access.byte_addr),
            "misaligned access masked to natural alignment"
        );
        regs.set_cell(BADVADDR, access.byte_addr);
    }

    if inst.is_store() {
        let dout = match inst.rt_value.known() {
            Some(data) => ((data as u32) << access.shift) & lane_mask(access.sel),
            None => {
                warn!(inst = %inst, "store of undefined data; driving zero");
                0
            }
        };
        BusDrive {
            addr: access.word_addr(),
            dout,
            store: true,
            load: false,
            sel: access.sel,
        }
    } else {
        // Loads request the full word; lane extraction happens on completion.
        BusDrive {
            addr: access.word_addr(),
            dout: 0,
            store: false,
            load: true,
            sel: 0xF,
        }
    }
}

/// Folds returned (or store-forwarded) data into a load's destination slot.
/// Runs on every resolve; idempotent.
pub fn complete(memory: &mut StageRegister, write_back: &StageRegister, din: Value) {
    let inst = &memory.inst;
    if !inst.active() || !inst.is_load() {
        return;
    }
    let Some(access) = access_of(inst) else {
        memory.inst.rt_value = Value::Undefined;
        return;
    };

    let word = forwarded_store_word(&write_back.inst, access).unwrap_or(din);
    if word.is_undefined() {
        trace!(inst = %memory.inst, "load data undefined");
        memory.inst.rt_value = Value::Undefined;
        return;
    }

    memory.inst.rt_value = word.map(|w| extract(&memory.inst, access, w as u32));
}

/// The full word a retiring store would leave at the load's address, when it
/// covers every lane the load reads.
fn forwarded_store_word(write_back: &Instruction, load: Access) -> Option<Value> {
    if !write_back.active() || !write_back.is_store() {
        return None;
    }
    let store = access_of(write_back)?;
    if store.word_addr() != load.word_addr() || load.sel & store.sel != load.sel {
        return None;
    }
    trace!(
        addr = %format_args!("{:#010x}", load.byte_addr),
        "load served from retiring store"
    );
    Some(
        write_back
            .rt_value
            .map(|data| i64::from(((data as u32) << store.shift) & lane_mask(store.sel))),
    )
}

/// Extracts and extends the addressed lanes from a memory word.
fn extract(inst: &Instruction, access: Access, word: u32) -> i64 {
    let lanes = (word >> access.shift) & lane_mask(access.sel >> (access.shift / 8));
    match inst.mnemonic {
        Mnemonic::Lb => i64::from(lanes as u8 as i8),
        Mnemonic::Lbu => i64::from(lanes as u8),
        Mnemonic::Lh => i64::from(lanes as u16 as i16),
        Mnemonic::Lhu => i64::from(lanes as u16),
        _ => i64::from(word as i32),
    }
}

/// Expands a byte-lane select into a 32-bit mask.
const fn lane_mask(sel: u8) -> u32 {
    let mut mask: u32 = 0;
    let mut lane: u32 = 0;
    while lane < 4 {
        if sel & (1u8 << lane) != 0 {
            mask |= 0xFF << (8 * lane);
        }
        lane += 1;
    }
    mask
}
