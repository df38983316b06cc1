//! The architectural register file.
//!
//! One flat array backs both the 32 general registers and the four
//! exception-handling control registers, which live in cells above the
//! general file. Cell 0 is hardwired to zero: writes are discarded and reads
//! always return zero. Cells 32 and 33 are reserved and unused.
//!
//! Software reaches the control registers only through the coprocessor move
//! instructions, which carry a selector rather than a cell index; the
//! selector-to-cell mapping lives here so no other module hardcodes it.

use crate::common::{CoreError, Value};

/// Total cells: 32 general registers, 2 reserved, 4 control registers.
pub const NUM_CELLS: usize = 38;

/// Faulting address of the most recent address error.
pub const BADVADDR: usize = 34;
/// Interrupt enable and mode bits.
pub const STATUS: usize = 35;
/// Pending-interrupt and exception-code bits.
pub const CAUSE: usize = 36;
/// Resume address for `eret`.
pub const EPC: usize = 37;

/// Selector carried by the coprocessor move instructions for [`BADVADDR`].
pub const SEL_BADVADDR: u8 = 8;
/// Selector for [`STATUS`].
pub const SEL_STATUS: u8 = 12;
/// Selector for [`CAUSE`].
pub const SEL_CAUSE: u8 = 13;
/// Selector for [`EPC`].
pub const SEL_EPC: u8 = 14;

/// The register file. Every cell resets to a known zero.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    cells: [Value; NUM_CELLS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            cells: [Value::ZERO; NUM_CELLS],
        }
    }
}

impl RegisterFile {
    /// Maps a coprocessor move selector to its backing cell.
    pub const fn control_cell(selector: u8) -> Option<usize> {
        match selector {
            SEL_BADVADDR => Some(BADVADDR),
            SEL_STATUS => Some(STATUS),
            SEL_CAUSE => Some(CAUSE),
            SEL_EPC => Some(EPC),
            _ => None,
        }
    }

    /// Reads a general register. Register 0 is always zero.
    pub fn read(&self, index: u8) -> Value {
        if index == 0 {
            return Value::ZERO;
        }
        self.cells
            .get(usize::from(index))
            .copied()
            .unwrap_or(Value::Undefined)
    }

    /// Writes a general register. Writes to register 0 are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RegisterIndexOutOfRange`] if `index` addresses no
    /// cell; this indicates a pipeline bug, not a program error.
    pub fn write(&mut self, index: u8, value: Value) -> Result<(), CoreError> {
        if index == 0 {
            return Ok(());
        }
        let cell = self
            .cells
            .get_mut(usize::from(index))
            .ok_or(CoreError::RegisterIndexOutOfRange {
                index,
                limit: NUM_CELLS,
            })?;
        *cell = value;
        Ok(())
    }

    /// Reads a cell by its internal index. Intended for the control cells
    /// and host-side inspection.
    pub fn cell(&self, index: usize) -> Value {
        self.cells.get(index).copied().unwrap_or(Value::Undefined)
    }

    /// Overwrites a control cell with a fully-known value.
    pub(crate) fn set_cell(&mut self, index: usize, bits: u32) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Value::from_u32(bits);
        }
    }

    /// Stores an arbitrary (possibly undefined) value into a control cell.
    pub(crate) fn set_cell_value(&mut self, index: usize, value: Value) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
        }
    }

    /// Sets bits in a control cell. An undefined cell stays undefined.
    pub(crate) fn or_cell(&mut self, index: usize, mask: u32) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = cell.zip(Value::from_u32(mask), |a, b| a | b);
        }
    }

    /// Clears bits in a control cell. An undefined cell stays undefined.
    pub(crate) fn clear_cell(&mut self, index: usize, mask: u32) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = cell.zip(Value::from_u32(mask), |a, b| a & !b);
        }
    }

    /// The 32-bit pattern of a control cell, if known.
    pub fn cell_bits(&self, index: usize) -> Option<u32> {
        self.cell(index).bits()
    }
}
