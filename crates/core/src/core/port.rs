//! The external port surface.
//!
//! The core is a component inside a larger circuit: the host owns program
//! memory, data memory, and the clock, and exchanges one [`PortInput`] /
//! [`PortOutput`] pair with the core per propagation call. Inputs carry full
//! wire fidelity (they may be undefined); outputs are always driven.

use crate::common::{Bit, Value};

/// Input pins sampled on every propagation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortInput {
    /// The clock line.
    pub clk: Bit,
    /// The instruction word at the address currently on the PC output.
    pub op: Value,
    /// Data returned by the memory system for an in-flight load.
    pub din: Value,
    /// External interrupt request, level-sensitive.
    pub irq: Bit,
}

/// Output pins driven after every propagation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortOutput {
    /// Fetch address for the next instruction word.
    pub pc: u32,
    /// Word address for the memory stage, 24 bits.
    pub addr: u32,
    /// Store data, lane-positioned within the word.
    pub dout: u32,
    /// High while the memory stage holds a store.
    pub store: bool,
    /// High while the memory stage holds a load.
    pub load: bool,
    /// Byte-lane select for the access, one bit per byte of the word.
    pub sel: u8,
}
