//! Common types shared across the core model.
//!
//! This module gathers the leaf building blocks the rest of the crate is
//! written in terms of:
//! 1. **Values:** The integer-or-undefined datapath value and 1-bit signal types.
//! 2. **Clocking:** Edge/level phase derivation from the external clock line.
//! 3. **Errors:** Fatal, programming-error-class failures.

pub mod clock;
pub mod error;
pub mod value;

pub use clock::{ClockState, EdgeTrigger, Phases};
pub use error::CoreError;
pub use value::{Bit, Value};
