//! A software model of a classic five-stage in-order pipelined processor,
//! designed to live as a component inside a clock-driven digital-logic
//! simulator.
//!
//! The host owns the clock, program memory, and data memory; the core owns
//! the pipeline, the register file, and the exception state. Interaction is
//! one [`PortInput`] / [`PortOutput`] exchange per wire change, with all
//! sequencing derived from the clock line:
//!
//! 1. **Trigger edge** — the pipeline shifts, the PC moves, the bus is
//!    driven.
//! 2. **Opposite edge** — write-back commits to the register file.
//! 3. **Rest level** — loads complete, operands forward, branches resolve.
//!    Idempotent, so the host may re-propagate freely.
//!
//! The pipeline implements load-use stalling with instruction replay,
//! operand forwarding with execute-over-memory-over-write-back priority,
//! one-instruction branch squash, and a simplified non-nested interrupt
//! model with `Status`/`Cause`/`EPC`/`BadVAddr` control registers.
//!
//! # Example
//!
//! ```
//! use rv5_core::{Bit, Config, Core, PortInput, Value};
//!
//! let mut core = Core::new(Config::default())?;
//! let mut input = PortInput {
//!     clk: Bit::One,
//!     op: Value::from_u32(0x0000_0013), // nop
//!     din: Value::Undefined,
//!     irq: Bit::Zero,
//! };
//! let rising = core.propagate(&input)?;
//! input.clk = Bit::Zero;
//! let falling = core.propagate(&input)?;
//! assert_eq!(falling.pc, rising.pc);
//! # Ok::<(), rv5_core::CoreError>(())
//! ```

pub mod common;
pub mod config;
pub mod core;
pub mod isa;

pub use crate::common::{Bit, ClockState, CoreError, EdgeTrigger, Phases, Value};
pub use crate::config::Config;
pub use crate::core::Core;
pub use crate::core::pipeline::writeback::Retirement;
pub use crate::core::port::{PortInput, PortOutput};
pub use crate::isa::{Instruction, Mnemonic, OpClass, decode};
