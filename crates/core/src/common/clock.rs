//! Clock edge detection and phase derivation.
//!
//! The core does no timekeeping of its own: the host simulator calls
//! [`crate::Core::propagate`] whenever any input changes, and the model
//! derives what to do from the clock line alone. A single external clock
//! sample decomposes into three phases:
//!
//! 1. **Advance** — the configured trigger edge. Pipeline registers shift and
//!    the program counter moves.
//! 2. **Commit** — the opposite edge. Register-file writes from the
//!    write-back stage land here, mid-cycle, so a dependent reader three
//!    stages behind sees the new value without a forwarding path.
//! 3. **Resolve** — the rest level between commit and the next advance.
//!    Combinational work (load completion, operand forwarding, branch
//!    redirect) is recomputed here and must be idempotent, because the host
//!    may re-propagate any number of times while the clock sits still.

use serde::Deserialize;

use crate::common::value::Bit;

/// Which clock transition shifts the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTrigger {
    /// Shift on the low-to-high transition (the default).
    #[default]
    Rising,
    /// Shift on the high-to-low transition.
    Falling,
    /// Level-high trigger; treated as the transition into the high level.
    High,
    /// Level-low trigger; treated as the transition into the low level.
    Low,
}

impl EdgeTrigger {
    /// Whether this trigger advances on the low-to-high transition.
    const fn advances_on_rising(self) -> bool {
        matches!(self, Self::Rising | Self::High)
    }
}

/// The phases active for one propagation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Phases {
    /// The trigger edge fired: shift stages, move the PC.
    pub advance: bool,
    /// The opposite edge fired: commit write-back results.
    pub commit: bool,
    /// The clock is at its rest level: recompute combinational results.
    pub resolve: bool,
}

/// Remembers the previous clock sample so transitions can be detected.
#[derive(Debug, Clone, Default)]
pub struct ClockState {
    last: Bit,
}

impl ClockState {
    /// Classifies one clock sample against the previous one.
    ///
    /// An undefined clock yields no phases at all; the caller leaves every
    /// output unchanged. The remembered level is only updated by defined
    /// samples, so a glitch to undefined and back does not manufacture an
    /// edge that never happened on the wire.
    pub fn update(&mut self, clk: Bit, trigger: EdgeTrigger) -> Phases {
        if clk.is_undefined() {
            return Phases::default();
        }

        let rising = self.last.is_zero() && clk.is_one();
        let falling = self.last.is_one() && clk.is_zero();
        self.last = clk;

        if trigger.advances_on_rising() {
            Phases {
                advance: rising,
                commit: falling,
                resolve: clk.is_zero(),
            }
        } else {
            Phases {
                advance: falling,
                commit: rising,
                resolve: clk.is_one(),
            }
        }
    }
}
