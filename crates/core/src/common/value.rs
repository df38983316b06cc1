//! Datapath value types.
//!
//! Every multi-bit signal flowing through the pipeline is a [`Value`]: either a
//! known integer or undefined. The host simulator can legitimately drive
//! floating or conflicting wires into the instruction and data ports, so
//! undefinedness is a first-class state that propagates through arithmetic
//! rather than collapsing to zero. Single-bit control lines use [`Bit`].
//!
//! Known values are held sign-extended in an `i64`. Architectural state is
//! 32 bits wide; the extra width means comparisons and immediate arithmetic
//! behave as signed 32-bit operations without masking at every use site,
//! and results are truncated back to 32 bits only when latched or driven
//! out on a bus.

use std::fmt;

/// A multi-bit signal: a known integer or an undefined wire state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// A fully-known value, sign-extended from 32 bits.
    Known(i64),
    /// At least one constituent bit is floating or in conflict.
    Undefined,
}

impl Value {
    /// Zero, the reset state of every architectural register.
    pub const ZERO: Self = Self::Known(0);

    /// Builds a value from a 32-bit pattern, sign-extending into the
    /// 64-bit carrier.
    #[inline]
    pub const fn from_u32(bits: u32) -> Self {
        Self::Known(bits as i32 as i64)
    }

    /// The known payload, if any.
    #[inline]
    pub const fn known(self) -> Option<i64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// The low 32 bits of a known value.
    #[inline]
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::Known(v) => Some(v as u32),
            Self::Undefined => None,
        }
    }

    /// Whether the signal is undefined.
    #[inline]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Applies a unary operation, propagating undefinedness.
    #[inline]
    pub fn map(self, f: impl FnOnce(i64) -> i64) -> Self {
        match self {
            Self::Known(v) => Self::Known(f(v)),
            Self::Undefined => Self::Undefined,
        }
    }

    /// Applies a binary operation, undefined if either operand is.
    #[inline]
    pub fn zip(self, rhs: Self, f: impl FnOnce(i64, i64) -> i64) -> Self {
        match (self, rhs) {
            (Self::Known(a), Self::Known(b)) => Self::Known(f(a, b)),
            _ => Self::Undefined,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{:#010x}", *v as u32),
            Self::Undefined => write!(f, "xxxxxxxxxx"),
        }
    }
}

/// A single-bit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bit {
    /// Driven low.
    #[default]
    Zero,
    /// Driven high.
    One,
    /// Floating or in conflict.
    Undefined,
}

impl Bit {
    /// Whether the line is driven high.
    #[inline]
    pub const fn is_one(self) -> bool {
        matches!(self, Self::One)
    }

    /// Whether the line is driven low.
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Zero)
    }

    /// Whether the line is floating or in conflict.
    #[inline]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self {
        if b { Self::One } else { Self::Zero }
    }
}
