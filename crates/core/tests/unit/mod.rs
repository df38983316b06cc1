//! Unit and scenario tests, grouped by subsystem.

mod clocking;
mod isa;
mod pipeline;
