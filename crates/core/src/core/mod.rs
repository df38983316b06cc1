//! The processor core and its host-facing surface.
//!
//! A [`Core`] is a single component in the host's circuit. It owns no
//! memory and no clock: the host drives [`PortInput`] samples at it whenever
//! any input wire changes, and reads the resulting [`PortOutput`]. All
//! sequencing is derived from the clock line (see [`crate::common::clock`]).

pub mod pipeline;
pub mod port;
pub mod regfile;

use tracing::warn;

use crate::common::{CoreError, Value};
use crate::config::Config;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::memory::BusDrive;
use crate::core::pipeline::writeback::{RetireLog, Retirement};
use crate::core::port::{PortInput, PortOutput};
use crate::core::regfile::{BADVADDR, CAUSE, EPC, RegisterFile, STATUS};

/// A five-stage in-order pipelined processor core.
#[derive(Debug, Clone)]
pub struct Core {
    config: Config,
    clock: crate::common::ClockState,
    regs: RegisterFile,
    pipeline: Pipeline,
    pc: u32,
    bus: BusDrive,
    log: RetireLog,
}

impl Core {
    /// Builds a core from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn new(config: Config) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let clock = config.clock_state();
        let log = RetireLog::new(config.buffer_len);
        Self {
            config,
            clock,
            regs: RegisterFile::default(),
            pipeline: Pipeline::default(),
            pc: 0,
            bus: BusDrive::default(),
            log,
        }
    }

    /// Processes one input sample and returns the driven outputs.
    ///
    /// The host must call this whenever any input wire changes. Calls while
    /// the clock rests are idempotent; each clock transition performs its
    /// phase work exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal invariant violations (register
    /// index escapes); program-visible problems degrade with warnings.
    pub fn propagate(&mut self, input: &PortInput) -> Result<PortOutput, CoreError> {
        let phases = self.clock.update(input.clk, self.config.trigger);
        if input.clk.is_undefined() {
            warn!("clock undefined; outputs held");
            return Ok(self.output());
        }

        if phases.advance {
            self.bus = self
                .pipeline
                .advance(input.op, input.irq, &mut self.regs, &mut self.pc);
        }
        if phases.commit {
            self.pipeline.commit(&mut self.regs, &mut self.log)?;
        }
        if phases.resolve {
            self.pipeline.resolve(input.din, &self.regs, &mut self.pc);
        }
        Ok(self.output())
    }

    /// The currently driven output pins.
    pub const fn output(&self) -> PortOutput {
        PortOutput {
            pc: self.pc,
            addr: self.bus.addr,
            dout: self.bus.dout,
            store: self.bus.store,
            load: self.bus.load,
            sel: self.bus.sel,
        }
    }

    /// Returns the core to its power-on state, keeping the configuration.
    pub fn reset(&mut self) {
        self.clock = self.config.clock_state();
        self.regs = RegisterFile::default();
        self.pipeline = Pipeline::default();
        self.pc = 0;
        self.bus = BusDrive::default();
        self.log = RetireLog::new(self.config.buffer_len);
    }

    /// Reads a general register, for host-side inspection.
    pub fn register(&self, index: u8) -> Value {
        self.regs.read(index)
    }

    /// The Status control register.
    pub fn status(&self) -> Value {
        self.regs.cell(STATUS)
    }

    /// The Cause control register.
    pub fn cause(&self) -> Value {
        self.regs.cell(CAUSE)
    }

    /// The EPC control register.
    pub fn epc(&self) -> Value {
        self.regs.cell(EPC)
    }

    /// The BadVAddr control register.
    pub fn bad_vaddr(&self) -> Value {
        self.regs.cell(BADVADDR)
    }

    /// Retired instructions, oldest first, bounded by the configured
    /// history length.
    pub fn retirements(&self) -> impl Iterator<Item = &Retirement> {
        self.log.iter()
    }

    /// The pipeline latches, for host-side inspection.
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
