//! A minimal host circuit around the core: clock generator, program ROM, and
//! a word-addressed RAM.
//!
//! One [`Machine::step`] is one full clock cycle: a rising propagation with
//! the instruction word at the current PC, then a falling propagation with
//! load data answered from RAM. Stores are normally written into RAM at the
//! end of their memory-stage cycle; `late_stores` defers each store by one
//! cycle to exercise the core's store-to-load forwarding path.

use std::collections::HashMap;

use rv5_core::{Bit, Config, Core, PortInput, PortOutput, Value};

use super::program;

pub struct Machine {
    pub core: Core,
    rom: HashMap<u32, u32>,
    ram: HashMap<u32, u32>,
    irq: bool,
    late_stores: bool,
    din_floats: bool,
    pending_store: Option<(u32, u32, u8)>,
    /// Load-use stalls observed so far.
    pub stalls: usize,
    /// Outputs after the most recent falling edge.
    pub last: PortOutput,
}

impl Machine {
    /// A machine with `words` loaded at address zero and default config.
    pub fn new(words: &[u32]) -> Self {
        Self::with_config(Config::default(), words)
    }

    pub fn with_config(config: Config, words: &[u32]) -> Self {
        let core = Core::new(config).unwrap();
        let last = core.output();
        let mut machine = Self {
            core,
            rom: HashMap::new(),
            ram: HashMap::new(),
            irq: false,
            late_stores: false,
            din_floats: false,
            pending_store: None,
            stalls: 0,
            last,
        };
        machine.load_at(0, words);
        machine
    }

    /// Places code at an arbitrary byte address (for handler stubs).
    pub fn load_at(&mut self, base: u32, words: &[u32]) {
        for (i, &word) in words.iter().enumerate() {
            let _ = self.rom.insert(base / 4 + i as u32, word);
        }
    }

    /// Defers RAM store commits by one cycle.
    pub fn delay_stores(&mut self) {
        self.late_stores = true;
    }

    /// Leaves the data-in pins floating, as a disconnected memory would.
    pub fn float_din(&mut self) {
        self.din_floats = true;
    }

    pub fn set_irq(&mut self, level: bool) {
        self.irq = level;
    }

    /// Writes a word directly into RAM at a byte address.
    pub fn poke_word(&mut self, byte_addr: u32, word: u32) {
        let _ = self.ram.insert((byte_addr >> 2) & 0x00FF_FFFF, word);
    }

    /// Reads a RAM word at a byte address; unwritten memory is zero.
    pub fn ram_word(&self, byte_addr: u32) -> u32 {
        self.bus_word((byte_addr >> 2) & 0x00FF_FFFF)
    }

    fn bus_word(&self, word_addr: u32) -> u32 {
        self.ram.get(&word_addr).copied().unwrap_or(0)
    }

    fn op_at(&self, pc: u32) -> Value {
        Value::from_u32(self.rom.get(&(pc / 4)).copied().unwrap_or(program::NOP))
    }

    /// Runs one full clock cycle.
    pub fn step(&mut self) {
        let irq = Bit::from(self.irq);
        let op = self.op_at(self.last.pc);
        let rise = self
            .core
            .propagate(&PortInput {
                clk: Bit::One,
                op,
                din: Value::Undefined,
                irq,
            })
            .unwrap();
        if self.core.pipeline().stalled() {
            self.stalls += 1;
        }

        let din = if rise.load && !self.din_floats {
            Value::from_u32(self.bus_word(rise.addr))
        } else {
            Value::Undefined
        };
        self.last = self
            .core
            .propagate(&PortInput {
                clk: Bit::Zero,
                op,
                din,
                irq,
            })
            .unwrap();

        // A deferred store lands after this cycle's load data was sampled,
        // modelling a memory that commits writes one cycle late.
        if let Some(store) = self.pending_store.take() {
            self.apply_store(store);
        }
        if rise.store {
            let store = (rise.addr, rise.dout, rise.sel);
            if self.late_stores {
                self.pending_store = Some(store);
            } else {
                self.apply_store(store);
            }
        }
    }

    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// A general register's value, which must be defined.
    pub fn reg(&self, index: u8) -> i64 {
        self.core
            .register(index)
            .known()
            .expect("register holds an undefined value")
    }

    fn apply_store(&mut self, (addr, dout, sel): (u32, u32, u8)) {
        let mut mask = 0u32;
        for lane in 0..4 {
            if sel & (1 << lane) != 0 {
                mask |= 0xFF << (8 * lane);
            }
        }
        let merged = (self.bus_word(addr) & !mask) | (dout & mask);
        let _ = self.ram.insert(addr, merged);
    }
}
