//! Retirement history semantics.

use pretty_assertions::assert_eq;
use rv5_core::{Config, Value};

use crate::common::{Machine, program};

#[test]
fn history_records_committed_writes() {
    let word = program::addi(1, 0, 5);
    let mut machine = Machine::new(&[word]);
    machine.run(8);
    let entry = machine
        .core
        .retirements()
        .find(|r| r.pc == 0)
        .expect("first instruction never retired");
    assert_eq!(entry.raw, word);
    assert_eq!(entry.dest, 1);
    assert_eq!(entry.value, Value::Known(5));
}

#[test]
fn history_is_bounded_by_configuration() {
    let config = Config {
        buffer_len: 4,
        ..Config::default()
    };
    let words: Vec<u32> = (1..=8).map(|i| program::addi(i, 0, i32::from(i))).collect();
    let mut machine = Machine::with_config(config, &words);
    // Run well past the program end: filler fetches must not evict entries.
    machine.run(20);
    assert_eq!(machine.core.retirements().count(), 4);
    // The survivors are the most recent retirements.
    let last = machine.core.retirements().last().expect("log empty");
    assert_eq!(last.pc, 0x1C);
    assert_eq!(last.dest, 8);
}

#[test]
fn bubbles_and_fillers_stay_out_of_the_history() {
    let mut machine = Machine::new(&[program::lw(1, 0, 0x40), program::add(2, 1, 1)]);
    machine.poke_word(0x40, 3);
    machine.run(14);
    assert_eq!(machine.stalls, 1);
    // The injected stall bubble shares the consumer's PC; only the real
    // instructions appear, each exactly once.
    let pcs: Vec<u32> = machine.core.retirements().map(|r| r.pc).collect();
    assert_eq!(pcs, vec![0, 4]);
}

#[test]
fn squashed_instructions_never_retire() {
    let mut machine = Machine::new(&[
        program::beq(0, 0, 8),
        program::addi(2, 0, 5), // squashed
        program::addi(3, 0, 7),
    ]);
    machine.run(10);
    assert!(machine.core.retirements().all(|r| r.pc != 4));
    assert_eq!(machine.reg(3), 7);
}
