//! Load-use stall behavior.

use pretty_assertions::assert_eq;

use crate::common::{Machine, program};

fn with_word_at_0x40(words: &[u32]) -> Machine {
    let mut machine = Machine::new(words);
    machine.poke_word(0x40, 21);
    machine
}

#[test]
fn adjacent_consumer_stalls_exactly_once() {
    let mut machine = with_word_at_0x40(&[program::lw(1, 0, 0x40), program::add(2, 1, 1)]);
    machine.run(12);
    assert_eq!(machine.reg(1), 21);
    assert_eq!(machine.reg(2), 42);
    assert_eq!(machine.stalls, 1);
}

#[test]
fn one_instruction_gap_still_stalls_once() {
    let mut machine = with_word_at_0x40(&[
        program::lw(1, 0, 0x40),
        program::NOP,
        program::add(2, 1, 1),
    ]);
    machine.run(12);
    assert_eq!(machine.reg(2), 42);
    assert_eq!(machine.stalls, 1);
}

#[test]
fn two_instruction_gap_needs_no_stall() {
    let mut machine = with_word_at_0x40(&[
        program::lw(1, 0, 0x40),
        program::NOP,
        program::NOP,
        program::add(2, 1, 1),
    ]);
    machine.run(12);
    assert_eq!(machine.reg(2), 42);
    assert_eq!(machine.stalls, 0);
}

#[test]
fn independent_instruction_does_not_stall() {
    let mut machine = with_word_at_0x40(&[
        program::lw(1, 0, 0x40),
        program::addi(2, 3, 4),
    ]);
    machine.run(12);
    assert_eq!(machine.reg(1), 21);
    assert_eq!(machine.reg(2), 4);
    assert_eq!(machine.stalls, 0);
}

#[test]
fn store_data_dependency_stalls_and_forwards() {
    let mut machine = with_word_at_0x40(&[program::lw(1, 0, 0x40), program::sw(1, 0, 0x44)]);
    machine.run(12);
    assert_eq!(machine.stalls, 1);
    assert_eq!(machine.ram_word(0x44), 21);
}

#[test]
fn squashed_load_cannot_cause_a_stall() {
    // The branch skips the load; the flushed copy in the pipe is inert.
    let mut machine = with_word_at_0x40(&[
        program::beq(0, 0, 8),
        program::lw(1, 0, 0x40),
        program::add(2, 1, 1),
    ]);
    machine.run(12);
    assert_eq!(machine.reg(1), 0);
    assert_eq!(machine.reg(2), 0);
    assert_eq!(machine.stalls, 0);
}
