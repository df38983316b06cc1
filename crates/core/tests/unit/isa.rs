//! Decode-table coverage: encodings in, field assignments out.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv5_core::{Mnemonic, OpClass, decode};

use crate::common::program;

#[rstest]
#[case(program::add(3, 1, 2), Mnemonic::Add, OpClass::RegReg)]
#[case(program::sub(3, 1, 2), Mnemonic::Sub, OpClass::RegReg)]
#[case(program::mul(3, 1, 2), Mnemonic::Mul, OpClass::RegReg)]
#[case(program::and(3, 1, 2), Mnemonic::And, OpClass::RegReg)]
#[case(program::or(3, 1, 2), Mnemonic::Or, OpClass::RegReg)]
#[case(program::xor(3, 1, 2), Mnemonic::Xor, OpClass::RegReg)]
#[case(program::slt(3, 1, 2), Mnemonic::Slt, OpClass::RegReg)]
#[case(program::sltu(3, 1, 2), Mnemonic::Sltu, OpClass::RegReg)]
#[case(program::sll(3, 1, 2), Mnemonic::Sll, OpClass::ShiftReg)]
#[case(program::srl(3, 1, 2), Mnemonic::Srl, OpClass::ShiftReg)]
#[case(program::sra(3, 1, 2), Mnemonic::Sra, OpClass::ShiftReg)]
#[case(program::addi(3, 1, 5), Mnemonic::Addi, OpClass::RegImm)]
#[case(program::slli(3, 1, 5), Mnemonic::Slli, OpClass::ShiftImm)]
#[case(program::srai(3, 1, 5), Mnemonic::Srai, OpClass::ShiftImm)]
#[case(program::lw(3, 1, 0), Mnemonic::Lw, OpClass::Load)]
#[case(program::lbu(3, 1, 0), Mnemonic::Lbu, OpClass::Load)]
#[case(program::sw(3, 1, 0), Mnemonic::Sw, OpClass::Store)]
#[case(program::beq(1, 2, 8), Mnemonic::Beq, OpClass::Branch)]
#[case(program::bal(8), Mnemonic::Bal, OpClass::BranchLink)]
#[case(program::jal(1, 8), Mnemonic::Jal, OpClass::Jump)]
#[case(program::jalr(1, 2), Mnemonic::Jalr, OpClass::JumpReg)]
#[case(program::lui(3, 0x12345), Mnemonic::Lui, OpClass::LoadUpper)]
#[case(program::auipc(3, 0x12345), Mnemonic::Auipc, OpClass::LoadUpper)]
#[case(program::mtc0(3, 12), Mnemonic::Mtc0, OpClass::Cop0Move)]
#[case(program::mfc0(3, 14), Mnemonic::Mfc0, OpClass::Cop0Move)]
#[case(program::SYSCALL, Mnemonic::Syscall, OpClass::System)]
#[case(program::BREAK, Mnemonic::Break, OpClass::System)]
#[case(program::ERET, Mnemonic::Eret, OpClass::System)]
fn word_classifies(#[case] word: u32, #[case] mnemonic: Mnemonic, #[case] class: OpClass) {
    let inst = decode(word);
    assert!(inst.valid);
    assert_eq!(inst.mnemonic, mnemonic);
    assert_eq!(inst.class, class);
}

#[test]
fn immediate_forms_alias_destination_fields() {
    let inst = decode(program::addi(7, 2, -3));
    assert_eq!(inst.rd, 7);
    assert_eq!(inst.rt, 7);
    assert_eq!(inst.rs, 2);
    assert_eq!(inst.imm, -3);
    assert_eq!(inst.gpr_dest(), 7);
}

#[test]
fn shift_register_swaps_amount_into_rs() {
    // Value register rides the rt port, amount the rs port.
    let inst = decode(program::sll(5, 6, 7));
    assert_eq!(inst.rd, 5);
    assert_eq!(inst.rt, 6);
    assert_eq!(inst.rs, 7);
}

#[test]
fn store_has_no_destination() {
    let inst = decode(program::sw(9, 2, 16));
    assert_eq!(inst.gpr_dest(), 0);
    assert_eq!(inst.rs, 2);
    assert_eq!(inst.rt, 9);
    assert_eq!(inst.imm, 16);
}

#[test]
fn negative_store_offset_sign_extends() {
    let inst = decode(program::sw(9, 2, -4));
    assert_eq!(inst.imm, -4);
}

#[test]
fn bal_links_into_x1() {
    let inst = decode(program::bal(-16));
    assert_eq!(inst.rd, 1);
    assert_eq!(inst.gpr_dest(), 1);
    assert_eq!(inst.imm, -16);
    assert!(!inst.reads_rs());
    assert!(!inst.reads_rt());
}

#[test]
fn coprocessor_moves_carry_selector_in_rd() {
    let to = decode(program::mtc0(4, 12));
    assert_eq!(to.rd, 12);
    assert_eq!(to.rt, 4);
    assert_eq!(to.gpr_dest(), 0);
    assert!(to.reads_rt());

    let from = decode(program::mfc0(4, 14));
    assert_eq!(from.rd, 14);
    assert_eq!(from.rt, 4);
    assert_eq!(from.gpr_dest(), 4);
}

#[test]
fn reserved_system_funct3_is_invalid() {
    // funct3 = 0b011 under the system opcode matches nothing.
    let inst = decode(0x0000_3073);
    assert!(!inst.valid);
}
