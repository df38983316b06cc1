//! Instruction word decoding.
//!
//! Pure bit-slicing from a fetched 32-bit word to an [`Instruction`]. Words
//! that match no recognized encoding decode to an invalid record rather than
//! an error: an invalid instruction flows through the pipeline as a marked
//! no-op so the fetch stream never loses alignment with the host's program
//! memory.

use crate::isa::instruction::{Instruction, Mnemonic, OpClass};
use crate::isa::opcodes as op;

/// I-type immediate: bits `[31:20]`, sign-extended.
#[inline]
const fn imm_i(word: u32) -> i32 {
    (word as i32) >> 20
}

/// S-type immediate: bits `[31:25]` and `[11:7]`, sign-extended.
#[inline]
const fn imm_s(word: u32) -> i32 {
    (((word & 0xFE00_0000) as i32) >> 20) | (((word >> 7) & 0x1F) as i32)
}

/// B-type immediate: a sign-extended, halfword-aligned branch offset.
#[inline]
const fn imm_b(word: u32) -> i32 {
    (((word & 0x8000_0000) as i32) >> 19)
        | (((word & 0x80) as i32) << 4)
        | (((word >> 20) & 0x7E0) as i32)
        | (((word >> 7) & 0x1E) as i32)
}

/// U-type immediate: bits `[31:12]` already in position, low bits zero.
#[inline]
const fn imm_u(word: u32) -> i32 {
    (word & 0xFFFF_F000) as i32
}

/// J-type immediate: a sign-extended, halfword-aligned jump offset.
#[inline]
const fn imm_j(word: u32) -> i32 {
    (((word & 0x8000_0000) as i32) >> 11)
        | ((word & 0x000F_F000) as i32)
        | (((word >> 9) & 0x800) as i32)
        | (((word >> 20) & 0x7FE) as i32)
}

/// Builds the common skeleton; callers overwrite the fields they use.
const fn base(word: u32, class: OpClass, mnemonic: Mnemonic) -> Instruction {
    let mut inst = Instruction::bubble();
    inst.raw = word;
    inst.class = class;
    inst.mnemonic = mnemonic;
    inst
}

fn decode_reg(word: u32) -> Instruction {
    let (mnemonic, class) = match (op::funct3(word), op::funct7(word)) {
        (op::F3_ADD_SUB, op::F7_BASE) => (Mnemonic::Add, OpClass::RegReg),
        (op::F3_ADD_SUB, op::F7_ALT) => (Mnemonic::Sub, OpClass::RegReg),
        (op::F3_ADD_SUB, op::F7_MUL) => (Mnemonic::Mul, OpClass::RegReg),
        (op::F3_SLL, op::F7_BASE) => (Mnemonic::Sll, OpClass::ShiftReg),
        (op::F3_SLT, op::F7_BASE) => (Mnemonic::Slt, OpClass::RegReg),
        (op::F3_SLTU, op::F7_BASE) => (Mnemonic::Sltu, OpClass::RegReg),
        (op::F3_XOR, op::F7_BASE) => (Mnemonic::Xor, OpClass::RegReg),
        (op::F3_SRL_SRA, op::F7_BASE) => (Mnemonic::Srl, OpClass::ShiftReg),
        (op::F3_SRL_SRA, op::F7_ALT) => (Mnemonic::Sra, OpClass::ShiftReg),
        (op::F3_OR, op::F7_BASE) => (Mnemonic::Or, OpClass::RegReg),
        (op::F3_AND, op::F7_BASE) => (Mnemonic::And, OpClass::RegReg),
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, class, mnemonic);
    inst.rd = op::rd(word);
    if matches!(class, OpClass::ShiftReg) {
        // Shift amount in rs, shiftee in rt.
        inst.rt = op::rs1(word);
        inst.rs = op::rs2(word);
    } else {
        inst.rs = op::rs1(word);
        inst.rt = op::rs2(word);
    }
    inst
}

fn decode_imm(word: u32) -> Instruction {
    let funct3 = op::funct3(word);
    let shift = match (funct3, op::funct7(word)) {
        (op::F3_SLL, op::F7_BASE) => Some(Mnemonic::Slli),
        (op::F3_SRL_SRA, op::F7_BASE) => Some(Mnemonic::Srli),
        (op::F3_SRL_SRA, op::F7_ALT) => Some(Mnemonic::Srai),
        _ => None,
    };
    if let Some(mnemonic) = shift {
        let mut inst = base(word, OpClass::ShiftImm, mnemonic);
        inst.rd = op::rd(word);
        inst.rt = op::rs1(word);
        inst.imm = i32::from(op::rs2(word));
        return inst;
    }

    let mnemonic = match funct3 {
        op::F3_ADD_SUB => Mnemonic::Addi,
        op::F3_SLT => Mnemonic::Slti,
        op::F3_SLTU => Mnemonic::Sltiu,
        op::F3_XOR => Mnemonic::Xori,
        op::F3_OR => Mnemonic::Ori,
        op::F3_AND => Mnemonic::Andi,
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, OpClass::RegImm, mnemonic);
    inst.rd = op::rd(word);
    inst.rt = op::rd(word);
    inst.rs = op::rs1(word);
    inst.imm = imm_i(word);
    inst
}

fn decode_load(word: u32) -> Instruction {
    let mnemonic = match op::funct3(word) {
        op::F3_LB => Mnemonic::Lb,
        op::F3_LH => Mnemonic::Lh,
        op::F3_LW => Mnemonic::Lw,
        op::F3_LBU => Mnemonic::Lbu,
        op::F3_LHU => Mnemonic::Lhu,
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, OpClass::Load, mnemonic);
    inst.rd = op::rd(word);
    inst.rt = op::rd(word);
    inst.rs = op::rs1(word);
    inst.imm = imm_i(word);
    inst
}

fn decode_store(word: u32) -> Instruction {
    let mnemonic = match op::funct3(word) {
        op::F3_SB => Mnemonic::Sb,
        op::F3_SH => Mnemonic::Sh,
        op::F3_SW => Mnemonic::Sw,
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, OpClass::Store, mnemonic);
    inst.rs = op::rs1(word);
    inst.rt = op::rs2(word);
    inst.imm = imm_s(word);
    inst
}

fn decode_branch(word: u32) -> Instruction {
    let (mnemonic, class) = match op::funct3(word) {
        op::F3_BEQ => (Mnemonic::Beq, OpClass::Branch),
        op::F3_BNE => (Mnemonic::Bne, OpClass::Branch),
        op::F3_BAL => (Mnemonic::Bal, OpClass::BranchLink),
        op::F3_BLT => (Mnemonic::Blt, OpClass::Branch),
        op::F3_BGE => (Mnemonic::Bge, OpClass::Branch),
        op::F3_BLTU => (Mnemonic::Bltu, OpClass::Branch),
        op::F3_BGEU => (Mnemonic::Bgeu, OpClass::Branch),
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, class, mnemonic);
    inst.imm = imm_b(word);
    if matches!(class, OpClass::BranchLink) {
        // The link register is architectural, not encoded.
        inst.rd = 1;
    } else {
        inst.rs = op::rs1(word);
        inst.rt = op::rs2(word);
    }
    inst
}

fn decode_system(word: u32) -> Instruction {
    let (mnemonic, gpr_field) = match op::funct3(word) {
        op::F3_MTC0 => (Mnemonic::Mtc0, op::rs1(word)),
        op::F3_MFC0 => (Mnemonic::Mfc0, op::rd(word)),
        _ => return Instruction::invalid(word),
    };
    let mut inst = base(word, OpClass::Cop0Move, mnemonic);
    // The control-register selector rides in the low immediate bits.
    inst.rd = (imm_i(word) & 0x1F) as u8;
    inst.rt = gpr_field;
    inst
}

/// Decodes one fetched word.
pub fn decode(word: u32) -> Instruction {
    match word {
        op::WORD_NOP => base(word, OpClass::System, Mnemonic::Nop),
        op::WORD_SYSCALL => base(word, OpClass::System, Mnemonic::Syscall),
        op::WORD_BREAK => base(word, OpClass::System, Mnemonic::Break),
        op::WORD_ERET => base(word, OpClass::System, Mnemonic::Eret),
        _ => match op::opcode(word) {
            op::OP_REG => decode_reg(word),
            op::OP_IMM => decode_imm(word),
            op::OP_LOAD => decode_load(word),
            op::OP_STORE => decode_store(word),
            op::OP_BRANCH => decode_branch(word),
            op::OP_SYSTEM => decode_system(word),
            op::OP_LUI => {
                let mut inst = base(word, OpClass::LoadUpper, Mnemonic::Lui);
                inst.rd = op::rd(word);
                inst.rt = op::rd(word);
                inst.imm = imm_u(word);
                inst
            }
            op::OP_AUIPC => {
                let mut inst = base(word, OpClass::LoadUpper, Mnemonic::Auipc);
                inst.rd = op::rd(word);
                inst.rt = op::rd(word);
                inst.imm = imm_u(word);
                inst
            }
            op::OP_JAL => {
                let mut inst = base(word, OpClass::Jump, Mnemonic::Jal);
                inst.rd = op::rd(word);
                inst.imm = imm_j(word);
                inst
            }
            op::OP_JALR => {
                let mut inst = base(word, OpClass::JumpReg, Mnemonic::Jalr);
                inst.rd = op::rd(word);
                inst.rs = op::rs1(word);
                inst.imm = imm_i(word);
                inst
            }
            _ => Instruction::invalid(word),
        },
    }
}
