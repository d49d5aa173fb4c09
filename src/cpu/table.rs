/*!
table.rs - The 256-entry 6502 decode table.

Overview
========
Every opcode byte maps to exactly one `InstructionRecord`: mnemonic,
addressing mode, base cycle count, whether an indexed read pays +1 cycle on
a page cross, and whether the opcode is part of the documented instruction
set. The table is a `static` built from `const fn` constructors, so lookup
is a single index with no runtime initialization.

Undocumented opcodes are present with their published length and timing;
what the CPU does with them is decided by `IllegalOpcodePolicy` in the
dispatcher, not here.

Branch penalties (+1 taken, +2 taken across a page) are dynamic and applied
by the branch handler; branch records carry only the 2-cycle base.
*/

use std::fmt;

use crate::cpu::addressing::AddressingMode;

/// Instruction mnemonics, documented set first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented
    Slo,
    Rla,
    Sre,
    Rra,
    Sax,
    Lax,
    Dcp,
    Isc,
    Anc,
    Alr,
    Arr,
    Ane,
    Lxa,
    Sbx,
    Sha,
    Shx,
    Shy,
    Tas,
    Las,
    Usbc,
    Jam,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Slo => "SLO",
            Rla => "RLA",
            Sre => "SRE",
            Rra => "RRA",
            Sax => "SAX",
            Lax => "LAX",
            Dcp => "DCP",
            Isc => "ISC",
            Anc => "ANC",
            Alr => "ALR",
            Arr => "ARR",
            Ane => "ANE",
            Lxa => "LXA",
            Sbx => "SBX",
            Sha => "SHA",
            Shx => "SHX",
            Shy => "SHY",
            Tas => "TAS",
            Las => "LAS",
            Usbc => "SBC",
            Jam => "JAM",
        }
    }

    /// Conditional relative branch.
    pub fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionRecord {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
    /// +1 cycle when the indexed effective address crosses a page.
    pub page_penalty: bool,
    pub official: bool,
}

impl InstructionRecord {
    /// Total instruction length in bytes (opcode + operand).
    #[inline]
    pub fn len(&self) -> u8 {
        1 + self.mode.operand_len()
    }
}

/// Look up the record for `opcode`.
#[inline]
pub fn lookup(opcode: u8) -> &'static InstructionRecord {
    &INSTRUCTIONS[opcode as usize]
}

/// The full table, indexed by opcode.
pub fn instructions() -> &'static [InstructionRecord; 256] {
    &INSTRUCTIONS
}

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

const fn rec(
    opcode: u8,
    mnemonic: Mnemonic,
    mode: AddressingMode,
    cycles: u8,
    page_penalty: bool,
    official: bool,
) -> InstructionRecord {
    InstructionRecord {
        opcode,
        mnemonic,
        mode,
        cycles,
        page_penalty,
        official,
    }
}

const fn op(opcode: u8, m: Mnemonic, mode: AddressingMode, cycles: u8) -> InstructionRecord {
    rec(opcode, m, mode, cycles, false, true)
}

const fn op_p(opcode: u8, m: Mnemonic, mode: AddressingMode, cycles: u8) -> InstructionRecord {
    rec(opcode, m, mode, cycles, true, true)
}

const fn ill(opcode: u8, m: Mnemonic, mode: AddressingMode, cycles: u8) -> InstructionRecord {
    rec(opcode, m, mode, cycles, false, false)
}

const fn ill_p(opcode: u8, m: Mnemonic, mode: AddressingMode, cycles: u8) -> InstructionRecord {
    rec(opcode, m, mode, cycles, true, false)
}

const fn jam(opcode: u8) -> InstructionRecord {
    rec(opcode, Mnemonic::Jam, AddressingMode::Implied, 2, false, false)
}

use AddressingMode::{
    Absolute as ABS, AbsoluteX as ABX, AbsoluteY as ABY, Accumulator as ACC, Immediate as IMM,
    Implied as IMP, IndexedIndirect as IZX, Indirect as IND, IndirectIndexed as IZY,
    Relative as REL, ZeroPage as ZP, ZeroPageX as ZPX, ZeroPageY as ZPY,
};
use Mnemonic::*;

#[rustfmt::skip]
static INSTRUCTIONS: [InstructionRecord; 256] = [
    // 0x00
    op(0x00, Brk, IMP, 7),   op(0x01, Ora, IZX, 6),   jam(0x02),               ill(0x03, Slo, IZX, 8),
    ill(0x04, Nop, ZP, 3),   op(0x05, Ora, ZP, 3),    op(0x06, Asl, ZP, 5),    ill(0x07, Slo, ZP, 5),
    op(0x08, Php, IMP, 3),   op(0x09, Ora, IMM, 2),   op(0x0A, Asl, ACC, 2),   ill(0x0B, Anc, IMM, 2),
    ill(0x0C, Nop, ABS, 4),  op(0x0D, Ora, ABS, 4),   op(0x0E, Asl, ABS, 6),   ill(0x0F, Slo, ABS, 6),
    // 0x10
    op(0x10, Bpl, REL, 2),   op_p(0x11, Ora, IZY, 5), jam(0x12),               ill(0x13, Slo, IZY, 8),
    ill(0x14, Nop, ZPX, 4),  op(0x15, Ora, ZPX, 4),   op(0x16, Asl, ZPX, 6),   ill(0x17, Slo, ZPX, 6),
    op(0x18, Clc, IMP, 2),   op_p(0x19, Ora, ABY, 4), ill(0x1A, Nop, IMP, 2),  ill(0x1B, Slo, ABY, 7),
    ill_p(0x1C, Nop, ABX, 4), op_p(0x1D, Ora, ABX, 4), op(0x1E, Asl, ABX, 7),  ill(0x1F, Slo, ABX, 7),
    // 0x20
    op(0x20, Jsr, ABS, 6),   op(0x21, And, IZX, 6),   jam(0x22),               ill(0x23, Rla, IZX, 8),
    op(0x24, Bit, ZP, 3),    op(0x25, And, ZP, 3),    op(0x26, Rol, ZP, 5),    ill(0x27, Rla, ZP, 5),
    op(0x28, Plp, IMP, 4),   op(0x29, And, IMM, 2),   op(0x2A, Rol, ACC, 2),   ill(0x2B, Anc, IMM, 2),
    op(0x2C, Bit, ABS, 4),   op(0x2D, And, ABS, 4),   op(0x2E, Rol, ABS, 6),   ill(0x2F, Rla, ABS, 6),
    // 0x30
    op(0x30, Bmi, REL, 2),   op_p(0x31, And, IZY, 5), jam(0x32),               ill(0x33, Rla, IZY, 8),
    ill(0x34, Nop, ZPX, 4),  op(0x35, And, ZPX, 4),   op(0x36, Rol, ZPX, 6),   ill(0x37, Rla, ZPX, 6),
    op(0x38, Sec, IMP, 2),   op_p(0x39, And, ABY, 4), ill(0x3A, Nop, IMP, 2),  ill(0x3B, Rla, ABY, 7),
    ill_p(0x3C, Nop, ABX, 4), op_p(0x3D, And, ABX, 4), op(0x3E, Rol, ABX, 7),  ill(0x3F, Rla, ABX, 7),
    // 0x40
    op(0x40, Rti, IMP, 6),   op(0x41, Eor, IZX, 6),   jam(0x42),               ill(0x43, Sre, IZX, 8),
    ill(0x44, Nop, ZP, 3),   op(0x45, Eor, ZP, 3),    op(0x46, Lsr, ZP, 5),    ill(0x47, Sre, ZP, 5),
    op(0x48, Pha, IMP, 3),   op(0x49, Eor, IMM, 2),   op(0x4A, Lsr, ACC, 2),   ill(0x4B, Alr, IMM, 2),
    op(0x4C, Jmp, ABS, 3),   op(0x4D, Eor, ABS, 4),   op(0x4E, Lsr, ABS, 6),   ill(0x4F, Sre, ABS, 6),
    // 0x50
    op(0x50, Bvc, REL, 2),   op_p(0x51, Eor, IZY, 5), jam(0x52),               ill(0x53, Sre, IZY, 8),
    ill(0x54, Nop, ZPX, 4),  op(0x55, Eor, ZPX, 4),   op(0x56, Lsr, ZPX, 6),   ill(0x57, Sre, ZPX, 6),
    op(0x58, Cli, IMP, 2),   op_p(0x59, Eor, ABY, 4), ill(0x5A, Nop, IMP, 2),  ill(0x5B, Sre, ABY, 7),
    ill_p(0x5C, Nop, ABX, 4), op_p(0x5D, Eor, ABX, 4), op(0x5E, Lsr, ABX, 7),  ill(0x5F, Sre, ABX, 7),
    // 0x60
    op(0x60, Rts, IMP, 6),   op(0x61, Adc, IZX, 6),   jam(0x62),               ill(0x63, Rra, IZX, 8),
    ill(0x64, Nop, ZP, 3),   op(0x65, Adc, ZP, 3),    op(0x66, Ror, ZP, 5),    ill(0x67, Rra, ZP, 5),
    op(0x68, Pla, IMP, 4),   op(0x69, Adc, IMM, 2),   op(0x6A, Ror, ACC, 2),   ill(0x6B, Arr, IMM, 2),
    op(0x6C, Jmp, IND, 5),   op(0x6D, Adc, ABS, 4),   op(0x6E, Ror, ABS, 6),   ill(0x6F, Rra, ABS, 6),
    // 0x70
    op(0x70, Bvs, REL, 2),   op_p(0x71, Adc, IZY, 5), jam(0x72),               ill(0x73, Rra, IZY, 8),
    ill(0x74, Nop, ZPX, 4),  op(0x75, Adc, ZPX, 4),   op(0x76, Ror, ZPX, 6),   ill(0x77, Rra, ZPX, 6),
    op(0x78, Sei, IMP, 2),   op_p(0x79, Adc, ABY, 4), ill(0x7A, Nop, IMP, 2),  ill(0x7B, Rra, ABY, 7),
    ill_p(0x7C, Nop, ABX, 4), op_p(0x7D, Adc, ABX, 4), op(0x7E, Ror, ABX, 7),  ill(0x7F, Rra, ABX, 7),
    // 0x80
    ill(0x80, Nop, IMM, 2),  op(0x81, Sta, IZX, 6),   ill(0x82, Nop, IMM, 2),  ill(0x83, Sax, IZX, 6),
    op(0x84, Sty, ZP, 3),    op(0x85, Sta, ZP, 3),    op(0x86, Stx, ZP, 3),    ill(0x87, Sax, ZP, 3),
    op(0x88, Dey, IMP, 2),   ill(0x89, Nop, IMM, 2),  op(0x8A, Txa, IMP, 2),   ill(0x8B, Ane, IMM, 2),
    op(0x8C, Sty, ABS, 4),   op(0x8D, Sta, ABS, 4),   op(0x8E, Stx, ABS, 4),   ill(0x8F, Sax, ABS, 4),
    // 0x90
    op(0x90, Bcc, REL, 2),   op(0x91, Sta, IZY, 6),   jam(0x92),               ill(0x93, Sha, IZY, 6),
    op(0x94, Sty, ZPX, 4),   op(0x95, Sta, ZPX, 4),   op(0x96, Stx, ZPY, 4),   ill(0x97, Sax, ZPY, 4),
    op(0x98, Tya, IMP, 2),   op(0x99, Sta, ABY, 5),   op(0x9A, Txs, IMP, 2),   ill(0x9B, Tas, ABY, 5),
    ill(0x9C, Shy, ABX, 5),  op(0x9D, Sta, ABX, 5),   ill(0x9E, Shx, ABY, 5),  ill(0x9F, Sha, ABY, 5),
    // 0xA0
    op(0xA0, Ldy, IMM, 2),   op(0xA1, Lda, IZX, 6),   op(0xA2, Ldx, IMM, 2),   ill(0xA3, Lax, IZX, 6),
    op(0xA4, Ldy, ZP, 3),    op(0xA5, Lda, ZP, 3),    op(0xA6, Ldx, ZP, 3),    ill(0xA7, Lax, ZP, 3),
    op(0xA8, Tay, IMP, 2),   op(0xA9, Lda, IMM, 2),   op(0xAA, Tax, IMP, 2),   ill(0xAB, Lxa, IMM, 2),
    op(0xAC, Ldy, ABS, 4),   op(0xAD, Lda, ABS, 4),   op(0xAE, Ldx, ABS, 4),   ill(0xAF, Lax, ABS, 4),
    // 0xB0
    op(0xB0, Bcs, REL, 2),   op_p(0xB1, Lda, IZY, 5), jam(0xB2),               ill_p(0xB3, Lax, IZY, 5),
    op(0xB4, Ldy, ZPX, 4),   op(0xB5, Lda, ZPX, 4),   op(0xB6, Ldx, ZPY, 4),   ill(0xB7, Lax, ZPY, 4),
    op(0xB8, Clv, IMP, 2),   op_p(0xB9, Lda, ABY, 4), op(0xBA, Tsx, IMP, 2),   ill_p(0xBB, Las, ABY, 4),
    op_p(0xBC, Ldy, ABX, 4), op_p(0xBD, Lda, ABX, 4), op_p(0xBE, Ldx, ABY, 4), ill_p(0xBF, Lax, ABY, 4),
    // 0xC0
    op(0xC0, Cpy, IMM, 2),   op(0xC1, Cmp, IZX, 6),   ill(0xC2, Nop, IMM, 2),  ill(0xC3, Dcp, IZX, 8),
    op(0xC4, Cpy, ZP, 3),    op(0xC5, Cmp, ZP, 3),    op(0xC6, Dec, ZP, 5),    ill(0xC7, Dcp, ZP, 5),
    op(0xC8, Iny, IMP, 2),   op(0xC9, Cmp, IMM, 2),   op(0xCA, Dex, IMP, 2),   ill(0xCB, Sbx, IMM, 2),
    op(0xCC, Cpy, ABS, 4),   op(0xCD, Cmp, ABS, 4),   op(0xCE, Dec, ABS, 6),   ill(0xCF, Dcp, ABS, 6),
    // 0xD0
    op(0xD0, Bne, REL, 2),   op_p(0xD1, Cmp, IZY, 5), jam(0xD2),               ill(0xD3, Dcp, IZY, 8),
    ill(0xD4, Nop, ZPX, 4),  op(0xD5, Cmp, ZPX, 4),   op(0xD6, Dec, ZPX, 6),   ill(0xD7, Dcp, ZPX, 6),
    op(0xD8, Cld, IMP, 2),   op_p(0xD9, Cmp, ABY, 4), ill(0xDA, Nop, IMP, 2),  ill(0xDB, Dcp, ABY, 7),
    ill_p(0xDC, Nop, ABX, 4), op_p(0xDD, Cmp, ABX, 4), op(0xDE, Dec, ABX, 7),  ill(0xDF, Dcp, ABX, 7),
    // 0xE0
    op(0xE0, Cpx, IMM, 2),   op(0xE1, Sbc, IZX, 6),   ill(0xE2, Nop, IMM, 2),  ill(0xE3, Isc, IZX, 8),
    op(0xE4, Cpx, ZP, 3),    op(0xE5, Sbc, ZP, 3),    op(0xE6, Inc, ZP, 5),    ill(0xE7, Isc, ZP, 5),
    op(0xE8, Inx, IMP, 2),   op(0xE9, Sbc, IMM, 2),   op(0xEA, Nop, IMP, 2),   ill(0xEB, Usbc, IMM, 2),
    op(0xEC, Cpx, ABS, 4),   op(0xED, Sbc, ABS, 4),   op(0xEE, Inc, ABS, 6),   ill(0xEF, Isc, ABS, 6),
    // 0xF0
    op(0xF0, Beq, REL, 2),   op_p(0xF1, Sbc, IZY, 5), jam(0xF2),               ill(0xF3, Isc, IZY, 8),
    ill(0xF4, Nop, ZPX, 4),  op(0xF5, Sbc, ZPX, 4),   op(0xF6, Inc, ZPX, 6),   ill(0xF7, Isc, ZPX, 6),
    op(0xF8, Sed, IMP, 2),   op_p(0xF9, Sbc, ABY, 4), ill(0xFA, Nop, IMP, 2),  ill(0xFB, Isc, ABY, 7),
    ill_p(0xFC, Nop, ABX, 4), op_p(0xFD, Sbc, ABX, 4), op(0xFE, Inc, ABX, 7),  ill(0xFF, Isc, ABX, 7),
];
