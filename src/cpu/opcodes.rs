// Asm65 - A cycle-accurate 6502 interpreter and assembler creating C64 binaries
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The 256-slot opcode table.
//!
//! Each populated slot names a mnemonic, an addressing mode and the nominal
//! cycle count. The table is plain data built at compile time; execution
//! dispatches on the mnemonic tag. Undocumented opcodes are flagged
//! `illegal` so the assembler can prefer the documented encoding when a
//! mnemonic/mode pair has more than one.

use super::addressing::AddressingMode;

/// Instruction mnemonics, documented and undocumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
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
    Alr,
    Anc,
    Arr,
    Dcp,
    Dop,
    Isc,
    Lax,
    Rla,
    Rra,
    Sax,
    Slo,
    Sre,
    Top,
    Xaa,
}

impl Mnemonic {
    /// Upper-case assembler name.
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
            Mnemonic::Alr => "ALR",
            Mnemonic::Anc => "ANC",
            Mnemonic::Arr => "ARR",
            Mnemonic::Dcp => "DCP",
            Mnemonic::Dop => "DOP",
            Mnemonic::Isc => "ISC",
            Mnemonic::Lax => "LAX",
            Mnemonic::Rla => "RLA",
            Mnemonic::Rra => "RRA",
            Mnemonic::Sax => "SAX",
            Mnemonic::Slo => "SLO",
            Mnemonic::Sre => "SRE",
            Mnemonic::Top => "TOP",
            Mnemonic::Xaa => "XAA",
        }
    }

    /// Look up a mnemonic by name, case-insensitively.
    ///
    /// `SKB` and `SKW` are accepted as aliases of `DOP` and `TOP`.
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "SKB" => return Some(Mnemonic::Dop),
            "SKW" => return Some(Mnemonic::Top),
            _ => {}
        }
        OPCODES
            .iter()
            .flatten()
            .map(|op| op.mnemonic)
            .find(|m| m.name() == upper)
    }

    /// Conditional branches, the only users of relative addressing.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bmi
                | Mnemonic::Bne
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A decoded opcode slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// The opcode byte.
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Nominal cycle count, excluding page-cross and branch penalties.
    pub cycles: u8,
    /// Undocumented opcode.
    pub illegal: bool,
}

impl Opcode {
    /// Instruction length in bytes.
    pub const fn length(&self) -> u8 {
        self.mode.instruction_length()
    }
}

/// `NOP` implied, used to seed the CPU's execution context.
pub(crate) const NOP: Opcode = Opcode {
    code: 0xEA,
    mnemonic: Mnemonic::Nop,
    mode: AddressingMode::Implied,
    cycles: 2,
    illegal: false,
};

/// The opcode table, indexed by opcode byte.
pub static OPCODES: [Option<Opcode>; 256] = build_table();

/// Look up an opcode byte.
pub fn lookup(code: u8) -> Option<&'static Opcode> {
    OPCODES[code as usize].as_ref()
}

/// Iterate over every populated slot in opcode order.
pub fn iter() -> impl Iterator<Item = &'static Opcode> {
    OPCODES.iter().flatten()
}

const fn build_table() -> [Option<Opcode>; 256] {
    let mut table: [Option<Opcode>; 256] = [None; 256];
    let mut i = 0;
    while i < table::DEFINITIONS.len() {
        let (code, mnemonic, mode, cycles, illegal) = table::DEFINITIONS[i];
        table[code as usize] = Some(Opcode {
            code,
            mnemonic,
            mode,
            cycles,
            illegal,
        });
        i += 1;
    }
    table
}

mod table {
    use super::AddressingMode::*;
    use super::Mnemonic::{self, *};
    use super::AddressingMode;

    const D: bool = false;
    const U: bool = true;

    #[rustfmt::skip]
    pub(super) const DEFINITIONS: &[(u8, Mnemonic, AddressingMode, u8, bool)] = &[
        // Loads and stores
        (0xA9, Lda, Immediate, 2, D), (0xA5, Lda, ZeroPage, 3, D), (0xB5, Lda, ZeroPageX, 4, D),
        (0xAD, Lda, Absolute, 4, D), (0xBD, Lda, AbsoluteX, 4, D), (0xB9, Lda, AbsoluteY, 4, D),
        (0xA1, Lda, IndirectX, 6, D), (0xB1, Lda, IndirectY, 5, D),
        (0xA2, Ldx, Immediate, 2, D), (0xA6, Ldx, ZeroPage, 3, D), (0xB6, Ldx, ZeroPageY, 4, D),
        (0xAE, Ldx, Absolute, 4, D), (0xBE, Ldx, AbsoluteY, 4, D),
        (0xA0, Ldy, Immediate, 2, D), (0xA4, Ldy, ZeroPage, 3, D), (0xB4, Ldy, ZeroPageX, 4, D),
        (0xAC, Ldy, Absolute, 4, D), (0xBC, Ldy, AbsoluteX, 4, D),
        (0x85, Sta, ZeroPage, 3, D), (0x95, Sta, ZeroPageX, 4, D), (0x8D, Sta, Absolute, 4, D),
        (0x9D, Sta, AbsoluteX, 5, D), (0x99, Sta, AbsoluteY, 5, D), (0x81, Sta, IndirectX, 6, D),
        (0x91, Sta, IndirectY, 6, D),
        (0x86, Stx, ZeroPage, 3, D), (0x96, Stx, ZeroPageY, 4, D), (0x8E, Stx, Absolute, 4, D),
        (0x84, Sty, ZeroPage, 3, D), (0x94, Sty, ZeroPageX, 4, D), (0x8C, Sty, Absolute, 4, D),

        // Arithmetic and logic
        (0x69, Adc, Immediate, 2, D), (0x65, Adc, ZeroPage, 3, D), (0x75, Adc, ZeroPageX, 4, D),
        (0x6D, Adc, Absolute, 4, D), (0x7D, Adc, AbsoluteX, 4, D), (0x79, Adc, AbsoluteY, 4, D),
        (0x61, Adc, IndirectX, 6, D), (0x71, Adc, IndirectY, 5, D),
        (0xE9, Sbc, Immediate, 2, D), (0xE5, Sbc, ZeroPage, 3, D), (0xF5, Sbc, ZeroPageX, 4, D),
        (0xED, Sbc, Absolute, 4, D), (0xFD, Sbc, AbsoluteX, 4, D), (0xF9, Sbc, AbsoluteY, 4, D),
        (0xE1, Sbc, IndirectX, 6, D), (0xF1, Sbc, IndirectY, 5, D),
        (0x29, And, Immediate, 2, D), (0x25, And, ZeroPage, 3, D), (0x35, And, ZeroPageX, 4, D),
        (0x2D, And, Absolute, 4, D), (0x3D, And, AbsoluteX, 4, D), (0x39, And, AbsoluteY, 4, D),
        (0x21, And, IndirectX, 6, D), (0x31, And, IndirectY, 5, D),
        (0x09, Ora, Immediate, 2, D), (0x05, Ora, ZeroPage, 3, D), (0x15, Ora, ZeroPageX, 4, D),
        (0x0D, Ora, Absolute, 4, D), (0x1D, Ora, AbsoluteX, 4, D), (0x19, Ora, AbsoluteY, 4, D),
        (0x01, Ora, IndirectX, 6, D), (0x11, Ora, IndirectY, 5, D),
        (0x49, Eor, Immediate, 2, D), (0x45, Eor, ZeroPage, 3, D), (0x55, Eor, ZeroPageX, 4, D),
        (0x4D, Eor, Absolute, 4, D), (0x5D, Eor, AbsoluteX, 4, D), (0x59, Eor, AbsoluteY, 4, D),
        (0x41, Eor, IndirectX, 6, D), (0x51, Eor, IndirectY, 5, D),
        (0xC9, Cmp, Immediate, 2, D), (0xC5, Cmp, ZeroPage, 3, D), (0xD5, Cmp, ZeroPageX, 4, D),
        (0xCD, Cmp, Absolute, 4, D), (0xDD, Cmp, AbsoluteX, 4, D), (0xD9, Cmp, AbsoluteY, 4, D),
        (0xC1, Cmp, IndirectX, 6, D), (0xD1, Cmp, IndirectY, 5, D),
        (0xE0, Cpx, Immediate, 2, D), (0xE4, Cpx, ZeroPage, 3, D), (0xEC, Cpx, Absolute, 4, D),
        (0xC0, Cpy, Immediate, 2, D), (0xC4, Cpy, ZeroPage, 3, D), (0xCC, Cpy, Absolute, 4, D),
        (0x24, Bit, ZeroPage, 3, D), (0x2C, Bit, Absolute, 4, D),

        // Shifts and rotates
        (0x0A, Asl, Accumulator, 2, D), (0x06, Asl, ZeroPage, 5, D), (0x16, Asl, ZeroPageX, 6, D),
        (0x0E, Asl, Absolute, 6, D), (0x1E, Asl, AbsoluteX, 7, D),
        (0x4A, Lsr, Accumulator, 2, D), (0x46, Lsr, ZeroPage, 5, D), (0x56, Lsr, ZeroPageX, 6, D),
        (0x4E, Lsr, Absolute, 6, D), (0x5E, Lsr, AbsoluteX, 7, D),
        (0x2A, Rol, Accumulator, 2, D), (0x26, Rol, ZeroPage, 5, D), (0x36, Rol, ZeroPageX, 6, D),
        (0x2E, Rol, Absolute, 6, D), (0x3E, Rol, AbsoluteX, 7, D),
        (0x6A, Ror, Accumulator, 2, D), (0x66, Ror, ZeroPage, 5, D), (0x76, Ror, ZeroPageX, 6, D),
        (0x6E, Ror, Absolute, 6, D), (0x7E, Ror, AbsoluteX, 7, D),

        // Increments and decrements
        (0xE6, Inc, ZeroPage, 5, D), (0xF6, Inc, ZeroPageX, 6, D), (0xEE, Inc, Absolute, 6, D),
        (0xFE, Inc, AbsoluteX, 7, D),
        (0xC6, Dec, ZeroPage, 5, D), (0xD6, Dec, ZeroPageX, 6, D), (0xCE, Dec, Absolute, 6, D),
        (0xDE, Dec, AbsoluteX, 7, D),
        (0xE8, Inx, Implied, 2, D), (0xC8, Iny, Implied, 2, D),
        (0xCA, Dex, Implied, 2, D), (0x88, Dey, Implied, 2, D),

        // Branches
        (0x90, Bcc, Relative, 2, D), (0xB0, Bcs, Relative, 2, D), (0xF0, Beq, Relative, 2, D),
        (0x30, Bmi, Relative, 2, D), (0xD0, Bne, Relative, 2, D), (0x10, Bpl, Relative, 2, D),
        (0x50, Bvc, Relative, 2, D), (0x70, Bvs, Relative, 2, D),

        // Control flow
        (0x4C, Jmp, Absolute, 3, D), (0x6C, Jmp, Indirect, 5, D), (0x20, Jsr, Absolute, 6, D),
        (0x60, Rts, Implied, 6, D), (0x40, Rti, Implied, 6, D), (0x00, Brk, Implied, 7, D),
        (0xEA, Nop, Implied, 2, D),

        // Stack
        (0x48, Pha, Implied, 3, D), (0x08, Php, Implied, 3, D),
        (0x68, Pla, Implied, 4, D), (0x28, Plp, Implied, 4, D),

        // Flags
        (0x18, Clc, Implied, 2, D), (0x38, Sec, Implied, 2, D), (0x58, Cli, Implied, 2, D),
        (0x78, Sei, Implied, 2, D), (0xB8, Clv, Implied, 2, D), (0xD8, Cld, Implied, 2, D),
        (0xF8, Sed, Implied, 2, D),

        // Transfers
        (0xAA, Tax, Implied, 2, D), (0xA8, Tay, Implied, 2, D), (0xBA, Tsx, Implied, 2, D),
        (0x8A, Txa, Implied, 2, D), (0x9A, Txs, Implied, 2, D), (0x98, Tya, Implied, 2, D),

        // Undocumented read-modify-write combos
        (0x07, Slo, ZeroPage, 5, U), (0x17, Slo, ZeroPageX, 6, U), (0x0F, Slo, Absolute, 6, U),
        (0x1F, Slo, AbsoluteX, 7, U), (0x1B, Slo, AbsoluteY, 7, U), (0x03, Slo, IndirectX, 8, U),
        (0x13, Slo, IndirectY, 8, U),
        (0x27, Rla, ZeroPage, 5, U), (0x37, Rla, ZeroPageX, 6, U), (0x2F, Rla, Absolute, 6, U),
        (0x3F, Rla, AbsoluteX, 7, U), (0x3B, Rla, AbsoluteY, 7, U), (0x23, Rla, IndirectX, 8, U),
        (0x33, Rla, IndirectY, 8, U),
        (0x47, Sre, ZeroPage, 5, U), (0x57, Sre, ZeroPageX, 6, U), (0x4F, Sre, Absolute, 6, U),
        (0x5F, Sre, AbsoluteX, 7, U), (0x5B, Sre, AbsoluteY, 7, U), (0x43, Sre, IndirectX, 8, U),
        (0x53, Sre, IndirectY, 8, U),
        (0x67, Rra, ZeroPage, 5, U), (0x77, Rra, ZeroPageX, 6, U), (0x6F, Rra, Absolute, 6, U),
        (0x7F, Rra, AbsoluteX, 7, U), (0x7B, Rra, AbsoluteY, 7, U), (0x63, Rra, IndirectX, 8, U),
        (0x73, Rra, IndirectY, 8, U),
        (0xC7, Dcp, ZeroPage, 5, U), (0xD7, Dcp, ZeroPageX, 6, U), (0xCF, Dcp, Absolute, 6, U),
        (0xDF, Dcp, AbsoluteX, 7, U), (0xDB, Dcp, AbsoluteY, 7, U), (0xC3, Dcp, IndirectX, 8, U),
        (0xD3, Dcp, IndirectY, 8, U),
        (0xE7, Isc, ZeroPage, 5, U), (0xF7, Isc, ZeroPageX, 6, U), (0xEF, Isc, Absolute, 6, U),
        (0xFF, Isc, AbsoluteX, 7, U), (0xFB, Isc, AbsoluteY, 7, U), (0xE3, Isc, IndirectX, 8, U),
        (0xF3, Isc, IndirectY, 8, U),

        // Undocumented loads and stores
        (0xA7, Lax, ZeroPage, 3, U), (0xB7, Lax, ZeroPageY, 4, U), (0xAF, Lax, Absolute, 4, U),
        (0xBF, Lax, AbsoluteY, 4, U), (0xA3, Lax, IndirectX, 6, U), (0xB3, Lax, IndirectY, 5, U),
        (0x87, Sax, ZeroPage, 3, U), (0x97, Sax, ZeroPageY, 4, U), (0x8F, Sax, Absolute, 4, U),
        (0x83, Sax, IndirectX, 6, U),

        // Undocumented immediate ALU ops
        (0x0B, Anc, Immediate, 2, U), (0x2B, Anc, Immediate, 2, U),
        (0x4B, Alr, Immediate, 2, U), (0x6B, Arr, Immediate, 2, U),
        (0x8B, Xaa, Immediate, 2, U), (0xEB, Sbc, Immediate, 2, U),

        // Undocumented NOPs
        (0x1A, Nop, Implied, 2, U), (0x3A, Nop, Implied, 2, U), (0x5A, Nop, Implied, 2, U),
        (0x7A, Nop, Implied, 2, U), (0xDA, Nop, Implied, 2, U), (0xFA, Nop, Implied, 2, U),
        (0x80, Dop, Immediate, 2, U), (0x82, Dop, Immediate, 2, U), (0x89, Dop, Immediate, 2, U),
        (0xC2, Dop, Immediate, 2, U), (0xE2, Dop, Immediate, 2, U),
        (0x04, Dop, ZeroPage, 3, U), (0x44, Dop, ZeroPage, 3, U), (0x64, Dop, ZeroPage, 3, U),
        (0x14, Dop, ZeroPageX, 4, U), (0x34, Dop, ZeroPageX, 4, U), (0x54, Dop, ZeroPageX, 4, U),
        (0x74, Dop, ZeroPageX, 4, U), (0xD4, Dop, ZeroPageX, 4, U), (0xF4, Dop, ZeroPageX, 4, U),
        (0x0C, Top, Absolute, 4, U),
        (0x1C, Top, AbsoluteX, 4, U), (0x3C, Top, AbsoluteX, 4, U), (0x5C, Top, AbsoluteX, 4, U),
        (0x7C, Top, AbsoluteX, 4, U), (0xDC, Top, AbsoluteX, 4, U), (0xFC, Top, AbsoluteX, 4, U),
    ];
}
