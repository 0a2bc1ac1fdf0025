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

//! Instruction set lookup and addressing-mode selection.
//!
//! The `(mnemonic, mode) -> opcode` map is derived from the CPU's opcode
//! table, so the assembler accepts exactly what the interpreter executes.
//! Where an illegal opcode shares a mnemonic and mode with a documented one
//! (the `SBC #imm` alias at `$EB`), the documented encoding wins.

use crate::ast::Operand;
use crate::convert::Width;
use crate::cpu::{opcodes, AddressingMode, Mnemonic};
use crate::error::{CompileError, ErrorCode, Span};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Opcode byte per addressing mode of one mnemonic.
pub type ModeTable = HashMap<AddressingMode, u8>;

static INSTRUCTION_SET: OnceLock<HashMap<Mnemonic, ModeTable>> = OnceLock::new();

/// The `(mnemonic, mode) -> opcode` map.
pub fn instruction_set() -> &'static HashMap<Mnemonic, ModeTable> {
    INSTRUCTION_SET.get_or_init(|| {
        let mut set: HashMap<Mnemonic, ModeTable> = HashMap::new();
        // Documented opcodes first so they are never displaced.
        let ordered = opcodes::iter()
            .filter(|op| !op.illegal)
            .chain(opcodes::iter().filter(|op| op.illegal));
        for op in ordered {
            set.entry(op.mnemonic)
                .or_default()
                .entry(op.mode)
                .or_insert(op.code);
        }
        set
    })
}

/// Opcode byte for a mnemonic in a mode.
pub fn opcode_for(mnemonic: Mnemonic, mode: AddressingMode) -> Option<u8> {
    instruction_set().get(&mnemonic)?.get(&mode).copied()
}

/// Whether a mnemonic has an encoding in `mode`.
pub fn supports(mnemonic: Mnemonic, mode: AddressingMode) -> bool {
    opcode_for(mnemonic, mode).is_some()
}

/// Addressing modes a mnemonic supports, in canonical order.
pub fn modes_of(mnemonic: Mnemonic) -> Vec<AddressingMode> {
    AddressingMode::ALL
        .into_iter()
        .filter(|&mode| supports(mnemonic, mode))
        .collect()
}

/// Choose the addressing mode for an operand of the given width.
///
/// Branches always use relative addressing. One-byte operands use a zero
/// page mode when the mnemonic has one. `(expr)` on a mnemonic without
/// indirect addressing is a parenthesized direct operand.
pub fn select_mode(
    mnemonic: Mnemonic,
    operand: &Operand,
    width: Width,
    span: &Span,
) -> Result<AddressingMode, CompileError> {
    let sized = |zero_page: AddressingMode, absolute: AddressingMode| {
        if width == Width::Byte && supports(mnemonic, zero_page) {
            zero_page
        } else {
            absolute
        }
    };

    let mode = match operand {
        Operand::None if !supports(mnemonic, AddressingMode::Implied)
            && supports(mnemonic, AddressingMode::Accumulator) =>
        {
            AddressingMode::Accumulator
        }
        Operand::None => AddressingMode::Implied,
        Operand::Accumulator => AddressingMode::Accumulator,
        Operand::Immediate(_) => AddressingMode::Immediate,
        Operand::Direct(_) if mnemonic.is_branch() => AddressingMode::Relative,
        Operand::Direct(_) => sized(AddressingMode::ZeroPage, AddressingMode::Absolute),
        Operand::Indirect(_) if supports(mnemonic, AddressingMode::Indirect) => AddressingMode::Indirect,
        Operand::Indirect(_) if mnemonic.is_branch() => AddressingMode::Relative,
        Operand::Indirect(_) => sized(AddressingMode::ZeroPage, AddressingMode::Absolute),
        Operand::IndexedX(_) => sized(AddressingMode::ZeroPageX, AddressingMode::AbsoluteX),
        Operand::IndexedY(_) => sized(AddressingMode::ZeroPageY, AddressingMode::AbsoluteY),
        Operand::IndirectX(_) => AddressingMode::IndirectX,
        Operand::IndirectY(_) => AddressingMode::IndirectY,
    };

    if supports(mnemonic, mode) {
        return Ok(mode);
    }

    let supported: Vec<&str> = modes_of(mnemonic).into_iter().map(|m| m.name()).collect();
    Err(CompileError::new(
        ErrorCode::InvalidAddressingMode,
        format!("{} does not support {} addressing", mnemonic, mode.name()),
        span.clone(),
    )
    .with_hint(format!("{} supports: {}", mnemonic, supported.join(", "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind};

    fn expr() -> Expr {
        Expr::new(ExprKind::Number(0), Span::default())
    }

    fn select(mnemonic: Mnemonic, operand: Operand, width: Width) -> Result<AddressingMode, CompileError> {
        select_mode(mnemonic, &operand, width, &Span::default())
    }

    #[test]
    fn test_documented_encoding_preferred() {
        assert_eq!(opcode_for(Mnemonic::Sbc, AddressingMode::Immediate), Some(0xE9));
        assert_eq!(opcode_for(Mnemonic::Nop, AddressingMode::Implied), Some(0xEA));
        assert_eq!(opcode_for(Mnemonic::Lax, AddressingMode::ZeroPage), Some(0xA7));
    }

    #[test]
    fn test_lda_modes() {
        let modes = modes_of(Mnemonic::Lda);
        assert_eq!(modes.len(), 8);
        assert!(!modes.contains(&AddressingMode::Indirect));
    }

    #[test]
    fn test_zero_page_selection() {
        assert_eq!(select(Mnemonic::Lda, Operand::Direct(expr()), Width::Byte).unwrap(), AddressingMode::ZeroPage);
        assert_eq!(select(Mnemonic::Lda, Operand::Direct(expr()), Width::Word).unwrap(), AddressingMode::Absolute);
        assert_eq!(select(Mnemonic::Jmp, Operand::Direct(expr()), Width::Byte).unwrap(), AddressingMode::Absolute);
        // No zero page,Y form for LDA: falls back to absolute,Y.
        assert_eq!(select(Mnemonic::Lda, Operand::IndexedY(expr()), Width::Byte).unwrap(), AddressingMode::AbsoluteY);
        assert_eq!(select(Mnemonic::Ldx, Operand::IndexedY(expr()), Width::Byte).unwrap(), AddressingMode::ZeroPageY);
    }

    #[test]
    fn test_branch_is_relative() {
        assert_eq!(select(Mnemonic::Bne, Operand::Direct(expr()), Width::Word).unwrap(), AddressingMode::Relative);
    }

    #[test]
    fn test_implied_and_accumulator() {
        assert_eq!(select(Mnemonic::Rts, Operand::None, Width::Byte).unwrap(), AddressingMode::Implied);
        assert_eq!(select(Mnemonic::Asl, Operand::None, Width::Byte).unwrap(), AddressingMode::Accumulator);
        assert_eq!(select(Mnemonic::Asl, Operand::Accumulator, Width::Byte).unwrap(), AddressingMode::Accumulator);
    }

    #[test]
    fn test_parenthesized_direct_fallback() {
        assert_eq!(select(Mnemonic::Jmp, Operand::Indirect(expr()), Width::Word).unwrap(), AddressingMode::Indirect);
        assert_eq!(select(Mnemonic::Lda, Operand::Indirect(expr()), Width::Byte).unwrap(), AddressingMode::ZeroPage);
    }

    #[test]
    fn test_invalid_mode() {
        let err = select(Mnemonic::Sta, Operand::Immediate(expr()), Width::Byte).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddressingMode);
        assert_eq!(err.message, "STA does not support immediate addressing");
        assert!(err.hint.unwrap().starts_with("STA supports: zeropage"));
    }
}
