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


use super::Expr;
use crate::cpu::Mnemonic;
use crate::error::Span;

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The kind of statement.
    pub kind: StatementKind,
    /// The source span of this statement.
    pub span: Span,
}

impl Statement {
    /// Create a new statement.
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name:` - bind `name` to the current PC.
    Label(String),

    /// `name = expr` or `.EQU name = expr`.
    Constant { name: String, value: Expr },

    /// `.ORG expr` or `*= expr`.
    Origin(Expr),

    /// A machine instruction.
    Instruction { mnemonic: Mnemonic, operand: Operand },

    /// `.BYTE`/`.DB` values; strings contribute their bytes.
    Bytes(Vec<DataItem>),

    /// `.WORD`/`.DW` values, little-endian.
    Words(Vec<Expr>),

    /// `.TEXT` family and `.ASCIIZ`.
    Text {
        strings: Vec<String>,
        zero_terminated: bool,
    },

    /// `.DS count[, fill]`.
    Reserve { count: Expr, fill: Option<Expr> },
}

/// One value in a `.BYTE` list.
#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    Expr(Expr),
    String(String),
}

/// The syntactic shape of an instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand.
    None,
    /// `A`
    Accumulator,
    /// `#expr`
    Immediate(Expr),
    /// `expr` - zero page, absolute or relative.
    Direct(Expr),
    /// `expr,X`
    IndexedX(Expr),
    /// `expr,Y`
    IndexedY(Expr),
    /// `(expr)`
    Indirect(Expr),
    /// `(expr,X)`
    IndirectX(Expr),
    /// `(expr),Y`
    IndirectY(Expr),
}

impl Operand {
    /// The operand expression, if any.
    pub fn expr(&self) -> Option<&Expr> {
        match self {
            Operand::None | Operand::Accumulator => None,
            Operand::Immediate(e)
            | Operand::Direct(e)
            | Operand::IndexedX(e)
            | Operand::IndexedY(e)
            | Operand::Indirect(e)
            | Operand::IndirectX(e)
            | Operand::IndirectY(e) => Some(e),
        }
    }

    /// Operand shape as written, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Operand::None => "no operand",
            Operand::Accumulator => "accumulator",
            Operand::Immediate(_) => "immediate",
            Operand::Direct(_) => "direct",
            Operand::IndexedX(_) => "indexed X",
            Operand::IndexedY(_) => "indexed Y",
            Operand::Indirect(_) => "indirect",
            Operand::IndirectX(_) => "indexed indirect",
            Operand::IndirectY(_) => "indirect indexed",
        }
    }
}
