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

//! First pass: symbol recording, segment partitioning and sizing.
//!
//! The layout pass walks the program with a virtual program counter. It
//! binds labels, evaluates constants at their point of definition, splits
//! the output at every origin directive and computes the size of each
//! statement. Operand widths chosen here are binding for code generation,
//! so a forward reference is always sized as a two-byte address (a branch
//! is always one byte).

use super::eval::{Evaluator, Pass, Value};
use super::modes::select_mode;
use super::symbols::SymbolTable;
use crate::ast::{DataItem, Program, StatementKind};
use crate::convert::Width;
use crate::error::{CompileError, ErrorCode, Span};

/// One past the highest address.
const ADDRESS_SPACE: u32 = 0x10000;

/// A planned output segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Load address.
    pub start: u16,
    /// Number of bytes the segment will hold.
    pub len: usize,
}

/// Result of the layout pass.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Labels and constants as known after the pass.
    pub symbols: SymbolTable,
    /// One plan for the default origin, then one per origin directive.
    pub segments: Vec<SegmentPlan>,
    /// Operand width reserved for each instruction statement.
    pub widths: Vec<Option<Width>>,
}

/// Run the layout pass.
pub fn layout(program: &Program, default_origin: u16) -> Result<Layout, CompileError> {
    let mut symbols = SymbolTable::new();
    let mut segments = vec![SegmentPlan {
        start: default_origin,
        len: 0,
    }];
    let mut widths = vec![None; program.statements.len()];
    let mut pc = default_origin as u32;

    for (index, statement) in program.statements.iter().enumerate() {
        let span = &statement.span;
        let here = pc as u16;

        let size: u32 = match &statement.kind {
            StatementKind::Label(name) => {
                if pc >= ADDRESS_SPACE {
                    return Err(address_overflow(span));
                }
                symbols.define_label(name, here, span.clone())?;
                0
            }
            StatementKind::Constant { name, value } => {
                let value = Evaluator::new(&symbols, here, Pass::Layout).evaluate(value)?;
                symbols.define_constant(name, value, span.clone())?;
                0
            }
            StatementKind::Origin(expr) => {
                let value = Evaluator::new(&symbols, here, Pass::Layout).evaluate(expr)?;
                let start = origin_address(value, &expr.span)?;
                segments.push(SegmentPlan { start, len: 0 });
                pc = start as u32;
                continue;
            }
            StatementKind::Instruction { mnemonic, operand } => {
                let width = match operand.expr() {
                    Some(expr) => Evaluator::new(&symbols, here, Pass::Layout)
                        .evaluate(expr)?
                        .width()
                        .unwrap_or(Width::Word),
                    None => Width::Byte,
                };
                let mode = select_mode(*mnemonic, operand, width, span)?;
                widths[index] = Some(width);
                mode.instruction_length() as u32
            }
            StatementKind::Bytes(items) => items
                .iter()
                .map(|item| match item {
                    DataItem::String(s) => s.len() as u32,
                    DataItem::Expr(_) => 1,
                })
                .sum(),
            StatementKind::Words(values) => 2 * values.len() as u32,
            StatementKind::Text {
                strings,
                zero_terminated,
            } => strings
                .iter()
                .map(|s| s.len() as u32 + u32::from(*zero_terminated))
                .sum(),
            StatementKind::Reserve { count, .. } => {
                let value = Evaluator::new(&symbols, here, Pass::Layout).evaluate(count)?;
                reserve_count(value, &count.span)?
            }
        };

        if size == 0 {
            continue;
        }
        pc += size;
        if pc > ADDRESS_SPACE {
            return Err(address_overflow(span));
        }
        if let Some(segment) = segments.last_mut() {
            segment.len += size as usize;
        }
    }

    Ok(Layout {
        symbols,
        segments,
        widths,
    })
}

fn address_overflow(span: &Span) -> CompileError {
    CompileError::new(
        ErrorCode::AddressOverflow,
        "program counter advanced past $FFFF",
        span.clone(),
    )
}

fn require_known(value: Value, what: &str, span: &Span) -> Result<(), CompileError> {
    if value.known {
        return Ok(());
    }
    Err(CompileError::new(
        ErrorCode::ConstantExpressionRequired,
        format!("{} must only use symbols defined before it", what),
        span.clone(),
    ))
}

fn origin_address(value: Value, span: &Span) -> Result<u16, CompileError> {
    require_known(value, "origin", span)?;
    u16::try_from(value.value).map_err(|_| {
        CompileError::new(
            ErrorCode::AddressOverflow,
            format!("origin {} is outside $0000-$FFFF", value.value),
            span.clone(),
        )
    })
}

fn reserve_count(value: Value, span: &Span) -> Result<u32, CompileError> {
    require_known(value, "reserve count", span)?;
    match u32::try_from(value.value) {
        Ok(count) if count <= ADDRESS_SPACE => Ok(count),
        _ => Err(CompileError::new(
            ErrorCode::WordOutOfRange,
            format!("reserve count {} is outside 0-65536", value.value),
            span.clone(),
        )),
    }
}
