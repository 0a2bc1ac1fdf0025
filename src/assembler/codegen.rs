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

//! Second pass: operand resolution and byte emission.
//!
//! Code generation walks the same statements as the layout pass, with every
//! label now known. Bytes are appended to the buffer of the segment the
//! layout pass planned for them. Constants are re-evaluated where they are
//! defined so that values depending on forward labels become exact.

use super::eval::{Evaluator, Pass, Value};
use super::layout::Layout;
use super::modes::{opcode_for, select_mode};
use super::symbols::SymbolTable;
use crate::ast::{DataItem, Expr, Operand, Program, StatementKind};
use crate::convert::{to_byte, to_signed_byte, to_word, Width};
use crate::cpu::{AddressingMode, Mnemonic};
use crate::error::{CompileError, ErrorCode, Span};
use crate::segment::Segment;

/// Run the code generation pass. Returns the non-empty segments in origin
/// order together with the final symbol table.
pub fn generate(program: &Program, layout: Layout) -> Result<(Vec<Segment>, SymbolTable), CompileError> {
    let Layout {
        mut symbols,
        segments: plans,
        widths,
    } = layout;

    let mut buffers: Vec<Vec<u8>> = plans.iter().map(|p| Vec::with_capacity(p.len)).collect();
    let mut current = 0;
    let mut pc = plans.first().map_or(0, |p| p.start as u32);

    for (index, statement) in program.statements.iter().enumerate() {
        let span = &statement.span;
        let here = pc as u16;
        let mut out = Vec::new();

        match &statement.kind {
            StatementKind::Label(_) => {}
            StatementKind::Constant { name, value } => {
                let value = Evaluator::new(&symbols, here, Pass::Codegen).evaluate(value)?;
                symbols.update_constant(name, value);
            }
            StatementKind::Origin(_) => {
                current += 1;
                pc = plans.get(current).map_or(pc, |p| p.start as u32);
                continue;
            }
            StatementKind::Instruction { mnemonic, operand } => {
                let reserved = widths.get(index).copied().flatten().unwrap_or(Width::Byte);
                let eval = Evaluator::new(&symbols, here, Pass::Codegen);
                encode_instruction(&eval, *mnemonic, operand, reserved, here, span, &mut out)?;
            }
            StatementKind::Bytes(items) => {
                let eval = Evaluator::new(&symbols, here, Pass::Codegen);
                for item in items {
                    match item {
                        DataItem::String(s) => out.extend_from_slice(s.as_bytes()),
                        DataItem::Expr(expr) => out.push(byte_value(eval.evaluate(expr)?, expr)?),
                    }
                }
            }
            StatementKind::Words(values) => {
                let eval = Evaluator::new(&symbols, here, Pass::Codegen);
                for expr in values {
                    out.extend_from_slice(&word_value(eval.evaluate(expr)?, expr)?.to_le_bytes());
                }
            }
            StatementKind::Text {
                strings,
                zero_terminated,
            } => {
                for s in strings {
                    out.extend_from_slice(s.as_bytes());
                    if *zero_terminated {
                        out.push(0);
                    }
                }
            }
            StatementKind::Reserve { count, fill } => {
                let eval = Evaluator::new(&symbols, here, Pass::Codegen);
                let count = eval.evaluate(count)?.value.max(0) as usize;
                let fill = match fill {
                    Some(expr) => byte_value(eval.evaluate(expr)?, expr)?,
                    None => 0,
                };
                out.resize(count, fill);
            }
        }

        pc += out.len() as u32;
        if let Some(buffer) = buffers.get_mut(current) {
            buffer.extend_from_slice(&out);
        }
    }

    let segments = plans
        .iter()
        .zip(buffers)
        .filter(|(_, bytes)| !bytes.is_empty())
        .map(|(plan, bytes)| {
            debug_assert_eq!(plan.len, bytes.len());
            Segment::new(plan.start, bytes)
        })
        .collect();

    Ok((segments, symbols))
}

/// Encode one instruction into `out`.
fn encode_instruction(
    eval: &Evaluator,
    mnemonic: Mnemonic,
    operand: &Operand,
    reserved: Width,
    pc: u16,
    span: &Span,
    out: &mut Vec<u8>,
) -> Result<(), CompileError> {
    let expr = operand.expr();
    let value = expr.map(|e| eval.evaluate(e)).transpose()?;

    let natural = value.map_or(Width::Byte, |v| v.width().unwrap_or(Width::Word));
    if natural > reserved {
        if let (Some(value), Some(expr)) = (value, expr) {
            return Err(byte_range_error(value, expr));
        }
    }
    let mode = select_mode(mnemonic, operand, reserved, span)?;
    let opcode = opcode_for(mnemonic, mode).ok_or_else(|| {
        CompileError::new(
            ErrorCode::InvalidAddressingMode,
            format!("{} does not support {} addressing", mnemonic, mode.name()),
            span.clone(),
        )
    })?;
    out.push(opcode);

    let (Some(value), Some(expr)) = (value, expr) else {
        return Ok(());
    };

    match mode {
        AddressingMode::Relative => {
            let displacement = value.value - (pc as i64 + 2);
            let offset = to_signed_byte(displacement).ok_or_else(|| branch_error(expr, value, displacement))?;
            out.push(offset as u8);
        }
        _ if mode.operand_bytes() == 1 => out.push(byte_value(value, expr)?),
        _ => out.extend_from_slice(&word_value(value, expr)?.to_le_bytes()),
    }
    Ok(())
}

fn byte_value(value: Value, expr: &Expr) -> Result<u8, CompileError> {
    to_byte(value.value).ok_or_else(|| byte_range_error(value, expr))
}

fn word_value(value: Value, expr: &Expr) -> Result<u16, CompileError> {
    to_word(value.value).ok_or_else(|| {
        CompileError::new(
            ErrorCode::WordOutOfRange,
            format!("value {} does not fit in a word", value.value),
            expr.span.clone(),
        )
    })
}

fn byte_range_error(value: Value, expr: &Expr) -> CompileError {
    let error = CompileError::new(
        ErrorCode::ByteOutOfRange,
        format!("value {} does not fit in a byte", value.value),
        expr.span.clone(),
    );
    if value.is_address {
        error.with_hint("use <expr or >expr to select the low or high byte of an address")
    } else {
        error
    }
}

fn branch_error(expr: &Expr, value: Value, displacement: i64) -> CompileError {
    let target = match expr.as_symbol() {
        Some(name) => format!("'{}'", name),
        None => format!("${:04X}", value.value),
    };
    CompileError::new(
        ErrorCode::BranchOutOfRange,
        format!(
            "branch to {} is out of range (displacement {}, allowed -128..127)",
            target, displacement
        ),
        expr.span.clone(),
    )
    .with_hint("use the inverted branch around a JMP")
}
