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

//! Instruction operand parsing.
//!
//! Operands are classified by shape only; which addressing mode a shape
//! maps to is decided by the assembler once operand widths are known.
//!
//! `(expr)` is ambiguous between an indirect operand and a parenthesized
//! expression. It is read as indirect when nothing follows the closing
//! parenthesis; otherwise (`(base)+1`, `(ptr),X`) the parser backtracks and
//! reads the whole operand as an expression.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{Expr, Operand};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for operand parsing.
pub trait OperandParser {
    /// Parse the operand following a mnemonic, up to the end of the line.
    fn parse_operand(&mut self) -> Result<Operand, CompileError>;

    /// Parse `(expr,X)`, `(expr),Y` or `(expr)`. Returns `None` when the
    /// tokens are a parenthesized expression instead.
    fn parse_parenthesized_operand(&mut self) -> Result<Option<Operand>, CompileError>;

    /// Parse an optional `,X` / `,Y` suffix after a direct operand.
    fn parse_index_suffix(&mut self, expr: Expr) -> Result<Operand, CompileError>;
}

impl<'a> OperandParser for Parser<'a> {
    fn parse_operand(&mut self) -> Result<Operand, CompileError> {
        if self.at_line_end() {
            return Ok(Operand::None);
        }

        if let Some(Token::Identifier(name)) = self.peek() {
            if name.eq_ignore_ascii_case("A") && self.peek_ahead(1).map_or(true, Token::is_line_end) {
                self.advance();
                return Ok(Operand::Accumulator);
            }
        }

        if self.match_token(&Token::Hash) {
            return Ok(Operand::Immediate(self.parse_expression()?));
        }

        if self.check(&Token::LParen) {
            let saved = self.position;
            if let Some(operand) = self.parse_parenthesized_operand()? {
                return Ok(operand);
            }
            self.position = saved;
        }

        let expr = self.parse_expression()?;
        self.parse_index_suffix(expr)
    }

    fn parse_parenthesized_operand(&mut self) -> Result<Option<Operand>, CompileError> {
        self.advance();
        let expr = self.parse_expression()?;

        if self.match_token(&Token::Comma) {
            if !self.match_register("X") {
                return Err(self.error(
                    ErrorCode::UnexpectedToken,
                    format!("expected X in indexed indirect operand, found {}", self.found()),
                ));
            }
            if !self.match_token(&Token::RParen) {
                return Err(self.error(
                    ErrorCode::ExpectedCloseParen,
                    format!("expected ')', found {}", self.found()),
                ));
            }
            return Ok(Some(Operand::IndirectX(expr)));
        }

        if !self.match_token(&Token::RParen) {
            return Err(self.error(
                ErrorCode::ExpectedCloseParen,
                format!("expected ')', found {}", self.found()),
            ));
        }

        if self.match_token(&Token::Comma) {
            return Ok(self.match_register("Y").then(|| Operand::IndirectY(expr)));
        }

        Ok(self.at_line_end().then(|| Operand::Indirect(expr)))
    }

    fn parse_index_suffix(&mut self, expr: Expr) -> Result<Operand, CompileError> {
        if !self.match_token(&Token::Comma) {
            return Ok(Operand::Direct(expr));
        }
        if self.match_register("X") {
            Ok(Operand::IndexedX(expr))
        } else if self.match_register("Y") {
            Ok(Operand::IndexedY(expr))
        } else {
            Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("expected X or Y after ',', found {}", self.found()),
            ))
        }
    }
}
