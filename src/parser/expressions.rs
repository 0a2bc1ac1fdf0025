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

//! Expression parsing for the parser.
//!
//! This module provides expression parsing functionality:
//! - Precedence climbing for `+ - * /`
//! - Unary `-` and `+`
//! - Byte selection with a leading `<` or `>`
//! - Primary expressions (numbers, symbols, `*`, grouping)

use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for expression parsing.
pub trait ExpressionParser {
    /// Parse an operand expression, including a leading `<`/`>` that
    /// applies to everything after it.
    fn parse_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse binary operators binding at least as tightly as `min_precedence`.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, CompileError>;

    /// Try to read a binary operator without consuming it.
    fn peek_binary_op(&self) -> Option<BinaryOp>;

    /// Parse a unary expression.
    fn parse_unary_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse a primary expression.
    fn parse_primary_expression(&mut self) -> Result<Expr, CompileError>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let op = match self.peek() {
            Some(Token::Less) => Some(UnaryOp::LowByte),
            Some(Token::Greater) => Some(UnaryOp::HighByte),
            _ => None,
        };

        let Some(op) = op else {
            return self.parse_binary_expression(1);
        };

        let start = self.peek_span().unwrap_or_else(|| self.previous_span());
        self.advance();
        let operand = self.parse_binary_expression(1)?;
        let span = start.merge(&operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary_expression()?;

        while let Some(op) = self.peek_binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary_expression(op.precedence() + 1)?;
            let span = left.span.merge(&right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match self.peek()? {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, CompileError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.parse_primary_expression(),
        };

        let start = self.peek_span().unwrap_or_else(|| self.previous_span());
        self.advance();
        let operand = self.parse_unary_expression()?;
        let span = start.merge(&operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_primary_expression(&mut self) -> Result<Expr, CompileError> {
        let span = self.peek_span().unwrap_or_else(|| self.previous_span());

        match self.peek().cloned() {
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Symbol(name), span))
            }
            Some(Token::Star) => {
                self.advance();
                Ok(Expr::new(ExprKind::CurrentPc, span))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                let (_, close) = self.expect(&Token::RParen, "expected ')'").map_err(|e| {
                    CompileError::new(ErrorCode::ExpectedCloseParen, e.message, e.span)
                })?;
                Ok(Expr::new(ExprKind::Grouped(Box::new(inner)), span.merge(&close)))
            }
            Some(Token::Mnemonic(mnemonic)) => Err(self
                .error(
                    ErrorCode::ExpectedExpression,
                    format!("expected expression, found mnemonic '{}'", mnemonic),
                )
                .with_hint(format!(
                    "'{}' matches an instruction name in any letter case and cannot be used as a symbol",
                    mnemonic
                ))),
            _ => Err(self.error(
                ErrorCode::ExpectedExpression,
                format!("expected expression, found {}", self.found()),
            )),
        }
    }
}
