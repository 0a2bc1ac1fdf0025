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

//! Parser for assembly source.
//!
//! This module parses a token stream into an Abstract Syntax Tree (AST),
//! one source line at a time. It uses recursive descent with precedence
//! climbing for expressions.
//!
//! # Module Structure
//!
//! - `directives` - Dotted directive parsing (DirectiveParser trait)
//! - `expressions` - Expression parsing (ExpressionParser trait)
//! - `helpers` - Token stream navigation and error handling (ParserHelpers trait)
//! - `operands` - Instruction operand parsing (OperandParser trait)

// Submodules
pub mod directives;
pub mod expressions;
pub mod helpers;
pub mod operands;

// Internal imports from submodules
use directives::DirectiveParser;
use expressions::ExpressionParser;
use helpers::ParserHelpers;
use operands::OperandParser;

use crate::ast::{Program, Statement, StatementKind};
use crate::cpu::Mnemonic;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;

/// The parser state.
pub struct Parser<'a> {
    /// The token stream to parse.
    pub(crate) tokens: &'a [(Token, Span)],
    /// Current position in the token stream.
    pub(crate) position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given token stream.
    pub fn new(tokens: &'a [(Token, Span)]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    // ========================================
    // Program Parsing
    // ========================================

    /// Parse the complete program.
    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let mut program = Program::new();

        self.skip_newlines();

        while !self.is_at_end() {
            self.parse_line(&mut program)?;
            self.skip_newlines();
        }

        Ok(program)
    }

    /// Parse one source line: an optional label followed by an optional
    /// statement.
    fn parse_line(&mut self, program: &mut Program) -> Result<(), CompileError> {
        if let Some((Token::Label(name), span)) = self.tokens.get(self.position).cloned() {
            self.advance();
            program.push(Statement::new(StatementKind::Label(name), span));
            if self.at_line_end() {
                return self.expect_line_end();
            }
        }

        let start = self.peek_span().unwrap_or_else(|| self.previous_span());
        let kind = self.parse_statement()?;
        let span = start.merge(&self.previous_span());
        program.push(Statement::new(kind, span));

        self.expect_line_end()
    }

    fn parse_statement(&mut self) -> Result<StatementKind, CompileError> {
        match self.peek().cloned() {
            Some(Token::Mnemonic(mnemonic)) => {
                self.advance();
                self.parse_instruction(mnemonic)
            }
            Some(Token::Directive(directive)) => {
                self.advance();
                self.parse_directive(directive)
            }
            Some(Token::Star) if matches!(self.peek_ahead(1), Some(Token::Equal)) => {
                self.advance();
                self.advance();
                Ok(StatementKind::Origin(self.parse_expression()?))
            }
            Some(Token::Identifier(name)) if matches!(self.peek_ahead(1), Some(Token::Equal)) => {
                self.advance();
                self.advance();
                let value = self.parse_expression()?;
                Ok(StatementKind::Constant { name, value })
            }
            Some(Token::Identifier(name)) => Err(self
                .error(
                    ErrorCode::UnknownMnemonic,
                    format!("unknown mnemonic '{}'", name),
                )
                .with_hint(format!(
                    "to define a label write '{}:'; to define a constant write '{} = value'",
                    name, name
                ))),
            _ => Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("expected instruction or directive, found {}", self.found()),
            )),
        }
    }

    fn parse_instruction(&mut self, mnemonic: Mnemonic) -> Result<StatementKind, CompileError> {
        let operand = self.parse_operand()?;
        Ok(StatementKind::Instruction { mnemonic, operand })
    }
}

/// Parse a token stream into a program AST.
pub fn parse(tokens: &[(Token, Span)]) -> Result<Program, CompileError> {
    let mut parser = Parser::new(tokens);
    parser.parse()
}
