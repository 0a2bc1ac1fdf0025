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

//! Directive parsing.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{DataItem, Expr, StatementKind};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::{Directive, Token};

/// Extension trait for directive parsing.
pub trait DirectiveParser {
    /// Parse the arguments of `directive`, which has already been consumed.
    fn parse_directive(&mut self, directive: Directive) -> Result<StatementKind, CompileError>;

    /// Parse a comma-separated `.BYTE` list of expressions and strings.
    fn parse_byte_list(&mut self) -> Result<Vec<DataItem>, CompileError>;

    /// Parse a comma-separated list of expressions.
    fn parse_expression_list(&mut self, directive: Directive) -> Result<Vec<Expr>, CompileError>;

    /// Parse a comma-separated list of strings.
    fn parse_string_list(&mut self, directive: Directive) -> Result<Vec<String>, CompileError>;

    /// Parse `.EQU name = expr`.
    fn parse_equ(&mut self) -> Result<StatementKind, CompileError>;
}

impl<'a> DirectiveParser for Parser<'a> {
    fn parse_directive(&mut self, directive: Directive) -> Result<StatementKind, CompileError> {
        if self.at_line_end() {
            return Err(self.error(
                ErrorCode::MalformedDirective,
                format!("'{}' expects an argument", directive.name()),
            ));
        }

        match directive {
            Directive::Org => Ok(StatementKind::Origin(self.parse_expression()?)),
            Directive::Byte => Ok(StatementKind::Bytes(self.parse_byte_list()?)),
            Directive::Word => Ok(StatementKind::Words(self.parse_expression_list(directive)?)),
            Directive::Text => Ok(StatementKind::Text {
                strings: self.parse_string_list(directive)?,
                zero_terminated: false,
            }),
            Directive::Asciiz => Ok(StatementKind::Text {
                strings: self.parse_string_list(directive)?,
                zero_terminated: true,
            }),
            Directive::Ds => {
                let count = self.parse_expression()?;
                let fill = if self.match_token(&Token::Comma) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                Ok(StatementKind::Reserve { count, fill })
            }
            Directive::Equ => self.parse_equ(),
        }
    }

    fn parse_byte_list(&mut self) -> Result<Vec<DataItem>, CompileError> {
        let mut items = Vec::new();
        loop {
            if let Some(Token::String(s)) = self.peek() {
                items.push(DataItem::String(s.clone()));
                self.advance();
            } else {
                items.push(DataItem::Expr(self.parse_expression()?));
            }
            if !self.match_token(&Token::Comma) {
                return Ok(items);
            }
        }
    }

    fn parse_expression_list(&mut self, directive: Directive) -> Result<Vec<Expr>, CompileError> {
        let mut values = Vec::new();
        loop {
            if self.check(&Token::String(String::new())) {
                return Err(self.error(
                    ErrorCode::MalformedDirective,
                    format!("'{}' does not accept strings", directive.name()),
                ));
            }
            values.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma) {
                return Ok(values);
            }
        }
    }

    fn parse_string_list(&mut self, directive: Directive) -> Result<Vec<String>, CompileError> {
        let mut strings = Vec::new();
        loop {
            match self.peek() {
                Some(Token::String(s)) => {
                    strings.push(s.clone());
                    self.advance();
                }
                _ => {
                    return Err(self.error(
                        ErrorCode::MalformedDirective,
                        format!("'{}' expects a string, found {}", directive.name(), self.found()),
                    ))
                }
            }
            if !self.match_token(&Token::Comma) {
                return Ok(strings);
            }
        }
    }

    fn parse_equ(&mut self) -> Result<StatementKind, CompileError> {
        let name = match self.peek() {
            Some(Token::Identifier(name)) => name.clone(),
            _ => {
                return Err(self.error(
                    ErrorCode::ExpectedIdentifier,
                    format!("expected constant name after '.EQU', found {}", self.found()),
                ))
            }
        };
        self.advance();
        self.expect(&Token::Equal, "expected '=' after constant name")?;
        let value = self.parse_expression()?;
        Ok(StatementKind::Constant { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::lexer::tokenize;
    use test_case::test_case;

    fn directive(source: &str) -> Result<StatementKind, CompileError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser::new(&tokens);
        let directive = match parser.advance() {
            Some((Token::Directive(d), _)) => d,
            other => panic!("not a directive: {:?}", other),
        };
        let kind = parser.parse_directive(directive)?;
        parser.expect_line_end()?;
        Ok(kind)
    }

    #[test]
    fn test_byte_list_with_strings() {
        let kind = directive(".BYTE 1, \"AB\", $FF").unwrap();
        let StatementKind::Bytes(items) = kind else {
            panic!("expected bytes");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], DataItem::String("AB".into()));
    }

    #[test]
    fn test_word_list() {
        let kind = directive(".dw $1234, label").unwrap();
        assert!(matches!(kind, StatementKind::Words(ref v) if v.len() == 2));
    }

    #[test]
    fn test_text_and_asciiz() {
        assert_eq!(
            directive(".TEXT \"HELLO\", 'WORLD'").unwrap(),
            StatementKind::Text {
                strings: vec!["HELLO".into(), "WORLD".into()],
                zero_terminated: false
            }
        );
        assert!(matches!(
            directive(".ASCIIZ \"HI\"").unwrap(),
            StatementKind::Text { zero_terminated: true, .. }
        ));
    }

    #[test]
    fn test_reserve_with_fill() {
        let kind = directive(".DS 4, $EA").unwrap();
        let StatementKind::Reserve { count, fill } = kind else {
            panic!("expected reserve");
        };
        assert_eq!(count.kind, ExprKind::Number(4));
        assert_eq!(fill.map(|f| f.kind), Some(ExprKind::Number(0xEA)));
    }

    #[test]
    fn test_equ() {
        let kind = directive(".EQU SCREEN = $0400").unwrap();
        assert!(matches!(kind, StatementKind::Constant { ref name, .. } if name == "SCREEN"));
    }

    #[test_case(".BYTE", ErrorCode::MalformedDirective; "byte without values")]
    #[test_case(".WORD \"x\"", ErrorCode::MalformedDirective; "word with string")]
    #[test_case(".TEXT 5", ErrorCode::MalformedDirective; "text with number")]
    #[test_case(".EQU = 5", ErrorCode::ExpectedIdentifier; "equ without name")]
    #[test_case(".EQU X 5", ErrorCode::UnexpectedToken; "equ without equals")]
    #[test_case(".BYTE 1,", ErrorCode::ExpectedExpression; "trailing comma")]
    fn test_directive_errors(source: &str, code: ErrorCode) {
        assert_eq!(directive(source).unwrap_err().code, code);
    }
}
