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

//! Lexical analysis for assembly source.
//!
//! This module tokenizes include-expanded source into a stream of tokens.
//! It handles:
//! - Number literals (decimal, hex with `$`, binary with `%`)
//! - Single- and double-quoted strings
//! - Identifiers, `name:` labels and case-insensitive mnemonics
//! - Dotted directives
//! - Comments (`;`, `//` and `/* */`)
//!
//! Raw matching is done by a logos-generated lexer; this module classifies
//! words and turns raw failures into [`CompileError`]s.

mod tokens;

pub use tokens::{Directive, LexErrorKind, Token};

use crate::cpu::Mnemonic;
use crate::error::{CompileError, ErrorCode, Span};
use logos::Logos;
use tokens::RawToken;

/// Tokenize source code into a vector of tokens with spans.
///
/// The result always ends with [`Token::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, CompileError> {
    let mut tokens = Vec::new();

    for (raw, range) in RawToken::lexer(source).spanned() {
        let span = Span::from_range(range);
        let token = match raw {
            Ok(RawToken::Decimal(n)) | Ok(RawToken::Hex(n)) | Ok(RawToken::Binary(n)) => {
                Token::Number(n)
            }
            Ok(RawToken::String(s)) => Token::String(s),
            Ok(RawToken::Word(word)) => classify_word(word),
            Ok(RawToken::Label(name)) => Token::Label(name),
            Ok(RawToken::Directive(name)) => directive(&name, &span)?,
            Ok(RawToken::BlockComment(true)) => Token::Newline,
            Ok(RawToken::BlockComment(false)) => continue,
            Ok(RawToken::Newline) => Token::Newline,
            Ok(RawToken::Star) => Token::Star,
            Ok(RawToken::Equal) => Token::Equal,
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::Hash) => Token::Hash,
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::Dot) => Token::Dot,
            Ok(RawToken::Minus) => Token::Minus,
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Slash) => Token::Slash,
            Ok(RawToken::Less) => Token::Less,
            Ok(RawToken::Greater) => Token::Greater,
            Err(kind) => return Err(lex_error(kind, source, span)),
        };
        tokens.push((token, span));
    }

    let end = source.len();
    tokens.push((Token::Eof, Span::new(end, end)));
    Ok(tokens)
}

/// Mnemonic if the word names one, identifier otherwise.
fn classify_word(word: String) -> Token {
    match Mnemonic::from_name(&word) {
        Some(mnemonic) => Token::Mnemonic(mnemonic),
        None => Token::Identifier(word),
    }
}

fn directive(name: &str, span: &Span) -> Result<Token, CompileError> {
    if let Some(directive) = Directive::from_name(name) {
        return Ok(Token::Directive(directive));
    }
    if name.eq_ignore_ascii_case(".include") {
        return Err(CompileError::new(
            ErrorCode::MalformedInclude,
            "include directive must be on a line of its own",
            span.clone(),
        ));
    }
    Err(CompileError::new(
        ErrorCode::UnknownDirective,
        format!("unknown directive '{}'", name),
        span.clone(),
    )
    .with_hint("supported: .ORG .BYTE .DB .WORD .DW .TEXT .STRING .STR .ASC .ASCIIZ .DS .EQU"))
}

fn lex_error(kind: LexErrorKind, source: &str, span: Span) -> CompileError {
    let text = source.get(span.start..span.end).unwrap_or("");
    match kind {
        LexErrorKind::InvalidCharacter => CompileError::new(
            ErrorCode::InvalidCharacter,
            format!("invalid character '{}'", text),
            span,
        ),
        LexErrorKind::InvalidDigitInNumber => CompileError::new(
            ErrorCode::InvalidDigitInNumber,
            format!("invalid digit in number literal '{}'", text),
            span,
        ),
        LexErrorKind::InvalidHexDigit => CompileError::new(
            ErrorCode::InvalidHexDigit,
            format!("invalid hexadecimal literal '{}'", text),
            span,
        ),
        LexErrorKind::InvalidBinaryDigit => CompileError::new(
            ErrorCode::InvalidBinaryDigit,
            format!("invalid binary literal '{}'", text),
            span,
        )
        .with_hint("binary literals use only the digits 0 and 1"),
        LexErrorKind::EmptyNumberLiteral => CompileError::new(
            ErrorCode::EmptyNumberLiteral,
            "expected digits after number prefix",
            span,
        ),
        LexErrorKind::IntegerTooLarge => CompileError::new(
            ErrorCode::IntegerTooLarge,
            format!("integer literal '{}' is too large", text),
            span,
        ),
        LexErrorKind::UnterminatedString => CompileError::new(
            ErrorCode::UnterminatedString,
            "unterminated string literal",
            span,
        )
        .with_hint("strings must be closed on the same line"),
        LexErrorKind::UnterminatedComment => CompileError::new(
            ErrorCode::UnterminatedComment,
            "unterminated block comment",
            span,
        )
        .with_hint("close the comment with */"),
    }
}
