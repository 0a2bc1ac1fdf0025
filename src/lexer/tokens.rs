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

//! Token definitions for the assembler.

use crate::cpu::Mnemonic;
use logos::{Lexer, Logos};

/// Reasons raw lexing can fail. `InvalidCharacter` is what logos reports
/// for input no pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    InvalidCharacter,
    InvalidDigitInNumber,
    InvalidHexDigit,
    InvalidBinaryDigit,
    EmptyNumberLiteral,
    IntegerTooLarge,
    UnterminatedString,
    UnterminatedComment,
}

/// Tokens as matched by the generated lexer, before directive and
/// mnemonic classification.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r";[^\n]*")]
#[logos(skip r"//[^\n]*")]
pub(crate) enum RawToken {
    #[regex(r"[0-9][0-9A-Za-z_]*", decimal)]
    Decimal(i64),
    #[regex(r"\$[0-9A-Za-z_]*", hex)]
    Hex(i64),
    #[regex(r"%[0-9A-Za-z_]*", binary)]
    Binary(i64),
    #[token("\"", |lex| string(lex, '"'))]
    #[token("'", |lex| string(lex, '\''))]
    String(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*:", |lex| lex.slice().trim_end_matches(':').to_string())]
    Label(String),
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Directive(String),
    #[token("/*", block_comment)]
    BlockComment(bool),
    #[token("\n")]
    Newline,
    #[token("*")]
    Star,
    #[token("=")]
    Equal,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("#")]
    Hash,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
}

fn parse_digits(digits: &str, radix: u32, invalid: LexErrorKind) -> Result<i64, LexErrorKind> {
    if digits.is_empty() {
        return Err(LexErrorKind::EmptyNumberLiteral);
    }
    digits.chars().try_fold(0i64, |value, c| {
        let digit = c.to_digit(radix).ok_or(invalid)?;
        value
            .checked_mul(radix as i64)
            .and_then(|v| v.checked_add(digit as i64))
            .ok_or(LexErrorKind::IntegerTooLarge)
    })
}

fn decimal(lex: &mut Lexer<RawToken>) -> Result<i64, LexErrorKind> {
    parse_digits(lex.slice(), 10, LexErrorKind::InvalidDigitInNumber)
}

fn hex(lex: &mut Lexer<RawToken>) -> Result<i64, LexErrorKind> {
    parse_digits(&lex.slice()[1..], 16, LexErrorKind::InvalidHexDigit)
}

fn binary(lex: &mut Lexer<RawToken>) -> Result<i64, LexErrorKind> {
    parse_digits(&lex.slice()[1..], 2, LexErrorKind::InvalidBinaryDigit)
}

/// Scan the rest of a quoted string. Strings end at the matching quote and
/// may not span lines.
fn string(lex: &mut Lexer<RawToken>, quote: char) -> Result<String, LexErrorKind> {
    let mut value = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => break,
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '0')) => value.push('\0'),
                Some((_, '\n')) | None => break,
                Some((_, other)) => value.push(other),
            },
            c if c == quote => {
                lex.bump(i + c.len_utf8());
                return Ok(value);
            }
            c => value.push(c),
        }
    }

    let rest = lex.remainder();
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
    Err(LexErrorKind::UnterminatedString)
}

/// Skip a block comment, reporting whether it contained a line break.
fn block_comment(lex: &mut Lexer<RawToken>) -> Result<bool, LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            let spans_lines = rest[..end].contains('\n');
            lex.bump(end + 2);
            Ok(spans_lines)
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

/// Assembler directives. Aliases map to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `.ORG`
    Org,
    /// `.BYTE`, `.DB`
    Byte,
    /// `.WORD`, `.DW`
    Word,
    /// `.TEXT`, `.STRING`, `.STR`, `.ASC`
    Text,
    /// `.ASCIIZ`
    Asciiz,
    /// `.DS`
    Ds,
    /// `.EQU`
    Equ,
}

impl Directive {
    /// Look up a directive by its dotted name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Directive> {
        let name = name.strip_prefix('.')?;
        let directive = match name.to_ascii_uppercase().as_str() {
            "ORG" => Directive::Org,
            "BYTE" | "DB" => Directive::Byte,
            "WORD" | "DW" => Directive::Word,
            "TEXT" | "STRING" | "STR" | "ASC" => Directive::Text,
            "ASCIIZ" => Directive::Asciiz,
            "DS" => Directive::Ds,
            "EQU" => Directive::Equ,
            _ => return None,
        };
        Some(directive)
    }

    /// Canonical spelling.
    pub fn name(self) -> &'static str {
        match self {
            Directive::Org => ".ORG",
            Directive::Byte => ".BYTE",
            Directive::Word => ".WORD",
            Directive::Text => ".TEXT",
            Directive::Asciiz => ".ASCIIZ",
            Directive::Ds => ".DS",
            Directive::Equ => ".EQU",
        }
    }
}

/// A token of assembly source.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer literal (decimal, `$` hex or `%` binary).
    Number(i64),
    /// Quoted string literal with escapes resolved.
    String(String),
    /// Identifier, case preserved.
    Identifier(String),
    /// `name:` label definition.
    Label(String),
    /// Instruction mnemonic, matched case-insensitively.
    Mnemonic(Mnemonic),
    /// Dotted directive.
    Directive(Directive),
    /// `*` - current PC or multiplication.
    Star,
    /// `=`
    Equal,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `#` - immediate prefix.
    Hash,
    /// `,`
    Comma,
    /// `.` not followed by a name.
    Dot,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `/`
    Slash,
    /// `<` - low byte.
    Less,
    /// `>` - high byte.
    Greater,
    /// End of a source line.
    Newline,
    /// End of input.
    Eof,
}

impl Token {
    /// Get a human-readable name for this token type.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Number(_) => "number",
            Token::String(_) => "string",
            Token::Identifier(_) => "identifier",
            Token::Label(_) => "label",
            Token::Mnemonic(_) => "mnemonic",
            Token::Directive(_) => "directive",
            Token::Star => "'*'",
            Token::Equal => "'='",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Hash => "'#'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::Minus => "'-'",
            Token::Plus => "'+'",
            Token::Slash => "'/'",
            Token::Less => "'<'",
            Token::Greater => "'>'",
            Token::Newline => "end of line",
            Token::Eof => "end of input",
        }
    }

    /// Whether this token ends a statement.
    pub fn is_line_end(&self) -> bool {
        matches!(self, Token::Newline | Token::Eof)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Label(s) => write!(f, "{}:", s),
            Token::Mnemonic(m) => write!(f, "{}", m),
            Token::Directive(d) => write!(f, "{}", d.name()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str) -> Vec<Result<RawToken, LexErrorKind>> {
        RawToken::lexer(source).collect()
    }

    #[test]
    fn test_raw_numbers() {
        assert_eq!(
            raw("123 $7B %01111011"),
            vec![Ok(RawToken::Decimal(123)), Ok(RawToken::Hex(123)), Ok(RawToken::Binary(123))]
        );
    }

    #[test]
    fn test_raw_number_errors() {
        assert_eq!(raw("12a"), vec![Err(LexErrorKind::InvalidDigitInNumber)]);
        assert_eq!(raw("$G1"), vec![Err(LexErrorKind::InvalidHexDigit)]);
        assert_eq!(raw("%012"), vec![Err(LexErrorKind::InvalidBinaryDigit)]);
        assert_eq!(raw("$"), vec![Err(LexErrorKind::EmptyNumberLiteral)]);
        assert_eq!(raw("$FFFFFFFFFFFFFFFFF"), vec![Err(LexErrorKind::IntegerTooLarge)]);
    }

    #[test]
    fn test_label_vs_word() {
        assert_eq!(
            raw("loop: loop"),
            vec![Ok(RawToken::Label("loop".into())), Ok(RawToken::Word("loop".into()))]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(raw(r#""a\"b""#), vec![Ok(RawToken::String("a\"b".into()))]);
        assert_eq!(raw("'hi' 'x'"), vec![Ok(RawToken::String("hi".into())), Ok(RawToken::String("x".into()))]);
        assert_eq!(raw("\"open\nNOP")[0], Err(LexErrorKind::UnterminatedString));
    }

    #[test]
    fn test_comments() {
        assert_eq!(raw("; note\n// note"), vec![Ok(RawToken::Newline)]);
        assert_eq!(raw("/* a */"), vec![Ok(RawToken::BlockComment(false))]);
        assert_eq!(raw("/* a\n b */"), vec![Ok(RawToken::BlockComment(true))]);
        assert_eq!(raw("/* open"), vec![Err(LexErrorKind::UnterminatedComment)]);
    }

    #[test]
    fn test_directive_lookup() {
        assert_eq!(Directive::from_name(".byte"), Some(Directive::Byte));
        assert_eq!(Directive::from_name(".DB"), Some(Directive::Byte));
        assert_eq!(Directive::from_name(".Asc"), Some(Directive::Text));
        assert_eq!(Directive::from_name(".macro"), None);
        assert_eq!(Directive::from_name("BYTE"), None);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Label("start".into()).to_string(), "start:");
        assert_eq!(Token::Directive(Directive::Word).to_string(), ".WORD");
        assert_eq!(Token::Newline.to_string(), "end of line");
    }
}
