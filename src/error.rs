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

//! Error types for the Asm65 assembler.
//!
//! This module defines the error type shared by every stage of the
//! assembler front end: the include preprocessor, the lexer, the line
//! parser and both assembly passes.

use std::ops::Range;
use thiserror::Error;

/// A source span representing a range in the (include-expanded) source code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span from a range.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error codes for the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexical errors (E001-E030)
    InvalidCharacter,
    InvalidDigitInNumber,
    UnterminatedString,
    UnterminatedComment,
    IntegerTooLarge,
    InvalidBinaryDigit,
    InvalidHexDigit,
    EmptyNumberLiteral,
    UnknownDirective,

    // Include errors (E050-E054)
    FileNotFound,
    FileReadError,
    CircularInclude,
    IncludeDepthExceeded,
    MalformedInclude,

    // Syntax errors (E100-E132)
    UnexpectedToken,
    UnexpectedEndOfLine,
    ExpectedExpression,
    ExpectedIdentifier,
    ExpectedNewline,
    MalformedDirective,
    UnknownMnemonic,
    ExpectedCloseParen,

    // Symbol errors (E200-E204)
    UndefinedSymbol,
    DuplicateLabel,
    DuplicateConstant,
    SymbolCollision,
    ConstantExpressionRequired,

    // Encoding errors (E300-E330)
    InvalidAddressingMode,
    ByteOutOfRange,
    WordOutOfRange,
    BranchOutOfRange,
    DivisionByZero,
    ArithmeticOverflow,
    AddressOverflow,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::InvalidDigitInNumber => "E003",
            ErrorCode::UnterminatedString => "E010",
            ErrorCode::UnterminatedComment => "E011",
            ErrorCode::IntegerTooLarge => "E020",
            ErrorCode::InvalidBinaryDigit => "E022",
            ErrorCode::InvalidHexDigit => "E023",
            ErrorCode::EmptyNumberLiteral => "E024",
            ErrorCode::UnknownDirective => "E030",

            // Include errors
            ErrorCode::FileNotFound => "E050",
            ErrorCode::FileReadError => "E051",
            ErrorCode::CircularInclude => "E052",
            ErrorCode::IncludeDepthExceeded => "E053",
            ErrorCode::MalformedInclude => "E054",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfLine => "E101",
            ErrorCode::ExpectedExpression => "E103",
            ErrorCode::ExpectedIdentifier => "E105",
            ErrorCode::ExpectedNewline => "E107",
            ErrorCode::MalformedDirective => "E110",
            ErrorCode::UnknownMnemonic => "E111",
            ErrorCode::ExpectedCloseParen => "E132",

            // Symbol errors
            ErrorCode::UndefinedSymbol => "E200",
            ErrorCode::DuplicateLabel => "E201",
            ErrorCode::DuplicateConstant => "E202",
            ErrorCode::SymbolCollision => "E203",
            ErrorCode::ConstantExpressionRequired => "E204",

            // Encoding errors
            ErrorCode::InvalidAddressingMode => "E300",
            ErrorCode::ByteOutOfRange => "E310",
            ErrorCode::WordOutOfRange => "E311",
            ErrorCode::BranchOutOfRange => "E312",
            ErrorCode::DivisionByZero => "E320",
            ErrorCode::ArithmeticOverflow => "E321",
            ErrorCode::AddressOverflow => "E330",
        }
    }

    /// Name of the subsystem that raises this error.
    pub fn subsystem(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCharacter
            | ErrorCode::InvalidDigitInNumber
            | ErrorCode::UnterminatedString
            | ErrorCode::UnterminatedComment
            | ErrorCode::IntegerTooLarge
            | ErrorCode::InvalidBinaryDigit
            | ErrorCode::InvalidHexDigit
            | ErrorCode::EmptyNumberLiteral
            | ErrorCode::UnknownDirective => "lexer",

            ErrorCode::FileNotFound
            | ErrorCode::FileReadError
            | ErrorCode::CircularInclude
            | ErrorCode::IncludeDepthExceeded
            | ErrorCode::MalformedInclude => "preprocessor",

            ErrorCode::UnexpectedToken
            | ErrorCode::UnexpectedEndOfLine
            | ErrorCode::ExpectedExpression
            | ErrorCode::ExpectedIdentifier
            | ErrorCode::ExpectedNewline
            | ErrorCode::MalformedDirective
            | ErrorCode::UnknownMnemonic
            | ErrorCode::ExpectedCloseParen => "parser",

            _ => "assembler",
        }
    }
}

/// The original file and line a piece of expanded source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOrigin {
    /// File name as given to the preprocessor (or `<input>`).
    pub file: String,
    /// Line number inside that file (1-indexed).
    pub line: usize,
}

/// An assembler error with source location.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
    /// Original file/line, filled in once the include map is known.
    pub origin: Option<SourceOrigin>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
            origin: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach the original file/line of the error.
    pub fn with_origin(mut self, origin: SourceOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for assembler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The content of the line.
    pub line_content: String,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];

        let line = before.chars().filter(|&c| c == '\n').count() + 1;

        let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[last_newline..].chars().count() + 1;

        let line_end = source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        let line_content = source[last_newline..line_end]
            .trim_end_matches('\r')
            .to_string();

        Self {
            line,
            column,
            line_content,
        }
    }
}

/// Format an error with source context.
///
/// `source` is the text the error's span points into. When the error carries
/// an [`SourceOrigin`], its file and line take precedence over `filename` and
/// the line computed from the span.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let loc = SourceLocation::from_offset(source, error.span.start);
    let (filename, line) = match &error.origin {
        Some(origin) => (origin.file.as_str(), origin.line),
        None => (filename.unwrap_or("<input>"), loc.line),
    };

    let mut output = String::new();

    // Error header
    output.push_str(&format!(
        "error[{}]: {}: {}\n",
        error.code_str(),
        error.code.subsystem(),
        error.message
    ));

    // Location
    output.push_str(&format!("  --> {}:{}:{}\n", filename, line, loc.column));

    // Source context
    let line_num_width = line.to_string().len();
    output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
    output.push_str(&format!(
        "{:>width$} | {}\n",
        line,
        loc.line_content,
        width = line_num_width
    ));

    // Underline the error span
    let underline_start = loc.column - 1;
    let underline_len = error
        .span
        .len()
        .max(1)
        .min(loc.line_content.len().saturating_sub(underline_start))
        .max(1);
    output.push_str(&format!(
        "{:>width$} | {:>start$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
        width = line_num_width,
        start = underline_start
    ));

    if let Some(hint) = &error.hint {
        output.push_str(&format!(
            "{:>width$} = hint: {}\n",
            "",
            hint,
            width = line_num_width
        ));
    }

    output
}
