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


//! Negative/Error tests for the assembler.
//!
//! These tests verify that invalid sources are rejected at the right stage
//! with the right error code, and that no partial output is produced.

use asm65::preprocessor::{MemoryResolver, Preprocessor};
use asm65::{lexer, ErrorCode};
use test_case::test_case;

fn assemble_err(source: &str) -> asm65::CompileError {
    asm65::assemble(source).expect_err("Expected assembly to fail")
}

// ============================================================================
// Lexer Error Tests
// ============================================================================

#[test_case("LDA @", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("LDA `", ErrorCode::InvalidCharacter; "backtick")]
#[test_case("LDA #\"abc", ErrorCode::UnterminatedString; "eof_in_string")]
#[test_case(".TEXT 'abc\nNOP", ErrorCode::UnterminatedString; "newline_in_string")]
#[test_case("LDA #%102", ErrorCode::InvalidBinaryDigit; "binary_digit_two")]
#[test_case("LDA #$1G", ErrorCode::InvalidHexDigit; "hex_digit_g")]
#[test_case("LDA #12a", ErrorCode::InvalidDigitInNumber; "letter_in_decimal")]
#[test_case("LDA #$", ErrorCode::EmptyNumberLiteral; "bare_dollar")]
#[test_case("LDA #%", ErrorCode::EmptyNumberLiteral; "bare_percent")]
#[test_case(".BYTE 99999999999999999999", ErrorCode::IntegerTooLarge; "huge_decimal")]
#[test_case("NOP /* never closed", ErrorCode::UnterminatedComment; "open_block_comment")]
#[test_case(".macro", ErrorCode::UnknownDirective; "unknown_directive")]
fn test_lexer_errors(source: &str, expected_code: ErrorCode) {
    let err = lexer::tokenize(source).expect_err("Expected lexer error");
    assert_eq!(err.code, expected_code);
    assert_eq!(err.code.subsystem(), "lexer");
}

#[test]
fn test_include_must_be_on_its_own_line() {
    let err = lexer::tokenize("NOP .include \"x.asm\"").unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedInclude);
}

#[test]
fn test_unknown_directive_lists_supported() {
    let err = lexer::tokenize(".incbin \"x\"").unwrap_err();
    assert!(err.message.contains(".incbin"));
    assert!(err.hint.unwrap().contains(".ASCIIZ"));
}

// ============================================================================
// Preprocessor Error Tests
// ============================================================================

fn expand(files: &[(&str, &str)], root: &str) -> asm65::CompileError {
    let mut resolver = MemoryResolver::new();
    for (name, text) in files {
        resolver.add(*name, *text);
    }
    Preprocessor::new(resolver)
        .expand_file(root)
        .expect_err("Expected preprocessor error")
}

#[test]
fn test_include_missing_file() {
    let err = expand(&[("main.asm", "NOP\n#include \"gone.asm\"\n")], "main.asm");
    assert_eq!(err.code, ErrorCode::FileNotFound);
    assert!(err.message.contains("gone.asm"));
}

#[test]
fn test_include_self() {
    let err = expand(&[("main.asm", ".include \"main.asm\"\n")], "main.asm");
    assert_eq!(err.code, ErrorCode::CircularInclude);
}

#[test]
fn test_include_cycle_of_three() {
    let err = expand(
        &[
            ("a.asm", "#include \"b.asm\"\n"),
            ("b.asm", "#include \"c.asm\"\n"),
            ("c.asm", "#include \"a.asm\"\n"),
        ],
        "a.asm",
    );
    assert_eq!(err.code, ErrorCode::CircularInclude);
    assert!(err.message.contains("a.asm -> b.asm -> c.asm -> a.asm"), "{}", err.message);
}

#[test_case("#include"; "no_path")]
#[test_case("#include \"unclosed.asm"; "unclosed_quote")]
fn test_include_malformed(line: &str) {
    let err = expand(&[("main.asm", line)], "main.asm");
    assert_eq!(err.code, ErrorCode::MalformedInclude);
    assert_eq!(err.code.subsystem(), "preprocessor");
}

#[test]
fn test_include_depth_limit() {
    let mut resolver = MemoryResolver::new();
    resolver
        .add("0.asm", "#include \"1.asm\"\n")
        .add("1.asm", "#include \"2.asm\"\n")
        .add("2.asm", "#include \"3.asm\"\n")
        .add("3.asm", "NOP\n");
    let err = Preprocessor::new(resolver)
        .with_max_depth(2)
        .expand_file("0.asm")
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IncludeDepthExceeded);
    assert_eq!(err.origin.map(|o| o.file), Some("2.asm".to_string()));
}

// ============================================================================
// Parser Error Tests
// ============================================================================

#[test_case("FOO", ErrorCode::UnknownMnemonic; "unknown_mnemonic")]
#[test_case("LDA $10,Z", ErrorCode::UnexpectedToken; "bad_index_register")]
#[test_case("LDA ($10),Z", ErrorCode::UnexpectedToken; "indirect_with_bad_register")]
#[test_case("LDA ($10,X", ErrorCode::ExpectedCloseParen; "unclosed_indexed_indirect")]
#[test_case("LDA #(1+2", ErrorCode::ExpectedCloseParen; "unclosed_group")]
#[test_case("LDA #1 2", ErrorCode::ExpectedNewline; "trailing_tokens")]
#[test_case("LDA #", ErrorCode::ExpectedExpression; "missing_immediate")]
#[test_case(".BYTE 1,", ErrorCode::ExpectedExpression; "trailing_comma")]
#[test_case(".BYTE", ErrorCode::MalformedDirective; "byte_without_values")]
#[test_case(".TEXT 5", ErrorCode::MalformedDirective; "text_with_number")]
#[test_case(".EQU = 5", ErrorCode::ExpectedIdentifier; "equ_without_name")]
#[test_case(") NOP", ErrorCode::UnexpectedToken; "stray_paren")]
fn test_parser_errors(source: &str, expected_code: ErrorCode) {
    let err = assemble_err(source);
    assert_eq!(err.code, expected_code, "{}", err.message);
}

#[test]
fn test_unknown_mnemonic_suggests_label() {
    let err = assemble_err("start NOP");
    assert_eq!(err.code, ErrorCode::UnknownMnemonic);
    assert!(err.hint.unwrap().contains("start:"));
}

#[test_case("LDA #ldx"; "lowercase")]
#[test_case("JMP Rts"; "mixed_case")]
fn test_mnemonic_is_not_a_symbol(source: &str) {
    let err = assemble_err(source);
    assert_eq!(err.code, ErrorCode::ExpectedExpression);
    assert!(err.hint.unwrap().contains("any letter case"));
}

// ============================================================================
// Symbol Error Tests
// ============================================================================

#[test_case("here: NOP\nhere: NOP", ErrorCode::DuplicateLabel; "duplicate_label")]
#[test_case("N = 1\nN = 2", ErrorCode::DuplicateConstant; "duplicate_constant")]
#[test_case("N: NOP\nN = 2", ErrorCode::SymbolCollision; "constant_after_label")]
#[test_case("N = 2\nN: NOP", ErrorCode::SymbolCollision; "label_after_constant")]
#[test_case("JMP nowhere", ErrorCode::UndefinedSymbol; "undefined")]
#[test_case(".ORG target\ntarget: NOP", ErrorCode::ConstantExpressionRequired; "forward_origin")]
#[test_case(".DS size\nsize = 4", ErrorCode::ConstantExpressionRequired; "forward_reserve")]
#[test_case("LDA #N\nN = end\nend: RTS", ErrorCode::ConstantExpressionRequired; "constant_used_too_early")]
fn test_symbol_errors(source: &str, expected_code: ErrorCode) {
    assert_eq!(assemble_err(source).code, expected_code);
}

#[test]
fn test_undefined_symbol_case_hint() {
    let err = assemble_err("Start: NOP\nJMP start");
    assert_eq!(err.code, ErrorCode::UndefinedSymbol);
    assert_eq!(err.message, "undefined symbol 'start'");
    assert_eq!(
        err.hint.as_deref(),
        Some("symbols are case-sensitive; did you mean 'Start'?")
    );
}

#[test]
fn test_error_origin_points_at_line() {
    let err = assemble_err("NOP\nNOP\nJMP nowhere\n");
    let origin = err.origin.expect("origin should be attached");
    assert_eq!(origin.file, "<input>");
    assert_eq!(origin.line, 3);
}

// ============================================================================
// Encoding Error Tests
// ============================================================================

#[test_case("STA #1", ErrorCode::InvalidAddressingMode; "store_immediate")]
#[test_case("JMP ($10),Y", ErrorCode::InvalidAddressingMode; "jmp_indirect_y")]
#[test_case("INX $10", ErrorCode::InvalidAddressingMode; "implied_with_operand")]
#[test_case("LDA #256", ErrorCode::ByteOutOfRange; "immediate_too_large")]
#[test_case(".BYTE 300", ErrorCode::ByteOutOfRange; "data_byte_too_large")]
#[test_case(".WORD 70000", ErrorCode::WordOutOfRange; "data_word_too_large")]
#[test_case("LDA 70000", ErrorCode::WordOutOfRange; "address_too_large")]
#[test_case(".ORG $1000\nBNE $1100", ErrorCode::BranchOutOfRange; "branch_forward")]
#[test_case(".ORG $1000\nBEQ $0F00", ErrorCode::BranchOutOfRange; "branch_backward")]
#[test_case(".BYTE 1/0", ErrorCode::DivisionByZero; "division_by_zero")]
#[test_case(".WORD 9223372036854775807+1", ErrorCode::ArithmeticOverflow; "overflow")]
#[test_case(".ORG 70000", ErrorCode::AddressOverflow; "origin_too_large")]
#[test_case(".ORG $FFFF\nLDA $1234", ErrorCode::AddressOverflow; "past_top_of_memory")]
#[test_case(".DS 70000", ErrorCode::WordOutOfRange; "reserve_too_large")]
fn test_encoding_errors(source: &str, expected_code: ErrorCode) {
    let err = assemble_err(source);
    assert_eq!(err.code, expected_code, "{}", err.message);
    assert_eq!(err.code.subsystem(), "assembler");
}

#[test]
fn test_invalid_mode_lists_supported_modes() {
    let err = assemble_err("STX $1234,X");
    assert_eq!(err.code, ErrorCode::InvalidAddressingMode);
    assert!(err.message.starts_with("STX does not support"));
    assert!(err.hint.is_some());
}

#[test]
fn test_branch_error_suggests_jmp() {
    let err = assemble_err(".ORG $1000\nfar: NOP\n.ORG $2000\nBCC far");
    assert_eq!(err.code, ErrorCode::BranchOutOfRange);
    assert!(err.message.contains("'far'"), "{}", err.message);
    assert!(err.hint.unwrap().contains("JMP"));
}
