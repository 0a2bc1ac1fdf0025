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

//! Two-pass assembler.
//!
//! The assembler turns a parsed [`Program`] into address-tagged byte
//! segments:
//!
//! 1. [`layout`] binds labels and constants, partitions the program at every
//!    origin directive and sizes each statement.
//! 2. [`codegen`] resolves every operand against the completed symbol table
//!    and emits bytes into the planned segments.
//!
//! All state lives for one call of [`Assembler::assemble`], so assembling
//! the same source twice yields identical output.

pub mod codegen;
pub mod eval;
pub mod layout;
pub mod modes;
pub mod symbols;

pub use eval::{Evaluator, Pass, Value};
pub use layout::{Layout, SegmentPlan};
pub use modes::{instruction_set, opcode_for, select_mode, supports};
pub use symbols::SymbolTable;

use crate::ast::Program;
use crate::error::CompileError;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::segment::Segment;

/// Load address used until the first origin directive (the C64 BASIC start).
pub const DEFAULT_ORIGIN: u16 = 0x0801;

/// The output of a successful assembly.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Non-empty segments in source order.
    pub segments: Vec<Segment>,
    /// Final labels and constants.
    pub symbols: SymbolTable,
}

impl Assembly {
    /// Total number of bytes across all segments.
    pub fn size(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// Assembler configuration.
#[derive(Debug, Clone)]
pub struct Assembler {
    default_origin: u16,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            default_origin: DEFAULT_ORIGIN,
        }
    }

    /// Use `origin` for code before the first origin directive.
    pub fn with_default_origin(mut self, origin: u16) -> Self {
        self.default_origin = origin;
        self
    }

    pub fn default_origin(&self) -> u16 {
        self.default_origin
    }

    /// Assemble source text that has already been include-expanded.
    pub fn assemble(&self, source: &str) -> Result<Assembly, CompileError> {
        let tokens = tokenize(source)?;
        let program = parse(&tokens)?;
        self.assemble_program(&program)
    }

    /// Assemble a parsed program.
    pub fn assemble_program(&self, program: &Program) -> Result<Assembly, CompileError> {
        let plan = layout::layout(program, self.default_origin)?;
        let (segments, symbols) = codegen::generate(program, plan)?;
        Ok(Assembly { segments, symbols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_origin() {
        let assembly = Assembler::new().assemble("NOP").unwrap();
        assert_eq!(assembly.segments, vec![Segment::new(0x0801, vec![0xEA])]);
    }

    #[test]
    fn test_custom_default_origin() {
        let assembly = Assembler::new().with_default_origin(0xC000).assemble("RTS").unwrap();
        assert_eq!(assembly.segments, vec![Segment::new(0xC000, vec![0x60])]);
    }

    #[test]
    fn test_immediate_load_at_origin() {
        let assembly = Assembler::new().assemble(".ORG $D000\nLDA #$01").unwrap();
        assert_eq!(assembly.segments, vec![Segment::new(0xD000, vec![0xA9, 0x01])]);
    }

    #[test]
    fn test_multiple_segments() {
        let source = "*= $1000\nstart: JMP next\n*= $2000\nnext: RTS";
        let assembly = Assembler::new().assemble(source).unwrap();
        assert_eq!(
            assembly.segments,
            vec![
                Segment::new(0x1000, vec![0x4C, 0x00, 0x20]),
                Segment::new(0x2000, vec![0x60]),
            ]
        );
        assert_eq!(assembly.symbols.label("start"), Some(0x1000));
        assert_eq!(assembly.symbols.label("next"), Some(0x2000));
        assert_eq!(assembly.size(), 4);
    }

    #[test]
    fn test_assemble_twice_is_identical() {
        let source = ".ORG $1000\nptr = $FB\nloop: LDA (ptr),Y\nSTA $0400,X\nINX\nBNE loop\nRTS";
        let assembler = Assembler::new();
        let first = assembler.assemble(source).unwrap();
        let second = assembler.assemble(source).unwrap();
        assert_eq!(first.segments, second.segments);
    }

    #[test]
    fn test_zero_page_versus_absolute() {
        let assembly = Assembler::new().assemble("LDA $10\nLDA $0010\nLDA $1000,X").unwrap();
        // $0010 is a number that fits in a byte, so it is zero page too.
        assert_eq!(
            assembly.segments[0].bytes,
            vec![0xA5, 0x10, 0xA5, 0x10, 0xBD, 0x00, 0x10]
        );
    }

    #[test]
    fn test_failure_returns_no_segments() {
        let err = Assembler::new().assemble("NOP\nLDA #$1FF").unwrap_err();
        assert_eq!(err.code, ErrorCode::ByteOutOfRange);
    }
}
