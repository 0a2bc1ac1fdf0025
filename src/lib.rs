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

//! Asm65 Library
//!
//! A cycle-accurate MOS 6502 interpreter and a two-pass assembler that
//! produces Commodore 64 PRG, D64 and T64 files.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`preprocessor`] - Include expansion
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Parsing tokens into an AST
//! - [`ast`] - Abstract Syntax Tree definitions
//! - [`assembler`] - Layout and code generation passes
//! - [`output`] - PRG, D64 and T64 codecs
//! - [`cpu`] - The 6502 interpreter
//! - [`disasm`] - Disassembler over the opcode table
//!
//! # Example
//!
//! ```no_run
//! use asm65::output::{Codec, Prg};
//! use asm65::cpu::{Cpu, Memory};
//! use std::path::Path;
//!
//! fn build_and_run() -> Result<(), Box<dyn std::error::Error>> {
//!     // Assemble
//!     let segments = asm65::assemble(".ORG $C000\nLDA #$01\nSTA $D020\nRTS")?;
//!
//!     // Write output
//!     Prg::new().write_file(Path::new("border.prg"), &segments)?;
//!
//!     // Execute the first instruction
//!     let mut cpu = Cpu::new(Memory::new());
//!     cpu.load_segments(&segments);
//!     cpu.set_pc(0xC000);
//!     cpu.step()?;
//!     assert_eq!(cpu.a(), 0x01);
//!
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod ast;
pub mod convert;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod preprocessor;
pub mod segment;

// Re-export commonly used types
pub use assembler::{Assembler, Assembly, SymbolTable};
pub use ast::Program;
pub use cpu::{Cpu, CpuError, Memory};
pub use error::{format_error, CompileError, ErrorCode, Result, SourceLocation, Span};
pub use lexer::Token;
pub use output::{Codec, FormatError, OutputFormat};
pub use segment::Segment;

use preprocessor::{FileResolver, Preprocessor};
use std::path::Path;

/// The version of Asm65.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the assembler.
pub const NAME: &str = "Asm65";

/// An assembly error together with the text its span points into.
#[derive(Debug)]
pub struct Diagnostic {
    pub error: CompileError,
    /// Source the span refers to (empty if there is none).
    pub source: String,
}

impl Diagnostic {
    /// Render the error with source context. `filename` is used when the
    /// error does not name its file.
    pub fn render(&self, filename: Option<&str>) -> String {
        if self.source.is_empty() && self.error.origin.is_none() {
            let mut output = format!(
                "error[{}]: {}: {}\n",
                self.error.code_str(),
                self.error.code.subsystem(),
                self.error.message
            );
            if let Some(hint) = &self.error.hint {
                output.push_str(&format!("  = hint: {}\n", hint));
            }
            return output;
        }
        format_error(&self.error, &self.source, filename)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Assemble source text.
///
/// Include directives are resolved relative to the current directory and
/// code before the first origin directive starts at `$0801`.
///
/// # Example
///
/// ```
/// let segments = asm65::assemble(".ORG $1000\nLOOP: DEX\nBNE LOOP").unwrap();
/// assert_eq!(segments[0].start, 0x1000);
/// assert_eq!(segments[0].bytes, vec![0xCA, 0xD0, 0xFD]);
/// ```
pub fn assemble(source: &str) -> std::result::Result<Vec<Segment>, CompileError> {
    let mut preprocessor = Preprocessor::new(FileResolver::new());
    let expanded = preprocessor.expand_source("<input>", source)?;

    Assembler::new()
        .assemble(&expanded.text)
        .map(|assembly| assembly.segments)
        .map_err(|e| expanded.locate(e))
}

/// Assemble a file, following includes up to `max_include_depth` levels.
pub fn assemble_file(
    path: &Path,
    assembler: &Assembler,
    max_include_depth: usize,
) -> std::result::Result<Assembly, Diagnostic> {
    let name = path.display().to_string();
    let mut preprocessor = Preprocessor::new(FileResolver::new()).with_max_depth(max_include_depth);

    let expanded = preprocessor.expand_file(&name).map_err(|error| {
        let source = error
            .origin
            .as_ref()
            .and_then(|origin| preprocessor.source_text(&origin.file))
            .unwrap_or_default()
            .to_string();
        Diagnostic { error, source }
    })?;

    assembler.assemble(&expanded.text).map_err(|e| Diagnostic {
        error: expanded.locate(e),
        source: expanded.text.clone(),
    })
}
