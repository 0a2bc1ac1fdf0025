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

//! Abstract Syntax Tree for assembly source.
//!
//! A program is a flat list of statements, one or more per source line
//! (a label may share its line with an instruction).

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

/// A parsed assembly program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement to the program.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Names of all labels, in definition order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::Label(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
