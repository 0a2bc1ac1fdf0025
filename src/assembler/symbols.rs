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

//! Label and constant tables.
//!
//! Labels and constants share one namespace: a name may be defined once,
//! as one or the other.

use super::eval::Value;
use crate::error::{CompileError, ErrorCode, Span};
use std::collections::HashMap;

/// Symbols defined by an assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    labels: HashMap<String, u16>,
    constants: HashMap<String, Value>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to an address.
    pub fn define_label(&mut self, name: &str, address: u16, span: Span) -> Result<(), CompileError> {
        if self.labels.contains_key(name) {
            return Err(CompileError::new(
                ErrorCode::DuplicateLabel,
                format!("label '{}' is already defined", name),
                span,
            ));
        }
        if self.constants.contains_key(name) {
            return Err(collision(name, "a constant", span));
        }
        self.labels.insert(name.to_string(), address);
        Ok(())
    }

    /// Bind `name` to a constant value.
    pub fn define_constant(&mut self, name: &str, value: Value, span: Span) -> Result<(), CompileError> {
        if self.constants.contains_key(name) {
            return Err(CompileError::new(
                ErrorCode::DuplicateConstant,
                format!("constant '{}' is already defined", name),
                span,
            ));
        }
        if self.labels.contains_key(name) {
            return Err(collision(name, "a label", span));
        }
        self.constants.insert(name.to_string(), value);
        Ok(())
    }

    /// Replace the value of an existing constant.
    pub(crate) fn update_constant(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.constants.get_mut(name) {
            *slot = value;
        }
    }

    /// Look a name up, constants first.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.constants
            .get(name)
            .copied()
            .or_else(|| self.labels.get(name).map(|&address| Value::address(address as i64)))
    }

    /// A defined name that equals `name` ignoring letter case.
    pub fn find_ignore_case(&self, name: &str) -> Option<&str> {
        self.constants
            .keys()
            .chain(self.labels.keys())
            .find(|k| k.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn label(&self, name: &str) -> Option<u16> {
        self.labels.get(name).copied()
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).copied()
    }

    /// Labels sorted by address, then name.
    pub fn labels(&self) -> Vec<(&str, u16)> {
        let mut labels: Vec<_> = self.labels.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        labels.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        labels
    }

    /// Constants sorted by name.
    pub fn constants(&self) -> Vec<(&str, Value)> {
        let mut constants: Vec<_> = self.constants.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        constants.sort_by(|a, b| a.0.cmp(b.0));
        constants
    }

    pub fn len(&self) -> usize {
        self.labels.len() + self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collision(name: &str, existing: &str, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::SymbolCollision,
        format!("'{}' is already defined as {}", name, existing),
        span,
    )
    .with_hint("labels and constants share one namespace")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut table = SymbolTable::new();
        table.define_label("start", 0x1000, Span::default()).unwrap();
        table.define_constant("N", Value::number(5), Span::default()).unwrap();
        assert_eq!(table.lookup("start"), Some(Value::address(0x1000)));
        assert_eq!(table.lookup("N"), Some(Value::number(5)));
        assert_eq!(table.lookup("n"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicates() {
        let mut table = SymbolTable::new();
        table.define_label("a", 1, Span::default()).unwrap();
        table.define_constant("b", Value::number(1), Span::default()).unwrap();

        let err = table.define_label("a", 2, Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateLabel);
        let err = table.define_constant("b", Value::number(2), Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateConstant);
        let err = table.define_constant("a", Value::number(2), Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SymbolCollision);
        let err = table.define_label("b", 2, Span::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SymbolCollision);
    }

    #[test]
    fn test_find_ignore_case() {
        let mut table = SymbolTable::new();
        table.define_label("MainLoop", 0x1000, Span::default()).unwrap();
        assert_eq!(table.find_ignore_case("mainloop"), Some("MainLoop"));
        assert_eq!(table.find_ignore_case("other"), None);
    }

    #[test]
    fn test_sorted_labels() {
        let mut table = SymbolTable::new();
        table.define_label("end", 0x2000, Span::default()).unwrap();
        table.define_label("start", 0x1000, Span::default()).unwrap();
        assert_eq!(table.labels(), vec![("start", 0x1000), ("end", 0x2000)]);
    }
}
