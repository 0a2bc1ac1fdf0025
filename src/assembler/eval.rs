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

//! Expression evaluation.
//!
//! Expressions are evaluated on checked `i64` arithmetic. During layout an
//! unknown symbol evaluates to an unresolved address of zero, so that a
//! forward reference is sized like the label it most likely is. During code
//! generation every symbol must resolve.

use super::symbols::SymbolTable;
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::convert::{fits_word, narrowest_width, Width};
use crate::error::{CompileError, ErrorCode};

/// The result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value {
    /// The numeric value.
    pub value: i64,
    /// Whether a label (or `*`) contributed to the value.
    pub is_address: bool,
    /// False if an unknown symbol was replaced by zero during layout.
    pub known: bool,
}

impl Value {
    /// A plain number.
    pub const fn number(value: i64) -> Self {
        Self {
            value,
            is_address: false,
            known: true,
        }
    }

    /// An address.
    pub const fn address(value: i64) -> Self {
        Self {
            value,
            is_address: true,
            known: true,
        }
    }

    /// Placeholder for a symbol not yet defined.
    pub const fn unresolved() -> Self {
        Self {
            value: 0,
            is_address: true,
            known: false,
        }
    }

    /// Operand width this value needs: addresses are always words,
    /// numbers use the narrowest width. `None` if wider than 16 bits.
    pub fn width(&self) -> Option<Width> {
        if self.is_address {
            fits_word(self.value).then_some(Width::Word)
        } else {
            narrowest_width(self.value)
        }
    }
}

/// Which assembly pass an evaluation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Sizing: unknown symbols are tolerated.
    Layout,
    /// Emission: every symbol must resolve.
    Codegen,
}

/// Evaluates expressions against a symbol table.
pub struct Evaluator<'a> {
    symbols: &'a SymbolTable,
    /// Address of the statement being assembled, the value of `*`.
    pc: u16,
    pass: Pass,
}

impl<'a> Evaluator<'a> {
    pub fn new(symbols: &'a SymbolTable, pc: u16, pass: Pass) -> Self {
        Self { symbols, pc, pass }
    }

    /// Evaluate an expression.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, CompileError> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::number(*n)),
            ExprKind::CurrentPc => Ok(Value::address(self.pc as i64)),
            ExprKind::Grouped(inner) => self.evaluate(inner),
            ExprKind::Symbol(name) => self.symbol(name, expr),
            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                self.unary(*op, value, expr)
            }
            ExprKind::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(*op, left, right, expr)
            }
        }
    }

    fn symbol(&self, name: &str, expr: &Expr) -> Result<Value, CompileError> {
        if let Some(value) = self.symbols.lookup(name) {
            if !value.known && self.pass == Pass::Codegen {
                return Err(CompileError::new(
                    ErrorCode::ConstantExpressionRequired,
                    format!("constant '{}' is used before its value can be resolved", name),
                    expr.span.clone(),
                )
                .with_hint("define the constant before its first use"));
            }
            return Ok(value);
        }
        if self.pass == Pass::Layout {
            return Ok(Value::unresolved());
        }

        let error = CompileError::new(
            ErrorCode::UndefinedSymbol,
            format!("undefined symbol '{}'", name),
            expr.span.clone(),
        );
        Err(match self.symbols.find_ignore_case(name) {
            Some(other) => error.with_hint(format!(
                "symbols are case-sensitive; did you mean '{}'?",
                other
            )),
            None => error,
        })
    }

    fn unary(&self, op: UnaryOp, value: Value, expr: &Expr) -> Result<Value, CompileError> {
        let result = match op {
            UnaryOp::Plus => return Ok(value),
            UnaryOp::Negate => value
                .value
                .checked_neg()
                .ok_or_else(|| overflow(expr))?,
            UnaryOp::LowByte => value.value & 0xFF,
            UnaryOp::HighByte => (value.value >> 8) & 0xFF,
        };
        let is_address = match op {
            UnaryOp::LowByte | UnaryOp::HighByte => false,
            _ => value.is_address,
        };
        Ok(Value {
            value: result,
            is_address,
            known: value.known,
        })
    }

    fn binary(&self, op: BinaryOp, left: Value, right: Value, expr: &Expr) -> Result<Value, CompileError> {
        let known = left.known && right.known;
        let a = left.value;
        let b = right.value;

        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div if b == 0 && !known => Some(0),
            BinaryOp::Div if b == 0 => {
                return Err(CompileError::new(
                    ErrorCode::DivisionByZero,
                    "division by zero",
                    expr.span.clone(),
                ))
            }
            BinaryOp::Div => a.checked_div(b),
        }
        .ok_or_else(|| overflow(expr))?;

        Ok(Value {
            value: result,
            is_address: left.is_address || right.is_address,
            known,
        })
    }
}

fn overflow(expr: &Expr) -> CompileError {
    CompileError::new(
        ErrorCode::ArithmeticOverflow,
        "arithmetic overflow in expression",
        expr.span.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::lexer::tokenize;
    use crate::parser::expressions::ExpressionParser;
    use crate::parser::Parser;
    use test_case::test_case;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.define_label("start", 0x1234, Span::default()).unwrap();
        table.define_constant("N", Value::number(10), Span::default()).unwrap();
        table
    }

    fn eval(source: &str, pass: Pass) -> Result<Value, CompileError> {
        let tokens = tokenize(source)?;
        let expr = Parser::new(&tokens).parse_expression()?;
        let symbols = table();
        Evaluator::new(&symbols, 0xC000, pass).evaluate(&expr)
    }

    #[test_case("1 + 2 * 3", 7; "precedence")]
    #[test_case("(1 + 2) * 3", 9; "grouping")]
    #[test_case("$10 - %1", 15; "radix mix")]
    #[test_case("-N + 3", -7; "negation")]
    #[test_case("7 / 2", 3; "integer division")]
    #[test_case("<start", 0x34; "low byte")]
    #[test_case(">start", 0x12; "high byte")]
    #[test_case(">start + 1", 0x12; "high byte of sum")]
    #[test_case("* + 2", 0xC002; "current pc")]
    #[test_case("<-1", 0xFF; "low byte of negative")]
    fn test_values(source: &str, expected: i64) {
        assert_eq!(eval(source, Pass::Codegen).unwrap().value, expected);
    }

    #[test]
    fn test_address_tracking() {
        assert!(eval("start + 1", Pass::Codegen).unwrap().is_address);
        assert!(!eval("N * 2", Pass::Codegen).unwrap().is_address);
        assert!(!eval("<start", Pass::Codegen).unwrap().is_address);
    }

    #[test]
    fn test_width() {
        assert_eq!(Value::number(0x10).width(), Some(Width::Byte));
        assert_eq!(Value::address(0x10).width(), Some(Width::Word));
        assert_eq!(Value::number(0x10000).width(), None);
    }

    #[test]
    fn test_unknown_symbol_by_pass() {
        let value = eval("later + 1", Pass::Layout).unwrap();
        assert!(!value.known);
        assert!(value.is_address);

        let err = eval("later", Pass::Codegen).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedSymbol);
    }

    #[test]
    fn test_case_mismatch_hint() {
        let err = eval("START", Pass::Codegen).unwrap_err();
        assert_eq!(err.hint.as_deref(), Some("symbols are case-sensitive; did you mean 'start'?"));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0", Pass::Codegen).unwrap_err().code, ErrorCode::DivisionByZero);
        assert_eq!(eval("1 / later", Pass::Layout).unwrap().value, 0);
    }

    #[test]
    fn test_overflow() {
        let err = eval("$7FFFFFFFFFFFFFFF + 1", Pass::Codegen).unwrap_err();
        assert_eq!(err.code, ErrorCode::ArithmeticOverflow);
    }
}
