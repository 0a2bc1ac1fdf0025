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

//! The thirteen 6502 addressing modes.
//!
//! Modes are a plain tag stored in the opcode table. The CPU resolves a
//! mode through three dispatch functions: [`Cpu::effective_address`],
//! [`Cpu::load`] and [`Cpu::store`].

use super::Cpu;

/// Addressing mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
}

impl AddressingMode {
    /// All modes in table order.
    pub const ALL: [AddressingMode; 13] = [
        AddressingMode::Implied,
        AddressingMode::Accumulator,
        AddressingMode::Immediate,
        AddressingMode::Relative,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::Indirect,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
    ];

    /// Number of operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }

    /// Full instruction length including the opcode byte.
    pub const fn instruction_length(self) -> u8 {
        1 + self.operand_bytes()
    }

    /// Textual operand shape, e.g. `nnnn,X`.
    pub fn suffix(self) -> &'static str {
        match self {
            AddressingMode::Implied => "",
            AddressingMode::Accumulator => "A",
            AddressingMode::Immediate => "#nn",
            AddressingMode::Relative => "+nn",
            AddressingMode::ZeroPage => "nn",
            AddressingMode::ZeroPageX => "nn,X",
            AddressingMode::ZeroPageY => "nn,Y",
            AddressingMode::Absolute => "nnnn",
            AddressingMode::AbsoluteX => "nnnn,X",
            AddressingMode::AbsoluteY => "nnnn,Y",
            AddressingMode::Indirect => "(nnnn)",
            AddressingMode::IndirectX => "(nn,X)",
            AddressingMode::IndirectY => "(nn),Y",
        }
    }

    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            AddressingMode::Implied => "implied",
            AddressingMode::Accumulator => "accumulator",
            AddressingMode::Immediate => "immediate",
            AddressingMode::Relative => "relative",
            AddressingMode::ZeroPage => "zeropage",
            AddressingMode::ZeroPageX => "zeropage,X",
            AddressingMode::ZeroPageY => "zeropage,Y",
            AddressingMode::Absolute => "absolute",
            AddressingMode::AbsoluteX => "absolute,X",
            AddressingMode::AbsoluteY => "absolute,Y",
            AddressingMode::Indirect => "indirect",
            AddressingMode::IndirectX => "indexed indirect",
            AddressingMode::IndirectY => "indirect indexed",
        }
    }

    /// Whether an indexed load through this mode pays a cycle on a page cross.
    pub const fn has_page_penalty(self) -> bool {
        matches!(
            self,
            AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::IndirectY
        )
    }

    /// Render operand bytes in assembler syntax. `next_pc` is the address
    /// following the instruction and is used to resolve relative targets.
    pub fn format_operand(self, operand: [u8; 2], next_pc: u16) -> String {
        let byte = operand[0];
        let word = u16::from_le_bytes(operand);
        match self {
            AddressingMode::Implied => String::new(),
            AddressingMode::Accumulator => "A".to_string(),
            AddressingMode::Immediate => format!("#${:02X}", byte),
            AddressingMode::Relative => {
                format!("${:04X}", next_pc.wrapping_add(byte as i8 as u16))
            }
            AddressingMode::ZeroPage => format!("${:02X}", byte),
            AddressingMode::ZeroPageX => format!("${:02X},X", byte),
            AddressingMode::ZeroPageY => format!("${:02X},Y", byte),
            AddressingMode::Absolute => format!("${:04X}", word),
            AddressingMode::AbsoluteX => format!("${:04X},X", word),
            AddressingMode::AbsoluteY => format!("${:04X},Y", word),
            AddressingMode::Indirect => format!("(${:04X})", word),
            AddressingMode::IndirectX => format!("(${:02X},X)", byte),
            AddressingMode::IndirectY => format!("(${:02X}),Y", byte),
        }
    }
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A resolved effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAddress {
    pub address: u16,
    /// Indexing carried into the high byte.
    pub page_crossed: bool,
}

impl EffectiveAddress {
    fn direct(address: u16) -> Self {
        Self {
            address,
            page_crossed: false,
        }
    }

    fn indexed(base: u16, index: u8) -> Self {
        let address = base.wrapping_add(index as u16);
        Self {
            address,
            page_crossed: (base & 0xFF00) != (address & 0xFF00),
        }
    }
}

impl Cpu {
    /// The decoded operand bytes as a little-endian word.
    pub(crate) fn operand_word(&self) -> u16 {
        u16::from_le_bytes(self.ctx.operand)
    }

    /// Read a pointer from the zero page; the high byte wraps within page zero.
    fn zero_page_pointer(&self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16) as u16;
        let hi = self.memory.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    /// Compute the effective address of the current instruction's operand.
    ///
    /// Implied and accumulator modes have no address and yield `$0000`.
    pub(crate) fn effective_address(&self, mode: AddressingMode) -> EffectiveAddress {
        let op = self.ctx.operand[0];
        match mode {
            AddressingMode::Implied | AddressingMode::Accumulator => EffectiveAddress::direct(0),
            AddressingMode::Immediate => EffectiveAddress::direct(self.pc.wrapping_sub(1)),
            AddressingMode::Relative => {
                let target = self.pc.wrapping_add(op as i8 as u16);
                EffectiveAddress {
                    address: target,
                    page_crossed: (self.pc & 0xFF00) != (target & 0xFF00),
                }
            }
            AddressingMode::ZeroPage => EffectiveAddress::direct(op as u16),
            AddressingMode::ZeroPageX => EffectiveAddress::direct(op.wrapping_add(self.x) as u16),
            AddressingMode::ZeroPageY => EffectiveAddress::direct(op.wrapping_add(self.y) as u16),
            AddressingMode::Absolute => EffectiveAddress::direct(self.operand_word()),
            AddressingMode::AbsoluteX => EffectiveAddress::indexed(self.operand_word(), self.x),
            AddressingMode::AbsoluteY => EffectiveAddress::indexed(self.operand_word(), self.y),
            AddressingMode::Indirect => {
                // NMOS parts never carry into the pointer's high byte.
                let ptr = self.operand_word();
                let lo = self.memory.read(ptr) as u16;
                let hi = self.memory.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF)) as u16;
                EffectiveAddress::direct((hi << 8) | lo)
            }
            AddressingMode::IndirectX => {
                EffectiveAddress::direct(self.zero_page_pointer(op.wrapping_add(self.x)))
            }
            AddressingMode::IndirectY => {
                EffectiveAddress::indexed(self.zero_page_pointer(op), self.y)
            }
        }
    }

    /// Load a byte through `mode`.
    ///
    /// Returns `None` when an indexed load crosses a page: the address is
    /// latched and the caller re-invokes on the next tick to get the data.
    pub(crate) fn load(&mut self, mode: AddressingMode) -> Option<u8> {
        match mode {
            AddressingMode::Implied | AddressingMode::Accumulator => Some(self.a),
            AddressingMode::Immediate => Some(self.ctx.operand[0]),
            _ => {
                if let Some(address) = self.ctx.latched.take() {
                    return Some(self.memory.read(address));
                }
                let ea = self.effective_address(mode);
                if ea.page_crossed && mode.has_page_penalty() {
                    self.ctx.latched = Some(ea.address);
                    return None;
                }
                Some(self.memory.read(ea.address))
            }
        }
    }

    /// Store a byte through `mode`.
    ///
    /// Indexed stores always spend their fix-up cycle, which is already part
    /// of their nominal count, so a store completes in one invocation.
    pub(crate) fn store(&mut self, mode: AddressingMode, value: u8) {
        match mode {
            AddressingMode::Implied | AddressingMode::Accumulator => self.a = value,
            _ => {
                let ea = self.effective_address(mode);
                self.memory.write(ea.address, value);
            }
        }
    }

    /// Read-modify-write through `mode`, returning the value written back.
    pub(crate) fn modify(&mut self, mode: AddressingMode, f: impl FnOnce(&mut Cpu, u8) -> u8) -> u8 {
        match mode {
            AddressingMode::Implied | AddressingMode::Accumulator => {
                let a = self.a;
                let result = f(self, a);
                self.a = result;
                result
            }
            _ => {
                let address = self.effective_address(mode).address;
                let value = self.memory.read(address);
                let result = f(self, value);
                self.memory.write(address, result);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_sizes() {
        assert_eq!(AddressingMode::Implied.instruction_length(), 1);
        assert_eq!(AddressingMode::Accumulator.instruction_length(), 1);
        assert_eq!(AddressingMode::Immediate.instruction_length(), 2);
        assert_eq!(AddressingMode::Relative.instruction_length(), 2);
        assert_eq!(AddressingMode::IndirectY.instruction_length(), 2);
        assert_eq!(AddressingMode::Absolute.instruction_length(), 3);
        assert_eq!(AddressingMode::Indirect.instruction_length(), 3);
    }

    #[test]
    fn test_format_operand() {
        assert_eq!(AddressingMode::Immediate.format_operand([0x01, 0], 0), "#$01");
        assert_eq!(AddressingMode::AbsoluteX.format_operand([0x20, 0xD0], 0), "$D020,X");
        assert_eq!(AddressingMode::IndirectY.format_operand([0xFB, 0], 0), "($FB),Y");
        assert_eq!(AddressingMode::Relative.format_operand([0xFD, 0], 0x1003), "$1000");
    }

    #[test]
    fn test_indexed_page_cross() {
        let ea = EffectiveAddress::indexed(0x10FF, 1);
        assert_eq!(ea.address, 0x1100);
        assert!(ea.page_crossed);
        assert!(!EffectiveAddress::indexed(0x1000, 0xFF).page_crossed);
    }
}
