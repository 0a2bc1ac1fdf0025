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

//! Processor status register.
//!
//! The live register only tracks the six real flags. Bit 5 is forced on
//! whenever the register is packed into a byte, and the B bit exists only
//! in the copy pushed by BRK/PHP.

/// Bit masks of the packed status byte (`NV-BDIZC`).
pub mod flags {
    pub const CARRY: u8 = 0x01;
    pub const ZERO: u8 = 0x02;
    pub const INTERRUPT: u8 = 0x04;
    pub const DECIMAL: u8 = 0x08;
    pub const BREAK: u8 = 0x10;
    pub const UNUSED: u8 = 0x20;
    pub const OVERFLOW: u8 = 0x40;
    pub const NEGATIVE: u8 = 0x80;
}

/// The processor status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub negative: bool,
    pub overflow: bool,
    pub decimal: bool,
    pub interrupt: bool,
    pub zero: bool,
    pub carry: bool,
}

impl Status {
    /// Pack the flags into a byte. `brk` controls the B bit of the copy.
    pub fn to_byte(self, brk: bool) -> u8 {
        let mut p = flags::UNUSED;
        if self.negative {
            p |= flags::NEGATIVE;
        }
        if self.overflow {
            p |= flags::OVERFLOW;
        }
        if brk {
            p |= flags::BREAK;
        }
        if self.decimal {
            p |= flags::DECIMAL;
        }
        if self.interrupt {
            p |= flags::INTERRUPT;
        }
        if self.zero {
            p |= flags::ZERO;
        }
        if self.carry {
            p |= flags::CARRY;
        }
        p
    }

    /// Unpack a status byte. B and bit 5 are ignored.
    pub fn from_byte(p: u8) -> Self {
        Self {
            negative: p & flags::NEGATIVE != 0,
            overflow: p & flags::OVERFLOW != 0,
            decimal: p & flags::DECIMAL != 0,
            interrupt: p & flags::INTERRUPT != 0,
            zero: p & flags::ZERO != 0,
            carry: p & flags::CARRY != 0,
        }
    }

    /// Set Z and N from a result byte.
    pub fn set_nz(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & 0x80 != 0;
    }
}
