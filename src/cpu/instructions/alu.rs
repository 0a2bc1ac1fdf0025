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

//! Arithmetic and logic instructions.
//!
//! - ADC/SBC in binary and decimal mode
//! - AND, ORA, EOR
//! - CMP, CPX, CPY
//! - BIT
//!
//! The value helpers ([`add`], [`subtract`], [`compare`]) are shared with
//! the undocumented combo opcodes.

use crate::cpu::addressing::AddressingMode;
use crate::cpu::Cpu;

/// Add `value` and the carry to A, honouring the D flag.
pub(crate) fn add(cpu: &mut Cpu, value: u8) {
    let a = cpu.a;
    let carry = cpu.p.carry as u16;
    let binary = a as u16 + value as u16 + carry;

    if !cpu.p.decimal {
        let result = binary as u8;
        cpu.p.carry = binary > 0xFF;
        cpu.p.overflow = (a ^ result) & (value ^ result) & 0x80 != 0;
        cpu.p.set_nz(result);
        cpu.a = result;
        return;
    }

    // NMOS decimal mode: Z comes from the binary sum, N and V from the
    // intermediate result before the high nibble is adjusted.
    let mut lo = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry;
    if lo > 0x09 {
        lo += 0x06;
    }
    let mut hi = (a >> 4) as u16 + (value >> 4) as u16 + if lo > 0x0F { 1 } else { 0 };

    let intermediate = ((hi << 4) & 0xF0) as u8;
    cpu.p.zero = binary & 0xFF == 0;
    cpu.p.negative = intermediate & 0x80 != 0;
    cpu.p.overflow = (a ^ intermediate) & 0x80 != 0 && (a ^ value) & 0x80 == 0;

    if hi > 0x09 {
        hi += 0x06;
    }
    cpu.p.carry = hi > 0x0F;
    cpu.a = (((hi << 4) & 0xF0) | (lo & 0x0F)) as u8;
}

/// Subtract `value` and the borrow from A, honouring the D flag.
///
/// Flags always follow the binary subtraction, as on the NMOS 6502.
pub(crate) fn subtract(cpu: &mut Cpu, value: u8) {
    let a = cpu.a;
    let borrow = (!cpu.p.carry) as i16;
    let binary = a as i16 - value as i16 - borrow;
    let result = binary as u8;

    cpu.p.carry = binary >= 0;
    cpu.p.overflow = (a ^ result) & (a ^ value) & 0x80 != 0;
    cpu.p.set_nz(result);

    if !cpu.p.decimal {
        cpu.a = result;
        return;
    }

    let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (value >> 4) as i16;
    if lo < 0 {
        lo += 10;
        hi -= 1;
    }
    if hi < 0 {
        hi += 10;
    }
    cpu.a = (((hi << 4) & 0xF0) | (lo & 0x0F)) as u8;
}

/// Compare a register with `value`: Z and N from the difference, C when `register >= value`.
pub(crate) fn compare(cpu: &mut Cpu, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.p.carry = register >= value;
    cpu.p.set_nz(result);
}

/// ADC - Add with Carry.
pub(crate) fn adc(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    add(cpu, value);
    true
}

/// SBC - Subtract with Carry.
pub(crate) fn sbc(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    subtract(cpu, value);
    true
}

/// AND - Logical AND with A.
pub(crate) fn and(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a &= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// ORA - Logical OR with A.
pub(crate) fn ora(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a |= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// EOR - Exclusive OR with A.
pub(crate) fn eor(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a ^= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// CMP - Compare with A.
pub(crate) fn cmp(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    let register = cpu.a;
    compare(cpu, register, value);
    true
}

/// CPX - Compare with X.
pub(crate) fn cpx(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    let register = cpu.x;
    compare(cpu, register, value);
    true
}

/// CPY - Compare with Y.
pub(crate) fn cpy(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    let register = cpu.y;
    compare(cpu, register, value);
    true
}

/// BIT - Test bits: N and V from the operand, Z from `A AND M`.
pub(crate) fn bit(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.p.negative = value & 0x80 != 0;
    cpu.p.overflow = value & 0x40 != 0;
    cpu.p.zero = cpu.a & value == 0;
    true
}
