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

//! Undocumented opcodes.
//!
//! Read-modify-write combos perform the memory operation first and then
//! feed the written value into the companion ALU operation. ARR and XAA
//! vary between chip revisions; the behavior here is the common emulator
//! contract (binary-mode ARR, `A = X AND operand` for XAA).

use super::alu::{add, compare, subtract};
use super::shifts::{rotate_left, rotate_right, shift_left, shift_right};
use crate::cpu::addressing::AddressingMode;
use crate::cpu::Cpu;

/// SLO - ASL memory, then ORA.
pub(crate) fn slo(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, shift_left);
    cpu.a |= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// RLA - ROL memory, then AND.
pub(crate) fn rla(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, rotate_left);
    cpu.a &= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// SRE - LSR memory, then EOR.
pub(crate) fn sre(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, shift_right);
    cpu.a ^= value;
    cpu.p.set_nz(cpu.a);
    true
}

/// RRA - ROR memory, then ADC (the rotated-out bit is the carry in).
pub(crate) fn rra(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, rotate_right);
    add(cpu, value);
    true
}

/// DCP - DEC memory, then CMP.
pub(crate) fn dcp(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, |_, v| v.wrapping_sub(1));
    let a = cpu.a;
    compare(cpu, a, value);
    true
}

/// ISC - INC memory, then SBC.
pub(crate) fn isc(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let value = cpu.modify(mode, |_, v| v.wrapping_add(1));
    subtract(cpu, value);
    true
}

/// LAX - load A and X.
pub(crate) fn lax(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a = value;
    cpu.x = value;
    cpu.p.set_nz(value);
    true
}

/// SAX - store A AND X, flags untouched.
pub(crate) fn sax(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.store(mode, cpu.a & cpu.x);
    true
}

/// ANC - AND, then copy bit 7 into C.
pub(crate) fn anc(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a &= value;
    cpu.p.set_nz(cpu.a);
    cpu.p.carry = cpu.p.negative;
    true
}

/// ALR - AND, then LSR A.
pub(crate) fn alr(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    let masked = cpu.a & value;
    cpu.a = shift_right(cpu, masked);
    true
}

/// ARR - AND, then ROR A; C is bit 6 and V is bit 6 XOR bit 5 of the result.
pub(crate) fn arr(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    let masked = cpu.a & value;
    let result = (masked >> 1) | ((cpu.p.carry as u8) << 7);
    cpu.a = result;
    cpu.p.set_nz(result);
    cpu.p.carry = result & 0x40 != 0;
    cpu.p.overflow = ((result >> 6) ^ (result >> 5)) & 0x01 != 0;
    true
}

/// XAA - A = X AND operand.
pub(crate) fn xaa(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a = cpu.x & value;
    cpu.p.set_nz(cpu.a);
    true
}
