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

//! Shift, rotate, increment and decrement instructions.
//!
//! Each operation works on A (accumulator mode) or memory (read-modify-write).

use crate::cpu::addressing::AddressingMode;
use crate::cpu::Cpu;

pub(crate) fn shift_left(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.p.carry = value & 0x80 != 0;
    let result = value << 1;
    cpu.p.set_nz(result);
    result
}

pub(crate) fn shift_right(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.p.carry = value & 0x01 != 0;
    let result = value >> 1;
    cpu.p.set_nz(result);
    result
}

pub(crate) fn rotate_left(cpu: &mut Cpu, value: u8) -> u8 {
    let result = (value << 1) | cpu.p.carry as u8;
    cpu.p.carry = value & 0x80 != 0;
    cpu.p.set_nz(result);
    result
}

pub(crate) fn rotate_right(cpu: &mut Cpu, value: u8) -> u8 {
    let result = (value >> 1) | ((cpu.p.carry as u8) << 7);
    cpu.p.carry = value & 0x01 != 0;
    cpu.p.set_nz(result);
    result
}

pub(crate) fn asl(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, shift_left);
    true
}

pub(crate) fn lsr(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, shift_right);
    true
}

pub(crate) fn rol(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, rotate_left);
    true
}

pub(crate) fn ror(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, rotate_right);
    true
}

pub(crate) fn inc(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, |cpu, v| {
        let result = v.wrapping_add(1);
        cpu.p.set_nz(result);
        result
    });
    true
}

pub(crate) fn dec(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.modify(mode, |cpu, v| {
        let result = v.wrapping_sub(1);
        cpu.p.set_nz(result);
        result
    });
    true
}

pub(crate) fn inx(cpu: &mut Cpu) -> bool {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.p.set_nz(cpu.x);
    true
}

pub(crate) fn iny(cpu: &mut Cpu) -> bool {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.p.set_nz(cpu.y);
    true
}

pub(crate) fn dex(cpu: &mut Cpu) -> bool {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.p.set_nz(cpu.x);
    true
}

pub(crate) fn dey(cpu: &mut Cpu) -> bool {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.p.set_nz(cpu.y);
    true
}
