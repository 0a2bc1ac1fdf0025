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

//! Control flow, stack and flag instructions.

use crate::cpu::addressing::AddressingMode;
use crate::cpu::interrupts::IRQ_VECTOR;
use crate::cpu::Cpu;

/// JMP - absolute or indirect.
pub(crate) fn jmp(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.pc = cpu.effective_address(mode).address;
    true
}

/// JSR - push the address of the last operand byte, then jump.
pub(crate) fn jsr(cpu: &mut Cpu) -> bool {
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.push_word(return_address);
    cpu.pc = cpu.operand_word();
    true
}

/// RTS - pull the return address and add one.
pub(crate) fn rts(cpu: &mut Cpu) -> bool {
    cpu.pc = cpu.pop_word().wrapping_add(1);
    true
}

/// RTI - pull P, then PC.
pub(crate) fn rti(cpu: &mut Cpu) -> bool {
    let p = cpu.pop();
    cpu.set_status(p);
    cpu.pc = cpu.pop_word();
    true
}

/// BRK - software interrupt through the IRQ vector, pushing P with B set.
///
/// BRK is one byte long but the return address skips a padding byte.
pub(crate) fn brk(cpu: &mut Cpu) -> bool {
    let return_address = cpu.pc.wrapping_add(1);
    cpu.push_word(return_address);
    cpu.push(cpu.p.to_byte(true));
    cpu.p.interrupt = true;
    cpu.pc = cpu.memory.read_word(IRQ_VECTOR);
    true
}

pub(crate) fn pha(cpu: &mut Cpu) -> bool {
    cpu.push(cpu.a);
    true
}

/// PHP pushes with B set, like BRK.
pub(crate) fn php(cpu: &mut Cpu) -> bool {
    cpu.push(cpu.p.to_byte(true));
    true
}

pub(crate) fn pla(cpu: &mut Cpu) -> bool {
    cpu.a = cpu.pop();
    cpu.p.set_nz(cpu.a);
    true
}

pub(crate) fn plp(cpu: &mut Cpu) -> bool {
    let p = cpu.pop();
    cpu.set_status(p);
    true
}

/// Flag set/clear instructions.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FlagOp {
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,
}

pub(crate) fn flag(cpu: &mut Cpu, op: FlagOp) -> bool {
    match op {
        FlagOp::Clc => cpu.p.carry = false,
        FlagOp::Sec => cpu.p.carry = true,
        FlagOp::Cli => cpu.p.interrupt = false,
        FlagOp::Sei => cpu.p.interrupt = true,
        FlagOp::Cld => cpu.p.decimal = false,
        FlagOp::Sed => cpu.p.decimal = true,
        FlagOp::Clv => cpu.p.overflow = false,
    }
    true
}

/// NOP in all its forms. Operand-carrying variants still perform their
/// read, which is what makes `TOP abs,X` pay the page-cross cycle.
pub(crate) fn nop(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    match mode {
        AddressingMode::Implied => true,
        _ => cpu.load(mode).is_some(),
    }
}
