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

//! Load, store and register transfer instructions.

use crate::cpu::addressing::AddressingMode;
use crate::cpu::Cpu;

/// LDA - Load A.
pub(crate) fn lda(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.a = value;
    cpu.p.set_nz(value);
    true
}

/// LDX - Load X.
pub(crate) fn ldx(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.x = value;
    cpu.p.set_nz(value);
    true
}

/// LDY - Load Y.
pub(crate) fn ldy(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    let Some(value) = cpu.load(mode) else {
        return false;
    };
    cpu.y = value;
    cpu.p.set_nz(value);
    true
}

/// STA - Store A.
pub(crate) fn sta(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.store(mode, cpu.a);
    true
}

/// STX - Store X.
pub(crate) fn stx(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.store(mode, cpu.x);
    true
}

/// STY - Store Y.
pub(crate) fn sty(cpu: &mut Cpu, mode: AddressingMode) -> bool {
    cpu.store(mode, cpu.y);
    true
}

/// Register-to-register transfer; TXS is the only one that leaves the flags alone.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Transfer {
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

pub(crate) fn transfer(cpu: &mut Cpu, kind: Transfer) -> bool {
    match kind {
        Transfer::Tax => {
            cpu.x = cpu.a;
            cpu.p.set_nz(cpu.x);
        }
        Transfer::Tay => {
            cpu.y = cpu.a;
            cpu.p.set_nz(cpu.y);
        }
        Transfer::Tsx => {
            cpu.x = cpu.sp;
            cpu.p.set_nz(cpu.x);
        }
        Transfer::Txa => {
            cpu.a = cpu.x;
            cpu.p.set_nz(cpu.a);
        }
        Transfer::Txs => cpu.sp = cpu.x,
        Transfer::Tya => {
            cpu.a = cpu.y;
            cpu.p.set_nz(cpu.a);
        }
    }
    true
}
