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

//! Conditional branch instructions.
//!
//! Cycle timing:
//! - 2 cycles if the branch is not taken
//! - 3 cycles if taken to the same page
//! - 4 cycles if taken across a page boundary
//!
//! The extra cycles are spent as stall ticks after the PC has been updated.

use crate::cpu::addressing::AddressingMode;
use crate::cpu::opcodes::Mnemonic;
use crate::cpu::Cpu;

/// Evaluate the flag condition tested by a branch mnemonic.
fn condition(cpu: &Cpu, mnemonic: Mnemonic) -> bool {
    match mnemonic {
        Mnemonic::Bcc => !cpu.p.carry,
        Mnemonic::Bcs => cpu.p.carry,
        Mnemonic::Bne => !cpu.p.zero,
        Mnemonic::Beq => cpu.p.zero,
        Mnemonic::Bpl => !cpu.p.negative,
        Mnemonic::Bmi => cpu.p.negative,
        Mnemonic::Bvc => !cpu.p.overflow,
        Mnemonic::Bvs => cpu.p.overflow,
        _ => false,
    }
}

/// Execute any conditional branch.
pub(crate) fn branch(cpu: &mut Cpu, mnemonic: Mnemonic) -> bool {
    if !condition(cpu, mnemonic) {
        return true;
    }

    let target = cpu.effective_address(AddressingMode::Relative);
    cpu.pc = target.address;
    cpu.ctx.stall = if target.page_crossed { 2 } else { 1 };
    false
}
