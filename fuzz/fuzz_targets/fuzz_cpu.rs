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


//! Fuzz target for the CPU.
//!
//! Random bytes are loaded as a program and run for a bounded number of
//! cycles. Unknown opcodes must surface as errors, never as panics.

#![no_main]

use asm65::cpu::{Cpu, Memory, RESET_VECTOR};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut memory = Memory::new();
    memory.load(0x0200, data);
    memory.write_word(RESET_VECTOR, 0x0200);

    let mut cpu = Cpu::new(memory);
    let _ = cpu.run_for(10_000);
    assert!(cpu.status() & 0x20 != 0);
});
