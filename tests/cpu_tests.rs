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

//! Interpreter conformance tests.
//!
//! Programs are assembled with the crate's own assembler where that keeps
//! the test readable, and poked in as raw bytes where exact encodings
//! matter.

use asm65::cpu::{Cpu, CpuError, Memory, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// A CPU whose reset vector points at `origin`, with `code` loaded there.
fn cpu_with(origin: u16, code: &[u8]) -> Cpu {
    let mut memory = Memory::new();
    memory.load(origin, code);
    memory.write_word(RESET_VECTOR, origin);
    Cpu::new(memory)
}

/// Assemble `source` and reset into its first segment.
fn cpu_from_source(source: &str) -> Cpu {
    let segments = asm65::assemble(source).expect("Assembly should succeed");
    let mut memory = Memory::new();
    memory.write_word(RESET_VECTOR, segments[0].start);
    let mut cpu = Cpu::new(memory);
    cpu.load_segments(&segments);
    cpu.reset();
    cpu
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_immediate_load_cycle_accounting() {
    let mut cpu = cpu_from_source(".ORG $D000\nLDA #$01");

    assert_eq!(cpu.step().unwrap(), 2);
    assert_eq!(cpu.a(), 0x01);
    assert_eq!(cpu.pc(), 0xD002);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_bcd_addition() {
    let mut cpu = cpu_with(0x0200, &[0x69, 0x39]);
    cpu.set_a(0x49);
    cpu.set_flag_c(false);
    cpu.set_flag_d(true);

    assert_eq!(cpu.step().unwrap(), 2);
    assert_eq!(cpu.a(), 0x88);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
}

#[test]
fn test_nmi_service() {
    let mut cpu = cpu_from_source(".ORG $D000\nLDA #$05");
    cpu.memory_mut().write_word(NMI_VECTOR, 0xDEAD);

    // Assert NMI in the middle of the LDA.
    assert!(!cpu.execute().unwrap());
    cpu.trigger_nmi();
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0xD002);

    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.pc(), 0xDEAD);
    assert_eq!(cpu.sp(), 0xFA);
    assert_eq!(cpu.memory().read(0x01FD), 0xD0);
    assert_eq!(cpu.memory().read(0x01FC), 0x02);
    let pushed = cpu.memory().read(0x01FB);
    assert_eq!(pushed & 0x10, 0, "B must be clear in the pushed status");
    assert_eq!(pushed & 0x20, 0x20);
    assert!(cpu.flag_i());
    assert!(!cpu.nmi_pending());
}

// ============================================================================
// Timing
// ============================================================================

#[test_case(&[0xA9, 0x01], 2 ; "lda immediate")]
#[test_case(&[0xA5, 0x10], 3 ; "lda zero page")]
#[test_case(&[0xAD, 0x00, 0x30], 4 ; "lda absolute")]
#[test_case(&[0xBD, 0xFF, 0x30], 5 ; "lda absolute x page cross")]
#[test_case(&[0xBD, 0x00, 0x30], 4 ; "lda absolute x same page")]
#[test_case(&[0x9D, 0xFF, 0x30], 5 ; "sta absolute x no penalty")]
#[test_case(&[0xFE, 0xFF, 0x30], 7 ; "inc absolute x no penalty")]
#[test_case(&[0xB1, 0x80], 6 ; "lda indirect y page cross")]
#[test_case(&[0x91, 0x80], 6 ; "sta indirect y")]
#[test_case(&[0xBF, 0xFF, 0x30], 5 ; "lax absolute y page cross")]
#[test_case(&[0x1C, 0xFF, 0x30], 5 ; "top absolute x page cross")]
#[test_case(&[0x20, 0x00, 0x30], 6 ; "jsr")]
#[test_case(&[0x6C, 0x00, 0x30], 5 ; "jmp indirect")]
#[test_case(&[0x48], 3 ; "pha")]
#[test_case(&[0x03, 0x80], 8 ; "slo indirect x")]
fn test_instruction_cycles(code: &[u8], cycles: u64) {
    let mut cpu = cpu_with(0x0200, code);
    cpu.set_x(1);
    cpu.set_y(1);
    cpu.memory_mut().write_word(0x0080, 0x30FF);

    assert_eq!(cpu.step().unwrap(), cycles);
}

#[test_case(0x0200, false, 2 ; "not taken")]
#[test_case(0x0200, true, 3 ; "taken same page")]
#[test_case(0x02F0, true, 4 ; "taken across page")]
fn test_branch_cycles(origin: u16, taken: bool, cycles: u64) {
    // BNE +$20
    let mut cpu = cpu_with(origin, &[0xD0, 0x20]);
    cpu.set_flag_z(!taken);

    assert_eq!(cpu.step().unwrap(), cycles);
    let expected = if taken { origin + 0x22 } else { origin + 2 };
    assert_eq!(cpu.pc(), expected);
}

#[test]
fn test_execute_ticks_one_cycle() {
    let mut cpu = cpu_with(0x0200, &[0xAD, 0x00, 0x30, 0xEA]);

    assert!(!cpu.execute().unwrap());
    assert!(!cpu.execute().unwrap());
    assert!(!cpu.execute().unwrap());
    assert!(cpu.execute().unwrap());
    assert_eq!(cpu.cycles(), 4);
    assert_eq!(cpu.pc(), 0x0203);
}

#[test]
fn test_run_for_budget() {
    // Endless loop: INX; JMP $0200
    let mut cpu = cpu_with(0x0200, &[0xE8, 0x4C, 0x00, 0x02]);
    assert_eq!(cpu.run_for(50).unwrap(), 50);
    assert_eq!(cpu.cycles(), 50);
    // Each iteration is 5 cycles.
    assert_eq!(cpu.x(), 10);
}

// ============================================================================
// Instructions
// ============================================================================

#[test]
fn test_subroutine_call() {
    let mut cpu = cpu_from_source(
        ".ORG $1000\nJSR sub\nLDX #2\nsub: LDA #1\nRTS",
    );
    cpu.step().unwrap(); // JSR
    assert_eq!(cpu.pc(), 0x1005);
    cpu.step().unwrap(); // LDA
    cpu.step().unwrap(); // RTS
    assert_eq!(cpu.pc(), 0x1003);
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_loop_counts_down() {
    let mut cpu = cpu_from_source(".ORG $1000\nLDX #5\nloop: DEX\nBNE loop\nBRK");
    for _ in 0..11 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.x(), 0);
    assert!(cpu.flag_z());
    assert_eq!(cpu.pc(), 0x1005);
}

#[test]
fn test_jmp_indirect_page_wrap() {
    let mut cpu = cpu_with(0x0200, &[0x6C, 0xFF, 0x30]);
    cpu.memory_mut().write(0x30FF, 0x34);
    cpu.memory_mut().write(0x3000, 0x12);
    cpu.memory_mut().write(0x3100, 0x56);

    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_brk_and_rti() {
    let mut cpu = cpu_with(0x0200, &[0x00, 0xEA, 0xEA]);
    cpu.memory_mut().write_word(IRQ_VECTOR, 0x4000);
    cpu.memory_mut().write(0x4000, 0x40);

    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.pc(), 0x4000);
    assert_ne!(cpu.memory().read(0x01FB) & 0x10, 0, "BRK pushes B set");

    cpu.step().unwrap();
    // BRK skips the padding byte.
    assert_eq!(cpu.pc(), 0x0202);
}

#[test]
fn test_irq_masked_until_cli() {
    let mut cpu = cpu_with(0x0200, &[0xEA, 0x58, 0xEA, 0xEA]);
    cpu.memory_mut().write_word(IRQ_VECTOR, 0x5000);
    cpu.set_irq_line(true);

    cpu.step().unwrap(); // NOP, I set after reset
    assert_eq!(cpu.pc(), 0x0201);
    cpu.step().unwrap(); // CLI
    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.pc(), 0x5000);
    assert!(!cpu.irq_pending());
}

#[test]
fn test_decimal_subtraction() {
    let mut cpu = cpu_with(0x0200, &[0xE9, 0x01]);
    cpu.set_a(0x50);
    cpu.set_flag_c(true);
    cpu.set_flag_d(true);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x49);
    assert!(cpu.flag_c());
}

#[test]
fn test_binary_overflow() {
    let mut cpu = cpu_with(0x0200, &[0x69, 0x50]);
    cpu.set_a(0x50);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
}

#[test]
fn test_unused_flag_always_set() {
    let mut cpu = cpu_with(0x0200, &[0xA9, 0x00, 0x48, 0x28]);
    cpu.set_status(0x00);
    assert_eq!(cpu.status() & 0x20, 0x20);

    for _ in 0..3 {
        cpu.step().unwrap();
        assert_eq!(cpu.status() & 0x20, 0x20);
    }
}

// ============================================================================
// Undocumented opcodes
// ============================================================================

#[test]
fn test_lax_loads_a_and_x() {
    let mut cpu = cpu_with(0x0200, &[0xA7, 0x10]);
    cpu.memory_mut().write(0x10, 0x80);

    cpu.step().unwrap();
    assert_eq!((cpu.a(), cpu.x()), (0x80, 0x80));
    assert!(cpu.flag_n());
}

#[test]
fn test_sax_stores_a_and_x() {
    let mut cpu = cpu_with(0x0200, &[0x87, 0x10]);
    cpu.set_a(0xF0);
    cpu.set_x(0x3C);
    cpu.set_status(0x02);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x30);
    assert!(cpu.flag_z(), "SAX leaves flags untouched");
}

#[test]
fn test_dcp_decrements_and_compares() {
    let mut cpu = cpu_with(0x0200, &[0xC7, 0x10]);
    cpu.memory_mut().write(0x10, 0x43);
    cpu.set_a(0x42);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x42);
    assert!(cpu.flag_z());
    assert!(cpu.flag_c());
}

#[test]
fn test_isc_increments_and_subtracts() {
    let mut cpu = cpu_with(0x0200, &[0xE7, 0x10]);
    cpu.memory_mut().write(0x10, 0x0F);
    cpu.set_a(0x20);
    cpu.set_flag_c(true);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x10);
    assert_eq!(cpu.a(), 0x10);
}

#[test]
fn test_slo_shifts_and_ors() {
    let mut cpu = cpu_with(0x0200, &[0x07, 0x10]);
    cpu.memory_mut().write(0x10, 0x81);
    cpu.set_a(0x01);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x02);
    assert_eq!(cpu.a(), 0x03);
    assert!(cpu.flag_c());
}

#[test]
fn test_anc_copies_negative_into_carry() {
    let mut cpu = cpu_with(0x0200, &[0x0B, 0xF0]);
    cpu.set_a(0x80);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x80);
    assert!(cpu.flag_c());
}

#[test]
fn test_alr_ands_then_shifts() {
    let mut cpu = cpu_with(0x0200, &[0x4B, 0x03]);
    cpu.set_a(0xFF);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x01);
    assert!(cpu.flag_c());
}

#[test]
fn test_xaa() {
    let mut cpu = cpu_with(0x0200, &[0x8B, 0x0F]);
    cpu.set_a(0xFF);
    cpu.set_x(0x3C);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), 0x0C);
}

#[test]
fn test_rla_rotates_memory_then_ands() {
    let mut cpu = cpu_with(0x0200, &[0x27, 0x10]);
    cpu.memory_mut().write(0x10, 0x81);
    cpu.set_a(0xFF);
    cpu.set_flag_c(false);

    assert_eq!(cpu.step().unwrap(), 5);
    assert_eq!(cpu.memory().read(0x10), 0x02);
    assert_eq!(cpu.a(), 0x02);
    assert!(cpu.flag_c());
    assert!(!cpu.flag_z());
}

#[test]
fn test_sre_shifts_memory_then_eors() {
    let mut cpu = cpu_with(0x0200, &[0x47, 0x10]);
    cpu.memory_mut().write(0x10, 0x03);
    cpu.set_a(0xF0);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x01);
    assert_eq!(cpu.a(), 0xF1);
    assert!(cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_rra_rotated_bit_is_adc_carry() {
    let mut cpu = cpu_with(0x0200, &[0x67, 0x10]);
    cpu.memory_mut().write(0x10, 0x01);
    cpu.set_a(0x10);
    cpu.set_flag_c(false);

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x10), 0x00);
    assert_eq!(cpu.a(), 0x11);
    assert!(!cpu.flag_c());
}

#[test]
fn test_rra_decimal_mode() {
    let mut cpu = cpu_with(0x0200, &[0x67, 0x10]);
    cpu.memory_mut().write(0x10, 0x13);
    cpu.set_a(0x10);
    cpu.set_flag_c(false);
    cpu.set_flag_d(true);

    cpu.step().unwrap();
    // $13 ROR -> $09 with carry set; $10 + $09 + 1 = $20 in BCD.
    assert_eq!(cpu.memory().read(0x10), 0x09);
    assert_eq!(cpu.a(), 0x20);
    assert!(!cpu.flag_c());
}

/// ARR follows the common emulator behavior; real silicon varies.
#[test_case(true, 0xC0, 0xE0, true, false ; "carry in, bits 6 and 5 set")]
#[test_case(false, 0x80, 0x40, true, true ; "bit 6 only")]
#[test_case(false, 0x20, 0x10, false, false ; "neither bit 6 nor bit 5")]
fn test_arr_best_effort(carry_in: bool, operand: u8, result: u8, carry: bool, overflow: bool) {
    let mut cpu = cpu_with(0x0200, &[0x6B, operand]);
    cpu.set_a(0xFF);
    cpu.set_flag_c(carry_in);

    cpu.step().unwrap();
    assert_eq!(cpu.a(), result);
    assert_eq!(cpu.flag_c(), carry);
    assert_eq!(cpu.flag_v(), overflow);
}

#[test]
fn test_illegal_nops_skip_operands() {
    let mut cpu = cpu_with(0x0200, &[0x80, 0xFF, 0x0C, 0x00, 0x30, 0x1A]);
    cpu.step().unwrap();
    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x0206);
    assert_eq!(cpu.a(), 0);
}

// ============================================================================
// Halting
// ============================================================================

#[test]
fn test_unknown_opcode_halts() {
    let mut cpu = cpu_with(0x0200, &[0xEA, 0x02]);
    cpu.step().unwrap();

    let err = cpu.step().unwrap_err();
    assert!(matches!(err, CpuError::UnknownOpcode { opcode: 0x02, address: 0x0201 }));
    assert_eq!(err.to_string(), "cpu: unknown opcode $02 at $0201");
    assert!(cpu.is_halted());
    assert_eq!(cpu.pc(), 0x0201);
    assert_eq!(cpu.cycles(), 2);

    // A halted CPU does nothing.
    assert!(!cpu.execute().unwrap());
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_halt_and_resume() {
    let mut cpu = cpu_with(0x0200, &[0xE8]);
    cpu.halt();
    assert!(!cpu.execute().unwrap());
    assert_eq!(cpu.x(), 0);

    cpu.resume();
    cpu.step().unwrap();
    assert_eq!(cpu.x(), 1);
}

#[test]
fn test_small_memory_wraps() {
    let mut memory = Memory::with_size(0x1000);
    memory.write(0x1234, 0xAB);
    assert_eq!(memory.read(0x0234), 0xAB);
}
