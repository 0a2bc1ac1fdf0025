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

//! Cycle-counted MOS 6502 interpreter.
//!
//! The CPU is driven one clock tick at a time through [`Cpu::execute`]. An
//! internal state machine spreads each instruction over its nominal cycle
//! count:
//!
//! - `FetchOpcode` reads the opcode and its operand bytes and decodes them
//! - `WaitCycles` burns the cycles between fetch and completion
//! - `ExecuteFinal` runs the instruction; it stays in this state while the
//!   instruction reports that it needs another tick (page-cross penalty,
//!   taken branch)
//! - `ServiceInterrupt` spends the seven cycles of an NMI/IRQ entry
//!
//! Side effects of an instruction happen in architectural order within
//! its final tick. Totals per instruction match hardware.

pub mod addressing;
mod instructions;
pub mod interrupts;
pub mod memory;
pub mod opcodes;
pub mod registers;

pub use addressing::AddressingMode;
pub use interrupts::{Interrupt, INTERRUPT_CYCLES, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
pub use memory::Memory;
pub use opcodes::{Mnemonic, Opcode, OPCODES};
pub use registers::Status;

use crate::segment::Segment;
use thiserror::Error;

/// Stack page base address.
const STACK_BASE: u16 = 0x0100;

/// Errors raised while executing code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CpuError {
    /// The byte at PC is not a populated opcode slot.
    #[error("cpu: unknown opcode ${opcode:02X} at ${address:04X}")]
    UnknownOpcode { opcode: u8, address: u16 },
}

/// Clock-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    FetchOpcode,
    WaitCycles,
    ExecuteFinal,
    ServiceInterrupt,
}

/// Per-instruction scratch state, reset on every fetch.
#[derive(Debug, Clone)]
pub(crate) struct ExecutionContext {
    /// The decoded opcode.
    pub(crate) opcode: Opcode,
    /// Operand bytes in fetch order; unused bytes are zero.
    pub(crate) operand: [u8; 2],
    /// Extra ticks still owed by a taken branch.
    pub(crate) stall: u8,
    /// Effective address held across a page-cross stall.
    pub(crate) latched: Option<u16>,
}

impl ExecutionContext {
    fn new(opcode: Opcode, operand: [u8; 2]) -> Self {
        Self {
            opcode,
            operand,
            stall: 0,
            latched: None,
        }
    }
}

/// The 6502 processor together with the memory it owns.
#[derive(Debug, Clone)]
pub struct Cpu {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) sp: u8,
    pub(crate) pc: u16,
    pub(crate) p: Status,
    pub(crate) memory: Memory,
    pub(crate) ctx: ExecutionContext,
    pub(crate) nmi_pending: bool,
    pub(crate) irq_pending: bool,
    state: State,
    /// Ticks left in `WaitCycles` or `ServiceInterrupt`.
    remaining: u8,
    /// Interrupt chosen at the last boundary, entered on the next tick.
    servicing: Option<Interrupt>,
    cycles: u64,
    halted: bool,
}

impl Cpu {
    /// Create a CPU over `memory` and reset it through the reset vector.
    pub fn new(memory: Memory) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            p: Status::default(),
            memory,
            ctx: ExecutionContext::new(opcodes::NOP, [0; 2]),
            nmi_pending: false,
            irq_pending: false,
            state: State::FetchOpcode,
            remaining: 0,
            servicing: None,
            cycles: 0,
            halted: false,
        };
        cpu.reset();
        cpu
    }

    /// Reset registers and restart at the address in the reset vector.
    ///
    /// Memory and the cycle counter are left untouched.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.p = Status {
            interrupt: true,
            ..Status::default()
        };
        self.pc = self.memory.read_word(RESET_VECTOR);
        self.nmi_pending = false;
        self.irq_pending = false;
        self.halted = false;
        self.restart();
    }

    /// Drop any in-flight instruction and resume at `FetchOpcode`.
    fn restart(&mut self) {
        self.state = State::FetchOpcode;
        self.remaining = 0;
        self.servicing = None;
        self.ctx = ExecutionContext::new(opcodes::NOP, [0; 2]);
    }

    /// Perform exactly one clock cycle.
    ///
    /// Returns `Ok(true)` on the tick that finishes an instruction or an
    /// interrupt entry. A halted CPU returns `Ok(false)` without doing
    /// anything. Fetching an unpopulated opcode halts the CPU and returns
    /// the error; PC still points at the offending byte.
    pub fn execute(&mut self) -> Result<bool, CpuError> {
        if self.halted {
            return Ok(false);
        }

        let completed = match self.state {
            State::FetchOpcode => {
                self.fetch()?;
                false
            }
            State::WaitCycles => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = State::ExecuteFinal;
                }
                false
            }
            State::ExecuteFinal => {
                let completed = if self.ctx.stall > 0 {
                    self.ctx.stall -= 1;
                    self.ctx.stall == 0
                } else {
                    instructions::execute(self)
                };
                if completed {
                    self.finish_instruction();
                }
                completed
            }
            State::ServiceInterrupt => {
                if let Some(interrupt) = self.servicing.take() {
                    self.enter_interrupt(interrupt);
                }
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = State::FetchOpcode;
                    true
                } else {
                    false
                }
            }
        };

        self.cycles += 1;
        Ok(completed)
    }

    fn fetch(&mut self) -> Result<(), CpuError> {
        let address = self.pc;
        let code = self.memory.read(address);
        let Some(&opcode) = opcodes::lookup(code) else {
            self.halted = true;
            return Err(CpuError::UnknownOpcode {
                opcode: code,
                address,
            });
        };

        self.pc = self.pc.wrapping_add(1);
        let mut operand = [0u8; 2];
        for byte in operand.iter_mut().take(opcode.mode.operand_bytes() as usize) {
            *byte = self.memory.read(self.pc);
            self.pc = self.pc.wrapping_add(1);
        }

        self.ctx = ExecutionContext::new(opcode, operand);
        self.remaining = opcode.cycles.saturating_sub(2);
        self.state = if self.remaining > 0 {
            State::WaitCycles
        } else {
            State::ExecuteFinal
        };
        Ok(())
    }

    fn finish_instruction(&mut self) {
        match self.pending_interrupt() {
            Some(interrupt) => {
                self.servicing = Some(interrupt);
                self.remaining = INTERRUPT_CYCLES;
                self.state = State::ServiceInterrupt;
            }
            None => self.state = State::FetchOpcode,
        }
    }

    /// Tick until the current instruction (or interrupt entry) completes.
    ///
    /// Returns the number of cycles spent.
    pub fn step(&mut self) -> Result<u64, CpuError> {
        let start = self.cycles;
        while !self.halted {
            if self.execute()? {
                break;
            }
        }
        Ok(self.cycles - start)
    }

    /// Tick up to `budget` cycles, stopping early if the CPU halts.
    ///
    /// Returns the number of cycles actually run.
    pub fn run_for(&mut self, budget: u64) -> Result<u64, CpuError> {
        let start = self.cycles;
        while !self.halted && self.cycles - start < budget {
            self.execute()?;
        }
        Ok(self.cycles - start)
    }

    /// Copy assembled segments into memory.
    pub fn load_segments(&mut self, segments: &[Segment]) {
        for segment in segments {
            self.memory.load(segment.start, &segment.bytes);
        }
    }

    // ========================================
    // Stack
    // ========================================

    pub(crate) fn push(&mut self, value: u8) {
        self.memory.write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_BASE | self.sp as u16)
    }

    /// Push high byte, then low byte.
    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    /// Pull low byte, then high byte.
    pub(crate) fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// The status register packed as a byte (bit 5 set, B clear).
    pub fn status(&self) -> u8 {
        self.p.to_byte(false)
    }

    /// The status flags.
    pub fn flags(&self) -> Status {
        self.p
    }

    /// Total clock cycles executed.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current clock-loop state.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn flag_n(&self) -> bool {
        self.p.negative
    }

    pub fn flag_v(&self) -> bool {
        self.p.overflow
    }

    pub fn flag_d(&self) -> bool {
        self.p.decimal
    }

    pub fn flag_i(&self) -> bool {
        self.p.interrupt
    }

    pub fn flag_z(&self) -> bool {
        self.p.zero
    }

    pub fn flag_c(&self) -> bool {
        self.p.carry
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Jump to `address`, abandoning any instruction in flight.
    pub fn set_pc(&mut self, address: u16) {
        self.pc = address;
        self.restart();
    }

    /// Load the flags from a status byte (B and bit 5 are ignored).
    pub fn set_status(&mut self, value: u8) {
        self.p = Status::from_byte(value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.p.negative = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.p.overflow = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.p.decimal = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.p.interrupt = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.p.zero = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.p.carry = value;
    }

    // ========================================
    // Halting
    // ========================================

    /// Stop the clock: `execute` becomes a no-op until [`Cpu::resume`].
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn resume(&mut self) {
        self.halted = false;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
