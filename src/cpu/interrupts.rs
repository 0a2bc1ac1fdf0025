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

//! NMI and IRQ handling.
//!
//! Interrupts are only recognised at instruction boundaries. A pending NMI
//! always wins over a pending IRQ, and an IRQ is ignored while I is set.

use super::Cpu;

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Clock cycles spent entering an interrupt handler.
pub const INTERRUPT_CYCLES: u8 = 7;

/// A hardware interrupt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
}

impl Interrupt {
    /// The vector the handler address is read from.
    pub fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        }
    }
}

impl Cpu {
    /// Latch a non-maskable interrupt; it is serviced at the next instruction boundary.
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Request a maskable interrupt.
    pub fn trigger_irq(&mut self) {
        self.irq_pending = true;
    }

    /// Drive the IRQ line: `true` requests an interrupt, `false` withdraws it.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_pending = asserted;
    }

    /// Withdraw a pending IRQ request.
    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    /// Whether an NMI is latched.
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Whether an IRQ is requested.
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// The interrupt that would be serviced at this boundary, if any.
    pub(crate) fn pending_interrupt(&self) -> Option<Interrupt> {
        if self.nmi_pending {
            Some(Interrupt::Nmi)
        } else if self.irq_pending && !self.p.interrupt {
            Some(Interrupt::Irq)
        } else {
            None
        }
    }

    /// Push PC and P (B clear), set I and jump through the vector.
    pub(crate) fn enter_interrupt(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::Nmi => self.nmi_pending = false,
            Interrupt::Irq => self.irq_pending = false,
        }
        self.push_word(self.pc);
        self.push(self.p.to_byte(false));
        self.p.interrupt = true;
        self.pc = self.memory.read_word(interrupt.vector());
    }
}
