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

//! 6502 instruction implementations, organized by category.
//!
//! Every instruction is a function taking the CPU (and, where it matters,
//! the addressing mode) and returning `true` once it has completed. A
//! `false` return means the instruction needs another tick: an indexed
//! load crossed a page, or a taken branch is spending its extra cycles.
//!
//! ## Categories
//!
//! - **alu**: ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT
//! - **branches**: BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS
//! - **shifts**: ASL, LSR, ROL, ROR, INC, DEC, INX, INY, DEX, DEY
//! - **load_store**: LDA, LDX, LDY, STA, STX, STY and register transfers
//! - **control**: JMP, JSR, RTS, RTI, BRK, NOP, stack and flag operations
//! - **illegal**: undocumented opcodes

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod illegal;
pub(crate) mod load_store;
pub(crate) mod shifts;

use super::opcodes::Mnemonic;
use super::Cpu;
use control::FlagOp;
use load_store::Transfer;

/// Run (or continue) the instruction held in the execution context.
pub(crate) fn execute(cpu: &mut Cpu) -> bool {
    let opcode = cpu.ctx.opcode;
    let mode = opcode.mode;

    match opcode.mnemonic {
        Mnemonic::Lda => load_store::lda(cpu, mode),
        Mnemonic::Ldx => load_store::ldx(cpu, mode),
        Mnemonic::Ldy => load_store::ldy(cpu, mode),
        Mnemonic::Sta => load_store::sta(cpu, mode),
        Mnemonic::Stx => load_store::stx(cpu, mode),
        Mnemonic::Sty => load_store::sty(cpu, mode),
        Mnemonic::Tax => load_store::transfer(cpu, Transfer::Tax),
        Mnemonic::Tay => load_store::transfer(cpu, Transfer::Tay),
        Mnemonic::Tsx => load_store::transfer(cpu, Transfer::Tsx),
        Mnemonic::Txa => load_store::transfer(cpu, Transfer::Txa),
        Mnemonic::Txs => load_store::transfer(cpu, Transfer::Txs),
        Mnemonic::Tya => load_store::transfer(cpu, Transfer::Tya),

        Mnemonic::Adc => alu::adc(cpu, mode),
        Mnemonic::Sbc => alu::sbc(cpu, mode),
        Mnemonic::And => alu::and(cpu, mode),
        Mnemonic::Ora => alu::ora(cpu, mode),
        Mnemonic::Eor => alu::eor(cpu, mode),
        Mnemonic::Cmp => alu::cmp(cpu, mode),
        Mnemonic::Cpx => alu::cpx(cpu, mode),
        Mnemonic::Cpy => alu::cpy(cpu, mode),
        Mnemonic::Bit => alu::bit(cpu, mode),

        Mnemonic::Asl => shifts::asl(cpu, mode),
        Mnemonic::Lsr => shifts::lsr(cpu, mode),
        Mnemonic::Rol => shifts::rol(cpu, mode),
        Mnemonic::Ror => shifts::ror(cpu, mode),
        Mnemonic::Inc => shifts::inc(cpu, mode),
        Mnemonic::Dec => shifts::dec(cpu, mode),
        Mnemonic::Inx => shifts::inx(cpu),
        Mnemonic::Iny => shifts::iny(cpu),
        Mnemonic::Dex => shifts::dex(cpu),
        Mnemonic::Dey => shifts::dey(cpu),

        Mnemonic::Bcc
        | Mnemonic::Bcs
        | Mnemonic::Beq
        | Mnemonic::Bne
        | Mnemonic::Bmi
        | Mnemonic::Bpl
        | Mnemonic::Bvc
        | Mnemonic::Bvs => branches::branch(cpu, opcode.mnemonic),

        Mnemonic::Jmp => control::jmp(cpu, mode),
        Mnemonic::Jsr => control::jsr(cpu),
        Mnemonic::Rts => control::rts(cpu),
        Mnemonic::Rti => control::rti(cpu),
        Mnemonic::Brk => control::brk(cpu),
        Mnemonic::Pha => control::pha(cpu),
        Mnemonic::Php => control::php(cpu),
        Mnemonic::Pla => control::pla(cpu),
        Mnemonic::Plp => control::plp(cpu),
        Mnemonic::Clc => control::flag(cpu, FlagOp::Clc),
        Mnemonic::Sec => control::flag(cpu, FlagOp::Sec),
        Mnemonic::Cli => control::flag(cpu, FlagOp::Cli),
        Mnemonic::Sei => control::flag(cpu, FlagOp::Sei),
        Mnemonic::Cld => control::flag(cpu, FlagOp::Cld),
        Mnemonic::Sed => control::flag(cpu, FlagOp::Sed),
        Mnemonic::Clv => control::flag(cpu, FlagOp::Clv),
        Mnemonic::Nop | Mnemonic::Dop | Mnemonic::Top => control::nop(cpu, mode),

        Mnemonic::Slo => illegal::slo(cpu, mode),
        Mnemonic::Rla => illegal::rla(cpu, mode),
        Mnemonic::Sre => illegal::sre(cpu, mode),
        Mnemonic::Rra => illegal::rra(cpu, mode),
        Mnemonic::Dcp => illegal::dcp(cpu, mode),
        Mnemonic::Isc => illegal::isc(cpu, mode),
        Mnemonic::Lax => illegal::lax(cpu, mode),
        Mnemonic::Sax => illegal::sax(cpu, mode),
        Mnemonic::Anc => illegal::anc(cpu, mode),
        Mnemonic::Alr => illegal::alr(cpu, mode),
        Mnemonic::Arr => illegal::arr(cpu, mode),
        Mnemonic::Xaa => illegal::xaa(cpu, mode),
    }
}
