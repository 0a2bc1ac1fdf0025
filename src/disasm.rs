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

//! 6502 disassembler.
//!
//! Decodes a byte slice into listing lines using the shared opcode table.
//! Bytes that do not start a known opcode, or whose operand runs past the
//! end of the input, are emitted as `.BYTE` lines.

use crate::cpu::opcodes::{self, Mnemonic};
use crate::cpu::AddressingMode;
use crate::segment::Segment;
use std::fmt;

/// One decoded listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the first byte.
    pub address: u16,
    /// Raw bytes, opcode first.
    pub bytes: Vec<u8>,
    /// Decoded mnemonic, `None` for a raw data byte.
    pub mnemonic: Option<Mnemonic>,
    /// Addressing mode of the decoded opcode.
    pub mode: AddressingMode,
    /// Operand in assembler syntax.
    pub operand: String,
    /// Whether the opcode is undocumented.
    pub illegal: bool,
}

impl Instruction {
    /// Branch or jump target, if the instruction has a static one.
    pub fn target(&self) -> Option<u16> {
        let mnemonic = self.mnemonic?;
        let next = self.address.wrapping_add(self.bytes.len() as u16);
        match self.mode {
            AddressingMode::Relative => {
                Some(next.wrapping_add(self.bytes[1] as i8 as u16))
            }
            AddressingMode::Absolute if matches!(mnemonic, Mnemonic::Jmp | Mnemonic::Jsr) => {
                Some(u16::from_le_bytes([self.bytes[1], self.bytes[2]]))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        let text = match self.mnemonic {
            Some(mnemonic) if self.operand.is_empty() => mnemonic.to_string(),
            Some(mnemonic) => format!("{} {}", mnemonic, self.operand),
            None => format!(".BYTE {}", self.operand),
        };
        write!(f, "${:04X}  {:<8}  {}", self.address, hex.join(" "), text)?;
        if self.illegal {
            write!(f, "  ; illegal")?;
        }
        Ok(())
    }
}

/// Streaming decoder over a byte slice loaded at `origin`.
pub struct Disassembler<'a> {
    code: &'a [u8],
    origin: u16,
    pos: usize,
}

impl<'a> Disassembler<'a> {
    pub fn new(code: &'a [u8], origin: u16) -> Self {
        Self {
            code,
            origin,
            pos: 0,
        }
    }

    /// Decode the next line, or `None` at the end of input.
    pub fn next_instruction(&mut self) -> Option<Instruction> {
        let code = *self.code.get(self.pos)?;
        let address = self.origin.wrapping_add(self.pos as u16);

        let decoded = opcodes::lookup(code)
            .filter(|op| self.pos + op.length() as usize <= self.code.len());

        let instruction = match decoded {
            Some(op) => {
                let len = op.length() as usize;
                let bytes = self.code[self.pos..self.pos + len].to_vec();
                let mut operand = [0u8; 2];
                operand[..len - 1].copy_from_slice(&bytes[1..]);
                let next = address.wrapping_add(len as u16);
                Instruction {
                    address,
                    operand: op.mode.format_operand(operand, next),
                    bytes,
                    mnemonic: Some(op.mnemonic),
                    mode: op.mode,
                    illegal: op.illegal,
                }
            }
            None => Instruction {
                address,
                bytes: vec![code],
                mnemonic: None,
                mode: AddressingMode::Implied,
                operand: format!("${:02X}", code),
                illegal: false,
            },
        };

        self.pos += instruction.bytes.len();
        Some(instruction)
    }
}

impl Iterator for Disassembler<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        self.next_instruction()
    }
}

/// Decode the single instruction at the start of `code`.
pub fn disassemble_one(code: &[u8], origin: u16) -> Option<Instruction> {
    Disassembler::new(code, origin).next_instruction()
}

/// Disassemble `code` as if loaded at `origin`.
pub fn disassemble(code: &[u8], origin: u16) -> Vec<Instruction> {
    Disassembler::new(code, origin).collect()
}

/// Render a full listing for a set of segments.
pub fn listing(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&format!("; {}\n", segment));
        for line in Disassembler::new(&segment.bytes, segment.start) {
            out.push_str(&line.to_string());
            out.push('\n');
        }
    }
    out
}
