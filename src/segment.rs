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

//! Address-tagged byte runs produced by the assembler and consumed by the codecs.

/// A contiguous run of bytes with a load address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    /// Load address of the first byte.
    pub start: u16,
    /// The segment contents.
    pub bytes: Vec<u8>,
}

impl Segment {
    /// Create a new segment.
    pub fn new(start: u16, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            start,
            bytes: bytes.into(),
        }
    }

    /// Number of bytes in the segment.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the segment holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One past the last address covered, as a 32-bit value so `$FFFF` can be included.
    pub fn end(&self) -> u32 {
        self.start as u32 + self.bytes.len() as u32
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bytes.is_empty() {
            write!(f, "${:04X} (empty)", self.start)
        } else {
            write!(
                f,
                "${:04X}-${:04X} ({} bytes)",
                self.start,
                self.end() - 1,
                self.bytes.len()
            )
        }
    }
}
