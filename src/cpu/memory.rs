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

//! Flat, wrap-around RAM owned by the CPU.
//!
//! Every access at address `a` lands on `a mod size`. There is no bus
//! error, no protection and no memory-mapped I/O at this layer.

/// Default memory size: the full 64 KiB address space of the 6502.
pub const DEFAULT_SIZE: usize = 0x10000;

/// Flat byte-addressable memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a zero-filled 64 KiB memory.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SIZE)
    }

    /// Create a zero-filled memory of `size` bytes (at least one byte).
    pub fn with_size(size: usize) -> Self {
        Self {
            data: vec![0; size.max(1)],
        }
    }

    /// Configured size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn index(&self, address: u16) -> usize {
        address as usize % self.data.len()
    }

    /// Read one byte.
    pub fn read(&self, address: u16) -> u8 {
        self.data[self.index(address)]
    }

    /// Write one byte.
    pub fn write(&mut self, address: u16, value: u8) {
        let index = self.index(address);
        self.data[index] = value;
    }

    /// Read a little-endian word; the high byte address wraps at `$FFFF`.
    pub fn read_word(&self, address: u16) -> u16 {
        let lo = self.read(address) as u16;
        let hi = self.read(address.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Write a little-endian word.
    pub fn write_word(&mut self, address: u16, value: u16) {
        self.write(address, value as u8);
        self.write(address.wrapping_add(1), (value >> 8) as u8);
    }

    /// Copy `bytes` into memory starting at `address`, wrapping as needed.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        let mut addr = address;
        for &b in bytes {
            self.write(addr, b);
            addr = addr.wrapping_add(1);
        }
    }

    /// Zero the whole memory.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw view of the backing store.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut mem = Memory::new();
        mem.write(0x1234, 0x42);
        assert_eq!(mem.read(0x1234), 0x42);
        assert_eq!(mem.size(), 0x10000);
    }

    #[test]
    fn test_small_memory_wraps() {
        let mut mem = Memory::with_size(0x1000);
        mem.write(0x1005, 0xAB);
        assert_eq!(mem.read(0x0005), 0xAB);
        assert_eq!(mem.read(0xF005), 0xAB);
    }

    #[test]
    fn test_read_word_wraps_at_top() {
        let mut mem = Memory::new();
        mem.write(0xFFFF, 0x34);
        mem.write(0x0000, 0x12);
        assert_eq!(mem.read_word(0xFFFF), 0x1234);
    }

    #[test]
    fn test_load() {
        let mut mem = Memory::new();
        mem.load(0xFFFE, &[1, 2, 3]);
        assert_eq!(mem.read(0xFFFE), 1);
        assert_eq!(mem.read(0xFFFF), 2);
        assert_eq!(mem.read(0x0000), 3);
    }

    #[test]
    fn test_zero_size_is_raised() {
        let mem = Memory::with_size(0);
        assert_eq!(mem.size(), 1);
    }
}
