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

//! T64 tape archives.
//!
//! A 64-byte header is followed by `max_entries` directory slots of 32
//! bytes each and then the file data. Each file is stored as PRG bytes
//! (load address followed by the program).
//!
//! | Offset | Size | Header field |
//! |---|---|---|
//! | `$00` | 32 | signature, `C64` prefix, zero padded |
//! | `$20` | 2 | version (`$0100`) |
//! | `$22` | 2 | max entries |
//! | `$24` | 2 | used entries |
//! | `$26` | 2 | reserved |
//! | `$28` | 24 | tape name, space padded |

use super::prg::{from_prg, to_prg};
use super::{padded_name, unpadded_name, Codec, FormatError};
use crate::segment::Segment;

pub const HEADER_SIZE: usize = 64;
pub const ENTRY_SIZE: usize = 32;

/// Written signature; readers only check the `C64` prefix.
pub const SIGNATURE: &[u8] = b"C64S tape image file";

pub const VERSION: u16 = 0x0100;

/// Directory slots reserved when no count is given.
pub const DEFAULT_MAX_ENTRIES: u16 = 30;

const ENTRY_NORMAL: u8 = 1;
const FILE_TYPE_PRG: u8 = 0x82;

/// T64 codec. Every segment becomes its own archive entry.
#[derive(Debug, Clone)]
pub struct T64 {
    /// Tape name in the header (24 characters).
    pub tape_name: String,
    /// Entry file name (16 characters).
    pub file_name: String,
    /// Number of directory slots.
    pub max_entries: u16,
    /// Print entry details while encoding.
    pub verbose: bool,
}

impl Default for T64 {
    fn default() -> Self {
        Self {
            tape_name: "ASM65".to_string(),
            file_name: "PROGRAM".to_string(),
            max_entries: DEFAULT_MAX_ENTRIES,
            verbose: false,
        }
    }
}

impl T64 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of entry `index` out of `count`.
    fn entry_name(&self, index: usize, count: usize) -> String {
        if count == 1 {
            return self.file_name.clone();
        }
        let suffix = format!(".{}", index + 1);
        let base: String = self.file_name.chars().take(16 - suffix.len()).collect();
        base + &suffix
    }
}

/// A file entry read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeEntry {
    pub name: String,
    pub start: u16,
    /// Last address covered (inclusive).
    pub end: u16,
    /// Offset of the PRG bytes in the archive.
    pub offset: usize,
}

impl Codec for T64 {
    fn encode(&self, segments: &[Segment]) -> Result<Vec<u8>, FormatError> {
        if segments.is_empty() {
            return Err(FormatError::NoSegments);
        }
        let slots = self.max_entries.max(1);
        if segments.len() > slots as usize {
            return Err(FormatError::TooManyEntries {
                count: segments.len(),
                max: slots,
            });
        }

        let mut data = vec![0u8; HEADER_SIZE + slots as usize * ENTRY_SIZE];
        data[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        data[0x20..0x22].copy_from_slice(&VERSION.to_le_bytes());
        data[0x22..0x24].copy_from_slice(&slots.to_le_bytes());
        data[0x28..0x40].copy_from_slice(&padded_name(&self.tape_name, 24, b' '));

        for (index, segment) in segments.iter().enumerate() {
            if segment.end() > 0x10000 {
                return Err(FormatError::ImageTooLarge {
                    start: segment.start,
                    end: segment.end(),
                });
            }
            let offset = data.len();
            let end = segment.start.wrapping_add(segment.len() as u16).wrapping_sub(1);
            let name = self.entry_name(index, segments.len());

            let entry = HEADER_SIZE + index * ENTRY_SIZE;
            data[entry] = ENTRY_NORMAL;
            data[entry + 1] = FILE_TYPE_PRG;
            data[entry + 2..entry + 4].copy_from_slice(&segment.start.to_le_bytes());
            data[entry + 4..entry + 6].copy_from_slice(&end.to_le_bytes());
            data[entry + 8..entry + 12].copy_from_slice(&(offset as u32).to_le_bytes());
            data[entry + 16..entry + 32].copy_from_slice(&padded_name(&name, 16, b' '));

            data.extend_from_slice(&to_prg(segment));
            if self.verbose {
                println!(
                    "T64: entry {} \"{}\" ${:04X}-${:04X} at offset {}",
                    index + 1,
                    name.to_ascii_uppercase(),
                    segment.start,
                    end,
                    offset
                );
            }
        }

        data[0x24..0x26].copy_from_slice(&(segments.len() as u16).to_le_bytes());
        Ok(data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Segment>, FormatError> {
        read_entries(data)?
            .iter()
            .map(|entry| {
                let len = (entry.end as usize + 1).saturating_sub(entry.start as usize);
                let end = entry.offset + 2 + len;
                if end > data.len() {
                    return Err(FormatError::Truncated {
                        format: "T64",
                        expected: end,
                        actual: data.len(),
                    });
                }
                let segment = from_prg(&data[entry.offset..end], "T64")?;
                if self.verbose {
                    println!("T64: read \"{}\" {}", entry.name, segment);
                }
                Ok(segment)
            })
            .collect()
    }
}

/// Validate the header and list the PRG entries of an archive.
pub fn read_entries(data: &[u8]) -> Result<Vec<TapeEntry>, FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::Truncated {
            format: "T64",
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if !data.starts_with(b"C64") {
        return Err(FormatError::BadSignature { format: "T64" });
    }

    let used = u16::from_le_bytes([data[0x24], data[0x25]]) as usize;
    let directory_end = HEADER_SIZE + used * ENTRY_SIZE;
    if directory_end > data.len() {
        return Err(FormatError::Truncated {
            format: "T64",
            expected: directory_end,
            actual: data.len(),
        });
    }

    let mut entries = Vec::new();
    for index in 0..used {
        let entry = &data[HEADER_SIZE + index * ENTRY_SIZE..][..ENTRY_SIZE];
        if entry[0] != ENTRY_NORMAL || entry[1] != FILE_TYPE_PRG {
            continue;
        }
        let offset = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]) as usize;
        if offset >= data.len() {
            return Err(FormatError::EntryOutOfBounds {
                entry: index,
                offset,
                len: data.len(),
            });
        }
        entries.push(TapeEntry {
            name: unpadded_name(&entry[16..32]),
            start: u16::from_le_bytes([entry[2], entry[3]]),
            end: u16::from_le_bytes([entry[4], entry[5]]),
            offset,
        });
    }
    Ok(entries)
}
