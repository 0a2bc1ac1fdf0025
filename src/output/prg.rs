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

//! PRG files.
//!
//! PRG format is very simple:
//! - 2-byte load address (little-endian)
//! - Program data

use super::{Codec, FormatError};
use crate::segment::Segment;

/// Size of the load address header.
pub const HEADER_SIZE: usize = 2;

/// PRG codec.
#[derive(Debug, Clone, Default)]
pub struct Prg {
    /// Print the load address and image size while encoding.
    pub verbose: bool,
}

impl Prg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Codec for Prg {
    fn encode(&self, segments: &[Segment]) -> Result<Vec<u8>, FormatError> {
        let image = merge(segments)?;
        if self.verbose {
            println!("PRG: load address ${:04X}, {} bytes", image.start, image.len());
        }
        Ok(to_prg(&image))
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Segment>, FormatError> {
        Ok(vec![from_prg(data, "PRG")?])
    }
}

/// Merge segments into one program image.
///
/// Segments are sorted by address; gaps between them are filled with zero
/// bytes. Overlapping segments and images running past `$FFFF` are errors.
pub fn merge(segments: &[Segment]) -> Result<Segment, FormatError> {
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    sorted.sort_by_key(|s| s.start);

    let first = sorted.first().ok_or(FormatError::NoSegments)?;
    let start = first.start;
    let mut bytes = Vec::new();
    let mut end = start as u32;
    let mut previous = start;

    for segment in sorted {
        if (segment.start as u32) < end {
            return Err(FormatError::Overlap {
                first: previous,
                second: segment.start,
            });
        }
        bytes.resize((segment.start - start) as usize, 0);
        bytes.extend_from_slice(&segment.bytes);
        end = segment.end();
        previous = segment.start;
    }

    if end > 0x10000 {
        return Err(FormatError::ImageTooLarge { start, end });
    }
    Ok(Segment::new(start, bytes))
}

/// Serialize one segment as PRG bytes.
pub fn to_prg(segment: &Segment) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE + segment.len());
    data.extend_from_slice(&segment.start.to_le_bytes());
    data.extend_from_slice(&segment.bytes);
    data
}

/// Parse PRG bytes. `format` names the container in errors.
pub fn from_prg(data: &[u8], format: &'static str) -> Result<Segment, FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::Truncated {
            format,
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let start = u16::from_le_bytes([data[0], data[1]]);
    Ok(Segment::new(start, &data[HEADER_SIZE..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_encode_single_segment() {
        let segment = Segment::new(0x1000, vec![0xA9, 0x42, 0x8D, 0x20, 0xD0, 0x60]);
        let data = Prg::new().encode(&[segment]).unwrap();
        assert_eq!(data, vec![0x00, 0x10, 0xA9, 0x42, 0x8D, 0x20, 0xD0, 0x60]);
    }

    #[test]
    fn test_merge_fills_gaps() {
        let segments = [Segment::new(0x1004, vec![0x60]), Segment::new(0x1000, vec![0xEA, 0xEA])];
        let merged = merge(&segments).unwrap();
        assert_eq!(merged, Segment::new(0x1000, vec![0xEA, 0xEA, 0x00, 0x00, 0x60]));
    }

    #[test]
    fn test_merge_contiguous() {
        let segments = [Segment::new(0x1000, vec![1, 2]), Segment::new(0x1002, vec![3])];
        assert_eq!(merge(&segments).unwrap(), Segment::new(0x1000, vec![1, 2, 3]));
    }

    #[test]
    fn test_merge_rejects_overlap() {
        let segments = [Segment::new(0x1000, vec![1, 2, 3]), Segment::new(0x1002, vec![4])];
        assert!(matches!(
            merge(&segments),
            Err(FormatError::Overlap {
                first: 0x1000,
                second: 0x1002
            })
        ));
    }

    #[test]
    fn test_merge_rejects_empty_list() {
        assert!(matches!(merge(&[]), Err(FormatError::NoSegments)));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            Prg::new().decode(&[0x01]),
            Err(FormatError::Truncated { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.prg");
        let segment = Segment::new(0xC000, vec![0x60]);

        Prg::new().write_file(&path, &[segment.clone()]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x00, 0xC0, 0x60]);
        assert_eq!(Prg::new().read_file(&path).unwrap(), vec![segment]);
    }
}
