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

//! Integration tests for PRG files.

use asm65::output::{Codec, FormatError, OutputFormat, Prg};
use asm65::Segment;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::tempdir;

/// Test the PRG round trip through a file.
#[test]
fn test_prg_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.prg");
    let segment = Segment::new(0x1000, vec![0xA9, 0x42, 0x8D, 0x20, 0xD0, 0x60]);

    Prg::new().write_file(&path, &[segment.clone()]).unwrap();

    assert_eq!(
        std::fs::read(&path).unwrap(),
        vec![0x00, 0x10, 0xA9, 0x42, 0x8D, 0x20, 0xD0, 0x60]
    );
    assert_eq!(Prg::new().read_file(&path).unwrap(), vec![segment]);
}

/// Test that assembled code becomes a valid PRG.
#[test]
fn test_assembled_program_to_prg() {
    let segments = asm65::assemble("LDA #$05\nSTA $D021\nRTS").expect("Assembly should succeed");
    let data = Prg::new().encode(&segments).unwrap();

    // Default origin is the BASIC start
    assert_eq!(&data[0..2], &[0x01, 0x08]);
    assert_eq!(&data[2..], &[0xA9, 0x05, 0x8D, 0x21, 0xD0, 0x60]);
}

/// Test that separate origins are merged with a zero-filled gap.
#[test]
fn test_multiple_origins_are_merged() {
    let segments = asm65::assemble("*= $1000\nNOP\n*= $1003\nRTS").unwrap();
    assert_eq!(segments.len(), 2);

    let data = Prg::new().encode(&segments).unwrap();
    assert_eq!(data, vec![0x00, 0x10, 0xEA, 0x00, 0x00, 0x60]);
}

/// Test that out-of-order segments are sorted.
#[test]
fn test_segments_sorted_by_address() {
    let segments = asm65::assemble("*= $2001\nRTS\n*= $2000\nNOP").unwrap();
    let data = Prg::new().encode(&segments).unwrap();
    assert_eq!(data, vec![0x00, 0x20, 0xEA, 0x60]);
}

/// Test that overlapping segments are rejected and no file is written.
#[test]
fn test_overlapping_segments_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overlap.prg");
    let segments = asm65::assemble("*= $1000\nNOP\nNOP\n*= $1001\nRTS").unwrap();

    let result = Prg::new().write_file(&path, &segments);

    assert!(matches!(result, Err(FormatError::Overlap { .. })));
    assert!(!path.exists());
}

/// Test that an empty program cannot be written.
#[test]
fn test_no_segments() {
    let segments = asm65::assemble("; nothing here\n").unwrap();
    assert!(segments.is_empty());
    assert!(matches!(Prg::new().encode(&segments), Err(FormatError::NoSegments)));
}

/// Test reading a missing file.
#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let result = Prg::new().read_file(&dir.path().join("missing.prg"));
    assert!(matches!(result, Err(FormatError::Io(_))));
}

/// Test format detection for PRG paths.
#[test]
fn test_prg_format_detection() {
    assert_eq!(OutputFormat::from_extension(Path::new("game.prg")), Some(OutputFormat::Prg));
    assert_eq!(OutputFormat::from_name("prg"), Some(OutputFormat::Prg));
}
