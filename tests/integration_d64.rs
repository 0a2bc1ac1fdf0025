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

//! Integration tests for D64 disk images.

use asm65::output::d64::{read_files, sector_offset, D64_SIZE};
use asm65::output::{Codec, FormatError, D64};
use asm65::Segment;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// Test writing an assembled program to a disk image file.
#[test]
fn test_write_d64_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.d64");
    let segments = asm65::assemble("LDA #$00\nSTA $D020\nRTS").unwrap();

    D64::new().write_file(&path, &segments).unwrap();

    let image = std::fs::read(&path).unwrap();
    assert_eq!(image.len(), D64_SIZE);
    assert_eq!(D64::new().read_file(&path).unwrap(), segments);
}

/// Test the directory header fields.
#[test]
fn test_disk_header() {
    let codec = D64 {
        disk_name: "HELLO".to_string(),
        disk_id: "64".to_string(),
        file_name: "HELLO WORLD".to_string(),
        verbose: false,
    };
    let image = codec.encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
    let bam = sector_offset(18, 0).unwrap();

    assert_eq!(&image[bam + 0x90..bam + 0xA0], b"HELLO           ");
    assert_eq!(&image[bam + 0xA2..bam + 0xA4], b"64");

    let files = read_files(&image).unwrap();
    assert_eq!(files[0].name, "HELLO WORLD");
}

/// Test that a large program spans several blocks and survives a round trip.
#[test]
fn test_large_program_round_trip() {
    let mut source = String::from(".ORG $1000\n");
    for _ in 0..400 {
        source.push_str("STA $D020\n");
    }
    let segments = asm65::assemble(&source).unwrap();
    assert_eq!(segments[0].len(), 1200);

    let image = D64::new().encode(&segments).unwrap();
    assert_eq!(D64::new().decode(&image).unwrap(), segments);
}

/// Test that images of the wrong size are rejected.
#[test]
fn test_invalid_image_size() {
    let result = D64::new().decode(&vec![0; D64_SIZE - 1]);
    assert!(matches!(result, Err(FormatError::InvalidSize { .. })));
}

/// Test that an empty segment list is rejected.
#[test]
fn test_no_segments() {
    assert!(matches!(D64::new().encode(&[]), Err(FormatError::NoSegments)));
}

/// Test that a blank image has no files.
#[test]
fn test_blank_image_has_no_files() {
    let mut image = D64::new().encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
    let directory = sector_offset(18, 1).unwrap();
    image[directory + 2] = 0;

    assert!(D64::new().decode(&image).unwrap().is_empty());
}
