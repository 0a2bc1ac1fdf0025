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

//! D64 disk images.
//!
//! D64 is the standard disk image format for the Commodore 64.
//! It represents a 1541 floppy disk with:
//! - 35 tracks
//! - Variable sectors per track (17-21)
//! - 256 bytes per sector
//! - Total: 683 sectors = 174,848 bytes
//!
//! Track 18 holds the BAM (sector 0) and the directory (from sector 1).
//! Files are chains of sectors: each sector starts with the track and
//! sector of the next one, or `0` and the number of used bytes plus one in
//! the last sector.

use super::prg::{from_prg, merge, to_prg};
use super::{padded_name, unpadded_name, Codec, FormatError};
use crate::segment::Segment;

/// Total size of a D64 image in bytes.
pub const D64_SIZE: usize = 174_848;

/// Number of tracks on a 1541 disk.
pub const NUM_TRACKS: u8 = 35;

/// Directory track number.
pub const DIRECTORY_TRACK: u8 = 18;

/// Number of sectors on the disk.
pub const TOTAL_SECTORS: usize = 683;

const SECTOR_SIZE: usize = 256;

/// Payload bytes per sector after the two link bytes.
const BLOCK_DATA: usize = 254;

/// Byte offset of track 18, sector 0.
const BAM_OFFSET: usize = 17 * 21 * SECTOR_SIZE;

/// Byte offset of track 18, sector 1.
const DIRECTORY_OFFSET: usize = BAM_OFFSET + SECTOR_SIZE;

const ENTRY_SIZE: usize = 32;
const ENTRIES_PER_SECTOR: usize = SECTOR_SIZE / ENTRY_SIZE;

/// Closed PRG file.
const FILE_TYPE_PRG: u8 = 0x82;

/// Sectors per track for each track (1-indexed).
const SECTORS_PER_TRACK: [u8; 36] = [
    0, // Track 0 doesn't exist
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, // Tracks 1-17
    19, 19, 19, 19, 19, 19, 19, // Tracks 18-24
    18, 18, 18, 18, 18, 18, // Tracks 25-30
    17, 17, 17, 17, 17, // Tracks 31-35
];

/// Get the number of sectors for a given track.
pub fn sectors_in_track(track: u8) -> u8 {
    if track == 0 || track > NUM_TRACKS {
        0
    } else {
        SECTORS_PER_TRACK[track as usize]
    }
}

/// Get the byte offset for a track/sector in the D64 image.
pub fn sector_offset(track: u8, sector: u8) -> Option<usize> {
    if track == 0 || track > NUM_TRACKS || sector >= sectors_in_track(track) {
        return None;
    }

    let offset: usize = (1..track).map(|t| sectors_in_track(t) as usize).sum();
    Some((offset + sector as usize) * SECTOR_SIZE)
}

/// D64 codec. All segments are merged into one PRG file on the disk.
#[derive(Debug, Clone)]
pub struct D64 {
    /// Disk name shown in the directory header (16 characters).
    pub disk_name: String,
    /// Two-character disk ID.
    pub disk_id: String,
    /// Name of the program file.
    pub file_name: String,
    /// Print sector allocation while encoding.
    pub verbose: bool,
}

impl Default for D64 {
    fn default() -> Self {
        Self {
            disk_name: "ASM65".to_string(),
            disk_id: "01".to_string(),
            file_name: "PROGRAM".to_string(),
            verbose: false,
        }
    }
}

impl D64 {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The two ID bytes for the BAM. Anything other than exactly two ASCII
/// characters falls back to `01`.
fn disk_id(id: &str) -> [u8; 2] {
    match id.as_bytes() {
        &[a, b] if a.is_ascii() && b.is_ascii() => [a.to_ascii_uppercase(), b.to_ascii_uppercase()],
        _ => *b"01",
    }
}

impl Codec for D64 {
    fn encode(&self, segments: &[Segment]) -> Result<Vec<u8>, FormatError> {
        let image = merge(segments)?;
        let mut disk = DiskImage::new(&self.disk_name, &self.disk_id);
        disk.verbose = self.verbose;
        disk.add_file(&self.file_name, &to_prg(&image))?;
        Ok(disk.data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Segment>, FormatError> {
        if data.len() != D64_SIZE {
            return Err(FormatError::InvalidSize {
                format: "D64",
                expected: D64_SIZE,
                actual: data.len(),
            });
        }
        let disk = DiskImage {
            data: data.to_vec(),
            current_track: 1,
            current_sector: 0,
            verbose: self.verbose,
        };
        disk.files()?
            .iter()
            .map(|file| from_prg(&file.data, "D64"))
            .collect()
    }
}

/// A file read back from a disk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// An in-memory disk image.
struct DiskImage {
    /// The disk image data.
    data: Vec<u8>,
    /// Current track for file allocation.
    current_track: u8,
    /// Current sector for file allocation.
    current_sector: u8,
    verbose: bool,
}

impl DiskImage {
    /// Create a formatted, empty disk.
    fn new(name: &str, id: &str) -> Self {
        let mut disk = Self {
            data: vec![0; D64_SIZE],
            current_track: 1,
            current_sector: 0,
            verbose: false,
        };
        disk.initialize_bam(name, id);
        disk
    }

    /// Initialize the Block Availability Map (BAM) at track 18, sector 0.
    fn initialize_bam(&mut self, name: &str, id: &str) {
        let bam = BAM_OFFSET;

        // Track/sector of first directory sector
        self.data[bam] = DIRECTORY_TRACK;
        self.data[bam + 1] = 1;

        // DOS version 'A'
        self.data[bam + 2] = 0x41;

        // BAM entries for tracks 1-35 (4 bytes each)
        for track in 1..=NUM_TRACKS {
            let entry = bam + 4 + (track - 1) as usize * 4;
            let sectors = sectors_in_track(track);
            self.data[entry] = sectors;

            let full_bytes = (sectors / 8) as usize;
            let remaining = sectors % 8;
            for i in 0..full_bytes {
                self.data[entry + 1 + i] = 0xFF;
            }
            if remaining > 0 {
                self.data[entry + 1 + full_bytes] = (1 << remaining) - 1;
            }
        }

        // BAM and first directory sector
        self.mark_sector_used(DIRECTORY_TRACK, 0);
        self.mark_sector_used(DIRECTORY_TRACK, 1);

        self.data[bam + 0x90..bam + 0xA0].copy_from_slice(&padded_name(name, 16, b' '));
        self.data[bam + 0xA0] = 0xA0;
        self.data[bam + 0xA1] = 0xA0;
        self.data[bam + 0xA2..bam + 0xA4].copy_from_slice(&disk_id(id));
        self.data[bam + 0xA4] = 0xA0;
        self.data[bam + 0xA5] = b'2';
        self.data[bam + 0xA6] = b'A';
        self.data[bam + 0xA7..=bam + 0xAA].fill(0xA0);

        // No next directory sector
        self.data[DIRECTORY_OFFSET] = 0x00;
        self.data[DIRECTORY_OFFSET + 1] = 0xFF;
    }

    fn bam_entry(track: u8) -> usize {
        BAM_OFFSET + 4 + (track - 1) as usize * 4
    }

    fn is_free(&self, track: u8, sector: u8) -> bool {
        let entry = Self::bam_entry(track);
        self.data[entry + 1 + (sector / 8) as usize] & (1 << (sector % 8)) != 0
    }

    /// Mark a sector as used in the BAM.
    fn mark_sector_used(&mut self, track: u8, sector: u8) {
        if track == 0 || track > NUM_TRACKS || !self.is_free(track, sector) {
            return;
        }

        let entry = Self::bam_entry(track);
        self.data[entry] = self.data[entry].saturating_sub(1);
        self.data[entry + 1 + (sector / 8) as usize] &= !(1 << (sector % 8));
    }

    /// Find the next free sector, skipping the directory track.
    fn find_free_sector(&mut self) -> Option<(u8, u8)> {
        let mut track = self.current_track;
        let mut sector = self.current_sector;

        for _ in 0..TOTAL_SECTORS {
            if track == DIRECTORY_TRACK {
                track += 1;
                sector = 0;
            }
            if track > NUM_TRACKS {
                track = 1;
                sector = 0;
            }

            if self.data[Self::bam_entry(track)] > 0 && self.is_free(track, sector) {
                self.current_track = track;
                self.current_sector = sector + 1;
                if self.current_sector >= sectors_in_track(track) {
                    self.current_track += 1;
                    self.current_sector = 0;
                }
                return Some((track, sector));
            }

            sector += 1;
            if sector >= sectors_in_track(track) {
                track += 1;
                sector = 0;
            }
        }

        None
    }

    /// Add a PRG file to the disk image.
    fn add_file(&mut self, name: &str, data: &[u8]) -> Result<(), FormatError> {
        // Find first empty directory entry
        let entry = (0..ENTRIES_PER_SECTOR)
            .map(|i| DIRECTORY_OFFSET + i * ENTRY_SIZE)
            .find(|&offset| self.data[offset + 2] == 0)
            .ok_or(FormatError::DirectoryFull)?;

        // Allocate sectors for file data
        let mut blocks: Vec<(u8, u8)> = Vec::new();
        for _ in data.chunks(BLOCK_DATA) {
            let (track, sector) = self.find_free_sector().ok_or(FormatError::DiskFull)?;
            self.mark_sector_used(track, sector);
            if self.verbose {
                println!("D64: allocated track {}, sector {}", track, sector);
            }
            blocks.push((track, sector));
        }

        for (i, chunk) in data.chunks(BLOCK_DATA).enumerate() {
            let (track, sector) = blocks[i];
            let offset = sector_offset(track, sector).ok_or(FormatError::BrokenChain { track, sector })?;

            match blocks.get(i + 1) {
                Some(&(next_track, next_sector)) => {
                    self.data[offset] = next_track;
                    self.data[offset + 1] = next_sector;
                }
                None => {
                    self.data[offset] = 0x00;
                    self.data[offset + 1] = (chunk.len() + 1) as u8;
                }
            }
            self.data[offset + 2..offset + 2 + chunk.len()].copy_from_slice(chunk);
        }

        let (first_track, first_sector) = blocks.first().copied().unwrap_or((0, 0));
        self.data[entry + 2] = FILE_TYPE_PRG;
        self.data[entry + 3] = first_track;
        self.data[entry + 4] = first_sector;
        self.data[entry + 5..entry + 21].copy_from_slice(&padded_name(name, 16, 0xA0));

        // File size in sectors (little-endian)
        let count = blocks.len() as u16;
        self.data[entry + 0x1E..entry + 0x20].copy_from_slice(&count.to_le_bytes());

        if self.verbose {
            println!("D64: wrote \"{}\" ({} blocks)", name.to_ascii_uppercase(), count);
        }
        Ok(())
    }

    /// Read every PRG file listed in the directory.
    fn files(&self) -> Result<Vec<DiskFile>, FormatError> {
        let mut files = Vec::new();
        let (mut track, mut sector) = (DIRECTORY_TRACK, 1);

        for _ in 0..sectors_in_track(DIRECTORY_TRACK) {
            let base = sector_offset(track, sector).ok_or(FormatError::BrokenChain { track, sector })?;

            for i in 0..ENTRIES_PER_SECTOR {
                let entry = base + i * ENTRY_SIZE;
                if self.data[entry + 2] & 0x0F != FILE_TYPE_PRG & 0x0F {
                    continue;
                }
                let name = unpadded_name(&self.data[entry + 5..entry + 21]);
                let data = self.read_chain(self.data[entry + 3], self.data[entry + 4])?;
                if self.verbose {
                    println!("D64: read \"{}\" ({} bytes)", name, data.len());
                }
                files.push(DiskFile { name, data });
            }

            match (self.data[base], self.data[base + 1]) {
                (0, _) => return Ok(files),
                (next_track, next_sector) => {
                    track = next_track;
                    sector = next_sector;
                }
            }
        }

        Err(FormatError::BrokenChain { track, sector })
    }

    /// Follow a file's sector chain.
    fn read_chain(&self, mut track: u8, mut sector: u8) -> Result<Vec<u8>, FormatError> {
        let mut data = Vec::new();

        for _ in 0..TOTAL_SECTORS {
            let offset = sector_offset(track, sector).ok_or(FormatError::BrokenChain { track, sector })?;
            let (next_track, next_sector) = (self.data[offset], self.data[offset + 1]);

            if next_track == 0 {
                if next_sector == 0 {
                    return Err(FormatError::BrokenChain { track, sector });
                }
                let used = next_sector as usize - 1;
                data.extend_from_slice(&self.data[offset + 2..offset + 2 + used]);
                return Ok(data);
            }

            data.extend_from_slice(&self.data[offset + 2..offset + SECTOR_SIZE]);
            track = next_track;
            sector = next_sector;
        }

        Err(FormatError::BrokenChain { track, sector })
    }
}

/// List the PRG files on a disk image.
pub fn read_files(data: &[u8]) -> Result<Vec<DiskFile>, FormatError> {
    if data.len() != D64_SIZE {
        return Err(FormatError::InvalidSize {
            format: "D64",
            expected: D64_SIZE,
            actual: data.len(),
        });
    }
    DiskImage {
        data: data.to_vec(),
        current_track: 1,
        current_sector: 0,
        verbose: false,
    }
    .files()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_sectors_per_track() {
        assert_eq!(sectors_in_track(0), 0);
        assert_eq!(sectors_in_track(1), 21);
        assert_eq!(sectors_in_track(17), 21);
        assert_eq!(sectors_in_track(18), 19);
        assert_eq!(sectors_in_track(25), 18);
        assert_eq!(sectors_in_track(35), 17);
        assert_eq!(sectors_in_track(36), 0);
    }

    #[test]
    fn test_sector_offset() {
        assert_eq!(sector_offset(1, 0), Some(0));
        assert_eq!(sector_offset(1, 1), Some(256));
        assert_eq!(sector_offset(2, 0), Some(21 * 256));
        assert_eq!(sector_offset(18, 0), Some(BAM_OFFSET));
        assert!(sector_offset(0, 0).is_none());
        assert!(sector_offset(1, 21).is_none());
    }

    #[test]
    fn test_geometry_totals() {
        let sectors: usize = (1..=NUM_TRACKS).map(|t| sectors_in_track(t) as usize).sum();
        assert_eq!(sectors, TOTAL_SECTORS);
        assert_eq!(sectors * SECTOR_SIZE, D64_SIZE);
    }

    #[test_case("A"; "one character")]
    #[test_case("ABC"; "three characters")]
    #[test_case(""; "empty")]
    fn test_invalid_disk_id_defaults(id: &str) {
        let codec = D64 {
            disk_id: id.to_string(),
            ..D64::default()
        };
        let data = codec.encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
        assert_eq!(&data[BAM_OFFSET + 0xA2..BAM_OFFSET + 0xA4], b"01");
    }

    #[test]
    fn test_bam_header() {
        let codec = D64 {
            disk_name: "demo disk".to_string(),
            disk_id: "ab".to_string(),
            ..D64::default()
        };
        let data = codec.encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
        let bam = &data[BAM_OFFSET..BAM_OFFSET + SECTOR_SIZE];

        assert_eq!(data.len(), D64_SIZE);
        assert_eq!(&bam[0..3], &[18, 1, b'A']);
        assert_eq!(&bam[0x90..0xA0], b"DEMO DISK       ");
        assert_eq!(&bam[0xA2..0xA4], b"AB");
        assert_eq!(&bam[0xA5..0xA7], b"2A");
        // Track 18: BAM and directory sector in use.
        let track18 = 4 + 17 * 4;
        assert_eq!(bam[track18], 17);
        assert_eq!(bam[track18 + 1], 0xFC);
    }

    #[test]
    fn test_directory_entry_and_data_block() {
        let segment = Segment::new(0x1000, vec![0xA9, 0x42, 0x60]);
        let data = D64::new().encode(&[segment]).unwrap();
        let entry = &data[DIRECTORY_OFFSET..DIRECTORY_OFFSET + ENTRY_SIZE];

        assert_eq!(&data[DIRECTORY_OFFSET..DIRECTORY_OFFSET + 2], &[0x00, 0xFF]);
        assert_eq!(entry[2], FILE_TYPE_PRG);
        assert_eq!((entry[3], entry[4]), (1, 0));
        assert_eq!(&entry[5..12], b"PROGRAM");
        assert_eq!(entry[12], 0xA0);
        assert_eq!(&entry[0x1E..0x20], &[1, 0]);

        // Terminal block: link (0, used + 1), then load address and code.
        assert_eq!(&data[0..7], &[0x00, 0x06, 0x00, 0x10, 0xA9, 0x42, 0x60]);
    }

    #[test]
    fn test_multi_block_file() {
        let code: Vec<u8> = (0..600u32).map(|i| i as u8).collect();
        let segment = Segment::new(0x0801, code.clone());
        let data = D64::new().encode(&[segment.clone()]).unwrap();

        // 602 PRG bytes need three blocks: 254 + 254 + 94.
        let entry = &data[DIRECTORY_OFFSET..DIRECTORY_OFFSET + ENTRY_SIZE];
        assert_eq!(&entry[0x1E..0x20], &[3, 0]);
        assert_eq!(&data[0..2], &[1, 1]);
        assert_eq!(D64::new().decode(&data).unwrap(), vec![segment]);
    }

    #[test]
    fn test_round_trip_merges_segments() {
        let segments = [Segment::new(0x1000, vec![1, 2]), Segment::new(0x1003, vec![4])];
        let data = D64::new().encode(&segments).unwrap();
        assert_eq!(
            D64::new().decode(&data).unwrap(),
            vec![Segment::new(0x1000, vec![1, 2, 0, 4])]
        );
    }

    #[test]
    fn test_read_files() {
        let data = D64::new().encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
        let files = read_files(&data).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "PROGRAM");
        assert_eq!(files[0].data, vec![0x01, 0x08, 0x60]);
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        assert!(matches!(
            D64::new().decode(&[0; 1000]),
            Err(FormatError::InvalidSize { actual: 1000, .. })
        ));
    }

    #[test]
    fn test_decode_broken_chain() {
        let mut data = D64::new().encode(&[Segment::new(0x0801, vec![0x60])]).unwrap();
        // Point the file's only block at a sector that does not exist.
        data[0] = 40;
        data[1] = 0;
        assert!(matches!(D64::new().decode(&data), Err(FormatError::BrokenChain { .. })));
    }
}
