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

//! Container codecs.
//!
//! Every format implements [`Codec`]: segments go in, file bytes come out,
//! and back again.
//! - PRG files (load address + program image)
//! - D64 disk images (1541 floppy)
//! - T64 tape archives

pub mod d64;
pub mod prg;
pub mod t64;

pub use d64::D64;
pub use prg::Prg;
pub use t64::T64;

use crate::segment::Segment;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while encoding or decoding a container.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no segments to write")]
    NoSegments,

    #[error("segments at ${first:04X} and ${second:04X} overlap")]
    Overlap { first: u16, second: u16 },

    #[error("program image ${start:04X}-${end:05X} extends past $FFFF")]
    ImageTooLarge { start: u16, end: u32 },

    #[error("{format} file is truncated: need {expected} bytes, got {actual}")]
    Truncated {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {format} size: expected {expected} bytes, got {actual}")]
    InvalidSize {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("bad {format} signature")]
    BadSignature { format: &'static str },

    #[error("entry {entry} points beyond the archive (offset {offset}, archive is {len} bytes)")]
    EntryOutOfBounds { entry: usize, offset: usize, len: usize },

    #[error("broken sector chain at track {track}, sector {sector}")]
    BrokenChain { track: u8, sector: u8 },

    #[error("disk full")]
    DiskFull,

    #[error("directory full")]
    DirectoryFull,

    #[error("too many entries: {count} segments, archive holds {max}")]
    TooManyEntries { count: usize, max: u16 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A container format for assembled segments.
pub trait Codec {
    /// Encode segments into the container's bytes.
    fn encode(&self, segments: &[Segment]) -> Result<Vec<u8>, FormatError>;

    /// Decode container bytes back into segments.
    fn decode(&self, data: &[u8]) -> Result<Vec<Segment>, FormatError>;

    /// Encode and write to `path`. Nothing is written if encoding fails.
    fn write_file(&self, path: &Path, segments: &[Segment]) -> Result<(), FormatError> {
        let data = self.encode(segments)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Read `path` and decode it.
    fn read_file(&self, path: &Path) -> Result<Vec<Segment>, FormatError> {
        let data = fs::read(path)?;
        self.decode(&data)
    }
}

/// The supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PRG file (raw program with load address).
    #[default]
    Prg,
    /// D64 disk image.
    D64,
    /// T64 tape archive.
    T64,
}

impl OutputFormat {
    /// Determine the output format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        Self::from_name(path.extension()?.to_str()?)
    }

    /// Parse a format name (`prg`, `d64`, `t64`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "prg" => Some(Self::Prg),
            "d64" => Some(Self::D64),
            "t64" => Some(Self::T64),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Prg => "prg",
            Self::D64 => "d64",
            Self::T64 => "t64",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_ascii_uppercase())
    }
}

/// Copy `name` into a fixed-size field, uppercased and padded with `pad`.
pub(crate) fn padded_name(name: &str, len: usize, pad: u8) -> Vec<u8> {
    let mut field: Vec<u8> = name
        .bytes()
        .filter(u8::is_ascii)
        .map(|b| b.to_ascii_uppercase())
        .take(len)
        .collect();
    field.resize(len, pad);
    field
}

/// Read a padded name field back into a string.
pub(crate) fn unpadded_name(field: &[u8]) -> String {
    let end = field
        .iter()
        .rposition(|&b| b != 0xA0 && b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}
