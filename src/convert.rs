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

//! Signed/unsigned narrowing helpers.
//!
//! Expression values are evaluated on `i64` and narrowed at the point of
//! use. A value fits a byte if it is representable either as `u8` or as
//! `i8`, and likewise for words. Out-of-range values are never clamped.

/// Operand width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    /// One byte (`-128..=255`).
    Byte,
    /// Two bytes (`-32768..=65535`).
    Word,
}

impl Width {
    /// Number of bytes this width occupies.
    pub fn bytes(self) -> u16 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
        }
    }
}

/// Smallest width that can hold `value`, or `None` if it needs more than 16 bits.
pub fn narrowest_width(value: i64) -> Option<Width> {
    if fits_byte(value) {
        Some(Width::Byte)
    } else if fits_word(value) {
        Some(Width::Word)
    } else {
        None
    }
}

/// Check if `value` is representable as a signed or unsigned byte.
pub fn fits_byte(value: i64) -> bool {
    (-128..=255).contains(&value)
}

/// Check if `value` is representable as a signed or unsigned word.
pub fn fits_word(value: i64) -> bool {
    (-32768..=65535).contains(&value)
}

/// Narrow to a byte, two's complement for negative values.
pub fn to_byte(value: i64) -> Option<u8> {
    fits_byte(value).then_some(value as u8)
}

/// Narrow to a little-endian word, two's complement for negative values.
pub fn to_word(value: i64) -> Option<u16> {
    fits_word(value).then_some(value as u16)
}

/// Narrow to a signed 8-bit displacement (`-128..=127`).
pub fn to_signed_byte(value: i64) -> Option<i8> {
    i8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, Some(Width::Byte); "zero")]
    #[test_case(255, Some(Width::Byte); "max unsigned byte")]
    #[test_case(-128, Some(Width::Byte); "min signed byte")]
    #[test_case(256, Some(Width::Word); "first word")]
    #[test_case(-129, Some(Width::Word); "below signed byte")]
    #[test_case(65535, Some(Width::Word); "max unsigned word")]
    #[test_case(-32768, Some(Width::Word); "min signed word")]
    #[test_case(65536, None; "too large")]
    #[test_case(-32769, None; "too small")]
    fn test_narrowest_width(value: i64, expected: Option<Width>) {
        assert_eq!(narrowest_width(value), expected);
    }

    #[test]
    fn test_narrowing_is_symmetric() {
        // No clamping on either side of the range.
        assert_eq!(to_byte(-129), None);
        assert_eq!(to_byte(256), None);
        assert_eq!(to_word(-32769), None);
        assert_eq!(to_word(65536), None);
    }

    #[test]
    fn test_twos_complement() {
        assert_eq!(to_byte(-1), Some(0xFF));
        assert_eq!(to_byte(-128), Some(0x80));
        assert_eq!(to_word(-2), Some(0xFFFE));
        assert_eq!(to_signed_byte(-3), Some(-3));
        assert_eq!(to_signed_byte(128), None);
    }
}
