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


//! Fuzz target for the full assembly pipeline.
//!
//! Inputs are wrapped in a fixed origin so that most accepted programs
//! exercise both passes.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_assembler -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    // Keep the preprocessor away from the filesystem.
    if body.to_ascii_lowercase().contains("include") {
        return;
    }

    let source = format!(".ORG $1000\n{}\n", body);
    if let Ok(segments) = asm65::assemble(&source) {
        for segment in &segments {
            assert!(segment.end() <= 0x10000, "segment past $FFFF: {}", segment);
        }
        let _ = asm65::disasm::listing(&segments);
    }
});
