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


//! Fuzz target for the container decoders.
//!
//! Decoding untrusted PRG, D64 and T64 images must fail cleanly on
//! malformed input.

#![no_main]

use asm65::output::{Codec, Prg, D64, T64};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = Prg::new().decode(data);
    let _ = T64::new().decode(data);
    let _ = asm65::output::t64::read_entries(data);

    // D64 images have a fixed size; pad small inputs so the chain walker runs.
    let mut image = data.to_vec();
    image.resize(asm65::output::d64::D64_SIZE, 0);
    let _ = D64::new().decode(&image);
    let _ = asm65::output::d64::read_files(&image);
});
