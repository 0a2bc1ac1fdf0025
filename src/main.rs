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

//! Asm65 CLI
//!
//! Assembles 6502 source files into C64 PRG, D64 or T64 files.

use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use asm65::disasm::listing;
use asm65::output::{Codec, OutputFormat, D64, Prg, T64};
use asm65::preprocessor::DEFAULT_MAX_DEPTH;
use asm65::Assembler;

/// Asm65 - A 6502 assembler for the Commodore 64
#[derive(Parser, Debug)]
#[command(name = "asm65")]
#[command(author = "Marcel Joachim Kloubert")]
#[command(version)]
#[command(about = "A two-pass 6502 assembler producing C64 PRG, D64 and T64 files")]
#[command(long_about = r#"
Asm65 assembles MOS 6502 source files (including the undocumented
opcodes) into files for the Commodore 64.

The output can be:
  - PRG files (.prg) - Raw C64 program files
  - D64 files (.d64) - 1541 disk images
  - T64 files (.t64) - Tape archives

Example usage:
  asm65 -i hello.asm
  asm65 -i game.asm -o game.d64 -f d64 --name "MY GAME" --id 42
  asm65 -i demo.asm -f t64 -v
"#)]
struct Cli {
    /// Source file to assemble (.asm)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (defaults to the input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: prg, d64 or t64
    #[arg(short, long, default_value = "prg")]
    format: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Maximum nesting depth of include directives
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_include_depth: usize,

    /// Disk, tape and file name (defaults to the input file name)
    #[arg(long)]
    name: Option<String>,

    /// Two-character disk ID for D64 images
    #[arg(long, default_value = "01")]
    id: String,

    /// Print a disassembly listing of the assembled segments
    #[arg(short, long)]
    listing: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    let format = match OutputFormat::from_name(&cli.format) {
        Some(f) => f,
        None => {
            eprintln!(
                "Error: Unknown output format '{}'. Use prg, d64 or t64.",
                cli.format
            );
            return ExitCode::from(1);
        }
    };

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(format.extension()));

    let filename = cli
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");

    if cli.verbose {
        println!("Asm65 v{}", asm65::VERSION);
        println!("Input: {}", cli.input.display());
        println!("Output: {}", output_path.display());
        println!("Output format: {}", format);
        println!();
        println!("Assembling...");
    }

    let assembly = match asm65::assemble_file(&cli.input, &Assembler::new(), cli.max_include_depth) {
        Ok(assembly) => assembly,
        Err(d) => {
            eprint!("{}", d.render(Some(filename)));
            return ExitCode::from(1);
        }
    };

    if cli.verbose {
        println!(
            "Generated {} bytes in {} segment(s)",
            assembly.size(),
            assembly.segments.len()
        );
        for segment in &assembly.segments {
            println!("  - {}", segment);
        }
        println!("Symbols: {}", assembly.symbols.len());
    }

    if cli.listing {
        print!("{}", listing(&assembly.segments));
    }

    let name = cli.name.clone().unwrap_or_else(|| program_name(&cli.input));
    let codec = codec_for(format, &name, &cli.id, cli.verbose);

    if cli.verbose {
        println!("Writing {}...", output_path.display());
    }

    if let Err(e) = codec.write_file(&output_path, &assembly.segments) {
        eprintln!("Error: Cannot write {}: {}", output_path.display(), e);
        return ExitCode::from(1);
    }

    if cli.verbose {
        println!("Done!");
    } else {
        println!("Assembled {} -> {}", filename, output_path.display());
    }

    ExitCode::SUCCESS
}

/// Program name derived from the input file stem.
fn program_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("PROGRAM")
        .to_ascii_uppercase()
}

fn codec_for(format: OutputFormat, name: &str, id: &str, verbose: bool) -> Box<dyn Codec> {
    match format {
        OutputFormat::Prg => Box::new(Prg { verbose }),
        OutputFormat::D64 => Box::new(D64 {
            disk_name: name.to_string(),
            disk_id: id.to_string(),
            file_name: name.to_string(),
            verbose,
        }),
        OutputFormat::T64 => Box::new(T64 {
            tape_name: name.to_string(),
            file_name: name.to_string(),
            verbose,
            ..T64::default()
        }),
    }
}
