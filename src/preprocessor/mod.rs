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

//! Include preprocessor.
//!
//! Runs before the lexer and works line by line. A line consisting of an
//! include directive is replaced by the expanded contents of the named
//! file:
//!
//! ```text
//! #include "path"      .include "path"      .INCLUDE 'path'      #include path
//! ```
//!
//! A `#importonce` line marks the current file so that later includes of
//! it expand to nothing. Every output line remembers the file and line it
//! came from, which is how diagnostics point back into included files.

pub mod resolver;

pub use resolver::{FileResolver, MemoryResolver, ResolvedSource, SourceResolver};

use crate::error::{CompileError, ErrorCode, SourceOrigin, Span};
use std::collections::{HashMap, HashSet};
use std::io;

/// Default cap on nested include depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Include-expanded source text.
#[derive(Debug, Clone, Default)]
pub struct Expanded {
    /// The expanded text, one `\n`-terminated line per entry in `origins`.
    pub text: String,
    /// Where each output line came from (index 0 is line 1).
    pub origins: Vec<SourceOrigin>,
}

impl Expanded {
    /// Origin of a 1-indexed line of the expanded text.
    pub fn origin_of_line(&self, line: usize) -> Option<&SourceOrigin> {
        line.checked_sub(1).and_then(|index| self.origins.get(index))
    }

    /// Origin of the line containing byte `offset`.
    pub fn origin_at(&self, offset: usize) -> Option<&SourceOrigin> {
        let offset = offset.min(self.text.len());
        let line = self.text.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.origins.get(line)
    }

    /// Attach the original file and line to an error raised on this text.
    pub fn locate(&self, error: CompileError) -> CompileError {
        if error.origin.is_some() {
            return error;
        }
        match self.origin_at(error.span.start).cloned() {
            Some(origin) => error.with_origin(origin),
            None => error,
        }
    }

    fn push_line(&mut self, line: &str, file: &str, number: usize) {
        self.text.push_str(line);
        self.text.push('\n');
        self.origins.push(SourceOrigin {
            file: file.to_string(),
            line: number,
        });
    }
}

/// A directive recognised on a line of its own.
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    Include(Option<&'a str>),
    ImportOnce,
}

/// Expands include directives through a [`SourceResolver`].
pub struct Preprocessor<R> {
    resolver: R,
    max_depth: usize,
    /// Keys of files that declared `#importonce`.
    imported_once: HashSet<String>,
    /// Keys of the files currently being expanded, outermost first.
    stack: Vec<String>,
    /// Display name of each file in `stack`.
    names: Vec<String>,
    /// Every loaded file's text, by display name.
    sources: HashMap<String, String>,
}

impl<R: SourceResolver> Preprocessor<R> {
    /// Create a preprocessor with the default depth cap.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            max_depth: DEFAULT_MAX_DEPTH,
            imported_once: HashSet::new(),
            stack: Vec::new(),
            names: Vec::new(),
            sources: HashMap::new(),
        }
    }

    /// Set the maximum include nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Text of a loaded file by display name, for rendering diagnostics
    /// whose span points into that file.
    pub fn source_text(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Load `path` through the resolver and expand it.
    pub fn expand_file(&mut self, path: &str) -> Result<Expanded, CompileError> {
        let source = self
            .resolver
            .resolve(path, None)
            .map_err(|e| resolve_error(e, path, Span::default()))?;
        self.expand_root(source)
    }

    /// Expand in-memory text. `name` identifies it in diagnostics and is
    /// the including file for its relative includes.
    pub fn expand_source(&mut self, name: &str, text: &str) -> Result<Expanded, CompileError> {
        self.expand_root(ResolvedSource {
            key: name.to_string(),
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    fn expand_root(&mut self, source: ResolvedSource) -> Result<Expanded, CompileError> {
        self.imported_once.clear();
        self.stack.clear();
        self.names.clear();
        self.sources.clear();

        let mut out = Expanded::default();
        self.expand_into(source, &mut out)?;
        Ok(out)
    }

    fn expand_into(&mut self, source: ResolvedSource, out: &mut Expanded) -> Result<(), CompileError> {
        self.stack.push(source.key.clone());
        self.names.push(source.name.clone());
        self.sources.insert(source.name.clone(), source.text.clone());

        let mut offset = 0;
        for (index, raw) in source.text.split_inclusive('\n').enumerate() {
            let line = raw.trim_end_matches('\n').trim_end_matches('\r');
            let number = index + 1;
            let here = |e: CompileError| {
                e.with_origin(SourceOrigin {
                    file: source.name.clone(),
                    line: number,
                })
            };
            let span = Span::new(offset, offset + line.len());
            offset += raw.len();

            match parse_directive(line) {
                None => out.push_line(line, &source.name, number),
                Some(Directive::ImportOnce) => {
                    self.imported_once.insert(source.key.clone());
                    out.push_line("", &source.name, number);
                }
                Some(Directive::Include(None)) => {
                    return Err(here(
                        CompileError::new(ErrorCode::MalformedInclude, "malformed include directive", span)
                            .with_hint("write the path in quotes: #include \"file.asm\""),
                    ));
                }
                Some(Directive::Include(Some(path))) => {
                    if self.stack.len() > self.max_depth {
                        return Err(here(CompileError::new(
                            ErrorCode::IncludeDepthExceeded,
                            format!("include depth exceeds the limit of {}", self.max_depth),
                            span,
                        )));
                    }

                    let included = self
                        .resolver
                        .resolve(path, Some(&source.key))
                        .map_err(|e| here(resolve_error(e, path, span.clone())))?;

                    if self.imported_once.contains(&included.key) {
                        continue;
                    }
                    if self.stack.contains(&included.key) {
                        let mut chain = self.names.clone();
                        chain.push(included.name.clone());
                        return Err(here(CompileError::new(
                            ErrorCode::CircularInclude,
                            format!("circular include of \"{}\" ({})", path, chain.join(" -> ")),
                            span,
                        )));
                    }

                    self.expand_into(included, out)?;
                }
            }
        }

        self.stack.pop();
        self.names.pop();
        Ok(())
    }
}

fn resolve_error(error: io::Error, path: &str, span: Span) -> CompileError {
    match error.kind() {
        io::ErrorKind::NotFound => CompileError::new(
            ErrorCode::FileNotFound,
            format!("file not found: \"{}\"", path),
            span,
        ),
        _ => CompileError::new(
            ErrorCode::FileReadError,
            format!("cannot read file \"{}\": {}", path, error),
            span,
        ),
    }
}

/// Recognise a directive occupying the whole line.
fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let trimmed = line.trim();
    let word_end = trimmed
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .unwrap_or(trimmed.len());
    let (word, rest) = trimmed.split_at(word_end);

    if word.eq_ignore_ascii_case("#include") || word.eq_ignore_ascii_case(".include") {
        Some(Directive::Include(parse_path(rest)))
    } else if word.eq_ignore_ascii_case("#importonce") && is_blank(rest) {
        Some(Directive::ImportOnce)
    } else {
        None
    }
}

/// Extract the path operand of an include directive.
fn parse_path(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let quote = rest.chars().next()?;

    let (path, tail) = if quote == '"' || quote == '\'' {
        let inner = &rest[1..];
        let close = inner.find(quote)?;
        (&inner[..close], &inner[close + 1..])
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ';')
            .unwrap_or(rest.len());
        rest.split_at(end)
    };

    if path.is_empty() || !is_blank(tail) {
        return None;
    }
    Some(path)
}

/// Whitespace, optionally followed by a line comment.
fn is_blank(text: &str) -> bool {
    let text = text.trim_start();
    text.is_empty() || text.starts_with(';') || text.starts_with("//")
}
