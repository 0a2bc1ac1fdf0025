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

//! Source resolution for include directives.
//!
//! The preprocessor never touches the filesystem itself; it asks a
//! [`SourceResolver`] for the text behind each include path. The filesystem
//! resolver resolves relative paths against the including file's directory
//! (or a base directory for the root file) and caches what it reads.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A loaded source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Identity used for cycle and `#importonce` tracking.
    pub key: String,
    /// Name shown in diagnostics.
    pub name: String,
    /// File contents.
    pub text: String,
}

/// Looks up include targets.
pub trait SourceResolver {
    /// Load `path`, as written in the directive. `including` is the key of
    /// the file containing the directive, or `None` for the root file.
    fn resolve(&mut self, path: &str, including: Option<&str>) -> io::Result<ResolvedSource>;
}

/// Resolves include paths on the filesystem.
#[derive(Debug, Default)]
pub struct FileResolver {
    /// Base directory for the root file and for paths with no including file.
    base_dir: Option<PathBuf>,
    /// Cache of file contents keyed by canonical path.
    cache: HashMap<PathBuf, String>,
}

impl FileResolver {
    /// Create a resolver relative to the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with a base directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            cache: HashMap::new(),
        }
    }

    /// Resolve a path against the including file's directory, falling back
    /// to the base directory.
    pub fn resolve_path(&self, path: &str, including: Option<&str>) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            return path.to_path_buf();
        }
        if let Some(dir) = including.and_then(|file| Path::new(file).parent()) {
            return dir.join(path);
        }
        match &self.base_dir {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Drop all cached file contents.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl SourceResolver for FileResolver {
    fn resolve(&mut self, path: &str, including: Option<&str>) -> io::Result<ResolvedSource> {
        let resolved = self.resolve_path(path, including);
        let canonical = fs::canonicalize(&resolved)?;

        let text = match self.cache.get(&canonical) {
            Some(text) => text.clone(),
            None => {
                let text = fs::read_to_string(&canonical)?;
                self.cache.insert(canonical.clone(), text.clone());
                text
            }
        };

        Ok(ResolvedSource {
            key: canonical.display().to_string(),
            name: resolved.display().to_string(),
            text,
        })
    }
}

/// Resolves include paths from an in-memory map. Keys are matched exactly.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    files: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, replacing any previous contents.
    pub fn add(&mut self, path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Builder-style [`MemoryResolver::add`].
    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.add(path, text);
        self
    }
}

impl SourceResolver for MemoryResolver {
    fn resolve(&mut self, path: &str, _including: Option<&str>) -> io::Result<ResolvedSource> {
        match self.files.get(path) {
            Some(text) => Ok(ResolvedSource {
                key: path.to_string(),
                name: path.to_string(),
                text: text.clone(),
            }),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolver = FileResolver::with_base_dir("/some/dir");
        let resolved = resolver.resolve_path("/absolute/path/file.asm", None);
        assert_eq!(resolved, PathBuf::from("/absolute/path/file.asm"));
    }

    #[test]
    fn test_resolve_relative_to_base() {
        let resolver = FileResolver::with_base_dir("/some/dir");
        let resolved = resolver.resolve_path("lib/macros.asm", None);
        assert_eq!(resolved, PathBuf::from("/some/dir/lib/macros.asm"));
    }

    #[test]
    fn test_resolve_relative_to_including_file() {
        let resolver = FileResolver::with_base_dir("/some/dir");
        let resolved = resolver.resolve_path("b.asm", Some("/src/lib/a.asm"));
        assert_eq!(resolved, PathBuf::from("/src/lib/b.asm"));
    }

    #[test]
    fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "main.asm", "NOP\n");

        let mut resolver = FileResolver::with_base_dir(temp_dir.path());
        let source = resolver.resolve("main.asm", None).unwrap();
        assert_eq!(source.text, "NOP\n");
        assert!(source.name.ends_with("main.asm"));
    }

    #[test]
    fn test_read_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let mut resolver = FileResolver::with_base_dir(temp_dir.path());
        let err = resolver.resolve("missing.asm", None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_caching() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "cached.asm", "RTS\n");

        let mut resolver = FileResolver::with_base_dir(temp_dir.path());
        let first = resolver.resolve("cached.asm", None).unwrap();
        fs::write(temp_dir.path().join("cached.asm"), "BRK\n").unwrap();
        let second = resolver.resolve("cached.asm", None).unwrap();
        assert_eq!(first.text, second.text);

        resolver.clear_cache();
        let third = resolver.resolve("cached.asm", None).unwrap();
        assert_eq!(third.text, "BRK\n");
    }

    #[test]
    fn test_memory_resolver() {
        let mut resolver = MemoryResolver::new().with_file("a.asm", "NOP");
        assert_eq!(resolver.resolve("a.asm", None).unwrap().text, "NOP");
        assert_eq!(
            resolver.resolve("b.asm", Some("a.asm")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
