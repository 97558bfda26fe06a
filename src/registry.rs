//! Sprite definition discovery and lookup
//!
//! A registry is filled from a definitions directory. Every `.json5`,
//! `.json` or `.jsonl` file directly inside it is a source; files whose name
//! starts with `_` are templates and are ignored. A source that cannot be
//! read or parsed is skipped as a whole with a warning, so one broken file
//! does not block the rest of the batch.

use crate::models::SpriteDefinition;
use crate::parser::parse_stream;
use glob::glob;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File extensions recognized as definition sources.
pub const DEFINITION_EXTENSIONS: [&str; 3] = ["json5", "json", "jsonl"];

/// A problem with one source that did not stop discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryWarning {
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// A discovered definition and the file it came from.
#[derive(Debug, Clone)]
pub struct RegisteredSprite {
    pub definition: SpriteDefinition,
    pub source: PathBuf,
}

/// Sprite definitions in discovery order, looked up by name.
#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: Vec<RegisteredSprite>,
    by_name: HashMap<String, usize>,
    warnings: Vec<RegistryWarning>,
}

/// Check if a path looks like a definition source (right extension, not a template).
pub fn is_definition_file(path: &Path) -> bool {
    let is_template = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(true, |n| n.starts_with('_'));
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DEFINITION_EXTENSIONS.contains(&e));
    !is_template && has_extension
}

/// Find definition sources directly inside `dir`, sorted by path.
///
/// A missing directory simply has no sources.
pub fn find_definition_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dir.display().to_string()));
    let mut files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file() && is_definition_file(p))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

impl SpriteRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every definition source in `dir`.
    pub fn load_dir(dir: &Path) -> Self {
        let mut registry = Self::new();
        let files = find_definition_files(dir);
        debug!(dir = %dir.display(), sources = files.len(), "discovering sprite definitions");
        for path in files {
            registry.load_file(&path);
        }
        registry
    }

    /// Load one source file. Failures become warnings.
    pub fn load_file(&mut self, path: &Path) {
        let parsed = File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|file| parse_stream(file).map_err(|e| e.to_string()));

        match parsed {
            Ok(definitions) => {
                debug!(path = %path.display(), count = definitions.len(), "loaded definitions");
                for definition in definitions {
                    self.register(definition, path);
                }
            }
            Err(message) => self.warn(path, format!("could not load definitions: {}", message)),
        }
    }

    /// Register one definition. A name that is already taken keeps its first
    /// definition; the newcomer is dropped with a warning.
    pub fn register(&mut self, definition: SpriteDefinition, source: &Path) {
        if let Some(&existing) = self.by_name.get(&definition.name) {
            let first = self.sprites[existing].source.display().to_string();
            self.warn(
                source,
                format!("duplicate sprite \"{}\" ignored, already defined in {}", definition.name, first),
            );
            return;
        }
        self.by_name.insert(definition.name.clone(), self.sprites.len());
        self.sprites.push(RegisteredSprite { definition, source: source.to_path_buf() });
    }

    fn warn(&mut self, path: &Path, message: String) {
        let warning = RegistryWarning { path: path.to_path_buf(), message };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Get a sprite by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredSprite> {
        self.by_name.get(name).map(|&i| &self.sprites[i])
    }

    /// Check if a sprite with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All sprites in discovery order.
    pub fn sprites(&self) -> &[RegisteredSprite] {
        &self.sprites
    }

    /// All sprite names in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.sprites.iter().map(|s| s.definition.name.as_str()).collect()
    }

    /// Warnings collected while loading.
    pub fn warnings(&self) -> &[RegistryWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
