//! Batch generation of sprite sheets
//!
//! Discovers definitions, renders and encodes each selected sprite, and writes
//! `<out>/<name>.png` (plus an optional `<name>.json` sidecar). Rendering and
//! encoding run in parallel; files are written afterwards in discovery order,
//! so the output of a run does not depend on thread scheduling.

use crate::metadata::SheetMetadata;
use crate::models::SpriteDefinition;
use crate::output::{ensure_dir, metadata_path, sheet_path, write_file, OutputError};
use crate::png::{encode_png, EncodeError, EncodeOptions};
use crate::registry::{RegisteredSprite, RegistryWarning, SpriteRegistry};
use crate::renderer::{render_sheet, RenderError};
use crate::spritesheet::SheetLayout;
use crate::suggest::{format_suggestion, suggest};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory holding the definition sources
    pub definitions_dir: PathBuf,
    /// Directory the sheets are written to
    pub out_dir: PathBuf,
    /// Only generate this sprite
    pub filter: Option<String>,
    /// Also write a `<name>.json` metadata sidecar
    pub write_metadata: bool,
    pub encode: EncodeOptions,
}

impl GenerateOptions {
    pub fn new(definitions_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            definitions_dir: definitions_dir.into(),
            out_dir: out_dir.into(),
            filter: None,
            write_metadata: true,
            encode: EncodeOptions::default(),
        }
    }
}

/// Why a single sprite produced no output.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("cannot serialize metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Errors that stop a whole run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no sprite definitions found in {}", dir.display())]
    NoDefinitions { dir: PathBuf },
    #[error("{}", not_found_message(name, available))]
    SpriteNotFound { name: String, available: Vec<String> },
    #[error(transparent)]
    Io(#[from] OutputError),
}

fn not_found_message(name: &str, available: &[String]) -> String {
    let mut message = format!("Sprite \"{}\" not found. Available: {}", name, available.join(", "));
    let candidates: Vec<&str> = available.iter().map(String::as_str).collect();
    if let Some(hint) = format_suggestion(&suggest(name, &candidates, 3)) {
        message.push(' ');
        message.push_str(&hint);
    }
    message
}

/// A sprite rendered and encoded in memory, not yet written.
#[derive(Debug, Clone)]
pub struct EncodedSheet {
    pub name: String,
    pub layout: SheetLayout,
    pub png: Vec<u8>,
    /// Pretty-printed sidecar JSON, when requested
    pub metadata: Option<String>,
}

/// A sheet that was written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedSheet {
    pub name: String,
    pub png_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
    pub layout: SheetLayout,
}

#[derive(Debug)]
pub struct SpriteFailure {
    pub name: String,
    pub source: PathBuf,
    pub error: SpriteError,
}

/// Outcome of a run that was not stopped by a fatal error.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Written sheets, in discovery order
    pub generated: Vec<GeneratedSheet>,
    /// Sprites that could not be rendered or encoded
    pub failures: Vec<SpriteFailure>,
    /// Sources skipped during discovery
    pub warnings: Vec<RegistryWarning>,
}

impl GenerateReport {
    /// True when every selected sprite was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Render and encode one sprite without touching the filesystem.
pub fn generate_sprite(
    definition: &SpriteDefinition,
    write_metadata: bool,
    encode: &EncodeOptions,
) -> Result<EncodedSheet, SpriteError> {
    let sheet = render_sheet(definition)?;
    let png = encode_png(&sheet.image, encode)?;
    let metadata = if write_metadata {
        let image = format!("{}.png", definition.name);
        Some(SheetMetadata::new(definition, &sheet.layout, image).to_json()?)
    } else {
        None
    };

    Ok(EncodedSheet { name: definition.name.clone(), layout: sheet.layout, png, metadata })
}

/// Discover definitions in `options.definitions_dir` and generate them.
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, GenerateError> {
    let registry = SpriteRegistry::load_dir(&options.definitions_dir);
    generate_from_registry(&registry, options)
}

/// Generate the sprites of an already loaded registry.
pub fn generate_from_registry(
    registry: &SpriteRegistry,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    if registry.is_empty() {
        return Err(GenerateError::NoDefinitions { dir: options.definitions_dir.clone() });
    }

    let selected: Vec<&RegisteredSprite> = match &options.filter {
        Some(name) => match registry.get(name) {
            Some(sprite) => vec![sprite],
            None => {
                return Err(GenerateError::SpriteNotFound {
                    name: name.clone(),
                    available: registry.names().into_iter().map(String::from).collect(),
                })
            }
        },
        None => registry.sprites().iter().collect(),
    };

    ensure_dir(&options.out_dir)?;

    // collect() on an indexed parallel iterator keeps input order
    let encoded: Vec<Result<EncodedSheet, SpriteError>> = selected
        .par_iter()
        .map(|sprite| generate_sprite(&sprite.definition, options.write_metadata, &options.encode))
        .collect();

    let mut report = GenerateReport { warnings: registry.warnings().to_vec(), ..Default::default() };
    for (sprite, result) in selected.iter().zip(encoded) {
        match result {
            Ok(sheet) => report.generated.push(write_sheet(&options.out_dir, sheet)?),
            Err(error) => {
                warn!(sprite = %sprite.definition.name, "{}", error);
                report.failures.push(SpriteFailure {
                    name: sprite.definition.name.clone(),
                    source: sprite.source.clone(),
                    error,
                });
            }
        }
    }

    Ok(report)
}

fn write_sheet(out_dir: &Path, sheet: EncodedSheet) -> Result<GeneratedSheet, OutputError> {
    let png_path = sheet_path(out_dir, &sheet.name);
    write_file(&png_path, &sheet.png)?;

    let metadata_path = match &sheet.metadata {
        Some(json) => {
            let path = metadata_path(out_dir, &sheet.name);
            write_file(&path, json.as_bytes())?;
            Some(path)
        }
        None => None,
    };

    info!(
        sprite = %sheet.name,
        path = %png_path.display(),
        width = sheet.layout.width(),
        height = sheet.layout.height(),
        "wrote sprite sheet"
    );

    Ok(GeneratedSheet { name: sheet.name, png_path, metadata_path, layout: sheet.layout })
}
