//! Assembler configuration.
//!
//! Handles loading, merging and validating `pdf-assembler.toml`. The file is
//! optional: with no file every value falls back to the stock defaults, which
//! stage images into `pdf-images/` and run
//!
//! ```text
//! asciidoctor-pdf -a pdf-theme=../00-print-assets/themes/vaadin-theme.yml \
//!                 -a pdf-fontsdir=../00-print-assets/fonts pdf.adoc
//! ```
//!
//! ## Config File Location
//!
//! Place `pdf-assembler.toml` next to the tutorial's chapter directories:
//!
//! ```text
//! java-web-app/
//! ├── pdf-assembler.toml       # Optional overrides
//! ├── pdf.adoc                 # Source document handed to the renderer
//! ├── 01-intro/
//! │   └── images/
//! └── 02-setup/
//!     └── images/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! staging_dir = "pdf-images"       # Created per run, removed afterwards
//! chapter_pattern = "[0-9][0-9].+" # Regex searched in directory names
//! images_dir = "images"            # Per-chapter image subdirectory
//!
//! [renderer]
//! command = "asciidoctor-pdf"
//! theme = "../00-print-assets/themes/vaadin-theme.yml"
//! fonts_dir = "../00-print-assets/fonts"
//! source = "pdf.adoc"
//! forward_stderr = false
//!
//! [cover]                          # Optional: seed a cover page
//! source = "../00-print-assets/cover.pdf"
//! target = "cover.pdf"
//! ```
//!
//! Config files are sparse: override only the keys you need. Unknown keys are
//! rejected to catch typos early.

use crate::naming::{ChapterPattern, DEFAULT_CHAPTER_PATTERN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "pdf-assembler.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblerConfig {
    /// Staging directory name, relative to the working directory.
    pub staging_dir: String,
    /// Regex searched (not anchored) in each directory name to find chapters.
    pub chapter_pattern: String,
    /// Name of the image subdirectory inside each chapter.
    pub images_dir: String,
    /// External renderer invocation.
    pub renderer: RendererConfig,
    /// Optional cover page copied into the staging directory first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverConfig>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            staging_dir: "pdf-images".to_string(),
            chapter_pattern: DEFAULT_CHAPTER_PATTERN.to_string(),
            images_dir: "images".to_string(),
            renderer: RendererConfig::default(),
            cover: None,
        }
    }
}

impl AssemblerConfig {
    /// Validate values that serde alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_single_component(&self.staging_dir) {
            return Err(ConfigError::Validation(format!(
                "staging_dir must be a single directory name, got {:?}",
                self.staging_dir
            )));
        }
        if !is_single_component(&self.images_dir) {
            return Err(ConfigError::Validation(format!(
                "images_dir must be a single directory name, got {:?}",
                self.images_dir
            )));
        }
        self.chapter_matcher()?;
        if self.renderer.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "renderer.command must not be empty".into(),
            ));
        }
        if self.renderer.source.trim().is_empty() {
            return Err(ConfigError::Validation(
                "renderer.source must not be empty".into(),
            ));
        }
        if let Some(cover) = &self.cover {
            if cover.source.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "cover.source must not be empty".into(),
                ));
            }
            if !is_single_component(&cover.target) {
                return Err(ConfigError::Validation(format!(
                    "cover.target must be a plain file name, got {:?}",
                    cover.target
                )));
            }
        }
        Ok(())
    }

    /// Compile `chapter_pattern`.
    pub fn chapter_matcher(&self) -> Result<ChapterPattern, ConfigError> {
        ChapterPattern::new(&self.chapter_pattern).map_err(|e| {
            ConfigError::Validation(format!(
                "chapter_pattern {:?} is not a valid regex: {e}",
                self.chapter_pattern
            ))
        })
    }
}

/// `true` for names like `pdf-images`; `false` for `""`, `"."`, `"a/b"`, `"/x"`.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// External renderer settings.
///
/// Paths are passed to the renderer verbatim; they resolve against the
/// working directory because the renderer runs there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Program to run, looked up on `PATH`.
    pub command: String,
    /// Value for `-a pdf-theme=`.
    pub theme: String,
    /// Value for `-a pdf-fontsdir=`.
    pub fonts_dir: String,
    /// Source document, passed as the last positional argument.
    pub source: String,
    /// Forward the renderer's stderr as well as its stdout.
    pub forward_stderr: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: "asciidoctor-pdf".to_string(),
            theme: "../00-print-assets/themes/vaadin-theme.yml".to_string(),
            fonts_dir: "../00-print-assets/fonts".to_string(),
            source: "pdf.adoc".to_string(),
            forward_stderr: false,
        }
    }
}

/// Cover page seeded into the staging directory before chapter images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverConfig {
    /// Path to the cover file, relative to the working directory.
    pub source: String,
    /// File name inside the staging directory.
    #[serde(default = "default_cover_target")]
    pub target: String,
}

fn default_cover_target() -> String {
    "cover.pdf".to_string()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Load the config for the working directory `dir`.
///
/// The commented stock file from [`stock_config_toml`] is the bottom layer;
/// `pdf-assembler.toml` in `dir`, when present, is laid over it key by key.
/// The result is deserialized strictly and validated.
pub fn load_config(dir: &Path) -> Result<AssemblerConfig, ConfigError> {
    let mut layered: toml::Table = toml::from_str(stock_config_toml())?;
    if let Some(overrides) = read_overrides(dir)? {
        overlay(&mut layered, overrides);
    }
    let config: AssemblerConfig = toml::Value::Table(layered).try_into()?;
    config.validate()?;
    Ok(config)
}

fn read_overrides(dir: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    match fs::read_to_string(&path) {
        Ok(text) => {
            log::debug!("loaded {}", path.display());
            Ok(Some(toml::from_str(&text)?))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `overrides` into `base`. Tables present on both sides are merged;
/// every other value replaces what was there.
fn overlay(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(nested) => {
                if let Some(toml::Value::Table(inner)) = base.get_mut(&key) {
                    overlay(inner, nested);
                } else {
                    base.insert(key, toml::Value::Table(nested));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Fully commented stock `pdf-assembler.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# pdf-assembler configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Directory the chapter images are copied into. Created at the start of
# every run and removed at the end; the run fails if it already exists.
# Your document should reference images relative to this directory
# (e.g. `:imagesdir: pdf-images`).
staging_dir = "pdf-images"

# Regular expression searched in each directory name of the working
# directory. Matching directories are chapters. The default matches any
# name containing two digits followed by another character. Use
# "^[0-9]{2}-.+" to require a leading "NN-" prefix.
chapter_pattern = "[0-9][0-9].+"

# Image subdirectory inside each chapter. All files in it are copied
# (flattened, by file name) into staging_dir. Later chapters overwrite
# earlier files with the same name.
images_dir = "images"

# ---------------------------------------------------------------------------
# Renderer
# ---------------------------------------------------------------------------
[renderer]
# Program to run. Invoked as:
#   <command> -a pdf-theme=<theme> -a pdf-fontsdir=<fonts_dir> <source>
command = "asciidoctor-pdf"
theme = "../00-print-assets/themes/vaadin-theme.yml"
fonts_dir = "../00-print-assets/fonts"
source = "pdf.adoc"

# The renderer's stdout is always shown. Set to true to show stderr too.
forward_stderr = false

# ---------------------------------------------------------------------------
# Cover page
# ---------------------------------------------------------------------------
# Uncomment to copy a cover file into staging_dir before the chapter images.
# [cover]
# source = "../00-print-assets/cover.pdf"
# target = "cover.pdf"
"##
}
