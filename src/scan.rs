//! Chapter discovery.
//!
//! Lists the working directory's immediate entries and builds a
//! [`StagingPlan`]: which chapter directories exist, which image files each
//! contributes, and which staging file names will be written more than once.
//!
//! ## Directory Structure
//!
//! ```text
//! java-web-app/                    # Working directory
//! ├── pdf.adoc                     # Source document (not scanned)
//! ├── 01-intro/                    # Chapter
//! │   ├── intro.adoc
//! │   └── images/
//! │       ├── a.png                # → pdf-images/a.png
//! │       └── b.png                # → pdf-images/b.png
//! ├── 02-setup/                    # Chapter
//! │   └── images/
//! │       └── c.png                # → pdf-images/c.png
//! ├── 03-summary/                  # Chapter without images: contributes nothing
//! ├── 04-appendix.adoc             # Matches the pattern but is a file: skipped
//! └── assets/                      # Does not match the pattern: skipped
//! ```
//!
//! ## Rules
//!
//! - Only immediate children of the working directory are considered.
//! - Directory checks on chapter candidates do not follow symlinks.
//! - Every file in a chapter's image directory is staged; nested directories
//!   are skipped. The hierarchy is flattened to file names.
//! - Entries keep directory-listing order (platform dependent, not sorted).
//!   That order decides which file wins a name collision.
//!
//! Scanning never touches the staging directory, so `check` can print the
//! plan without side effects.

use crate::config::{AssemblerConfig, ConfigError};
use crate::naming::ChapterPattern;
use crate::types::{Chapter, Collision, CoverAsset, ImageAsset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Everything a run will copy into the staging directory, in copy order.
#[derive(Debug, Clone, Serialize)]
pub struct StagingPlan {
    pub staging_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverAsset>,
    pub chapters: Vec<Chapter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<Collision>,
}

impl StagingPlan {
    /// All chapter images with their chapter, in copy order.
    pub fn images(&self) -> impl Iterator<Item = (&Chapter, &ImageAsset)> {
        self.chapters
            .iter()
            .flat_map(|c| c.images.iter().map(move |i| (c, i)))
    }

    pub fn image_count(&self) -> usize {
        self.chapters.iter().map(|c| c.images.len()).sum()
    }
}

/// Scan `root` according to `config`.
pub fn scan(root: &Path, config: &AssemblerConfig) -> Result<StagingPlan, ScanError> {
    let pattern = config.chapter_matcher()?;
    let chapters = scan_chapters(root, &pattern, &config.images_dir, &config.staging_dir)?;

    let cover = cover_asset(root, config);
    let collisions = find_collisions(cover.as_ref(), &chapters);

    Ok(StagingPlan {
        staging_dir: root.join(&config.staging_dir),
        cover,
        chapters,
        collisions,
    })
}

/// The configured cover page, resolved against `root`.
pub fn cover_asset(root: &Path, config: &AssemblerConfig) -> Option<CoverAsset> {
    config.cover.as_ref().map(|c| CoverAsset {
        source: root.join(&c.source),
        target: c.target.clone(),
    })
}

/// Find chapter directories directly under `root`.
///
/// `staging_dir` is never treated as a chapter, even if its name matches.
pub fn scan_chapters(
    root: &Path,
    pattern: &ChapterPattern,
    images_dir: &str,
    staging_dir: &str,
) -> Result<Vec<Chapter>, ScanError> {
    let mut chapters = Vec::new();

    for entry in list_entries(root, false)? {
        let name = entry.file_name().to_string_lossy().to_string();

        if !pattern.matches(&name) {
            log::trace!("skipping {name}: not a chapter name");
            continue;
        }
        // walkdir reports the entry's own type here (lstat), not a link target's
        if !entry.file_type().is_dir() {
            log::debug!("skipping {name}: not a directory");
            continue;
        }
        if name == staging_dir {
            continue;
        }

        chapters.push(scan_chapter(entry.into_path(), name, images_dir)?);
    }

    Ok(chapters)
}

fn scan_chapter(path: PathBuf, name: String, images_dir: &str) -> Result<Chapter, ScanError> {
    let images_path = path.join(images_dir);
    if !images_path.is_dir() {
        log::debug!("{name}: no {images_dir}/ directory");
        return Ok(Chapter {
            name,
            path,
            images_dir: None,
            images: Vec::new(),
        });
    }

    let mut images = Vec::new();
    for entry in list_entries(&images_path, true)? {
        if !entry.file_type().is_file() {
            log::debug!("skipping {}: not a file", entry.path().display());
            continue;
        }
        images.push(ImageAsset {
            file_name: entry.file_name().to_string_lossy().to_string(),
            source: entry.into_path(),
        });
    }

    Ok(Chapter {
        name,
        path,
        images_dir: Some(images_path),
        images,
    })
}

/// Immediate children of `dir`, in the order the OS lists them.
fn list_entries(dir: &Path, follow_links: bool) -> Result<Vec<walkdir::DirEntry>, ScanError> {
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(follow_links)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Staging names with more than one writer. The cover, if any, is written first.
///
/// Names are compared as the OS sees them, so two non-UTF-8 names that only
/// look alike after lossy conversion do not collide.
fn find_collisions(cover: Option<&CoverAsset>, chapters: &[Chapter]) -> Vec<Collision> {
    let mut writers: BTreeMap<&OsStr, Vec<PathBuf>> = BTreeMap::new();

    if let Some(cover) = cover {
        writers
            .entry(OsStr::new(&cover.target))
            .or_default()
            .push(cover.source.clone());
    }
    for image in chapters.iter().flat_map(|c| &c.images) {
        let name = image
            .source
            .file_name()
            .unwrap_or_else(|| OsStr::new(&image.file_name));
        writers.entry(name).or_default().push(image.source.clone());
    }

    writers
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(file_name, sources)| Collision {
            file_name: file_name.to_string_lossy().to_string(),
            sources,
        })
        .collect()
}
