//! Shared types describing what a run stages.
//!
//! Produced by [`crate::scan`], consumed by [`crate::assemble`] and
//! [`crate::output`], and serialized by `check --json`.

use serde::Serialize;
use std::path::PathBuf;

/// A chapter directory found in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Directory name, e.g. `01-intro`.
    pub name: String,
    pub path: PathBuf,
    /// `None` when the chapter has no image subdirectory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
    /// Files in the image subdirectory, in directory-listing order.
    pub images: Vec<ImageAsset>,
}

/// A file to be copied into the staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    /// Name inside the staging directory (the source's file name).
    pub file_name: String,
    pub source: PathBuf,
}

/// The cover page seeded before chapter images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverAsset {
    pub source: PathBuf,
    pub target: String,
}

/// A staging file name written more than once.
///
/// `sources` lists every writer in copy order; the last one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub file_name: String,
    pub sources: Vec<PathBuf>,
}

impl Collision {
    /// The source whose contents end up in the staging directory.
    pub fn winner(&self) -> Option<&PathBuf> {
        self.sources.last()
    }
}
