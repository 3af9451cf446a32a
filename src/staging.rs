//! The staging directory.
//!
//! A run owns exactly one staging directory (`pdf-images/` by default). It is
//! created fresh, filled with the cover and chapter images, read by the
//! renderer, and removed again on every exit path.
//!
//! Removal is tied to [`StagingDir`]'s lifetime: the guard is armed *before*
//! the directory is created, so an early return, a `?`, or a panic anywhere
//! between creation and [`StagingDir::close`] still removes the directory.
//! `close` is the non-panicking path that reports cleanup errors; `Drop` only
//! logs them.
//!
//! A directory that already exists is never adopted: creation fails. The
//! guard still removes it afterwards, so a stale directory from a killed run
//! is gone after the next attempt.

use crate::types::{CoverAsset, ImageAsset};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Cannot create staging directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot remove staging directory {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scoped owner of the staging directory.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    /// Arm a guard for `path` without touching the filesystem.
    pub fn guard(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory. Fails if anything already exists at the path.
    pub fn create(&self) -> Result<(), StagingError> {
        fs::create_dir(&self.path).map_err(|source| StagingError::Create {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("created {}", self.path.display());
        Ok(())
    }

    /// Copy the cover page in under its configured name.
    pub fn seed_cover(&self, cover: &CoverAsset) -> Result<PathBuf, StagingError> {
        let target = self.path.join(&cover.target);
        copy(&cover.source, &target)?;
        Ok(target)
    }

    /// Copy one image in by file name, replacing any earlier file of that name.
    ///
    /// Returns the target path and whether an existing file was replaced.
    pub fn stage_image(&self, image: &ImageAsset) -> Result<(PathBuf, bool), StagingError> {
        let name = image
            .source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| image.file_name.clone().into());
        let target = self.path.join(name);
        let replaced = target.exists();
        copy(&image.source, &target)?;
        Ok((target, replaced))
    }

    /// Disarm the guard and remove the directory, reporting failures.
    pub fn close(mut self) -> Result<(), StagingError> {
        self.armed = false;
        cleanup(&self.path)
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = cleanup(&self.path)
        {
            log::warn!("{e}");
        }
    }
}

fn copy(from: &Path, to: &Path) -> Result<(), StagingError> {
    fs::copy(from, to).map_err(|source| StagingError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    log::trace!("copied {} -> {}", from.display(), to.display());
    Ok(())
}

/// Remove the staging directory and everything in it.
///
/// A missing path is not an error, so calling this twice is fine. A plain
/// file at the path is removed as well.
pub fn cleanup(path: &Path) -> Result<(), StagingError> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            log::debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StagingError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}
