//! The assembly run: stage, render, clean up.
//!
//! ```text
//! 1. create   pdf-images/                 (fails if it already exists)
//! 2. seed     cover → pdf-images/<target> (only with [cover] configured)
//! 3. scan     chapters → copy images      (sequential, listing order)
//! 4. render   <command> -a ... <source>   (blocks until the child exits)
//! 5. cleanup  rm -r pdf-images/           (always)
//! ```
//!
//! Steps 1–4 run inside a [`StagingDir`] guard, so step 5 happens on every
//! path out of [`run`]: success, any error, or a panic. A failed step aborts
//! the remaining ones; nothing is retried.
//!
//! Progress is reported as [`AssembleEvent`]s through a caller-supplied sink,
//! in order, before the renderer starts writing to stdout.

use crate::config::AssemblerConfig;
use crate::render::{RenderError, RenderInvocation, RenderOutcome, Renderer};
use crate::scan::{self, ScanError};
use crate::staging::{StagingDir, StagingError};
use crate::types::Collision;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Progress notifications emitted by [`run`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssembleEvent {
    /// Staging begins. Emitted before the directory is created, so a run that
    /// fails on creation has still announced itself.
    CopyingImages { staging_dir: PathBuf },
    CoverSeeded { source: PathBuf, target: PathBuf },
    /// One image copied. `replaced` is set when it overwrote an earlier file.
    ImageStaged {
        chapter: String,
        source: PathBuf,
        target: PathBuf,
        replaced: bool,
    },
    /// Staging finished; the renderer is about to start.
    GeneratingPdf { command_line: String, images: usize },
    /// The renderer exited and the staging directory is gone.
    Done { outcome: RenderOutcome },
}

/// One image as it was staged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedImage {
    pub chapter: String,
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct AssembleReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
    pub staged: Vec<StagedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<Collision>,
    pub outcome: RenderOutcome,
}

/// Assemble the tutorial in `root` and render it.
///
/// The staging directory never outlives this call. If both a step and the
/// final cleanup fail, the step's error is returned and the cleanup error is
/// logged.
pub fn run(
    root: &Path,
    config: &AssemblerConfig,
    renderer: &dyn Renderer,
    on_event: &mut dyn FnMut(AssembleEvent),
) -> Result<AssembleReport, AssembleError> {
    let staging = StagingDir::guard(root.join(&config.staging_dir));

    let result = stage_and_render(root, config, renderer, &staging, on_event);
    let cleaned = staging.close();

    match (result, cleaned) {
        (Ok(report), Ok(())) => {
            on_event(AssembleEvent::Done {
                outcome: report.outcome,
            });
            Ok(report)
        }
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            log::error!("{cleanup_err}");
            Err(e)
        }
    }
}

fn stage_and_render(
    root: &Path,
    config: &AssemblerConfig,
    renderer: &dyn Renderer,
    staging: &StagingDir,
    on_event: &mut dyn FnMut(AssembleEvent),
) -> Result<AssembleReport, AssembleError> {
    on_event(AssembleEvent::CopyingImages {
        staging_dir: staging.path().to_path_buf(),
    });
    staging.create()?;

    // The cover is finished before chapters are looked at
    let cover = match scan::cover_asset(root, config) {
        Some(cover) => {
            let target = staging.seed_cover(&cover)?;
            on_event(AssembleEvent::CoverSeeded {
                source: cover.source,
                target: target.clone(),
            });
            Some(target)
        }
        None => None,
    };

    let plan = scan::scan(root, config)?;

    let mut staged = Vec::with_capacity(plan.image_count());
    for (chapter, image) in plan.images() {
        let (target, replaced) = staging.stage_image(image)?;
        log::debug!("staged {} from {}", image.file_name, chapter.name);
        on_event(AssembleEvent::ImageStaged {
            chapter: chapter.name.clone(),
            source: image.source.clone(),
            target: target.clone(),
            replaced,
        });
        staged.push(StagedImage {
            chapter: chapter.name.clone(),
            source: image.source.clone(),
            target,
        });
    }

    let invocation = RenderInvocation::from_config(&config.renderer, root);
    on_event(AssembleEvent::GeneratingPdf {
        command_line: invocation.command_line(),
        images: staged.len(),
    });
    let outcome = renderer.render(&invocation)?;
    if !outcome.success() {
        log::warn!(
            "{} finished with {}",
            invocation.program,
            outcome
                .exit_code
                .map(|c| format!("exit code {c}"))
                .unwrap_or_else(|| "a signal".to_string())
        );
    }

    Ok(AssembleReport {
        cover,
        staged,
        collisions: plan.collisions,
        outcome,
    })
}
