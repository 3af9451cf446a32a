//! External renderer invocation.
//!
//! The [`Renderer`] trait is the seam between the assembler and the PDF tool.
//! [`CommandRenderer`] is the production implementation; it runs the
//! configured program as a child process:
//!
//! ```text
//! asciidoctor-pdf -a pdf-theme=<theme> -a pdf-fontsdir=<fonts_dir> <source>
//! ```
//!
//! | Stream | Routing |
//! |---|---|
//! | stdin | closed (`/dev/null`) |
//! | stdout | inherited: shown live on the assembler's stdout |
//! | stderr | inherited when `forward_stderr` is set, discarded otherwise |
//!
//! The child runs in the working directory, so relative theme, font and
//! source paths resolve there, and the document finds the staging directory
//! by its relative name. There is no timeout: the call returns when the child
//! exits. Any exit status counts as completion; interpreting it is up to the
//! caller.

use crate::config::RendererConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A fully resolved renderer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub forward_stderr: bool,
}

impl RenderInvocation {
    pub fn from_config(config: &RendererConfig, working_dir: &Path) -> Self {
        Self {
            program: config.command.clone(),
            args: vec![
                "-a".to_string(),
                format!("pdf-theme={}", config.theme),
                "-a".to_string(),
                format!("pdf-fontsdir={}", config.fonts_dir),
                config.source.clone(),
            ],
            working_dir: working_dir.to_path_buf(),
            forward_stderr: config.forward_stderr,
        }
    }

    /// Shell-like rendering for logs and console output. Not re-parseable.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How the renderer finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl RenderOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Anything that can turn the staged tutorial into a PDF.
pub trait Renderer {
    /// Run to completion. Returns `Err` only if the renderer could not be started.
    fn render(&self, invocation: &RenderInvocation) -> Result<RenderOutcome, RenderError>;
}

/// Runs the renderer as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRenderer;

impl Renderer for CommandRenderer {
    fn render(&self, invocation: &RenderInvocation) -> Result<RenderOutcome, RenderError> {
        log::debug!(
            "running `{}` in {}",
            invocation.command_line(),
            invocation.working_dir.display()
        );

        let stderr = if invocation.forward_stderr {
            Stdio::inherit()
        } else {
            Stdio::null()
        };

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(stderr)
            .status()
            .map_err(|source| RenderError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        log::debug!("{} exited with {status}", invocation.program);
        Ok(RenderOutcome {
            exit_code: status.code(),
        })
    }
}
