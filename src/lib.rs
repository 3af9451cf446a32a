//! # pdf-assembler
//!
//! Builds the print edition of a multi-chapter AsciiDoc tutorial. Each chapter
//! keeps its screenshots in its own `images/` directory; the PDF renderer wants
//! them in one place. The assembler gathers them into a temporary staging
//! directory, runs the renderer, and removes the staging directory again.
//!
//! ```text
//! java-web-app/                       java-web-app/
//! ├── pdf.adoc                        ├── pdf.adoc
//! ├── 01-intro/images/a.png    ──┐    ├── pdf-images/       (during render only)
//! ├── 01-intro/images/b.png    ──┼──▶ │   ├── a.png
//! └── 02-setup/images/c.png    ──┘    │   ├── b.png
//!                                     │   └── c.png
//!                                     └── pdf.pdf           (written by the renderer)
//! ```
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Load `pdf-assembler.toml` over stock defaults | [`config`] |
//! | Find chapter directories and their images | [`scan`], [`naming`] |
//! | Create, fill and remove the staging directory | [`staging`] |
//! | Run the external renderer | [`render`] |
//! | Tie the steps together with guaranteed cleanup | [`assemble`] |
//! | Console output | [`output`] |
//!
//! # Design Decisions
//!
//! ## Cleanup Is Scoped, Not Scheduled
//!
//! The staging directory is owned by a [`staging::StagingDir`] guard that is
//! armed before the directory exists. Whatever happens afterwards (a copy
//! error, a missing renderer, a panic) the directory is removed when the guard
//! goes out of scope. [`assemble::run`] closes the guard explicitly so cleanup
//! errors are reported rather than only logged.
//!
//! ## Everything Before the Renderer Is Sequential
//!
//! The cover page is copied and finished before chapters are scanned, and
//! images are copied one at a time in directory-listing order. Name collisions
//! are therefore deterministic for a given filesystem: the last copy wins.
//! `pdf-assembler check` lists collisions before they happen.
//!
//! ## The Renderer Is Opaque
//!
//! The assembler does not know where the renderer writes its PDF or whether it
//! succeeded beyond its exit status. A non-zero exit is reported but does not
//! make the assembler fail; a renderer that cannot be started does.

pub mod assemble;
pub mod config;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod staging;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
