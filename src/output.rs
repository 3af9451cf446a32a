//! CLI output formatting.
//!
//! # Build
//!
//! A normal run prints three progress lines around the renderer's own output:
//!
//! ```text
//! Copying images...
//! Generating PDF
//! <renderer stdout>
//! Done.
//! ```
//!
//! Overwritten images and a non-zero renderer exit add indented notes:
//!
//! ```text
//!     shared.png from 02-setup replaced an earlier copy
//! Done.
//!     asciidoctor-pdf exited with status 1
//! ```
//!
//! A failure prints `Failed.` followed by the error on stderr.
//!
//! # Check
//!
//! ```text
//! Chapters
//! 01 intro (2 images)
//!     Source: 01-intro/images/
//!     a.png
//!     b.png
//! 03 summary
//!     No images/ directory
//!
//! Cover
//!     ../00-print-assets/cover.pdf → cover.pdf
//!
//! Collisions
//!     shared.png: 01-intro/images/shared.png, 02-setup/images/shared.png (last wins)
//!
//! 3 images from 2 chapters → pdf-images/
//! ```
//!
//! Format functions return `Vec<String>` and do no I/O; `print_*` wrappers
//! write to stdout/stderr.

use crate::assemble::AssembleEvent;
use crate::naming::chapter_title;
use crate::scan::StagingPlan;
use crate::types::Chapter;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `root` when possible.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Build
// ============================================================================

/// Lines for one progress event of a build.
pub fn format_event(event: &AssembleEvent, program: &str) -> Vec<String> {
    match event {
        AssembleEvent::CopyingImages { .. } => vec!["Copying images...".to_string()],
        AssembleEvent::CoverSeeded { .. } | AssembleEvent::ImageStaged { replaced: false, .. } => {
            Vec::new()
        }
        AssembleEvent::ImageStaged {
            chapter,
            target,
            replaced: true,
            ..
        } => {
            let name = target
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            vec![format!(
                "{}{name} from {chapter} replaced an earlier copy",
                indent(1)
            )]
        }
        AssembleEvent::GeneratingPdf { .. } => vec!["Generating PDF".to_string()],
        AssembleEvent::Done { outcome } => {
            let mut lines = vec!["Done.".to_string()];
            match outcome.exit_code {
                Some(0) => {}
                Some(code) => {
                    lines.push(format!("{}{program} exited with status {code}", indent(1)))
                }
                None => lines.push(format!("{}{program} was terminated by a signal", indent(1))),
            }
            lines
        }
    }
}

pub fn print_event(event: &AssembleEvent, program: &str) {
    for line in format_event(event, program) {
        println!("{line}");
    }
}

/// Lines for a failed run, including the error's cause chain.
pub fn format_failure(error: &dyn std::error::Error) -> Vec<String> {
    let mut lines = vec![format!("Failed. {error}")];
    let mut source = error.source();
    while let Some(cause) = source {
        // thiserror messages already embed their direct source; skip repeats
        let text = cause.to_string();
        if !lines.iter().any(|l| l.contains(&text)) {
            lines.push(format!("{}caused by: {text}", indent(1)));
        }
        source = cause.source();
    }
    lines
}

pub fn print_failure(error: &dyn std::error::Error) {
    for line in format_failure(error) {
        eprintln!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

fn chapter_header(chapter: &Chapter) -> String {
    let number: String = chapter
        .name
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let title = chapter_title(&chapter.name);
    let label = if number.is_empty() || title == chapter.name {
        chapter.name.clone()
    } else {
        format!("{number} {title}")
    };
    if chapter.images.is_empty() {
        label
    } else {
        format!("{label} ({})", plural(chapter.images.len(), "image"))
    }
}

/// Lines describing what a build would stage. Paths are shown relative to `root`.
pub fn format_plan(plan: &StagingPlan, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Chapters".to_string());
    if plan.chapters.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for chapter in &plan.chapters {
        lines.push(chapter_header(chapter));
        match &chapter.images_dir {
            Some(dir) => {
                lines.push(format!("{}Source: {}/", indent(1), relative(dir, root)));
                for image in &chapter.images {
                    lines.push(format!("{}{}", indent(1), image.file_name));
                }
            }
            None => lines.push(format!("{}No images/ directory", indent(1))),
        }
    }

    if let Some(cover) = &plan.cover {
        lines.push(String::new());
        lines.push("Cover".to_string());
        lines.push(format!(
            "{}{} → {}",
            indent(1),
            relative(&cover.source, root),
            cover.target
        ));
    }

    if !plan.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Collisions".to_string());
        for collision in &plan.collisions {
            let sources: Vec<String> = collision
                .sources
                .iter()
                .map(|s| relative(s, root))
                .collect();
            lines.push(format!(
                "{}{}: {} (last wins)",
                indent(1),
                collision.file_name,
                sources.join(", ")
            ));
        }
    }

    let with_images = plan.chapters.iter().filter(|c| !c.images.is_empty()).count();
    lines.push(String::new());
    lines.push(format!(
        "{} from {} → {}/",
        plural(plan.image_count(), "image"),
        plural(with_images, "chapter"),
        relative(&plan.staging_dir, root)
    ));

    lines
}

pub fn print_plan(plan: &StagingPlan, root: &Path) {
    for line in format_plan(plan, root) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOutcome;
    use crate::staging::StagingError;
    use crate::types::{Collision, CoverAsset, ImageAsset};
    use std::path::PathBuf;

    fn chapter(name: &str, images: &[&str]) -> Chapter {
        let path = PathBuf::from("/work").join(name);
        Chapter {
            name: name.to_string(),
            images_dir: (!images.is_empty()).then(|| path.join("images")),
            images: images
                .iter()
                .map(|i| ImageAsset {
                    file_name: i.to_string(),
                    source: path.join("images").join(i),
                })
                .collect(),
            path,
        }
    }

    fn plan(chapters: Vec<Chapter>) -> StagingPlan {
        StagingPlan {
            staging_dir: PathBuf::from("/work/pdf-images"),
            cover: None,
            chapters,
            collisions: Vec::new(),
        }
    }

    #[test]
    fn build_progress_messages() {
        let copying = AssembleEvent::CopyingImages {
            staging_dir: "pdf-images".into(),
        };
        let generating = AssembleEvent::GeneratingPdf {
            command_line: "asciidoctor-pdf pdf.adoc".to_string(),
            images: 3,
        };
        let done = AssembleEvent::Done {
            outcome: RenderOutcome { exit_code: Some(0) },
        };

        assert_eq!(format_event(&copying, "asciidoctor-pdf"), vec!["Copying images..."]);
        assert_eq!(format_event(&generating, "asciidoctor-pdf"), vec!["Generating PDF"]);
        assert_eq!(format_event(&done, "asciidoctor-pdf"), vec!["Done."]);
    }

    #[test]
    fn plain_image_copy_is_silent() {
        let event = AssembleEvent::ImageStaged {
            chapter: "01-intro".to_string(),
            source: "01-intro/images/a.png".into(),
            target: "pdf-images/a.png".into(),
            replaced: false,
        };
        assert!(format_event(&event, "x").is_empty());
    }

    #[test]
    fn replaced_image_is_reported() {
        let event = AssembleEvent::ImageStaged {
            chapter: "02-setup".to_string(),
            source: "02-setup/images/shared.png".into(),
            target: "pdf-images/shared.png".into(),
            replaced: true,
        };
        assert_eq!(
            format_event(&event, "x"),
            vec!["    shared.png from 02-setup replaced an earlier copy"]
        );
    }

    #[test]
    fn nonzero_exit_is_noted_after_done() {
        let done = AssembleEvent::Done {
            outcome: RenderOutcome { exit_code: Some(1) },
        };
        assert_eq!(
            format_event(&done, "asciidoctor-pdf"),
            vec!["Done.", "    asciidoctor-pdf exited with status 1"]
        );

        let killed = AssembleEvent::Done {
            outcome: RenderOutcome { exit_code: None },
        };
        assert_eq!(
            format_event(&killed, "asciidoctor-pdf")[1],
            "    asciidoctor-pdf was terminated by a signal"
        );
    }

    #[test]
    fn failure_starts_with_failed() {
        let err = StagingError::Create {
            path: "pdf-images".into(),
            source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        };
        let lines = format_failure(&err);
        assert!(lines[0].starts_with("Failed. Cannot create staging directory pdf-images"));
        // The io error is already part of the message
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn plan_lists_chapters_and_images() {
        let lines = format_plan(
            &plan(vec![
                chapter("01-intro", &["a.png", "b.png"]),
                chapter("03-summary", &[]),
            ]),
            Path::new("/work"),
        );

        assert_eq!(
            lines,
            vec![
                "Chapters",
                "01 intro (2 images)",
                "    Source: 01-intro/images/",
                "    a.png",
                "    b.png",
                "03 summary",
                "    No images/ directory",
                "",
                "2 images from 1 chapter → pdf-images/",
            ]
        );
    }

    #[test]
    fn plan_without_chapters() {
        let lines = format_plan(&plan(Vec::new()), Path::new("/work"));
        assert_eq!(lines[1], "    (none)");
        assert_eq!(lines.last().unwrap(), "0 images from 0 chapters → pdf-images/");
    }

    #[test]
    fn unprefixed_chapter_keeps_its_name() {
        let lines = format_plan(&plan(vec![chapter("abc00x", &["m.png"])]), Path::new("/work"));
        assert_eq!(lines[1], "abc00x (1 image)");
    }

    #[test]
    fn plan_shows_cover_and_collisions() {
        let mut p = plan(vec![
            chapter("01-intro", &["shared.png"]),
            chapter("02-setup", &["shared.png"]),
        ]);
        p.cover = Some(CoverAsset {
            source: "/work/print/cover.pdf".into(),
            target: "cover.pdf".to_string(),
        });
        p.collisions = vec![Collision {
            file_name: "shared.png".to_string(),
            sources: vec![
                "/work/01-intro/images/shared.png".into(),
                "/work/02-setup/images/shared.png".into(),
            ],
        }];

        let lines = format_plan(&p, Path::new("/work"));
        assert!(lines.contains(&"Cover".to_string()));
        assert!(lines.contains(&"    print/cover.pdf → cover.pdf".to_string()));
        assert!(lines.contains(
            &"    shared.png: 01-intro/images/shared.png, 02-setup/images/shared.png (last wins)"
                .to_string()
        ));
    }
}
