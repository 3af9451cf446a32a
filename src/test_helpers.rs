//! Shared test utilities.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let plan = scan(tmp.path(), &AssemblerConfig::default()).unwrap();
//!
//! assert_eq!(image_names(find_chapter(&plan, "01-intro")), vec!["a.png", "b.png"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::scan::StagingPlan;
use crate::types::Chapter;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/tutorial/` to a temp directory and return it.
///
/// The fixture holds `01-intro` (a.png, b.png), `02-setup` (c.png),
/// `03-summary` (no images), `draft-2024` (d.png), the file `04-appendix.adoc`,
/// and a non-chapter `assets/images/` directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/tutorial");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Create `root/<chapter>/images/` holding `images`.
///
/// Each image's contents are `"<chapter>/<image>"` so tests can tell which
/// chapter a staged copy came from.
pub fn write_chapter(root: &Path, chapter: &str, images: &[&str]) -> PathBuf {
    let dir = root.join(chapter);
    fs::create_dir_all(dir.join("images")).unwrap();
    for image in images {
        fs::write(dir.join("images").join(image), format!("{chapter}/{image}")).unwrap();
    }
    dir
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Sorted file names in `dir`. Empty if `dir` does not exist.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Find a chapter by directory name. Panics if not found.
pub fn find_chapter<'a>(plan: &'a StagingPlan, name: &str) -> &'a Chapter {
    plan.chapters
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names = chapter_names(plan);
            panic!("chapter '{name}' not found. Available: {names:?}")
        })
}

/// Chapter names, sorted (scan keeps OS listing order).
pub fn chapter_names(plan: &StagingPlan) -> Vec<&str> {
    let mut names: Vec<&str> = plan.chapters.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    names
}

/// Image file names of a chapter, sorted.
pub fn image_names(chapter: &Chapter) -> Vec<&str> {
    let mut names: Vec<&str> = chapter.images.iter().map(|i| i.file_name.as_str()).collect();
    names.sort();
    names
}
