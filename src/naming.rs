//! Chapter directory naming.
//!
//! Tutorial chapters live in directories named with a two-digit prefix:
//!
//! ```text
//! 01-introduction/
//! 02-setting-up/
//! 10-deployment/
//! ```
//!
//! ## Matching Rule
//!
//! A directory is a chapter when its name *contains* two ASCII digits followed
//! by at least one more character. The search is unanchored, so `draft-2024`
//! and `abc00x` qualify too; only the digit pair plus one trailing character is
//! required. The default rule is [`DEFAULT_CHAPTER_PATTERN`]. Projects that want
//! a stricter convention can configure an anchored pattern such as
//! `^[0-9]{2}-.+` (see [`crate::config`]).
//!
//! Digits are ASCII only: `٠١-intro` (Arabic-Indic digits) is not a chapter.
//!
//! ## Display Titles
//!
//! For console output the numeric prefix and its dash are stripped and the
//! remaining dashes become spaces: `02-setting-up` → "setting up".

use regex::Regex;

/// Unanchored "two digits followed by at least one more character".
pub const DEFAULT_CHAPTER_PATTERN: &str = "[0-9][0-9].+";

/// Compiled chapter-name matcher.
#[derive(Debug, Clone)]
pub struct ChapterPattern {
    regex: Regex,
}

impl ChapterPattern {
    /// Compile a chapter pattern. The pattern is searched for anywhere in the
    /// name unless it carries its own `^`/`$` anchors.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Human-readable title for a chapter directory name.
///
/// - `"01-intro"` → `"intro"`
/// - `"02-setting-up"` → `"setting up"`
/// - `"10"`, `"10-"` → `"10"` (nothing left after the prefix, keep the number)
/// - `"draft-2024"` → `"draft 2024"`
pub fn chapter_title(name: &str) -> String {
    let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    if rest.is_empty() || rest.len() == name.len() {
        name.trim_end_matches('-').replace('-', " ")
    } else {
        rest.replace('-', " ")
    }
}
