//! Shared types used by the processing stage, the CLI, and its output.

use crate::directive::Tag;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What a run does with the directives it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Rewrite files so every directive region is up to date.
    Generate,
    /// Report out-of-date regions without touching any file.
    Validate,
}

/// A per-directive problem, collected and reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectiveError {
    pub tag: Tag,
    pub problem: String,
    /// Absolute path of the file holding (or lacking) the directive.
    pub path: PathBuf,
    /// The directive itself is absent from a file that requires it.
    pub absent: bool,
}

impl DirectiveError {
    pub fn new(tag: Tag, problem: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            tag,
            problem: problem.into(),
            path: path.into(),
            absent: false,
        }
    }

    /// A file listed by the TOC in `owner` has no directive with this tag.
    pub fn absent_tag(tag: Tag, owner: &std::path::Path, path: impl Into<PathBuf>) -> Self {
        Self {
            absent: true,
            ..Self::new(tag, format!("file indexed by TOC in {}", owner.display()), path)
        }
    }

    /// `missing <noun>`, e.g. "missing navigation".
    pub fn missing(tag: Tag, path: impl Into<PathBuf>) -> Self {
        Self::new(tag, format!("missing {}", tag.noun()), path)
    }

    /// `wrong <noun>`, e.g. "wrong TOC".
    pub fn wrong(tag: Tag, path: impl Into<PathBuf>) -> Self {
        Self::new(tag, format!("wrong {}", tag.noun()), path)
    }
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absent {
            return write!(
                f,
                "Missing [{}] tag in {} (in path {})",
                self.tag,
                self.problem,
                self.path.display()
            );
        }
        write!(
            f,
            "Found [{}] tag with {} (in path {})",
            self.tag,
            self.problem,
            self.path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_found_tag_template() {
        let err = DirectiveError::missing(Tag::Nav, "/p/docs/1_A.md");
        assert_eq!(
            err.to_string(),
            "Found [Nav] tag with missing navigation (in path /p/docs/1_A.md)"
        );
        let err = DirectiveError::wrong(Tag::Toc, "/p/README.md");
        assert_eq!(err.to_string(), "Found [TOC] tag with wrong TOC (in path /p/README.md)");
    }

    #[test]
    fn absent_tag_message() {
        let err = DirectiveError::absent_tag(
            Tag::Nav,
            std::path::Path::new("/p/README.md"),
            "/p/docs/1_A.md",
        );
        assert_eq!(
            err.to_string(),
            "Missing [Nav] tag in file indexed by TOC in /p/README.md (in path /p/docs/1_A.md)"
        );
    }

    #[test]
    fn serializes_for_json_reports() {
        let err = DirectiveError::wrong(Tag::CodeSnippet, "/p/a.md");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["tag"], "CodeSnippet");
        assert_eq!(json["problem"], "wrong code snippet");
    }
}
