//! Directive matching and text splicing.
//!
//! Directives are HTML comments that render nothing in markdown viewers:
//!
//! ```text
//! <!---[TOC](./docs)-->
//! <!---[Nav]-->
//! <!---[CodeSnippet](../src/main.rs)-->
//! <!---[Link](../Cargo.toml)-->
//! <!---[Dependency](com.example:core:1.2.0)-->
//! ```
//!
//! Each directive owns the generated region right after it. The region shape
//! depends on the tag:
//!
//! | Tag | Region |
//! |-----|--------|
//! | `TOC` | `\n` … `<!---EndOfToc-->` |
//! | `Nav` | the `[&larr;]…[Overview]…[&rarr;]` link line right after it |
//! | `Link` | one `[name](path)` link right after it |
//! | `CodeSnippet`, `Dependency` | a fenced block starting on the next line |
//!
//! Finding the old region is what makes generation idempotent: it is
//! replaced, never appended to. Inline regions stop where the generated link
//! ends, so prose after the directive on the same line is left alone.

use crate::toc::END_OF_TOC;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!---\[(?P<tag>\w+)\](?:\((?P<options>[^)]*)\))?-->").unwrap()
});

static LINK_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]\n]*\]\([^)\n]*\)").unwrap());

static NAV_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\[&larr;\]\([^)\n]*\)&nbsp;&nbsp;&nbsp;)?\[Overview\]\([^)\n]*\)(?:&nbsp;&nbsp;&nbsp;\[&rarr;\]\([^)\n]*\))?",
    )
    .unwrap()
});

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    #[serde(rename = "TOC")]
    Toc,
    Nav,
    CodeSnippet,
    Link,
    Dependency,
}

impl Tag {
    pub fn parse(name: &str) -> Option<Tag> {
        match name {
            "TOC" => Some(Tag::Toc),
            "Nav" => Some(Tag::Nav),
            "CodeSnippet" => Some(Tag::CodeSnippet),
            "Link" => Some(Tag::Link),
            "Dependency" => Some(Tag::Dependency),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Toc => "TOC",
            Tag::Nav => "Nav",
            Tag::CodeSnippet => "CodeSnippet",
            Tag::Link => "Link",
            Tag::Dependency => "Dependency",
        }
    }

    /// Noun used in "missing …" / "wrong …" problem messages.
    pub fn noun(self) -> &'static str {
        match self {
            Tag::Toc => "TOC",
            Tag::Nav => "navigation",
            Tag::CodeSnippet => "code snippet",
            Tag::Link => "link",
            Tag::Dependency => "dependency",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One directive occurrence in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub tag: Tag,
    pub options: String,
    /// The matched comment, e.g. `<!---[TOC](./docs)-->`.
    pub raw: String,
    /// Byte range of `raw` in the file content.
    pub range: Range<usize>,
}

/// A replacement of `range` (holding `old_text`) by `new_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Splice {
    pub range: Range<usize>,
    pub old_text: String,
    pub new_text: String,
}

/// How the text after a directive compares to what it should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    UpToDate { len: usize },
    Wrong { len: usize },
    Missing,
}

impl RegionState {
    /// Length of the existing generated region (0 when missing).
    pub fn len(self) -> usize {
        match self {
            RegionState::UpToDate { len } | RegionState::Wrong { len } => len,
            RegionState::Missing => 0,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Next known directive starting at or after byte `from`.
///
/// Unknown tags are skipped.
pub fn next_directive(content: &str, from: usize) -> Option<Directive> {
    let mut at = from;
    while let Some(captures) = DIRECTIVE.captures_at(content, at) {
        let whole = captures.get(0)?;
        let name = &captures["tag"];
        match Tag::parse(name) {
            Some(tag) => {
                return Some(Directive {
                    tag,
                    options: captures
                        .name("options")
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                    raw: whole.as_str().to_string(),
                    range: whole.range(),
                });
            }
            None => {
                tracing::debug!(tag = name, "Ignoring unknown directive");
                at = whole.end();
            }
        }
    }
    None
}

/// All directives of a file, skipping over their existing generated regions
/// so text inside an included snippet is never taken for a directive.
pub fn scan_directives(content: &str) -> Vec<Directive> {
    let mut found = Vec::new();
    let mut at = 0;
    while let Some(directive) = next_directive(content, at) {
        let end = directive.range.end;
        let region = existing_region(directive.tag, &content[end..]).unwrap_or(0);
        at = end + region;
        found.push(directive);
    }
    found
}

/// Length of the generated region following a directive, if there is one.
pub fn existing_region(tag: Tag, remaining: &str) -> Option<usize> {
    match tag {
        Tag::Toc => toc_region(remaining),
        Tag::Nav => inline_region(&NAV_REGION, remaining),
        Tag::Link => inline_region(&LINK_REGION, remaining),
        Tag::CodeSnippet | Tag::Dependency => fenced_region(remaining),
    }
}

/// Compare the region after a directive with the text it should contain.
pub fn check_region(tag: Tag, remaining: &str, expected: &str) -> RegionState {
    // A fenced block whose content itself holds a fence line would end the
    // detected region early; an exact prefix match settles it first.
    if matches!(tag, Tag::Toc | Tag::CodeSnippet | Tag::Dependency)
        && remaining.starts_with(expected)
        && ends_line(&remaining[expected.len()..])
    {
        return RegionState::UpToDate {
            len: expected.len(),
        };
    }
    match existing_region(tag, remaining) {
        Some(len) if &remaining[..len] == expected => RegionState::UpToDate { len },
        Some(len) => RegionState::Wrong { len },
        None => RegionState::Missing,
    }
}

/// Apply splices to `content`. Ranges must not overlap.
pub fn apply_splices(content: &str, splices: &[Splice]) -> String {
    let mut ordered: Vec<&Splice> = splices.iter().collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.range.start));

    let mut out = content.to_string();
    for splice in ordered {
        out.replace_range(splice.range.clone(), &splice.new_text);
    }
    out
}

fn ends_line(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
}

fn toc_region(remaining: &str) -> Option<usize> {
    if !remaining.starts_with('\n') {
        return None;
    }
    let end = remaining.find(END_OF_TOC)?;
    // The sentinel must belong to this TOC, not to a later directive.
    if DIRECTIVE.is_match(&remaining[..end]) {
        return None;
    }
    Some(end + END_OF_TOC.len())
}

fn inline_region(shape: &Regex, remaining: &str) -> Option<usize> {
    shape.find(remaining).map(|m| m.end())
}

fn fenced_region(remaining: &str) -> Option<usize> {
    let body = remaining.strip_prefix('\n')?;
    if !body.starts_with(FENCE) {
        return None;
    }
    let mut offset = 1 + body.find('\n')? + 1;
    while offset <= remaining.len() {
        let line_end = remaining[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(remaining.len());
        if remaining[offset..line_end].trim_end() == FENCE {
            return Some(line_end);
        }
        if line_end == remaining.len() {
            break;
        }
        offset = line_end + 1;
    }
    None
}
