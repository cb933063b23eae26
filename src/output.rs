//! CLI output formatting for `generate`, `validate` and `hugo`.
//!
//! # Output Format
//!
//! ## Generate / Validate
//!
//! ```text
//! Checked 14 files, 23 directives, 1 TOC
//!
//! Updated
//!     README.md
//!     docs/2_Setup/1_Install.md
//!
//! Problems
//!     Found [CodeSnippet] tag with not existing target '/p/src/gone.rs' (in path /p/README.md)
//! ```
//!
//! A clean VALIDATE run prints only the summary line.
//!
//! ## Hugo
//!
//! ```text
//! 000000 _index.md (synthesized)
//! 000100 1_Intro.md
//! 0002 2_Guide/_index.md (synthesized)
//!     000201 2_Guide/1_Install.md
//!
//! Projected 4 pages (2 synthesized) into hugo/content
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::hugo::{HugoPage, HugoSite};
use crate::process::ProcessReport;
use crate::types::Goal;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` with `/` separators, or as-is outside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Generate / Validate
// ============================================================================

pub fn format_process_report(report: &ProcessReport, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Checked {}, {}, {}",
        plural(report.files_scanned, "file", "files"),
        plural(report.directives, "directive", "directives"),
        plural(report.tocs, "TOC", "TOCs"),
    )];

    if report.goal == Goal::Generate && !report.changed.is_empty() {
        lines.push(String::new());
        lines.push("Updated".to_string());
        for path in &report.changed {
            lines.push(format!("{}{}", indent(1), display_path(path, root)));
        }
    }

    if !report.is_ok() {
        lines.push(String::new());
        lines.push("Problems".to_string());
        for error in &report.errors {
            lines.push(format!("{}{error}", indent(1)));
        }
        for unreadable in &report.unreadable {
            lines.push(format!(
                "{}Could not read {}: {}",
                indent(1),
                unreadable.path.display(),
                unreadable.message
            ));
        }
    }
    lines
}

pub fn print_process_report(report: &ProcessReport, root: &Path) {
    for line in format_process_report(report, root) {
        println!("{}", line);
    }
}

/// Machine-readable report for `validate --json`.
pub fn format_json_report(report: &ProcessReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// ============================================================================
// Hugo
// ============================================================================

/// Depth of a page below the output root, counting section pages as their
/// section's depth.
fn page_depth(page: &HugoPage, output: &Path) -> usize {
    let rel = page.target_path.strip_prefix(output).unwrap_or(&page.target_path);
    let components = rel.components().count();
    if page.target_path.ends_with(crate::hugo::index_page::SECTION_INDEX) {
        components.saturating_sub(1)
    } else {
        components
    }
}

fn page_line(page: &HugoPage, output: &Path) -> String {
    let target = display_path(&page.target_path, output);
    let mut line = match &page.weight {
        Some(weight) => format!("{weight} {target}"),
        None => target,
    };
    if page.is_synthesized() {
        line.push_str(" (synthesized)");
    }
    line
}

pub fn format_hugo_output(site: &HugoSite, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = site
        .pages
        .iter()
        .map(|page| {
            let depth = page_depth(page, &site.output).saturating_sub(1);
            format!("{}{}", indent(depth), page_line(page, &site.output))
        })
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Projected {} ({} synthesized) into {}",
        plural(site.pages.len(), "page", "pages"),
        site.synthesized_count(),
        display_path(&site.output, root)
    ));
    lines
}

pub fn print_hugo_output(site: &HugoSite, root: &Path) {
    for line in format_hugo_output(site, root) {
        println!("{}", line);
    }
}
