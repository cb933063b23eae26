//! `[Nav]` breadcrumb rendering.
//!
//! A file listed by a TOC gets a previous / overview / next line:
//!
//! ```text
//! <!---[Nav]-->[&larr;](1_Introduction.md)&nbsp;&nbsp;&nbsp;[Overview](../README.md)&nbsp;&nbsp;&nbsp;[&rarr;](3_Chapter.md)
//! ```
//!
//! The arrows are left out at either end of the sequence. The overview link
//! always points at the file owning the TOC.

use crate::scan::relative_link;
use crate::toc::NavigationOrder;
use std::path::Path;

const SEPARATOR: &str = "&nbsp;&nbsp;&nbsp;";

/// Breadcrumb line for `file`, with links relative to its directory.
pub fn render_navigation(file: &Path, order: &NavigationOrder, overview: &Path) -> String {
    let from = file.parent().unwrap_or(file);
    let mut line = String::new();

    if let Some(previous) = order.predecessor(file) {
        line.push_str(&format!("[&larr;]({})", relative_link(from, &previous.path)));
        line.push_str(SEPARATOR);
    }
    line.push_str(&format!("[Overview]({})", relative_link(from, overview)));
    if let Some(next) = order.successor(file) {
        line.push_str(SEPARATOR);
        line.push_str(&format!("[&rarr;]({})", relative_link(from, &next.path)));
    }
    line
}
