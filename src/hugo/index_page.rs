//! Section index pages and front matter.
//!
//! Weights are written as bare digit strings (`weight: 000100`). Their order
//! is the order of the strings compared at equal length, right-padded with
//! `0`: `0002` sorts as `000200`, after `000100`. A YAML reader that takes
//! the value as an integer sees `2` and `100` instead, so a section page
//! whose weight is shorter than its siblings' can be ranked ahead of them.
//! [`super::weight::compare_weights`] is the ordering the weights are built
//! for.

use crate::naming;
use crate::scan::{FileTree, NodeId};

/// Hugo's file name for a section's own page.
pub const SECTION_INDEX: &str = "_index.md";

/// Display title of a node: the parsed title for indexed names, otherwise
/// the name without its `.md` extension.
pub fn title_of(tree: &FileTree, id: NodeId) -> String {
    naming::parse_indexed_name(tree.name(id), tree.path(id))
        .map(|parsed| parsed.title)
        .unwrap_or_else(|_| naming::strip_index(tree.name(id)))
}

/// Whether a file named `file_name` serves as the index page of `directory`.
pub fn is_index_file(directory_name: &str, file_name: &str) -> bool {
    file_name == "index.md"
        || file_name == SECTION_INDEX
        || file_name == format!("{}.md", naming::strip_index(directory_name))
}

/// The existing index file of `directory`, if any.
///
/// With several candidates, `_index.md` wins over `index.md`, which wins over
/// `<Name>.md`. The others stay ordinary pages, and since `_index.md` always
/// wins when present, none of them can land on the section page's target.
pub fn find_index_file(tree: &FileTree, directory: NodeId) -> Option<NodeId> {
    let named = format!("{}.md", naming::strip_index(tree.name(directory)));
    let candidates = [SECTION_INDEX, "index.md", named.as_str()];
    candidates.iter().find_map(|candidate| {
        tree.children(directory)
            .iter()
            .copied()
            .find(|&child| !tree.is_dir(child) && tree.name(child) == *candidate)
    })
}

/// Name of the page synthesized for a directory without an index file.
pub fn synthesized_name(directory_name: &str) -> String {
    format!("{}.md", naming::strip_index(directory_name))
}

/// YAML front matter block ending in a newline.
pub fn front_matter(title: &str, weight: &str, skip_menu: bool) -> String {
    let mut block = format!("---\ntitle: \"{}\"\nweight: {weight}\n", escape(title));
    if skip_menu {
        block.push_str("skip_menu: true\n");
    }
    block.push_str("---\n");
    block
}

/// Content of a synthesized section page.
pub fn synthesized_page(title: &str, weight: &str) -> String {
    format!("{}\n# {title}\n", front_matter(title, weight, true))
}

fn escape(title: &str) -> String {
    title.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_file_names() {
        assert!(is_index_file("2_Guide", "index.md"));
        assert!(is_index_file("2_Guide", "_index.md"));
        assert!(is_index_file("2_Guide", "Guide.md"));
        assert!(!is_index_file("2_Guide", "2_Guide.md"));
        assert!(!is_index_file("2_Guide", "1_Install.md"));
    }

    #[test]
    fn finds_existing_index_file() {
        let tmp = write_project(&[("docs/2_Guide/Guide.md", ""), ("docs/2_Guide/1_A.md", "")]);
        let tree = scan_project(&tmp);
        let guide = node(&tree, &tmp, "docs/2_Guide");

        let found = find_index_file(&tree, guide).unwrap();
        assert_eq!(tree.name(found), "Guide.md");
    }

    #[test]
    fn underscore_index_wins_over_other_candidates() {
        let tmp = write_project(&[
            ("docs/2_Guide/Guide.md", ""),
            ("docs/2_Guide/index.md", ""),
            ("docs/2_Guide/_index.md", ""),
        ]);
        let tree = scan_project(&tmp);
        let guide = node(&tree, &tmp, "docs/2_Guide");

        let found = find_index_file(&tree, guide).unwrap();
        assert_eq!(tree.name(found), "_index.md");
    }

    #[test]
    fn titles_for_indexed_and_plain_names() {
        let tmp = write_project(&[("docs/2_GettingStarted/", ""), ("docs/overview.md", "")]);
        let tree = scan_project(&tmp);
        assert_eq!(title_of(&tree, node(&tree, &tmp, "docs/2_GettingStarted")), "Getting started");
        assert_eq!(title_of(&tree, node(&tree, &tmp, "docs/overview.md")), "overview");
    }

    #[test]
    fn synthesized_page_carries_weight_and_skips_menu() {
        assert_eq!(synthesized_name("02_docs"), "docs.md");
        assert_eq!(
            synthesized_page("Docs", "0002"),
            "---\ntitle: \"Docs\"\nweight: 0002\nskip_menu: true\n---\n\n# Docs\n"
        );
    }

    #[test]
    fn weights_are_bare_digits_ordered_as_padded_strings() {
        assert!(front_matter("Guide", "0002", true).contains("\nweight: 0002\n"));
        assert_eq!(
            crate::hugo::weight::compare_weights("0002", "000100"),
            std::cmp::Ordering::Greater
        );
    }

    #[test]
    fn quotes_in_titles_are_escaped() {
        assert_eq!(
            front_matter("Say \"hi\"", "01", false),
            "---\ntitle: \"Say \\\"hi\\\"\"\nweight: 01\n---\n"
        );
    }
}
