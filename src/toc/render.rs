use super::{TocNode, TocRoot};

/// Marks the end of a generated TOC so a later run can find and replace it.
pub const END_OF_TOC: &str = "<!---EndOfToc-->";

/// Render the tree as an indented markdown list, pre-order.
///
/// Directories are plain labels, files are links. The result starts with a
/// newline (the directive stays on its own line) and ends with [`END_OF_TOC`].
pub fn render(root: &TocRoot) -> String {
    let mut lines = Vec::new();
    render_level(&root.children, 0, &mut lines);
    format!("\n{}\n{}", lines.join("\n"), END_OF_TOC)
}

fn render_level(nodes: &[TocNode], depth: usize, lines: &mut Vec<String>) {
    let indent = "    ".repeat(depth);
    for node in nodes {
        match node {
            TocNode::Directory { item, children } => {
                lines.push(format!("{indent}{}. {}", item.index, item.title));
                render_level(children, depth + 1, lines);
            }
            TocNode::File(item) => {
                lines.push(format!(
                    "{indent}{}. [{}]({})",
                    item.index, item.title, item.link
                ));
            }
        }
    }
}
