//! Hugo projection of the documentation root.
//!
//! Turns `docs/` into a Hugo content tree whose menu order matches the TOC
//! order. Hugo sorts by front-matter `weight`, so every page gets a weight
//! derived from the indices on its path (see [`weight`]).
//!
//! ## Passes
//!
//! ```text
//! 1. Collect   docs/ subtree (minus legacy/) → GenerationTable (levels, max level)
//! 2. Compute   pre-order, root first         → target path + weight per node
//! 3. Emit      files                         → HugoPage (front matter + content)
//!              directories without index     → synthesized _index.md
//! ```
//!
//! Compute must see a parent before its children. The collect pass records
//! nodes in pre-order and compute walks that order, so the precondition holds
//! by construction; a violation surfaces as [`HugoError::NotComputed`].
//!
//! ## Output Layout
//!
//! ```text
//! docs/                          hugo/content/
//! ├── 1_Introduction.md    →     ├── _index.md            (synthesized)
//! ├── 2_Setup/             →     ├── 1_Introduction.md
//! │   ├── Setup.md         →     ├── 2_Setup/
//! │   └── 1_Install.md     →     │   ├── _index.md        (from Setup.md)
//! └── legacy/              ✗     │   └── 1_Install.md
//! ```

pub mod generation;
pub mod index_page;
pub mod weight;

use crate::config::ProjectConfig;
use crate::scan::{FileTree, NodeId, is_markdown};
use generation::GenerationTable;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HugoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Documentation root '{}' does not exist", .0.display())]
    MissingDocumentationRoot(PathBuf),
    #[error("No generation information for parent of {}", .0.display())]
    MissingParent(PathBuf),
    #[error("Weight requested before it was computed for {}", .0.display())]
    NotComputed(PathBuf),
}

/// What ends up at a page's target path.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// Generated markdown: front matter plus the source body.
    Markdown(String),
    /// A non-markdown file copied byte for byte.
    Copy(PathBuf),
}

/// Where a page comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    File(PathBuf),
    /// Stand-in index file `<name>` for a directory that has none.
    Synthesized { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HugoPage {
    pub target_path: PathBuf,
    pub source: PageSource,
    pub weight: Option<String>,
    pub content: PageContent,
}

impl HugoPage {
    pub fn is_synthesized(&self) -> bool {
        matches!(self.source, PageSource::Synthesized { .. })
    }
}

/// The projected content tree, pages in document order.
#[derive(Debug)]
pub struct HugoSite {
    pub output: PathBuf,
    pub max_level: usize,
    pub pages: Vec<HugoPage>,
}

impl HugoSite {
    pub fn synthesized_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_synthesized()).count()
    }
}

/// Project the documentation root of `tree` into Hugo pages under `output`.
pub fn project(tree: &FileTree, config: &ProjectConfig, output: &Path) -> Result<HugoSite, HugoError> {
    let doc_root_path = tree.path(tree.root()).join(&config.documentation_root);
    let doc_root = tree
        .lookup(&doc_root_path)
        .filter(|&id| tree.is_dir(id))
        .ok_or_else(|| HugoError::MissingDocumentationRoot(doc_root_path.clone()))?;
    let legacy = tree.lookup(&doc_root_path.join(&config.legacy_directory));

    let mut table = GenerationTable::collect(tree, doc_root, legacy);
    weight::compute_all(tree, &mut table, output)?;
    tracing::debug!(
        nodes = table.len(),
        max_level = table.max_level,
        "Computed Hugo weights"
    );

    let mut pages = Vec::new();
    for &id in &table.order {
        if tree.is_dir(id) {
            if let Some(page) = section_page(tree, &table, id)? {
                pages.push(page);
            }
        } else {
            pages.push(file_page(tree, &table, id)?);
        }
    }

    Ok(HugoSite {
        output: output.to_path_buf(),
        max_level: table.max_level,
        pages,
    })
}

fn computed(tree: &FileTree, table: &GenerationTable, id: NodeId) -> Result<(PathBuf, String), HugoError> {
    let info = table
        .get(id)
        .ok_or_else(|| HugoError::MissingParent(tree.path(id).to_path_buf()))?;
    match (info.target(), info.weight()) {
        (Some(target), Some((_, weight))) => Ok((target.clone(), weight.to_string())),
        _ => Err(HugoError::NotComputed(tree.path(id).to_path_buf())),
    }
}

/// Synthesized `_index.md` for a directory with children but no index file.
fn section_page(tree: &FileTree, table: &GenerationTable, id: NodeId) -> Result<Option<HugoPage>, HugoError> {
    let has_children = tree.children(id).iter().any(|&c| table.contains(c));
    if !has_children || index_page::find_index_file(tree, id).is_some() {
        return Ok(None);
    }
    let (target, weight) = computed(tree, table, id)?;
    let title = index_page::title_of(tree, id);
    let name = index_page::synthesized_name(tree.name(id));
    tracing::debug!(
        directory = %tree.path(id).display(),
        name = %name,
        "Synthesizing section index"
    );
    Ok(Some(HugoPage {
        target_path: target.join(index_page::SECTION_INDEX),
        source: PageSource::Synthesized { name },
        content: PageContent::Markdown(index_page::synthesized_page(&title, &weight)),
        weight: Some(weight),
    }))
}

fn file_page(tree: &FileTree, table: &GenerationTable, id: NodeId) -> Result<HugoPage, HugoError> {
    let source = tree.path(id).to_path_buf();
    let (target, own_weight) = computed(tree, table, id)?;

    if !is_markdown(tree.name(id)) {
        return Ok(HugoPage {
            target_path: target,
            source: PageSource::File(source.clone()),
            weight: None,
            content: PageContent::Copy(source),
        });
    }

    // A directory's index file becomes the section page and takes the
    // directory's title and weight. Other index-like files stay plain pages.
    let parent = tree
        .parent(id)
        .ok_or_else(|| HugoError::MissingParent(source.clone()))?;
    let (target, title, weight) = if index_page::find_index_file(tree, parent) == Some(id) {
        let (parent_target, parent_weight) = computed(tree, table, parent)?;
        (
            parent_target.join(index_page::SECTION_INDEX),
            index_page::title_of(tree, parent),
            parent_weight,
        )
    } else {
        (target, index_page::title_of(tree, id), own_weight)
    };

    let body = fs::read_to_string(&source)?;
    Ok(HugoPage {
        target_path: target,
        source: PageSource::File(source),
        content: PageContent::Markdown(format!(
            "{}{body}",
            index_page::front_matter(&title, &weight, false)
        )),
        weight: Some(weight),
    })
}

/// Write every page of `site`, creating directories as needed.
pub fn write_site(site: &HugoSite) -> Result<(), HugoError> {
    fs::create_dir_all(&site.output)?;
    for page in &site.pages {
        if let Some(parent) = page.target_path.parent() {
            fs::create_dir_all(parent)?;
        }
        match &page.content {
            PageContent::Markdown(text) => fs::write(&page.target_path, text)?,
            PageContent::Copy(source) => {
                fs::copy(source, &page.target_path)?;
            }
        }
    }
    tracing::info!(
        output = %site.output.display(),
        pages = site.pages.len(),
        "Wrote Hugo content"
    );
    Ok(())
}
