//! Text for the include-style directives: `CodeSnippet`, `Link`, `Dependency`.
//!
//! These are plain formatting: read a file or parse coordinates, produce the
//! text that goes after the directive. Paths in options are relative to the
//! directory of the file holding the directive unless absolute.

use crate::scan::{normalize_path, relative_link};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<group>[\w.\-]+):(?P<artifact>[\w.\-]+):(?P<version>[\w.\-]+)(?::(?P<scope>\w+))?\s*$")
        .unwrap()
});

#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("[{tag}] Cannot find file '{}'", .path.display())]
    NotFound { tag: &'static str, path: PathBuf },
    #[error("[{tag}] Could not read file '{}': {source}", .path.display())]
    Read {
        tag: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("[Dependency] Could not match dependency options '{0}'")]
    Coordinates(String),
}

/// Resolve a directive path option against the owning file's directory.
pub fn resolve_option_path(owner: &Path, option: &str) -> PathBuf {
    let option = option.trim();
    let path = Path::new(option);
    if path.is_absolute() {
        normalize_path(path)
    } else {
        let base = owner.parent().unwrap_or(owner);
        normalize_path(&base.join(path))
    }
}

/// `\n```<lang>\n<content>\n```` for the referenced file.
pub fn render_snippet(owner: &Path, option: &str) -> Result<String, IncludeError> {
    let path = resolve_option_path(owner, option);
    if !path.is_file() {
        return Err(IncludeError::NotFound {
            tag: "CodeSnippet",
            path,
        });
    }
    let content = fs::read_to_string(&path).map_err(|source| IncludeError::Read {
        tag: "CodeSnippet",
        path: path.clone(),
        source,
    })?;
    let language = language_for(&path);
    Ok(format!(
        "\n```{language}\n{}\n```",
        content.trim_end_matches(['\n', '\r'])
    ))
}

/// `[<file name>](<relative path>)` for the referenced file or directory.
pub fn render_link(owner: &Path, option: &str) -> Result<String, IncludeError> {
    let path = resolve_option_path(owner, option);
    if !path.exists() {
        return Err(IncludeError::NotFound { tag: "Link", path });
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let from = owner.parent().unwrap_or(owner);
    Ok(format!("[{name}]({})", relative_link(from, &path)))
}

/// Maven dependency block for `group:artifact:version[:scope]`.
pub fn render_dependency(option: &str) -> Result<String, IncludeError> {
    let captures = COORDINATES
        .captures(option)
        .ok_or_else(|| IncludeError::Coordinates(option.to_string()))?;

    let mut block = format!(
        "\n```xml\n<dependency>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n",
        &captures["group"], &captures["artifact"], &captures["version"]
    );
    if let Some(scope) = captures.name("scope") {
        block.push_str(&format!("    <scope>{}</scope>\n", scope.as_str()));
    }
    block.push_str("</dependency>\n```");
    Ok(block)
}

/// Fence language for a file extension.
fn language_for(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "rs" => "rust",
        "kt" | "kts" => "kotlin",
        "yml" | "yaml" => "yaml",
        "sh" => "bash",
        "py" => "python",
        "md" => "markdown",
        "js" => "javascript",
        "ts" => "typescript",
        other => other,
    }
    .to_string()
}
