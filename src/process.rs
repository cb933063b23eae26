//! Directive processing: the GENERATE and VALIDATE goals.
//!
//! Works on the project snapshot in two passes:
//!
//! ```text
//! 1. TOCs      every [TOC] directive → validated tree → rendered list + file order
//! 2. Regions   every directive       → expected text  → compare with existing region
//! ```
//!
//! Pass 1 has to see the whole project before pass 2 starts, because a
//! `[Nav]` line in `docs/2_Setup.md` depends on a TOC that may live in
//! `README.md`.
//!
//! ## Errors
//!
//! Structural problems abort the run with a [`ProcessError`]: malformed TOC
//! options, a TOC pointing at a missing directory, bad indices anywhere in a
//! TOC tree, or `[Nav]` directives in a project without any TOC.
//!
//! Everything else is a [`DirectiveError`] collected across all files and
//! returned in the [`ProcessReport`], in the order encountered. VALIDATE
//! reports every out-of-date region; GENERATE fixes them and only reports
//! what it cannot fix (missing snippet targets, Nav in an unlisted file).

use crate::config::ProjectConfig;
use crate::directive::{self, Directive, RegionState, Splice, Tag};
use crate::includes::{self, IncludeError};
use crate::navigation::render_navigation;
use crate::scan::{FileTree, NodeId, normalize_path};
use crate::toc::{self, NavigationOrder, TocBuilder, TocError};
use crate::types::{DirectiveError, Goal};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static TOC_OPTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(?\s*(?P<path>[^\s()]+)\s*\)?\s*$").unwrap());

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("[TOC] Could not match TOC options '{options}' (in path {})", .path.display())]
    TocOptions { options: String, path: PathBuf },
    #[error("[TOC] Cannot create TOC for not existing directory '{directory}' (in path {})", .path.display())]
    MissingTocDirectory { directory: String, path: PathBuf },
    #[error("Invalid TOC (in path {}):\n{}", .path.display(), join_errors(.errors))]
    InvalidToc { path: PathBuf, errors: Vec<TocError> },
    #[error("Found [Nav] tags but no [TOC] tag exists in the project")]
    NavigationWithoutToc,
}

fn join_errors(errors: &[TocError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A file that could not be read; reported with the other problems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreadableFile {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a processing run.
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub goal: Goal,
    pub files_scanned: usize,
    pub directives: usize,
    pub tocs: usize,
    /// Files rewritten by GENERATE, in path order.
    pub changed: Vec<PathBuf>,
    pub errors: Vec<DirectiveError>,
    pub unreadable: Vec<UnreadableFile>,
}

impl ProcessReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.unreadable.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.errors.len() + self.unreadable.len()
    }
}

/// A resolved `[TOC]` directive.
struct TocOutput {
    owner: PathBuf,
    rendered: String,
    order: NavigationOrder,
}

/// All TOCs of the project and which TOC lists which file.
#[derive(Default)]
struct TocIndex {
    tocs: Vec<TocOutput>,
    by_directive: HashMap<(PathBuf, String), usize>,
    by_file: HashMap<PathBuf, usize>,
}

impl TocIndex {
    fn owner_of(&self, file: &Path) -> Option<&TocOutput> {
        self.by_file.get(file).map(|&i| &self.tocs[i])
    }
}

/// Run GENERATE or VALIDATE over every markdown file of the snapshot.
pub fn process(
    tree: &FileTree,
    config: &ProjectConfig,
    goal: Goal,
) -> Result<ProcessReport, ProcessError> {
    let mut report = ProcessReport {
        goal,
        files_scanned: 0,
        directives: 0,
        tocs: 0,
        changed: vec![],
        errors: vec![],
        unreadable: vec![],
    };

    let mut sources: Vec<(PathBuf, String)> = Vec::new();
    for id in tree.markdown_files() {
        let path = tree.path(id).to_path_buf();
        match fs::read_to_string(&path) {
            Ok(content) => sources.push((path, content)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read markdown file");
                report.unreadable.push(UnreadableFile {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }
    report.files_scanned = sources.len();

    let scanned: Vec<Vec<Directive>> = sources
        .iter()
        .map(|(_, content)| directive::scan_directives(content))
        .collect();
    let uses_nav = scanned.iter().flatten().any(|d| d.tag == Tag::Nav);

    let index = collect_tocs(tree, config, &sources, &scanned)?;
    report.tocs = index.tocs.len();
    if uses_nav && index.tocs.is_empty() {
        return Err(ProcessError::NavigationWithoutToc);
    }

    for ((path, content), directives) in sources.iter().zip(&scanned) {
        if uses_nav
            && let Some(owner) = index.owner_of(path)
            && !directives.iter().any(|d| d.tag == Tag::Nav)
        {
            report
                .errors
                .push(DirectiveError::absent_tag(Tag::Nav, &owner.owner, path));
        }

        let splices = process_file(path, content, &index, goal, &mut report);
        if goal == Goal::Generate && !splices.is_empty() {
            let updated = directive::apply_splices(content, &splices);
            if updated != *content {
                fs::write(path, &updated)?;
                tracing::info!(path = %path.display(), splices = splices.len(), "Updated directives");
                report.changed.push(path.clone());
            }
        }
    }

    tracing::info!(
        goal = ?goal,
        files = report.files_scanned,
        directives = report.directives,
        problems = report.problem_count(),
        "Processing completed"
    );
    Ok(report)
}

/// Pass 1: resolve every `[TOC]` directive.
fn collect_tocs(
    tree: &FileTree,
    config: &ProjectConfig,
    sources: &[(PathBuf, String)],
    scanned: &[Vec<Directive>],
) -> Result<TocIndex, ProcessError> {
    let mut index = TocIndex::default();

    for ((path, _), directives) in sources.iter().zip(scanned) {
        for d in directives.iter().filter(|d| d.tag == Tag::Toc) {
            let key = (path.clone(), d.options.clone());
            if index.by_directive.contains_key(&key) {
                continue;
            }
            let output = resolve_toc(tree, config, path, &d.options)?;
            let position = index.tocs.len();
            for file in output.order.files() {
                index.by_file.entry(file.path.clone()).or_insert(position);
            }
            tracing::debug!(
                owner = %path.display(),
                files = output.order.files().len(),
                "Resolved TOC"
            );
            index.by_directive.insert(key, position);
            index.tocs.push(output);
        }
    }
    Ok(index)
}

fn resolve_toc(
    tree: &FileTree,
    config: &ProjectConfig,
    owner: &Path,
    options: &str,
) -> Result<TocOutput, ProcessError> {
    let captures = TOC_OPTIONS
        .captures(options)
        .ok_or_else(|| ProcessError::TocOptions {
            options: options.to_string(),
            path: owner.to_path_buf(),
        })?;
    let raw_directory = &captures["path"];
    let directory = includes::resolve_option_path(owner, raw_directory);
    let scan_base: NodeId = tree
        .lookup(&directory)
        .filter(|&id| tree.is_dir(id))
        .ok_or_else(|| ProcessError::MissingTocDirectory {
            directory: raw_directory.to_string(),
            path: owner.to_path_buf(),
        })?;

    let links_from = owner.parent().unwrap_or(owner);
    let ignored = &config.toc.ignored_directories;
    let legacy = normalize_path(
        &tree
            .path(tree.root())
            .join(&config.documentation_root)
            .join(&config.legacy_directory),
    );
    let root = TocBuilder::new(tree, links_from)
        .with_traverse(|tree, id| {
            !ignored.iter().any(|d| d == tree.name(id)) && tree.path(id) != legacy
        })
        .build(scan_base)
        .map_err(|errors| ProcessError::InvalidToc {
            path: owner.to_path_buf(),
            errors,
        })?;

    Ok(TocOutput {
        owner: owner.to_path_buf(),
        rendered: toc::render(&root),
        order: NavigationOrder::new(&root),
    })
}

/// Pass 2 for one file: check every directive region, returning the splices
/// GENERATE should apply.
fn process_file(
    path: &Path,
    content: &str,
    index: &TocIndex,
    goal: Goal,
    report: &mut ProcessReport,
) -> Vec<Splice> {
    let mut splices = Vec::new();
    let mut at = 0;

    while let Some(d) = directive::next_directive(content, at) {
        report.directives += 1;
        let end = d.range.end;
        let remaining = &content[end..];

        let expected = match expected_text(path, &d, index) {
            Ok(text) => text,
            Err(problem) => {
                report.errors.push(problem);
                at = end + directive::existing_region(d.tag, remaining).unwrap_or(0);
                continue;
            }
        };

        let state = directive::check_region(d.tag, remaining, &expected);
        match (state, goal) {
            (RegionState::UpToDate { .. }, _) => {}
            (RegionState::Wrong { .. }, Goal::Validate) => {
                report.errors.push(DirectiveError::wrong(d.tag, path));
            }
            (RegionState::Missing, Goal::Validate) => {
                report.errors.push(DirectiveError::missing(d.tag, path));
            }
            (_, Goal::Generate) => {
                let old_end = end + state.len();
                splices.push(Splice {
                    range: end..old_end,
                    old_text: content[end..old_end].to_string(),
                    new_text: expected,
                });
            }
        }
        at = end + state.len();
    }
    splices
}

/// The text that should follow directive `d` in the file at `path`.
fn expected_text(path: &Path, d: &Directive, index: &TocIndex) -> Result<String, DirectiveError> {
    match d.tag {
        Tag::Toc => index
            .by_directive
            .get(&(path.to_path_buf(), d.options.clone()))
            .map(|&i| index.tocs[i].rendered.clone())
            .ok_or_else(|| DirectiveError::new(Tag::Toc, "unresolved options", path)),
        Tag::Nav => index
            .owner_of(path)
            .map(|toc| render_navigation(path, &toc.order, &toc.owner))
            .ok_or_else(|| DirectiveError::new(Tag::Nav, "file not indexed by any TOC", path)),
        Tag::CodeSnippet => {
            includes::render_snippet(path, &d.options).map_err(|e| include_problem(Tag::CodeSnippet, e, path))
        }
        Tag::Link => includes::render_link(path, &d.options).map_err(|e| include_problem(Tag::Link, e, path)),
        Tag::Dependency => {
            includes::render_dependency(&d.options).map_err(|e| include_problem(Tag::Dependency, e, path))
        }
    }
}

fn include_problem(tag: Tag, error: IncludeError, path: &Path) -> DirectiveError {
    let problem = match error {
        IncludeError::NotFound { path: target, .. } => {
            format!("not existing target '{}'", target.display())
        }
        IncludeError::Read {
            path: target,
            source,
            ..
        } => format!("unreadable target '{}': {source}", target.display()),
        IncludeError::Coordinates(options) => format!("malformed options '{options}'"),
    };
    DirectiveError::new(tag, problem, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn run(tmp: &tempfile::TempDir, goal: Goal) -> Result<ProcessReport, ProcessError> {
        let tree = scan_project(tmp);
        process(&tree, &ProjectConfig::default(), goal)
    }

    fn messages(report: &ProcessReport) -> Vec<String> {
        report.errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn generate_expands_readme_toc() {
        let tmp = write_project(&[
            ("README.md", "# Project\n<!---[TOC](./docs)-->\nFooter\n"),
            ("docs/1_Introduction.md", "# Intro\n"),
            ("docs/2_AAA.md", "# AAA\n"),
        ]);

        let report = run(&tmp, Goal::Generate).unwrap();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(
            read(&tmp, "README.md"),
            "# Project\n<!---[TOC](./docs)-->\n\
             1. [Introduction](docs/1_Introduction.md)\n\
             2. [A a a](docs/2_AAA.md)\n\
             <!---EndOfToc-->\nFooter\n"
        );
        assert_eq!(report.changed.len(), 1);
    }

    #[test]
    fn generate_is_idempotent_and_validate_passes_after() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "<!---[Nav]-->\n# Intro\n"),
            ("docs/2_Guide/1_Install.md", "<!---[Nav]-->\n# Install\n"),
            ("docs/3_End.md", "<!---[Nav]-->\n# End\n"),
        ]);

        run(&tmp, Goal::Generate).unwrap();
        let first: Vec<String> = ["README.md", "docs/1_Intro.md", "docs/2_Guide/1_Install.md"]
            .iter()
            .map(|f| read(&tmp, f))
            .collect();

        let second = run(&tmp, Goal::Generate).unwrap();
        assert!(second.changed.is_empty());
        let again: Vec<String> = ["README.md", "docs/1_Intro.md", "docs/2_Guide/1_Install.md"]
            .iter()
            .map(|f| read(&tmp, f))
            .collect();
        assert_eq!(first, again);

        let validation = run(&tmp, Goal::Validate).unwrap();
        assert!(validation.is_ok(), "{:?}", messages(&validation));
    }

    #[test]
    fn generate_writes_navigation_lines() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "<!---[Nav]-->\n"),
            ("docs/2_Guide/1_Install.md", "<!---[Nav]-->\n"),
        ]);

        run(&tmp, Goal::Generate).unwrap();
        assert_eq!(
            read(&tmp, "docs/2_Guide/1_Install.md"),
            "<!---[Nav]-->[&larr;](../1_Intro.md)&nbsp;&nbsp;&nbsp;[Overview](../../README.md)\n"
        );
    }

    #[test]
    fn validate_reports_missing_and_wrong_without_writing() {
        let readme = "<!---[TOC](docs)-->\n1. [Old](docs/old.md)\n<!---EndOfToc-->\n";
        let tmp = write_project(&[
            ("README.md", readme),
            ("docs/1_Intro.md", "<!---[Nav]-->\n"),
        ]);

        let report = run(&tmp, Goal::Validate).unwrap();
        let root = tmp.path().display().to_string();
        assert_eq!(
            messages(&report),
            vec![
                format!("Found [TOC] tag with wrong TOC (in path {root}/README.md)"),
                format!("Found [Nav] tag with missing navigation (in path {root}/docs/1_Intro.md)"),
            ]
        );
        assert_eq!(read(&tmp, "README.md"), readme);
        assert!(report.changed.is_empty());
    }

    #[test]
    fn validate_reports_wrong_navigation() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "<!---[Nav]-->[Overview](elsewhere.md)\n"),
        ]);
        run(&tmp, Goal::Generate).unwrap();
        std::fs::write(
            tmp.path().join("docs/1_Intro.md"),
            "<!---[Nav]-->[Overview](elsewhere.md)\n",
        )
        .unwrap();

        let report = run(&tmp, Goal::Validate).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].problem, "wrong navigation");
    }

    #[test]
    fn nav_without_any_toc_is_fatal() {
        let tmp = write_project(&[("docs/1_Intro.md", "<!---[Nav]-->\n")]);
        let result = run(&tmp, Goal::Generate);
        assert!(matches!(result, Err(ProcessError::NavigationWithoutToc)));
    }

    #[test]
    fn nav_in_unlisted_file_is_collected() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "<!---[Nav]-->\n"),
            ("NOTES.md", "<!---[Nav]-->\n"),
        ]);
        let report = run(&tmp, Goal::Generate).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].problem, "file not indexed by any TOC");
        assert!(report.errors[0].path.ends_with("NOTES.md"));
    }

    #[test]
    fn listed_file_without_nav_is_collected_when_nav_is_used() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "<!---[Nav]-->\n"),
            ("docs/2_Forgot.md", "# no nav here\n"),
        ]);
        let report = run(&tmp, Goal::Generate).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].absent);
        assert!(report.errors[0].path.ends_with("docs/2_Forgot.md"));
    }

    #[test]
    fn toc_only_projects_do_not_require_nav() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_Intro.md", "# Intro\n"),
        ]);
        let report = run(&tmp, Goal::Generate).unwrap();
        assert!(report.is_ok());
    }

    #[test]
    fn malformed_toc_options_are_fatal() {
        let tmp = write_project(&[("README.md", "<!---[TOC](docs extra)-->\n")]);
        let err = run(&tmp, Goal::Validate).unwrap_err();
        assert!(matches!(err, ProcessError::TocOptions { .. }));
        assert!(
            err.to_string()
                .starts_with("[TOC] Could not match TOC options 'docs extra'")
        );
    }

    #[test]
    fn missing_toc_directory_is_fatal() {
        let tmp = write_project(&[("README.md", "<!---[TOC](./nowhere)-->\n")]);
        let err = run(&tmp, Goal::Generate).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("[TOC] Cannot create TOC for not existing directory './nowhere'")
        );
    }

    #[test]
    fn invalid_indices_abort_with_all_errors() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_A.md", ""),
            ("docs/3_C.md", ""),
            ("docs/4_D/2_X.md", ""),
        ]);
        let err = run(&tmp, Goal::Generate).unwrap_err();
        match err {
            ProcessError::InvalidToc { errors, .. } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        // nothing was written
        assert_eq!(read(&tmp, "README.md"), "<!---[TOC](docs)-->\n");
    }

    #[test]
    fn toc_skips_ignored_asset_directories() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_A.md", ""),
            ("docs/images/diagram.md", ""),
        ]);
        let report = run(&tmp, Goal::Generate).unwrap();
        assert!(report.is_ok());
        assert!(!read(&tmp, "README.md").contains("diagram"));
    }

    #[test]
    fn toc_skips_legacy_directory() {
        let tmp = write_project(&[
            ("README.md", "<!---[TOC](docs)-->\n"),
            ("docs/1_A.md", ""),
            ("docs/legacy/old.md", ""),
        ]);
        let report = run(&tmp, Goal::Generate).unwrap();
        assert!(report.is_ok());
        assert!(!read(&tmp, "README.md").contains("legacy"));
    }

    #[test]
    fn snippet_link_and_dependency_round_trip() {
        let tmp = write_project(&[
            ("src/lib.rs", "pub fn answer() -> u32 {\n    42\n}\n"),
            (
                "README.md",
                "<!---[CodeSnippet](src/lib.rs)-->\n\nSee <!---[Link](src/lib.rs)-->\n\n<!---[Dependency](org.acme:tool:2.0)-->\n",
            ),
        ]);

        run(&tmp, Goal::Generate).unwrap();
        let readme = read(&tmp, "README.md");
        assert!(readme.contains("<!---[CodeSnippet](src/lib.rs)-->\n```rust\npub fn answer() -> u32 {\n    42\n}\n```\n"));
        assert!(readme.contains("See <!---[Link](src/lib.rs)-->[lib.rs](src/lib.rs)\n"));
        assert!(readme.contains("<artifactId>tool</artifactId>"));

        let validation = run(&tmp, Goal::Validate).unwrap();
        assert!(validation.is_ok(), "{:?}", messages(&validation));
    }

    #[test]
    fn inline_directives_keep_trailing_prose() {
        let tmp = write_project(&[
            ("widget.toml", "name = \"widget\"\n"),
            ("README.md", "<!---[TOC](docs)-->\nSee <!---[Link](widget.toml)--> for all options.\n"),
            ("docs/1_Intro.md", "<!---[Nav]--> back to the start\n"),
        ]);

        run(&tmp, Goal::Generate).unwrap();
        assert!(read(&tmp, "README.md")
            .contains("See <!---[Link](widget.toml)-->[widget.toml](widget.toml) for all options.\n"));
        assert_eq!(
            read(&tmp, "docs/1_Intro.md"),
            "<!---[Nav]-->[Overview](../README.md) back to the start\n"
        );

        let second = run(&tmp, Goal::Generate).unwrap();
        assert!(second.changed.is_empty());
        let validation = run(&tmp, Goal::Validate).unwrap();
        assert!(validation.is_ok(), "{:?}", messages(&validation));
    }

    #[test]
    fn stale_snippet_is_replaced_not_appended() {
        let tmp = write_project(&[
            ("a.sh", "echo new\n"),
            ("README.md", "<!---[CodeSnippet](a.sh)-->\n```bash\necho old\n```\ntail\n"),
        ]);

        let report = run(&tmp, Goal::Validate).unwrap();
        assert_eq!(report.errors[0].problem, "wrong code snippet");

        run(&tmp, Goal::Generate).unwrap();
        assert_eq!(
            read(&tmp, "README.md"),
            "<!---[CodeSnippet](a.sh)-->\n```bash\necho new\n```\ntail\n"
        );
    }

    #[test]
    fn missing_snippet_target_is_reported_in_both_goals() {
        let tmp = write_project(&[("README.md", "<!---[CodeSnippet](gone.rs)-->\n")]);
        for goal in [Goal::Generate, Goal::Validate] {
            let report = run(&tmp, goal).unwrap();
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].problem.starts_with("not existing target"));
        }
    }

    #[test]
    fn errors_from_many_files_are_all_reported_in_order() {
        let tmp = write_project(&[
            ("a.md", "<!---[Link](x)-->\n<!---[Link](y)-->\n"),
            ("b.md", "<!---[Dependency](bad)-->\n"),
        ]);
        let report = run(&tmp, Goal::Validate).unwrap();
        let tags: Vec<Tag> = report.errors.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec![Tag::Link, Tag::Link, Tag::Dependency]);
    }
}
