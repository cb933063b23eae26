use clap::{Parser, Subcommand};
use docmark::types::Goal;
use docmark::{config, hugo, output, process, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docmark")]
#[command(about = "Expand and validate markdown documentation directives")]
#[command(long_about = "\
Expand and validate markdown documentation directives

Directives are HTML comments; docmark fills in the text after them.

  <!---[TOC](./docs)-->                 numbered table of contents of a directory
  <!---[Nav]-->                         previous / overview / next links
  <!---[CodeSnippet](../src/main.rs)--> fenced copy of a file
  <!---[Link](../Cargo.toml)-->         relative link to a file
  <!---[Dependency](group:artifact:1.0)--> Maven dependency block

Documentation structure:

  project/
  ├── docmark.toml                 # Optional config
  ├── README.md                    # Holds <!---[TOC](./docs)-->
  └── docs/
      ├── 1_Introduction.md        # <index>_<CamelName>.md, title \"Introduction\"
      ├── 2_GettingStarted/        # Title \"Getting started\"
      │   ├── 1_Install.md
      │   └── images/              # Never part of a TOC
      └── legacy/                  # Left out of the Hugo projection

Sibling indices must run 1..N without gaps or duplicates.

Run 'docmark gen-config' to generate a documented docmark.toml.")]
#[command(version)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug details to stderr (overrides DOCMARK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand every directive in place
    Generate,
    /// Check that every directive is up to date without writing
    Validate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Project the documentation root into a Hugo content tree
    Hugo {
        /// Output directory (defaults to hugo.output from docmark.toml)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock docmark.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DOCMARK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate => {
            let (report, project_root) = run(&cli.root, Goal::Generate)?;
            output::print_process_report(&report, &project_root);
            if !report.is_ok() {
                std::process::exit(1);
            }
        }
        Command::Validate { json } => {
            let (report, project_root) = run(&cli.root, Goal::Validate)?;
            if json {
                println!("{}", output::format_json_report(&report)?);
            } else {
                output::print_process_report(&report, &project_root);
            }
            if !report.is_ok() {
                std::process::exit(1);
            }
        }
        Command::Hugo { output: target } => {
            let config = config::load_config(&cli.root)?;
            let tree = scan::scan(&cli.root, &config)?;
            let project_root = tree.path(tree.root()).to_path_buf();
            let target = target.unwrap_or_else(|| PathBuf::from(&config.hugo.output));
            let target = if target.is_absolute() {
                target
            } else {
                project_root.join(target)
            };
            let site = hugo::project(&tree, &config, &target)?;
            hugo::write_site(&site)?;
            output::print_hugo_output(&site, &project_root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config, scan the project and run one goal over it. Also returns the
/// absolute project root for display.
fn run(
    root: &Path,
    goal: Goal,
) -> Result<(process::ProcessReport, PathBuf), Box<dyn std::error::Error>> {
    let config = config::load_config(root)?;
    let tree = scan::scan(root, &config)?;
    let report = process::process(&tree, &config, goal)?;
    Ok((report, tree.path(tree.root()).to_path_buf()))
}
