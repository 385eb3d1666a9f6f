use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for navdoc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "navdoc: navigable pages from generated Go documentation"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the navdoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Transform generated HTML documentation into navigable pages.
  Render {
    /// Input documents. `-` or no input reads from stdin.
    inputs: Vec<PathBuf>,

    /// Output file, or output directory when several inputs are given.
    /// Defaults to stdout for a single input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Header markup used instead of the one taken from the document.
    #[arg(short = 'H', long)]
    header: Option<String>,

    /// Render pages without the navigation fragment.
    #[arg(long)]
    no_nav: bool,

    /// Path to a custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Number of threads to use when rendering several inputs.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Print only the navigation fragment of a document.
  Nav {
    /// Input document. `-` or no input reads from stdin.
    input: Option<PathBuf>,
  },

  /// Resolve a documentation link against the documentation root.
  Open {
    /// Link to resolve, such as `/doc/effective_go.html` or `net/http`.
    request: String,

    /// Documentation root. Defaults to the configured root or `$GOROOT`.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Where to write a rendered page. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Hand external URLs and documents to the system viewer.
    #[arg(short, long)]
    launch: bool,
  },

  /// Parse output of the package lookup tool.
  Lookup {
    /// File holding the lookup output. `-` or no input reads from stdin.
    input: Option<PathBuf>,

    /// Print the parsed result as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Initialize a new navdoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "navdoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the embedded page template for customization.
  ExportTemplates {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
