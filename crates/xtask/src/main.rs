use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "navdoc";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate shell completions and the manpage for navdoc
  Dist {
    /// Directory receiving `completions/` and `man/`.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Skip the manpage.
    #[arg(long, conflicts_with = "no_completions")]
    no_manpage: bool,

    /// Skip shell completions.
    #[arg(long, conflicts_with = "no_manpage")]
    no_completions: bool,
  },
}

fn main() -> Result<()> {
  let Commands::Dist {
    output_dir,
    no_manpage,
    no_completions,
  } = Xtask::parse().command;

  let cmd = navdoc::cli::Cli::command().name(BIN_NAME);
  if !no_completions {
    write_completions(cmd.clone(), &output_dir.join("completions"))?;
  }
  if !no_manpage {
    write_manpage(cmd, &output_dir.join("man"))?;
  }
  Ok(())
}

fn write_completions(mut cmd: Command, dir: &Path) -> Result<()> {
  fs::create_dir_all(dir)
    .with_context(|| format!("Failed to create {}", dir.display()))?;
  for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
    let path = generate_to(shell, &mut cmd, BIN_NAME, dir)
      .with_context(|| format!("Failed to write {shell} completions"))?;
    eprintln!("wrote {}", path.display());
  }
  Ok(())
}

fn write_manpage(cmd: Command, dir: &Path) -> Result<()> {
  fs::create_dir_all(dir)
    .with_context(|| format!("Failed to create {}", dir.display()))?;
  let path = dir.join(format!("{BIN_NAME}.1"));
  let mut file = fs::File::create(&path)
    .with_context(|| format!("Failed to create {}", path.display()))?;
  Man::new(cmd)
    .render(&mut file)
    .context("Failed to render manpage")?;
  eprintln!("wrote {}", path.display());
  Ok(())
}
