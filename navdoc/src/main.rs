use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail, eyre};
use log::{LevelFilter, info, warn};
use navdoc::{
  cli::{Cli, Commands},
  lookup::LookupOutput,
  page::PageOptions,
  render::{Renderer, read_document, write_page},
  resolve::{DocContext, DocTarget},
};
use navdoc_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let load_config = || {
    Config::load(&cli.config_files, &cli.config_overrides)
      .wrap_err("Failed to load configuration")
  };

  match &cli.command {
    Commands::Render {
      inputs,
      output,
      header,
      no_nav,
      template,
      jobs,
    } => {
      let mut config = load_config()?;
      if let Some(template) = template {
        config.template_path = Some(template.clone());
      }
      if jobs.is_some() {
        config.jobs = *jobs;
      }
      render(&config, inputs, output.as_deref(), header.as_deref(), *no_nav)
    },

    Commands::Nav { input } => {
      let config = load_config()?;
      let renderer = Renderer::from_config(&config)?;
      let html = read_document(input_or_stdin(input.as_deref()))?;
      let nav = renderer.transform(&html).nav();
      writeln!(io::stdout().lock(), "{nav}")?;
      Ok(())
    },

    Commands::Open {
      request,
      root,
      output,
      template,
      launch,
    } => {
      let mut config = load_config()?;
      if let Some(root) = root {
        config.root_dir = Some(root.clone());
      }
      if let Some(template) = template {
        config.template_path = Some(template.clone());
      }
      open(&config, request, output.as_deref(), *launch)
    },

    Commands::Lookup { input, json } => {
      let raw = read_document(input_or_stdin(input.as_deref()))?;
      let parsed = LookupOutput::parse(&raw);
      let mut stdout = io::stdout().lock();
      if *json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&parsed)?)?;
      } else {
        if parsed == LookupOutput::Unrecognized {
          warn!("Lookup output was not recognized");
        }
        for entry in parsed.display_entries() {
          writeln!(stdout, "{entry}")?;
        }
      }
      Ok(())
    },

    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      // Create parent directories if needed
      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;
      Ok(())
    },

    Commands::ExportTemplates { output_dir, force } => {
      Config::export_templates(output_dir, *force).wrap_err_with(|| {
        format!("Failed to export templates to {}", output_dir.display())
      })
    },
  }
}

fn input_or_stdin(input: Option<&Path>) -> &Path {
  input.unwrap_or_else(|| Path::new("-"))
}

fn write_stylesheet_next_to(renderer: &Renderer, page: &Path) -> Result<()> {
  let dir = page.parent().unwrap_or_else(|| Path::new(""));
  if let Some(stylesheet) = renderer.write_stylesheet(dir)? {
    info!("Wrote {}", stylesheet.display());
  }
  Ok(())
}

/// Render one document to a file or stdout, or several into a directory.
fn render(
  config: &Config,
  inputs: &[PathBuf],
  output: Option<&Path>,
  header: Option<&str>,
  no_nav: bool,
) -> Result<()> {
  let renderer = Renderer::from_config(config)?;
  let options_for = |input: &Path| {
    let file_name = input
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or_default();
    PageOptions {
      header: header.map(str::to_string),
      nav:    !no_nav && config.nav_for(file_name),
    }
  };

  match inputs {
    [] | [_] => {
      let input = input_or_stdin(inputs.first().map(PathBuf::as_path));
      let options = options_for(input);
      match output {
        Some(output) => {
          renderer.render_file(input, output, &options)?;
          write_stylesheet_next_to(&renderer, output)?;
        },
        None => {
          let page = renderer.render_document(&read_document(input)?, &options);
          io::stdout().lock().write_all(page.as_bytes())?;
        },
      }
    },
    _ => {
      let Some(output_dir) = output else {
        bail!("Rendering several inputs requires --output <DIR>");
      };

      let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
      rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build_global()?;

      let written = renderer.render_batch(inputs, output_dir, options_for)?;
      info!(
        "Rendered {} documents into {}",
        written.len(),
        output_dir.display()
      );
    },
  }

  Ok(())
}

/// Resolve a request and render it when it is a page. Other targets are
/// printed for the caller to act on, or launched when `launch` is set.
fn open(
  config: &Config,
  request: &str,
  output: Option<&Path>,
  launch: bool,
) -> Result<()> {
  let root = config.root_dir().ok_or_else(|| {
    eyre!("No documentation root: pass --root, set root_dir or GOROOT")
  })?;
  let context =
    DocContext::new(root).with_no_nav_pages(config.no_nav_pages.clone());
  let target = context.resolve(request);
  info!("{request} resolved to {target}");

  match &target {
    DocTarget::Page { path, .. } => {
      let renderer = Renderer::from_config(config)?;
      let options = PageOptions {
        header: None,
        nav:    target.nav() && config.nav,
      };
      let page = renderer.render_document(&read_document(path)?, &options);
      match output {
        Some(output) => {
          write_page(output, &page)?;
          write_stylesheet_next_to(&renderer, output)?;
        },
        None => io::stdout().lock().write_all(page.as_bytes())?,
      }
    },
    DocTarget::Package(_) | DocTarget::Listing { .. } => {
      if let Some(header) = target.header() {
        info!(
          "Generate the HTML with the documentation tool and pipe it to \
           `navdoc render --header \"{header}\"`"
        );
      }
      writeln!(io::stdout().lock(), "{target}")?;
    },
    DocTarget::Unsupported(path) => {
      warn!("No viewer for {}", path.display());
      writeln!(io::stdout().lock(), "{target}")?;
    },
    DocTarget::External(url) if launch => {
      open::that(url).wrap_err_with(|| format!("Failed to open {url}"))?;
    },
    DocTarget::Document(path) if launch => {
      open::that(path)
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    },
    DocTarget::External(_)
    | DocTarget::Source { .. }
    | DocTarget::Document(_) => {
      writeln!(io::stdout().lock(), "{target}")?;
    },
  }

  Ok(())
}
