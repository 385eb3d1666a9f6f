use std::{
  env,
  ffi::OsString,
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable consulted when no documentation root is configured.
pub const ROOT_ENV_VAR: &str = "GOROOT";

/// Config file names picked up from the working directory, most preferred
/// first.
pub const CONFIG_FILE_NAMES: [&str; 4] =
  ["navdoc.toml", ".navdoc.toml", "navdoc.json", ".navdoc.json"];

/// Configuration for the navdoc viewer.
///
/// [`Config`] controls where documentation is looked up, which page template
/// is used and how navigation is rendered. Fields are loaded from a TOML or
/// JSON config file and can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root directory of the documentation tree. Falls back to `$GOROOT`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub root_dir: Option<PathBuf>,

  /// Path to a custom page template.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template_path: Option<PathBuf>,

  /// Header used when neither the caller nor the document provides one.
  pub fallback_header: String,

  /// Whether to render the navigation fragment.
  pub nav: bool,

  /// File names (matched case-insensitively) rendered without navigation.
  pub no_nav_pages: Vec<String>,

  /// Number of threads to use when rendering several documents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      root_dir:        None,
      template_path:   None,
      fallback_header: String::new(),
      nav:             true,
      no_nav_pages:    vec!["docs.html".to_string()],
      jobs:            None,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .as_deref()
    {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// Files are merged in order, later files taking precedence.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }
      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's entries are appended, skipping duplicates
  /// - Plain fields: Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    if other.root_dir.is_some() {
      self.root_dir = other.root_dir;
    }
    if other.template_path.is_some() {
      self.template_path = other.template_path;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }
    self.fallback_header = other.fallback_header;
    self.nav = other.nav;
    for page in other.no_nav_pages {
      if !self.no_nav_pages.contains(&page) {
        self.no_nav_pages.push(page);
      }
    }
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` format, names an
  /// unknown key, or carries a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Empty values reset optional fields to [`None`].
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let optional_path =
      |value: &str| (!value.is_empty()).then(|| PathBuf::from(value));

    match key {
      "root_dir" => self.root_dir = optional_path(value),
      "template_path" => self.template_path = optional_path(value),
      "fallback_header" => self.fallback_header = value.to_string(),
      "nav" => {
        self.nav = value.parse().map_err(|_| {
          ConfigError::Config(format!(
            "Invalid boolean for 'nav': '{value}'"
          ))
        })?;
      },
      "no_nav_pages" => {
        self.no_nav_pages = value
          .split(',')
          .map(str::trim)
          .filter(|page| !page.is_empty())
          .map(str::to_string)
          .collect();
      },
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|_| {
            ConfigError::Config(format!(
              "Invalid number for 'jobs': '{value}'"
            ))
          })?)
        };
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    log::debug!("Applied config override: {key}={value}");
    Ok(())
  }

  /// Documentation root: the configured directory, else `$GOROOT`.
  #[must_use]
  pub fn root_dir(&self) -> Option<PathBuf> {
    self.root_dir_or(env::var_os(ROOT_ENV_VAR))
  }

  /// Configured root, else `env_root` unless it is empty.
  fn root_dir_or(&self, env_root: Option<OsString>) -> Option<PathBuf> {
    self
      .root_dir
      .clone()
      .or_else(|| env_root.filter(|root| !root.is_empty()).map(PathBuf::from))
  }

  /// Whether a page with this file name is rendered with navigation.
  #[must_use]
  pub fn nav_for(&self, file_name: &str) -> bool {
    self.nav
      && !self
        .no_nav_pages
        .iter()
        .any(|page| page.eq_ignore_ascii_case(file_name))
  }

  /// Search for config files in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    Self::find_config_file_in(&env::current_dir().ok()?)
  }

  /// Search `dir` for config files, in order of preference.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Write the default configuration in `format` (`toml` or `json`).
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let defaults = Self::default();
    let content = match format {
      "toml" => toml::to_string_pretty(&defaults)?,
      "json" => serde_json::to_string_pretty(&defaults)?,
      other => {
        return Err(ConfigError::Config(format!(
          "Unsupported config format: {other}"
        )));
      },
    };

    fs::write(path, content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization.
  ///
  /// Existing files are skipped unless `force` is set.
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to create template directory: {}: {}",
        output_dir.display(),
        e
      ))
    })?;

    let mut templates: Vec<_> =
      navdoc_templates::all_templates().into_iter().collect();
    templates.sort_unstable_by_key(|(name, _)| *name);

    for (filename, content) in templates {
      let target = output_dir.join(filename);
      if target.exists() && !force {
        log::warn!(
          "Skipping existing template {} (use --force to overwrite)",
          target.display()
        );
        continue;
      }
      fs::write(&target, content)?;
      log::info!("Exported template: {}", target.display());
    }

    Ok(())
  }
}
