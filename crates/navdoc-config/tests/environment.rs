#![allow(clippy::expect_used, reason = "Fine in tests")]
//! Behaviour that depends on process-wide state. Kept to a single test so
//! nothing else in this binary observes the changed working directory or
//! environment.
use std::{env, fs, path::PathBuf};

use navdoc_config::{Config, config::ROOT_ENV_VAR};
use tempfile::TempDir;

#[test]
fn discovery_and_root_fallback_follow_the_process_environment() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let previous_dir = env::current_dir().expect("Failed to read working dir");
  env::set_current_dir(dir.path()).expect("Failed to change working dir");

  // Nothing to discover yet
  assert_eq!(Config::find_config_file(), None);
  assert_eq!(
    Config::load(&[], &[]).expect("Failed to load defaults"),
    Config::default()
  );

  fs::write(".navdoc.toml", "fallback_header = \"<h1>Hidden</h1>\"\n")
    .expect("Failed to write config");
  fs::write("navdoc.json", r#"{"nav": false}"#).expect("Failed to write");
  let config = Config::load(&[], &["jobs=3".to_string()])
    .expect("Failed to load discovered config");
  assert_eq!(config.fallback_header, "<h1>Hidden</h1>");
  assert!(config.nav);
  assert_eq!(config.jobs, Some(3));

  // SAFETY: this is the only test in this binary, so no other thread reads
  // or writes the environment concurrently.
  unsafe { env::set_var(ROOT_ENV_VAR, "/usr/local/go") };
  assert_eq!(config.root_dir(), Some(PathBuf::from("/usr/local/go")));

  // SAFETY: see above.
  unsafe { env::set_var(ROOT_ENV_VAR, "") };
  assert_eq!(config.root_dir(), None);

  // SAFETY: see above.
  unsafe { env::remove_var(ROOT_ENV_VAR) };
  assert_eq!(config.root_dir(), None);

  env::set_current_dir(previous_dir).expect("Failed to restore working dir");
}
