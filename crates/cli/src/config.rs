//! CLI configuration file.
//!
//! `$XDG_CONFIG_HOME/amtx/config.json` (or the platform config dir) holds an
//! [`ExplorerConfig`]. A missing default file is not an error; a missing
//! `--config` file is.

use std::fs;
use std::path::{Path, PathBuf};

use amt::ExplorerConfig;

use crate::error::{CliError, Result};

/// Default config location.
pub fn default_config_path() -> PathBuf {
	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(dirs::config_dir)
		.unwrap_or_else(|| PathBuf::from("."));
	config_home.join("amtx").join("config.json")
}

/// Loads the explorer config from `explicit` or the default location.
pub fn load(explicit: Option<&Path>) -> Result<ExplorerConfig> {
	match explicit {
		Some(path) => read(path),
		None => {
			let path = default_config_path();
			if path.exists() {
				read(&path)
			} else {
				Ok(ExplorerConfig::default())
			}
		}
	}
}

fn read(path: &Path) -> Result<ExplorerConfig> {
	let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})
}

/// Flag overrides applied on top of the loaded file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
	pub idle_ttl_ms: Option<u64>,
	pub call_timeout_ms: Option<u64>,
}

impl Overrides {
	pub fn apply(self, mut config: ExplorerConfig) -> ExplorerConfig {
		if let Some(ms) = self.idle_ttl_ms {
			config.idle_ttl_ms = ms;
		}
		if let Some(ms) = self.call_timeout_ms {
			config.call_timeout_ms = ms;
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_file_is_loaded() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, r#"{"callTimeoutMs": 250}"#).unwrap();

		let config = load(Some(&path)).unwrap();
		assert_eq!(config.call_timeout_ms, 250);
		assert_eq!(config.idle_ttl_ms, ExplorerConfig::default().idle_ttl_ms);
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = load(Some(&dir.path().join("absent.json"))).unwrap_err();
		assert!(matches!(err, CliError::ConfigRead { .. }), "got: {err:?}");
	}

	#[test]
	fn malformed_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, "idleTtlMs = 5").unwrap();

		let err = load(Some(&path)).unwrap_err();
		assert!(matches!(err, CliError::ConfigParse { .. }), "got: {err:?}");
	}

	#[test]
	fn overrides_win() {
		let overrides = Overrides {
			idle_ttl_ms: Some(10),
			call_timeout_ms: None,
		};
		let config = overrides.apply(ExplorerConfig::default());
		assert_eq!(config.idle_ttl_ms, 10);
		assert_eq!(config.call_timeout_ms, ExplorerConfig::default().call_timeout_ms);
	}
}
