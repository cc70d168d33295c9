//! Explorer tuning knobs.

use std::time::Duration;

use amt_runtime::RegistryConfig;
use serde::{Deserialize, Serialize};

/// Session and call limits, loadable from JSON (camelCase keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerConfig {
	/// Idle time after which a cached session is evicted.
	pub idle_ttl_ms: u64,
	/// Upper bound on one remote call; `0` disables the limit.
	pub call_timeout_ms: u64,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			idle_ttl_ms: 5 * 60 * 1000,
			call_timeout_ms: 30 * 1000,
		}
	}
}

impl ExplorerConfig {
	pub fn idle_ttl(&self) -> Duration {
		Duration::from_millis(self.idle_ttl_ms)
	}

	pub fn call_timeout(&self) -> Option<Duration> {
		(self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
	}

	pub fn registry_config(&self) -> RegistryConfig {
		RegistryConfig::default().with_idle_ttl(self.idle_ttl())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_registry_default() {
		let config = ExplorerConfig::default();
		assert_eq!(config.idle_ttl(), amt_runtime::DEFAULT_IDLE_TTL);
		assert_eq!(config.call_timeout(), Some(Duration::from_secs(30)));
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config: ExplorerConfig = serde_json::from_str(r#"{"idleTtlMs": 10}"#).unwrap();
		assert_eq!(config.idle_ttl(), Duration::from_millis(10));
		assert_eq!(config.call_timeout_ms, 30_000);
	}

	#[test]
	fn zero_timeout_disables_limit() {
		let config = ExplorerConfig {
			call_timeout_ms: 0,
			..Default::default()
		};
		assert_eq!(config.call_timeout(), None);
	}
}
