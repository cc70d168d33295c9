use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Maps `-v` count to a default filter; `RUST_LOG` wins when set.
pub fn filter_for(verbosity: u8) -> &'static str {
	// 0 = errors only, session chatter off
	// 1 (-v) = info for the CLI and dispatcher, warn for sessions
	// 2+ (-vv) = debug everywhere
	match verbosity {
		0 => "error,amt_runtime=off",
		1 => "info,amt_runtime=warn",
		_ => "debug",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filters_parse() {
		for verbosity in 0..=3 {
			assert!(EnvFilter::try_new(filter_for(verbosity)).is_ok(), "verbosity {verbosity}");
		}
	}
}
