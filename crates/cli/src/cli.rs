use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::output::OutputFormat;
use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "amtx")]
#[command(about = "Explore Intel AMT endpoints by operation name")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default), json, or ndjson
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Config file (defaults to $XDG_CONFIG_HOME/amtx/config.json)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// List the logical call names accepted by `exec`
	Calls,

	/// Describe catalog operations for one resource class, or all of them
	Classes {
		/// Wire class name, e.g. AMT_GeneralSettings
		class: Option<String>,
	},

	/// Run a logical call against an endpoint
	Exec {
		/// Endpoint GUID
		guid: String,

		/// Logical call name, e.g. AMTGeneralSettings
		call: String,

		#[command(flatten)]
		endpoint: EndpointArgs,
	},

	/// Run a class method against an endpoint
	Invoke {
		/// Endpoint GUID
		guid: String,

		/// Wire class name, e.g. AMT_MessageLog
		class: String,

		/// Method name, e.g. PositionToFirstRecord
		method: String,

		#[command(flatten)]
		endpoint: EndpointArgs,
	},
}

/// Where the endpoint comes from and how to reach it.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
	/// Optional string parameter (selector, enumeration context, record index)
	#[arg(short, long)]
	pub param: Option<String>,

	/// Tenant that owns the endpoint
	#[arg(short, long, default_value = "")]
	pub tenant: String,

	/// JSON inventory of endpoint records
	#[arg(short, long, value_name = "FILE")]
	pub inventory: PathBuf,

	/// Directory of recorded traces to replay
	#[arg(short, long, value_name = "DIR")]
	pub replay: PathBuf,

	/// Remote call timeout in milliseconds (0 disables)
	#[arg(long, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Idle time before a cached session is closed, in milliseconds
	#[arg(long, value_name = "MS")]
	pub idle_ttl_ms: Option<u64>,
}

impl EndpointArgs {
	pub fn overrides(&self) -> Overrides {
		Overrides {
			idle_ttl_ms: self.idle_ttl_ms,
			call_timeout_ms: self.timeout_ms,
		}
	}
}
