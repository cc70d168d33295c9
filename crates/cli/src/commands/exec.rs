use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use amt::{Dispatcher, MemoryInventory, ResponseTrace};
use serde::Serialize;
use tracing::info;

use crate::cli::EndpointArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::output::{TextRender, heading};
use crate::replay::ReplayFactory;

/// Which namespace the operation is named in.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
	Call(&'a str),
	ClassMethod { class: &'a str, method: &'a str },
}

impl Target<'_> {
	fn label(&self) -> String {
		match self {
			Target::Call(call) => call.to_string(),
			Target::ClassMethod { class, method } => format!("{class}.{method}"),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecData {
	pub guid: String,
	pub operation: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub param: Option<String>,
	#[serde(flatten)]
	pub trace: ResponseTrace,
}

impl TextRender for ExecData {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		heading(out, "request")?;
		writeln!(out, "{}", self.trace.request_xml)?;
		heading(out, "response")?;
		writeln!(out, "{}", self.trace.response_xml)
	}
}

pub async fn run(config_path: Option<&Path>, guid: &str, target: Target<'_>, args: &EndpointArgs) -> Result<ExecData> {
	let config = args.overrides().apply(config::load(config_path)?);
	if !args.replay.is_dir() {
		return Err(CliError::ReplayDir(args.replay.clone()));
	}
	let inventory = Arc::new(MemoryInventory::load(&args.inventory)?);
	info!(
		target = "amt.cli",
		endpoints = inventory.len(),
		inventory = %args.inventory.display(),
		"inventory loaded"
	);

	let dispatcher = Dispatcher::new(Arc::new(ReplayFactory::new(&args.replay)), inventory, &config);
	let param = args.param.as_deref();
	let outcome = match target {
		Target::Call(call) => dispatcher.execute_call(guid, &args.tenant, call, param).await,
		Target::ClassMethod { class, method } => {
			dispatcher
				.execute_class_call(guid, &args.tenant, class, method, param)
				.await
		}
	};
	dispatcher.shutdown().await;

	Ok(ExecData {
		guid: guid.to_string(),
		operation: target.label(),
		param: args.param.clone(),
		trace: outcome?,
	})
}
