//! Command implementations.

pub mod catalog;
pub mod exec;

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, TextRender, print_result};

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let started = Instant::now();
	info!(target = "amt.cli", command = ?cli.command, "running command");

	match cli.command {
		Commands::Calls => emit_success("calls", catalog::calls(), started, format),
		Commands::Classes { class } => emit_success("classes", catalog::classes(class.as_deref())?, started, format),
		Commands::Exec { guid, call, endpoint } => {
			let data = exec::run(cli.config.as_deref(), &guid, exec::Target::Call(&call), &endpoint).await?;
			emit_success("exec", data, started, format);
		}
		Commands::Invoke {
			guid,
			class,
			method,
			endpoint,
		} => {
			let target = exec::Target::ClassMethod {
				class: &class,
				method: &method,
			};
			let data = exec::run(cli.config.as_deref(), &guid, target, &endpoint).await?;
			emit_success("invoke", data, started, format);
		}
	}
	Ok(())
}

/// Print a success envelope in the given format.
pub fn emit_success<T: Serialize + TextRender>(command: &'static str, data: T, started: Instant, format: OutputFormat) {
	let result = ResultBuilder::new(command).data(data).timings(started.elapsed()).build();
	print_result(&result, format);
}
