use std::io::{self, Write};

use amt::{Catalog, ResourceClass};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::output::{TextRender, heading};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsData {
	pub count: usize,
	pub calls: Vec<&'static str>,
}

impl TextRender for CallsData {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		for call in &self.calls {
			writeln!(out, "{call}")?;
		}
		Ok(())
	}
}

pub fn calls() -> CallsData {
	let calls = Catalog::builtin().call_names().to_vec();
	CallsData {
		count: calls.len(),
		calls,
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
	pub class: &'static str,
	pub method: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub call_name: Option<&'static str>,
	pub takes_parameter: bool,
	pub resource_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassesData {
	pub count: usize,
	pub operations: Vec<OperationInfo>,
}

impl TextRender for ClassesData {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		let mut current = None;
		for op in &self.operations {
			if current != Some(op.class) {
				heading(out, op.class)?;
				current = Some(op.class);
			}
			let param = if op.takes_parameter { " [param]" } else { "" };
			match op.call_name {
				Some(call) => writeln!(out, "  {}{param}  ({call})", op.method)?,
				None => writeln!(out, "  {}{param}", op.method)?,
			}
		}
		Ok(())
	}
}

/// Operations for `class`, or the whole catalog when absent.
pub fn classes(class: Option<&str>) -> Result<ClassesData> {
	let catalog = Catalog::builtin();
	let wanted = class.unwrap_or_default();
	if !wanted.trim().is_empty() && ResourceClass::from_class_name(wanted.trim()).is_none() {
		return Err(CliError::UnknownClass(wanted.to_string()));
	}

	let operations: Vec<OperationInfo> = catalog
		.describe(wanted)
		.into_iter()
		.map(|op| OperationInfo {
			class: op.class().class_name(),
			method: op.method().as_str(),
			call_name: op.call_name(),
			takes_parameter: op.takes_parameter(),
			resource_uri: op.class().resource_uri(),
		})
		.collect();

	Ok(ClassesData {
		count: operations.len(),
		operations,
	})
}
