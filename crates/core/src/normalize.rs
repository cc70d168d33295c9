//! Reply classification and trace formatting.
//!
//! Traces are re-indented for display with a small markup tokenizer rather
//! than a full XML parser: the input is whatever the wire layer captured, and
//! malformed fragments must come back readable instead of failing.

use std::sync::LazyLock;

use amt_protocol::{Reply, ResponseTrace};
use regex_lite::Regex;

use crate::error::{CallError, CallResult};

/// Comments, CDATA sections, complete tags, a trailing unterminated tag, and
/// runs of text, in that priority.
static TOKEN_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<[^>]*>|<[^>]*$|[^<]+").unwrap());

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
	Open(&'a str),
	Close(&'a str),
	/// Self-closing element, comment, declaration or doctype.
	Empty(&'a str),
	Text(&'a str),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
	TOKEN_RE
		.find_iter(input)
		.filter_map(|m| {
			let raw = m.as_str();
			if !raw.starts_with('<') {
				let text = raw.trim();
				return (!text.is_empty()).then_some(Token::Text(text));
			}
			let token = if raw.starts_with("<![CDATA[") || !raw.ends_with('>') {
				Token::Text(raw.trim())
			} else if raw.starts_with("<!") || raw.starts_with("<?") || raw.ends_with("/>") {
				Token::Empty(raw)
			} else if raw.starts_with("</") {
				Token::Close(raw)
			} else {
				Token::Open(raw)
			};
			Some(token)
		})
		.collect()
}

/// Re-indents markup two spaces per level.
///
/// Leading whitespace is trimmed once; input that then does not start with
/// `<` is returned as-is. Elements holding only text (or nothing) stay on one
/// line. Applying it to its own output changes nothing.
pub fn pretty_xml(input: &str) -> String {
	let input = input.trim_start();
	if !input.starts_with('<') {
		return input.to_string();
	}

	let tokens = tokenize(input);
	let mut lines: Vec<String> = Vec::with_capacity(tokens.len());
	let mut depth = 0usize;
	let mut i = 0;

	while i < tokens.len() {
		let pad = INDENT.repeat(depth);
		match tokens[i] {
			Token::Open(open) => match (tokens.get(i + 1), tokens.get(i + 2)) {
				(Some(Token::Text(text)), Some(Token::Close(close))) => {
					lines.push(format!("{pad}{open}{text}{close}"));
					i += 3;
					continue;
				}
				(Some(Token::Close(close)), _) => {
					lines.push(format!("{pad}{open}{close}"));
					i += 2;
					continue;
				}
				_ => {
					lines.push(format!("{pad}{open}"));
					depth += 1;
				}
			},
			Token::Close(close) => {
				depth = depth.saturating_sub(1);
				lines.push(format!("{}{close}", INDENT.repeat(depth)));
			}
			Token::Empty(raw) | Token::Text(raw) => lines.push(format!("{pad}{raw}")),
		}
		i += 1;
	}

	lines.join("\n")
}

/// Formats both sides of a trace.
pub fn normalize(trace: ResponseTrace) -> ResponseTrace {
	ResponseTrace {
		request_xml: pretty_xml(&trace.request_xml),
		response_xml: pretty_xml(&trace.response_xml),
	}
}

/// Turns a raw reply into exactly one outcome.
pub fn classify(call: &str, reply: Reply) -> CallResult {
	match (reply.trace, reply.fault) {
		(Some(trace), None) => Ok(normalize(trace)),
		(None, Some(fault)) => Err(CallError::OperationFailed {
			call: call.to_string(),
			source: fault,
		}),
		(None, None) => Err(CallError::NoResult { call: call.to_string() }),
		(Some(trace), Some(fault)) => Err(CallError::AmbiguousResult {
			call: call.to_string(),
			fault,
			trace: normalize(trace),
		}),
	}
}

#[cfg(test)]
mod tests {
	use amt_protocol::Fault;

	use super::*;

	const ENVELOPE: &str = r#"<?xml version="1.0" encoding="UTF-8"?><a:Envelope xmlns:a="http://www.w3.org/2003/05/soap-envelope"><a:Header><b:To>/wsman</b:To><b:Action>http://schemas.xmlsoap.org/ws/2004/09/transfer/Get</b:Action></a:Header><a:Body/></a:Envelope>"#;

	#[test]
	fn indents_nested_elements() {
		let expected = [
			r#"<?xml version="1.0" encoding="UTF-8"?>"#,
			r#"<a:Envelope xmlns:a="http://www.w3.org/2003/05/soap-envelope">"#,
			"  <a:Header>",
			"    <b:To>/wsman</b:To>",
			"    <b:Action>http://schemas.xmlsoap.org/ws/2004/09/transfer/Get</b:Action>",
			"  </a:Header>",
			"  <a:Body/>",
			"</a:Envelope>",
		]
		.join("\n");
		assert_eq!(pretty_xml(ENVELOPE), expected);
	}

	#[test]
	fn formatting_is_idempotent() {
		let samples = [
			ENVELOPE,
			"<Req/>",
			"  \n\t<a>\n  <b> text </b>\n<c></c><!-- note --></a>",
			"<a>x<b/>y</a>",
			"<a><![CDATA[ <raw> ]]></a>",
			"<a><b>unterminated",
			"</a><b>",
			"not markup",
			"",
		];
		for sample in samples {
			let once = pretty_xml(sample);
			assert_eq!(pretty_xml(&once), once, "sample: {sample:?}");
		}
	}

	#[test]
	fn leading_whitespace_trimmed_once() {
		assert_eq!(pretty_xml("\n   <Resp/>"), "<Resp/>");
		assert_eq!(pretty_xml("   plain text  "), "plain text  ");
	}

	#[test]
	fn stub_traces_unchanged() {
		assert_eq!(pretty_xml("<Req/>"), "<Req/>");
		assert_eq!(pretty_xml("<Resp/>"), "<Resp/>");
	}

	#[test]
	fn mixed_content_and_comments() {
		assert_eq!(pretty_xml("<a>x<b/>y</a>"), "<a>\n  x\n  <b/>\n  y\n</a>");
		assert_eq!(pretty_xml("<a><!-- c --></a>"), "<a>\n  <!-- c -->\n</a>");
		assert_eq!(pretty_xml("<a><b></b></a>"), "<a>\n  <b></b>\n</a>");
	}

	#[test]
	fn unbalanced_close_does_not_underflow() {
		assert_eq!(pretty_xml("</a></b><c/>"), "</a>\n</b>\n<c/>");
	}

	#[test]
	fn classify_ok_normalizes() {
		let reply = Reply::ok(ResponseTrace::new("  <Req/>", "<a><b>1</b></a>"));
		let trace = classify("AMTGeneralSettings", reply).unwrap();
		assert_eq!(trace.request_xml, "<Req/>");
		assert_eq!(trace.response_xml, "<a>\n  <b>1</b>\n</a>");
	}

	#[test]
	fn classify_fault_wraps_exact_error() {
		let fault = Fault::new("wsman:AccessDenied", "The sender was not authorized").with_detail("<Detail/>");
		let err = classify("AMTGeneralSettings", Reply::fault(fault.clone())).unwrap_err();
		match err {
			CallError::OperationFailed { call, source } => {
				assert_eq!(call, "AMTGeneralSettings");
				assert_eq!(source, fault);
			}
			other => panic!("Expected OperationFailed, got: {other:?}"),
		}
	}

	#[test]
	fn classify_empty_is_no_result() {
		let err = classify("CIMChassis", Reply::empty()).unwrap_err();
		assert!(matches!(err, CallError::NoResult { ref call } if call == "CIMChassis"));
	}

	#[test]
	fn classify_both_is_ambiguous() {
		let reply = Reply {
			trace: Some(ResponseTrace::new("<Req/>", "<Resp/>")),
			fault: Some(Fault::new("HTTP 500", "Internal Server Error")),
		};
		let err = classify("CIMChassis", reply).unwrap_err();
		match err {
			CallError::AmbiguousResult { fault, trace, .. } => {
				assert_eq!(fault.code, "HTTP 500");
				assert_eq!(trace.response_xml, "<Resp/>");
			}
			other => panic!("Expected AmbiguousResult, got: {other:?}"),
		}
	}
}
