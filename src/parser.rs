use crate::error::{ConfitError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Reserved section carrying cross-cutting directives.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Directive key in [DEFAULT] naming the inheritance chain.
pub const EXTENDS_KEY: &str = "extends";

/// Raw, pre-coercion text of one key.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
	/// A single-line value.
	Single(String),
	/// A multi-line value, one element per physical line, in source order.
	Lines(Vec<String>),
}

/// Raw section map: section name -> key -> raw text.
pub type SectionMap = BTreeMap<String, BTreeMap<String, RawValue>>;

/// Read and parse one source file.
pub fn parse_source_file(path: &Path) -> Result<SectionMap> {
	let content = std::fs::read_to_string(path).map_err(|source| ConfitError::SourceRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_source_str(&content, &path.display().to_string())
}

/// Parse one source from text.
///
/// Grammar, line by line:
/// - `[section]` headers open a new section;
/// - `key = value` assigns within the current section;
/// - indented non-blank lines continue the previous assignment, each line
///   becoming one element of an ordered multi-line value;
/// - blank lines and unindented `#`/`;` comment lines are skipped.
///
/// Anything else, including content before the first section header, is a
/// parse error carrying the origin and line number.
pub fn parse_source_str(content: &str, origin: &str) -> Result<SectionMap> {
	let mut sections = SectionMap::new();
	let mut current_section: Option<String> = None;
	let mut current_key: Option<String> = None;

	for (idx, line) in content.lines().enumerate() {
		let lineno = idx + 1;

		if line.trim().is_empty() {
			continue;
		}
		if line.starts_with('#') || line.starts_with(';') {
			continue;
		}

		if line.starts_with(char::is_whitespace) {
			// Continuation of the previous assignment
			let (Some(section), Some(key)) = (&current_section, &current_key) else {
				return Err(parse_error(
					origin,
					lineno,
					"continuation line without a preceding assignment",
				));
			};
			let entry = sections
				.get_mut(section)
				.and_then(|keys| keys.get_mut(key))
				.ok_or_else(|| {
					parse_error(origin, lineno, "continuation line without a preceding assignment")
				})?;
			push_continuation(entry, line.trim().to_string());
			continue;
		}

		if let Some(rest) = line.strip_prefix('[') {
			let name = parse_section_header(rest)
				.ok_or_else(|| parse_error(origin, lineno, "malformed section header"))?;
			sections.entry(name.to_string()).or_default();
			current_section = Some(name.to_string());
			current_key = None;
			continue;
		}

		if let Some((key, value)) = line.split_once('=') {
			let key = key.trim();
			if key.is_empty() {
				return Err(parse_error(origin, lineno, "assignment with an empty key"));
			}
			let Some(section) = &current_section else {
				return Err(parse_error(
					origin,
					lineno,
					"assignment before any section header",
				));
			};
			sections
				.get_mut(section)
				.ok_or_else(|| parse_error(origin, lineno, "assignment before any section header"))?
				.insert(key.to_string(), RawValue::Single(value.trim().to_string()));
			current_key = Some(key.to_string());
			continue;
		}

		return Err(parse_error(
			origin,
			lineno,
			"expected a section header or a `key = value` assignment",
		));
	}

	Ok(sections)
}

/// Extract the section name from the text following `[`.
///
/// Only trailing whitespace is allowed after the closing bracket.
fn parse_section_header(rest: &str) -> Option<&str> {
	let (name, trailer) = rest.split_once(']')?;
	if name.is_empty() || !trailer.trim().is_empty() {
		return None;
	}
	Some(name)
}

/// Append one continuation line to an existing raw entry.
///
/// A `Single` entry promotes to `Lines`; an empty primary line is dropped so
/// `key =` followed by indented lines yields exactly the indented items.
fn push_continuation(entry: &mut RawValue, line: String) {
	match entry {
		RawValue::Single(first) => {
			let mut lines = Vec::new();
			if !first.is_empty() {
				lines.push(std::mem::take(first));
			}
			lines.push(line);
			*entry = RawValue::Lines(lines);
		}
		RawValue::Lines(lines) => lines.push(line),
	}
}

fn parse_error(origin: &str, line: usize, reason: &str) -> ConfitError {
	ConfitError::Parse {
		origin: origin.to_string(),
		line,
		reason: reason.to_string(),
	}
}
