use crate::error::{ConfitError, Result};
use crate::parser::{DEFAULT_SECTION, EXTENDS_KEY, RawValue, SectionMap, parse_source_file};
use std::path::PathBuf;

/// Resolve the full inheritance chain of an already-loaded source.
///
/// Parents named by the `[DEFAULT] extends` directive are loaded and resolved
/// depth-first, folded in listed order (a later parent overrides an earlier
/// one), and the source's own sections are overlaid last so the requesting
/// source always wins on any shared key.
///
/// The first unreachable parent aborts the whole resolution; remaining
/// parents are not attempted. `resolving` is the stack of sources currently
/// being resolved, used to reject inheritance cycles.
pub fn resolve_chain(own: SectionMap, resolving: &mut Vec<PathBuf>) -> Result<SectionMap> {
	let mut merged = SectionMap::new();

	for parent in extends_list(&own) {
		let path = PathBuf::from(parent);
		if resolving.contains(&path) {
			return Err(ConfitError::CircularExtends { path });
		}

		let parent_sections = parse_source_file(&path)?;

		resolving.push(path);
		let resolved = resolve_chain(parent_sections, resolving)?;
		resolving.pop();

		merge_into(&mut merged, resolved);
	}

	merge_into(&mut merged, own);
	Ok(merged)
}

/// Parse the `extends` directive into an ordered list of parent identifiers.
///
/// The raw value is a comma-separated list; each entry is trimmed of
/// surrounding whitespace. Multi-line directives contribute their lines in
/// source order. Absent directive means an empty chain.
pub fn extends_list(sections: &SectionMap) -> Vec<String> {
	let Some(raw) = sections
		.get(DEFAULT_SECTION)
		.and_then(|directives| directives.get(EXTENDS_KEY))
	else {
		return Vec::new();
	};

	let parts: Vec<&str> = match raw {
		RawValue::Single(text) => vec![text.as_str()],
		RawValue::Lines(lines) => lines.iter().map(String::as_str).collect(),
	};

	parts
		.iter()
		.flat_map(|part| part.split(','))
		.map(str::trim)
		.filter(|entry| !entry.is_empty())
		.map(str::to_string)
		.collect()
}

/// Fold `overlay` on top of `base`, section by section, last write winning.
fn merge_into(base: &mut SectionMap, overlay: SectionMap) {
	for (name, keys) in overlay {
		base.entry(name).or_default().extend(keys);
	}
}
