use crate::chain::resolve_chain;
use crate::error::{ConfitError, Result};
use crate::parser::{RawValue, SectionMap, parse_source_file, parse_source_str};
use crate::value::{Value, coerce, coerce_lines};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Environment lookup used for `${NAME}` interpolation.
///
/// Injectable so construction-time and access-time environment states can be
/// tested independently; the default reads the process environment.
pub type EnvLookup = fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
	std::env::var(name).ok()
}

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{[^}]+\}").expect("placeholder pattern is valid"));

/// A fully resolved configuration.
///
/// The merged raw mapping is built eagerly at construction (the whole
/// inheritance chain is loaded, or construction fails and nothing is
/// queryable). Coercion and `${NAME}` interpolation happen on every access,
/// never at load time, so accessors observe the environment as it is at the
/// moment of the call.
pub struct Config {
	sections: SectionMap,
	env: EnvLookup,
}

impl Config {
	/// Load a configuration from a file, resolving its inheritance chain.
	pub fn load(path: &Path) -> Result<Self> {
		let own = parse_source_file(path)?;
		let mut resolving = vec![path.to_path_buf()];
		let sections = resolve_chain(own, &mut resolving)?;
		Ok(Config {
			sections,
			env: process_env,
		})
	}

	/// Load a configuration from in-memory text.
	///
	/// `extends` entries are still file paths and are resolved normally.
	pub fn from_text(text: &str) -> Result<Self> {
		let own = parse_source_str(text, "<memory>")?;
		let sections = resolve_chain(own, &mut Vec::new())?;
		Ok(Config {
			sections,
			env: process_env,
		})
	}

	/// Replace the environment lookup used for interpolation.
	pub fn with_env_lookup(mut self, env: EnvLookup) -> Self {
		self.env = env;
		self
	}

	/// Section names in the merged mapping.
	pub fn sections(&self) -> impl Iterator<Item = &str> {
		self.sections.keys().map(String::as_str)
	}

	/// Resolve one value.
	///
	/// Coercion and interpolation are applied per call; an unset placeholder
	/// variable fails this call only, leaving other keys accessible.
	pub fn get(&self, section: &str, key: &str) -> Result<Value> {
		let raw = self
			.sections
			.get(section)
			.and_then(|keys| keys.get(key))
			.ok_or_else(|| ConfitError::KeyNotFound {
				section: section.to_string(),
				key: key.to_string(),
			})?;
		self.resolve(raw)
	}

	/// Like [`get`](Config::get), but an absent key yields `default` instead
	/// of an error. Resolution errors on present keys still propagate.
	pub fn get_or(&self, section: &str, key: &str, default: Value) -> Result<Value> {
		match self.get(section, key) {
			Err(ConfitError::KeyNotFound { .. }) => Ok(default),
			other => other,
		}
	}

	/// Flattened view of the whole configuration: one `"section.key"` entry
	/// per resolved pair.
	pub fn get_map(&self) -> Result<BTreeMap<String, Value>> {
		let mut map = BTreeMap::new();
		for (section, keys) in &self.sections {
			for (key, raw) in keys {
				map.insert(format!("{}.{}", section, key), self.resolve(raw)?);
			}
		}
		Ok(map)
	}

	/// Resolved view of one section, keyed by plain key name.
	pub fn get_section_map(&self, section: &str) -> Result<BTreeMap<String, Value>> {
		let keys = self
			.sections
			.get(section)
			.ok_or_else(|| ConfitError::SectionNotFound {
				section: section.to_string(),
			})?;

		let mut map = BTreeMap::new();
		for (key, raw) in keys {
			map.insert(key.clone(), self.resolve(raw)?);
		}
		Ok(map)
	}

	fn resolve(&self, raw: &RawValue) -> Result<Value> {
		let value = match raw {
			RawValue::Single(text) => coerce(text),
			RawValue::Lines(lines) => coerce_lines(lines),
		};
		self.interpolate(value)
	}

	fn interpolate(&self, value: Value) -> Result<Value> {
		match value {
			Value::Int(_) => Ok(value),
			Value::Str(text) => self.interpolate_str(&text).map(Value::Str),
			Value::List(items) => items
				.into_iter()
				.map(|item| self.interpolate(item))
				.collect::<Result<Vec<_>>>()
				.map(Value::List),
		}
	}

	fn interpolate_str(&self, text: &str) -> Result<String> {
		let mut out = String::with_capacity(text.len());
		let mut last = 0;

		for found in PLACEHOLDER.find_iter(text) {
			// ${NAME} -> NAME
			let name = &text[found.start() + 2..found.end() - 1];
			let replacement = (self.env)(name).ok_or_else(|| ConfitError::EnvNotFound {
				name: name.to_string(),
			})?;
			out.push_str(&text[last..found.start()]);
			out.push_str(&replacement);
			last = found.end();
		}

		out.push_str(&text[last..]);
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SOURCE: &str = "\
[one]
foo = bar
num = -12
st = \"o=k\"
lines = 1
        two
        3

env = some ${__STUFF__}

[two]
a = b
";

	fn fake_env(name: &str) -> Option<String> {
		match name {
			"__STUFF__" => Some("stuff".to_string()),
			_ => None,
		}
	}

	fn empty_env(_name: &str) -> Option<String> {
		None
	}

	fn config() -> Config {
		Config::from_text(SOURCE).unwrap().with_env_lookup(fake_env)
	}

	#[test]
	fn test_get_typed_values() {
		let config = config();

		assert_eq!(
			config.get("one", "foo").unwrap(),
			Value::Str("bar".to_string())
		);
		assert_eq!(config.get("one", "num").unwrap(), Value::Int(-12));
		assert_eq!(
			config.get("one", "st").unwrap(),
			Value::Str("o=k".to_string())
		);
		assert_eq!(
			config.get("one", "lines").unwrap(),
			Value::List(vec![
				Value::Int(1),
				Value::Str("two".to_string()),
				Value::Int(3),
			])
		);
	}

	#[test]
	fn test_get_interpolates_environment() {
		let config = config();
		assert_eq!(
			config.get("one", "env").unwrap(),
			Value::Str("some stuff".to_string())
		);
	}

	#[test]
	fn test_env_lookup_is_per_call() {
		let config = config();
		assert!(config.get("one", "env").is_ok());

		// Same key fails once the variable disappears; other keys are untouched
		let config = config.with_env_lookup(empty_env);
		let err = config.get("one", "env").unwrap_err();
		match err {
			ConfitError::EnvNotFound { name } => assert_eq!(name, "__STUFF__"),
			_ => panic!("Expected EnvNotFound error"),
		}
		assert_eq!(
			config.get("one", "foo").unwrap(),
			Value::Str("bar".to_string())
		);
	}

	#[test]
	fn test_get_key_not_found() {
		let config = config();
		let err = config.get("one", "missing").unwrap_err();
		match err {
			ConfitError::KeyNotFound { section, key } => {
				assert_eq!(section, "one");
				assert_eq!(key, "missing");
			}
			_ => panic!("Expected KeyNotFound error"),
		}

		assert!(matches!(
			config.get("nosuch", "foo").unwrap_err(),
			ConfitError::KeyNotFound { .. }
		));
	}

	#[test]
	fn test_get_or_default() {
		let config = config();
		assert_eq!(
			config.get_or("one", "missing", Value::Int(7)).unwrap(),
			Value::Int(7)
		);
		// Present keys ignore the default
		assert_eq!(
			config.get_or("one", "num", Value::Int(7)).unwrap(),
			Value::Int(-12)
		);
	}

	#[test]
	fn test_get_or_propagates_env_errors() {
		let config = Config::from_text(SOURCE).unwrap().with_env_lookup(empty_env);
		assert!(matches!(
			config.get_or("one", "env", Value::Int(0)).unwrap_err(),
			ConfitError::EnvNotFound { .. }
		));
	}

	#[test]
	fn test_get_map_flattened() {
		let map = config().get_map().unwrap();

		assert_eq!(map.get("one.foo"), Some(&Value::Str("bar".to_string())));
		assert_eq!(map.get("two.a"), Some(&Value::Str("b".to_string())));
		assert_eq!(map.len(), 6);
	}

	#[test]
	fn test_get_section_map() {
		let config = config();
		let map = config.get_section_map("one").unwrap();

		assert_eq!(map.get("foo"), Some(&Value::Str("bar".to_string())));
		assert_eq!(map.get("num"), Some(&Value::Int(-12)));
		assert!(!map.contains_key("a"));

		assert!(matches!(
			config.get_section_map("nosuch").unwrap_err(),
			ConfitError::SectionNotFound { .. }
		));
	}

	#[test]
	fn test_multiple_placeholders_in_one_value() {
		let config = Config::from_text("[s]\nk = ${__STUFF__}/${__STUFF__}\n")
			.unwrap()
			.with_env_lookup(fake_env);
		assert_eq!(
			config.get("s", "k").unwrap(),
			Value::Str("stuff/stuff".to_string())
		);
	}

	#[test]
	fn test_placeholders_in_list_items() {
		let config = Config::from_text("[s]\nk = ${__STUFF__}\n        plain\n")
			.unwrap()
			.with_env_lookup(fake_env);
		assert_eq!(
			config.get("s", "k").unwrap(),
			Value::List(vec![
				Value::Str("stuff".to_string()),
				Value::Str("plain".to_string()),
			])
		);
	}
}
