use serde::Serialize;
use std::fmt;

/// A typed configuration value.
///
/// Raw text coerces to exactly one of these at access time. Multi-line
/// entries become a `List` with one element per physical line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Int(i64),
	Str(String),
	List(Vec<Value>),
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Int(n) => write!(f, "{}", n),
			Value::Str(s) => write!(f, "{}", s),
			Value::List(items) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}", item)?;
				}
				write!(f, "]")
			}
		}
	}
}

/// Coerce one raw text token into a typed value.
///
/// - A base-10 integer (optional leading sign, no decimal point) becomes `Int`.
/// - A token wrapped in one matching pair of quote characters becomes `Str`
///   with exactly the outer delimiters stripped; the remainder passes through
///   verbatim, no escape processing.
/// - Anything else becomes `Str` unchanged.
///
/// Pure function of the token; no side effects.
pub fn coerce(token: &str) -> Value {
	if let Ok(n) = token.parse::<i64>() {
		return Value::Int(n);
	}
	if let Some(inner) = strip_quotes(token) {
		return Value::Str(inner.to_string());
	}
	Value::Str(token.to_string())
}

/// Coerce the lines of a multi-line entry into an ordered `List`.
///
/// Each line is an independent coercion unit; source order is preserved.
pub fn coerce_lines(lines: &[String]) -> Value {
	Value::List(lines.iter().map(|line| coerce(line)).collect())
}

/// Strip one matching pair of outer quote delimiters, if present.
fn strip_quotes(token: &str) -> Option<&str> {
	let mut chars = token.chars();
	let first = chars.next()?;
	let last = chars.next_back()?;
	if first == last && (first == '"' || first == '\'') {
		Some(&token[1..token.len() - 1])
	} else {
		None
	}
}
