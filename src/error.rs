use std::path::PathBuf;

/// Library-level structured errors for confit.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfitError {
	#[error("Failed to read config source: {path}")]
	SourceRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Parse error in {origin} at line {line}: {reason}")]
	Parse {
		origin: String,
		line: usize,
		reason: String,
	},

	#[error("Circular inheritance: {path} is already being resolved")]
	CircularExtends { path: PathBuf },

	#[error("Section not found: [{section}]")]
	SectionNotFound { section: String },

	#[error("Key not found: [{section}] {key}")]
	KeyNotFound { section: String, key: String },

	#[error("Environment variable not found: {name}")]
	EnvNotFound { name: String },
}

/// Result type alias using ConfitError.
pub type Result<T> = std::result::Result<T, ConfitError>;
