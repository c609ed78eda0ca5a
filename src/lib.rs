//! Confit - layered INI-style configuration with inheritance chains.
//!
//! This library provides the core functionality for confit, including:
//! - Section-structured source parsing with multi-line values
//! - Inheritance chain resolution via the `[DEFAULT] extends` directive
//! - Typed value coercion (integers, quoted strings, ordered sequences)
//! - Access-time `${NAME}` environment interpolation
//!
//! # Example
//!
//! ```no_run
//! use confit::{Config, Value};
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("app.conf")).unwrap();
//!
//! match config.get("storage", "pool_size").unwrap() {
//!     Value::Int(n) => println!("pool size: {n}"),
//!     other => println!("unexpected type: {other}"),
//! }
//!
//! // Flattened "section.key" view of every resolved pair
//! for (name, value) in config.get_map().unwrap() {
//!     println!("{name} = {value}");
//! }
//! ```

pub mod chain;
pub mod error;
pub mod parser;
pub mod store;
pub mod value;

pub use error::{ConfitError, Result};
pub use store::{Config, EnvLookup};
pub use value::Value;
