use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use confit::{Config, Value};

#[derive(Parser)]
#[command(name = "confit")]
#[command(
	author,
	version,
	about = "Inspect layered INI-style configuration with inheritance chains"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print one resolved value
	Get {
		/// Entry-point configuration file
		file: PathBuf,
		section: String,
		key: String,
	},
	/// Print the fully resolved configuration
	Dump {
		/// Entry-point configuration file
		file: PathBuf,

		/// Restrict output to one section
		#[arg(long)]
		section: Option<String>,

		/// Print flattened `section.key = value` lines instead of TOML
		#[arg(long)]
		flat: bool,
	},
	/// Load the full inheritance chain and report errors without printing values
	Validate {
		/// Entry-point configuration file
		file: PathBuf,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Get { file, section, key } => handle_get(&file, &section, &key),
		Commands::Dump {
			file,
			section,
			flat,
		} => handle_dump(&file, section.as_deref(), flat),
		Commands::Validate { file } => handle_validate(&file),
	}
}

fn load_config(file: &Path) -> Result<Config> {
	Config::load(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn handle_get(file: &Path, section: &str, key: &str) -> Result<ExitCode> {
	let config = load_config(file)?;
	let value = config
		.get(section, key)
		.with_context(|| format!("Failed to resolve [{}] {}", section, key))?;

	println!("{}", value);
	Ok(ExitCode::SUCCESS)
}

fn handle_dump(file: &Path, section: Option<&str>, flat: bool) -> Result<ExitCode> {
	let config = load_config(file)?;

	if flat {
		let map = match section {
			Some(name) => config.get_section_map(name)?,
			None => config.get_map()?,
		};
		for (name, value) in &map {
			println!("{} = {}", name, value);
		}
		return Ok(ExitCode::SUCCESS);
	}

	let mut sections: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
	match section {
		Some(name) => {
			sections.insert(name.to_string(), config.get_section_map(name)?);
		}
		None => {
			for name in config.sections().map(str::to_string).collect::<Vec<_>>() {
				let resolved = config.get_section_map(&name)?;
				sections.insert(name, resolved);
			}
		}
	}

	let rendered =
		toml::to_string(&sections).context("Failed to render resolved configuration")?;
	print!("{}", rendered);
	Ok(ExitCode::SUCCESS)
}

fn handle_validate(file: &Path) -> Result<ExitCode> {
	match Config::load(file) {
		Ok(config) => {
			println!(
				"{} resolved cleanly ({} sections)",
				file.display(),
				config.sections().count()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
