//! `tomlbridge` CLI to decode, encode and fingerprint TOML from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Decode TOML to JSON (stdin → stdout)
//! echo 'section.field1 = "value1"' | tomlbridge decode
//!
//! # Encode JSON to TOML, file to file
//! tomlbridge encode -i config.json -o config.toml
//!
//! # Print the content identity of a TOML file
//! tomlbridge id -i config.toml
//!
//! # Decoded content, canonical JSON and identity in one JSON object
//! tomlbridge file -i config.toml
//! ```
//!
//! Set `RUST_LOG=debug` to see conversion logs on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tomlbridge_core::{TomlFile, TypedValue};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "tomlbridge",
    version,
    about = "Convert between TOML documents and typed JSON values"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode TOML into JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Encode JSON as TOML (null values are left out)
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the content identity (hex SHA-1 of the canonical JSON) of a TOML document
    Id {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print decoded content, canonical JSON and identity of a TOML document
    File {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            output,
            compact,
        } => {
            let toml = read_input(input.as_deref())?;
            let value =
                tomlbridge_core::decode_document(&toml).context("Failed to decode TOML")?;
            let json = value
                .to_json()
                .context("Failed to represent decoded value as JSON")?;
            write_output(output.as_deref(), &render_json(&json, compact)?)?;
        }
        Commands::Encode { input, output } => {
            let json = read_input(input.as_deref())?;
            let parsed: serde_json::Value =
                serde_json::from_str(&json).context("Failed to parse input JSON")?;
            let value = TypedValue::from_json(&parsed);
            let toml = tomlbridge_core::encode_document(&value)
                .context("Failed to encode value as TOML")?;
            write_output(output.as_deref(), &toml)?;
        }
        Commands::Id { input } => {
            let toml = read_input(input.as_deref())?;
            let document =
                tomlbridge_core::document::parse(&toml).context("Failed to decode TOML")?;
            let id = tomlbridge_core::identity(&document)
                .context("Failed to compute content identity")?;
            println!("{id}");
        }
        Commands::File {
            input,
            output,
            compact,
        } => {
            let toml = read_input(input.as_deref())?;
            let file = TomlFile::read(toml).context("Failed to read TOML file content")?;
            let json = serde_json::to_value(&file)?;
            write_output(output.as_deref(), &render_json(&json, compact)?)?;
        }
    }

    Ok(())
}

fn render_json(value: &serde_json::Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            tracing::debug!(path, bytes = text.len(), "read input file");
            Ok(text)
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            tracing::debug!(bytes = buf.len(), "read stdin");
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
