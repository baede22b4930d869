use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schemagraph::generator::generate_sql;
use schemagraph::layout::{LayoutConfig, LayoutEngine};
use schemagraph::sql::Dialect;
use schemagraph::{
    ParseOptions, decode_dialect, decode_layout_config, decode_schema, parse_sql_with,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemagraph", about = "Turn CREATE TABLE scripts into a schema graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a SQL script and print the result as JSON
    Parse {
        input: PathBuf,
        #[arg(short, long, default_value = "mysql", value_parser = decode_dialect)]
        dialect: Dialect,
        /// Schema JSON from an earlier run whose table positions are kept
        #[arg(short, long)]
        previous: Option<PathBuf>,
        /// Lay out every table again instead of keeping earlier positions
        #[arg(long)]
        reset_positions: bool,
        /// JSON file overriding layout constants
        #[arg(long)]
        layout_config: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render schema JSON back to CREATE TABLE statements
    Generate {
        input: PathBuf,
        #[arg(short, long, default_value = "mysql", value_parser = decode_dialect)]
        dialect: Dialect,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the sample script for a dialect
    Example {
        #[arg(value_parser = decode_dialect)]
        dialect: Dialect,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when a parse run reported statement errors.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Parse {
            input,
            dialect,
            previous,
            reset_positions,
            layout_config,
            output,
        } => {
            let sql = read(&input)?;
            let previous = previous
                .map(|path| -> Result<_> {
                    let json = read(&path)?;
                    decode_schema(&json).with_context(|| format!("in {}", path.display()))
                })
                .transpose()?;
            let config = match layout_config {
                Some(path) => decode_layout_config(&read(&path)?)
                    .with_context(|| format!("invalid layout config {}", path.display()))?,
                None => LayoutConfig::default(),
            };

            let options = ParseOptions {
                dialect,
                previous: previous.as_ref(),
                reset_positions,
                layout: LayoutEngine::new(config)?,
            };
            let result = parse_sql_with(&sql, &options);
            if let Some(error) = &result.error {
                eprintln!("{}", error.message);
            }

            let json = serde_json::to_string_pretty(&result)?;
            write(output.as_deref(), &json)?;
            Ok(result.success)
        }
        Command::Generate {
            input,
            dialect,
            output,
        } => {
            let schema = decode_schema(&read(&input)?)
                .with_context(|| format!("in {}", input.display()))?;
            write(output.as_deref(), &generate_sql(&schema.tables, dialect))?;
            Ok(true)
        }
        Command::Example { dialect } => {
            println!("{}", dialect.example_sql());
            Ok(true)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
