use std::path::{Path, PathBuf};

use argscope_core::{EntryKind, ParseError};
use argscope_schema::{CommandSpec, SpecFormat, describe};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

impl From<CliOutputFormat> for SpecFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argscope", version = PACKAGE_VERSION)]
#[command(about = "Try declarative command specs against real argument lists")]
struct Cli {
    /// Log parser decisions to stderr (RUST_LOG overrides the level).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a spec and print the typed report.
    Parse(ParseArgs),
    /// Print the entries a spec registers, level by level.
    Inspect(InspectArgs),
    /// Check that spec files load and register without collisions.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Spec file (.yaml, .yml or .json).
    #[arg(long)]
    schema: PathBuf,
    /// Output format for the report.
    #[arg(long, value_enum, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Spec file (.yaml, .yml or .json).
    #[arg(long)]
    schema: PathBuf,
    #[arg(long, value_enum, default_value = "yaml")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Spec files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_spec(path: &Path) -> Result<CommandSpec, String> {
    CommandSpec::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn describe_parse_error(err: &ParseError) -> String {
    let path = err.subcommand_path();
    if path.is_empty() {
        err.root().to_string()
    } else {
        format!("in `{}`: {}", path.join(" "), err.root())
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let spec = load_spec(&args.schema)?;
    let mut parser = spec.build().map_err(|e| e.to_string())?;
    debug!(command = %spec.name, tokens = args.tokens.len(), "Parsing tokens");

    parser
        .parse(&args.tokens)
        .map_err(|err| describe_parse_error(&err))?;

    let report = spec.report(&parser).map_err(|e| e.to_string())?;
    let rendered = SpecFormat::from(args.format)
        .render(&report)
        .map_err(|err| format!("Failed to serialize report: {err}"))?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let spec = load_spec(&args.schema)?;
    let parser = spec.build().map_err(|e| e.to_string())?;
    let summary = describe(&spec.name, &spec.description, &parser);
    let rendered = SpecFormat::from(args.format)
        .render(&summary)
        .map_err(|err| format!("Failed to serialize summary: {err}"))?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut commands = 0;
    for path in &args.inputs {
        let spec = load_spec(path)?;
        let parser = spec
            .build()
            .map_err(|err| format!("'{}': {err}", path.display()))?;
        commands += 1 + count_subcommands(&parser);
    }
    println!(
        "Validated {} spec file(s) covering {} command(s).",
        args.inputs.len(),
        commands
    );
    Ok(())
}

fn count_subcommands(parser: &argscope_core::Parser) -> usize {
    parser
        .entries_of(EntryKind::Subcommand)
        .filter_map(|entry| entry.parser())
        .map(|child| 1 + count_subcommands(child))
        .sum()
}
