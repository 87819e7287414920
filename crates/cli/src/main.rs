mod report;
mod schema;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cmdline::ArgumentView;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::report::Recorder;
use crate::schema::require_schema;

/// Exit status for arguments rejected by the probed schema.
const PARSE_FAILURE_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "argprobe")]
#[command(version, about = "Try out command-line schemas against argument vectors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the usage text for a schema
    Usage(UsageArgs),

    /// Check that a schema declares without conflicts
    Check(CheckArgs),

    /// Parse arguments against a schema and report fired callbacks
    Parse(ParseArgs),
}

#[derive(Args)]
struct SchemaArgs {
    /// Path to the schema JSON (default: ./argprobe.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,
}

#[derive(Args)]
struct UsageArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Program name shown in the usage line (overrides schema)
    #[arg(short, long, value_name = "NAME")]
    program: Option<String>,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    schema: SchemaArgs,
}

#[derive(Args)]
struct ParseArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Program name passed as the first raw argument (overrides schema)
    #[arg(short, long, value_name = "NAME")]
    program: Option<String>,

    /// Print a JSON report instead of one line per callback
    #[arg(long)]
    json: bool,

    /// Arguments to parse (put them after `--`)
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Usage(args) => usage_command(args),
        Commands::Check(args) => check_command(args),
        Commands::Parse(args) => parse_command(args),
    }
}

fn usage_command(args: UsageArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let loaded = require_schema(args.schema.schema.as_deref())?;
    let program = loaded.schema.program_name(args.program.as_deref());

    let recorder = Recorder::default();
    let mut parser = cmdline::Parser::new();
    loaded.schema.declare(&mut parser, &recorder)?;

    let mut stdout = io::stdout().lock();
    parser.usage(&mut stdout, &program)?;
    stdout.flush()?;
    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let loaded = require_schema(args.schema.schema.as_deref())?;
    let recorder = Recorder::default();
    let mut parser = cmdline::Parser::new();
    loaded.schema.declare(&mut parser, &recorder)?;

    println!(
        "OK: {} option(s), {} argument(s) in {}",
        parser.option_count(),
        parser.positional_count(),
        loaded.path.display()
    );
    Ok(())
}

fn parse_command(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let loaded = require_schema(args.schema.schema.as_deref())?;
    let program = loaded.schema.program_name(args.program.as_deref());

    let mut raw = Vec::with_capacity(args.args.len() + 1);
    raw.push(program.clone());
    raw.extend(args.args);
    let view = ArgumentView::new(&raw);

    let recorder = Recorder::default();
    let mut parser = cmdline::Parser::new();
    loaded.schema.declare(&mut parser, &recorder)?;

    if let Err(err) = parser.parse(&view) {
        tracing::debug!(argc = view.argument_count(), "arguments rejected");
        eprintln!("error: {err}");
        eprintln!();
        parser.usage(&mut io::stderr(), view.program_name())?;
        std::process::exit(PARSE_FAILURE_EXIT_CODE);
    }
    drop(parser);

    let report = recorder.into_report(program);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for event in &report.events {
            println!("{event}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
