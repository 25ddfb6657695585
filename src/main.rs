use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use chrono::Utc;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use timesheet_dq::cmd::{check, config};
use timesheet_dq::domain::config::Profile;
use timesheet_dq::domain::report::{PipelineInput, PipelineInputSource, PipelineReport};
use timesheet_dq::io::{self as dq_io, Format};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "timesheet-dq",
    version,
    about = "Data quality gate for timesheet CSV exports"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    emit_pipeline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a timesheet table and write the verdict document.
    Check(CheckArgs),
    /// Print the resolved gate configuration.
    Config(ConfigArgs),
}

#[derive(Debug, clap::Args)]
struct CheckArgs {
    #[arg(long, default_value = check::DEFAULT_INPUT_DIR, conflicts_with = "input")]
    input_dir: PathBuf,

    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, default_value = check::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[arg(long, value_enum)]
    profile: Option<CliProfile>,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct ConfigArgs {
    #[arg(long, value_enum)]
    profile: Option<CliProfile>,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProfile {
    Tolerant,
    Strict,
}

impl From<CliProfile> for Profile {
    fn from(value: CliProfile) -> Self {
        match value {
            CliProfile::Tolerant => Self::Tolerant,
            CliProfile::Strict => Self::Strict,
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };
    init_tracing();

    let emit_pipeline = cli.emit_pipeline;
    match cli.command {
        Commands::Check(args) => run_check(args, emit_pipeline),
        Commands::Config(args) => run_config(args, emit_pipeline),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timesheet_dq=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_check(args: CheckArgs, emit_pipeline: bool) -> i32 {
    let pipeline_report = build_check_pipeline_report(&args);
    let exit_code = execute_check(args);

    if emit_pipeline {
        emit_pipeline_report(&pipeline_report);
    }
    exit_code
}

fn execute_check(args: CheckArgs) -> i32 {
    let profile = args.profile.map(Into::into);
    let gate_config = match config::load_config(profile, args.config.as_deref()) {
        Ok(gate_config) => gate_config,
        Err(message) => {
            emit_error(
                "input_usage_error",
                message,
                json!({"command": "check", "config": args.config}),
                3,
            );
            return 3;
        }
    };
    let command_args = check::CheckCommandArgs {
        input_dir: args.input_dir,
        input: args.input,
        output: args.output,
        config: gate_config,
    };

    let response = check::run(&command_args, Utc::now());
    let emitted = if response.verdict_written {
        emit_json_stdout(&response.payload)
    } else {
        emit_json_stderr(&response.payload)
    };
    if emitted {
        response.exit_code
    } else {
        emit_error(
            "internal_error",
            "failed to serialize check response".to_string(),
            json!({"command": "check"}),
            1,
        );
        1
    }
}

fn run_config(args: ConfigArgs, emit_pipeline: bool) -> i32 {
    let pipeline_report = build_config_pipeline_report(&args);
    let command_args = config::ConfigCommandArgs {
        profile: args.profile.map(Into::into),
        config: args.config,
    };

    let response = config::run(&command_args);
    let emitted = match response.exit_code {
        0 => emit_json_stdout(&response.payload),
        _ => emit_json_stderr(&response.payload),
    };
    let exit_code = if emitted {
        response.exit_code
    } else {
        emit_error(
            "internal_error",
            "failed to serialize config response".to_string(),
            json!({"command": "config"}),
            1,
        );
        1
    };

    if emit_pipeline {
        emit_pipeline_report(&pipeline_report);
    }
    exit_code
}

fn build_check_pipeline_report(args: &CheckArgs) -> PipelineReport {
    let mut sources = Vec::with_capacity(2);
    if let Some(path) = &args.input {
        sources.push(PipelineInputSource::path(
            "input",
            path.display().to_string(),
            dq_io::resolve_input_format(path).ok().map(Format::as_str),
        ));
    } else {
        sources.push(PipelineInputSource::directory(
            "input",
            args.input_dir.display().to_string(),
            Format::Csv.as_str(),
        ));
    }
    if let Some(path) = &args.config {
        sources.push(config_source(path));
    }

    PipelineReport::new(
        "check",
        PipelineInput::new(sources),
        check::pipeline_steps(),
        check::deterministic_guards(),
    )
}

fn build_config_pipeline_report(args: &ConfigArgs) -> PipelineReport {
    let sources = args.config.iter().map(|path| config_source(path)).collect();
    PipelineReport::new(
        "config",
        PipelineInput::new(sources),
        config::pipeline_steps(),
        config::deterministic_guards(),
    )
}

fn config_source(path: &Path) -> PipelineInputSource {
    PipelineInputSource::path(
        "config",
        path.display().to_string(),
        dq_io::resolve_config_format(path).ok().map(Format::as_str),
    )
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_pipeline_report(report: &PipelineReport) {
    match serde_json::to_string(report) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(error) => emit_error(
            "internal_error",
            format!("failed to serialize pipeline report: {error}"),
            json!({"command": "emit_pipeline"}),
            1,
        ),
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
