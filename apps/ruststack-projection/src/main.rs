//! RustStack Projection - evaluate DynamoDB projection expressions offline.
//!
//! Reads a JSON request shaped like the projection part of a DynamoDB
//! `GetItem`/`Query`/`Scan` call and writes the projected items:
//!
//! ```text
//! echo '{"ProjectionExpression": "a.b[0]", "Items": [...]}' | ruststack-projection
//! ruststack-projection request.json -e 'a, #n' --name '#n=name'
//! ```
//!
//! On success the JSON `ProjectionOutput` is written to stdout. On a
//! validation failure the DynamoDB error body (`{"__type", "Message"}`) is
//! written to stdout and the process exits with status 1.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PROJECTION_MAX_EXPRESSION_LENGTH` | `4096` | Maximum expression size in bytes |
//! | `PROJECTION_MAX_PATH_DEPTH` | `32` | Maximum steps in one document path |
//! | `PROJECTION_REJECT_UNUSED_NAMES` | `true` | Reject unreferenced `ExpressionAttributeNames` |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ruststack_projection_core::handler::decode_request;
use ruststack_projection_core::{ProjectionConfig, RustStackProjection};
use ruststack_projection_model::{ProjectionError, ProjectionInput, ProjectionOutput};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Evaluate DynamoDB projection expressions against JSON items.
#[derive(Parser, Debug)]
#[command(name = "ruststack-projection", version, about, long_about = None)]
struct Cli {
    /// Request file; reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Projection expression, replacing any `ProjectionExpression` in the request.
    #[arg(short = 'e', long = "expression", value_name = "EXPR")]
    expression: Option<String>,

    /// Expression attribute name, added to `ExpressionAttributeNames`.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "#ALIAS=NAME",
        value_parser = parse_name_binding,
        action = clap::ArgAction::Append
    )]
    names: Vec<(String, String)>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Log level filter, used when `RUST_LOG` is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn parse_name_binding(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((alias, name)) if alias.starts_with('#') && alias.len() > 1 => {
            Ok((alias.to_owned(), name.to_owned()))
        }
        _ => Err(format!("expected #ALIAS=NAME, got {raw:?}")),
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `--log-level` value.
/// Logs go to stderr so stdout carries only JSON.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

/// Read the raw request body from a file or stdin.
fn read_request(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

/// Decode the request body and apply command-line overrides.
fn build_input(cli: &Cli, body: &[u8]) -> Result<ProjectionInput, ProjectionError> {
    let mut input: ProjectionInput = if body.iter().all(u8::is_ascii_whitespace) {
        ProjectionInput::default()
    } else {
        decode_request(body)?
    };

    if let Some(expression) = &cli.expression {
        input.projection_expression = Some(expression.clone());
    }
    input
        .expression_attribute_names
        .extend(cli.names.iter().cloned());
    Ok(input)
}

fn write_json(value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)
    } else {
        serde_json::to_writer(&mut stdout, value)
    }
    .context("failed to write response")?;
    writeln!(stdout).context("failed to write response")?;
    Ok(())
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = ProjectionConfig::from_env();
    info!(
        max_expression_length = config.max_expression_length,
        max_path_depth = config.max_path_depth,
        reject_unused_names = config.reject_unused_names,
        "initializing projection engine",
    );
    let provider = RustStackProjection::new(config);

    let body = read_request(cli.input.as_ref())?;
    let result: Result<ProjectionOutput, ProjectionError> =
        build_input(cli, &body).and_then(|input| provider.handle_projection(input));

    match result {
        Ok(output) => {
            debug!(items = output.items.len(), "projection succeeded");
            write_json(&output, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            debug!(code = %err.code, message = %err.message, "projection failed");
            write_json(&err.to_json(), cli.pretty)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ruststack-projection").chain(args.iter().copied()))
    }

    #[test]
    fn test_should_parse_name_binding() {
        assert_eq!(
            parse_name_binding("#n=name").unwrap(),
            ("#n".to_owned(), "name".to_owned())
        );
        assert_eq!(
            parse_name_binding("#n=a=b").unwrap(),
            ("#n".to_owned(), "a=b".to_owned())
        );
        assert!(parse_name_binding("n=name").is_err());
        assert!(parse_name_binding("#=name").is_err());
        assert!(parse_name_binding("#n").is_err());
    }

    #[test]
    fn test_should_apply_command_line_overrides() {
        let cli = cli(&["-e", "#n", "--name", "#n=b"]);
        let input = build_input(&cli, br#"{"ProjectionExpression": "a", "Items": []}"#).unwrap();
        assert_eq!(input.projection_expression.as_deref(), Some("#n"));
        assert_eq!(input.expression_attribute_names["#n"], "b");
    }

    #[test]
    fn test_should_accept_empty_body() {
        let cli = cli(&["-e", "a"]);
        let input = build_input(&cli, b"  \n").unwrap();
        assert!(input.items.is_empty());
        assert_eq!(input.projection_expression.as_deref(), Some("a"));
    }

    #[test]
    fn test_should_report_malformed_body() {
        let err = build_input(&cli(&[]), b"[1, 2").unwrap_err();
        assert_eq!(err.error_type(), "com.amazonaws.dynamodb.v20120810#SerializationException");
    }
}
