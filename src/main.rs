use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use httpmsg::config::Config;
use httpmsg::{HttpMessage, build_query, parse_query, parse_request, parse_response};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Request,
    Response,
    Query,
}

/// Parses a raw HTTP message or query string and prints its normalized form.
#[derive(Debug, Parser)]
#[command(name = "httpmsg", version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What the input holds
    #[arg(value_enum)]
    kind: Kind,

    /// Input file, stdin when absent
    file: Option<PathBuf>,
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn normalize(kind: Kind, input: &str, config: &Config) -> httpmsg::Result<String> {
    match kind {
        Kind::Request => {
            let request = parse_request(input)?;
            debug!(
                method = request.method(),
                uri = %request.uri(),
                target = %request.request_target(),
                headers = request.headers().len(),
                "parsed request"
            );
            Ok(request.to_string())
        }
        Kind::Response => {
            let response = parse_response(input)?;
            debug!(
                status = response.status(),
                reason = response.reason_phrase(),
                headers = response.headers().len(),
                "parsed response"
            );
            Ok(response.to_string())
        }
        Kind::Query => {
            let query = input.trim_end_matches(['\r', '\n']);
            let query = query.strip_prefix('?').unwrap_or(query);
            let params = parse_query(query, config.query_decoding);
            debug!(keys = params.len(), "parsed query");
            let mut output = build_query(&params, config.query_encoding)?;
            output.push('\n');
            Ok(output)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The filter comes from the config, so config warnings go through a temporary subscriber
    let config = tracing::subscriber::with_default(
        tracing_subscriber::fmt().with_writer(std::io::stderr).finish(),
        || cli.config.as_ref().map(Config::from_file).unwrap_or_default(),
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = match read_input(cli.file.as_ref()) {
        Ok(input) => input,
        Err(err) => {
            error!(%err, "failed to read input");
            return ExitCode::FAILURE;
        }
    };

    match normalize(cli.kind, &input, &config) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "failed to parse input");
            ExitCode::FAILURE
        }
    }
}
