//! apiprobe binary.
//!
//! Executes one operation of an interface document and prints the envelope.

use std::path::PathBuf;
use std::process::ExitCode;

use apiprobe_domain::{Failures, ParamValue, Params, Response};
use apiprobe_infrastructure::{ClientBuilder, Expectations};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "apiprobe",
    version,
    about = "Execute a described API operation and check the response"
)]
struct Cli {
    /// Path to the interface description document (JSON)
    document: PathBuf,

    /// Operation to call: `tag.operationId`, or `operationId` for the default tag
    specifier: String,

    /// Parameter as `name=value`; values that parse as JSON are sent as JSON
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,

    /// Fail unless the response has this status code
    #[arg(long)]
    expect_status: Option<u16>,

    /// Follow redirects instead of returning the redirect response
    #[arg(long)]
    follow_redirects: bool,
}

fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = serde_json::from_str::<serde_json::Value>(value)
        .map_or_else(|_| ParamValue::from(value), ParamValue::Json);
    Ok((name.to_string(), value))
}

fn print_response(response: &Response) {
    println!("{} {}", response.status_code, response.status);
    println!("URL: {}", response.request_url);
    println!("Time: {}", response.request_time());

    let mut headers: Vec<_> = response.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        println!("{name}: {value}");
    }
    for cookie in &response.cookies {
        println!("Cookie: {}={}", cookie.name, cookie.value);
    }

    println!();
    println!("{}", response.body);
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = match ClientBuilder::new(&cli.document).with_env().build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.follow_redirects {
        client.set_follow_redirects(true);
    }

    let params: Params = cli.params.into_iter().collect();
    tracing::info!(specifier = %cli.specifier, params = params.len(), "executing");

    let failures = Failures::new();
    let mut response = client.execute(&cli.specifier, &params);
    if let Some(status) = cli.expect_status {
        response = response.expect_status(&failures, status);
    }

    if let Some(error) = response.error() {
        eprintln!("Error: {error}");
        return ExitCode::FAILURE;
    }

    print_response(&response);

    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        for message in failures.messages() {
            eprintln!("FAILED: {message}");
        }
        ExitCode::FAILURE
    }
}
