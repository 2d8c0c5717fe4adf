//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `request_gateway` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All request handling is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use futures::future::join_all;
use structopt::StructOpt;

use request_gateway::config::{Opt, TEXT_CONTENT_TYPE};
use request_gateway::initialization::init_logger_with;
use request_gateway::{Gateway, GatewayError, ParsedBody, Response, TextResponseProcessor};

fn print_response(path: &str, response: &Response) {
    let status = response.status_code.to_string();
    let status = if response.is_success() {
        status.green()
    } else if response.status_code >= 400 {
        status.red()
    } else {
        status.yellow()
    };
    let origin = if response.retrieved_from_cache {
        " (cached)"
    } else {
        ""
    };
    println!("{} {}{}", status, path.bold(), origin.dimmed());

    match &response.parsed_body {
        Some(ParsedBody::Json(value)) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            println!("{}", pretty);
        }
        Some(ParsedBody::Text(text)) => println!("{}", text),
        None => {
            if let Some(body) = response.body.as_deref().filter(|body| !body.is_empty()) {
                println!("<{} bytes>", body.len());
            }
        }
    }
}

fn print_failure(path: &str, error: GatewayError) {
    // {:#} prints the whole source chain
    let error = anyhow::Error::from(error);
    eprintln!("{} {}: {:#}", "error".red().bold(), path.bold(), error);
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();

    init_logger_with(opt.log_level.into(), opt.log_format)
        .context("Failed to initialize logger")?;

    let config = opt.gateway_config();
    let gateway = Gateway::builder(config.clone())
        .json()
        .parser(TEXT_CONTENT_TYPE, Arc::new(TextResponseProcessor))
        .build()
        .context("Failed to build request gateway")?;
    gateway.resume();

    let outcomes = join_all(opt.paths.iter().map(|path| {
        let request = opt.request_for(&config, path);
        let gateway = gateway.clone();
        async move { (path, gateway.execute(request).await) }
    }))
    .await;

    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(response) => print_response(path, &response),
            Err(error) => {
                failed += 1;
                print_failure(path, error);
            }
        }
    }

    log::debug!("Gateway statistics: {:?}", gateway.stats());

    if failed > 0 {
        eprintln!("request_gateway: {} of {} requests failed", failed, opt.paths.len());
        process::exit(1);
    }
    Ok(())
}
