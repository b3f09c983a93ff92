//! Command-line entry point for the redaction service: reads narrative
//! text from stdin or `--text`, runs it through [`care_redact::RedactionService`],
//! and prints the redacted text (or, with `--json`, the full result).

use std::env;
use std::io::Read;
use std::process::ExitCode;

use care_redact::RedactionService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_line_number(true))
        .init();
}

fn read_input(args: &[String]) -> std::io::Result<String> {
    if let Some(pos) = args.iter().position(|a| a == "--text") {
        if let Some(value) = args.get(pos + 1) {
            return Ok(value.clone());
        }
    }

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|a| a == "--json");

    let text = match read_input(&args) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error_class = "invalid_input", "failed to read input text: {e}");
            return ExitCode::FAILURE;
        }
    };

    let service = match RedactionService::with_defaults() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error_class = e.class(), "failed to initialize redaction service");
            return ExitCode::FAILURE;
        }
    };

    match service.redact(&text).await {
        Ok(result) => {
            if json_output {
                match serde_json::to_string_pretty(&result) {
                    Ok(j) => println!("{j}"),
                    Err(_) => {
                        tracing::error!(error_class = "internal_error", "failed to serialize result");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", result.redacted);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error_class = e.class(), "redaction request failed");
            ExitCode::FAILURE
        }
    }
}
