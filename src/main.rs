use clap::Parser;
use isshub_sync::utils::error::ErrorSeverity;
use isshub_sync::utils::{logger, validation::Validate};
use isshub_sync::{CliConfig, HttpResponse, SyncError};

async fn run(config: &CliConfig) -> Result<HttpResponse, SyncError> {
    config.validate()?;

    let connection = config.connection()?;
    let options = config.request_options()?;

    connection
        .segment(config.request_path())
        .method(config.method)
        .send(options)
        .await
}

/// 0 only for a response with a 2xx status; every error is non-zero.
fn exit_code(result: &Result<HttpResponse, SyncError>) -> i32 {
    match result {
        Ok(response) if response.is_success() => 0,
        Ok(_) => 2,
        Err(e) => match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
            ErrorSeverity::Low | ErrorSeverity::High => 1,
        },
    }
}

fn print_body(response: &HttpResponse) {
    let is_json = response
        .header("content-type")
        .map(|ct| ct.contains("json"))
        .unwrap_or(false);

    if is_json {
        match response.json::<serde_json::Value>() {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", response.text()),
            },
            Err(_) => println!("{}", response.text()),
        }
    } else {
        println!("{}", response.text());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting isshub-sync {}", isshub_sync::version());
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = run(&config).await;

    match &result {
        Ok(response) => {
            tracing::info!("✅ {} {}", response.status, response.url);
            println!("{} {}", response.status, response.url);
            print_body(response);
        }
        Err(e) => {
            tracing::error!("❌ Request failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
        }
    }

    let code = exit_code(&result);
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
