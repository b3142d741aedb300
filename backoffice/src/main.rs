use std::process::ExitCode;

use clap::Parser;

use backoffice::config::BackofficeConfig;
use backoffice::demo::{self, DemoArgs};
use backoffice::logging;

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 before anything else runs.
    let args = DemoArgs::parse();

    let config = match BackofficeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match demo::run(&args, &config).await {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
