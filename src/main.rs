use std::process::ExitCode;

use cdkharness::cli::{Cli, Commands};
use cdkharness::error::HarnessError;
use clap::Parser;

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let serialized = serde_json::to_string_pretty(&error.to_error_response())
                .unwrap_or_else(|_| {
                    "{\"error\":{\"type\":\"serialization_error\",\"message\":\"Failed to serialize error response\"}}"
                        .to_string()
                });
            println!("{serialized}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, HarnessError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Synth(args) => {
            let response = cdkharness::cli::synth::run_synth(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Deploy(args) => {
            let response = cdkharness::cli::deploy::run_deploy(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Destroy(args) => {
            let response = cdkharness::cli::deploy::run_destroy(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Verify(args) => {
            let response = cdkharness::cli::verify::run_verify(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Randomize(args) => {
            let response = cdkharness::cli::randomize::run_randomize(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Output(args) => {
            let response = cdkharness::cli::output::run_output(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
        Commands::Subscription(args) => {
            let response = cdkharness::cli::subscription::run_subscription(args)?;
            serde_json::to_string_pretty(&response)
                .map_err(|source| HarnessError::ResponseSerialization { source })
        }
    }
}
