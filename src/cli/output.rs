use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::HarnessError;
use crate::options::{TERRAFORM_BINARY, TerraformOptions};
use crate::outputs::output_value;

#[derive(Debug, Args)]
pub struct OutputArgs {
    #[arg(
        value_name = "STACKS_DIR",
        help = "Directory with one subdirectory per synthesized stack"
    )]
    pub stacks_dir: PathBuf,
    #[arg(value_name = "VARIABLE", help = "Output variable to read")]
    pub variable: String,
    #[arg(long, default_value = TERRAFORM_BINARY, help = "Output reader binary")]
    pub binary: String,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub variable: String,
    pub stack: String,
    pub value: String,
}

pub fn run_output(args: OutputArgs) -> Result<OutputResponse, HarnessError> {
    let options = TerraformOptions {
        terraform_binary: args.binary,
        ..TerraformOptions::default()
    };

    match output_value(&options, &args.stacks_dir, &args.variable)? {
        Some(found) => Ok(OutputResponse {
            variable: args.variable,
            stack: found.stack,
            value: found.value,
        }),
        None => Err(HarnessError::OutputNotFound {
            variable: args.variable,
        }),
    }
}
