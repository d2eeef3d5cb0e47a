use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::parse_var;
use crate::error::HarnessError;
use crate::idempotency::check_stacks_idempotency;
use crate::options::{TERRAFORM_BINARY, TerraformOptions};

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[arg(
        value_name = "STACKS_DIR",
        help = "Directory with one subdirectory per synthesized stack"
    )]
    pub stacks_dir: PathBuf,
    #[arg(long, default_value = TERRAFORM_BINARY, help = "Plan binary")]
    pub binary: String,
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Terraform variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub checked: Vec<String>,
}

pub fn run_verify(args: VerifyArgs) -> Result<VerifyResponse, HarnessError> {
    let options = TerraformOptions {
        terraform_binary: args.binary,
        vars: args.vars.into_iter().collect(),
        ..TerraformOptions::default()
    };

    let report = check_stacks_idempotency(&options, &args.stacks_dir)?;
    let checked = report.checked.clone();
    report.into_result()?;

    Ok(VerifyResponse { checked })
}
