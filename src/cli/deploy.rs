use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::parse_var;
use crate::deploy::{apply_all, apply_all_and_idempotent, destroy_all};
use crate::error::HarnessError;
use crate::options::{CDKTF_BINARY, TerraformOptions};

#[derive(Debug, Args)]
pub struct DeployArgs {
    #[arg(value_name = "APP_FILE", help = "cdktf app file (e.g. main.integ.ts)")]
    pub app_file: PathBuf,
    #[arg(long, value_name = "DIR", default_value = ".", help = "Working directory")]
    pub dir: PathBuf,
    #[arg(long, default_value = CDKTF_BINARY, help = "Deploy binary")]
    pub binary: String,
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Terraform variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,
    #[arg(long, help = "Re-plan every stack after apply and fail on pending changes")]
    pub verify: bool,
}

#[derive(Debug, Args)]
pub struct DestroyArgs {
    #[arg(value_name = "APP_FILE", help = "cdktf app file (e.g. main.integ.ts)")]
    pub app_file: PathBuf,
    #[arg(long, value_name = "DIR", default_value = ".", help = "Working directory")]
    pub dir: PathBuf,
    #[arg(long, default_value = CDKTF_BINARY, help = "Destroy binary")]
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
pub struct DeployResponse {
    pub verified: bool,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct DestroyResponse {
    pub output: String,
}

pub fn run_deploy(args: DeployArgs) -> Result<DeployResponse, HarnessError> {
    let options = TerraformOptions {
        terraform_binary: args.binary,
        terraform_dir: args.dir,
        vars: args.vars.into_iter().collect(),
        ..TerraformOptions::default()
    };

    let output = if args.verify {
        apply_all_and_idempotent(&options, &args.app_file)?
    } else {
        apply_all(&options, &args.app_file)?
    };

    Ok(DeployResponse {
        verified: args.verify,
        output,
    })
}

pub fn run_destroy(args: DestroyArgs) -> Result<DestroyResponse, HarnessError> {
    let options = TerraformOptions {
        terraform_binary: args.binary,
        terraform_dir: args.dir,
        vars: args.vars.into_iter().collect(),
        ..TerraformOptions::default()
    };

    let output = destroy_all(&options, &args.app_file)?;
    Ok(DestroyResponse { output })
}
