use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::HarnessError;
use crate::options::{CDKTF_BINARY, TerraformOptions};
use crate::synth::{stacks_dir, synth_all};

#[derive(Debug, Args)]
pub struct SynthArgs {
    #[arg(value_name = "APP_FILE", help = "cdktf app file (e.g. main.integ.ts)")]
    pub app_file: PathBuf,
    #[arg(long, value_name = "DIR", default_value = ".", help = "Working directory")]
    pub dir: PathBuf,
    #[arg(long, default_value = CDKTF_BINARY, help = "Synthesis binary")]
    pub binary: String,
}

#[derive(Debug, Serialize)]
pub struct SynthResponse {
    pub stacks_dir: String,
    pub output: String,
}

pub fn run_synth(args: SynthArgs) -> Result<SynthResponse, HarnessError> {
    let options = TerraformOptions {
        terraform_binary: args.binary,
        terraform_dir: args.dir,
        ..TerraformOptions::default()
    };

    let output = synth_all(&options, &args.app_file)?;
    Ok(SynthResponse {
        stacks_dir: stacks_dir(&args.app_file).display().to_string(),
        output,
    })
}
