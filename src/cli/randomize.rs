use std::path::PathBuf;

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::HarnessError;
use crate::mutate::{DEFAULT_TARGET_TYPES, MutationSummary, randomize_unique_resources_with};
use crate::naming::DEFAULT_NAME_LENGTH;

#[derive(Debug, Args)]
pub struct RandomizeArgs {
    #[arg(value_name = "CONFIG_FILE", help = "Synthesized cdk.tf.json to rewrite in place")]
    pub config_file: PathBuf,
    #[arg(
        long = "type",
        value_name = "RESOURCE_TYPE",
        help = "Resource type to randomize (repeatable; defaults to resource groups and storage accounts)"
    )]
    pub types: Vec<String>,
    #[arg(long, default_value_t = DEFAULT_NAME_LENGTH, help = "Generated name length")]
    pub length: usize,
    #[arg(long, help = "Seed for reproducible names")]
    pub seed: Option<u64>,
}

pub fn run_randomize(args: RandomizeArgs) -> Result<MutationSummary, HarnessError> {
    let targets: Vec<&str> = if args.types.is_empty() {
        DEFAULT_TARGET_TYPES.to_vec()
    } else {
        args.types.iter().map(String::as_str).collect()
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    randomize_unique_resources_with(&args.config_file, &targets, args.length, &mut rng)
}
