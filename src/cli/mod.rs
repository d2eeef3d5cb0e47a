use clap::{Parser, Subcommand};

pub mod deploy;
pub mod output;
pub mod randomize;
pub mod subscription;
pub mod synth;
pub mod verify;

#[derive(Debug, Parser)]
#[command(name = "cdkharness")]
#[command(about = "Integration-test harness for cdktf stacks")]
#[command(
    long_about = "Integration-test harness for cdktf stacks. Canonical flow: synth -> randomize -> deploy --verify -> destroy, with verify available standalone against already-applied stacks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Synthesize all stacks from a cdktf app file into .tempstacks")]
    Synth(synth::SynthArgs),
    #[command(about = "Apply all synthesized stacks, optionally verifying idempotency")]
    Deploy(deploy::DeployArgs),
    #[command(about = "Destroy all synthesized stacks")]
    Destroy(deploy::DestroyArgs),
    #[command(about = "Re-plan every stack and report the non-idempotent ones")]
    Verify(verify::VerifyArgs),
    #[command(about = "Randomize globally-visible resource names in a stack configuration")]
    Randomize(randomize::RandomizeArgs),
    #[command(about = "Read an output value from the applied stacks")]
    Output(output::OutputArgs),
    #[command(about = "Resolve the subscription id assertions run against")]
    Subscription(subscription::SubscriptionArgs),
}

/// Parses a repeated `--var key=value` argument.
pub(crate) fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
