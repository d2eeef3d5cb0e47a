use clap::Args;
use serde::Serialize;

use crate::error::HarnessError;
use crate::subscription::subscription_id_with_cli;

#[derive(Debug, Args)]
pub struct SubscriptionArgs {
    #[arg(long, default_value = "az", help = "Cloud CLI binary")]
    pub binary: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription_id: String,
}

pub fn run_subscription(args: SubscriptionArgs) -> Result<SubscriptionResponse, HarnessError> {
    let subscription_id = subscription_id_with_cli(&args.binary)?;
    Ok(SubscriptionResponse { subscription_id })
}
