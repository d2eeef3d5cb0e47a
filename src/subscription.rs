use std::path::Path;

use crate::error::HarnessError;
use crate::exec::run_checked;

/// Environment variable naming the target subscription.
pub const SUBSCRIPTION_ENV: &str = "ARM_SUBSCRIPTION_ID";

/// Resolves the subscription to run assertions against.
///
/// `ARM_SUBSCRIPTION_ID` wins when set and non-empty; otherwise the logged-in
/// account is queried through the `az` CLI.
pub fn subscription_id() -> Result<String, HarnessError> {
    subscription_id_with_cli("az")
}

/// [`subscription_id`] with an explicit CLI program.
pub fn subscription_id_with_cli(az_program: &str) -> Result<String, HarnessError> {
    resolve(std::env::var(SUBSCRIPTION_ENV).ok().as_deref(), az_program)
}

fn resolve(env_value: Option<&str>, az_program: &str) -> Result<String, HarnessError> {
    if let Some(value) = env_value
        && !value.trim().is_empty()
    {
        return Ok(value.trim().to_string());
    }

    let args: Vec<String> = ["account", "show", "--query", "id", "-o", "tsv"]
        .iter()
        .map(|part| (*part).to_string())
        .collect();
    let output = run_checked(Path::new("."), az_program, &args)?;

    let id = output.stdout.trim().to_string();
    if id.is_empty() {
        return Err(HarnessError::SubscriptionUnavailable);
    }
    Ok(id)
}
