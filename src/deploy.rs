use std::path::Path;

use crate::error::HarnessError;
use crate::exec::run_checked;
use crate::idempotency::check_stacks_idempotency;
use crate::options::{TERRAFORM_BINARY, TerraformOptions};
use crate::synth::{app_argument, require_cdktf, stacks_dir, tempstacks_dir};

/// Applies every synthesized stack with auto-approve.
///
/// Variables are appended after the fixed argument list, as repeated
/// `--var key=value` pairs.
pub fn apply_all(options: &TerraformOptions, app_file: &Path) -> Result<String, HarnessError> {
    run_all(options, app_file, &["deploy", "*", "--auto-approve"])
}

/// Destroys every synthesized stack, skipping re-synthesis.
pub fn destroy_all(options: &TerraformOptions, app_file: &Path) -> Result<String, HarnessError> {
    run_all(
        options,
        app_file,
        &["destroy", "*", "--skip-synth", "--auto-approve"],
    )
}

/// Applies every stack, then re-plans each one to confirm the apply was
/// idempotent. A non-empty report becomes a single error naming every
/// drifting stack.
pub fn apply_all_and_idempotent(
    options: &TerraformOptions,
    app_file: &Path,
) -> Result<String, HarnessError> {
    let output = apply_all(options, app_file)?;

    let plan_options = TerraformOptions {
        terraform_binary: TERRAFORM_BINARY.to_string(),
        ..options.clone()
    };
    let report = check_stacks_idempotency(&plan_options, &stacks_dir(app_file))?;
    report.into_result()?;

    Ok(output)
}

fn run_all(
    options: &TerraformOptions,
    app_file: &Path,
    action: &[&str],
) -> Result<String, HarnessError> {
    require_cdktf(options)?;

    let output_dir = tempstacks_dir(app_file);
    let mut args: Vec<String> = action.iter().map(|part| (*part).to_string()).collect();
    args.push("--app".to_string());
    args.push(app_argument(app_file));
    args.push("--output".to_string());
    args.push(output_dir.display().to_string());
    args.extend(options.extra_args.iter().cloned());
    args.extend(options.vars_as_args());

    let output = run_checked(&options.terraform_dir, &options.terraform_binary, &args)?;
    Ok(output.combined())
}
