use std::path::Path;

use serde::Serialize;

use crate::error::HarnessError;
use crate::exec::run_command;
use crate::options::TerraformOptions;
use crate::synth::sorted_stack_names;

/// Exit code the planner uses to signal pending changes under
/// `-detailed-exitcode`.
pub const PLAN_PENDING_CHANGES: i32 = 2;

/// Names of the stacks whose post-apply re-plan still showed pending
/// changes, in the (lexicographic) order they were checked. Empty means
/// every stack was idempotent.
#[derive(Debug, Default, Serialize)]
pub struct IdempotencyReport {
    pub checked: Vec<String>,
    pub non_idempotent: Vec<String>,
}

impl IdempotencyReport {
    pub fn is_clean(&self) -> bool {
        self.non_idempotent.is_empty()
    }

    /// Folds a non-empty report into a single error naming every stack.
    pub fn into_result(self) -> Result<(), HarnessError> {
        if self.non_idempotent.is_empty() {
            return Ok(());
        }
        Err(HarnessError::NotIdempotent {
            stacks: self.non_idempotent,
        })
    }
}

/// Re-plans every stack under `stacks_root` against already-applied
/// infrastructure and reports the ones with pending changes.
///
/// Stacks are visited in lexicographic name order. Exit code 0 is clean,
/// exit code 2 marks the stack non-idempotent and checking continues, and
/// any other exit code is a plan failure that aborts immediately with the
/// captured output.
pub fn check_stacks_idempotency(
    options: &TerraformOptions,
    stacks_root: &Path,
) -> Result<IdempotencyReport, HarnessError> {
    let stack_names = sorted_stack_names(stacks_root)?;

    let mut args = vec![
        "plan".to_string(),
        "-input=false".to_string(),
        "-detailed-exitcode".to_string(),
    ];
    args.extend(options.vars_as_args());

    let mut report = IdempotencyReport::default();
    for stack_name in stack_names {
        let stack_dir = stacks_root.join(&stack_name);
        let output = run_command(&stack_dir, &options.terraform_binary, &args)?;

        match output.exit_code {
            0 => {}
            PLAN_PENDING_CHANGES => report.non_idempotent.push(stack_name.clone()),
            code => {
                return Err(HarnessError::CommandFailed {
                    program: options.terraform_binary.clone(),
                    exit_code: code,
                    output: output.combined(),
                });
            }
        }
        report.checked.push(stack_name);
    }

    Ok(report)
}
