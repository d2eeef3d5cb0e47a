use std::path::Path;

use serde::Serialize;

use crate::error::HarnessError;
use crate::exec::run_command;
use crate::options::TerraformOptions;
use crate::synth::sorted_stack_names;

/// An output value together with the stack that provided it.
#[derive(Debug, Serialize)]
pub struct StackOutput {
    pub stack: String,
    pub value: String,
}

/// Reads `variable` from the applied stacks under `stacks_root`.
///
/// Stacks are visited in lexicographic name order and the first non-empty
/// answer wins. A stack whose reader exits non-zero does not define the
/// output and is skipped, as is an empty answer. `Ok(None)` means no stack
/// carries the output.
pub fn output_value(
    options: &TerraformOptions,
    stacks_root: &Path,
    variable: &str,
) -> Result<Option<StackOutput>, HarnessError> {
    let args = vec![
        "output".to_string(),
        "-no-color".to_string(),
        "-raw".to_string(),
        variable.to_string(),
    ];

    for stack_name in sorted_stack_names(stacks_root)? {
        let stack_dir = stacks_root.join(&stack_name);
        let output = run_command(&stack_dir, &options.terraform_binary, &args)?;
        if !output.success() {
            continue;
        }

        let value = output.stdout.trim().to_string();
        if !value.is_empty() {
            return Ok(Some(StackOutput {
                stack: stack_name,
                value,
            }));
        }
    }

    Ok(None)
}
