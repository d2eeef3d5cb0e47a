use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::exec::run_checked;
use crate::options::{CDKTF_BINARY, TerraformOptions};

/// Output directory for synthesized stacks, adjacent to the app file.
pub fn tempstacks_dir(app_file: &Path) -> PathBuf {
    let dir = app_file.parent().unwrap_or_else(|| Path::new("."));
    dir.join(".tempstacks")
}

/// Directory holding one subdirectory per rendered stack.
pub fn stacks_dir(app_file: &Path) -> PathBuf {
    tempstacks_dir(app_file).join("stacks")
}

/// Stack directory names under `stacks_root`, sorted lexicographically.
/// Plain files next to the stack directories are ignored.
pub fn sorted_stack_names(stacks_root: &Path) -> Result<Vec<String>, HarnessError> {
    let mut names = Vec::new();
    let entries = fs::read_dir(stacks_root).map_err(|error| HarnessError::io(stacks_root, error))?;
    for entry in entries {
        let entry = entry.map_err(|error| HarnessError::io(stacks_root, error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| HarnessError::io(&entry.path(), error))?;
        if file_type.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

pub(crate) fn require_cdktf(options: &TerraformOptions) -> Result<(), HarnessError> {
    if options.terraform_binary != CDKTF_BINARY {
        return Err(HarnessError::InvalidBinary {
            expected: CDKTF_BINARY.to_string(),
            actual: options.terraform_binary.clone(),
        });
    }
    Ok(())
}

pub(crate) fn app_argument(app_file: &Path) -> String {
    format!("npx ts-node {}", app_file.display())
}

/// Renders every stack defined by `app_file` into `.tempstacks`.
///
/// Single attempt; a non-zero exit surfaces the combined output. The binary
/// is validated before anything is spawned.
pub fn synth_all(options: &TerraformOptions, app_file: &Path) -> Result<String, HarnessError> {
    require_cdktf(options)?;

    let output_dir = tempstacks_dir(app_file);
    let mut args = vec![
        "synth".to_string(),
        "--app".to_string(),
        app_argument(app_file),
        "--output".to_string(),
        output_dir.display().to_string(),
    ];
    args.extend(options.extra_args.iter().cloned());

    let output = run_checked(&options.terraform_dir, &options.terraform_binary, &args)?;
    Ok(output.combined())
}
