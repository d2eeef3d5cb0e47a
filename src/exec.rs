use std::path::Path;

use xshell::Shell;

use crate::error::HarnessError;

/// Captured result of one external-tool invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr, for error messages and test reports.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Runs `program` with `args` in `dir`, blocking until it exits.
///
/// A non-zero exit is data, not an error; callers classify exit codes
/// themselves. Only a failure to spawn the process is an error. The command
/// line is echoed to stderr, which doubles as the harness progress trace.
pub fn run_command(dir: &Path, program: &str, args: &[String]) -> Result<CommandOutput, HarnessError> {
    let sh = Shell::new().map_err(|error| HarnessError::CommandSpawn {
        program: program.to_string(),
        message: error.to_string(),
    })?;
    let _dir = sh.push_dir(dir);

    if args.is_empty() {
        eprintln!("$ {program}");
    } else {
        eprintln!("$ {program} {}", args.join(" "));
    }

    let output = sh
        .cmd(program)
        .args(args)
        .ignore_status()
        .output()
        .map_err(|error| HarnessError::CommandSpawn {
            program: program.to_string(),
            message: error.to_string(),
        })?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs `program` and fails unless it exited zero, folding the captured
/// output into the error.
pub fn run_checked(dir: &Path, program: &str, args: &[String]) -> Result<CommandOutput, HarnessError> {
    let output = run_command(dir, program, args)?;
    if !output.success() {
        return Err(HarnessError::CommandFailed {
            program: program.to_string(),
            exit_code: output.exit_code,
            output: output.combined(),
        });
    }
    Ok(output)
}
