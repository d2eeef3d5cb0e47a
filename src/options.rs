use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Binary expected by the synthesis and apply/destroy invokers.
pub const CDKTF_BINARY: &str = "cdktf";

/// Binary used for per-stack plan passes.
pub const TERRAFORM_BINARY: &str = "terraform";

/// Invocation options shared by every external-tool call in the harness.
///
/// `vars` is a `BTreeMap` so the rendered `--var` arguments come out in key
/// order on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraformOptions {
    pub terraform_binary: String,
    pub terraform_dir: PathBuf,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for TerraformOptions {
    fn default() -> Self {
        Self {
            terraform_binary: CDKTF_BINARY.to_string(),
            terraform_dir: PathBuf::from("."),
            vars: BTreeMap::new(),
            extra_args: Vec::new(),
        }
    }
}

impl TerraformOptions {
    pub fn with_binary(binary: &str) -> Self {
        Self {
            terraform_binary: binary.to_string(),
            ..Self::default()
        }
    }

    /// Renders the variables map as repeated `--var key=value` pairs.
    pub fn vars_as_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.vars.len() * 2);
        for (key, value) in &self.vars {
            args.push("--var".to_string());
            args.push(format!("{key}={value}"));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{CDKTF_BINARY, TerraformOptions};

    #[test]
    fn default_options_target_cdktf_in_current_directory() {
        let options = TerraformOptions::default();
        assert_eq!(options.terraform_binary, CDKTF_BINARY);
        assert_eq!(options.terraform_dir.to_str(), Some("."));
        assert!(options.vars.is_empty());
        assert!(options.extra_args.is_empty());
    }

    #[test]
    fn vars_render_as_flag_value_pairs_in_key_order() {
        let mut vars = BTreeMap::new();
        vars.insert("location".to_string(), "eastus".to_string());
        vars.insert("environment".to_string(), "test".to_string());

        let options = TerraformOptions {
            vars,
            ..TerraformOptions::default()
        };

        assert_eq!(
            options.vars_as_args(),
            vec!["--var", "environment=test", "--var", "location=eastus"]
        );
    }

    #[test]
    fn empty_vars_render_no_arguments() {
        assert!(TerraformOptions::default().vars_as_args().is_empty());
    }

    #[test]
    fn options_round_trip_through_json() {
        let mut options = TerraformOptions::with_binary("terraform");
        options
            .vars
            .insert("subscription_id".to_string(), "abc".to_string());

        let serialized = serde_json::to_string(&options).expect("options should serialize");
        let restored: TerraformOptions =
            serde_json::from_str(&serialized).expect("options should deserialize");

        assert_eq!(restored.terraform_binary, "terraform");
        assert_eq!(restored.vars.get("subscription_id").map(String::as_str), Some("abc"));
    }
}
