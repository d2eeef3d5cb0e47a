use std::path::Path;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("Failed to read or write file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}' as JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration file '{path}' must contain a JSON object at the root")]
    NotAnObject { path: String },

    #[error("{expected} must be set as the terraform binary to use this function [ binary: {actual} ]")]
    InvalidBinary { expected: String, actual: String },

    #[error("Failed to spawn '{program}': {message}")]
    CommandSpawn { program: String, message: String },

    #[error("'{program}' exited with code {exit_code}:\n{output}")]
    CommandFailed {
        program: String,
        exit_code: i32,
        output: String,
    },

    #[error("terraform configuration not idempotent for stacks: {}", stacks.join(", "))]
    NotIdempotent { stacks: Vec<String> },

    #[error("No applied stack provides a non-empty output '{variable}'")]
    OutputNotFound { variable: String },

    #[error("No subscription id available: ARM_SUBSCRIPTION_ID is unset and 'az account show' returned nothing")]
    SubscriptionUnavailable,

    #[error("Resource '{resource}' has no readable property '{property}'")]
    PropertyMissing { resource: String, property: String },

    #[error("Failed to serialize response JSON: {source}")]
    ResponseSerialization {
        #[source]
        source: serde_json::Error,
    },
}

impl HarnessError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::InvalidBinary { expected, .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "invalid_binary".to_string(),
                    message: self.to_string(),
                    suggestion: Some(format!(
                        "Set terraform_binary to '{expected}' before invoking this operation"
                    )),
                },
            },
            Self::Io { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "io_error".to_string(),
                    message: self.to_string(),
                    suggestion: None,
                },
            },
            Self::Parse { .. } | Self::NotAnObject { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "parse_error".to_string(),
                    message: self.to_string(),
                    suggestion: Some(
                        "Re-run synthesis; the stack configuration must be a JSON object"
                            .to_string(),
                    ),
                },
            },
            Self::CommandSpawn { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "command_spawn_failed".to_string(),
                    message: self.to_string(),
                    suggestion: Some(
                        "Check that the tool is installed and on PATH".to_string(),
                    ),
                },
            },
            Self::CommandFailed { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "command_failed".to_string(),
                    message: self.to_string(),
                    suggestion: None,
                },
            },
            Self::NotIdempotent { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "not_idempotent".to_string(),
                    message: self.to_string(),
                    suggestion: Some(
                        "Inspect 'terraform plan' output in the named stack directories"
                            .to_string(),
                    ),
                },
            },
            Self::OutputNotFound { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "output_not_found".to_string(),
                    message: self.to_string(),
                    suggestion: Some(
                        "Apply the stacks first; output values are read from state".to_string(),
                    ),
                },
            },
            Self::SubscriptionUnavailable => ErrorResponse {
                error: ErrorBody {
                    r#type: "subscription_unavailable".to_string(),
                    message: self.to_string(),
                    suggestion: Some(
                        "Export ARM_SUBSCRIPTION_ID or run 'az login' first".to_string(),
                    ),
                },
            },
            Self::PropertyMissing { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "property_missing".to_string(),
                    message: self.to_string(),
                    suggestion: None,
                },
            },
            Self::ResponseSerialization { .. } => ErrorResponse {
                error: ErrorBody {
                    r#type: "serialization_error".to_string(),
                    message: self.to_string(),
                    suggestion: None,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub r#type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
