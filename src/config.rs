//! Validator Configuration
//!
//! Controls how absent optional fields are treated and how much of a
//! request body may be buffered.

use serde::{Deserialize, Serialize};

/// What to do when an optional field is absent from its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalFieldPolicy {
    /// Skip the absent field and keep evaluating the remaining schemas
    #[default]
    Skip,
    /// Accept the whole request as soon as any optional field is absent.
    ///
    /// Remaining schemas are not evaluated. Kept for callers that depend
    /// on the older behavior.
    AcceptRequest,
}

/// Request validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Handling of absent optional fields (default: skip)
    #[serde(default)]
    pub optional_absent: OptionalFieldPolicy,

    /// Largest body that will be buffered, in bytes (default: 2 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            optional_absent: OptionalFieldPolicy::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ValidatorConfig {
    /// Create a config with the given optional-field policy
    pub fn with_policy(policy: OptionalFieldPolicy) -> Self {
        Self {
            optional_absent: policy,
            ..Default::default()
        }
    }

    /// Replace the body size limit
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
