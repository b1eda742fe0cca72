//! Runtime settings for the contract engine.

use crate::{
    DEFAULT_GAS_LIMIT, MAX_ARRAY_SIZE, MAX_INVOCATION_STACK_SIZE, MAX_ITEM_SIZE,
    MAX_SERIALIZE_DEPTH, MAX_STACK_SIZE, MAX_STEPS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid TOML for [`VmSettings`].
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Tunable limits of one engine instance.
///
/// Missing keys fall back to the protocol defaults, so an empty document is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmSettings {
    /// Non-push opcodes allowed per invocation.
    pub max_steps: usize,
    /// Gas budget in fixed-point units.
    pub gas_limit: i64,
    pub max_stack_size: usize,
    pub max_item_size: usize,
    pub max_invocation_stack_size: usize,
    pub max_array_size: usize,
    pub max_serialize_depth: usize,
}

impl Default for VmSettings {
    fn default() -> Self {
        Self {
            max_steps: MAX_STEPS,
            gas_limit: DEFAULT_GAS_LIMIT,
            max_stack_size: MAX_STACK_SIZE,
            max_item_size: MAX_ITEM_SIZE,
            max_invocation_stack_size: MAX_INVOCATION_STACK_SIZE,
            max_array_size: MAX_ARRAY_SIZE,
            max_serialize_depth: MAX_SERIALIZE_DEPTH,
        }
    }
}

impl VmSettings {
    /// Parses settings from a TOML document.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a TOML settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&document)
    }

    /// Rejects settings that would make every script fault.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gas_limit < 0 {
            return Err(ConfigError::InvalidValue {
                field: "gas_limit",
                message: format!("must not be negative, got {}", self.gas_limit),
            });
        }
        if self.max_invocation_stack_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_invocation_stack_size",
                message: "must allow at least one context".to_string(),
            });
        }
        if self.max_serialize_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_serialize_depth",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
