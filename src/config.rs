// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration.
//!
//! Environment variables provide the defaults; command-line flags are applied on top by the
//! binary.

use std::env::{self, VarError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::jj::JjCommand;
use crate::parser::DEFAULT_BATCH_SIZE;

pub const ENV_JJ: &str = "JJGRAPH_JJ";
pub const ENV_REVSET: &str = "JJGRAPH_REVSET";
pub const ENV_BATCH_SIZE: &str = "JJGRAPH_BATCH_SIZE";
pub const ENV_DEFAULT_REMOTE: &str = "JJGRAPH_DEFAULT_REMOTE";

const DEFAULT_JJ: &str = "jj";
const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub jj_program: String,
    pub repo_dir: PathBuf,
    pub revset: Option<String>,
    pub limit: Option<usize>,
    pub batch_size: usize,
    /// Remote used by the bookmark panel's track action.
    pub default_remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jj_program: DEFAULT_JJ.to_string(),
            repo_dir: PathBuf::from("."),
            revset: None,
            limit: None,
            batch_size: DEFAULT_BATCH_SIZE,
            default_remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Builds a config from an arbitrary variable source. Unset or blank variables keep their
    /// defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, VarError>,
    ) -> Result<Self, ConfigError> {
        let read = |name: &str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
                    name: name.to_string(),
                    value: "<non-unicode>".to_string(),
                }),
            }
        };

        let mut config = Self::default();
        if let Some(program) = read(ENV_JJ)? {
            config.jj_program = program;
        }
        config.revset = read(ENV_REVSET)?;
        if let Some(raw) = read(ENV_BATCH_SIZE)? {
            config.batch_size = parse_batch_size(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                name: ENV_BATCH_SIZE.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(remote) = read(ENV_DEFAULT_REMOTE)? {
            config.default_remote = remote;
        }
        Ok(config)
    }

    pub fn log_command(&self) -> JjCommand {
        JjCommand::Log {
            revset: self.revset.clone(),
            limit: self.limit,
        }
    }
}

/// Batch sizes must be positive.
pub fn parse_batch_size(raw: &str) -> Option<usize> {
    raw.trim().parse().ok().filter(|&size: &usize| size > 0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use rstest::rstest;

    use super::{parse_batch_size, Config, ConfigError, ENV_BATCH_SIZE};
    use crate::jj::JjCommand;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned().ok_or(VarError::NotPresent))
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.jj_program, "jj");
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.default_remote, "origin");
        assert_eq!(
            config.log_command(),
            JjCommand::Log {
                revset: None,
                limit: None,
            }
        );
    }

    #[test]
    fn env_overrides_defaults_and_blank_values_are_ignored() {
        let config = config_from(&[
            ("JJGRAPH_JJ", "/opt/jj"),
            ("JJGRAPH_REVSET", " trunk()::@ "),
            ("JJGRAPH_BATCH_SIZE", "7"),
            ("JJGRAPH_DEFAULT_REMOTE", "  "),
        ])
        .expect("config");
        assert_eq!(config.jj_program, "/opt/jj");
        assert_eq!(config.revset.as_deref(), Some("trunk()::@"));
        assert_eq!(config.batch_size, 7);
        assert_eq!(config.default_remote, "origin");
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("many")]
    fn invalid_batch_size_is_rejected(#[case] raw: &str) {
        let err = config_from(&[(ENV_BATCH_SIZE, raw)]).unwrap_err();
        assert_eq!(err.to_string(), format!("invalid env JJGRAPH_BATCH_SIZE={raw}"));
    }

    #[test]
    fn batch_size_parser_accepts_positive_numbers() {
        assert_eq!(parse_batch_size(" 12 "), Some(12));
        assert_eq!(parse_batch_size("0"), None);
    }
}
