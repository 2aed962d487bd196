// Copyright (C) 2025 Kian Kasad <kian@kasad.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Linter configuration.
//!
//! A configuration file is JSON and is either an object,
//!
//! ```json
//! { "policy": "always" }
//! ```
//!
//! or a bare option list in the style of other JavaScript linters:
//!
//! ```json
//! ["always"]
//! ```

use std::{fmt, path::Path};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::Error;

/// Spacing required between a callee and the parenthesis opening its argument list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// No whitespace is allowed, e.g. `f()`.
    #[default]
    Never,
    /// Whitespace is required, e.g. `f ()`.
    Always,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Never => "never",
            Policy::Always => "always",
        })
    }
}

/// Options for the linter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub policy: Policy,
}

/// Accepted shapes of a configuration file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Object(Config),
    Options([Policy; 1]),
    NoOptions([Policy; 0]),
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        match file {
            ConfigFile::Object(config) => config,
            ConfigFile::Options([policy]) => Config { policy },
            ConfigFile::NoOptions([]) => Config::default(),
        }
    }
}

impl Config {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not one of the accepted configuration shapes.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ConfigFile>(json).map(Config::from)
    }

    /// Reads configuration from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or doesn't contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Config, Policy};

    #[test]
    fn default_is_never() {
        assert_eq!(Policy::Never, Config::default().policy);
        assert_eq!(Config::default(), Config::from_json("{}").unwrap());
        assert_eq!(Config::default(), Config::from_json("[]").unwrap());
    }

    #[test]
    fn object_and_list_forms() {
        let always = Config {
            policy: Policy::Always,
        };
        assert_eq!(always, Config::from_json(r#"{ "policy": "always" }"#).unwrap());
        assert_eq!(always, Config::from_json(r#"["always"]"#).unwrap());
        assert_eq!(Config::default(), Config::from_json(r#"["never"]"#).unwrap());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(Config::from_json(r#"{ "policy": "sometimes" }"#).is_err());
        assert!(Config::from_json(r#"{ "policy": "always", "extra": 1 }"#).is_err());
        assert!(Config::from_json(r#"["always", "never"]"#).is_err());
        assert!(Config::from_json("3").is_err());
    }

    #[test]
    fn display_matches_option_names() {
        assert_eq!("never", Policy::Never.to_string());
        assert_eq!("always", Policy::Always.to_string());
    }
}
