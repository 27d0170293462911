// Copyright 2025 The Kappital Authors.
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

//! Argument validation shared by every subcommand.

use std::sync::LazyLock;

use regex::Regex;

use crate::infrastructure::constants::MAX_INPUT_LENGTH;
use crate::shared::error::{KappError, Result};

/// One or more `-` separated segments; the first starts with a letter and
/// is at least two characters, the rest are non-empty alphanumerics.
static CLUSTER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[A-Za-z][A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("cluster name regex")
});

/// Typed flag value carried through validation.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Str(String),
    Bool(bool),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

/// Validate a bag of named flag values. Every string is capped at 64
/// bytes; `cluster` additionally obeys the cluster-name grammar and
/// `output` the output-format whitelist. Unknown names and booleans have
/// no extra rules.
pub fn validate_args(args: &[(&str, ArgValue)]) -> Result<()> {
    for (name, value) in args {
        let ArgValue::Str(value) = value else {
            continue;
        };
        if value.len() > MAX_INPUT_LENGTH {
            return Err(KappError::input(format!(
                "the length of input [{}] exceeds {}",
                name, MAX_INPUT_LENGTH
            )));
        }
        match *name {
            "cluster" => {
                if !is_valid_cluster_name(value) {
                    return Err(KappError::input(format!(
                        "cluster name [{}] is invalid",
                        value
                    )));
                }
            }
            "output" => {
                if !is_valid_output_format(value) {
                    return Err(KappError::input(format!(
                        "output format [{}] is not supported",
                        value
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Empty names select the default cluster and are accepted as-is.
pub fn is_valid_cluster_name(name: &str) -> bool {
    name.is_empty() || CLUSTER_NAME_RE.is_match(name)
}

/// Case-insensitive membership in `{yaml, json, ""}`.
pub fn is_valid_output_format(format: &str) -> bool {
    matches!(format.to_lowercase().as_str(), "yaml" | "json" | "")
}

/// Decimal integer in `[0, 65535]`.
pub fn is_valid_port(port: &str) -> bool {
    !port.is_empty() && port.parse::<u32>().map(|p| p <= 65535).unwrap_or(false)
}
