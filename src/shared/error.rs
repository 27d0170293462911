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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, KappError>;

#[derive(Error, Debug)]
pub enum KappError {
    #[error("{0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{op} {name} failed, err: {source}")]
    Transport {
        op: String,
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} {name} failed, statusCode: {code}, detail: {detail}")]
    Status {
        op: String,
        name: String,
        code: u16,
        detail: String,
    },

    #[error("TLS material error: {0}")]
    TlsMaterial(String),

    #[error("Scaffold error: {0}")]
    Scaffold(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl KappError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::Config(context.into())
    }

    pub fn transport(
        op: impl Into<String>,
        name: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            op: op.into(),
            name: name.into(),
            source,
        }
    }

    /// Stamp the calling command's operation and subject onto a transport
    /// error so the surfaced message reads `<op> <name> failed, err: …`.
    pub fn with_op(self, op: &str, name: &str) -> Self {
        match self {
            KappError::Transport { source, .. } => KappError::Transport {
                op: op.to_string(),
                name: name.to_string(),
                source,
            },
            other => other,
        }
    }

    pub fn status(
        op: impl Into<String>,
        name: impl Into<String>,
        code: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self::Status {
            op: op.into(),
            name: name.into(),
            code,
            detail: detail.into(),
        }
    }
}
