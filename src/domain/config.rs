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

//! Persisted connection profile for the manager.
//!
//! The profile lives at `$HOME/.kappital/config` as a single JSON document.
//! `KAPPITALCONFIG` may name an alternate path, honored only when the
//! default file does not exist. The file holds secret key material, so the
//! directory is created at 0700 and the file written at 0600, replacing
//! (not truncating) any stale copy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::infrastructure::constants::{
    CONFIG_DIR_MODE, CONFIG_DIR_NAME, CONFIG_FILE_MODE, CONFIG_FILE_NAME, CONFIG_PATH_ENV,
};
use crate::shared::error::{KappError, Result};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Client connection profile. Field names are the on-disk JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ManagerConfig {
    #[serde(rename = "manager-https-server")]
    pub server: String,

    #[serde(
        rename = "manager-client-certificate-data",
        skip_serializing_if = "String::is_empty"
    )]
    pub client_cert_data: String,

    #[serde(
        rename = "manager-client-key-data",
        skip_serializing_if = "String::is_empty"
    )]
    pub client_key_data: String,

    #[serde(rename = "manager-ca", skip_serializing_if = "String::is_empty")]
    pub ca_data: String,

    #[serde(rename = "manager-skip-verify", skip_serializing_if = "is_false")]
    pub skip_verify: bool,
}

/// Returns `$HOME/.kappital` without creating it.
fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KappError::config_error("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Path to `$HOME/.kappital/config`.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

impl ManagerConfig {
    /// Load the profile. The default path wins whenever it exists; the
    /// `KAPPITALCONFIG` override is consulted only afterwards.
    pub fn load() -> Result<Self> {
        let default_path = config_path()?;
        let path = if default_path.exists() {
            default_path
        } else if let Ok(alt) = std::env::var(CONFIG_PATH_ENV) {
            PathBuf::from(alt)
        } else {
            return Err(KappError::config_error("missing config file"));
        };
        Self::from_path(&path)
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            KappError::config_error(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            KappError::config_error(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Persist the profile at the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Persist the profile at `path`, replacing any stale file so old
    /// secret material never survives past a truncation boundary.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                create_private_dir(dir)?;
            }
        }
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| {
                KappError::config_error(format!("failed to remove {}: {}", path.display(), e))
            })?;
        }
        let data = serde_json::to_string(self).map_err(|e| {
            KappError::config_error(format!("failed to serialize config: {}", e))
        })?;
        write_private_file(path, &data)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(CONFIG_DIR_MODE)
        .create(dir)
        .map_err(|e| KappError::config_error(format!("failed to create {}: {}", dir.display(), e)))
}

#[cfg(unix)]
fn write_private_file(path: &std::path::Path, data: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(CONFIG_FILE_MODE)
        .open(path)
        .map_err(|e| {
            KappError::config_error(format!("failed to create {}: {}", path.display(), e))
        })?;
    file.write_all(data.as_bytes()).map_err(|e| {
        KappError::config_error(format!("failed to write {}: {}", path.display(), e))
    })
}

#[cfg(not(unix))]
fn create_private_dir(dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| KappError::config_error(format!("failed to create {}: {}", dir.display(), e)))
}

#[cfg(not(unix))]
fn write_private_file(path: &std::path::Path, data: &str) -> Result<()> {
    std::fs::write(path, data).map_err(|e| {
        KappError::config_error(format!("failed to write {}: {}", path.display(), e))
    })
}
