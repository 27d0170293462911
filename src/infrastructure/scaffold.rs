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

//! Embedded service package scaffold for `kappctl init`.
//!
//! The scaffold tree ships inside the binary; copying it materializes the
//! files under `<dir>/<name>` with private-ish modes (directories 0750,
//! files 0600). The package descriptor is rewritten on the way through a
//! YAML to JSON to YAML round trip, which normalizes key ordering and the
//! empty-sub-object representation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::infrastructure::constants::{
    SCAFFOLD_DIR_MODE, SCAFFOLD_FILE_MODE, SCAFFOLD_MAX_DEPTH, SCAFFOLD_METADATA_FILE,
};
use crate::shared::error::{KappError, Result};

/// One file of the embedded scaffold, with its path relative to the
/// scaffold root.
#[derive(Debug, Clone, Copy)]
pub struct ScaffoldEntry {
    pub path: &'static str,
    pub content: &'static str,
}

/// The `kappital-demo` scaffold tree bundled with the binary.
pub const SCAFFOLD: &[ScaffoldEntry] = &[
    ScaffoldEntry {
        path: "metadata.yaml",
        content: include_str!("../../scaffold/kappital-demo/metadata.yaml"),
    },
    ScaffoldEntry {
        path: "manifests/crd.yaml",
        content: include_str!("../../scaffold/kappital-demo/manifests/crd.yaml"),
    },
    ScaffoldEntry {
        path: "manifests/operator.yaml",
        content: include_str!("../../scaffold/kappital-demo/manifests/operator.yaml"),
    },
    ScaffoldEntry {
        path: "capability/capability.yaml",
        content: include_str!("../../scaffold/kappital-demo/capability/capability.yaml"),
    },
];

/// Service package descriptor stored in `metadata.yaml`. Unknown keys are
/// kept so the rewrite never drops descriptor fields it does not know.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Copy `entries` into `target`, creating directories as needed. Paths
/// nested more than five directories deep are rejected before anything is
/// written for them; files already committed stay on disk.
pub fn copy_scaffold(
    entries: &[ScaffoldEntry],
    target: &Path,
    name: &str,
    version: &str,
) -> Result<()> {
    for entry in entries {
        let relative = Path::new(entry.path);
        if relative.components().count() > SCAFFOLD_MAX_DEPTH {
            return Err(KappError::Scaffold("the directory is too deep".to_string()));
        }

        let dest = target.join(relative);
        if let Some(dir) = dest.parent() {
            create_scaffold_dirs(dir)?;
        }

        let content = if entry.path == SCAFFOLD_METADATA_FILE {
            rewrite_metadata(entry.content, name, version)?
        } else {
            entry.content.to_string()
        };
        write_scaffold_file(&dest, &content)?;
    }
    Ok(())
}

/// Rewrite the package descriptor with the user-supplied name. The
/// version argument is accepted for interface stability but not applied;
/// only `name` is rewritten.
pub fn rewrite_metadata(content: &str, name: &str, _version: &str) -> Result<String> {
    let mut meta: PackageMetadata = serde_yaml::from_str(content)?;
    meta.name = name.to_string();
    // YAML -> JSON -> YAML on purpose: the dual encode normalizes key
    // ordering and empty sub-objects.
    let json = serde_json::to_value(&meta)?;
    Ok(serde_yaml::to_string(&json)?)
}

#[cfg(unix)]
fn create_scaffold_dirs(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.exists() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(SCAFFOLD_DIR_MODE)
        .create(dir)
        .map_err(|e| KappError::Scaffold(format!("failed to create {}: {}", dir.display(), e)))
}

#[cfg(unix)]
fn write_scaffold_file(path: &Path, content: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(SCAFFOLD_FILE_MODE)
        .open(path)
        .map_err(|e| KappError::Scaffold(format!("failed to create {}: {}", path.display(), e)))?;
    file.write_all(content.as_bytes())
        .map_err(|e| KappError::Scaffold(format!("failed to write {}: {}", path.display(), e)))
}

#[cfg(not(unix))]
fn create_scaffold_dirs(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| KappError::Scaffold(format!("failed to create {}: {}", dir.display(), e)))
}

#[cfg(not(unix))]
fn write_scaffold_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .map_err(|e| KappError::Scaffold(format!("failed to write {}: {}", path.display(), e)))
}
