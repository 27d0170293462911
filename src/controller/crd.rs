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

//! ServicePackage Custom Resource Definition
//!
//! A ServicePackage is the in-cluster record of a deployed cloud native
//! service: the package descriptor plus the raw resources the manager
//! shipped into the cluster.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Specification of a deployed service package.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "core.kappital.io",
    version = "v1alpha1",
    kind = "ServicePackage",
    plural = "servicepackages",
    shortname = "sp",
    status = "ServicePackageStatus",
    namespaced,
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.version"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackageSpec {
    /// Package version as published to the manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Serialized manifests of the package payload
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// Descriptor fields the engine passes through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<serde_json::Value>,
}

/// Observed state of a service package.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackageStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::CustomResourceExt;

    #[test]
    fn test_crd_identity() {
        let crd = ServicePackage::crd();
        assert_eq!(crd.spec.group, "core.kappital.io");
        assert_eq!(crd.spec.names.kind, "ServicePackage");
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn test_spec_round_trip() {
        let spec = ServicePackageSpec {
            version: Some("0.1.0".to_string()),
            resources: vec!["apiVersion: v1".to_string()],
            descriptor: None,
        };
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: ServicePackageSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
