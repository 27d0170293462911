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

//! Server document shapes carried end-to-end.
//!
//! The manager owns these types; the client reads a handful of fields and
//! passes everything else through untouched. Unknown keys are kept in a
//! flattened tail so a decode/encode cycle never drops server data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::Result;

/// Display phase of a service, derived from the server's phase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Succeeded,
    Pending,
    Unknown,
}

impl Phase {
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Succeeded" => Phase::Succeeded,
            "Pending" => Phase::Pending,
            _ => Phase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Succeeded => "Succeeded",
            Phase::Pending => "Pending",
            Phase::Unknown => "Unknown",
        }
    }

    /// Status shown for an instance of a service in this phase. A
    /// `Succeeded` service leaves instance statuses untouched; `Pending`
    /// and everything else override them.
    pub fn overlay_status(&self, status: &str) -> String {
        match self {
            Phase::Succeeded => status.to_string(),
            Phase::Pending => "Pending".to_string(),
            Phase::Unknown => "Unknown".to_string(),
        }
    }
}

/// A CloudNativeService document as returned by the manager.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDoc {
    pub name: String,
    pub namespace: String,
    pub cluster_name: String,
    pub phase: String,
    pub message: String,
    pub create_time: String,
    pub spec: Value,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl ServiceDoc {
    pub fn display_phase(&self) -> Phase {
        Phase::parse(&self.phase)
    }
}

/// A service instance document as returned by the manager.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceDoc {
    pub name: String,
    pub namespace: String,
    pub service_name: String,
    pub cluster_name: String,
    pub status: String,
    pub create_time: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

/// Decode a response body that may hold either a list of services or a
/// single service document.
pub fn decode_services(body: &[u8]) -> Result<Vec<ServiceDoc>> {
    match serde_json::from_slice::<Vec<ServiceDoc>>(body) {
        Ok(list) => Ok(list),
        Err(_) => Ok(vec![serde_json::from_slice::<ServiceDoc>(body)?]),
    }
}

pub fn decode_instances(body: &[u8]) -> Result<Vec<InstanceDoc>> {
    match serde_json::from_slice::<Vec<InstanceDoc>>(body) {
        Ok(list) => Ok(list),
        Err(_) => Ok(vec![serde_json::from_slice::<InstanceDoc>(body)?]),
    }
}

/// Build the hybrid document for `get instance -o`: the service document
/// with `spec.customResources` replaced by its decoded instances, each
/// instance status overlaid with the service phase rule.
pub fn service_with_instances(service: &ServiceDoc, instances: &[InstanceDoc]) -> Result<Value> {
    let phase = service.display_phase();
    let resources = instances
        .iter()
        .map(|ins| {
            let mut ins = ins.clone();
            ins.status = phase.overlay_status(&ins.status);
            serde_json::to_value(ins)
        })
        .collect::<std::result::Result<Vec<Value>, _>>()?;

    let mut doc = serde_json::to_value(service)?;
    if let Value::Object(obj) = &mut doc {
        let spec = obj
            .entry("spec")
            .or_insert_with(|| Value::Object(Default::default()));
        if !spec.is_object() {
            *spec = Value::Object(Default::default());
        }
        if let Value::Object(spec) = spec {
            spec.insert("customResources".to_string(), Value::Array(resources));
        }
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse() {
        assert_eq!(Phase::parse("Succeeded"), Phase::Succeeded);
        assert_eq!(Phase::parse("Pending"), Phase::Pending);
        assert_eq!(Phase::parse("Failed"), Phase::Unknown);
        assert_eq!(Phase::parse(""), Phase::Unknown);
    }

    #[test]
    fn test_phase_overlay() {
        assert_eq!(Phase::Succeeded.overlay_status("Running"), "Running");
        assert_eq!(Phase::Pending.overlay_status("Running"), "Pending");
        assert_eq!(Phase::Unknown.overlay_status("Running"), "Unknown");
    }

    #[test]
    fn test_decode_single_or_list() {
        let single = br#"{"name":"foo","phase":"Succeeded"}"#;
        let docs = decode_services(single).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "foo");

        let list = br#"[{"name":"a"},{"name":"b"}]"#;
        let docs = decode_services(list).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].name, "b");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let body = br#"{"name":"foo","vendor":"acme","spec":{"minKubeVersion":"1.15"}}"#;
        let doc: ServiceDoc = serde_json::from_slice(body).unwrap();
        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["vendor"], "acme");
        assert_eq!(out["spec"]["minKubeVersion"], "1.15");
    }

    #[test]
    fn test_service_with_instances_overlays_status() {
        let service: ServiceDoc = serde_json::from_slice(
            br#"{"name":"svc","phase":"Pending","spec":{"customResources":["old"]}}"#,
        )
        .unwrap();
        let instances: Vec<InstanceDoc> =
            serde_json::from_slice(br#"[{"name":"i1","status":"Running"}]"#).unwrap();

        let doc = service_with_instances(&service, &instances).unwrap();
        let resources = doc["spec"]["customResources"].as_array().unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["name"], "i1");
        assert_eq!(resources[0]["status"], "Pending");
    }

    #[test]
    fn test_service_with_instances_keeps_succeeded_status() {
        let service: ServiceDoc =
            serde_json::from_slice(br#"{"name":"svc","phase":"Succeeded"}"#).unwrap();
        let instances: Vec<InstanceDoc> =
            serde_json::from_slice(br#"[{"name":"i1","status":"Running"}]"#).unwrap();
        let doc = service_with_instances(&service, &instances).unwrap();
        assert_eq!(doc["spec"]["customResources"][0]["status"], "Running");
    }
}
