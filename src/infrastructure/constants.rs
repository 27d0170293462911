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

/// Manager REST surface. `%v` holes are filled left to right, the
/// configured server base always being the first argument.
///
/// `GET_SERVICE_URL` emits `?cluster_name=` before any `&detail=true`
/// suffix callers append; the order is load-bearing for the single-service
/// form where the name hole collapses to the empty string.
pub const DEPLOY_SERVICE_URL: &str = "%v/api/v1alpha1/servicebinding";
pub const DEPLOY_INSTANCE_URL: &str = "%v/api/v1alpha1/servicebinding/%v/instance?cluster_name=%v";
pub const GET_SERVICE_URL: &str = "%v/api/v1alpha1/servicebinding%v?cluster_name=%v";
pub const GET_SERVICES_URL: &str = "%v/api/v1alpha1/servicebinding?cluster_name=%v";
pub const GET_INSTANCES_URL: &str = "%v/api/v1alpha1/servicebinding/%v/instance";
pub const DELETE_INSTANCE_URL: &str =
    "%v/api/v1alpha1/servicebinding/%v/instance/%v?cluster_name=%v";
pub const DELETE_SERVICE_URL: &str = "%v/api/v1alpha1/servicebinding/%v?cluster_name=%v";

/// Query fragment appended to the single-service GET.
pub const DETAIL_QUERY: &str = "&detail=true";

/// Client configuration file location
pub const CONFIG_DIR_NAME: &str = ".kappital";
pub const CONFIG_FILE_NAME: &str = "config";
pub const CONFIG_PATH_ENV: &str = "KAPPITALCONFIG";

/// Permissions for persisted secret material
pub const CONFIG_DIR_MODE: u32 = 0o700;
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Input constraints
pub const MAX_INPUT_LENGTH: usize = 64;

/// Table rendering
pub const MAX_CELL_LENGTH: usize = 64;
pub const CELL_ELLIPSIS: &str = " ...";

/// Cluster selection
pub const DEFAULT_CLUSTER: &str = "default";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Scaffold settings
pub const SCAFFOLD_NAME: &str = "kappital-demo";
pub const SCAFFOLD_DIR_MODE: u32 = 0o750;
pub const SCAFFOLD_FILE_MODE: u32 = 0o600;
pub const SCAFFOLD_MAX_DEPTH: usize = 5;
pub const SCAFFOLD_METADATA_FILE: &str = "metadata.yaml";

/// Engine settings
pub const ENGINE_NAMESPACE: &str = "kappital-system";
pub const LEADER_ELECTION_ID: &str = "83317d75.kappital.io";
pub const DEFAULT_PROBE_ADDR: &str = ":8081";
pub const PROBE_READ_HEADER_TIMEOUT_SECS: u64 = 120;

/// Engine certificate subject
pub const CERT_ORGANIZATION: &str = "Kappital";
pub const CERT_COMMON_NAME: &str = "kappital.com";
pub const CERT_VALIDITY_DAYS: i64 = 3650;
pub const CERT_RSA_BITS: usize = 3072;
