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

//! ServicePackage reconciler registration.
//!
//! The reconciliation body lives with the package lifecycle engine; this
//! module only observes the object and schedules the next pass.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::{Client, ResourceExt};
use thiserror::Error;
use tracing::{info, warn};

use super::crd::ServicePackage;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
}

/// Shared state handed to every reconciliation.
pub struct Context {
    pub client: Client,
}

pub async fn reconcile(
    package: Arc<ServicePackage>,
    _ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    info!(
        package = %package.name_any(),
        namespace = %package.namespace().unwrap_or_default(),
        generation = package.metadata.generation.unwrap_or_default(),
        "observed service package"
    );
    Ok(Action::requeue(Duration::from_secs(300)))
}

pub fn error_policy(
    package: Arc<ServicePackage>,
    error: &ReconcileError,
    _ctx: Arc<Context>,
) -> Action {
    warn!(package = %package.name_any(), error = %error, "reconciliation failed");
    Action::requeue(Duration::from_secs(60))
}
