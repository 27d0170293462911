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

//! Leader election on coordination.k8s.io/v1 Leases.
//!
//! Uses resourceVersion compare-and-swap semantics: a concurrent update
//! fails with 409 Conflict and the loser retries. Only the leader starts
//! the ServicePackage controller.

use std::time::Duration;

use chrono::Utc;
use k8s_openapi::api::coordination::v1::{Lease, LeaseSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::MicroTime;
use kube::api::{Api, ObjectMeta, PostParams};
use kube::Client;
use tracing::{debug, info, warn};

const LEASE_DURATION: Duration = Duration::from_secs(30);
const RENEW_INTERVAL: Duration = Duration::from_secs(10);
const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Lease-based leader elector for the engine.
pub struct LeaderElector {
    leases: Api<Lease>,
    lease_name: String,
    identity: String,
}

impl LeaderElector {
    pub fn new(client: Client, lease_name: &str, namespace: &str, identity: &str) -> Self {
        Self {
            leases: Api::namespaced(client, namespace),
            lease_name: lease_name.to_string(),
            identity: identity.to_string(),
        }
    }

    /// Block until this process holds the lease.
    pub async fn acquire(&self) -> Result<(), kube::Error> {
        loop {
            match self.try_acquire().await {
                Ok(true) => {
                    info!(lease = %self.lease_name, identity = %self.identity, "acquired leadership");
                    return Ok(());
                }
                Ok(false) => {
                    debug!(lease = %self.lease_name, "lease held by another instance");
                }
                Err(kube::Error::Api(ae)) if ae.code == 409 => {
                    debug!(lease = %self.lease_name, "lost lease race, retrying");
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    /// Renew the lease until the process exits. Renewal failures are
    /// logged and retried on the next tick; the lease outlives transient
    /// API hiccups because its duration is three renew intervals.
    pub async fn run_renewal(&self) {
        loop {
            tokio::time::sleep(RENEW_INTERVAL).await;
            if let Err(e) = self.try_acquire().await {
                warn!(lease = %self.lease_name, error = %e, "failed to renew lease");
            }
        }
    }

    async fn try_acquire(&self) -> Result<bool, kube::Error> {
        match self.leases.get_opt(&self.lease_name).await? {
            None => {
                self.leases
                    .create(&PostParams::default(), &self.fresh_lease())
                    .await?;
                Ok(true)
            }
            Some(mut lease) => {
                let spec = lease.spec.clone().unwrap_or_default();
                let holder = spec.holder_identity.clone().unwrap_or_default();
                if holder != self.identity && !lease_expired(&spec) {
                    return Ok(false);
                }

                let renewing = holder == self.identity;
                let mut new_spec = spec;
                new_spec.holder_identity = Some(self.identity.clone());
                new_spec.lease_duration_seconds = Some(LEASE_DURATION.as_secs() as i32);
                new_spec.renew_time = Some(MicroTime(Utc::now()));
                if !renewing {
                    new_spec.acquire_time = Some(MicroTime(Utc::now()));
                    new_spec.lease_transitions = Some(new_spec.lease_transitions.unwrap_or(0) + 1);
                }
                lease.spec = Some(new_spec);
                // replace() carries resourceVersion, giving compare-and-swap.
                self.leases
                    .replace(&self.lease_name, &PostParams::default(), &lease)
                    .await?;
                Ok(true)
            }
        }
    }

    fn fresh_lease(&self) -> Lease {
        Lease {
            metadata: ObjectMeta {
                name: Some(self.lease_name.clone()),
                ..Default::default()
            },
            spec: Some(LeaseSpec {
                holder_identity: Some(self.identity.clone()),
                lease_duration_seconds: Some(LEASE_DURATION.as_secs() as i32),
                acquire_time: Some(MicroTime(Utc::now())),
                renew_time: Some(MicroTime(Utc::now())),
                lease_transitions: Some(0),
                ..Default::default()
            }),
        }
    }
}

fn lease_expired(spec: &LeaseSpec) -> bool {
    let Some(renew_time) = &spec.renew_time else {
        return true;
    };
    let duration = spec
        .lease_duration_seconds
        .map(|s| chrono::Duration::seconds(s as i64))
        .unwrap_or_else(|| chrono::Duration::seconds(LEASE_DURATION.as_secs() as i64));
    renew_time.0 + duration < Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_expired_without_renew_time() {
        assert!(lease_expired(&LeaseSpec::default()));
    }

    #[test]
    fn test_lease_expired_respects_duration() {
        let fresh = LeaseSpec {
            renew_time: Some(MicroTime(Utc::now())),
            lease_duration_seconds: Some(30),
            ..Default::default()
        };
        assert!(!lease_expired(&fresh));

        let stale = LeaseSpec {
            renew_time: Some(MicroTime(Utc::now() - chrono::Duration::seconds(60))),
            lease_duration_seconds: Some(30),
            ..Default::default()
        };
        assert!(lease_expired(&stale));
    }
}
