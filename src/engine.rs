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

//! Kappital engine: in-cluster controller for ServicePackage resources.

use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client};
use tracing::{error, info};

use kappital_kube::controller::{
    error_policy, local_ipv4, reconcile, replace_ip, serve_probes, Context, LeaderElector,
    SelfSignedCert, ServicePackage,
};
use kappital_kube::infrastructure::constants::{
    DEFAULT_PROBE_ADDR, ENGINE_NAMESPACE, LEADER_ELECTION_ID,
};

#[derive(Parser, Debug)]
#[command(
    name = "kappital-engine",
    about = "In-cluster controller for Kappital service packages"
)]
struct EngineArgs {
    /// Address the health probe endpoint binds to
    #[arg(long = "health-probe-bind-address", default_value = DEFAULT_PROBE_ADDR)]
    health_probe_bind_address: String,

    /// Enable leader election for controller manager
    #[arg(long = "leader-elect")]
    leader_elect: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A leading version argument prints and exits before flag parsing.
    if let Some(arg) = std::env::args().nth(1) {
        if matches!(arg.as_str(), "version" | "--version" | "-v") {
            println!("kappital-engine version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Several rustls backends are linked (client and server side); pin the
    // process default before anything handshakes.
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("failed to install the default TLS crypto provider");
    }

    let args = EngineArgs::parse();

    let local_ip = local_ipv4().map_err(|e| anyhow::anyhow!("failed to resolve local IP: {}", e))?;
    let probe_addr = replace_ip(&args.health_probe_bind_address, &local_ip.to_string(), "8081");
    let probe_addr: std::net::SocketAddr = probe_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid probe address {}: {}", probe_addr, e))?;

    let cert = SelfSignedCert::generate()
        .map_err(|e| anyhow::anyhow!("failed to generate probe certificate: {}", e))?;
    tokio::spawn(async move {
        if let Err(e) = serve_probes(probe_addr, &cert).await {
            error!(error = %e, "probe server terminated");
        }
    });

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("failed to build in-cluster client: {}", e))?;

    if args.leader_elect {
        let identity = format!(
            "{}_{}",
            std::env::var("HOSTNAME").unwrap_or_else(|_| "kappital-engine".to_string()),
            std::process::id()
        );
        let elector = Arc::new(LeaderElector::new(
            client.clone(),
            LEADER_ELECTION_ID,
            ENGINE_NAMESPACE,
            &identity,
        ));
        elector
            .acquire()
            .await
            .map_err(|e| anyhow::anyhow!("leader election failed: {}", e))?;
        let renewer = Arc::clone(&elector);
        tokio::spawn(async move { renewer.run_renewal().await });
    }

    let packages: Api<ServicePackage> = Api::namespaced(client.clone(), ENGINE_NAMESPACE);
    let ctx = Arc::new(Context { client });

    info!(namespace = ENGINE_NAMESPACE, "starting ServicePackage controller");
    Controller::new(packages, WatcherConfig::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok(action) => {
                    tracing::debug!(?action, "reconciliation completed");
                }
                Err(e) => {
                    tracing::error!(error = ?e, "reconciliation error");
                }
            }
        })
        .await;

    info!("kappital engine shutting down");
    Ok(())
}
