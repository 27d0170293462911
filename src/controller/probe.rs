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

//! Health and readiness endpoint served over self-signed TLS.
//!
//! The probe server is deliberately decoupled from the controller manager
//! (whose metrics port stays disabled) and bound to a separately-computed
//! address, so readiness stays observable during leader-election
//! contention.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use thiserror::Error;
use tracing::info;

use super::cert::SelfSignedCert;
use crate::infrastructure::constants::PROBE_READ_HEADER_TIMEOUT_SECS;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("probe server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// First non-loopback IPv4 address of this host, resolved by probing the
/// default route. No packet is sent; connect only selects the source
/// address.
pub fn local_ipv4() -> std::io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Ok(ip),
        other => Err(std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("no non-loopback IPv4 address found (got {other})"),
        )),
    }
}

/// Substitute the host portion of `addr` with `ip`, keeping the port. An
/// empty address falls back to `ip:default_port`.
pub fn replace_ip(addr: &str, ip: &str, default_port: &str) -> String {
    if addr.is_empty() {
        return format!("{}:{}", ip, default_port);
    }
    match addr.rfind(':') {
        Some(pos) => format!("{}:{}", ip, &addr[pos + 1..]),
        None => format!("{}:{}", ip, default_port),
    }
}

/// Serve `/healthz` and `/readyz` over TLS until the process exits. TLS
/// is pinned to 1.2 minimum with the four ECDHE GCM suites (the 1.3
/// suites ride along; they are not configurable). The certificate lives
/// in memory only.
pub async fn serve_probes(addr: SocketAddr, cert: &SelfSignedCert) -> Result<(), ProbeError> {
    let tls = RustlsConfig::from_config(Arc::new(tls_server_config(cert)?));

    let app = Router::new()
        .route("/healthz", get(|| async { "OK\n" }))
        .route("/readyz", get(|| async { "OK\n" }));

    info!(%addr, "starting probe server");
    let mut server = axum_server::bind_rustls(addr, tls);
    server
        .http_builder()
        .http1()
        .header_read_timeout(Duration::from_secs(PROBE_READ_HEADER_TIMEOUT_SECS));
    server.serve(app.into_make_service()).await?;
    Ok(())
}

fn tls_server_config(cert: &SelfSignedCert) -> Result<rustls::ServerConfig, ProbeError> {
    use rustls::crypto::aws_lc_rs as crypto;

    let mut provider = crypto::default_provider();
    provider.cipher_suites = vec![
        crypto::cipher_suite::TLS13_AES_128_GCM_SHA256,
        crypto::cipher_suite::TLS13_AES_256_GCM_SHA384,
        crypto::cipher_suite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        crypto::cipher_suite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        crypto::cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
        crypto::cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    ];

    let chain = vec![CertificateDer::from(cert.cert_der.clone())];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(cert.key_der.clone()));

    rustls::ServerConfig::builder_with_provider(Arc::new(provider))
        .with_protocol_versions(rustls::ALL_VERSIONS)
        .map_err(|e| ProbeError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .map_err(|e| ProbeError::Tls(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_ip_substitutes_host() {
        assert_eq!(replace_ip("x.x.x.x:9", "y.y.y.y", "7"), "y.y.y.y:9");
        assert_eq!(replace_ip("", "x.x.x.x", "7"), "x.x.x.x:7");
        assert_eq!(replace_ip(":8081", "10.0.0.3", "7"), "10.0.0.3:8081");
        assert_eq!(replace_ip("host", "10.0.0.3", "7"), "10.0.0.3:7");
    }

    #[test]
    fn test_tls_server_config_pins_suites() {
        let cert = crate::controller::cert::SelfSignedCert::generate().unwrap();
        let config = tls_server_config(&cert).unwrap();
        // TLS 1.2 stays enabled alongside 1.3.
        assert!(config.alpn_protocols.is_empty());
    }
}
