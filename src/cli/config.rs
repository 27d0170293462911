//! Connection profile configuration command

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::Parser;

use crate::domain::config::ManagerConfig;
use crate::domain::validate::is_valid_port;

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Manager address (IP or host name)
    #[arg(long = "manager-addr")]
    pub manager_addr: Option<String>,

    /// Manager HTTPS port
    #[arg(long = "manager-https-port", default_value = "443")]
    pub manager_https_port: String,

    /// Path to the client certificate PEM file
    #[arg(long = "manager-client-cert")]
    pub manager_client_cert: Option<String>,

    /// Path to the client key PEM file
    #[arg(long = "manager-client-key")]
    pub manager_client_key: Option<String>,

    /// Path to the CA certificate PEM file
    #[arg(long = "manager-ca")]
    pub manager_ca: Option<String>,

    /// Skip server certificate verification
    #[arg(long = "manager-skip-verify")]
    pub manager_skip_verify: bool,
}

impl ConfigCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let addr = self
            .manager_addr
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let port = self.manager_https_port.trim().to_string();
        if addr.is_empty() {
            anyhow::bail!("manager-addr is required");
        }
        if !is_valid_port(&port) {
            anyhow::bail!("manager-https-port [{}] is invalid", port);
        }

        let cfg = ManagerConfig {
            server: format!("https://{}:{}", addr, port),
            client_cert_data: read_pem_base64(self.manager_client_cert.as_deref())?,
            client_key_data: read_pem_base64(self.manager_client_key.as_deref())?,
            ca_data: read_pem_base64(self.manager_ca.as_deref())?,
            skip_verify: self.manager_skip_verify,
        };
        cfg.save()?;
        println!("configure kappctl success.");
        Ok(())
    }
}

/// Read a PEM file from disk and base64-encode it for the profile. A
/// missing flag yields the empty blob.
fn read_pem_base64(path: Option<&str>) -> anyhow::Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    let data = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path, e))?;
    Ok(BASE64.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_pem_base64_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, "pem bytes").unwrap();
        let encoded = read_pem_base64(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"pem bytes");
    }

    #[test]
    fn test_read_pem_base64_missing_flag() {
        assert_eq!(read_pem_base64(None).unwrap(), "");
    }

    #[test]
    fn test_read_pem_base64_missing_file() {
        let err = read_pem_base64(Some("/nonexistent/cert.pem")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }
}
