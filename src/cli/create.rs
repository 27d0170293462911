//! Service package deployment command

use clap::Parser;
use reqwest::Method;

use crate::domain::config::ManagerConfig;
use crate::domain::validate::{validate_args, ArgValue};
use crate::infrastructure::constants::DEPLOY_SERVICE_URL;
use crate::infrastructure::http::{execute, RequestBody, RequestInfo, TlsMaterial};
use crate::infrastructure::url::render_url;
use crate::shared::error::KappError;

#[derive(Parser, Debug)]
pub struct CreateCommand {
    /// Path to the service package archive
    #[arg(long, short = 'f', required = true)]
    pub file: String,

    /// Cluster name
    #[arg(long, short = 'c', default_value = "default")]
    pub cluster: String,
}

impl CreateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cfg = ManagerConfig::load()?;
        validate_args(&[("cluster", ArgValue::Str(self.cluster.clone()))])?;

        let name = package_name(&self.file);
        let package = std::fs::read(&self.file)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", self.file, e))?;

        let url = render_url(DEPLOY_SERVICE_URL, &[&cfg.server]);
        let info = RequestInfo::new(Method::POST, url, TlsMaterial::from(&cfg))
            .with_body(RequestBody::File(package));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("create service", &name))?;
        if status != 200 {
            return Err(KappError::status(
                "create service",
                &name,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        println!("create service {} success.", name);
        Ok(())
    }
}

/// Display name of the package: the file stem of the archive path.
fn package_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
