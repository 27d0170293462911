//! Delete commands

use clap::Parser;
use reqwest::Method;

use crate::domain::config::ManagerConfig;
use crate::domain::validate::{validate_args, ArgValue};
use crate::infrastructure::constants::{DELETE_INSTANCE_URL, DELETE_SERVICE_URL};
use crate::infrastructure::http::{execute, RequestInfo, TlsMaterial};
use crate::infrastructure::url::render_url;
use crate::shared::error::KappError;

#[derive(Parser, Debug)]
pub struct DeleteServiceCommand {
    /// Service name
    pub name: String,

    /// Cluster name
    #[arg(long, short = 'c', default_value = "default")]
    pub cluster: String,
}

#[derive(Parser, Debug)]
pub struct DeleteInstanceCommand {
    /// Instance name
    pub name: String,

    /// Service the instance belongs to
    #[arg(long, short = 's', required = true)]
    pub service: String,

    /// Cluster name
    #[arg(long, short = 'c', default_value = "default")]
    pub cluster: String,
}

impl DeleteServiceCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cfg = ManagerConfig::load()?;
        validate_args(&[
            ("name", ArgValue::Str(self.name.clone())),
            ("cluster", ArgValue::Str(self.cluster.clone())),
        ])?;

        let url = render_url(DELETE_SERVICE_URL, &[&cfg.server, &self.name, &self.cluster]);
        let info = RequestInfo::new(Method::DELETE, url, TlsMaterial::from(&cfg));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("delete service", &self.name))?;
        if status != 200 {
            return Err(KappError::status(
                "delete service",
                &self.name,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        println!("delete service {} success.", self.name);
        Ok(())
    }
}

impl DeleteInstanceCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cfg = ManagerConfig::load()?;
        validate_args(&[
            ("name", ArgValue::Str(self.name.clone())),
            ("service", ArgValue::Str(self.service.clone())),
            ("cluster", ArgValue::Str(self.cluster.clone())),
        ])?;

        let url = render_url(
            DELETE_INSTANCE_URL,
            &[&cfg.server, &self.service, &self.name, &self.cluster],
        );
        let info = RequestInfo::new(Method::DELETE, url, TlsMaterial::from(&cfg));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("delete service instance", &self.name))?;
        if status != 200 {
            return Err(KappError::status(
                "delete service instance",
                &self.name,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        println!("delete service instance {} success.", self.name);
        Ok(())
    }
}

