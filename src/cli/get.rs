//! Query commands

use clap::Parser;
use reqwest::Method;

use crate::cli::display::{format_created, format_raw, render_table, InstanceRow, ServiceRow};
use crate::domain::config::ManagerConfig;
use crate::domain::model::{
    decode_instances, decode_services, service_with_instances, InstanceDoc, ServiceDoc,
};
use crate::domain::validate::{validate_args, ArgValue};
use crate::infrastructure::constants::{
    DETAIL_QUERY, GET_INSTANCES_URL, GET_SERVICES_URL, GET_SERVICE_URL,
};
use crate::infrastructure::http::{execute, RequestInfo, TlsMaterial};
use crate::infrastructure::url::render_url;
use crate::shared::error::KappError;

#[derive(Parser, Debug)]
pub struct GetServiceCommand {
    /// Service name; omit to list every service in the cluster
    pub name: Option<String>,

    /// Cluster name
    #[arg(long, short = 'c', default_value = "default")]
    pub cluster: String,

    /// Output format (yaml or json); empty renders a table
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,
}

#[derive(Parser, Debug)]
pub struct GetInstanceCommand {
    /// Instance name; omit to show every instance of the service
    pub name: Option<String>,

    /// Service whose instances are shown
    #[arg(long, short = 's')]
    pub service: Option<String>,

    /// Show instances of every service
    #[arg(long, short = 'A')]
    pub all: bool,

    /// Cluster name
    #[arg(long, short = 'c', default_value = "default")]
    pub cluster: String,

    /// Namespace
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Output format (yaml or json); empty renders a table
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,
}

impl GetServiceCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cfg = ManagerConfig::load()?;
        let name = self.name.clone().unwrap_or_default();
        validate_args(&[
            ("name", ArgValue::Str(name.clone())),
            ("cluster", ArgValue::Str(self.cluster.clone())),
            ("output", ArgValue::Str(self.output.clone())),
        ])?;

        let url = if name.is_empty() {
            render_url(GET_SERVICES_URL, &[&cfg.server, &self.cluster])
        } else {
            let path = format!("/{}", name);
            let url = render_url(GET_SERVICE_URL, &[&cfg.server, &path, &self.cluster]);
            format!("{}{}", url, DETAIL_QUERY)
        };

        let info = RequestInfo::new(Method::GET, url, TlsMaterial::from(&cfg));
        let (status, body) = execute(&info).await.map_err(|e| e.with_op("get service", &name))?;
        if status != 200 {
            return Err(KappError::status(
                "get service",
                name,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }

        if let Some(out) = format_raw(&body, &self.output)? {
            println!("{}", out);
            return Ok(());
        }

        let services = decode_services(&body)?;
        if services.is_empty() {
            println!("No resources found");
            return Ok(());
        }
        let rows: Vec<ServiceRow> = services
            .iter()
            .map(|doc| self.service_row(doc))
            .collect();
        print!("{}", render_table(&rows));
        Ok(())
    }

    fn service_row(&self, doc: &ServiceDoc) -> ServiceRow {
        ServiceRow {
            name: doc.name.clone(),
            cluster: if doc.cluster_name.is_empty() {
                self.cluster.clone()
            } else {
                doc.cluster_name.clone()
            },
            namespace: doc.namespace.clone(),
            phase: doc.phase.clone(),
            message: doc.message.clone(),
            created: format_created(&doc.create_time),
        }
    }
}

impl GetInstanceCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let cfg = ManagerConfig::load()?;
        if !self.all && self.service.is_none() {
            anyhow::bail!("please specify the instance and service name");
        }
        let name = self.name.clone().unwrap_or_default();
        let service = self.service.clone().unwrap_or_default();
        validate_args(&[
            ("name", ArgValue::Str(name.clone())),
            ("service", ArgValue::Str(service.clone())),
            ("cluster", ArgValue::Str(self.cluster.clone())),
            ("namespace", ArgValue::Str(self.namespace.clone())),
            ("all", ArgValue::Bool(self.all)),
            ("output", ArgValue::Str(self.output.clone())),
        ])?;

        // Services first, then their instances in server order.
        let services = if self.all {
            self.fetch_services(&cfg).await?
        } else {
            vec![self.fetch_service(&cfg, &service).await?]
        };

        let mut collected: Vec<(ServiceDoc, Vec<InstanceDoc>)> = Vec::new();
        for svc in services {
            let mut instances = self.fetch_instances(&cfg, &svc.name).await?;
            if !name.is_empty() {
                instances.retain(|ins| ins.name == name);
            }
            collected.push((svc, instances));
        }

        if !self.output.is_empty() {
            let docs = collected
                .iter()
                .map(|(svc, instances)| service_with_instances(svc, instances))
                .collect::<Result<Vec<_>, _>>()?;
            let merged = if self.all || docs.len() > 1 {
                serde_json::to_vec(&docs)?
            } else {
                serde_json::to_vec(&docs[0])?
            };
            if let Some(out) = format_raw(&merged, &self.output)? {
                println!("{}", out);
            }
            return Ok(());
        }

        let mut rows: Vec<InstanceRow> = Vec::new();
        for (svc, instances) in &collected {
            let phase = svc.display_phase();
            for ins in instances {
                rows.push(InstanceRow {
                    instance_name: ins.name.clone(),
                    namespace: if ins.namespace.is_empty() {
                        svc.namespace.clone()
                    } else {
                        ins.namespace.clone()
                    },
                    service_name: svc.name.clone(),
                    cluster_name: if svc.cluster_name.is_empty() {
                        self.cluster.clone()
                    } else {
                        svc.cluster_name.clone()
                    },
                    status: phase.overlay_status(&ins.status),
                    created: format_created(&ins.create_time),
                });
            }
        }
        if rows.is_empty() {
            println!("No resources found");
            return Ok(());
        }
        print!("{}", render_table(&rows));
        Ok(())
    }

    async fn fetch_services(&self, cfg: &ManagerConfig) -> anyhow::Result<Vec<ServiceDoc>> {
        let url = render_url(GET_SERVICES_URL, &[&cfg.server, &self.cluster]);
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::from(cfg));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("get service instance", ""))?;
        if status != 200 {
            return Err(KappError::status(
                "get service instance",
                "",
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        Ok(decode_services(&body)?)
    }

    async fn fetch_service(&self, cfg: &ManagerConfig, name: &str) -> anyhow::Result<ServiceDoc> {
        let path = format!("/{}", name);
        let url = render_url(GET_SERVICE_URL, &[&cfg.server, &path, &self.cluster]);
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::from(cfg));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("get service instance", name))?;
        if status != 200 {
            return Err(KappError::status(
                "get service instance",
                name,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        let mut services = decode_services(&body)?;
        services
            .pop()
            .ok_or_else(|| anyhow::anyhow!("service {} not found", name))
    }

    async fn fetch_instances(
        &self,
        cfg: &ManagerConfig,
        service: &str,
    ) -> anyhow::Result<Vec<InstanceDoc>> {
        let url = render_url(GET_INSTANCES_URL, &[&cfg.server, service]);
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::from(cfg));
        let (status, body) = execute(&info)
            .await
            .map_err(|e| e.with_op("get service instance", service))?;
        if status != 200 {
            return Err(KappError::status(
                "get service instance",
                service,
                status,
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        Ok(decode_instances(&body)?)
    }
}

