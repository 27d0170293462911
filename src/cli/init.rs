//! Package scaffold initializer

use clap::Parser;

use crate::domain::validate::{validate_args, ArgValue};
use crate::infrastructure::scaffold::{copy_scaffold, SCAFFOLD};

#[derive(Parser, Debug)]
pub struct InitCommand {
    /// Directory the scaffold is created under; defaults to the current
    /// directory
    pub dir: Option<String>,

    /// Directory flag form of the positional argument
    #[arg(long = "dir", short = 'd', value_name = "DIR", conflicts_with = "dir")]
    pub dir_flag: Option<String>,

    /// Name of the generated service package
    #[arg(long, default_value = "kappital-demo")]
    pub name: String,

    /// Version of the generated service package
    #[arg(long, default_value = "0.1.0")]
    pub version: String,
}

impl InitCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        validate_args(&[
            ("name", ArgValue::Str(self.name.clone())),
            ("version", ArgValue::Str(self.version.clone())),
        ])?;

        let dir = self
            .dir
            .clone()
            .or_else(|| self.dir_flag.clone())
            .unwrap_or_else(|| ".".to_string());
        let target = std::path::Path::new(&dir).join(&self.name);
        copy_scaffold(SCAFFOLD, &target, &self.name, &self.version)?;
        println!("initialize service package in {} success.", target.display());
        Ok(())
    }
}
