// CLI command definitions

use super::config::ConfigCommand;
use super::create::CreateCommand;
use super::delete::{DeleteInstanceCommand, DeleteServiceCommand};
use super::get::{GetInstanceCommand, GetServiceCommand};
use super::init::InitCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kappctl",
    version,
    about = "Command line client for the Kappital manager",
    long_about = "Create, query, and delete cloud native service packages and their instances through a Kappital manager"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Configure the connection profile for the manager
    Config(ConfigCommand),

    /// Scaffold a new service package directory
    Init(InitCommand),

    /// Deploy a service package to the manager
    Create(CreateCommand),

    /// Query services or service instances
    #[command(subcommand)]
    Get(GetCommands),

    /// Delete a service or service instance
    #[command(subcommand)]
    Delete(DeleteCommands),
}

#[derive(clap::Subcommand, Debug)]
pub enum GetCommands {
    /// Show one service or list all services
    Service(GetServiceCommand),

    /// Show instances of a service
    Instance(GetInstanceCommand),
}

#[derive(clap::Subcommand, Debug)]
pub enum DeleteCommands {
    /// Delete a service
    Service(DeleteServiceCommand),

    /// Delete an instance of a service
    Instance(DeleteInstanceCommand),
}
