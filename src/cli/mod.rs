//! CLI module for the Pluto user service
//!
//! Provides subcommands for running the service:
//! - `serve`: run the HTTP API server
//! - `migrate`: apply pending database migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Pluto API - user management service
#[derive(Parser)]
#[command(name = "pluto-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,
}
