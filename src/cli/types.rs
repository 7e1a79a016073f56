//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{analyze::AnalyzeArgs, import::ImportArgs, inspect::InspectArgs};

#[derive(Parser, Debug)]
#[command(name = "jenkins-triage")]
#[command(about = "Triage Jenkins/Allure test reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .jenkins-triage/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate report files by test class and analyze failures
    Analyze(AnalyzeArgs),

    /// Build a debug report for a single test record
    Inspect(InspectArgs),

    /// Validate previously produced job aggregate files
    Import(ImportArgs),

    /// Print the effective configuration
    Config,
}
