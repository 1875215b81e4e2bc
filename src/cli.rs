//! Command-line interface definition for HealthChat
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HealthChat - health advice chat in the terminal
///
/// Enter a health profile, then chat with an assistant scoped to a topic
/// category.
#[derive(Parser, Debug, Clone)]
#[command(name = "healthchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for HealthChat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive health chat
    Chat {
        /// Override the provider from config (ollama, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Initial topic category (general, nutrition, fitness, mental_health, sleep, medication)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// YAML file that pre-fills the health profile
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// List the available topic categories
    Categories,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
