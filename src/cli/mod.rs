//! Command-line interface for the tether lab.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use commands::demo::DemoArgs;
use commands::lab::LabArgs;

/// Anonymous-to-permanent account upgrade laboratory
#[derive(Parser, Debug)]
#[command(name = "tether", version, about)]
pub struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Load configuration from a specific file instead of .tether/
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive upgrade-flow laboratory
    Lab(LabArgs),
    /// Scripted walkthrough of the credential-conflict path
    Demo(DemoArgs),
}

/// Report a fatal error and exit non-zero.
///
/// Error chains can echo user input (seed passwords, candidate
/// credentials), so the text is scrubbed before it reaches a terminal
/// or a pipe.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    let message = crate::infrastructure::logging::SecretScrubbingLayer::new()
        .scrub_message(&format!("{err:#}"));
    if json {
        let payload = serde_json::json!({ "error": message });
        println!("{payload}");
    } else {
        eprintln!("{} {message}", style("error:").red().bold());
    }
    std::process::exit(1);
}
