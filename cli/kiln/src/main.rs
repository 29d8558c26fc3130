//! kiln CLI — resolve compilation targets and compose runtime images.

mod commands;
mod manifest;

use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kiln", version, about = "Runtime support image composer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and resolve compilation targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Compose the runtime support image for a target
    Compose {
        /// Target spec override (e.g., x86-64-linux-avx2-cuda)
        #[arg(long)]
        target: Option<String>,
        /// Emit the composition report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// Show the resolved target descriptor
    Show {
        /// Target spec override (default: environment, then kiln.toml, then host)
        #[arg(long)]
        target: Option<String>,
        /// Emit the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the recognized spec-string vocabularies
    List,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Target { action } => match action {
            TargetAction::Show { target, json } => commands::target::show(target.as_deref(), json),
            TargetAction::List => commands::target::list(),
        },
        Commands::Compose { target, json } => commands::compose::run(target.as_deref(), json),
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
