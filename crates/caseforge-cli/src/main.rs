//! caseforge - phone case mesh generator
//!
//! # Commands
//!
//! - `caseforge list` - List the known phone models
//! - `caseforge info <model>` - Show a model's dimensions and features
//! - `caseforge stl <model>` - Generate a case and write it as STL
//! - `caseforge scad <model>` / `caseforge scad --all` - Write OpenSCAD parameter files
//! - `caseforge uv-layout <model>` - Write the case's UV layout as an SVG guide
//! - `caseforge part <shape>` - Write a decorative part as STL
//!
//! # Configuration
//!
//! Settings are read from `--config FILE`, else `$CASEFORGE_CONFIG`, else
//! `./caseforge.toml` when it exists. Log verbosity follows `RUST_LOG`.

mod config;
mod info;
mod list;
mod output;
mod part;
mod scad;
mod stl;
mod uv_layout;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

/// caseforge - phone case mesh generator
#[derive(Parser)]
#[command(name = "caseforge")]
#[command(about = "Generate printable phone case meshes")]
#[command(version)]
struct Cli {
    /// Path to a caseforge.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known phone models
    List,

    /// Show a model's dimensions and features
    Info(info::InfoArgs),

    /// Generate a case and write it as STL
    Stl(stl::StlArgs),

    /// Write OpenSCAD parameter files
    Scad(scad::ScadArgs),

    /// Write the case's UV layout as an SVG guide
    UvLayout(uv_layout::UvLayoutArgs),

    /// Write a decorative part as STL
    Part(part::PartArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List => list::execute(&settings),
        Commands::Info(args) => info::execute(args, &settings),
        Commands::Stl(args) => stl::execute(args, &settings).map(|_| ()),
        Commands::Scad(args) => scad::execute(args, &settings).map(|_| ()),
        Commands::UvLayout(args) => uv_layout::execute(args, &settings).map(|_| ()),
        Commands::Part(args) => part::execute(args).map(|_| ()),
    }
}
