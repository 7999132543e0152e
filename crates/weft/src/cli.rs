//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weft")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one template to stdout or a file
    Render {
        /// Template file to render
        input: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory .inc(...) names resolve under (default: next to the input)
        #[arg(long)]
        include_dir: Option<PathBuf>,

        /// Seed a scope variable before rendering (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Fixed RFC 3339 timestamp for now(...) calls
        #[arg(long)]
        stamp: Option<String>,
    },

    /// Render every document listed in weft.toml
    Build {
        /// Manifest path (default: nearest weft.toml, searching upwards)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Fixed RFC 3339 timestamp for now(...) calls
        #[arg(long)]
        stamp: Option<String>,
    },

    /// Render a template without writing, reporting any errors
    Check {
        /// Template file to check
        input: PathBuf,

        /// Directory .inc(...) names resolve under (default: next to the input)
        #[arg(long)]
        include_dir: Option<PathBuf>,

        /// Seed a scope variable before rendering (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Output the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new weft project
    New {
        /// Project name (becomes the directory name)
        name: String,
    },
}
