mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            include_dir,
            set,
            stamp,
        } => commands::render::run(input, output, include_dir, set, stamp, cli.verbose),
        Commands::Build { manifest, stamp } => commands::build::run(manifest, stamp, cli.verbose),
        Commands::Check {
            input,
            include_dir,
            set,
            json,
        } => commands::check::run(input, include_dir, set, json, cli.verbose),
        Commands::New { name } => commands::new::run(name, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
