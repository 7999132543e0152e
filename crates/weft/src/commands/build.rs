//! Build command - render every document in the manifest

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use colored::Colorize;
use weft_core::build::build_all;
use weft_core::manifest::Manifest;

use crate::context::engine_from_stamp;

pub fn run(manifest: Option<PathBuf>, stamp: Option<String>, verbose: bool) -> Result<()> {
    let manifest_path = match manifest {
        Some(path) => path,
        None => Manifest::find(&env::current_dir()?)?,
    };
    if verbose {
        println!("{} Building from {}", "→".cyan(), manifest_path.display());
    }

    let engine = engine_from_stamp(stamp.as_deref())?;
    let summary = build_all(&engine, &manifest_path)?;

    for path in &summary.written {
        println!("{} Wrote {}", "✓".green().bold(), path.display());
    }
    for (src, err) in &summary.failures {
        eprintln!("{} {}: {}", "!".yellow(), src.display(), err);
    }

    if summary.is_clean() {
        println!(
            "\n{} Built {} document(s)",
            "✓".green().bold(),
            summary.written.len()
        );
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} document(s) failed",
            summary.failures.len(),
            summary.failures.len() + summary.written.len()
        ))
    }
}
