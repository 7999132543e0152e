//! Render command - render one template to stdout or a file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use colored::Colorize;
use weft_core::template::DirResolver;

use crate::context::{default_include_dir, engine_from_stamp, scope_from_sets};
use crate::output::print_raw;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    include_dir: Option<PathBuf>,
    set: Vec<String>,
    stamp: Option<String>,
    verbose: bool,
) -> Result<()> {
    let engine = engine_from_stamp(stamp.as_deref())?;
    let mut scope = scope_from_sets(&set)?;

    let source = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let include_root = include_dir.unwrap_or_else(|| default_include_dir(&input));
    if verbose {
        println!(
            "{} Rendering {} (includes from {})",
            "→".cyan(),
            input.display(),
            include_root.display()
        );
    }

    let resolver = DirResolver::new(include_root);
    let rendered = engine.render_with(&source, &resolver, &mut scope)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "{} Rendered {} to {}",
                "✓".green().bold(),
                input.display(),
                path.display()
            );
        }
        None => print_raw(&rendered)?,
    }

    Ok(())
}
