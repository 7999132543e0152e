//! Check command - render a template without writing anything

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context as _, Result};
use colored::Colorize;
use serde_json::json;
use weft_core::template::{DirResolver, Engine};

use crate::context::{default_include_dir, scope_from_sets};
use crate::output::print_json;

pub fn run(
    input: PathBuf,
    include_dir: Option<PathBuf>,
    set: Vec<String>,
    json_output: bool,
    verbose: bool,
) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut scope = scope_from_sets(&set)?;

    let include_root = include_dir.unwrap_or_else(|| default_include_dir(&input));
    if verbose {
        println!(
            "{} Checking {} (includes from {})",
            "→".cyan(),
            input.display(),
            include_root.display()
        );
    }

    let engine = Engine::new();
    let resolver = DirResolver::new(include_root);
    let result = engine.render_with(&source, &resolver, &mut scope);

    if json_output {
        let verdict = match &result {
            Ok(rendered) => json!({
                "ok": true,
                "input": input.display().to_string(),
                "bytes": rendered.len(),
            }),
            Err(e) => json!({
                "ok": false,
                "input": input.display().to_string(),
                "line": e.line(),
                "error": e.to_string(),
            }),
        };
        print_json(&serde_json::to_string_pretty(&verdict)?)?;
        result
            .map(|_| ())
            .map_err(|_| anyhow!("check failed for {}", input.display()))
    } else {
        match result {
            Ok(_) => {
                println!("{} {} renders clean", "✓".green().bold(), input.display());
                Ok(())
            }
            Err(e) => Err(anyhow!("{}: {}", input.display(), e)),
        }
    }
}
