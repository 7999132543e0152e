//! New command - create a project scaffold

use std::env;

use anyhow::Result;
use colored::Colorize;
use weft_core::build::create_project;

pub fn run(name: String, verbose: bool) -> Result<()> {
    let current_dir = env::current_dir()?;

    if verbose {
        println!(
            "{} Creating project '{}' in {}",
            "→".cyan(),
            name,
            current_dir.display()
        );
    }

    let project_dir = create_project(&current_dir, &name)?;

    println!(
        "{} Created project '{}' at {}",
        "✓".green().bold(),
        name,
        project_dir.display()
    );
    println!("\nNext steps:");
    println!("  cd {}", name);
    println!("  weft build");

    Ok(())
}
