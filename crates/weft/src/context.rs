//! Shared construction of engines and scopes from CLI flags

use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use weft_core::template::{Engine, Scope, Value};

/// Build the engine, pinning the clock when --stamp is given
pub fn engine_from_stamp(stamp: Option<&str>) -> Result<Engine> {
    match stamp {
        None => Ok(Engine::new()),
        Some(text) => {
            let fixed: DateTime<Local> = DateTime::parse_from_rfc3339(text)
                .with_context(|| format!("invalid --stamp '{}', expected RFC 3339", text))?
                .with_timezone(&Local);
            Ok(Engine::with_clock(move || fixed))
        }
    }
}

/// Parse repeated --set NAME=VALUE flags into a seed scope
///
/// A value that parses as an integer is seeded as one; everything else
/// is a string.
pub fn scope_from_sets(sets: &[String]) -> Result<Scope> {
    let mut scope = Scope::new();
    for pair in sets {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --set '{}', expected NAME=VALUE", pair))?;
        if name.is_empty() {
            return Err(anyhow!("invalid --set '{}', empty variable name", pair));
        }
        let value = match value.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Str(value.to_string()),
        };
        scope.set(name, value);
    }
    Ok(scope)
}

/// Directory includes resolve under when --include-dir is not given
pub fn default_include_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
