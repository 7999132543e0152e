//! weft.toml schema and loading
//!
//! A manifest seeds the render scope from `[vars]` and lists the
//! documents a build renders, each as a `[[document]]` table:
//!
//! ```toml
//! [vars]
//! title = "my-site"
//! width = 40
//!
//! [[document]]
//! src = "doc/readme.wt"
//! out = "README.md"
//! ```
//!
//! All paths are relative to the directory holding the manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeftError};
use crate::template::resolve::is_clean_relative;
use crate::template::scope::{Scope, Value};

/// File name a build looks for
pub const MANIFEST_FILE: &str = "weft.toml";

/// weft.toml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Variables seeded into every document's scope
    #[serde(default)]
    pub vars: BTreeMap<String, toml::Value>,
    /// Documents to render, in order
    #[serde(rename = "document", default)]
    pub documents: Vec<DocumentSpec>,
}

/// One source-to-output pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Template source, relative to the manifest
    pub src: PathBuf,
    /// Rendered output, relative to the manifest
    pub out: PathBuf,
    /// Directory `.inc(...)` names resolve under; defaults to the
    /// directory holding `src`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dir: Option<PathBuf>,
}

impl Manifest {
    /// Parse manifest text
    pub fn parse(text: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(text).map_err(|e| WeftError::ManifestInvalid(e.to_string()))?;
        manifest.validate_paths()?;
        Ok(manifest)
    }

    /// Read and parse a weft.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WeftError::ManifestNotFound
            } else {
                WeftError::IoError(e)
            }
        })?;
        Self::parse(&text)
    }

    /// Write the manifest as pretty TOML
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| WeftError::ManifestInvalid(e.to_string()))?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }

    /// Walk from `start` upwards to the nearest directory holding a
    /// weft.toml and return the manifest path
    pub fn find(start: &Path) -> Result<PathBuf> {
        for dir in start.ancestors() {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(WeftError::ManifestNotFound)
    }

    /// Build the scope every document render starts from
    ///
    /// Only strings and integers are allowed in `[vars]`; anything else
    /// has no counterpart in the script language.
    pub fn seed_scope(&self) -> Result<Scope> {
        let mut scope = Scope::new();
        for (name, value) in &self.vars {
            let value = match value {
                toml::Value::String(s) => Value::Str(s.clone()),
                toml::Value::Integer(i) => Value::Int(*i),
                _ => return Err(WeftError::VarInvalid { name: name.clone() }),
            };
            scope.set(name.clone(), value);
        }
        Ok(scope)
    }

    /// Every src/out/include_dir must stay inside the manifest's
    /// directory tree
    fn validate_paths(&self) -> Result<()> {
        for doc in &self.documents {
            let mut paths = vec![&doc.src, &doc.out];
            if let Some(dir) = &doc.include_dir {
                paths.push(dir);
            }
            for path in paths {
                if !is_clean_relative(path) {
                    return Err(WeftError::DocumentPathInvalid { path: path.clone() });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_manifest() {
        let toml = r#"
[[document]]
src = "doc/readme.wt"
out = "README.md"
"#;
        let manifest = Manifest::parse(toml).unwrap();
        assert!(manifest.vars.is_empty());
        assert_eq!(manifest.documents.len(), 1);
        assert_eq!(manifest.documents[0].src, PathBuf::from("doc/readme.wt"));
        assert_eq!(manifest.documents[0].out, PathBuf::from("README.md"));
        assert!(manifest.documents[0].include_dir.is_none());
    }

    #[test]
    fn test_parse_full_manifest() {
        let toml = r#"
[vars]
title = "my-site"
width = 40

[[document]]
src = "doc/readme.wt"
out = "README.md"
include_dir = "doc/parts"

[[document]]
src = "doc/style.css.wt"
out = "style.css"
"#;
        let manifest = Manifest::parse(toml).unwrap();
        assert_eq!(manifest.vars.len(), 2);
        assert_eq!(manifest.documents.len(), 2);
        assert_eq!(
            manifest.documents[0].include_dir,
            Some(PathBuf::from("doc/parts"))
        );
    }

    #[test]
    fn test_seed_scope_converts_strings_and_integers() {
        let manifest = Manifest::parse("[vars]\ntitle = \"x\"\nwidth = 40\n").unwrap();
        let scope = manifest.seed_scope().unwrap();
        assert_eq!(scope.get("title"), Some(&Value::Str("x".to_string())));
        assert_eq!(scope.get("width"), Some(&Value::Int(40)));
    }

    #[test]
    fn test_seed_scope_rejects_other_types() {
        let manifest = Manifest::parse("[vars]\nratio = 1.5\n").unwrap();
        match manifest.seed_scope() {
            Err(WeftError::VarInvalid { name }) => assert_eq!(name, "ratio"),
            other => panic!("Expected VarInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_escaping_paths() {
        for toml in [
            "[[document]]\nsrc = \"../readme.wt\"\nout = \"README.md\"\n",
            "[[document]]\nsrc = \"doc/readme.wt\"\nout = \"/etc/README.md\"\n",
            "[[document]]\nsrc = \"doc/readme.wt\"\nout = \"README.md\"\ninclude_dir = \"doc/..\"\n",
        ] {
            match Manifest::parse(toml) {
                Err(WeftError::DocumentPathInvalid { .. }) => {}
                other => panic!("Expected DocumentPathInvalid, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_reports_toml_errors() {
        match Manifest::parse("not toml [") {
            Err(WeftError::ManifestInvalid(_)) => {}
            other => panic!("Expected ManifestInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);

        let manifest = Manifest::parse(
            "[vars]\ntitle = \"t\"\n\n[[document]]\nsrc = \"a.wt\"\nout = \"a.txt\"\n",
        )
        .unwrap();
        manifest.to_file(&path).unwrap();

        let loaded = Manifest::from_file(&path).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.vars.len(), 1);
    }

    #[test]
    fn test_from_file_missing_is_manifest_not_found() {
        let temp = TempDir::new().unwrap();
        match Manifest::from_file(temp.path().join(MANIFEST_FILE)) {
            Err(WeftError::ManifestNotFound) => {}
            other => panic!("Expected ManifestNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_find_walks_upwards() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "").unwrap();
        let nested = temp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Manifest::find(&nested).unwrap();
        assert_eq!(found, temp.path().join(MANIFEST_FILE));
    }

    #[test]
    fn test_find_without_manifest_fails() {
        let temp = TempDir::new().unwrap();
        match Manifest::find(temp.path()) {
            Err(WeftError::ManifestNotFound) => {}
            other => panic!("Expected ManifestNotFound, got {:?}", other),
        }
    }
}
