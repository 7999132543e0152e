//! Document builds driven by weft.toml

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, WeftError};
use crate::manifest::{DocumentSpec, Manifest, MANIFEST_FILE};
use crate::template::engine::Engine;
use crate::template::resolve::DirResolver;
use crate::template::scope::Scope;

/// Outcome of building every document in a manifest
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Outputs written, in manifest order
    pub written: Vec<PathBuf>,
    /// Source paths that failed, with their errors
    pub failures: Vec<(PathBuf, WeftError)>,
}

impl BuildSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Render one manifest document and write its output
///
/// Each document starts from its own copy of the seed scope; documents
/// never observe each other's assignments. Includes resolve under
/// `include_dir` when set, otherwise next to the source file.
pub fn render_document(
    engine: &Engine,
    root: &Path,
    doc: &DocumentSpec,
    seed: &Scope,
) -> Result<PathBuf> {
    let src_path = root.join(&doc.src);
    let source = fs::read_to_string(&src_path).map_err(|e| WeftError::DocumentReadFailed {
        path: doc.src.clone(),
        reason: e.to_string(),
    })?;

    let include_root = match &doc.include_dir {
        Some(dir) => root.join(dir),
        None => src_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf()),
    };
    let resolver = DirResolver::new(include_root);

    let mut scope = seed.clone();
    let rendered = engine
        .render_with(&source, &resolver, &mut scope)
        .map_err(|source| WeftError::RenderFailed {
            path: doc.src.clone(),
            source,
        })?;

    let out_path = root.join(&doc.out);
    write_atomic(&out_path, &rendered)?;
    Ok(out_path)
}

/// Write through a temp file in the destination directory, then rename
/// into place
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| WeftError::IoError(e.error))?;
    Ok(())
}

/// Build every document a manifest lists
///
/// A failing document is recorded and skipped; the remaining documents
/// still build. Callers inspect the summary to decide how loudly to
/// complain.
pub fn build_all(engine: &Engine, manifest_path: &Path) -> Result<BuildSummary> {
    let manifest = Manifest::from_file(manifest_path)?;
    if manifest.documents.is_empty() {
        return Err(WeftError::ManifestEmpty);
    }

    let root = match manifest_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let seed = manifest.seed_scope()?;

    let mut summary = BuildSummary::default();
    for doc in &manifest.documents {
        match render_document(engine, root, doc, &seed) {
            Ok(path) => summary.written.push(path),
            Err(e) => summary.failures.push((doc.src.clone(), e)),
        }
    }
    Ok(summary)
}

/// Validate a project name
///
/// Names must be single directory names: no separators, no `.` or
/// `..`, no absolute paths, no drive prefixes.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(WeftError::NameInvalid("name cannot be empty".to_string()));
    }

    let mut normal_count = 0;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => normal_count += 1,
            Component::Prefix(_) | Component::RootDir => {
                return Err(WeftError::NameInvalid(format!(
                    "name cannot be an absolute path: '{}'",
                    name
                )));
            }
            Component::CurDir | Component::ParentDir => {
                return Err(WeftError::NameInvalid(format!(
                    "name cannot contain '.' or '..': '{}'",
                    name
                )));
            }
        }
    }

    if normal_count != 1 {
        return Err(WeftError::NameInvalid(format!(
            "name must be a single directory name without separators: '{}'",
            name
        )));
    }
    Ok(())
}

const README_TEMPLATE: &str = r#".( bar = "=" * width .)
{bar}
{title}
{bar}

Welcome to {title}. Edit doc/readme.wt and run `weft build`.

.inc("footer.wt")
"#;

const FOOTER_TEMPLATE: &str = r#".( stamp = now("%Y-%m-%d") .)
Generated {stamp}.
"#;

const STYLE_TEMPLATE: &str = r##".sub("ACCENT", "#2a6f4e")
body {{
  color: ACCENT;
}}

a {{
  border-bottom: 1px solid ACCENT;
}}
"##;

/// Create a new project scaffold
///
/// Lays out:
/// - weft.toml (seed vars and two documents)
/// - doc/readme.wt, doc/footer.wt (spliced into the readme)
/// - doc/style.css.wt
///
/// The scaffold builds as-is with `weft build`.
pub fn create_project(parent_dir: &Path, name: &str) -> Result<PathBuf> {
    validate_name(name)?;

    let project_dir = parent_dir.join(name);
    if project_dir.exists() {
        return Err(WeftError::ProjectExists { path: project_dir });
    }

    fs::create_dir_all(project_dir.join("doc"))?;
    scaffold_manifest(&project_dir, name)?;
    fs::write(project_dir.join("doc/readme.wt"), README_TEMPLATE)?;
    fs::write(project_dir.join("doc/footer.wt"), FOOTER_TEMPLATE)?;
    fs::write(project_dir.join("doc/style.css.wt"), STYLE_TEMPLATE)?;

    Ok(project_dir)
}

fn scaffold_manifest(project_dir: &Path, name: &str) -> Result<()> {
    let mut vars = BTreeMap::new();
    vars.insert("title".to_string(), toml::Value::String(name.to_string()));
    vars.insert("width".to_string(), toml::Value::Integer(40));

    let manifest = Manifest {
        vars,
        documents: vec![
            DocumentSpec {
                src: "doc/readme.wt".into(),
                out: "README.md".into(),
                include_dir: None,
            },
            DocumentSpec {
                src: "doc/style.css.wt".into(),
                out: "style.css".into(),
                include_dir: None,
            },
        ],
    };
    manifest.to_file(project_dir.join(MANIFEST_FILE))
}
