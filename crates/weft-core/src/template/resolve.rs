//! Include resolution
//!
//! The engine never touches the filesystem itself; it asks an
//! [`IncludeResolver`] for the raw text behind each `.inc("name")`
//! directive. Rendering of the resolved text happens back in the engine,
//! against the same shared scope.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Failure to supply an include target's text
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The resolver has no document under the requested name
    #[error("no document named '{0}'")]
    NotFound(String),

    /// The name would escape the resolver's root
    #[error("include name '{0}' must be a clean relative path")]
    UnsafeName(String),

    /// Reading the document failed
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the raw text of include targets by name
pub trait IncludeResolver {
    /// Return the unrendered text of the named document
    fn resolve(&self, name: &str) -> Result<String, ResolveError>;
}

/// Check that a path stays inside whatever directory it is joined to
///
/// Accepts only paths made of plain name components: no root, no drive
/// prefix, no `.` and no `..`. Component-based so the check behaves the
/// same on Unix and Windows (`/etc` is rooted-but-not-absolute on
/// Windows and must still be rejected).
pub(crate) fn is_clean_relative(path: &Path) -> bool {
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::Prefix(_)
            | Component::RootDir
            | Component::CurDir
            | Component::ParentDir => return false,
        }
    }
    normal > 0
}

/// Resolver that reads include targets from a root directory
///
/// Names are interpreted relative to the root; subdirectories are allowed
/// (`"parts/footer.wt"`), escapes are not (`"../secrets"`, `"/etc/passwd"`).
#[derive(Debug, Clone)]
pub struct DirResolver {
    root: PathBuf,
}

impl DirResolver {
    /// Create a resolver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory include names resolve under
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IncludeResolver for DirResolver {
    fn resolve(&self, name: &str) -> Result<String, ResolveError> {
        if !is_clean_relative(Path::new(name)) {
            return Err(ResolveError::UnsafeName(name.to_string()));
        }

        match std::fs::read_to_string(self.root.join(name)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResolveError::NotFound(name.to_string()))
            }
            Err(e) => Err(ResolveError::Io(e)),
        }
    }
}

/// In-memory resolver for tests and embedded documents
///
/// # Examples
///
/// ```
/// use weft_core::template::{IncludeResolver, MemoryResolver};
///
/// let mut resolver = MemoryResolver::new();
/// resolver.insert("greeting", "hello");
///
/// assert_eq!(resolver.resolve("greeting").unwrap(), "hello");
/// assert!(resolver.resolve("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    docs: HashMap<String, String>,
}

impl MemoryResolver {
    /// Create an empty resolver (every lookup fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under a name, replacing any previous text
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.docs.insert(name.into(), text.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<String, ResolveError> {
        self.docs
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_clean_relative() {
        assert!(is_clean_relative(Path::new("file.wt")));
        assert!(is_clean_relative(Path::new("parts/footer.wt")));

        assert!(!is_clean_relative(Path::new("")));
        assert!(!is_clean_relative(Path::new("/etc/passwd")));
        assert!(!is_clean_relative(Path::new("../outside")));
        assert!(!is_clean_relative(Path::new("a/../b")));
        assert!(!is_clean_relative(Path::new("./a")));
    }

    #[test]
    fn test_dir_resolver_reads_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("list.wt"), "- project one\n").unwrap();

        let resolver = DirResolver::new(temp.path());
        assert_eq!(resolver.resolve("list.wt").unwrap(), "- project one\n");
    }

    #[test]
    fn test_dir_resolver_reads_subdirectory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("parts")).unwrap();
        fs::write(temp.path().join("parts/footer.wt"), "footer").unwrap();

        let resolver = DirResolver::new(temp.path());
        assert_eq!(resolver.resolve("parts/footer.wt").unwrap(), "footer");
    }

    #[test]
    fn test_dir_resolver_missing_file() {
        let temp = TempDir::new().unwrap();
        let resolver = DirResolver::new(temp.path());

        match resolver.resolve("missing.wt") {
            Err(ResolveError::NotFound(name)) => assert_eq!(name, "missing.wt"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_dir_resolver_rejects_escaping_names() {
        let temp = TempDir::new().unwrap();
        let resolver = DirResolver::new(temp.path());

        for name in ["../outside.wt", "/etc/passwd", "a/../../b", "./x"] {
            match resolver.resolve(name) {
                Err(ResolveError::UnsafeName(n)) => assert_eq!(n, name),
                other => panic!("Expected UnsafeName for {:?}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_memory_resolver_unknown_name() {
        let resolver = MemoryResolver::new();
        match resolver.resolve("anything") {
            Err(ResolveError::NotFound(name)) => assert_eq!(name, "anything"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
