use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeftError {
    // Manifest errors
    #[error("MANIFEST_NOT_FOUND: weft.toml not found in current or parent directories")]
    ManifestNotFound,

    #[error("MANIFEST_INVALID: failed to parse weft.toml: {0}")]
    ManifestInvalid(String),

    #[error("MANIFEST_EMPTY: manifest lists no documents")]
    ManifestEmpty,

    #[error("VAR_INVALID: seed variable '{name}' must be a string or integer")]
    VarInvalid { name: String },

    // Document errors
    #[error("DOCUMENT_PATH_INVALID: '{path}' must be a clean relative path")]
    DocumentPathInvalid { path: PathBuf },

    #[error("DOCUMENT_READ_FAILED: {path}: {reason}")]
    DocumentReadFailed { path: PathBuf, reason: String },

    #[error("RENDER_FAILED: {path}: {source}")]
    RenderFailed {
        path: PathBuf,
        #[source]
        source: crate::template::TemplateError,
    },

    // Scaffold errors
    #[error("NAME_INVALID: {0}")]
    NameInvalid(String),

    #[error("PROJECT_EXISTS: directory '{path}' already exists")]
    ProjectExists { path: PathBuf },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WeftError>;
