//! Template error types

use thiserror::Error;

/// Template rendering errors
///
/// Every variant carries the 1-based line of the offending directive in
/// the document being rendered at the time of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Substitution marker referenced a name the scope does not hold
    #[error("undefined variable '{name}' at line {line}")]
    UndefinedVariable {
        /// The name that was not found
        name: String,
        /// Line number of the substitution marker
        line: usize,
    },

    /// A script block statement failed to parse or evaluate
    #[error("script error at line {line}: {message}")]
    Script {
        /// What went wrong
        message: String,
        /// Line number of the offending statement
        line: usize,
    },

    /// Malformed template syntax
    #[error("malformed template at line {line}: {message}")]
    Malformed {
        /// What went wrong
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// The include resolver could not supply the named document
    #[error("unresolved include '{name}' at line {line}: {reason}")]
    UnresolvedInclude {
        /// The include name as written in the directive
        name: String,
        /// Line number of the include directive
        line: usize,
        /// Resolver failure text
        reason: String,
    },

    /// An include chain returned to a document already being rendered
    #[error("circular include '{name}' at line {line} ({chain})")]
    CircularInclude {
        /// The name that closed the cycle
        name: String,
        /// Line number of the include directive
        line: usize,
        /// The chain of includes leading to the cycle
        chain: String,
    },

    /// Rendering an included document failed
    #[error("in include '{name}' at line {line}: {source}")]
    IncludeRender {
        /// The include name as written in the directive
        name: String,
        /// Line number of the include directive in the outer document
        line: usize,
        /// The failure inside the included document
        #[source]
        source: Box<TemplateError>,
    },
}

impl TemplateError {
    /// Line of the offending directive in the outermost failing document
    pub fn line(&self) -> usize {
        match self {
            TemplateError::UndefinedVariable { line, .. }
            | TemplateError::Script { line, .. }
            | TemplateError::Malformed { line, .. }
            | TemplateError::UnresolvedInclude { line, .. }
            | TemplateError::CircularInclude { line, .. }
            | TemplateError::IncludeRender { line, .. } => *line,
        }
    }
}
