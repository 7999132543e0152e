//! Template module - text templating with embedded script blocks
//!
//! This module renders template documents that mix literal text with a
//! small set of directives. It was built for generating README prose and
//! stylesheets, where the only dynamic content is a date stamp, a few
//! computed strings, and shared fragments spliced in from other files.
//!
//! ## Syntax
//!
//! - Script blocks: `.(` statements `.)`, executed in document order
//!   against one shared scope. A newline directly after `.)` is consumed.
//! - Substitutions: `{name}`, replaced by the scope value of `name` at
//!   that point in the document.
//! - Brace escapes: `{{` and `}}` render as literal `{` and `}`. A lone
//!   `}` passes through; a lone `{` must open a substitution.
//! - Includes: `.inc("name")` splices in the resolver's text for `name`,
//!   rendered with the same scope.
//! - Rewrites: `.sub("from", "to")` rewrites `from` to `to` in all output
//!   emitted after the directive, includes included. A newline directly
//!   after the directive is consumed.
//!
//! The sequences `.(`, `.inc(` and `.sub(` are reserved wherever they
//! appear; everything else is literal output.
//!
//! ## Scope sharing
//!
//! One scope object lives for the whole render: variables assigned in the
//! parent are visible inside includes, and variables assigned inside an
//! include stay visible to the parent afterwards. Nothing survives beyond
//! the render call.

pub mod engine;
pub mod error;
pub mod resolve;
pub mod scope;

mod script;

pub use engine::{render, Engine};
pub use error::TemplateError;
pub use resolve::{DirResolver, IncludeResolver, MemoryResolver, ResolveError};
pub use scope::{Scope, Value};
