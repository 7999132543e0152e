//! Render pipeline
//!
//! Rendering walks a document's segments strictly in order:
//!
//! 1. Literal text is emitted as written (escapes already collapsed).
//! 2. `.( ... .)` blocks run against the shared scope.
//! 3. `{name}` substitutions stringify the variable's current value.
//! 4. `.inc("name")` resolves a document and renders it inline, against
//!    the same scope and rewrite list.
//! 5. `.sub("pattern", "replacement")` registers a rewrite applied to
//!    every piece of output emitted after the directive.
//!
//! Order matters and is the contract: a later block sees every earlier
//! assignment, including assignments made inside included documents.

mod parse;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Local};

use super::error::TemplateError;
use super::resolve::IncludeResolver;
use super::scope::Scope;
use super::script::{self, EvalCtx};
use self::parse::Segment;

/// Include chains deeper than this fail rather than recurse further
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Render a document with a fresh scope and the wall clock
///
/// Shorthand for [`Engine::new()`](Engine::new) followed by
/// [`Engine::render`].
pub fn render(source: &str, resolver: &dyn IncludeResolver) -> Result<String, TemplateError> {
    Engine::new().render(source, resolver)
}

/// Template renderer
///
/// Owns the clock that `now(...)` observes. The default engine reads
/// the system clock; tests and reproducible builds inject a fixed one
/// with [`Engine::with_clock`].
pub struct Engine {
    clock: Box<dyn Fn() -> DateTime<Local> + Send + Sync>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine reading the system clock
    pub fn new() -> Self {
        Self {
            clock: Box::new(Local::now),
        }
    }

    /// Engine whose `now(...)` calls observe `clock` instead of the
    /// system time
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Local> + Send + Sync + 'static,
    {
        Self {
            clock: Box::new(clock),
        }
    }

    /// Render a document with a fresh, empty scope
    pub fn render(
        &self,
        source: &str,
        resolver: &dyn IncludeResolver,
    ) -> Result<String, TemplateError> {
        let mut scope = Scope::new();
        self.render_with(source, resolver, &mut scope)
    }

    /// Render a document against a caller-provided scope
    ///
    /// The scope may be pre-seeded with variables and reflects every
    /// script assignment after the call returns.
    pub fn render_with(
        &self,
        source: &str,
        resolver: &dyn IncludeResolver,
        scope: &mut Scope,
    ) -> Result<String, TemplateError> {
        let mut state = RenderState {
            scope,
            rewrites: Vec::new(),
            include_stack: Vec::new(),
            out: String::new(),
        };
        self.render_into(source, resolver, &mut state)?;
        Ok(state.out)
    }

    fn render_into(
        &self,
        source: &str,
        resolver: &dyn IncludeResolver,
        state: &mut RenderState<'_>,
    ) -> Result<(), TemplateError> {
        let segments = parse::parse(source)?;
        for segment in &segments {
            match segment {
                Segment::Text(text) => state.emit(text),
                Segment::Subst { name, line } => {
                    let text = match state.scope.get(name) {
                        Some(value) => value.to_string(),
                        None => {
                            return Err(TemplateError::UndefinedVariable {
                                name: name.clone(),
                                line: *line,
                            });
                        }
                    };
                    state.emit(&text);
                }
                Segment::Script { body, line } => {
                    let mut ctx = EvalCtx {
                        scope: &mut *state.scope,
                        clock: &*self.clock,
                    };
                    script::run(body, &mut ctx).map_err(|e| TemplateError::Script {
                        message: e.message,
                        line: line + e.line - 1,
                    })?;
                }
                Segment::Rewrite {
                    pattern,
                    replacement,
                    ..
                } => {
                    state.rewrites.push((pattern.clone(), replacement.clone()));
                }
                Segment::Include { name, line } => {
                    self.render_include(name, *line, resolver, state)?;
                }
            }
        }
        Ok(())
    }

    fn render_include(
        &self,
        name: &str,
        line: usize,
        resolver: &dyn IncludeResolver,
        state: &mut RenderState<'_>,
    ) -> Result<(), TemplateError> {
        if state.include_stack.iter().any(|entry| entry == name) {
            let mut parts = state.include_stack.clone();
            parts.push(name.to_string());
            return Err(TemplateError::CircularInclude {
                name: name.to_string(),
                line,
                chain: parts.join(" -> "),
            });
        }
        if state.include_stack.len() >= MAX_INCLUDE_DEPTH {
            return Err(TemplateError::Malformed {
                message: format!("include depth exceeds {}", MAX_INCLUDE_DEPTH),
                line,
            });
        }

        let text =
            resolver
                .resolve(name)
                .map_err(|e| TemplateError::UnresolvedInclude {
                    name: name.to_string(),
                    line,
                    reason: e.to_string(),
                })?;

        state.include_stack.push(name.to_string());
        let result = self.render_into(&text, resolver, state);
        state.include_stack.pop();

        result.map_err(|e| match e {
            // Keep the cycle report intact; its chain already names
            // every participating document.
            cycle @ TemplateError::CircularInclude { .. } => cycle,
            other => TemplateError::IncludeRender {
                name: name.to_string(),
                line,
                source: Box::new(other),
            },
        })
    }
}

/// Mutable rendering context threaded through includes
struct RenderState<'a> {
    scope: &'a mut Scope,
    /// Registered `.sub` rewrites, in registration order
    rewrites: Vec<(String, String)>,
    /// Names of documents currently being rendered, for cycle detection
    include_stack: Vec<String>,
    out: String,
}

impl RenderState<'_> {
    /// Append output, passing it through every registered rewrite
    ///
    /// Rewrites see each emitted piece on its own; a pattern never
    /// matches across the boundary between two pieces.
    fn emit(&mut self, text: &str) {
        if self.rewrites.is_empty() {
            self.out.push_str(text);
            return;
        }
        let mut rewritten = text.to_string();
        for (pattern, replacement) in &self.rewrites {
            rewritten = rewritten.replace(pattern, replacement);
        }
        self.out.push_str(&rewritten);
    }
}
