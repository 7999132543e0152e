//! Shared fixtures for engine tests

use chrono::{DateTime, Local, TimeZone};

use crate::template::engine::Engine;
use crate::template::error::TemplateError;
use crate::template::resolve::MemoryResolver;

/// Render with an empty resolver and the wall clock
pub(super) fn render_str(source: &str) -> Result<String, TemplateError> {
    crate::template::engine::render(source, &MemoryResolver::new())
}

pub(super) fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 4, 12, 30, 0).unwrap()
}

/// Engine pinned to 2024-05-04 12:30:00 local time
pub(super) fn fixed_engine() -> Engine {
    Engine::with_clock(fixed_now)
}
