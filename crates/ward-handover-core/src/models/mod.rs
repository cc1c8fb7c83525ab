//! Domain models for the ward handover system.

mod job;
mod note;
mod patient;

pub use job::*;
pub use note::*;
pub use patient::*;

/// Trimmed text, or `None` when blank.
pub(crate) fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
