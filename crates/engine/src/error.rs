use std::fmt;

/// Errors surfaced by store mutations and export selection.
///
/// Single-record operations abort on the first error with no partial
/// effect. Import-time per-record failures never surface here; they are
/// collected into the merge report instead.
#[derive(Debug)]
pub enum StoreError {
    /// Malformed or missing required field, or an unresolved reference.
    Validation(String),
    /// Operation targeted an id that does not exist.
    NotFound { entity: &'static str, id: String },
    /// Delete blocked by live references.
    Conflict(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
