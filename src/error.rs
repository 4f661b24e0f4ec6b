//! Structured error types for gridcore.
//!
//! Most operations in this crate are infallible by design (unknown ids in
//! persisted state are skipped, empty text yields nothing to draw); the
//! errors below cover the cases that indicate a real caller mistake.

/// All errors that can occur in gridcore setup and state management.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A column with this id already exists in the collection.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A filterable column has no matching settings property.
    ///
    /// Raised at binding setup, not deferred: it indicates a mismatched
    /// schema between the grid's columns and the settings structure.
    #[error("no settings property associated with column: {0}")]
    SettingsBinding(String),

    /// Rendering error reported by the host surface.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
