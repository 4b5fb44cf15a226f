//! Error types for entreno-core operations.

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in entreno-core operations.
#[derive(Debug, thiserror::Error)]
pub enum EntrenoError {
    // ─────────────────────────────────────────────────────────────────────
    // Validation Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Cannot save a session dated in the future: {date}")]
    FutureSessionDate { date: String },

    #[error("Unknown session type: {name}")]
    SessionTypeUnknown { name: String },

    #[error("Custom session not found: {id}")]
    CustomSessionNotFound { id: String },

    #[error("Invalid routine file: {details}")]
    RoutineImportInvalid { details: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid body weight: {details}")]
    InvalidBodyWeight { details: String },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using EntrenoError.
pub type Result<T> = std::result::Result<T, EntrenoError>;

// Conversion for string error compatibility
impl From<EntrenoError> for String {
    fn from(err: EntrenoError) -> String {
        err.to_string()
    }
}
