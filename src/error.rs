//! Error types for editor sessions.

use thiserror::Error;

/// Everything an editor operation can fail with.
///
/// Only [`EditorError::UnknownLanguage`] is an expected runtime condition;
/// the remaining variants signal misuse or a failing collaborator and are
/// surfaced to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The requested language has no registered grammar.
    #[error("Language '{0}' has no grammar.")]
    UnknownLanguage(String),

    /// The session was removed and accepts no further operations.
    #[error("editor session has been removed")]
    Removed,

    /// An update pass ran before any grammar was bound.
    #[error("editor session has no grammar; call set_options first")]
    NotConfigured,

    /// The tokenizer failed on the current text.
    #[error("tokenizer failed: {0}")]
    Tokenize(String),

    /// An extension hook reported a failure.
    #[error("extension failed: {0}")]
    Extension(String),

    /// An event listener reported a failure.
    #[error("listener failed: {0}")]
    Listener(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = EditorError> = std::result::Result<T, E>;
