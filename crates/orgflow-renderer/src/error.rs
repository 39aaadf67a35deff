//! Error types for rendering.

use crate::Mode;

/// Fatal rendering error. Conversion stops at the first one.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// Text was accumulated under a mode other than the one the buffer holds.
    #[error("accumulation buffer is mixing modes: buffer holds {buffer}, current mode is {}", .current.map_or("none", Mode::as_str))]
    ModeMix {
        /// Mode recorded on the buffer.
        buffer: Mode,
        /// Mode open when the text arrived.
        current: Option<Mode>,
    },

    /// Headline numbering was requested for level zero.
    #[error("invalid headline level {0}, levels start at 1")]
    InvalidLevel(usize),

    /// A single flush unit collected more than one headline.
    #[error("flush unit contains {0} headlines, expected at most one")]
    TooManyHeadlines(usize),
}

/// Error reported by a [`Highlighter`](crate::Highlighter).
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum HighlightError {
    /// The highlighter has no lexer for the language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Highlighting started but failed.
    #[error("highlighting {language} failed: {message}")]
    Failed {
        /// Language being highlighted.
        language: String,
        /// Error message from the highlighter.
        message: String,
    },
}
