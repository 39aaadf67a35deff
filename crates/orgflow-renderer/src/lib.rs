//! Mode stack output buffer with pluggable render backends.
//!
//! This crate turns a sequence of classified [`Line`](orgflow_lines::Line)
//! records into markup. Nested structure (lists in lists, blocks in list
//! items) is recovered purely from indentation and line types.
//!
//! # Architecture
//!
//! - [`OutputBuffer`]: owns the stack of open modes and the accumulation
//!   buffer, decides when to flush and when to open or close modes
//! - [`RenderBackend`]: the contract a target format implements
//! - [`HtmlBackend`]: reference backend producing indented HTML, with an
//!   inline pipeline for emphasis, links, tables and footnotes
//! - [`Highlighter`]: optional strategy for `src` blocks (the `syntect`
//!   feature provides [`SyntectHighlighter`](crate::SyntectHighlighter))
//!
//! # Example
//!
//! ```
//! use orgflow_lines::LineClassifier;
//! use orgflow_renderer::{HtmlBackend, OutputBuffer, RenderOptions};
//!
//! let lines = LineClassifier::new().classify("* Notes\nSome *bold* text");
//! let result = OutputBuffer::new(HtmlBackend::new(RenderOptions::default()))
//!     .render(&lines)
//!     .unwrap();
//! assert_eq!(result.html, "<h1>Notes</h1>\n<p>Some <b>bold</b> text</p>\n");
//! ```

mod backend;
mod diagnostics;
mod error;
mod highlight;
mod html;
mod inline;
mod options;
mod renderer;
mod state;
mod util;

/// Structural modes share the line type enumeration.
pub type Mode = orgflow_lines::ParagraphType;

pub use backend::{FlushContext, ModeContext, RenderBackend};
pub use diagnostics::{Diagnostics, QuietGuard, Verbosity};
pub use error::{HighlightError, RenderError};
#[cfg(feature = "syntect")]
pub use highlight::SyntectHighlighter;
pub use highlight::{Highlighter, PLAIN_TEXT_LEXER, normalize_lang};
pub use html::HtmlBackend;
pub use inline::Footnotes;
pub use options::RenderOptions;
pub use renderer::{OutputBuffer, RenderResult};
pub use state::{AccumulationBuffer, HeadlineNumbers};
pub use util::escape_html;
