//! Classified line records for the orgflow renderer.
//!
//! The renderer never looks at raw text structure itself. It consumes a
//! sequence of [`Line`] records carrying a [`ParagraphType`], an indent, an
//! optional major mode and block metadata. [`LineClassifier`] produces such
//! records from Org-style text.
//!
//! # Example
//!
//! ```
//! use orgflow_lines::{LineClassifier, ParagraphType};
//!
//! let lines = LineClassifier::new().classify("* Title\n- item");
//! assert_eq!(lines[0].paragraph_type, ParagraphType::Heading1);
//! assert_eq!(lines[1].major_mode, Some(ParagraphType::UnorderedList));
//! ```

mod classify;
mod line;

pub use classify::LineClassifier;
pub use line::{Headline, Line, LineKind, ParagraphType};
