//! Render backend trait for format-specific output.
//!
//! The output buffer decides *when* structure opens, closes and flushes; a
//! backend decides *what* that looks like in the target markup. The buffer
//! only talks to a backend through this trait and the two context structs.

use crate::Mode;
use crate::diagnostics::Diagnostics;
use crate::error::RenderError;
use crate::state::{AccumulationBuffer, HeadlineNumbers};

/// Context passed to [`RenderBackend::enter`] and [`RenderBackend::leave`].
#[derive(Debug)]
pub struct ModeContext<'a> {
    /// Number of modes enclosing the one being opened or closed.
    pub depth: usize,
    /// Indent the mode is opened at, after clamping to the enclosing mode.
    pub indent: usize,
    /// Language of the most recent code block line.
    pub block_lang: &'a str,
    pub diagnostics: &'a Diagnostics,
}

/// Context passed to [`RenderBackend::flush`].
#[derive(Debug)]
pub struct FlushContext<'a> {
    /// Text and lines collected since the previous flush.
    pub buffer: &'a AccumulationBuffer,
    /// Output type of the last prepared line.
    pub output_type: Mode,
    /// Number of modes enclosing the current one.
    pub depth: usize,
    pub block_lang: &'a str,
    pub diagnostics: &'a Diagnostics,
    numbering: &'a mut HeadlineNumbers,
}

impl<'a> FlushContext<'a> {
    pub(crate) fn new(
        buffer: &'a AccumulationBuffer,
        output_type: Mode,
        depth: usize,
        block_lang: &'a str,
        diagnostics: &'a Diagnostics,
        numbering: &'a mut HeadlineNumbers,
    ) -> Self {
        Self {
            buffer,
            output_type,
            depth,
            block_lang,
            diagnostics,
            numbering,
        }
    }

    /// Advance the outline counter for `level` and return the dotted number.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidLevel`] for level zero.
    pub fn next_headline_number(&mut self, level: usize) -> Result<String, RenderError> {
        self.numbering.next(level)
    }
}

/// Backend trait for format-specific rendering.
///
/// Implementations produce:
/// - opening and closing markup for structural modes (`enter`/`leave`)
/// - serialized content for one flush unit (`flush`)
/// - trailing footnote definitions (`emit_footnotes`)
pub trait RenderBackend {
    /// Open `mode`, writing any opening markup to `out`.
    ///
    /// Returns `true` when the mode produced no markup (suppressed).
    fn enter(&mut self, mode: Mode, ctx: &ModeContext<'_>, out: &mut String) -> bool;

    /// Close `mode`, writing any closing markup to `out`. Returns the mode
    /// that was closed.
    fn leave(&mut self, mode: Mode, ctx: &ModeContext<'_>, out: &mut String) -> Mode;

    /// Serialize the accumulated buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the buffer cannot be serialized. The
    /// buffer is cleared by the caller either way.
    fn flush(&mut self, ctx: &mut FlushContext<'_>, out: &mut String) -> Result<(), RenderError>;

    /// Write collected footnote definitions. Returns whether anything was
    /// written.
    fn emit_footnotes(&mut self, _diagnostics: &Diagnostics, _out: &mut String) -> bool {
        false
    }
}
