//! Diagnostics context shared by the output buffer and its backend.
//!
//! Verbosity is configured per conversion instead of through process-wide
//! state. Warnings are emitted as `tracing` events and collected so they can
//! be returned with the render result.

use std::cell::{Cell, RefCell};
use std::fmt;

/// How much the renderer reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verbosity {
    /// Nothing is reported.
    Quiet,
    /// Recoverable problems only.
    #[default]
    Warn,
    Info,
    /// Per-line tracing of the mode stack.
    Debug,
}

/// Diagnostics context for one conversion.
#[derive(Debug, Default)]
pub struct Diagnostics {
    verbosity: Cell<Verbosity>,
    warnings: RefCell<Vec<String>>,
}

impl Diagnostics {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity: Cell::new(verbosity),
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity.get()
    }

    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity.get() >= level
    }

    /// Report a recoverable problem.
    pub fn warn(&self, message: impl fmt::Display) {
        if self.enabled(Verbosity::Warn) {
            let message = message.to_string();
            tracing::warn!("{message}");
            self.warnings.borrow_mut().push(message);
        }
    }

    pub fn info(&self, message: impl fmt::Display) {
        if self.enabled(Verbosity::Info) {
            tracing::info!("{message}");
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!("{message}");
        }
    }

    /// Silence the context until the returned guard is dropped.
    ///
    /// The previous verbosity is restored on every exit path, including
    /// early returns and unwinding.
    #[must_use = "verbosity is restored as soon as the guard is dropped"]
    pub fn quiet(&self) -> QuietGuard<'_> {
        QuietGuard {
            diagnostics: self,
            previous: self.verbosity.replace(Verbosity::Quiet),
        }
    }

    /// Take the collected warnings.
    pub fn take_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }
}

/// Restores the previous verbosity when dropped.
#[derive(Debug)]
pub struct QuietGuard<'a> {
    diagnostics: &'a Diagnostics,
    previous: Verbosity,
}

impl Drop for QuietGuard<'_> {
    fn drop(&mut self) {
        self.diagnostics.verbosity.set(self.previous);
    }
}
