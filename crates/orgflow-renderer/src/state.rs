//! State owned by the output buffer: the mode stack, the accumulation
//! buffer and the headline counters.

use orgflow_lines::Line;

use crate::Mode;
use crate::error::RenderError;

/// Stack of open modes with the indent each was opened at.
#[derive(Debug, Default)]
pub(crate) struct ModeStack {
    entries: Vec<(Mode, usize)>,
}

impl ModeStack {
    /// Push a mode. The indent is raised to the enclosing indent if needed so
    /// indents never decrease from bottom to top.
    pub(crate) fn push(&mut self, mode: Mode, indent: usize) {
        let indent = self.clamp(indent);
        self.entries.push((mode, indent));
    }

    /// Indent a mode pushed at `indent` would be recorded with.
    pub(crate) fn clamp(&self, indent: usize) -> usize {
        self.top().map_or(indent, |(_, top)| indent.max(top))
    }

    pub(crate) fn pop(&mut self) -> Option<(Mode, usize)> {
        self.entries.pop()
    }

    pub(crate) fn top(&self) -> Option<(Mode, usize)> {
        self.entries.last().copied()
    }

    pub(crate) fn current(&self) -> Option<Mode> {
        self.top().map(|(mode, _)| mode)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries below the top, innermost first.
    pub(crate) fn enclosing(&self) -> impl Iterator<Item = (Mode, usize)> + '_ {
        let below = self.entries.len().saturating_sub(1);
        self.entries[..below].iter().rev().copied()
    }

    /// Position of the innermost delimited block, counted from the bottom.
    pub(crate) fn innermost_block(&self) -> Option<usize> {
        self.entries.iter().rposition(|(mode, _)| mode.is_block())
    }

    #[cfg(test)]
    pub(crate) fn indents(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, indent)| *indent).collect()
    }

    #[cfg(test)]
    pub(crate) fn modes(&self) -> Vec<Mode> {
        self.entries.iter().map(|(mode, _)| *mode).collect()
    }
}

/// Pending text plus the lines that contributed to it.
#[derive(Debug, Default)]
pub struct AccumulationBuffer {
    text: String,
    lines: Vec<Line>,
    mode: Option<Mode>,
}

impl AccumulationBuffer {
    /// Accumulated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines that contributed to this flush unit.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Mode the text was accumulated under.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Whether no text has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append text accumulated while `current` is the open mode.
    pub(crate) fn push_str(&mut self, text: &str, current: Option<Mode>) -> Result<(), RenderError> {
        if let Some(buffer) = self.mode
            && Some(buffer) != current
        {
            return Err(RenderError::ModeMix { buffer, current });
        }
        if self.mode.is_none() {
            self.mode = current;
        }
        self.text.push_str(text);
        Ok(())
    }

    pub(crate) fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.lines.clear();
        self.mode = None;
    }
}

/// Outline counters, one per open heading depth.
#[derive(Debug, Default)]
pub struct HeadlineNumbers {
    counters: Vec<usize>,
}

impl HeadlineNumbers {
    /// Advance the counter for `level` and return the dotted number.
    ///
    /// Deeper counters are discarded and missing shallower ones start at zero,
    /// so levels `1, 2, 2, 1, 3` yield `1`, `1.1`, `1.2`, `2`, `2.0.1`.
    pub fn next(&mut self, level: usize) -> Result<String, RenderError> {
        if level == 0 {
            return Err(RenderError::InvalidLevel(level));
        }
        self.counters.resize(level, 0);
        if let Some(last) = self.counters.last_mut() {
            *last += 1;
        }
        Ok(self
            .counters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("."))
    }
}
