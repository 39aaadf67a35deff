//! Output buffer: the mode stack state machine.

use orgflow_lines::Line;

use crate::Mode;
use crate::backend::{FlushContext, ModeContext, RenderBackend};
use crate::diagnostics::{Diagnostics, Verbosity};
use crate::error::RenderError;
use crate::state::{AccumulationBuffer, HeadlineNumbers, ModeStack};

/// Result of rendering a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Rendered output.
    pub html: String,
    /// Warnings collected during conversion (e.g., highlighter failures).
    pub warnings: Vec<String>,
}

/// Turns classified lines into output through a [`RenderBackend`].
///
/// Nesting is tracked purely from indentation and line types: the buffer
/// keeps a stack of open modes with the indent each was opened at, decides
/// for every line whether it continues the pending text or forces a flush,
/// and opens and closes modes around it.
///
/// # Example
///
/// ```
/// use orgflow_lines::LineClassifier;
/// use orgflow_renderer::{HtmlBackend, OutputBuffer};
///
/// let lines = LineClassifier::new().classify("- one\n- two");
/// let result = OutputBuffer::new(HtmlBackend::default()).render(&lines).unwrap();
/// assert_eq!(result.html, "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>\n");
/// ```
pub struct OutputBuffer<B: RenderBackend> {
    backend: B,
    output: String,
    modes: ModeStack,
    buffer: AccumulationBuffer,
    numbering: HeadlineNumbers,
    output_type: Mode,
    block_lang: String,
    diagnostics: Diagnostics,
}

impl<B: RenderBackend> OutputBuffer<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            output: String::with_capacity(4096),
            modes: ModeStack::default(),
            buffer: AccumulationBuffer::default(),
            numbering: HeadlineNumbers::default(),
            output_type: Mode::Start,
            block_lang: String::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Set how much is reported while rendering.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.diagnostics = Diagnostics::new(verbosity);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Output written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Innermost open mode.
    pub fn current_mode(&self) -> Option<Mode> {
        self.modes.current()
    }

    /// Number of open modes.
    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Render all `lines` and finish the document.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RenderError`].
    pub fn render(&mut self, lines: &[Line]) -> Result<RenderResult, RenderError> {
        for line in lines {
            self.feed(line)?;
        }
        self.finish()
    }

    /// Prepare `line` and accumulate what it contributes.
    ///
    /// Code lines contribute their content verbatim with a trailing newline.
    /// Other lines contribute their content, newline-joined with text already
    /// in the buffer. Blank, comment, separator and delimiter lines
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when a flush or the accumulation fails.
    pub fn feed(&mut self, line: &Line) -> Result<(), RenderError> {
        self.prepare(line)?;

        let skipped = matches!(
            line.paragraph_type,
            Mode::Blank
                | Mode::Comment
                | Mode::TableSeparator
                | Mode::BeginBlock
                | Mode::EndBlock
                | Mode::Start
        ) || line.assigned_paragraph_type == Some(Mode::Comment);
        if skipped {
            return Ok(());
        }

        if line.paragraph_type.is_code() {
            let mut text = line.content.clone();
            text.push('\n');
            self.accumulate(&text)
        } else if self.buffer.is_empty() {
            self.accumulate(&line.content)
        } else {
            self.accumulate(&format!("\n{}", line.content))
        }
    }

    /// Decide whether `line` continues the pending text; otherwise flush and
    /// adjust the mode stack for it.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the flush fails.
    pub fn prepare(&mut self, line: &Line) -> Result<(), RenderError> {
        if line.is_code_block_line {
            self.block_lang.clone_from(&line.block_lang);
        }
        if !self.should_accumulate(line) {
            self.flush()?;
            self.maintain_mode_stack(line);
        }
        self.output_type = line.output_type();
        self.buffer.push_line(line.clone());
        self.diagnostics.debug(format_args!(
            "{} at indent {}: {} open modes",
            line.paragraph_type,
            line.indent,
            self.modes.len()
        ));
        Ok(())
    }

    /// Append text to the accumulation buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ModeMix`] when the buffer already holds text
    /// accumulated under a different mode than the one now open.
    pub fn accumulate(&mut self, text: &str) -> Result<(), RenderError> {
        self.buffer.push_str(text, self.modes.current())
    }

    /// Hand the pending text to the backend and clear it.
    ///
    /// The buffer is cleared even when the backend fails.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`RenderError`].
    pub fn flush(&mut self) -> Result<(), RenderError> {
        let result = {
            let mut ctx = FlushContext::new(
                &self.buffer,
                self.output_type,
                self.modes.len().saturating_sub(1),
                &self.block_lang,
                &self.diagnostics,
                &mut self.numbering,
            );
            self.backend.flush(&mut ctx, &mut self.output)
        };
        self.buffer.clear();
        result
    }

    /// Flush, close every open mode and append footnotes.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the final flush fails.
    pub fn finish(&mut self) -> Result<RenderResult, RenderError> {
        self.flush()?;
        while self.pop_mode().is_some() {}
        if self.backend.emit_footnotes(&self.diagnostics, &mut self.output) {
            self.diagnostics.debug("footnotes emitted");
        }
        Ok(RenderResult {
            html: std::mem::take(&mut self.output),
            warnings: self.diagnostics.take_warnings(),
        })
    }

    /// Advance the outline counter for `level` and return the dotted number.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidLevel`] for level zero.
    pub fn next_headline_number(&mut self, level: usize) -> Result<String, RenderError> {
        self.numbering.next(level)
    }

    fn should_accumulate(&self, line: &Line) -> bool {
        let Some(current) = self.modes.current() else {
            return false;
        };

        // Delimited code takes everything up to its end line; inline examples
        // only continue with more inline example lines.
        if current.is_code() {
            return !line.is_end_block()
                && (current.is_block() || line.paragraph_type == current);
        }

        let previous = self.output_type;
        if previous.is_block_delimiter()
            || previous.is_heading()
            || matches!(previous, Mode::Comment | Mode::HorizontalRule)
        {
            return false;
        }

        if line.is_blank() || previous == Mode::Blank {
            return false;
        }

        if line.paragraph_type == Mode::Paragraph {
            return self
                .modes
                .enclosing()
                .filter(|(mode, _)| !mode.is_block())
                .all(|(_, indent)| line.indent > indent);
        }

        false
    }

    fn maintain_mode_stack(&mut self, line: &Line) {
        while let Some(mode) = self.modes.current()
            && (mode.is_heading() || mode == Mode::Paragraph)
        {
            self.pop_mode();
        }

        // An end line closes the innermost block and whatever is nested in it.
        if line.is_end_block()
            && let Some(position) = self.modes.innermost_block()
        {
            while self.modes.len() > position {
                self.pop_mode();
            }
        }

        if !line.is_blank() || self.output_type == Mode::Blank {
            while let Some((mode, indent)) = self.modes.top() {
                let closes = if indent > line.indent {
                    !mode.is_block()
                } else if indent == line.indent {
                    !mode.is_block() && Some(mode) != line.major_mode
                } else {
                    false
                };
                if !closes {
                    break;
                }
                self.pop_mode();
            }
        }

        let mut opened_major = false;
        if let Some(major) = line.major_mode {
            opened_major = self
                .modes
                .top()
                .is_none_or(|(mode, indent)| indent < line.indent || mode.is_block());
            if opened_major && !self.push_mode(major, line.indent) {
                self.output.push('\n');
            }
        }

        // A major mode opened at a clamped indent still takes the line's item.
        if !line.is_blank() && !line.is_block_delimiter() {
            let opens = opened_major
                || self
                    .modes
                    .top()
                    .is_none_or(|(mode, indent)| indent <= line.indent || mode.is_block());
            if opens {
                self.push_mode(line.paragraph_type, line.indent);
            }
        }

        if line.is_blank() && self.modes.current() == Some(Mode::Paragraph) {
            self.pop_mode();
        }
    }

    /// Open `mode`. Returns whether the backend suppressed its markup.
    fn push_mode(&mut self, mode: Mode, indent: usize) -> bool {
        let ctx = ModeContext {
            depth: self.modes.len(),
            indent: self.modes.clamp(indent),
            block_lang: &self.block_lang,
            diagnostics: &self.diagnostics,
        };
        let suppressed = self.backend.enter(mode, &ctx, &mut self.output);
        self.modes.push(mode, indent);
        suppressed
    }

    fn pop_mode(&mut self) -> Option<Mode> {
        let (mode, indent) = self.modes.pop()?;
        let ctx = ModeContext {
            depth: self.modes.len(),
            indent,
            block_lang: &self.block_lang,
            diagnostics: &self.diagnostics,
        };
        let closed = self.backend.leave(mode, &ctx, &mut self.output);
        if closed != mode {
            self.diagnostics
                .warn(format_args!("backend closed {closed} while leaving {mode}"));
        }
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use orgflow_lines::{LineClassifier, ParagraphType};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{HighlightError, Highlighter, HtmlBackend, RenderOptions};

    /// Backend that records calls instead of producing markup.
    #[derive(Default)]
    struct RecordingBackend {
        events: Vec<String>,
        enters: usize,
        leaves: usize,
        flushed: Vec<(Mode, String)>,
        /// Opening indent seen by every `enter`.
        opened_at: Vec<(Mode, usize)>,
        /// Mode reported back from every `leave`, if forced.
        leave_as: Option<Mode>,
    }

    impl RenderBackend for RecordingBackend {
        fn enter(&mut self, mode: Mode, ctx: &ModeContext<'_>, _out: &mut String) -> bool {
            self.enters += 1;
            self.events.push(format!("enter {mode}@{}", ctx.depth));
            self.opened_at.push((mode, ctx.indent));
            false
        }

        fn leave(&mut self, mode: Mode, _ctx: &ModeContext<'_>, _out: &mut String) -> Mode {
            self.leaves += 1;
            self.events.push(format!("leave {mode}"));
            self.leave_as.unwrap_or(mode)
        }

        fn flush(&mut self, ctx: &mut FlushContext<'_>, _out: &mut String) -> Result<(), RenderError> {
            if !ctx.buffer.is_empty() {
                let mode = ctx.buffer.mode().unwrap_or(ctx.output_type);
                self.flushed.push((mode, ctx.buffer.text().to_owned()));
            }
            Ok(())
        }
    }

    fn classify(text: &str) -> Vec<Line> {
        LineClassifier::new().classify(text)
    }

    fn record(text: &str) -> OutputBuffer<RecordingBackend> {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        buffer.render(&classify(text)).unwrap();
        buffer
    }

    fn render_html(text: &str) -> RenderResult {
        render_html_with(text, RenderOptions::default())
    }

    fn render_html_with(text: &str, options: RenderOptions) -> RenderResult {
        OutputBuffer::new(HtmlBackend::new(options))
            .render(&classify(text))
            .unwrap()
    }

    #[test]
    fn test_paragraph_deeper_than_item_continues() {
        let buffer = record("  - item\n    more");
        assert_eq!(
            buffer.backend().flushed,
            vec![(Mode::ListItem, "item\nmore".to_owned())]
        );
    }

    #[test]
    fn test_paragraph_at_item_indent_flushes() {
        let buffer = record("  - item\n  more");
        assert_eq!(
            buffer.backend().flushed,
            vec![
                (Mode::ListItem, "item".to_owned()),
                (Mode::Paragraph, "more".to_owned()),
            ]
        );
    }

    #[test]
    fn test_two_blank_lines_empty_the_stack() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        for line in classify("- a\n  - b\n\n    para\n\n") {
            buffer.feed(&line).unwrap();
        }
        assert_eq!(
            buffer.modes.modes(),
            vec![
                Mode::UnorderedList,
                Mode::ListItem,
                Mode::UnorderedList,
                Mode::ListItem,
            ]
        );
        buffer.feed(&Line::blank()).unwrap();
        assert_eq!(buffer.depth(), 0);
    }

    #[test]
    fn test_single_blank_line_keeps_list_open() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        for line in classify("- a\n\n- b") {
            buffer.feed(&line).unwrap();
        }
        assert_eq!(buffer.modes.modes(), vec![Mode::UnorderedList, Mode::ListItem]);
        assert_eq!(
            buffer.backend().events,
            vec![
                "enter unordered_list@0",
                "enter list_item@1",
                "leave list_item",
                "enter list_item@1",
            ]
        );
    }

    #[test]
    fn test_enters_and_leaves_balance() {
        let buffer = record(
            "* Heading\ntext\n- a\n  1. b\n     c\n#+BEGIN_QUOTE\n| x |\n#+END_QUOTE\n: ex\n-----",
        );
        let backend = buffer.backend();
        assert_eq!(backend.enters, backend.leaves);
        assert_eq!(buffer.depth(), 0);
    }

    #[test]
    fn test_src_block_accumulates_verbatim() {
        let buffer = record("#+BEGIN_SRC sh\n  echo hi\n\n- not a list\n#+END_SRC");
        assert_eq!(
            buffer.backend().flushed,
            vec![(Mode::Src, "  echo hi\n\n- not a list\n".to_owned())]
        );
        assert_eq!(buffer.block_lang, "sh");
    }

    #[test]
    fn test_inline_example_does_not_swallow_paragraph() {
        let buffer = record(": one\n: two\nprose");
        assert_eq!(
            buffer.backend().flushed,
            vec![
                (Mode::InlineExample, "one\ntwo\n".to_owned()),
                (Mode::Paragraph, "prose".to_owned()),
            ]
        );
    }

    #[test]
    fn test_list_directly_inside_quote_at_equal_indent() {
        let buffer = record("#+BEGIN_QUOTE\n- a\n- b\n#+END_QUOTE");
        assert_eq!(
            buffer.backend().events,
            vec![
                "enter blockquote@0",
                "enter unordered_list@1",
                "enter list_item@2",
                "leave list_item",
                "enter list_item@2",
                "leave list_item",
                "leave unordered_list",
                "leave blockquote",
            ]
        );
    }

    #[test]
    fn test_quote_inside_list_item_at_equal_indent() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        for line in classify("- item\n  #+BEGIN_QUOTE\n  quoted\n  #+END_QUOTE\n  after") {
            buffer.feed(&line).unwrap();
        }
        assert_eq!(
            buffer.modes.modes(),
            vec![Mode::UnorderedList, Mode::ListItem, Mode::Paragraph]
        );
        let events = &buffer.backend().events;
        assert_eq!(
            events[events.len() - 3..],
            ["leave paragraph", "leave blockquote", "enter paragraph@2"]
        );
    }

    #[test]
    fn test_blank_lines_do_not_close_blocks() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        for line in classify("#+BEGIN_QUOTE\ntext\n\n\n\nmore") {
            buffer.feed(&line).unwrap();
        }
        assert_eq!(buffer.modes.modes(), vec![Mode::Blockquote, Mode::Paragraph]);
    }

    #[test]
    fn test_indents_are_clamped() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        for line in classify("    #+BEGIN_QUOTE\n- item") {
            buffer.feed(&line).unwrap();
        }
        assert_eq!(buffer.modes.indents(), vec![4, 4, 4]);
    }

    #[test]
    fn test_enter_sees_clamped_indent() {
        let buffer = record("    #+BEGIN_QUOTE\n- item");
        assert_eq!(
            buffer.backend().opened_at,
            vec![
                (Mode::Blockquote, 4),
                (Mode::UnorderedList, 4),
                (Mode::ListItem, 4),
            ]
        );
    }

    #[test]
    fn test_accumulate_under_other_mode_fails() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        buffer
            .prepare(&Line::new("text", ParagraphType::Paragraph))
            .unwrap();
        buffer.accumulate("text").unwrap();
        buffer.push_mode(Mode::ListItem, 0);
        assert_eq!(
            buffer.accumulate("more"),
            Err(RenderError::ModeMix {
                buffer: Mode::Paragraph,
                current: Some(Mode::ListItem),
            })
        );
    }

    #[test]
    fn test_flush_clears_buffer_on_error() {
        let mut buffer = OutputBuffer::new(HtmlBackend::default());
        buffer.push_mode(Mode::Heading1, 0);
        buffer.accumulate("A").unwrap();
        buffer.buffer.push_line(Line::headline("A", 1, None));
        buffer.buffer.push_line(Line::headline("B", 1, None));
        assert_eq!(buffer.flush(), Err(RenderError::TooManyHeadlines(2)));
        assert!(buffer.buffer.is_empty());
        assert!(buffer.buffer.lines().is_empty());
    }

    #[test]
    fn test_leave_mismatch_is_a_warning() {
        let backend = RecordingBackend {
            leave_as: Some(Mode::Table),
            ..RecordingBackend::default()
        };
        let result = OutputBuffer::new(backend).render(&classify("text")).unwrap();
        assert_eq!(
            result.warnings,
            vec!["backend closed table while leaving paragraph"]
        );
    }

    #[test]
    fn test_quiet_verbosity_drops_leave_mismatch() {
        let backend = RecordingBackend {
            leave_as: Some(Mode::Table),
            ..RecordingBackend::default()
        };
        let result = OutputBuffer::new(backend)
            .with_verbosity(Verbosity::Quiet)
            .render(&classify("text"))
            .unwrap();
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_next_headline_number() {
        let mut buffer = OutputBuffer::new(RecordingBackend::default());
        assert_eq!(buffer.next_headline_number(1).unwrap(), "1");
        assert_eq!(buffer.next_headline_number(2).unwrap(), "1.1");
        assert_eq!(buffer.next_headline_number(2).unwrap(), "1.2");
        assert_eq!(
            buffer.next_headline_number(0),
            Err(RenderError::InvalidLevel(0))
        );
    }

    #[test]
    fn test_html_document() {
        let result = render_html("* Title\nSome *bold* text.\n- one\n- two");
        assert_eq!(
            result.html,
            "<h1>Title</h1>\n<p>Some <b>bold</b> text.</p>\n<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>\n"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_html_src_block_without_highlighter() {
        let result = render_html("#+BEGIN_SRC rust\nlet x = 1 < 2;\n#+END_SRC\nAfter");
        assert_eq!(
            result.html,
            "<pre class=\"src src-rust\">\nlet x = 1 &lt; 2;\n</pre>\n<p>After</p>\n"
        );
    }

    #[test]
    fn test_html_table() {
        let result = render_html("| a | b |\n|---+---|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            "<table>\n  <tr><th>a</th><th>b</th></tr>\n  <tr><td>1</td><td>2</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_html_skip_tables() {
        let options = RenderOptions {
            skip_tables: true,
            ..RenderOptions::default()
        };
        let result = render_html_with("| a |\n\nafter", options);
        assert_eq!(result.html, "<p>after</p>\n");
    }

    #[test]
    fn test_html_list_inside_quote() {
        let result = render_html("#+BEGIN_QUOTE\n- a\n- b\n#+END_QUOTE\ntext");
        assert_eq!(
            result.html,
            "<blockquote>\n  <ul>\n    <li>a</li>\n    <li>b</li>\n  </ul>\n</blockquote>\n<p>text</p>\n"
        );
    }

    #[test]
    fn test_html_paragraph_inside_list_item() {
        let result = render_html("- item\n  more\n\n  second para");
        assert_eq!(
            result.html,
            "<ul>\n  <li>item\nmore\n    <p>second para</p>\n  </li>\n</ul>\n"
        );
    }

    #[test]
    fn test_html_heading_numbers() {
        let options = RenderOptions {
            export_heading_number: true,
            ..RenderOptions::default()
        };
        let result = render_html_with("* A\n** B\n* C", options);
        assert_eq!(
            result.html,
            "<h1><span class=\"heading-number heading-number-1\">1</span> A</h1>\n\
             <h2><span class=\"heading-number heading-number-2\">1.1</span> B</h2>\n\
             <h1><span class=\"heading-number heading-number-1\">2</span> C</h1>\n"
        );
    }

    #[test]
    fn test_html_keyword_only_headline_keeps_numbering() {
        let options = RenderOptions {
            export_heading_number: true,
            ..RenderOptions::default()
        };
        let result = render_html_with("* TODO\n* Second", options);
        assert_eq!(
            result.html,
            "<h1><span class=\"heading-number heading-number-1\">1</span> \
             <span class=\"todo-keyword TODO\">TODO</span></h1>\n\
             <h1><span class=\"heading-number heading-number-1\">2</span> Second</h1>\n"
        );
    }

    #[test]
    fn test_html_todo_keyword_disabled() {
        let options = RenderOptions {
            export_todo_keyword: false,
            ..RenderOptions::default()
        };
        let result = render_html_with("* TODO Plan", options);
        assert_eq!(result.html, "<h1>Plan</h1>\n");
    }

    #[test]
    fn test_html_sub_superscripts_off_by_default() {
        let result = render_html("H_{2}O and x^{n}");
        assert_eq!(result.html, "<p>H_{2}O and x^{n}</p>\n");
    }

    /// Highlighter that tags its output with the language it was asked for.
    struct TaggingHighlighter;

    impl Highlighter for TaggingHighlighter {
        fn highlight(&self, lang: &str, code: &str, _diagnostics: &Diagnostics) -> Result<String, HighlightError> {
            Ok(format!("<pre hl={lang}>{code}</pre>\n"))
        }
    }

    #[test]
    fn test_html_empty_src_block_reaches_highlighter() {
        let backend = HtmlBackend::default().with_highlighter(Box::new(TaggingHighlighter));
        let result = OutputBuffer::new(backend)
            .render(&classify(
                "#+BEGIN_SRC\n#+END_SRC\n#+BEGIN_SRC emacs-lisp\n(a)\n#+END_SRC",
            ))
            .unwrap();
        assert_eq!(result.html, "<pre hl=text></pre>\n<pre hl=scheme>(a)\n</pre>\n");
    }

    #[test]
    fn test_html_footnotes() {
        let result = render_html("Text[fn:1:Note.]");
        assert_eq!(
            result.html,
            "<p>Text<sup><a class=\"footref\" id=\"fnr.1\" href=\"#fn.1\">1</a></sup></p>\n\
             <div id=\"footnotes\">\n\
             <h2 class=\"footnotes\">Footnotes:</h2>\n\
             <div id=\"text-footnotes\">\n\
             <p class=\"footnote\"><sup><a class=\"footnum\" id=\"fn.1\" href=\"#fnr.1\">1</a></sup>Note.</p>\n\
             </div>\n\
             </div>\n"
        );
    }

    #[test]
    fn test_html_footnotes_disabled() {
        let options = RenderOptions {
            export_footnotes: false,
            ..RenderOptions::default()
        };
        let result = render_html_with("Text[fn:1:Note.]", options);
        assert_eq!(result.html, "<p>Text[fn:1:Note.]</p>\n");
    }

    #[test]
    fn test_html_definition_list() {
        let result = render_html("- Rust :: a language\n- Org :: a format");
        assert_eq!(
            result.html,
            "<dl>\n  <dt>Rust</dt><dd>a language</dd>\n  <dt>Org</dt><dd>a format</dd>\n</dl>\n"
        );
    }

    #[test]
    fn test_html_comment_and_rule() {
        let result = render_html("#+TITLE: ignored\nabove\n-----\nbelow");
        assert_eq!(result.html, "<p>above</p>\n<hr />\n<p>below</p>\n");
    }

    const FRAGMENTS: &[&str] = &[
        "- item",
        "  - nested",
        "    deeper text",
        "  text",
        "text",
        "",
        "* Heading",
        "** TODO Sub",
        "1. first",
        "- term :: def",
        "| a | b |",
        "|---+---|",
        "#+BEGIN_QUOTE",
        "#+END_QUOTE",
        "  #+BEGIN_EXAMPLE",
        "  #+END_EXAMPLE",
        "#+BEGIN_SRC rust",
        "#+END_SRC",
        ": example",
        "-----",
        "# comment",
        "*bold* [[x.org][x]] [fn:1:n]",
    ];

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40)
            .prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_indents_never_decrease(text in document()) {
            let mut buffer = OutputBuffer::new(RecordingBackend::default());
            for line in classify(&text) {
                buffer.feed(&line).unwrap();
                let indents = buffer.modes.indents();
                prop_assert!(indents.windows(2).all(|w| w[0] <= w[1]), "{indents:?}");
            }
        }

        #[test]
        fn prop_stack_balances(text in document()) {
            let mut buffer = OutputBuffer::new(RecordingBackend::default());
            buffer.render(&classify(&text)).unwrap();
            prop_assert_eq!(buffer.backend().enters, buffer.backend().leaves);
            prop_assert_eq!(buffer.depth(), 0);
        }

        #[test]
        fn prop_html_renders_without_error(text in document()) {
            let result = OutputBuffer::new(HtmlBackend::default()).render(&classify(&text));
            prop_assert!(result.is_ok());
        }
    }
}
