//! HTML backend.
//!
//! Produces indented HTML with one structural tag per line:
//! - block modes map to `<p>`, `<h1>`..`<h6>`, `<ul>`/`<ol>`/`<dl>`, `<li>`,
//!   `<table>`/`<tr>`, `<blockquote>`, `<pre>` and a centered `<div>`
//! - prose runs through the inline pipeline (emphasis, links, footnotes)
//! - `src` blocks go to the injected [`Highlighter`] when there is one

use std::fmt::Write;

use orgflow_lines::Line;

use crate::Mode;
use crate::backend::{FlushContext, ModeContext, RenderBackend};
use crate::diagnostics::Diagnostics;
use crate::error::{HighlightError, RenderError};
use crate::highlight::{Highlighter, PLAIN_TEXT_LEXER, normalize_lang};
use crate::inline::{self, Footnotes, InlineSettings};
use crate::options::RenderOptions;
use crate::util::{escape_attr, escape_html, push_indent};

/// Element name for a mode, if the mode is wrapped at all.
const fn html_tag(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::Paragraph => Some("p"),
        Mode::Heading1 => Some("h1"),
        Mode::Heading2 => Some("h2"),
        Mode::Heading3 => Some("h3"),
        Mode::Heading4 => Some("h4"),
        Mode::Heading5 => Some("h5"),
        Mode::Heading6 => Some("h6"),
        Mode::ListItem => Some("li"),
        Mode::OrderedList => Some("ol"),
        Mode::UnorderedList => Some("ul"),
        Mode::DefinitionList => Some("dl"),
        Mode::Table => Some("table"),
        Mode::TableRow | Mode::TableHeader => Some("tr"),
        Mode::Blockquote => Some("blockquote"),
        Mode::Example | Mode::Src | Mode::InlineExample => Some("pre"),
        Mode::Center => Some("div"),
        _ => None,
    }
}

/// HTML render backend.
pub struct HtmlBackend {
    options: RenderOptions,
    highlighter: Option<Box<dyn Highlighter>>,
    footnotes: Footnotes,
    title_pending: bool,
}

impl Default for HtmlBackend {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl HtmlBackend {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            title_pending: options.decorate_title,
            options,
            highlighter: None,
            footnotes: Footnotes::default(),
        }
    }

    /// Hand `src` blocks to `highlighter`.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Footnote definitions collected so far.
    pub fn footnotes(&self) -> &Footnotes {
        &self.footnotes
    }

    fn tag(&self, mode: Mode) -> Option<&'static str> {
        if self.options.skip_tables && mode.is_table() {
            return None;
        }
        if mode == Mode::Src && self.highlighter.is_some() {
            return None;
        }
        html_tag(mode)
    }

    fn attributes(&mut self, mode: Mode, block_lang: &str) -> String {
        let title = std::mem::take(&mut self.title_pending);
        match mode {
            Mode::Center => r#" style="text-align: center""#.to_owned(),
            Mode::Example | Mode::InlineExample => r#" class="example""#.to_owned(),
            Mode::Src if block_lang.is_empty() => r#" class="src""#.to_owned(),
            Mode::Src => format!(r#" class="src src-{}""#, escape_attr(block_lang)),
            _ if title => r#" class="title""#.to_owned(),
            _ => String::new(),
        }
    }

    fn inline(&mut self, text: &str, mode: Mode) -> String {
        let settings = InlineSettings {
            sub_superscripts: self.options.use_sub_superscripts,
            footnotes: self.options.export_footnotes,
            table_header: match mode {
                Mode::TableHeader => Some(true),
                Mode::TableRow => Some(false),
                _ => None,
            },
        };
        inline::rewrite(&escape_html(text), settings, &mut self.footnotes)
    }

    fn flush_code(&self, mode: Mode, ctx: &FlushContext<'_>, out: &mut String) {
        let text = ctx.buffer.text();
        let Some(highlighter) = self.highlighter.as_deref().filter(|_| mode == Mode::Src) else {
            out.push_str(&escape_html(text));
            return;
        };

        let lang = normalize_lang(ctx.block_lang);
        let highlighted = {
            let _quiet = ctx.diagnostics.quiet();
            match highlighter.highlight(lang, text, ctx.diagnostics) {
                Err(HighlightError::UnsupportedLanguage(_)) if lang != PLAIN_TEXT_LEXER => {
                    highlighter.highlight(PLAIN_TEXT_LEXER, text, ctx.diagnostics)
                }
                result => result,
            }
        };

        match highlighted {
            Ok(html) => out.push_str(&html),
            Err(err) => {
                ctx.diagnostics.warn(format_args!("{err}, falling back to plain output"));
                start_line(out, ctx.depth);
                write!(
                    out,
                    r#"<pre class="src">{}</pre>"#,
                    escape_html(text)
                )
                .unwrap();
                out.push('\n');
            }
        }
    }

    /// Flush a unit with no text. A bare headline still takes its number
    /// and keyword, and an empty `src` block still goes to the highlighter
    /// since its tag was suppressed.
    fn flush_empty(&mut self, ctx: &mut FlushContext<'_>, out: &mut String) -> Result<(), RenderError> {
        let lines = ctx.buffer.lines();
        if lines.iter().any(|line| line.headline_info().is_some()) {
            continue_line(out, ctx.depth);
            return self.flush_heading(ctx, out);
        }
        let opens_src = lines
            .iter()
            .any(|line| line.is_begin_block() && line.major_mode == Some(Mode::Src));
        if opens_src && self.highlighter.is_some() {
            self.flush_code(Mode::Src, ctx, out);
        }
        Ok(())
    }

    fn flush_heading(&mut self, ctx: &mut FlushContext<'_>, out: &mut String) -> Result<(), RenderError> {
        let mut headlines = ctx.buffer.lines().iter().filter_map(Line::headline_info);
        let headline = headlines.next().cloned();
        let extra = headlines.count();
        if extra > 0 {
            return Err(RenderError::TooManyHeadlines(extra + 1));
        }

        let mut html = String::new();
        if let Some(headline) = &headline {
            if self.options.export_heading_number {
                let number = ctx.next_headline_number(headline.level)?;
                write!(
                    html,
                    r#"<span class="heading-number heading-number-{}">{number}</span> "#,
                    headline.level
                )
                .unwrap();
            }
            if self.options.export_todo_keyword
                && let Some(keyword) = &headline.keyword
            {
                let keyword = escape_html(keyword);
                write!(
                    html,
                    r#"<span class="todo-keyword {keyword}">{keyword}</span> "#
                )
                .unwrap();
            }
        }
        let mode = ctx.buffer.mode().unwrap_or(ctx.output_type);
        html.push_str(&self.inline(ctx.buffer.text(), mode));
        out.push_str(html.trim_end_matches(' '));
        Ok(())
    }
}

/// Start a new line at `depth` unless the output already sits right after a
/// tag or at a line start.
fn continue_line(out: &mut String, depth: usize) {
    if out.ends_with('\n') {
        push_indent(out, depth);
    } else if !out.is_empty() && !out.ends_with('>') {
        out.push('\n');
        push_indent(out, depth);
    }
}

/// Start a fresh indented line.
fn start_line(out: &mut String, depth: usize) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    push_indent(out, depth);
}

impl RenderBackend for HtmlBackend {
    fn enter(&mut self, mode: Mode, ctx: &ModeContext<'_>, out: &mut String) -> bool {
        let Some(tag) = self.tag(mode) else {
            return true;
        };
        let attributes = self.attributes(mode, ctx.block_lang);
        start_line(out, ctx.depth);
        write!(out, "<{tag}{attributes}>").unwrap();
        false
    }

    fn leave(&mut self, mode: Mode, ctx: &ModeContext<'_>, out: &mut String) -> Mode {
        let Some(tag) = self.tag(mode) else {
            return mode;
        };
        if !mode.is_code() && out.ends_with('\n') {
            push_indent(out, ctx.depth);
        }
        write!(out, "</{tag}>").unwrap();
        out.push('\n');
        mode
    }

    fn flush(&mut self, ctx: &mut FlushContext<'_>, out: &mut String) -> Result<(), RenderError> {
        if ctx.buffer.is_empty() {
            return self.flush_empty(ctx, out);
        }
        let mode = ctx.buffer.mode().unwrap_or(ctx.output_type);

        if mode.is_code() {
            self.flush_code(mode, ctx, out);
            return Ok(());
        }
        if mode.is_table() && self.options.skip_tables {
            return Ok(());
        }

        match mode {
            Mode::Comment => {}
            Mode::HorizontalRule => {
                start_line(out, ctx.depth);
                out.push_str("<hr />\n");
            }
            Mode::DefinitionItem => {
                continue_line(out, ctx.depth);
                let text = ctx.buffer.text();
                let (term, description) = text.split_once("::").unwrap_or((text, ""));
                let term = self.inline(term.trim(), mode);
                let description = self.inline(description.trim(), mode);
                write!(out, "<dt>{term}</dt><dd>{description}</dd>").unwrap();
                out.push('\n');
            }
            _ if mode.is_heading() => {
                continue_line(out, ctx.depth);
                self.flush_heading(ctx, out)?;
            }
            _ => {
                continue_line(out, ctx.depth);
                let html = self.inline(ctx.buffer.text(), mode);
                out.push_str(&html);
            }
        }
        Ok(())
    }

    fn emit_footnotes(&mut self, diagnostics: &Diagnostics, out: &mut String) -> bool {
        if !self.options.export_footnotes || self.footnotes.is_empty() {
            return false;
        }
        diagnostics.debug(format_args!("emitting {} footnotes", self.footnotes.len()));

        start_line(out, 0);
        out.push_str("<div id=\"footnotes\">\n");
        out.push_str("<h2 class=\"footnotes\">Footnotes:</h2>\n");
        out.push_str("<div id=\"text-footnotes\">\n");
        for (name, definition) in self.footnotes.iter() {
            writeln!(
                out,
                r##"<p class="footnote"><sup><a class="footnum" id="fn.{name}" href="#fnr.{name}">{name}</a></sup>{definition}</p>"##
            )
            .unwrap();
        }
        out.push_str("</div>\n");
        out.push_str("</div>\n");
        true
    }
}
