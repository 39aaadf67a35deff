//! Line records produced by the classifier and consumed by the renderer.

use std::fmt;

/// Structural type of a line.
///
/// The same enumeration doubles as the set of modes the renderer keeps on
/// its stack: a list item line opens a `ListItem` mode, a table line opens a
/// `Table` major mode, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParagraphType {
    /// Initial output type before any line was seen.
    Start,
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    ListItem,
    OrderedList,
    UnorderedList,
    DefinitionList,
    DefinitionItem,
    Table,
    TableRow,
    TableHeader,
    TableSeparator,
    Blockquote,
    Example,
    Src,
    InlineExample,
    Center,
    Comment,
    HorizontalRule,
    BeginBlock,
    EndBlock,
    Blank,
}

impl ParagraphType {
    /// Heading type for an outline level. Levels deeper than six share `Heading6`.
    #[must_use]
    pub fn heading(level: usize) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            5 => Self::Heading5,
            _ => Self::Heading6,
        }
    }

    /// Heading level (1-6), or `None` for non-heading types.
    #[must_use]
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            Self::Heading4 => Some(4),
            Self::Heading5 => Some(5),
            Self::Heading6 => Some(6),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    /// Whether the mode is a delimited block, opened and closed only by
    /// explicit `#+BEGIN_`/`#+END_` lines.
    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(self, Self::Blockquote | Self::Center | Self::Example | Self::Src)
    }

    /// Whether content in this mode is whitespace-preserving.
    #[must_use]
    pub fn is_code(self) -> bool {
        matches!(self, Self::Src | Self::Example | Self::InlineExample)
    }

    #[must_use]
    pub fn is_table(self) -> bool {
        matches!(
            self,
            Self::Table | Self::TableRow | Self::TableHeader | Self::TableSeparator
        )
    }

    #[must_use]
    pub fn is_block_delimiter(self) -> bool {
        matches!(self, Self::BeginBlock | Self::EndBlock)
    }

    /// Snake-case name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Heading4 => "heading4",
            Self::Heading5 => "heading5",
            Self::Heading6 => "heading6",
            Self::ListItem => "list_item",
            Self::OrderedList => "ordered_list",
            Self::UnorderedList => "unordered_list",
            Self::DefinitionList => "definition_list",
            Self::DefinitionItem => "definition_item",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::TableHeader => "table_header",
            Self::TableSeparator => "table_separator",
            Self::Blockquote => "blockquote",
            Self::Example => "example",
            Self::Src => "src",
            Self::InlineExample => "inline_example",
            Self::Center => "center",
            Self::Comment => "comment",
            Self::HorizontalRule => "horizontal_rule",
            Self::BeginBlock => "begin_block",
            Self::EndBlock => "end_block",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for ParagraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outline data carried only by headline lines.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Headline {
    /// Outline level, the number of leading stars.
    pub level: usize,
    /// TODO-style keyword (e.g. `TODO`, `DONE`).
    pub keyword: Option<String>,
}

/// Distinguishes plain lines from headlines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineKind {
    #[default]
    Plain,
    Headline(Headline),
}

/// A classified input line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Line exactly as it appeared in the source.
    pub raw: String,
    /// Text left after structural markers (stars, bullets, `: `) are removed.
    pub content: String,
    pub paragraph_type: ParagraphType,
    /// Override of `paragraph_type` for output purposes.
    pub assigned_paragraph_type: Option<ParagraphType>,
    /// Column of the first non-whitespace character.
    pub indent: usize,
    /// Mode this line opens around itself (a list, a table, a block).
    pub major_mode: Option<ParagraphType>,
    /// Whether the line belongs to a `src` or `example` block, delimiters included.
    pub is_code_block_line: bool,
    /// Language declared on the enclosing `#+BEGIN_SRC` line.
    pub block_lang: String,
    pub kind: LineKind,
}

impl Line {
    /// Create a plain line, deriving indent and trimmed content from `raw`.
    pub fn new(raw: impl Into<String>, paragraph_type: ParagraphType) -> Self {
        let raw = raw.into();
        let indent = leading_whitespace(&raw);
        let content = raw.trim().to_owned();
        Self {
            raw,
            content,
            paragraph_type,
            assigned_paragraph_type: None,
            indent,
            major_mode: None,
            is_code_block_line: false,
            block_lang: String::new(),
            kind: LineKind::Plain,
        }
    }

    /// Create a blank line.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", ParagraphType::Blank)
    }

    /// Create a headline line of the given level.
    pub fn headline(title: impl Into<String>, level: usize, keyword: Option<String>) -> Self {
        let title = title.into();
        let mut line = Self::new(title.clone(), ParagraphType::heading(level));
        line.indent = 0;
        line.content = title.trim().to_owned();
        line.kind = LineKind::Headline(Headline { level, keyword });
        line
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_major_mode(mut self, mode: ParagraphType) -> Self {
        self.major_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_assigned_type(mut self, paragraph_type: ParagraphType) -> Self {
        self.assigned_paragraph_type = Some(paragraph_type);
        self
    }

    /// Mark the line as part of a code block with the given language.
    #[must_use]
    pub fn with_block_lang(mut self, lang: impl Into<String>) -> Self {
        self.is_code_block_line = true;
        self.block_lang = lang.into();
        self
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.paragraph_type == ParagraphType::Blank
    }

    #[must_use]
    pub fn is_begin_block(&self) -> bool {
        self.paragraph_type == ParagraphType::BeginBlock
    }

    #[must_use]
    pub fn is_end_block(&self) -> bool {
        self.paragraph_type == ParagraphType::EndBlock
    }

    #[must_use]
    pub fn is_block_delimiter(&self) -> bool {
        self.paragraph_type.is_block_delimiter()
    }

    /// Type used when the line is rendered.
    #[must_use]
    pub fn output_type(&self) -> ParagraphType {
        self.assigned_paragraph_type.unwrap_or(self.paragraph_type)
    }

    /// Headline data, if this line is a headline.
    #[must_use]
    pub fn headline_info(&self) -> Option<&Headline> {
        match &self.kind {
            LineKind::Headline(headline) => Some(headline),
            LineKind::Plain => None,
        }
    }
}

/// Count leading whitespace characters.
pub(crate) fn leading_whitespace(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}
