//! Line classifier for Org-style plain text.
//!
//! Turns raw text into typed [`Line`] records. Classification is purely
//! line-local except for delimited blocks (whose content is taken verbatim)
//! and table headers (rows above the first separator of a table).

use std::sync::LazyLock;

use regex::Regex;

use crate::line::{Line, ParagraphType, leading_whitespace};

static HEADLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<stars>\*+)\s+(?P<title>.*)$").expect("invalid headline regex"));
static BEGIN_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#\+begin_(?P<name>\w+)(?:\s+(?P<lang>\S+))?").expect("invalid begin regex")
});
static END_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#\+end_(?P<name>\w+)").expect("invalid end regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#(?:\+|\s|$)").expect("invalid comment regex"));
static INLINE_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:(?:\s(?P<body>.*))?$").expect("invalid example regex"));
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{5,}\s*$").expect("invalid rule regex"));
static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|-").expect("invalid separator regex"));
static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|").expect("invalid table regex"));
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<bullet>[-+]|\d+[.)])(?:\s+(?P<body>.*))?$").expect("invalid list regex")
});
// A star bullet needs indentation, otherwise it is a headline.
static STAR_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?P<bullet>\*)(?:\s+(?P<body>.*))?$").expect("invalid star list regex")
});
static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\s+::(?:\s+.*)?$").expect("invalid definition regex"));

/// A `#+BEGIN_` block that has not been closed yet.
struct OpenBlock {
    name: String,
    mode: ParagraphType,
    lang: String,
    indent: usize,
}

/// Classifies Org-style text into [`Line`] records.
#[derive(Clone, Debug)]
pub struct LineClassifier {
    todo_keywords: Vec<String>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            todo_keywords: vec!["TODO".to_owned(), "DONE".to_owned()],
        }
    }
}

impl LineClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keywords recognized at the start of a headline title.
    #[must_use]
    pub fn with_todo_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.todo_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Classify every line of `text`.
    pub fn classify(&self, text: &str) -> Vec<Line> {
        let mut blocks: Vec<OpenBlock> = Vec::new();
        let mut lines: Vec<Line> = text
            .lines()
            .map(|raw| {
                classify_in_block(raw, &mut blocks)
                    .unwrap_or_else(|| self.classify_line(raw, &mut blocks))
            })
            .collect();
        mark_table_headers(&mut lines);
        lines
    }

    fn classify_line(&self, raw: &str, blocks: &mut Vec<OpenBlock>) -> Line {
        if raw.trim().is_empty() {
            return Line::new(raw, ParagraphType::Blank).with_indent(0);
        }

        if let Some(caps) = HEADLINE.captures(raw) {
            return self.headline(raw, caps["stars"].len(), &caps["title"]);
        }

        if let Some(caps) = BEGIN_BLOCK.captures(raw) {
            let name = caps["name"].to_ascii_uppercase();
            let Some(mode) = block_mode(&name) else {
                return Line::new(raw, ParagraphType::Comment);
            };
            let lang = caps.name("lang").map_or("", |m| m.as_str()).to_owned();
            let mut line = Line::new(raw, ParagraphType::BeginBlock).with_major_mode(mode);
            if mode.is_code() {
                line = line.with_block_lang(lang.clone());
            }
            blocks.push(OpenBlock {
                name,
                mode,
                lang,
                indent: line.indent,
            });
            return line;
        }

        // Stray end lines and other keywords are dropped as comments.
        if END_BLOCK.is_match(raw) || COMMENT.is_match(raw) {
            return Line::new(raw, ParagraphType::Comment);
        }

        if HORIZONTAL_RULE.is_match(raw) {
            return Line::new(raw, ParagraphType::HorizontalRule);
        }

        if let Some(caps) = INLINE_EXAMPLE.captures(raw) {
            let body = caps.name("body").map_or("", |m| m.as_str()).to_owned();
            return Line::new(raw, ParagraphType::InlineExample).with_content(body);
        }

        if TABLE_SEPARATOR.is_match(raw) {
            return Line::new(raw, ParagraphType::TableSeparator)
                .with_major_mode(ParagraphType::Table);
        }

        if TABLE_ROW.is_match(raw) {
            return Line::new(raw, ParagraphType::TableRow).with_major_mode(ParagraphType::Table);
        }

        if let Some(caps) = LIST_ITEM.captures(raw).or_else(|| STAR_ITEM.captures(raw)) {
            let body = caps.name("body").map_or("", |m| m.as_str().trim()).to_owned();
            if DEFINITION.is_match(&body) {
                return Line::new(raw, ParagraphType::DefinitionItem)
                    .with_major_mode(ParagraphType::DefinitionList)
                    .with_content(body);
            }
            let major = if caps["bullet"].starts_with(|c: char| c.is_ascii_digit()) {
                ParagraphType::OrderedList
            } else {
                ParagraphType::UnorderedList
            };
            return Line::new(raw, ParagraphType::ListItem)
                .with_major_mode(major)
                .with_content(body);
        }

        Line::new(raw, ParagraphType::Paragraph)
    }

    fn headline(&self, raw: &str, level: usize, title: &str) -> Line {
        let title = title.trim();
        let (keyword, rest) = match title.split_once(char::is_whitespace) {
            Some((first, rest)) if self.is_todo_keyword(first) => (Some(first), rest.trim()),
            None if self.is_todo_keyword(title) => (Some(title), ""),
            _ => (None, title),
        };
        let mut line = Line::headline(rest, level, keyword.map(str::to_owned));
        line.raw = raw.to_owned();
        line
    }

    fn is_todo_keyword(&self, word: &str) -> bool {
        self.todo_keywords.iter().any(|k| k == word)
    }
}

/// Classify a line inside an open block, if any.
///
/// Returns `None` when the line should go through normal classification
/// (no open block, or a block whose content is regular markup).
fn classify_in_block(raw: &str, blocks: &mut Vec<OpenBlock>) -> Option<Line> {
    let block = blocks.last()?;

    if let Some(caps) = END_BLOCK.captures(raw)
        && caps["name"].eq_ignore_ascii_case(&block.name)
    {
        let mut line = Line::new(raw, ParagraphType::EndBlock);
        if block.mode.is_code() {
            line = line.with_block_lang(block.lang.clone());
        }
        blocks.pop();
        return Some(line);
    }

    if !block.mode.is_code() {
        return None;
    }

    // Verbatim content, minus the indentation of the block itself.
    let strip = leading_whitespace(raw).min(block.indent);
    let content: String = raw.chars().skip(strip).collect();
    Some(
        Line::new(raw, block.mode)
            .with_content(content)
            .with_block_lang(block.lang.clone()),
    )
}

fn block_mode(name: &str) -> Option<ParagraphType> {
    match name {
        "SRC" => Some(ParagraphType::Src),
        "EXAMPLE" => Some(ParagraphType::Example),
        "QUOTE" => Some(ParagraphType::Blockquote),
        "CENTER" => Some(ParagraphType::Center),
        _ => None,
    }
}

/// Turn rows above the first separator of each table into header rows.
fn mark_table_headers(lines: &mut [Line]) {
    let is_table_line = |line: &Line| {
        matches!(
            line.paragraph_type,
            ParagraphType::TableRow | ParagraphType::TableSeparator
        )
    };

    let mut start = 0;
    while start < lines.len() {
        if !is_table_line(&lines[start]) {
            start += 1;
            continue;
        }
        let end = start + lines[start..].iter().take_while(|l| is_table_line(l)).count();
        if let Some(separator) = lines[start..end]
            .iter()
            .position(|l| l.paragraph_type == ParagraphType::TableSeparator)
        {
            for line in &mut lines[start..start + separator] {
                line.paragraph_type = ParagraphType::TableHeader;
            }
        }
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn types(text: &str) -> Vec<ParagraphType> {
        LineClassifier::new()
            .classify(text)
            .iter()
            .map(|l| l.paragraph_type)
            .collect()
    }

    #[test]
    fn test_headline_with_keyword() {
        let lines = LineClassifier::new().classify("** TODO Write tests");
        let line = &lines[0];
        assert_eq!(line.paragraph_type, ParagraphType::Heading2);
        assert_eq!(line.content, "Write tests");
        let headline = line.headline_info().unwrap();
        assert_eq!(headline.level, 2);
        assert_eq!(headline.keyword.as_deref(), Some("TODO"));
    }

    #[test]
    fn test_headline_custom_keywords() {
        let classifier = LineClassifier::new().with_todo_keywords(["WAIT"]);
        let lines = classifier.classify("* WAIT Answer\n* TODO Not a keyword");
        assert_eq!(
            lines[0].headline_info().unwrap().keyword.as_deref(),
            Some("WAIT")
        );
        assert_eq!(lines[1].headline_info().unwrap().keyword, None);
        assert_eq!(lines[1].content, "TODO Not a keyword");
    }

    #[test]
    fn test_list_items() {
        let lines = LineClassifier::new().classify("- one\n  1. nested\n  * star");
        assert_eq!(lines[0].paragraph_type, ParagraphType::ListItem);
        assert_eq!(lines[0].major_mode, Some(ParagraphType::UnorderedList));
        assert_eq!(lines[0].content, "one");
        assert_eq!(lines[0].indent, 0);
        assert_eq!(lines[1].major_mode, Some(ParagraphType::OrderedList));
        assert_eq!(lines[1].indent, 2);
        assert_eq!(lines[2].major_mode, Some(ParagraphType::UnorderedList));
    }

    #[test]
    fn test_definition_item() {
        let lines = LineClassifier::new().classify("- Rust :: a language");
        assert_eq!(lines[0].paragraph_type, ParagraphType::DefinitionItem);
        assert_eq!(lines[0].major_mode, Some(ParagraphType::DefinitionList));
        assert_eq!(lines[0].content, "Rust :: a language");
    }

    #[test]
    fn test_src_block_content_is_verbatim() {
        let text = "  #+BEGIN_SRC rust\n  fn main() {\n      run();\n  }\n  #+END_SRC";
        let lines = LineClassifier::new().classify(text);
        assert_eq!(
            lines.iter().map(|l| l.paragraph_type).collect::<Vec<_>>(),
            vec![
                ParagraphType::BeginBlock,
                ParagraphType::Src,
                ParagraphType::Src,
                ParagraphType::Src,
                ParagraphType::EndBlock,
            ]
        );
        assert_eq!(lines[0].major_mode, Some(ParagraphType::Src));
        assert!(lines.iter().all(|l| l.is_code_block_line));
        assert!(lines.iter().all(|l| l.block_lang == "rust"));
        assert_eq!(lines[2].content, "    run();");
    }

    #[test]
    fn test_markup_inside_src_is_not_classified() {
        assert_eq!(
            types("#+begin_src\n* not a headline\n| not | a table |\n#+end_src"),
            vec![
                ParagraphType::BeginBlock,
                ParagraphType::Src,
                ParagraphType::Src,
                ParagraphType::EndBlock,
            ]
        );
    }

    #[test]
    fn test_quote_content_is_classified() {
        assert_eq!(
            types("#+BEGIN_QUOTE\n- item\n#+END_QUOTE"),
            vec![
                ParagraphType::BeginBlock,
                ParagraphType::ListItem,
                ParagraphType::EndBlock,
            ]
        );
    }

    #[test]
    fn test_unknown_block_and_keywords_are_comments() {
        assert_eq!(
            types("#+TITLE: Doc\n#+BEGIN_VERSE\n# note\n#+END_VERSE"),
            vec![ParagraphType::Comment; 4]
        );
    }

    #[test]
    fn test_table_header_rows() {
        assert_eq!(
            types("| a | b |\n|---+---|\n| 1 | 2 |\n\n| x |"),
            vec![
                ParagraphType::TableHeader,
                ParagraphType::TableSeparator,
                ParagraphType::TableRow,
                ParagraphType::Blank,
                ParagraphType::TableRow,
            ]
        );
    }

    #[test]
    fn test_rule_example_and_paragraph() {
        let lines = LineClassifier::new().classify("-----\n  : keep  spacing\nplain text");
        assert_eq!(lines[0].paragraph_type, ParagraphType::HorizontalRule);
        assert_eq!(lines[1].paragraph_type, ParagraphType::InlineExample);
        assert_eq!(lines[1].content, "keep  spacing");
        assert_eq!(lines[2].paragraph_type, ParagraphType::Paragraph);
    }

    #[test]
    fn test_blank_line_has_zero_indent() {
        let lines = LineClassifier::new().classify("text\n    \nmore");
        assert_eq!(lines[1].paragraph_type, ParagraphType::Blank);
        assert_eq!(lines[1].indent, 0);
    }
}
