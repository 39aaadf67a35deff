//! Inline markup rewriting for flushed prose.
//!
//! Passes run in a fixed order over text that has already been HTML-escaped:
//! emphasis, sub/superscripts, bare image links, links, table cells,
//! footnote references and finally special symbols.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::util::is_image_path;

/// Emphasis markers and the markup each one produces.
const EMPHASIS: [(&str, &str, &str); 6] = [
    ("b", "<b>", "</b>"),
    ("i", "<i>", "</i>"),
    (
        "u",
        "<span style=\"text-decoration:underline\">",
        "</span>",
    ),
    ("code", "<code>", "</code>"),
    ("verbatim", "<code>", "</code>"),
    ("del", "<del>", "</del>"),
];

/// Entities reachable through `\name`.
const ENTITIES: [(&str, &str); 16] = [
    ("alpha", "&alpha;"),
    ("beta", "&beta;"),
    ("gamma", "&gamma;"),
    ("delta", "&delta;"),
    ("lambda", "&lambda;"),
    ("mu", "&mu;"),
    ("pi", "&pi;"),
    ("sigma", "&sigma;"),
    ("rarr", "&rarr;"),
    ("larr", "&larr;"),
    ("nbsp", "&nbsp;"),
    ("copy", "&copy;"),
    ("reg", "&reg;"),
    ("deg", "&deg;"),
    ("times", "&times;"),
    ("hellip", "&hellip;"),
];

static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<pre>^|[\s("'{])(?:"#,
        r"\*(?P<b>[^\s*]|[^\s*][^*]*?[^\s*])\*",
        r"|/(?P<i>[^\s/]|[^\s/][^/]*?[^\s/])/",
        r"|_(?P<u>[^\s_]|[^\s_][^_]*?[^\s_])_",
        r"|=(?P<code>[^\s=]|[^\s=][^=]*?[^\s=])=",
        r"|~(?P<verbatim>[^\s~]|[^\s~][^~]*?[^\s~])~",
        r"|\+(?P<del>[^\s+]|[^\s+][^+]*?[^\s+])\+",
        r#")(?P<post>[\s\-.,:!?'")}]|$)"#,
    ))
    .expect("invalid emphasis regex")
});
static SUB_SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<base>\S)(?P<kind>[_^])\{(?P<body>[^}]*)\}")
        .expect("invalid sub/superscript regex")
});
static BARE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\[(?P<path>[^\[\]]+\.(?:png|jpe?g|gif|svg|webp|bmp))\]\]")
        .expect("invalid image link regex")
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(?P<url>[^\[\]]+)\](?:\[(?P<desc>[^\[\]]+)\])?\]").expect("invalid link regex")
});
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[fn:(?P<name>[\w-]+)(?::(?P<def>[^\]]*))?\]").expect("invalid footnote regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?P<name>[a-zA-Z]+)").expect("invalid entity regex"));

/// Footnote definitions in first-registration order.
#[derive(Debug, Default)]
pub struct Footnotes {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Footnotes {
    /// Register a definition. Returns `false` when `name` is already defined;
    /// the first definition is kept.
    pub fn register(&mut self, name: &str, definition: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push((name.to_owned(), definition.to_owned()));
        true
    }

    /// Definition registered for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].1.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(name, definition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }
}

/// Which optional passes run.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InlineSettings {
    pub sub_superscripts: bool,
    pub footnotes: bool,
    /// Render the text as a table row; `Some(true)` for header cells.
    pub table_header: Option<bool>,
}

/// Run the inline pipeline over escaped text.
pub(crate) fn rewrite(text: &str, settings: InlineSettings, footnotes: &mut Footnotes) -> String {
    let mut text = emphasis(text);
    if settings.sub_superscripts {
        text = sub_superscripts(&text);
    }
    text = links(&bare_images(&text));
    if let Some(header) = settings.table_header {
        text = table_cells(&text, header);
    }
    if settings.footnotes {
        text = footnote_references(&text, footnotes);
    }
    special_symbols(&text)
}

/// Replace emphasis spans in one pass.
///
/// The closing context character is not consumed, so adjacent spans such as
/// `*a* /b/` both match.
pub(crate) fn emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while let Some(caps) = EMPHASIS_RE.captures_at(text, pos) {
        let (Some(pre), Some(post)) = (caps.name("pre"), caps.name("post")) else {
            break;
        };
        let Some((body, open, close)) = EMPHASIS
            .iter()
            .find_map(|(group, open, close)| caps.name(group).map(|m| (m.as_str(), *open, *close)))
        else {
            break;
        };
        out.push_str(&text[last..pre.end()]);
        out.push_str(open);
        out.push_str(body);
        out.push_str(close);
        last = post.start();
        pos = post.start();
    }
    out.push_str(&text[last..]);
    out
}

pub(crate) fn sub_superscripts(text: &str) -> String {
    SUB_SUPERSCRIPT
        .replace_all(text, |caps: &Captures<'_>| {
            let tag = if &caps["kind"] == "_" { "sub" } else { "sup" };
            format!("{}<{tag}>{}</{tag}>", &caps["base"], &caps["body"])
        })
        .into_owned()
}

/// Turn `[[image.png]]` into a link whose description is the image itself.
pub(crate) fn bare_images(text: &str) -> String {
    BARE_IMAGE
        .replace_all(text, "[[$path][$path]]")
        .into_owned()
}

pub(crate) fn links(text: &str) -> String {
    LINK.replace_all(text, |caps: &Captures<'_>| {
        let url = &caps["url"];
        // The text is already escaped, only quotes still need care.
        let href = link_target(url).replace('"', "&quot;");
        match caps.name("desc").map(|m| m.as_str()) {
            Some(desc) if is_image_path(desc) => {
                format!(
                    "<a href=\"{href}\"><img src=\"{}\" /></a>",
                    desc.replace('"', "&quot;")
                )
            }
            Some(desc) => format!("<a href=\"{href}\">{desc}</a>"),
            None => format!("<a href=\"{href}\">{url}</a>"),
        }
    })
    .into_owned()
}

/// Rewrite an Org link target into an HTML href.
fn link_target(url: &str) -> String {
    let url = url.strip_prefix("file:").unwrap_or(url);
    let url = url.split_once("::").map_or(url, |(path, _)| path);
    match url.strip_suffix(".org") {
        Some(stem) => format!("{stem}.html"),
        None => url.to_owned(),
    }
}

/// Convert a `| a | b |` row into cells.
pub(crate) fn table_cells(text: &str, header: bool) -> String {
    let tag = if header { "th" } else { "td" };
    let row = text.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    let mut out = String::new();
    for cell in row.split('|') {
        write!(out, "<{tag}>{}</{tag}>", cell.trim()).unwrap();
    }
    out
}

/// Replace footnote references with anchors, registering inline definitions.
pub(crate) fn footnote_references(text: &str, footnotes: &mut Footnotes) -> String {
    FOOTNOTE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps["name"];
            if let Some(def) = caps.name("def").map(|m| m.as_str().trim())
                && !def.is_empty()
            {
                footnotes.register(name, def);
            }
            format!(
                "<sup><a class=\"footref\" id=\"fnr.{name}\" href=\"#fn.{name}\">{name}</a></sup>"
            )
        })
        .into_owned()
}

/// Replace dashes, ellipses and `\entity` names outside tags and code spans.
pub(crate) fn special_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_code = false;
    let mut last = 0;
    for tag in TAG.find_iter(text) {
        push_segment(&mut out, &text[last..tag.start()], in_code);
        let tag_text = tag.as_str();
        if tag_text.starts_with("<code") {
            in_code = true;
        } else if tag_text == "</code>" {
            in_code = false;
        }
        out.push_str(tag_text);
        last = tag.end();
    }
    push_segment(&mut out, &text[last..], in_code);
    out
}

fn push_segment(out: &mut String, segment: &str, in_code: bool) {
    if in_code {
        out.push_str(segment);
        return;
    }
    let replaced = segment
        .replace("---", "&#8212;")
        .replace("--", "&#8211;")
        .replace("...", "&#8230;");
    let replaced = ENTITY.replace_all(&replaced, |caps: &Captures<'_>| {
        let name = &caps["name"];
        ENTITIES
            .iter()
            .find(|(entity, _)| *entity == name)
            .map_or_else(|| caps[0].to_owned(), |(_, html)| (*html).to_owned())
    });
    out.push_str(&replaced);
}
