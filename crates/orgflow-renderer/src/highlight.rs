//! Syntax highlighting strategy for source blocks.
//!
//! A [`Highlighter`] is injected into the HTML backend at construction. When
//! one is present it owns the markup of `src` blocks entirely, including the
//! surrounding `<pre>`.

use crate::diagnostics::Diagnostics;
use crate::error::HighlightError;

/// Lexer name used when a language is empty or unsupported.
pub const PLAIN_TEXT_LEXER: &str = "text";

/// Highlights one source block.
pub trait Highlighter {
    /// Render `code` in `lang` as a complete HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::UnsupportedLanguage`] when no lexer exists
    /// for `lang`, or [`HighlightError::Failed`] when highlighting breaks.
    fn highlight(
        &self,
        lang: &str,
        code: &str,
        diagnostics: &Diagnostics,
    ) -> Result<String, HighlightError>;
}

/// Map a source block language to the lexer name used for highlighting.
///
/// Lisp dialects share the scheme lexer and an empty language falls back to
/// plain text.
///
/// # Examples
///
/// ```
/// use orgflow_renderer::normalize_lang;
///
/// assert_eq!(normalize_lang("emacs-lisp"), "scheme");
/// assert_eq!(normalize_lang(""), "text");
/// assert_eq!(normalize_lang("rust"), "rust");
/// ```
#[must_use]
pub fn normalize_lang(lang: &str) -> &str {
    match lang.trim() {
        "emacs-lisp" | "common-lisp" | "lisp" => "scheme",
        "" => PLAIN_TEXT_LEXER,
        other => other,
    }
}

#[cfg(feature = "syntect")]
pub use self::syntect_impl::SyntectHighlighter;

#[cfg(feature = "syntect")]
mod syntect_impl {
    use syntect::html::{ClassStyle, ClassedHTMLGenerator};
    use syntect::parsing::{SyntaxReference, SyntaxSet};
    use syntect::util::LinesWithEndings;

    use super::{Highlighter, PLAIN_TEXT_LEXER};
    use crate::diagnostics::Diagnostics;
    use crate::error::HighlightError;
    use crate::util::escape_attr;

    /// Class-based highlighter backed by syntect's bundled grammars.
    pub struct SyntectHighlighter {
        syntax_set: SyntaxSet,
    }

    impl std::fmt::Debug for SyntectHighlighter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SyntectHighlighter").finish_non_exhaustive()
        }
    }

    impl Default for SyntectHighlighter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SyntectHighlighter {
        #[must_use]
        pub fn new() -> Self {
            Self {
                syntax_set: SyntaxSet::load_defaults_newlines(),
            }
        }

        fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
            if lang == PLAIN_TEXT_LEXER {
                return Some(self.syntax_set.find_syntax_plain_text());
            }
            let lowercase = lang.to_ascii_lowercase();
            self.syntax_set
                .find_syntax_by_token(&lowercase)
                .or_else(|| self.syntax_set.find_syntax_by_name(lang))
                .or_else(|| self.syntax_set.find_syntax_by_extension(&lowercase))
        }
    }

    impl Highlighter for SyntectHighlighter {
        fn highlight(
            &self,
            lang: &str,
            code: &str,
            diagnostics: &Diagnostics,
        ) -> Result<String, HighlightError> {
            let syntax = self
                .find_syntax(lang)
                .ok_or_else(|| HighlightError::UnsupportedLanguage(lang.to_owned()))?;
            diagnostics.debug(format_args!("highlighting {lang} with {}", syntax.name));

            let mut generator = ClassedHTMLGenerator::new_with_class_style(
                syntax,
                &self.syntax_set,
                ClassStyle::Spaced,
            );
            for line in LinesWithEndings::from(code) {
                generator
                    .parse_html_for_line_which_includes_newline(line)
                    .map_err(|err| HighlightError::Failed {
                        language: lang.to_owned(),
                        message: err.to_string(),
                    })?;
            }

            Ok(format!(
                "<pre class=\"src src-{}\">{}</pre>\n",
                escape_attr(lang),
                generator.finalize()
            ))
        }
    }

}
