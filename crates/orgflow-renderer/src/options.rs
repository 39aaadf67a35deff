//! Options for the HTML backend.

/// Switches controlling what the HTML backend emits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// Put `class="title"` on the first structural tag.
    pub decorate_title: bool,
    /// Drop tables from the output.
    pub skip_tables: bool,
    /// Render `a_{x}` and `a^{x}` as `<sub>`/`<sup>`.
    pub use_sub_superscripts: bool,
    /// Render footnote references and the trailing footnote block.
    pub export_footnotes: bool,
    /// Prefix headings with outline numbers like `1.2`.
    pub export_heading_number: bool,
    /// Render headline keywords such as `TODO` as badges.
    pub export_todo_keyword: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decorate_title: false,
            skip_tables: false,
            use_sub_superscripts: false,
            export_footnotes: true,
            export_heading_number: false,
            export_todo_keyword: true,
        }
    }
}
