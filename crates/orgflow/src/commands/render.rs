//! `orgflow render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use orgflow_config::{CliSettings, Config};
use orgflow_lines::LineClassifier;
use orgflow_renderer::{HtmlBackend, OutputBuffer, RenderResult, SyntectHighlighter, Verbosity};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the Org file.
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover orgflow.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mark the first structural tag with `class="title"`.
    #[arg(long)]
    title: bool,

    /// Drop tables from the output.
    #[arg(long)]
    skip_tables: bool,

    /// Prefix headings with outline numbers.
    #[arg(long)]
    heading_numbers: bool,

    /// Disable syntax highlighting of src blocks.
    #[arg(long)]
    no_highlight: bool,

    /// Print `{ "html": ..., "warnings": [...] }` as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output (engine tracing).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rendering or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }

        let text = std::fs::read_to_string(&self.input)?;
        let result = render_document(&text, &config)?;

        let rendered = if self.json {
            let mut json = serde_json::to_string_pretty(&result)?;
            json.push('\n');
            json
        } else {
            for warning in &result.warnings {
                output.warning(&format!("Warning: {warning}"));
            }
            result.html
        };

        if let Some(path) = &self.output {
            std::fs::write(path, rendered)?;
            output.info(&format!("Wrote {}", path.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Flags only override the config when they are set.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            decorate_title: self.title.then_some(true),
            skip_tables: self.skip_tables.then_some(true),
            export_heading_number: self.heading_numbers.then_some(true),
            highlight_enabled: self.no_highlight.then_some(false),
            verbosity: self.verbose.then_some(Verbosity::Debug),
        }
    }
}

/// Classify and render `text` with the settings in `config`.
fn render_document(text: &str, config: &Config) -> Result<RenderResult, CliError> {
    let lines = LineClassifier::new()
        .with_todo_keywords(&config.parse.todo_keywords)
        .classify(text);

    let mut backend = HtmlBackend::new(config.render.clone());
    if config.highlight.enabled {
        backend = backend.with_highlighter(Box::new(SyntectHighlighter::new()));
    }

    let result = OutputBuffer::new(backend)
        .with_verbosity(config.diagnostics.level)
        .render(&lines)?;
    Ok(result)
}
