//! Renderer module
//!
//! Renders a Comparison to one of the output formats: report, html, json

use serde::Serialize;

use crate::core::compare::{CompareOptions, Comparison};
use crate::core::html::render_side_by_side;
use crate::core::model::{DiffReportEntry, Theme};
use crate::core::report::{entries, render_report};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Report,
    Html,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "report" | "text" | "txt" => Ok(OutputFormat::Report),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl OutputFormat {
    /// Comparison options this format expects; only the HTML view folds tags
    pub fn compare_options(self, max_tokens: Option<usize>) -> CompareOptions {
        CompareOptions {
            fold_tags: self == OutputFormat::Html,
            max_tokens,
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub theme: Theme,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// JSON shape of one file's report
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    entries: Vec<DiffReportEntry>,
}

/// Renderer for comparisons
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    /// Render a comparison to a string
    pub fn render(&self, comparison: &Comparison) -> String {
        match self.config.format {
            OutputFormat::Report => self.render_report(comparison),
            OutputFormat::Html => render_side_by_side(&comparison.rows, &self.config.theme),
            OutputFormat::Json => self.render_json(comparison),
        }
    }

    fn render_report(&self, comparison: &Comparison) -> String {
        let entries = entries(&comparison.rows, &self.config.theme);
        render_report(&comparison.name, &entries)
    }

    fn render_json(&self, comparison: &Comparison) -> String {
        let report = JsonReport {
            file: &comparison.name,
            entries: entries(&comparison.rows, &self.config.theme),
        };
        if self.config.pretty {
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
        }
    }
}
