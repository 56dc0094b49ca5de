//! Output formatting for the CLI.
//!
//! Results go to stdout as text or JSON; errors go to stderr in the same format.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use wwwhash_core::{AssetMap, PublishReport, PublishedFile, TemplatePolicy};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }

    /// Write output using the configured format.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize, W: Write>(
        &self,
        mut out: W,
        data: &T,
        text_fn: impl FnOnce() -> String,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(out, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(out, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error and its causes.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for a publish run.
#[derive(Debug, Serialize)]
pub struct PublishOutput {
    pub success: bool,
    pub result_code: u8,
    pub output_dir: String,
    pub bundle: PublishedFile,
    pub template_policy: TemplatePolicy,
    pub assets: AssetMap,
    pub entry_point: String,
    pub replacements: usize,
}

impl From<PublishReport> for PublishOutput {
    fn from(report: PublishReport) -> Self {
        Self {
            success: true,
            result_code: 0,
            output_dir: report.output_dir.display().to_string(),
            bundle: report.bundle,
            template_policy: report.template_policy,
            assets: report.assets,
            entry_point: report.entry_point,
            replacements: report.replacements,
        }
    }
}

impl PublishOutput {
    /// Human-readable summary: one line per published file.
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{} -> {}\n",
            self.bundle.original, self.bundle.published
        );
        for (original, published) in self.assets.iter() {
            text.push_str(&format!("{} -> {}\n", original, published));
        }
        text.push_str(&format!(
            "{} ({} placeholder{} resolved)\n",
            self.entry_point,
            self.replacements,
            if self.replacements == 1 { "" } else { "s" }
        ));
        text.push_str(&format!("Published to {}\n", self.output_dir));
        text
    }
}
