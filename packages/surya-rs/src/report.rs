//! Results of a batch run and the two ways they are written out.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use surya_ocr::OcrOutput;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one section per page
    #[default]
    Text,
    /// A JSON report including line boxes and per-page errors
    Json,
}

/// Outcome of a single page. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page: u32,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OcrOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageReport {
    pub fn succeeded(page: u32, file: impl Into<String>, output: OcrOutput) -> Self {
        Self {
            page,
            file: file.into(),
            result: Some(output),
            error: None,
        }
    }

    pub fn failed(page: u32, file: impl Into<String>, error: impl ToString) -> Self {
        Self {
            page,
            file: file.into(),
            result: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub endpoint: String,
    pub total_pages: usize,
    pub failed_pages: usize,
    pub pages: Vec<PageReport>,
}

impl BatchReport {
    /// Builds a report from page outcomes, sorting them by page number.
    pub fn new(endpoint: impl Into<String>, mut pages: Vec<PageReport>) -> Self {
        pages.sort_by_key(|p| p.page);
        Self {
            generated_at: Utc::now().to_rfc3339(),
            endpoint: endpoint.into(),
            total_pages: pages.len(),
            failed_pages: pages.iter().filter(|p| !p.is_ok()).count(),
            pages,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed_pages > 0
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report")
            }
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&format!("--- page {} ({}) ---\n", page.page, page.file));
            match (&page.result, &page.error) {
                (Some(result), _) => {
                    out.push_str(result.text.trim_end());
                    out.push('\n');
                }
                (None, Some(error)) => out.push_str(&format!("[error] {}\n", error)),
                (None, None) => {}
            }
        }
        out
    }

    /// Writes the rendered report to `path`, or to stdout when `path` is `None`.
    pub async fn write(&self, format: OutputFormat, path: Option<&Path>) -> Result<()> {
        let rendered = self.render(format)?;
        match path {
            Some(path) => fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display())),
            None => {
                print!("{}", rendered);
                Ok(())
            }
        }
    }
}
