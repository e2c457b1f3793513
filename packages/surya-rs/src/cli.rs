//! Command line arguments backing the `surya` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surya_rs::OutputFormat;

#[derive(Parser, Debug)]
#[command(
  name = "surya",
  about = "A CLI tool for extracting text from scanned pages with a remote Surya OCR service",
  version
)]
pub struct Args {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// OCR image files, one page per file
  Ocr {
    /// Image files or directories of images, in page order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// OCR endpoint URL (overrides SURYA_ENDPOINT)
    #[arg(long, short = 'e')]
    endpoint: Option<String>,

    /// Bearer token (overrides SURYA_AUTH_TOKEN)
    #[arg(long, short = 't')]
    token: Option<String>,

    /// Per-page timeout in seconds (overrides SURYA_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<f64>,

    /// Mime type to send instead of detecting it (overrides SURYA_MIME_TYPE)
    #[arg(long)]
    mime_type: Option<String>,

    /// Number of pages sent concurrently
    #[arg(long, short = 'j', default_value = "4")]
    concurrency: usize,

    /// Page number of the first input
    #[arg(long, default_value = "1")]
    first_page: u32,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
  },
}
