mod cli;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use cli::{Args, Commands};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use surya_ocr::{Context, SuryaConfig, SuryaOcrProvider};
use surya_rs::{collect_pages, BatchOptions, BatchReport, BatchRunner, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct OcrArgs {
  inputs: Vec<PathBuf>,
  endpoint: Option<String>,
  token: Option<String>,
  timeout: Option<f64>,
  mime_type: Option<String>,
  concurrency: usize,
  first_page: u32,
  format: OutputFormat,
  output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
  let args = Args::parse();

  let result = match args.command {
    Commands::Version => {
      println!("surya {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    Commands::Ocr {
      inputs,
      endpoint,
      token,
      timeout,
      mime_type,
      concurrency,
      first_page,
      format,
      output,
      quiet,
    } => {
      init_logging(quiet);
      run_ocr(OcrArgs {
        inputs,
        endpoint,
        token,
        timeout,
        mime_type,
        concurrency,
        first_page,
        format,
        output,
      })
      .await
    }
  };

  match result {
    Ok(true) => {}
    Ok(false) => std::process::exit(1),
    Err(e) => {
      eprintln!("Error: {:#}", e);
      std::process::exit(1);
    }
  }
}

fn init_logging(quiet: bool) {
  let default = if quiet { "warn" } else { "surya=info,surya_rs=info,surya_ocr=info" };
  let _ = tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
    .try_init();
}

/// Flags win over the environment, which is only consulted through `SuryaConfig::from_env`.
fn load_config(args: &OcrArgs) -> Result<SuryaConfig> {
  dotenvy::dotenv().ok();

  let mut config = SuryaConfig::from_env().context("Invalid SURYA_* environment")?;
  if let Some(endpoint) = &args.endpoint {
    config.endpoint = SuryaConfig::new(endpoint.as_str()).endpoint;
  }
  if let Some(token) = &args.token {
    config = config.with_token(token.as_str());
  }
  if let Some(secs) = args.timeout {
    let timeout = Duration::try_from_secs_f64(secs).context("Invalid --timeout")?;
    config = config.with_timeout(timeout);
  }
  if let Some(mime_type) = &args.mime_type {
    config = config.with_mime_type(mime_type.as_str());
  }
  Ok(config)
}

/// Returns `Ok(false)` when at least one page failed.
async fn run_ocr(args: OcrArgs) -> Result<bool> {
  let config = load_config(&args)?;
  if !config.is_configured() {
    bail!("No OCR endpoint configured; pass --endpoint or set SURYA_ENDPOINT");
  }
  let endpoint = config.endpoint.clone();

  let pages = collect_pages(&args.inputs, args.first_page)?;

  let (ctx, cancel) = Context::with_cancel();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::warn!("Interrupted, cancelling in-flight requests");
      cancel.cancel();
    }
  });

  let runner = BatchRunner::new(
    Arc::new(SuryaOcrProvider::new(config)),
    BatchOptions {
      max_concurrent_pages: args.concurrency,
    },
  );
  let reports = runner.run(&ctx, pages).await;

  let report = BatchReport::new(endpoint, reports);
  report.write(args.format, args.output.as_deref()).await?;

  Ok(!report.has_failures())
}
