use std::sync::Arc;

use surya_ocr::{Context, OcrEngine};
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::inputs::PageInput;
use crate::report::PageReport;

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of pages sent to the OCR service at once
    pub max_concurrent_pages: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrent_pages: 4,
        }
    }
}

/// Sends every page through one shared OCR engine, a bounded number at a time.
///
/// A failing page is recorded in its [`PageReport`] and never stops the others.
pub struct BatchRunner {
    engine: Arc<dyn OcrEngine>,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(engine: Arc<dyn OcrEngine>, options: BatchOptions) -> Self {
        Self { engine, options }
    }

    /// Processes `pages` and returns one report per page, in page order.
    pub async fn run(&self, ctx: &Context, pages: Vec<PageInput>) -> Vec<PageReport> {
        let limit = self.options.max_concurrent_pages.max(1);
        info!(pages = pages.len(), concurrency = limit, "Starting OCR batch");

        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks = Vec::with_capacity(pages.len());

        for input in pages {
            let page = input.page;
            let file = input.path.display().to_string();
            let semaphore = semaphore.clone();
            let engine = self.engine.clone();
            let ctx = ctx.clone();

            let task = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return PageReport::failed(input.page, file, e),
                };
                Self::process_page(engine.as_ref(), &ctx, &input, file).await
            });
            tasks.push((page, task));
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for (page, task) in tasks {
            match task.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(page, error = %e, "OCR task join error");
                    reports.push(PageReport::failed(page, String::new(), e));
                }
            }
        }

        reports.sort_by_key(|r| r.page);
        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        info!(pages = reports.len(), failed, "OCR batch finished");
        reports
    }

    async fn process_page(
        engine: &dyn OcrEngine,
        ctx: &Context,
        input: &PageInput,
        file: String,
    ) -> PageReport {
        let data = match fs::read(&input.path).await {
            Ok(data) => data,
            Err(e) => {
                warn!(page = input.page, file = %file, error = %e, "Failed to read image");
                let msg = format!("failed to read {}: {}", file, e);
                return PageReport::failed(input.page, file, msg);
            }
        };

        match engine.process_image(ctx, &data, input.page).await {
            Ok(output) => {
                debug!(page = input.page, file = %file, lines = output.lines().len(), "Page done");
                PageReport::succeeded(input.page, file, output)
            }
            Err(e) => {
                warn!(page = input.page, file = %file, error = %e, "OCR failed");
                PageReport::failed(input.page, file, e)
            }
        }
    }
}
