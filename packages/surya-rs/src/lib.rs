//! # surya-rs
//!
//! Batch OCR over a remote [Surya](https://github.com/VikParuchuri/surya) endpoint, built on the
//! `surya-ocr` adapter.
//!
//! ## Features
//!
//! - **Page Collection**: Expand files and directories into numbered pages
//! - **Bounded Concurrency**: Send several pages at once over a shared HTTP client
//! - **Per-Page Failures**: A failed page is reported without aborting the run
//! - **Text or JSON Output**: Plain text per page, or a JSON report with line boxes
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use surya_rs::prelude::*;
//!
//! let provider = SuryaOcrProvider::new(SuryaConfig::from_env()?);
//! let runner = BatchRunner::new(Arc::new(provider), BatchOptions::default());
//!
//! let pages = collect_pages(&["scans/".into()], 1)?;
//! let reports = runner.run(&Context::background(), pages).await;
//! let report = BatchReport::new("http://localhost:8000/ocr", reports);
//! println!("{}", report.render(OutputFormat::Text)?);
//! ```

pub mod batch;
pub mod inputs;
pub mod report;

pub use batch::{BatchOptions, BatchRunner};
pub use inputs::{collect_pages, is_image_file, PageInput, IMAGE_FILE_TYPES};
pub use report::{BatchReport, OutputFormat, PageReport};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use surya_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        collect_pages, BatchOptions, BatchReport, BatchRunner, OutputFormat, PageInput, PageReport,
    };
    pub use surya_ocr::{Context, OcrEngine, OcrError, OcrOutput, SuryaConfig, SuryaOcrProvider};
}
