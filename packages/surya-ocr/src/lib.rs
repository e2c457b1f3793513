pub mod config;
pub mod context;
pub mod engine;
pub mod mime;
pub mod region;
pub mod surya;

pub use config::{ConfigError, SuryaConfig};
pub use context::{CancelHandle, Context};
pub use engine::{OcrEngine, OcrError};
pub use mime::{detect_mime_type, MimeStrategy, DEFAULT_MIME_TYPE};
pub use region::{BoundingBox, OcrOutput, TextLine};
pub use surya::SuryaOcrProvider;
