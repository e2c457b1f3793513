/// Mime type sent when the image format cannot be recognised.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// How the `mime_type` field of a request is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MimeStrategy {
    /// Sniff the image bytes, falling back to [`DEFAULT_MIME_TYPE`].
    #[default]
    Detect,
    /// Always send this value.
    Fixed(String),
}

impl MimeStrategy {
    pub fn resolve(&self, image_data: &[u8]) -> &str {
        match self {
            MimeStrategy::Detect => detect_mime_type(image_data),
            MimeStrategy::Fixed(mime) => mime,
        }
    }
}

pub fn detect_mime_type(image_data: &[u8]) -> &'static str {
    image::guess_format(image_data)
        .map(|format| format.to_mime_type())
        .unwrap_or(DEFAULT_MIME_TYPE)
}
