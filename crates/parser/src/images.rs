// ABOUTME: Inline thumbnail handling: data-URI decoding and best-effort writes to disk.
// ABOUTME: Image failures never abort a record; they degrade to an absent field.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub use image::ImageFormat;

/// Where and how extracted thumbnails are written.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Target directory for image files.
    pub dir: PathBuf,
    /// Filename prefix, e.g. `"thumb"` gives `thumb_<title>.jpg`.
    pub prefix: String,
    /// Encoding used for the written file.
    pub format: ImageFormat,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "image".to_string(),
            format: ImageFormat::Jpeg,
        }
    }
}

impl ImageOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }
}

/// Strips every character that is not alphanumeric, leaving a fragment safe
/// to embed in a filename. Idempotent.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Decodes an inline image payload and writes it under
/// `<dir>/<prefix>_<title>.<ext>`, returning the written path.
///
/// The payload is a data-URI-style string: everything up to the first comma
/// is the format/encoding prefix, the remainder is base64. Any decode or
/// write failure returns `None`.
pub(crate) fn save_inline_image(
    payload: &str,
    title: &str,
    opts: &ImageOptions,
) -> Option<PathBuf> {
    let (_, encoded) = payload.split_once(',')?;
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;

    let ext = opts.format.extensions_str().first()?;
    let path = opts
        .dir
        .join(format!("{}_{}.{}", opts.prefix, sanitize_title(title), ext));
    decoded.save_with_format(&path, opts.format).ok()?;
    Some(path)
}
