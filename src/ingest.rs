//! Image ingestion: decode, downscale, recompress, embed.
//!
//! Uploaded images end up inside the configuration record, so they are
//! shrunk to a bounded width and stored as a JPEG `data:` URL.

use std::path::{Path, PathBuf};

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::error::{AdminError, Result};

/// Widest image kept in storage, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// JPEG quality factor used for embedded images.
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Tunables for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// An image ready to be stored inside the configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedImage {
    /// `data:image/jpeg;base64,...`
    #[serde(skip)]
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
    /// Size of the encoded JPEG before base64.
    pub encoded_bytes: usize,
}

impl EmbeddedImage {
    /// Whether the source had to be scaled down.
    #[must_use]
    pub const fn was_resized(&self) -> bool {
        self.width != self.source_width
    }
}

/// Target dimensions for an image of `width` x `height`.
///
/// Images wider than `max_width` shrink to exactly `max_width` with the
/// height scaled to keep the aspect ratio (rounded, never below 1 px).
/// Anything else keeps its size.
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (f64::from(height) * f64::from(max_width) / f64::from(width)).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = scaled.max(1.0) as u32;
    (max_width, scaled)
}

/// Ingest an image from raw bytes. The format is guessed from content.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn ingest_bytes(bytes: &[u8], opts: &IngestOptions) -> Result<EmbeddedImage> {
    let img = image::load_from_memory(bytes).map_err(|e| AdminError::ImageDecode(e.to_string()))?;
    ingest_image(&img, opts)
}

/// Ingest an already decoded image.
pub fn ingest_image(img: &DynamicImage, opts: &IngestOptions) -> Result<EmbeddedImage> {
    let (source_width, source_height) = img.dimensions();
    let (width, height) = scaled_dimensions(source_width, source_height, opts.max_width);
    trace!(source_width, source_height, width, height, "Computed target size");

    let rgb = if (width, height) == (source_width, source_height) {
        img.to_rgb8()
    } else {
        img.resize_exact(width, height, image::imageops::FilterType::Triangle)
            .to_rgb8()
    };

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, opts.jpeg_quality);
    DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(encoder)
        .map_err(|e| AdminError::ImageEncode(e.to_string()))?;

    let encoded_bytes = encoded.len();
    let data_url = format!(
        "{DATA_URL_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(&encoded)
    );
    debug!(width, height, encoded_bytes, "Image ingested");

    Ok(EmbeddedImage {
        data_url,
        width,
        height,
        source_width,
        source_height,
        encoded_bytes,
    })
}

/// Ingest an image file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn ingest_file(path: &Path, opts: &IngestOptions) -> Result<EmbeddedImage> {
    ensure_file(path)?;
    let bytes = std::fs::read(path)?;
    let embedded = ingest_bytes(&bytes, opts)?;
    info!(
        path = %path.display(),
        width = embedded.width,
        height = embedded.height,
        "Image ready for embedding"
    );
    Ok(embedded)
}

/// Ingest an image file without blocking the event loop.
///
/// The read is async and decoding runs on the blocking pool.
pub async fn ingest_file_async(path: PathBuf, opts: IngestOptions) -> Result<EmbeddedImage> {
    ensure_file(&path)?;
    let bytes = tokio::fs::read(&path).await?;
    let embedded = tokio::task::spawn_blocking(move || ingest_bytes(&bytes, &opts))
        .await
        .map_err(|e| AdminError::Other(format!("Image task failed: {e}")))??;
    info!(
        path = %path.display(),
        width = embedded.width,
        height = embedded.height,
        "Image ready for embedding"
    );
    Ok(embedded)
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(AdminError::ImageNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// What a stored image string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Inline `data:` URL.
    Embedded { mime: &'a str, bytes: usize },
    /// Anything else, usually an https URL.
    Remote(&'a str),
    /// Nothing set.
    Empty,
}

impl<'a> ImageRef<'a> {
    /// Classify a stored image string.
    #[must_use]
    pub fn classify(value: &'a str) -> Self {
        if value.trim().is_empty() {
            return Self::Empty;
        }
        let Some(rest) = value.strip_prefix("data:") else {
            return Self::Remote(value);
        };
        let (meta, payload) = rest.split_once(',').unwrap_or((rest, ""));
        let mime = meta.split(';').next().unwrap_or_default();
        let bytes = if meta.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_or(0, |b| b.len())
        } else {
            payload.len()
        };
        Self::Embedded { mime, bytes }
    }

    /// One-line description for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Embedded { mime, bytes } => {
                format!("embedded {mime}, {:.1} KB", to_kib(*bytes))
            }
            Self::Remote(url) => (*url).to_string(),
            Self::Empty => "(none)".to_string(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}
