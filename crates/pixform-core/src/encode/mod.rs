//! Output adapters: surface pixels to encoded blobs, data URLs and downloads.
//!
//! Encoding follows canvas `toBlob`/`toDataURL` behaviour:
//! - PNG is the default and the fallback for any MIME type we cannot encode
//! - JPEG takes a quality in `0.0..=1.0` (default 0.92) and drops alpha by
//!   compositing onto black
//! - WebP is written lossless

mod data_url;
mod download;

pub use data_url::{parse_data_url, to_data_url};
pub use download::{download, Downloadable};

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use log::debug;

use crate::error::{Result, TransformError};

/// JPEG quality used when none (or an out-of-range one) is given.
pub const DEFAULT_JPEG_QUALITY: f64 = 0.92;

/// Encodable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMime {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageMime {
    /// Look up a MIME type; `None` for anything we cannot encode.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Resolve a requested MIME type, falling back to PNG.
    pub fn resolve(requested: Option<&str>) -> Self {
        match requested {
            None => Self::Png,
            Some(mime) => Self::from_mime(mime).unwrap_or_else(|| {
                debug!(target: "pixform", "cannot encode {mime:?}, falling back to image/png");
                Self::Png
            }),
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

/// Encoded image bytes tagged with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: ImageMime,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn mime_type(&self) -> &'static str {
        self.mime.mime()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map a `0.0..=1.0` quality onto the encoder's 1-100 scale.
fn jpeg_quality(quality: Option<f64>) -> u8 {
    let quality = quality
        .filter(|q| (0.0..=1.0).contains(q))
        .unwrap_or(DEFAULT_JPEG_QUALITY);
    ((quality * 100.0).round() as u8).clamp(1, 100)
}

/// Composite every pixel onto black and drop the alpha channel.
fn flatten_alpha(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        for c in [r, g, b] {
            rgb.push(((c as u16 * a as u16 + 127) / 255) as u8);
        }
    }
    rgb
}

/// Encode `image` to the requested MIME type.
pub fn encode_image(
    image: &RgbaImage,
    mime: Option<&str>,
    quality: Option<f64>,
) -> Result<Blob> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TransformError::Encoding(format!(
            "cannot encode an empty {width}x{height} surface"
        )));
    }

    let target = ImageMime::resolve(mime);
    let mut buffer = Cursor::new(Vec::new());

    let written = match target {
        ImageMime::Png => PngEncoder::new(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ImageMime::Jpeg => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
            .write_image(&flatten_alpha(image), width, height, ExtendedColorType::Rgb8),
        ImageMime::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    written.map_err(|e| TransformError::Encoding(format!("{}: {e}", target.mime())))?;

    Ok(Blob {
        mime: target,
        bytes: buffer.into_inner(),
    })
}
