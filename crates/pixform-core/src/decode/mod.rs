//! Image loading for the native pipeline.
//!
//! [`load_image`] accepts anything a caller is likely to hold: a path, a
//! `file://` or `data:` URL, raw encoded bytes, or pixels that are already
//! decoded. Encoded input is format-sniffed, decoded with the `image` crate
//! and turned upright according to its EXIF orientation.
//!
//! Remote URLs are refused; fetching is left to the caller.

mod orientation;

pub use orientation::{apply_orientation, read_orientation, Orientation};

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageReader, RgbaImage};

use crate::encode::parse_data_url;
use crate::error::{Result, TransformError};

/// Where a source image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    /// A `file://`, `data:` or plain path URL string.
    Url(String),
    /// Encoded file contents.
    Bytes(Vec<u8>),
    Decoded(RgbaImage),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&str> for ImageSource {
    fn from(url: &str) -> Self {
        ImageSource::Url(url.to_string())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(image: RgbaImage) -> Self {
        ImageSource::Decoded(image)
    }
}

/// Load and decode an image into RGBA pixels.
pub fn load_image(source: impl Into<ImageSource>) -> Result<RgbaImage> {
    match source.into() {
        ImageSource::Decoded(image) => Ok(image),
        ImageSource::Bytes(bytes) => decode_bytes(&bytes),
        ImageSource::Path(path) => read_path(path),
        ImageSource::Url(url) => load_url(&url),
    }
}

fn load_url(url: &str) -> Result<RgbaImage> {
    if url.starts_with("data:") {
        let (_, bytes) = parse_data_url(url)?;
        return decode_bytes(&bytes);
    }
    if let Some(path) = url.strip_prefix("file://") {
        return read_path(PathBuf::from(path));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Err(TransformError::ImageLoad(format!(
            "remote images must be fetched by the caller: {url}"
        )));
    }
    read_path(PathBuf::from(url))
}

fn read_path(path: PathBuf) -> Result<RgbaImage> {
    let bytes = std::fs::read(&path)
        .map_err(|e| TransformError::ImageLoad(format!("{}: {e}", path.display())))?;
    decode_bytes(&bytes)
}

/// Decode encoded bytes, applying EXIF orientation.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    let orientation = read_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TransformError::ImageLoad(e.to_string()))?;
    let img = reader
        .decode()
        .map_err(|e| TransformError::ImageLoad(e.to_string()))?;

    Ok(apply_orientation(img, orientation).into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_image, to_data_url};
    use image::Rgba;

    fn png_bytes() -> (RgbaImage, Vec<u8>) {
        let img = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 50, y as u8 * 80, 7, 255]));
        let blob = encode_image(&img, Some("image/png"), None).unwrap();
        (img, blob.bytes)
    }

    #[test]
    fn test_decoded_passes_through() {
        let img = RgbaImage::new(2, 2);
        assert_eq!(load_image(img.clone()).unwrap(), img);
    }

    #[test]
    fn test_bytes() {
        let (img, bytes) = png_bytes();
        assert_eq!(load_image(bytes).unwrap(), img);
    }

    #[test]
    fn test_path_and_file_url() {
        let (img, bytes) = png_bytes();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        std::fs::write(&path, bytes).unwrap();

        assert_eq!(load_image(path.clone()).unwrap(), img);
        let url = format!("file://{}", path.display());
        assert_eq!(load_image(url.as_str()).unwrap(), img);
    }

    #[test]
    fn test_data_url() {
        let (img, _) = png_bytes();
        let url = to_data_url(&encode_image(&img, None, None).unwrap());
        assert_eq!(load_image(url.as_str()).unwrap(), img);
    }

    #[test]
    fn test_remote_url_refused() {
        assert!(matches!(
            load_image("https://example.com/cat.png"),
            Err(TransformError::ImageLoad(_))
        ));
    }

    #[test]
    fn test_corrupt_and_missing() {
        assert!(matches!(
            load_image(vec![0u8, 1, 2, 3]),
            Err(TransformError::ImageLoad(_))
        ));
        assert!(matches!(
            load_image(PathBuf::from("/definitely/not/here.png")),
            Err(TransformError::ImageLoad(_))
        ));
    }
}
