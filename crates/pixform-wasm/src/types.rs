//! WASM-compatible wrapper types for pixel data.
//!
//! [`JsRasterImage`] carries RGBA pixels between JavaScript and the software
//! renderer in `pixform-core`, for callers that work off the main thread or
//! without a DOM.

use pixform_core::{load_image, RgbaImage};
use wasm_bindgen::prelude::*;

/// An RGBA image living in WASM memory.
///
/// # Memory Management
///
/// `pixels()` copies into a fresh `Uint8Array`. Keep the image on the WASM
/// side between pipeline runs and only pull pixels out when needed.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases it otherwise.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        JsRasterImage {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// `None` when the buffer length does not match the dimensions.
    pub(crate) fn to_rgba(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// Decode PNG, JPEG or WebP bytes into RGBA pixels, honoring EXIF
/// orientation.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// console.log(`Decoded ${image.width}x${image.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    load_image(bytes.to_vec())
        .map(JsRasterImage::from_rgba)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixform_core::{encode_image, Rgba};

    #[test]
    fn test_accessors() {
        let img = JsRasterImage::new(2, 3, vec![7; 24]);
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.byte_length(), 24);
        assert_eq!(img.pixels(), vec![7; 24]);
    }

    #[test]
    fn test_rgba_conversion() {
        let rgba = RgbaImage::from_fn(3, 2, |x, y| image_pixel(x, y));
        let js = JsRasterImage::from_rgba(rgba.clone());
        assert_eq!(js.byte_length(), 24);
        assert_eq!(js.to_rgba(), Some(rgba));
    }

    #[test]
    fn test_mismatched_buffer() {
        assert!(JsRasterImage::new(4, 4, vec![0; 10]).to_rgba().is_none());
    }

    #[test]
    fn test_decode_png() {
        let rgba = RgbaImage::from_fn(4, 2, |x, y| image_pixel(x, y));
        let bytes = encode_image(&rgba, Some("image/png"), None).unwrap().bytes;
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        assert_eq!(decoded.pixels(), rgba.into_raw());
    }

    fn image_pixel(x: u32, y: u32) -> Rgba<u8> {
        Rgba([x as u8 * 40, y as u8 * 90, 3, 255])
    }
}
