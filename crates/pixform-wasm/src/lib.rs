//! Pixform WASM - WebAssembly bindings for Pixform
//!
//! This crate exposes the pixform-core pipeline to JavaScript/TypeScript.
//! Pipelines render either onto a browser canvas, where the 2D context does
//! the drawing, or through the software renderer on raw RGBA pixels.
//!
//! # Module Structure
//!
//! - `canvas` - `CanvasRenderingContext2d` drawing surface
//! - `transformer` - the immutable `ImageTransformer` class
//! - `types` - WASM-compatible wrapper types for pixel data
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageTransformer } from '@pixform/wasm';
//!
//! await init();
//!
//! const pipeline = new ImageTransformer()
//!     .resize({ size: { width: 320, height: 240 }, mode: "contain" })
//!     .flip({ axes: "horizontal" });
//! document.body.append(pipeline.applyToCanvas(img));
//! ```

use wasm_bindgen::prelude::*;

mod canvas;
mod transformer;
mod types;

pub use canvas::{CanvasSurface, DomImage};
pub use transformer::JsImageTransformer;
pub use types::{decode_image, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
