//! Pixform Core - declarative image transformation pipeline
//!
//! This crate provides the pipeline value, the CSS-unit algebra its options
//! are written in, the two-pass execution engine, a pure-Rust drawing
//! surface, and loaders/encoders around them.

pub mod config;
pub mod css;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod transform;

pub use image::{Rgba, RgbaImage};

pub use config::{InterpolationFilter, RenderConfig, MAX_CANVAS_EDGE};
pub use css::{CssPoint, CssSize, CssUnit, CssValue};
pub use decode::{load_image, ImageSource};
pub use encode::{download, encode_image, to_data_url, Blob, Downloadable, ImageMime};
pub use engine::{Drawable, RenderPlan, Surface};
pub use error::{Result, TransformError};
pub use filter::{Filter, FilterChain};
pub use geometry::{Affine, Point, Size};
pub use pipeline::{FilterSpec, ImageTransformer, PipelineSpec, TransformSpec};
pub use raster::RasterSurface;
pub use transform::{
    FlipAxes, FlipOptions, ResizeMode, ResizeOptions, RotateOptions, RotateScaleMode,
    ScaleOptions, TransformUnit, TranslateOptions, UnitOutput,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_from_bytes() {
        let source = RgbaImage::from_fn(80, 60, |x, y| Rgba([x as u8 * 3, y as u8 * 4, 50, 255]));
        let bytes = encode_image(&source, None, None).unwrap().bytes;
        let image = load_image(bytes).unwrap();

        let pipeline = ImageTransformer::new()
            .resize(&ResizeOptions::new(CssSize::new(40, 40)).with_mode(ResizeMode::Cover))
            .unwrap()
            .rotate(&RotateOptions::new("90deg"))
            .unwrap()
            .sepia("50%")
            .unwrap();
        let surface = pipeline.apply_to_surface(&image).unwrap();
        assert_eq!((surface.width(), surface.height()), (40, 40));
        assert!(surface.image().pixels().all(|p| p.0[3] == 255));
    }
}
