//! A pure-Rust drawing surface over [`image::RgbaImage`].
//!
//! Implements the [`Surface`] contract without a browser: drawing inverse-maps
//! every destination pixel through the current transform, samples the source,
//! rasterizes the filter chain onto the drawn layer and composites the layer
//! source-over onto the canvas.

mod filters;
mod sample;

pub use filters::apply_filters;

use image::{Rgba, RgbaImage};

use crate::config::{InterpolationFilter, RenderConfig};
use crate::engine::Surface;
use crate::error::{Result, TransformError};
use crate::filter::FilterChain;
use crate::geometry::{Affine, Point};

/// Software canvas with the state a 2D context carries.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: RgbaImage,
    transform: Affine,
    filters: FilterChain,
    interpolation: InterpolationFilter,
}

impl RasterSurface {
    /// An empty 0x0 surface sampling with the configured interpolation.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            transform: Affine::identity(),
            filters: FilterChain::new(),
            interpolation: config.interpolation,
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

fn parse_color(color: &str) -> Result<[u8; 4]> {
    let parsed = csscolorparser::parse(color)
        .map_err(|e| TransformError::Render(format!("{color}: {e}")))?;
    Ok(parsed.to_rgba8())
}

/// Source-over blend of straight-alpha `src` onto straight-alpha `dst`.
#[inline]
fn composite(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = src[i] as f32 / 255.0;
        let d = dst.0[i] as f32 / 255.0;
        let c = (s * sa + d * da * (1.0 - sa)) / out_a;
        out[i] = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    out[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    dst.0 = out;
}

impl Surface for RasterSurface {
    type Image = RgbaImage;

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                TransformError::SurfaceAcquisition(format!(
                    "{width}x{height} surface does not fit in memory"
                ))
            })?;
        self.canvas = RgbaImage::new(width, height);
        self.transform = Affine::identity();
        self.filters = FilterChain::new();
        Ok(())
    }

    fn fill(&mut self, color: &str) -> Result<()> {
        let rgba = parse_color(color)?;
        for pixel in self.canvas.pixels_mut() {
            composite(pixel, rgba);
        }
        Ok(())
    }

    fn set_filter(&mut self, filters: &FilterChain) -> Result<()> {
        self.filters = filters.clone();
        Ok(())
    }

    fn set_transform(&mut self, transform: Affine) -> Result<()> {
        self.transform = transform;
        Ok(())
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) -> Result<()> {
        // a collapsed matrix draws nothing, like a canvas context
        let Some(inverse) = self.transform.invert() else {
            return Ok(());
        };

        let (width, height) = self.canvas.dimensions();
        let mut layer = RgbaImage::new(width, height);
        for (px, py, pixel) in layer.enumerate_pixels_mut() {
            let src = inverse.transform_point(Point::new(px as f64 + 0.5, py as f64 + 0.5));
            let (u, v) = (src.x - x, src.y - y);
            pixel.0 = match self.interpolation {
                InterpolationFilter::Bilinear => sample::sample_bilinear(image, u, v),
                InterpolationFilter::Nearest => sample::sample_nearest(image, u, v),
            };
        }

        apply_filters(&mut layer, &self.filters);

        for (dst, src) in self.canvas.pixels_mut().zip(layer.pixels()) {
            composite(dst, src.0);
        }
        Ok(())
    }
}
