//! Canvas 2D drawing surface.
//!
//! [`CanvasSurface`] forwards the engine's paint calls to a browser
//! `CanvasRenderingContext2d`. The browser does the resampling and
//! the filter work.

use pixform_core::{Affine, Drawable, FilterChain, Result, Size, Surface, TransformError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// A loaded `<img>` as a drawable source.
pub struct DomImage(pub HtmlImageElement);

impl Drawable for DomImage {
    fn natural_size(&self) -> Size {
        Size::new(
            f64::from(self.0.natural_width()),
            f64::from(self.0.natural_height()),
        )
    }
}

fn js_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn render_error(err: JsValue) -> TransformError {
    TransformError::Render(js_message(&err))
}

/// A `<canvas>` together with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap an existing canvas.
    pub fn acquire(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| TransformError::SurfaceAcquisition(js_message(&e)))?
            .ok_or_else(|| {
                TransformError::SurfaceAcquisition("2d context unavailable".to_string())
            })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                TransformError::SurfaceAcquisition("context is not a 2d context".to_string())
            })?;
        Ok(CanvasSurface { canvas, ctx })
    }

    /// Create a detached canvas in the current document.
    pub fn create() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| TransformError::SurfaceAcquisition("no document".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|e| TransformError::SurfaceAcquisition(js_message(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| {
                TransformError::SurfaceAcquisition("created element is not a canvas".to_string())
            })?;
        Self::acquire(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn into_canvas(self) -> HtmlCanvasElement {
        self.canvas
    }
}

impl Surface for CanvasSurface {
    type Image = DomImage;

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        // Setting either dimension also resets the context state.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn fill(&mut self, color: &str) -> Result<()> {
        self.ctx.save();
        self.ctx.reset_transform().map_err(render_error)?;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.ctx.restore();
        Ok(())
    }

    fn set_filter(&mut self, filters: &FilterChain) -> Result<()> {
        self.ctx.set_filter(&filters.to_css());
        Ok(())
    }

    fn set_transform(&mut self, transform: Affine) -> Result<()> {
        let Affine { a, b, c, d, e, f } = transform;
        self.ctx.set_transform(a, b, c, d, e, f).map_err(render_error)
    }

    fn draw_image(&mut self, image: &DomImage, x: f64, y: f64) -> Result<()> {
        self.ctx
            .draw_image_with_html_image_element(&image.0, x, y)
            .map_err(render_error)
    }
}

/// Browser tests for the canvas surface. Run with `wasm-pack test --headless --chrome`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixform_core::Filter;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn assert_matrix(ctx: &CanvasRenderingContext2d, expected: Affine) {
        let m = ctx.get_transform().unwrap();
        let actual = [m.a(), m.b(), m.c(), m.d(), m.e(), m.f()];
        let Affine { a, b, c, d, e, f } = expected;
        for (got, want) in actual.iter().zip([a, b, c, d, e, f]) {
            assert!((got - want).abs() < 1e-6, "expected {expected:?}, got {actual:?}");
        }
    }

    fn pixel(surface: &CanvasSurface, x: f64, y: f64) -> Vec<u8> {
        surface.ctx.get_image_data(x, y, 1.0, 1.0).unwrap().data().0
    }

    #[wasm_bindgen_test]
    fn test_acquire_existing_canvas() {
        let canvas = CanvasSurface::create().unwrap().into_canvas();
        canvas.set_width(5);
        let surface = CanvasSurface::acquire(canvas).unwrap();
        assert_eq!(surface.canvas().width(), 5);
        assert_matrix(&surface.ctx, Affine::identity());
    }

    #[wasm_bindgen_test]
    fn test_resize_resets_transform() {
        let mut surface = CanvasSurface::create().unwrap();
        surface
            .set_transform(Affine::identity().translate(10.0, 20.0).scale(2.0, 2.0))
            .unwrap();

        surface.resize(8, 6).unwrap();

        assert_eq!((surface.canvas().width(), surface.canvas().height()), (8, 6));
        assert_matrix(&surface.ctx, Affine::identity());
    }

    #[wasm_bindgen_test]
    fn test_empty_chain_clears_filter() {
        let mut surface = CanvasSurface::create().unwrap();
        let chain = FilterChain::new()
            .with(Filter::grayscale(1).unwrap())
            .with(Filter::blur(2).unwrap());

        surface.set_filter(&chain).unwrap();
        assert_eq!(surface.ctx.filter(), "grayscale(1) blur(2px)");

        surface.set_filter(&FilterChain::new()).unwrap();
        assert_eq!(surface.ctx.filter(), "none");
    }

    #[wasm_bindgen_test]
    fn test_set_transform_round_trips() {
        let mut surface = CanvasSurface::create().unwrap();
        let transform = Affine::identity()
            .translate(12.5, -3.0)
            .rotate(0.75)
            .scale(1.5, 0.5);

        surface.set_transform(transform).unwrap();

        assert_matrix(&surface.ctx, transform);
    }

    #[wasm_bindgen_test]
    fn test_fill_ignores_current_transform() {
        let mut surface = CanvasSurface::create().unwrap();
        surface.resize(4, 4).unwrap();
        let shrink = Affine::identity().scale(0.25, 0.25);
        surface.set_transform(shrink).unwrap();

        surface.fill("#ff0000").unwrap();

        // the far corner is only painted when the fill covers the whole canvas
        assert_eq!(pixel(&surface, 3.0, 3.0), vec![255, 0, 0, 255]);
        assert_matrix(&surface.ctx, shrink);
    }

    #[wasm_bindgen_test]
    fn test_fill_after_resize_replaces_content() {
        let mut surface = CanvasSurface::create().unwrap();
        surface.resize(2, 2).unwrap();
        surface.fill("white").unwrap();
        surface.resize(2, 2).unwrap();
        surface.fill("rgba(0, 0, 255, 1)").unwrap();
        assert_eq!(pixel(&surface, 0.0, 0.0), vec![0, 0, 255, 255]);
    }
}
