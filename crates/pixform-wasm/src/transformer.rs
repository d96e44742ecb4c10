//! WASM bindings for the transformation pipeline.
//!
//! `ImageTransformer` on the JavaScript side is an immutable value: every
//! builder call returns a new transformer and leaves the receiver alone.
//! Options objects use the same shape as the JSON pipeline description,
//! so `{ size: { width: 200, height: 200 }, mode: "cover" }` is a valid
//! `resize` argument.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const base = new ImageTransformer("#fff").sepia("40%");
//! const thumb = base
//!     .resize({ size: 128, mode: "cover" })
//!     .rotate({ angle: "90deg" });
//!
//! const url = thumb.applyToDataUrl(img, "image/jpeg", 0.8);
//! const blob = await thumb.applyToBlob(img, "image/webp");
//! ```

use pixform_core::{
    CssUnit, Filter, FlipOptions, ImageMime, ImageTransformer, PipelineSpec, RenderConfig,
    ResizeOptions, RotateOptions, ScaleOptions, TransformError, TranslateOptions,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

use crate::canvas::{CanvasSurface, DomImage};
use crate::types::JsRasterImage;

fn to_js(err: TransformError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

/// Immutable image transformation pipeline.
#[wasm_bindgen(js_name = ImageTransformer)]
#[derive(Debug, Clone, Default)]
pub struct JsImageTransformer {
    inner: ImageTransformer,
}

impl From<ImageTransformer> for JsImageTransformer {
    fn from(inner: ImageTransformer) -> Self {
        JsImageTransformer { inner }
    }
}

impl JsImageTransformer {
    pub fn inner(&self) -> &ImageTransformer {
        &self.inner
    }

    fn lift(result: pixform_core::Result<ImageTransformer>) -> Result<Self, JsValue> {
        result.map(Self::from).map_err(to_js)
    }

    fn with_filter(
        &self,
        value: JsValue,
        build: impl FnOnce(&ImageTransformer, CssUnit) -> pixform_core::Result<ImageTransformer>,
    ) -> Result<Self, JsValue> {
        let unit: CssUnit = from_js(value)?;
        Self::lift(build(&self.inner, unit))
    }

    fn render_to_canvas(&self, image: &HtmlImageElement) -> Result<HtmlCanvasElement, JsValue> {
        let mut surface = CanvasSurface::create().map_err(to_js)?;
        self.inner
            .apply_on_surface(&mut surface, &DomImage(image.clone()))
            .map_err(to_js)?;
        Ok(surface.into_canvas())
    }
}

#[wasm_bindgen(js_class = ImageTransformer)]
impl JsImageTransformer {
    /// Create an empty pipeline. The background defaults to `#000`.
    #[wasm_bindgen(constructor)]
    pub fn new(background: Option<String>) -> Result<JsImageTransformer, JsValue> {
        match background {
            Some(color) => Self::lift(ImageTransformer::new().with_background(color)),
            None => Ok(Self::default()),
        }
    }

    /// Build a pipeline from a `{ background, filters, transforms, config }`
    /// description.
    #[wasm_bindgen(js_name = fromSpec)]
    pub fn from_spec(spec: JsValue) -> Result<JsImageTransformer, JsValue> {
        let spec: PipelineSpec = from_js(spec)?;
        Self::lift(ImageTransformer::from_spec(&spec))
    }

    #[wasm_bindgen(getter)]
    pub fn background(&self) -> String {
        self.inner.background().to_string()
    }

    /// The CSS filter string the canvas will receive.
    #[wasm_bindgen(getter)]
    pub fn filter(&self) -> String {
        self.inner.filters().to_css()
    }

    #[wasm_bindgen(getter, js_name = transformCount)]
    pub fn transform_count(&self) -> usize {
        self.inner.unit_count()
    }

    #[wasm_bindgen(js_name = withBackground)]
    pub fn with_background(&self, color: String) -> Result<JsImageTransformer, JsValue> {
        Self::lift(self.inner.with_background(color))
    }

    /// `{ maxEdge, interpolation }`; only affects the limits and the software
    /// renderer.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(&self, config: JsValue) -> Result<JsImageTransformer, JsValue> {
        let config: RenderConfig = from_js(config)?;
        Ok(self.inner.with_config(config).into())
    }

    /// Drop filters and transforms.
    pub fn reset(&self) -> JsImageTransformer {
        self.inner.reset().into()
    }

    #[wasm_bindgen(js_name = resetFilters)]
    pub fn reset_filters(&self) -> JsImageTransformer {
        self.inner.reset_filters().into()
    }

    #[wasm_bindgen(js_name = resetTransforms)]
    pub fn reset_transforms(&self) -> JsImageTransformer {
        self.inner.reset_transforms().into()
    }

    /// Append a raw CSS filter token such as `"drop-shadow(2px 2px red)"`.
    ///
    /// Only the canvas path understands arbitrary tokens; the software
    /// renderer skips them.
    #[wasm_bindgen(js_name = addFilter)]
    pub fn add_filter(&self, token: String) -> JsImageTransformer {
        self.inner.add_filter(Filter::custom(token)).into()
    }

    pub fn blur(&self, length: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(length, |t, unit| t.blur(unit))
    }

    pub fn brightness(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.brightness(unit))
    }

    pub fn contrast(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.contrast(unit))
    }

    pub fn grayscale(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.grayscale(unit))
    }

    #[wasm_bindgen(js_name = hueRotation)]
    pub fn hue_rotation(&self, angle: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(angle, |t, unit| t.hue_rotation(unit))
    }

    /// Invert colors; a missing amount means full inversion.
    pub fn invert(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        if amount.is_undefined() || amount.is_null() {
            return Self::lift(self.inner.invert(1.0));
        }
        self.with_filter(amount, |t, unit| t.invert(unit))
    }

    pub fn opacity(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.opacity(unit))
    }

    pub fn saturate(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.saturate(unit))
    }

    pub fn sepia(&self, amount: JsValue) -> Result<JsImageTransformer, JsValue> {
        self.with_filter(amount, |t, unit| t.sepia(unit))
    }

    pub fn resize(&self, options: JsValue) -> Result<JsImageTransformer, JsValue> {
        let options: ResizeOptions = from_js(options)?;
        Self::lift(self.inner.resize(&options))
    }

    pub fn rotate(&self, options: JsValue) -> Result<JsImageTransformer, JsValue> {
        let options: RotateOptions = from_js(options)?;
        Self::lift(self.inner.rotate(&options))
    }

    pub fn flip(&self, options: JsValue) -> Result<JsImageTransformer, JsValue> {
        let options: FlipOptions = from_js(options)?;
        Self::lift(self.inner.flip(&options))
    }

    pub fn scale(&self, options: JsValue) -> Result<JsImageTransformer, JsValue> {
        let options: ScaleOptions = from_js(options)?;
        Self::lift(self.inner.scale(&options))
    }

    pub fn translate(&self, options: JsValue) -> Result<JsImageTransformer, JsValue> {
        let options: TranslateOptions = from_js(options)?;
        Self::lift(self.inner.translate(&options))
    }

    /// Render onto a caller-owned canvas. The canvas is resized to the
    /// output size.
    #[wasm_bindgen(js_name = applyOnCanvas)]
    pub fn apply_on_canvas(
        &self,
        canvas: HtmlCanvasElement,
        image: &HtmlImageElement,
    ) -> Result<(), JsValue> {
        let mut surface = CanvasSurface::acquire(canvas).map_err(to_js)?;
        self.inner
            .apply_on_surface(&mut surface, &DomImage(image.clone()))
            .map_err(to_js)
    }

    /// Render onto a new detached canvas and return it.
    #[wasm_bindgen(js_name = applyToCanvas)]
    pub fn apply_to_canvas(&self, image: &HtmlImageElement) -> Result<HtmlCanvasElement, JsValue> {
        self.render_to_canvas(image)
    }

    /// Render and encode as a data URL. Unsupported types give PNG.
    #[wasm_bindgen(js_name = applyToDataUrl)]
    pub fn apply_to_data_url(
        &self,
        image: &HtmlImageElement,
        mime: Option<String>,
        quality: Option<f64>,
    ) -> Result<String, JsValue> {
        let canvas = self.render_to_canvas(image)?;
        let mime = ImageMime::resolve(mime.as_deref());
        match quality {
            Some(q) => canvas.to_data_url_with_type_and_encoder_options(mime.mime(), &q.into()),
            None => canvas.to_data_url_with_type(mime.mime()),
        }
    }

    /// Alias of `applyToDataUrl`.
    pub fn apply(
        &self,
        image: &HtmlImageElement,
        mime: Option<String>,
        quality: Option<f64>,
    ) -> Result<String, JsValue> {
        self.apply_to_data_url(image, mime, quality)
    }

    /// Render and encode; resolves to a `Blob`.
    #[wasm_bindgen(js_name = applyToBlob)]
    pub fn apply_to_blob(
        &self,
        image: &HtmlImageElement,
        mime: Option<String>,
        quality: Option<f64>,
    ) -> Result<js_sys::Promise, JsValue> {
        let canvas = self.render_to_canvas(image)?;
        let mime = ImageMime::resolve(mime.as_deref());
        let quality = quality.map_or(JsValue::UNDEFINED, JsValue::from);

        let mut failure = None;
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let callback = Closure::once_into_js(move |blob: JsValue| {
                let outcome = if blob.is_null() {
                    reject.call1(
                        &JsValue::NULL,
                        &to_js(TransformError::Encoding("canvas produced no blob".into())),
                    )
                } else {
                    resolve.call1(&JsValue::NULL, &blob)
                };
                if let Err(err) = outcome {
                    log_error(&err);
                }
            });
            if let Err(err) = canvas.to_blob_with_type_and_encoder_options(
                callback.unchecked_ref(),
                mime.mime(),
                &quality,
            ) {
                failure = Some(err);
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(promise),
        }
    }

    /// Render and hand the result to the browser as a download.
    ///
    /// Without a filename the browser sees `download.<ext>`.
    #[wasm_bindgen(js_name = applyToDownload)]
    pub fn apply_to_download(
        &self,
        image: &HtmlImageElement,
        filename: Option<String>,
        mime: Option<String>,
        quality: Option<f64>,
    ) -> Result<(), JsValue> {
        let resolved = ImageMime::resolve(mime.as_deref());
        let url = self.apply_to_data_url(image, mime, quality)?;
        let name = filename.unwrap_or_else(|| format!("download.{}", resolved.extension()));

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| to_js(TransformError::SurfaceAcquisition("no document".into())))?;
        let anchor = document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| JsValue::from_str("created element is not an anchor"))?;
        anchor.set_href(&url);
        anchor.set_download(&name);
        anchor.click();
        Ok(())
    }

    /// Run the pipeline with the software renderer, without a DOM.
    #[wasm_bindgen(js_name = applyToPixels)]
    pub fn apply_to_pixels(&self, image: &JsRasterImage) -> Result<JsRasterImage, JsValue> {
        let source = image.to_rgba().ok_or_else(|| {
            to_js(TransformError::ImageLoad(
                "pixel buffer does not match the image dimensions".into(),
            ))
        })?;
        let surface = self.inner.apply_to_surface(&source).map_err(to_js)?;
        Ok(JsRasterImage::from_rgba(surface.into_image()))
    }

    /// Software-render and encode to PNG, JPEG or WebP bytes.
    #[wasm_bindgen(js_name = applyToBytes)]
    pub fn apply_to_bytes(
        &self,
        image: &JsRasterImage,
        mime: Option<String>,
        quality: Option<f64>,
    ) -> Result<Vec<u8>, JsValue> {
        let rendered = self.apply_to_pixels(image)?;
        let pixels = rendered.to_rgba().ok_or_else(|| {
            to_js(TransformError::Encoding("rendered buffer is malformed".into()))
        })?;
        pixform_core::encode_image(&pixels, mime.as_deref(), quality)
            .map(|blob| blob.bytes)
            .map_err(to_js)
    }
}

fn log_error(err: &JsValue) {
    web_sys::console::error_1(err);
}
