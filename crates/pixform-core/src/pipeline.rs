//! The immutable image-transformation pipeline.
//!
//! An [`ImageTransformer`] is an ordered background, filter chain and unit
//! list. Every builder call validates its options, then returns a new value
//! that shares the untouched parts with the old one. A finished pipeline is
//! `Send + Sync` and can be applied to any number of images, concurrently.
//!
//! # Example
//!
//! ```ignore
//! use pixform_core::{ImageTransformer, ResizeOptions, RotateOptions, CssSize};
//!
//! let pipeline = ImageTransformer::new()
//!     .resize(&ResizeOptions::new(CssSize::new(400, 300)))?
//!     .rotate(&RotateOptions::new("15deg"))?
//!     .grayscale(1)?;
//! let png = pipeline.apply_to_blob(&image, None, None)?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::css::CssUnit;
use crate::encode::{download, encode_image, to_data_url, Blob, Downloadable};
use crate::engine::{self, Drawable, RenderPlan, Surface};
use crate::error::{Result, TransformError};
use crate::filter::{Filter, FilterChain};
use crate::geometry::Size;
use crate::raster::RasterSurface;
use crate::transform::{
    flip, resize, rotate, scale, translate, FlipOptions, ResizeOptions, RotateOptions,
    ScaleOptions, TranslateOptions, TransformUnit,
};

/// Background used when none is given.
pub const DEFAULT_BACKGROUND: &str = "#000";

/// A reusable, immutable transformation pipeline.
#[derive(Clone)]
pub struct ImageTransformer {
    background: String,
    filters: FilterChain,
    units: Arc<[Arc<dyn TransformUnit>]>,
    config: RenderConfig,
}

impl Default for ImageTransformer {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            filters: FilterChain::new(),
            units: Arc::from(Vec::<Arc<dyn TransformUnit>>::new()),
            config: RenderConfig::default(),
        }
    }
}

impl fmt::Debug for ImageTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTransformer")
            .field("background", &self.background)
            .field("filters", &self.filters.to_css())
            .field(
                "units",
                &self.units.iter().map(|u| u.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl ImageTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Number of geometric units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Names of the geometric units in application order.
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.name()).collect()
    }

    /// A pipeline painting onto `color` (any CSS colour).
    pub fn with_background(&self, color: impl Into<String>) -> Result<Self> {
        let color = color.into();
        csscolorparser::parse(&color)
            .map_err(|e| TransformError::InvalidOption(format!("background {color:?}: {e}")))?;
        Ok(Self {
            background: color,
            ..self.clone()
        })
    }

    pub fn with_config(&self, config: RenderConfig) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }

    /// Drop all filters and units, keeping background and config.
    pub fn reset(&self) -> Self {
        self.reset_filters().reset_transforms()
    }

    // Filters

    pub fn reset_filters(&self) -> Self {
        Self {
            filters: FilterChain::new(),
            ..self.clone()
        }
    }

    pub fn add_filter(&self, filter: Filter) -> Self {
        Self {
            filters: self.filters.with(filter),
            ..self.clone()
        }
    }

    pub fn blur(&self, length: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::blur(length)?))
    }

    pub fn brightness(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::brightness(amount)?))
    }

    pub fn contrast(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::contrast(amount)?))
    }

    pub fn grayscale(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::grayscale(amount)?))
    }

    pub fn hue_rotation(&self, angle: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::hue_rotation(angle)?))
    }

    pub fn invert(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::invert(amount)?))
    }

    pub fn opacity(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::opacity(amount)?))
    }

    pub fn saturate(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::saturate(amount)?))
    }

    pub fn sepia(&self, amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(self.add_filter(Filter::sepia(amount)?))
    }

    // Transforms

    pub fn reset_transforms(&self) -> Self {
        Self {
            units: Arc::from(Vec::<Arc<dyn TransformUnit>>::new()),
            ..self.clone()
        }
    }

    /// Append any unit, including caller-defined closures.
    pub fn transform(&self, unit: impl TransformUnit + 'static) -> Self {
        let mut units = self.units.to_vec();
        units.push(Arc::new(unit));
        Self {
            units: units.into(),
            ..self.clone()
        }
    }

    pub fn resize(&self, options: &ResizeOptions) -> Result<Self> {
        Ok(self.transform(resize(options)?))
    }

    pub fn rotate(&self, options: &RotateOptions) -> Result<Self> {
        Ok(self.transform(rotate(options)?))
    }

    pub fn flip(&self, options: &FlipOptions) -> Result<Self> {
        Ok(self.transform(flip(options)?))
    }

    pub fn scale(&self, options: &ScaleOptions) -> Result<Self> {
        Ok(self.transform(scale(options)?))
    }

    pub fn translate(&self, options: &TranslateOptions) -> Result<Self> {
        Ok(self.transform(translate(options)?))
    }

    // Execution

    /// Size pass only: final size and source-to-output matrix for an image of
    /// `natural` size.
    pub fn plan(&self, natural: Size) -> Result<RenderPlan> {
        engine::plan(&self.units, natural, &self.config)
    }

    /// Render onto a caller-supplied surface.
    pub fn apply_on_surface<S: Surface>(&self, surface: &mut S, image: &S::Image) -> Result<()> {
        engine::execute(
            surface,
            image,
            &self.units,
            &self.background,
            &self.filters,
            &self.config,
        )
        .map(|_| ())
    }

    /// Render onto a fresh software surface.
    pub fn apply_to_surface(&self, image: &RgbaImage) -> Result<RasterSurface> {
        let plan = self.plan(image.natural_size())?;
        let mut surface = RasterSurface::new(&self.config);
        engine::paint(&mut surface, image, &plan, &self.background, &self.filters)?;
        Ok(surface)
    }

    /// Render and encode; unsupported MIME types fall back to PNG.
    pub fn apply_to_blob(
        &self,
        image: &RgbaImage,
        mime: Option<&str>,
        quality: Option<f64>,
    ) -> Result<Blob> {
        let surface = self.apply_to_surface(image)?;
        encode_image(surface.image(), mime, quality)
    }

    pub fn apply_to_data_url(
        &self,
        image: &RgbaImage,
        mime: Option<&str>,
        quality: Option<f64>,
    ) -> Result<String> {
        Ok(to_data_url(&self.apply_to_blob(image, mime, quality)?))
    }

    /// Alias of [`apply_to_data_url`](Self::apply_to_data_url).
    pub fn apply(
        &self,
        image: &RgbaImage,
        mime: Option<&str>,
        quality: Option<f64>,
    ) -> Result<String> {
        self.apply_to_data_url(image, mime, quality)
    }

    /// Render, encode and save into `dir`. Returns the written path.
    pub fn apply_to_download(
        &self,
        image: &RgbaImage,
        filename: Option<&str>,
        mime: Option<&str>,
        quality: Option<f64>,
        dir: &Path,
    ) -> Result<PathBuf> {
        let blob = self.apply_to_blob(image, mime, quality)?;
        download(Downloadable::Blob(blob), filename, dir)
    }

    /// Build a pipeline from a declarative description.
    pub fn from_spec(spec: &PipelineSpec) -> Result<Self> {
        let mut pipeline = Self::new();
        if let Some(background) = &spec.background {
            pipeline = pipeline.with_background(background.clone())?;
        }
        if let Some(config) = spec.config {
            pipeline = pipeline.with_config(config);
        }
        for filter in &spec.filters {
            pipeline = pipeline.add_filter(filter.build()?);
        }
        for unit in &spec.transforms {
            pipeline = match unit {
                TransformSpec::Resize(options) => pipeline.resize(options)?,
                TransformSpec::Rotate(options) => pipeline.rotate(options)?,
                TransformSpec::Flip(options) => pipeline.flip(options)?,
                TransformSpec::Scale(options) => pipeline.scale(options)?,
                TransformSpec::Translate(options) => pipeline.translate(options)?,
            };
        }
        Ok(pipeline)
    }
}

/// Declarative pipeline description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineSpec {
    pub background: Option<String>,
    pub filters: Vec<FilterSpec>,
    pub transforms: Vec<TransformSpec>,
    pub config: Option<RenderConfig>,
}

/// One filter, as `{"type": "blur", "value": "2px"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterSpec {
    Blur(CssUnit),
    Brightness(CssUnit),
    Contrast(CssUnit),
    Grayscale(CssUnit),
    HueRotation(CssUnit),
    Invert(CssUnit),
    Opacity(CssUnit),
    Saturate(CssUnit),
    Sepia(CssUnit),
    Custom(String),
}

impl FilterSpec {
    pub fn build(&self) -> Result<Filter> {
        match self {
            FilterSpec::Blur(v) => Filter::blur(v.clone()),
            FilterSpec::Brightness(v) => Filter::brightness(v.clone()),
            FilterSpec::Contrast(v) => Filter::contrast(v.clone()),
            FilterSpec::Grayscale(v) => Filter::grayscale(v.clone()),
            FilterSpec::HueRotation(v) => Filter::hue_rotation(v.clone()),
            FilterSpec::Invert(v) => Filter::invert(v.clone()),
            FilterSpec::Opacity(v) => Filter::opacity(v.clone()),
            FilterSpec::Saturate(v) => Filter::saturate(v.clone()),
            FilterSpec::Sepia(v) => Filter::sepia(v.clone()),
            FilterSpec::Custom(token) => Ok(Filter::custom(token.clone())),
        }
    }
}

/// One geometric unit, tagged by `type` next to its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformSpec {
    Resize(ResizeOptions),
    Rotate(RotateOptions),
    Flip(FlipOptions),
    Scale(ScaleOptions),
    Translate(TranslateOptions),
}
