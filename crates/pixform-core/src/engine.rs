//! The execution engine: plan the output, then paint it once.
//!
//! # Algorithm
//!
//! 1. **Size pass**: starting from the source image's natural size, every unit
//!    is handed the working size and answers with a local transform and an
//!    optional new size. The local transform is composed on the outside of the
//!    running matrix (`matrix = local · matrix`), so each unit works in an
//!    origin-based frame yet lands on top of everything earlier units did.
//! 2. **Bounds check**: the final size is compared against
//!    [`RenderConfig::max_edge`] before the surface is touched.
//! 3. **Paint pass**: the surface is resized, the background filled, the
//!    filter chain set, the accumulated matrix installed and the image drawn
//!    exactly once at the origin.
//!
//! Because the matrix is threaded explicitly, the size pass already yields the
//! transform the paint pass needs and no unit ever sees a live surface.

use std::sync::Arc;

use image::RgbaImage;
use log::debug;

use crate::config::RenderConfig;
use crate::error::{Result, TransformError};
use crate::filter::FilterChain;
use crate::geometry::{Affine, Size};
use crate::transform::TransformUnit;

/// Anything with natural pixel dimensions that a [`Surface`] can draw.
pub trait Drawable {
    fn natural_size(&self) -> Size;
}

impl Drawable for RgbaImage {
    fn natural_size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }
}

/// A mutable 2D raster target.
///
/// Mirrors the subset of a canvas 2D context the engine needs. Resizing must
/// discard transform and filter state, just as assigning a canvas's width
/// does.
pub trait Surface {
    type Image: Drawable + ?Sized;

    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Fill the whole surface with a CSS colour, ignoring the current
    /// transform.
    fn fill(&mut self, color: &str) -> Result<()>;

    fn set_filter(&mut self, filters: &FilterChain) -> Result<()>;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine) -> Result<()>;

    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64) -> Result<()>;
}

/// Outcome of the size pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPlan {
    /// Final logical size.
    pub size: Size,
    /// Matrix mapping source image pixels onto the output surface.
    pub transform: Affine,
}

impl RenderPlan {
    /// Whole-pixel surface dimensions; fractional sizes are truncated.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.size.width as u32, self.size.height as u32)
    }
}

fn exceeds(edge: f64, max_edge: u32) -> bool {
    edge.is_nan() || edge > max_edge as f64
}

/// Run the size pass and the bounds check.
pub fn plan(
    units: &[Arc<dyn TransformUnit>],
    natural: Size,
    config: &RenderConfig,
) -> Result<RenderPlan> {
    let mut size = natural;
    let mut transform = Affine::identity();

    for unit in units {
        let output = unit.apply(size)?;
        transform = output.transform.multiply(&transform);
        if let Some(next) = output.size {
            debug!(
                target: "pixform",
                "{} changed size {}x{} -> {}x{}",
                unit.name(),
                size.width,
                size.height,
                next.width,
                next.height
            );
            size = next;
        }
    }

    if exceeds(size.width, config.max_edge) || exceeds(size.height, config.max_edge) {
        return Err(TransformError::OutputTooLarge {
            width: size.width,
            height: size.height,
            max_edge: config.max_edge,
        });
    }

    debug!(
        target: "pixform",
        "planned {}x{} output from {}x{} source across {} units",
        size.width,
        size.height,
        natural.width,
        natural.height,
        units.len()
    );

    Ok(RenderPlan { size, transform })
}

/// Run the paint pass for an already validated plan.
pub fn paint<S: Surface>(
    surface: &mut S,
    image: &S::Image,
    plan: &RenderPlan,
    background: &str,
    filters: &FilterChain,
) -> Result<()> {
    let (width, height) = plan.surface_size();
    surface.resize(width, height)?;
    surface.fill(background)?;
    surface.set_filter(filters)?;
    surface.set_transform(plan.transform)?;
    surface.draw_image(image, 0.0, 0.0)
}

/// Plan and paint in one go. Nothing touches the surface unless planning
/// succeeds.
pub fn execute<S: Surface>(
    surface: &mut S,
    image: &S::Image,
    units: &[Arc<dyn TransformUnit>],
    background: &str,
    filters: &FilterChain,
    config: &RenderConfig,
) -> Result<RenderPlan> {
    let plan = plan(units, image.natural_size(), config)?;
    paint(surface, image, &plan, background, filters)?;
    Ok(plan)
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// One call received by a [`RecordingSurface`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Resize(u32, u32),
        Fill(String),
        Filter(String),
        Transform(Affine),
        Draw(Size, f64, f64),
    }

    /// A surface that only records what it is asked to do.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<Call>,
    }

    /// A stand-in image that is nothing but its size.
    pub struct FakeImage(pub Size);

    impl Drawable for FakeImage {
        fn natural_size(&self) -> Size {
            self.0
        }
    }

    impl Surface for RecordingSurface {
        type Image = FakeImage;

        fn resize(&mut self, width: u32, height: u32) -> Result<()> {
            self.calls.push(Call::Resize(width, height));
            Ok(())
        }

        fn fill(&mut self, color: &str) -> Result<()> {
            self.calls.push(Call::Fill(color.to_string()));
            Ok(())
        }

        fn set_filter(&mut self, filters: &FilterChain) -> Result<()> {
            self.calls.push(Call::Filter(filters.to_css()));
            Ok(())
        }

        fn set_transform(&mut self, transform: Affine) -> Result<()> {
            self.calls.push(Call::Transform(transform));
            Ok(())
        }

        fn draw_image(&mut self, image: &FakeImage, x: f64, y: f64) -> Result<()> {
            self.calls.push(Call::Draw(image.0, x, y));
            Ok(())
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::transform::{flip, FlipOptions};
    use proptest::prelude::*;

    proptest! {
        /// Property: flipping twice in a pipeline yields the identity matrix.
        #[test]
        fn prop_double_flip_plans_identity(
            w in 1.0f64..5000.0,
            h in 1.0f64..5000.0,
            x: bool,
            y: bool,
        ) {
            let unit: Arc<dyn TransformUnit> = Arc::new(flip(&FlipOptions::new(x, y)).unwrap());
            let plan = plan(&[unit.clone(), unit], Size::new(w, h), &RenderConfig::default())
                .unwrap();
            prop_assert!(plan.transform.approx_eq(&Affine::identity(), 1e-6));
            prop_assert_eq!(plan.size, Size::new(w, h));
        }

        /// Property: any edge above the limit is rejected.
        #[test]
        fn prop_oversized_edge_rejected(edge in 16_385.0f64..1e7, other in 1.0f64..16_384.0) {
            let config = RenderConfig::default();
            prop_assert!(plan(&[], Size::new(edge, other), &config).is_err());
            prop_assert!(plan(&[], Size::new(other, edge), &config).is_err());
        }
    }
}
