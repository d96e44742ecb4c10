//! Geometric transform units: resize, rotate, flip, scale and translate.
//!
//! Each factory validates its options eagerly and returns a unit holding the
//! already-checked options. At execution time a unit is handed the current
//! logical size and answers with a local transform plus, optionally, a new
//! logical size.
//!
//! # Coordinate System
//!
//! - A unit works in its own origin-based frame, as if the image it sees were
//!   untransformed and exactly `size` pixels large
//! - The engine composes the local transform on top of everything earlier
//!   units produced
//! - Origin is top-left, y grows downwards, positive angles turn clockwise
//!
//! # Size Bookkeeping
//!
//! Only [`resize`] changes the logical size. Every other unit reports
//! `size: None`, which the engine reads as "unchanged".

mod flip;
mod resize;
mod rotate;
mod scale;
mod translate;

pub use flip::{flip, FlipAxes, FlipOptions, FlipUnit};
pub use resize::{compute_patch, resize, ResizeMode, ResizeOptions, ResizeUnit};
pub use rotate::{compute_rotated_bounds, rotate, RotateOptions, RotateScaleMode, RotateUnit};
pub use scale::{scale, ScaleOptions, ScaleUnit};
pub use translate::{translate, TranslateOptions, TranslateUnit};

use crate::error::Result;
use crate::geometry::{Affine, Size};

/// What a unit contributes for one application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitOutput {
    /// Transform in the unit's local frame.
    pub transform: Affine,
    /// New logical size, or `None` when the size is unchanged.
    pub size: Option<Size>,
}

impl UnitOutput {
    /// A pure coordinate-space operation.
    pub fn transform(transform: Affine) -> Self {
        Self {
            transform,
            size: None,
        }
    }

    /// An operation that also redefines the logical size.
    pub fn resized(transform: Affine, size: Size) -> Self {
        Self {
            transform,
            size: Some(size),
        }
    }
}

/// One geometric step of a pipeline.
///
/// Implementations must be deterministic: the same `size` always yields the
/// same output. The engine relies on this to plan an execution without
/// touching a drawing surface.
pub trait TransformUnit: Send + Sync {
    fn apply(&self, size: Size) -> Result<UnitOutput>;

    /// Short label used in logs and `Debug` output.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> TransformUnit for F
where
    F: Fn(Size) -> Result<UnitOutput> + Send + Sync,
{
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        self(size)
    }
}



// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1.0f64..4000.0, 1.0f64..4000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: coordinate-space units never change the logical size.
        #[test]
        fn prop_size_preserved(
            size in size_strategy(),
            deg in -720.0f64..720.0,
            factor in 0.1f64..10.0,
            dx in -500i32..500,
        ) {
            let units: Vec<Box<dyn TransformUnit>> = vec![
                Box::new(rotate(&RotateOptions::new(format!("{deg}deg"))).unwrap()),
                Box::new(flip(&FlipOptions::new(true, false)).unwrap()),
                Box::new(scale(&ScaleOptions::uniform(factor)).unwrap()),
                Box::new(translate(&TranslateOptions::new(dx, "25%")).unwrap()),
            ];
            for unit in &units {
                prop_assert_eq!(unit.apply(size).unwrap().size, None);
            }
        }

        /// Property: flipping the same axis twice is the identity.
        #[test]
        fn prop_flip_is_involution(size in size_strategy(), x: bool, y: bool) {
            let unit = flip(&FlipOptions::new(x, y)).unwrap();
            let once = unit.apply(size).unwrap().transform;
            let twice = once.multiply(&once);
            prop_assert!(twice.approx_eq(&Affine::identity(), 1e-9));
        }

        /// Property: fill-mode resize always lands on the requested size.
        #[test]
        fn prop_fill_hits_target(size in size_strategy(), tw in 1u32..2000, th in 1u32..2000) {
            let unit = resize(&ResizeOptions::new(crate::css::CssSize::new(tw as i32, th as i32)))
                .unwrap();
            let out = unit.apply(size).unwrap();
            prop_assert_eq!(out.size, Some(Size::new(tw as f64, th as f64)));
        }
    }
}
