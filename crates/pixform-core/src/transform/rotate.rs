//! Rotation about a center point, with optional fit scaling.
//!
//! The logical size never changes: the rotated image is clipped or padded by
//! the existing canvas unless a later resize consumes the effect.

use serde::{Deserialize, Serialize};

use super::{TransformUnit, UnitOutput};
use crate::css::{angle_to_rad, CssPoint, CssUnit};
use crate::error::Result;
use crate::geometry::{Affine, Size};

/// Scaling applied together with the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateScaleMode {
    #[default]
    None,
    /// Shrink so the rotated image fits inside the canvas.
    Contain,
    /// Grow so the rotated image covers the canvas.
    Cover,
}

/// Options for [`rotate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateOptions {
    /// Rotation angle; bare numbers are radians.
    pub angle: CssUnit,
    /// Center of rotation. Defaults to `50%`.
    #[serde(default)]
    pub center: Option<CssPoint>,
    #[serde(default)]
    pub scale_mode: RotateScaleMode,
}

impl RotateOptions {
    pub fn new(angle: impl Into<CssUnit>) -> Self {
        Self {
            angle: angle.into(),
            center: None,
            scale_mode: RotateScaleMode::None,
        }
    }

    pub fn with_center(mut self, center: impl Into<CssPoint>) -> Self {
        self.center = Some(center.into());
        self
    }

    pub fn with_scale_mode(mut self, scale_mode: RotateScaleMode) -> Self {
        self.scale_mode = scale_mode;
        self
    }
}

/// A validated rotation step. The angle is resolved at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateUnit {
    angle: f64,
    center: CssPoint,
    scale_mode: RotateScaleMode,
}

impl RotateUnit {
    /// The resolved angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Build a rotation unit.
pub fn rotate(options: &RotateOptions) -> Result<RotateUnit> {
    let angle = angle_to_rad(&options.angle)?;
    let center = options.center.clone().unwrap_or_default();
    center.validate()?;
    Ok(RotateUnit {
        angle,
        center,
        scale_mode: options.scale_mode,
    })
}

/// Bounding-box estimate of `size` rotated by `angle` radians.
///
/// Uses `w·cosθ + h·sinθ` without absolute values, so it is exact only in the
/// first quadrant. Output sizes depend on it through the contain/cover scale
/// factor, so it must not be replaced by the tight `|cos|`/`|sin|` form.
pub fn compute_rotated_bounds(size: Size, angle: f64) -> Size {
    let (sin, cos) = angle.sin_cos();
    Size {
        width: size.width * cos + size.height * sin,
        height: size.width * sin + size.height * cos,
    }
}

impl TransformUnit for RotateUnit {
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        let center = self.center.resolve(Some(size.as_point()))?;

        let bounds = compute_rotated_bounds(size, self.angle);
        let scale = match self.scale_mode {
            RotateScaleMode::Contain => {
                (size.width / bounds.width).min(size.height / bounds.height)
            }
            RotateScaleMode::Cover => {
                (bounds.width / size.width).max(bounds.height / size.height)
            }
            RotateScaleMode::None => 1.0,
        };

        let transform = Affine::identity()
            .translate(center.x, center.y)
            .rotate(self.angle)
            .scale(scale, scale)
            .translate(-center.x, -center.y);

        Ok(UnitOutput::transform(transform))
    }

    fn name(&self) -> &'static str {
        "rotate"
    }
}
