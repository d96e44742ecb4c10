//! Mirror the image about its center.

use serde::{Deserialize, Serialize};

use super::{TransformUnit, UnitOutput};
use crate::error::Result;
use crate::geometry::{Affine, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxes {
    /// Mirror along x.
    Horizontal,
    /// Mirror along y.
    Vertical,
    Both,
}

/// Options for [`flip`]. Explicit `x`/`y` take precedence over `axes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipOptions {
    pub axes: Option<FlipAxes>,
    pub x: Option<bool>,
    pub y: Option<bool>,
}

impl FlipOptions {
    pub fn new(x: bool, y: bool) -> Self {
        Self {
            axes: None,
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn axes(axes: FlipAxes) -> Self {
        Self {
            axes: Some(axes),
            x: None,
            y: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipUnit {
    x: bool,
    y: bool,
}

/// Build a flip unit.
pub fn flip(options: &FlipOptions) -> Result<FlipUnit> {
    let axes = options.axes;
    let x = options.x.unwrap_or(matches!(
        axes,
        Some(FlipAxes::Horizontal) | Some(FlipAxes::Both)
    ));
    let y = options.y.unwrap_or(matches!(
        axes,
        Some(FlipAxes::Vertical) | Some(FlipAxes::Both)
    ));
    Ok(FlipUnit { x, y })
}

impl TransformUnit for FlipUnit {
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        let (cx, cy) = (size.width / 2.0, size.height / 2.0);
        let transform = Affine::identity()
            .translate(cx, cy)
            .scale(if self.x { -1.0 } else { 1.0 }, if self.y { -1.0 } else { 1.0 })
            .translate(-cx, -cy);
        Ok(UnitOutput::transform(transform))
    }

    fn name(&self) -> &'static str {
        "flip"
    }
}
