//! Scale about a center point without changing the logical size.

use serde::{Deserialize, Serialize};

use super::{TransformUnit, UnitOutput};
use crate::css::{check_scale, scale_to_ratio, CssPoint, CssUnit};
use crate::error::Result;
use crate::geometry::{Affine, Size};

/// Options for [`scale`]. `x` and `y` fall back to `scale`, which falls back to 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    pub scale: Option<CssUnit>,
    pub x: Option<CssUnit>,
    pub y: Option<CssUnit>,
    /// Center of scaling. Defaults to `50%`.
    pub center: Option<CssPoint>,
}

impl ScaleOptions {
    pub fn uniform(scale: impl Into<CssUnit>) -> Self {
        Self {
            scale: Some(scale.into()),
            ..Default::default()
        }
    }

    pub fn per_axis(x: impl Into<CssUnit>, y: impl Into<CssUnit>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            ..Default::default()
        }
    }

    pub fn with_center(mut self, center: impl Into<CssPoint>) -> Self {
        self.center = Some(center.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleUnit {
    x: CssUnit,
    y: CssUnit,
    center: CssPoint,
}

/// Build a scale unit.
pub fn scale(options: &ScaleOptions) -> Result<ScaleUnit> {
    let uniform = options.scale.clone().unwrap_or(CssUnit::Number(1.0));
    let x = options.x.clone().unwrap_or_else(|| uniform.clone());
    let y = options.y.clone().unwrap_or(uniform);
    check_scale(&x)?;
    check_scale(&y)?;

    let center = options.center.clone().unwrap_or_default();
    center.validate()?;

    Ok(ScaleUnit { x, y, center })
}

impl TransformUnit for ScaleUnit {
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        let center = self.center.resolve(Some(size.as_point()))?;
        let sx = scale_to_ratio(&self.x, size.width)?;
        let sy = scale_to_ratio(&self.y, size.height)?;

        let transform = Affine::identity()
            .translate(center.x, center.y)
            .scale(sx, sy)
            .translate(-center.x, -center.y);
        Ok(UnitOutput::transform(transform))
    }

    fn name(&self) -> &'static str {
        "scale"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::geometry::Point;
    use crate::transform::test_support::assert_point;

    const SIZE: Size = Size {
        width: 200.0,
        height: 100.0,
    };

    #[test]
    fn test_defaults_to_identity() {
        let t = scale(&ScaleOptions::default()).unwrap().apply(SIZE).unwrap().transform;
        assert!(t.approx_eq(&Affine::identity(), 1e-12));
    }

    #[test]
    fn test_uniform_about_center() {
        let t = scale(&ScaleOptions::uniform(2)).unwrap().apply(SIZE).unwrap().transform;
        assert_point(t.transform_point(Point::new(100.0, 50.0)), 100.0, 50.0);
        assert_point(t.transform_point(Point::new(0.0, 0.0)), -100.0, -50.0);
    }

    #[test]
    fn test_axis_overrides_uniform() {
        let options = ScaleOptions {
            scale: Some(CssUnit::from(3)),
            y: Some(CssUnit::from("50%")),
            center: Some(CssPoint::from(0)),
            ..Default::default()
        };
        let t = scale(&options).unwrap().apply(SIZE).unwrap().transform;
        assert_point(t.transform_point(Point::new(10.0, 10.0)), 30.0, 5.0);
    }

    #[test]
    fn test_pixel_scale_targets_length() {
        let t = scale(&ScaleOptions::per_axis("100px", "200px").with_center(0))
            .unwrap()
            .apply(SIZE)
            .unwrap()
            .transform;
        assert_point(t.transform_point(Point::new(200.0, 100.0)), 100.0, 200.0);
    }

    #[test]
    fn test_invalid_scale_unit() {
        assert!(matches!(
            scale(&ScaleOptions::uniform("2deg")).unwrap_err(),
            TransformError::UnsupportedUnit { .. }
        ));
        assert!(matches!(
            scale(&ScaleOptions::uniform("x2")).unwrap_err(),
            TransformError::Parse(_)
        ));
    }
}
