//! CSS-style unit values and their resolution to pixels, radians and ratios.
//!
//! A [`CssUnit`] is either a plain number, interpreted in whatever unit the
//! caller defaults to, or a string such as `"50%"`, `"12px"`, `"90deg"`.
//! Strings must match `[+-]?(digits | digits?.digits)(lowercase letters | %)`
//! exactly; anything else is a [`TransformError::Parse`].
//!
//! # Supported Units
//!
//! | Resolver            | Accepted                          |
//! |---------------------|-----------------------------------|
//! | [`length_to_px`]    | unitless, `px`, `%` (needs base)  |
//! | [`angle_to_rad`]    | unitless, `rad`, `deg`, `grad`, `turn` |
//! | [`scale_to_ratio`]  | unitless, `%`, `px` (relative to base) |

use std::f64::consts::PI;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};
use crate::geometry::{Point, Size};

static CSS_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:[0-9]+|[0-9]*\.[0-9]+))([a-z]*|%)$").expect("static pattern is valid")
});

/// A number or a number with a unit suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssUnit {
    Number(f64),
    Text(String),
}

impl From<f64> for CssUnit {
    fn from(value: f64) -> Self {
        CssUnit::Number(value)
    }
}

impl From<i32> for CssUnit {
    fn from(value: i32) -> Self {
        CssUnit::Number(value as f64)
    }
}

impl From<&str> for CssUnit {
    fn from(value: &str) -> Self {
        CssUnit::Text(value.to_string())
    }
}

impl From<String> for CssUnit {
    fn from(value: String) -> Self {
        CssUnit::Text(value)
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssUnit::Number(n) => write!(f, "{n}"),
            CssUnit::Text(s) => f.write_str(s),
        }
    }
}

/// A parsed unit value.
#[derive(Debug, Clone, PartialEq)]
pub struct CssValue {
    pub magnitude: f64,
    /// `None` for bare numbers and unitless strings.
    pub unit: Option<String>,
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.as_deref().unwrap_or(""))
    }
}

impl CssUnit {
    pub fn parse(&self) -> Result<CssValue> {
        match self {
            CssUnit::Number(n) => Ok(CssValue {
                magnitude: *n,
                unit: None,
            }),
            CssUnit::Text(s) => {
                let caps = CSS_VALUE
                    .captures(s)
                    .ok_or_else(|| TransformError::Parse(s.clone()))?;
                let magnitude = caps[1]
                    .parse::<f64>()
                    .map_err(|_| TransformError::Parse(s.clone()))?;
                let unit = Some(&caps[2])
                    .filter(|u| !u.is_empty())
                    .map(|u| u.to_string());
                Ok(CssValue { magnitude, unit })
            }
        }
    }
}

fn unsupported(unit: &str, expected: &'static str) -> TransformError {
    TransformError::UnsupportedUnit {
        unit: unit.to_string(),
        expected,
    }
}

/// Resolve a length to pixels. `%` is relative to `base` and is rejected
/// when no base is available.
pub fn length_to_px(value: &CssUnit, base: Option<f64>) -> Result<f64> {
    let parsed = value.parse()?;
    match (parsed.unit.as_deref(), base) {
        (None | Some("px"), _) => Ok(parsed.magnitude),
        (Some("%"), Some(base)) => Ok(parsed.magnitude * 0.01 * base),
        (Some(unit), _) => Err(unsupported(unit, "a length")),
    }
}

/// Check that `value` parses and carries a length unit, without resolving it.
pub fn check_length(value: &CssUnit) -> Result<()> {
    let parsed = value.parse()?;
    match parsed.unit.as_deref() {
        None | Some("px") | Some("%") => Ok(()),
        Some(unit) => Err(unsupported(unit, "a length")),
    }
}

/// Resolve an angle to radians; bare numbers are already radians.
pub fn angle_to_rad(value: &CssUnit) -> Result<f64> {
    let parsed = value.parse()?;
    let n = parsed.magnitude;
    match parsed.unit.as_deref() {
        None | Some("rad") => Ok(n),
        Some("deg") => Ok(n / 180.0 * PI),
        Some("grad") => Ok(n / 200.0 * PI),
        Some("turn") => Ok(n * 2.0 * PI),
        Some(unit) => Err(unsupported(unit, "an angle")),
    }
}

/// Resolve a scale factor. Bare numbers are ratios, `%` is a percentage of
/// the current size and `px` is the target length along an axis of `base`
/// pixels.
pub fn scale_to_ratio(value: &CssUnit, base: f64) -> Result<f64> {
    let parsed = value.parse()?;
    match parsed.unit.as_deref() {
        None => Ok(parsed.magnitude),
        Some("%") => Ok(parsed.magnitude * 0.01),
        Some("px") => Ok(parsed.magnitude / base),
        Some(unit) => Err(unsupported(unit, "a scale")),
    }
}

/// Check that `value` parses and carries a scale unit.
pub fn check_scale(value: &CssUnit) -> Result<()> {
    let parsed = value.parse()?;
    match parsed.unit.as_deref() {
        None | Some("%") | Some("px") => Ok(()),
        Some(unit) => Err(unsupported(unit, "a scale")),
    }
}

/// Resolve a ratio-like amount (filters): unitless is a ratio, `%` divides by 100.
pub fn amount_to_ratio(value: &CssUnit) -> Result<f64> {
    let parsed = value.parse()?;
    match parsed.unit.as_deref() {
        None => Ok(parsed.magnitude),
        Some("%") => Ok(parsed.magnitude * 0.01),
        Some(unit) => Err(unsupported(unit, "an amount")),
    }
}

/// A point given either as one value for both axes or per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssPoint {
    PerAxis { x: CssUnit, y: CssUnit },
    Uniform(CssUnit),
}

impl CssPoint {
    pub fn new(x: impl Into<CssUnit>, y: impl Into<CssUnit>) -> Self {
        CssPoint::PerAxis {
            x: x.into(),
            y: y.into(),
        }
    }

    /// `50%` on both axes.
    pub fn center() -> Self {
        CssPoint::Uniform(CssUnit::from("50%"))
    }

    fn axes(&self) -> (&CssUnit, &CssUnit) {
        match self {
            CssPoint::PerAxis { x, y } => (x, y),
            CssPoint::Uniform(v) => (v, v),
        }
    }

    /// Resolve to pixels; percentages are taken per axis of `base`.
    pub fn resolve(&self, base: Option<Point>) -> Result<Point> {
        let (x, y) = self.axes();
        Ok(Point {
            x: length_to_px(x, base.map(|b| b.x))?,
            y: length_to_px(y, base.map(|b| b.y))?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let (x, y) = self.axes();
        check_length(x)?;
        check_length(y)
    }
}

impl Default for CssPoint {
    fn default() -> Self {
        Self::center()
    }
}

macro_rules! uniform_from {
    ($target:ident: $($source:ty),+) => {
        $(
            impl From<$source> for $target {
                fn from(value: $source) -> Self {
                    $target::Uniform(value.into())
                }
            }
        )+
    };
}

uniform_from!(CssPoint: CssUnit, f64, i32, &str, String);

/// A size given either as one value for both dimensions or per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssSize {
    PerAxis { width: CssUnit, height: CssUnit },
    Uniform(CssUnit),
}

impl CssSize {
    pub fn new(width: impl Into<CssUnit>, height: impl Into<CssUnit>) -> Self {
        CssSize::PerAxis {
            width: width.into(),
            height: height.into(),
        }
    }

    fn axes(&self) -> (&CssUnit, &CssUnit) {
        match self {
            CssSize::PerAxis { width, height } => (width, height),
            CssSize::Uniform(v) => (v, v),
        }
    }

    pub fn resolve(&self, base: Option<Size>) -> Result<Size> {
        let (width, height) = self.axes();
        Ok(Size {
            width: length_to_px(width, base.map(|b| b.width))?,
            height: length_to_px(height, base.map(|b| b.height))?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.axes();
        check_length(width)?;
        check_length(height)
    }
}

uniform_from!(CssSize: CssUnit, f64, i32, &str, String);

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_parse_number() {
        let v = CssUnit::from(5.0).parse().unwrap();
        assert_eq!(v.magnitude, 5.0);
        assert_eq!(v.unit, None);
    }

    #[test]
    fn test_parse_strings() {
        let v = CssUnit::from("-12.5px").parse().unwrap();
        assert_eq!(v.magnitude, -12.5);
        assert_eq!(v.unit.as_deref(), Some("px"));

        let v = CssUnit::from(".5").parse().unwrap();
        assert_eq!(v.magnitude, 0.5);
        assert_eq!(v.unit, None);

        let v = CssUnit::from("+50%").parse().unwrap();
        assert_eq!(v.magnitude, 50.0);
        assert_eq!(v.unit.as_deref(), Some("%"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["abc", "", "5 px", "1.", "5PX", "px5", "5%%", "1e3"] {
            let err = CssUnit::from(bad).parse().unwrap_err();
            assert_eq!(err, TransformError::Parse(bad.to_string()), "input {bad:?}");
        }
    }

    #[test]
    fn test_length_percent_of_base() {
        assert_eq!(length_to_px(&"50%".into(), Some(200.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_length_bare_number_is_px() {
        assert_eq!(length_to_px(&5.into(), None).unwrap(), 5.0);
        assert_eq!(length_to_px(&"5px".into(), None).unwrap(), 5.0);
    }

    #[test]
    fn test_length_percent_without_base_fails() {
        let err = length_to_px(&"50%".into(), None).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedUnit { ref unit, .. } if unit == "%"));
    }

    #[test]
    fn test_length_rejects_angle_unit() {
        let err = length_to_px(&"90deg".into(), Some(100.0)).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedUnit { .. }));
        assert!(check_length(&"90deg".into()).is_err());
        assert!(check_length(&"10%".into()).is_ok());
    }

    #[test]
    fn test_angles() {
        assert!(approx(angle_to_rad(&"2deg".into()).unwrap(), 0.03491));
        assert!(approx(angle_to_rad(&"1turn".into()).unwrap(), 2.0 * PI));
        assert!(approx(angle_to_rad(&"200grad".into()).unwrap(), PI));
        assert_eq!(angle_to_rad(&1.5.into()).unwrap(), 1.5);
        assert_eq!(angle_to_rad(&"1.5rad".into()).unwrap(), 1.5);
        assert!(angle_to_rad(&"10px".into()).is_err());
    }

    #[test]
    fn test_scale_ratios() {
        assert_eq!(scale_to_ratio(&2.into(), 100.0).unwrap(), 2.0);
        assert_eq!(scale_to_ratio(&"150%".into(), 100.0).unwrap(), 1.5);
        assert_eq!(scale_to_ratio(&"50px".into(), 200.0).unwrap(), 0.25);
        assert!(scale_to_ratio(&"1turn".into(), 200.0).is_err());
    }

    #[test]
    fn test_amounts() {
        assert_eq!(amount_to_ratio(&"50%".into()).unwrap(), 0.5);
        assert_eq!(amount_to_ratio(&0.25.into()).unwrap(), 0.25);
        assert!(amount_to_ratio(&"3px".into()).is_err());
    }

    #[test]
    fn test_point_broadcast_and_per_axis() {
        let base = Some(Point::new(200.0, 100.0));
        assert_eq!(
            CssPoint::from("50%").resolve(base).unwrap(),
            Point::new(100.0, 50.0)
        );
        assert_eq!(
            CssPoint::new(10, "10%").resolve(base).unwrap(),
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn test_size_broadcast_and_per_axis() {
        let base = Some(Size::new(800.0, 600.0));
        assert_eq!(
            CssSize::from("50%").resolve(base).unwrap(),
            Size::new(400.0, 300.0)
        );
        assert_eq!(
            CssSize::new(400, "100%").resolve(base).unwrap(),
            Size::new(400.0, 600.0)
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(CssUnit::from("2px").parse().unwrap().to_string(), "2px");
        assert_eq!(CssUnit::from(0.5).parse().unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_deserialize_untagged() {
        let p: CssPoint = serde_json::from_str(r#"{"x": 10, "y": "20%"}"#).unwrap();
        assert_eq!(p, CssPoint::new(10.0, "20%"));
        let p: CssPoint = serde_json::from_str(r#""50%""#).unwrap();
        assert_eq!(p, CssPoint::center());
        let s: CssSize = serde_json::from_str(r#"{"width": 400, "height": 300}"#).unwrap();
        assert_eq!(s, CssSize::new(400.0, 300.0));
        let s: CssSize = serde_json::from_str("128").unwrap();
        assert_eq!(s, CssSize::from(128.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
