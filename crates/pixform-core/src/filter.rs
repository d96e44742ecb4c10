//! Visual filters and the ordered chain a pipeline carries.
//!
//! Filters are kept as typed values with their amounts already resolved.
//! They are turned into the canvas `filter` mini-language only at the surface
//! boundary ([`Filter::to_css`], [`FilterChain::to_css`]); the software
//! surface rasterizes the typed values directly.

use std::fmt;
use std::sync::Arc;

use crate::css::{amount_to_ratio, angle_to_rad, length_to_px, CssUnit};
use crate::error::{Result, TransformError};

/// Token for an empty chain. An empty string would leave whatever filter the
/// surface already had in place.
pub const NO_FILTER: &str = "none";

/// One visual adjustment.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Gaussian blur; standard deviation in pixels.
    Blur(f64),
    /// Linear multiplier, 1 = unchanged.
    Brightness(f64),
    /// Contrast around mid-grey, 1 = unchanged.
    Contrast(f64),
    /// 0 = unchanged, 1 = fully grey.
    Grayscale(f64),
    /// Hue rotation in radians.
    HueRotate(f64),
    /// 0 = unchanged, 1 = fully inverted.
    Invert(f64),
    /// Alpha multiplier, 1 = unchanged.
    Opacity(f64),
    /// Saturation multiplier, 1 = unchanged.
    Saturate(f64),
    /// 0 = unchanged, 1 = fully sepia.
    Sepia(f64),
    /// A raw canvas filter token, passed through verbatim.
    Custom(String),
}

fn non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(TransformError::InvalidOption(format!(
            "{name} amount must be a finite, non-negative number, got {value}"
        )));
    }
    Ok(value)
}

fn ratio_amount(name: &str, value: &CssUnit) -> Result<f64> {
    non_negative(name, amount_to_ratio(value)?)
}

impl Filter {
    /// Blur radius; bare numbers are pixels.
    pub fn blur(length: impl Into<CssUnit>) -> Result<Self> {
        let radius = length_to_px(&length.into(), None)?;
        Ok(Filter::Blur(non_negative("blur", radius)?))
    }

    pub fn brightness(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Brightness(ratio_amount("brightness", &amount.into())?))
    }

    pub fn contrast(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Contrast(ratio_amount("contrast", &amount.into())?))
    }

    pub fn grayscale(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Grayscale(ratio_amount("grayscale", &amount.into())?))
    }

    /// Hue rotation; bare numbers are radians.
    pub fn hue_rotation(angle: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::HueRotate(angle_to_rad(&angle.into())?))
    }

    pub fn invert(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Invert(ratio_amount("invert", &amount.into())?))
    }

    pub fn opacity(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Opacity(ratio_amount("opacity", &amount.into())?))
    }

    pub fn saturate(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Saturate(ratio_amount("saturate", &amount.into())?))
    }

    pub fn sepia(amount: impl Into<CssUnit>) -> Result<Self> {
        Ok(Filter::Sepia(ratio_amount("sepia", &amount.into())?))
    }

    pub fn custom(token: impl Into<String>) -> Self {
        Filter::Custom(token.into())
    }

    /// Canvas filter token for this filter.
    pub fn to_css(&self) -> String {
        match self {
            Filter::Blur(px) => format!("blur({px}px)"),
            Filter::Brightness(v) => format!("brightness({v})"),
            Filter::Contrast(v) => format!("contrast({v})"),
            Filter::Grayscale(v) => format!("grayscale({v})"),
            Filter::HueRotate(rad) => format!("hue-rotate({rad}rad)"),
            Filter::Invert(v) => format!("invert({v})"),
            Filter::Opacity(v) => format!("opacity({v})"),
            Filter::Saturate(v) => format!("saturate({v})"),
            Filter::Sepia(v) => format!("sepia({v})"),
            Filter::Custom(token) => token.clone(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Ordered, shareable list of filters. Appending copies the list and leaves
/// every existing holder untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    filters: Arc<[Filter]>,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self {
            filters: Arc::from(Vec::new()),
        }
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new chain with `filter` appended.
    pub fn with(&self, filter: Filter) -> Self {
        let mut filters = self.filters.to_vec();
        filters.push(filter);
        Self {
            filters: filters.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn as_slice(&self) -> &[Filter] {
        &self.filters
    }

    /// Space-separated canvas filter string, or [`NO_FILTER`] when empty.
    pub fn to_css(&self) -> String {
        if self.filters.is_empty() {
            return NO_FILTER.to_string();
        }
        self.filters
            .iter()
            .map(Filter::to_css)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<Filter> for FilterChain {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FilterChain {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_use_unit_defaults() {
        assert_eq!(Filter::blur(2).unwrap().to_css(), "blur(2px)");
        assert_eq!(Filter::blur("3.5px").unwrap().to_css(), "blur(3.5px)");
        assert_eq!(Filter::brightness(0.5).unwrap().to_css(), "brightness(0.5)");
        assert_eq!(Filter::contrast("150%").unwrap().to_css(), "contrast(1.5)");
        assert_eq!(Filter::hue_rotation(1).unwrap().to_css(), "hue-rotate(1rad)");
        assert_eq!(Filter::custom("drop-shadow(1px 1px red)").to_css(), "drop-shadow(1px 1px red)");
    }

    #[test]
    fn test_hue_rotation_resolves_degrees() {
        let Filter::HueRotate(rad) = Filter::hue_rotation("180deg").unwrap() else {
            panic!("expected hue rotation");
        };
        assert!((rad - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_units_and_negative_amounts() {
        assert!(matches!(Filter::blur("10%"), Err(TransformError::UnsupportedUnit { .. })));
        assert!(matches!(Filter::sepia("1deg"), Err(TransformError::UnsupportedUnit { .. })));
        assert!(matches!(Filter::opacity("half"), Err(TransformError::Parse(_))));
        assert!(matches!(Filter::blur(-1), Err(TransformError::InvalidOption(_))));
        assert!(matches!(Filter::saturate(-0.5), Err(TransformError::InvalidOption(_))));
    }

    #[test]
    fn test_rejects_non_finite_amounts() {
        assert!(matches!(Filter::blur(f64::INFINITY), Err(TransformError::InvalidOption(_))));
        assert!(matches!(Filter::blur(f64::NAN), Err(TransformError::InvalidOption(_))));
        assert!(matches!(Filter::brightness(f64::INFINITY), Err(TransformError::InvalidOption(_))));
        assert_eq!(Filter::blur(1.0e12).unwrap(), Filter::Blur(1.0e12));
    }

    #[test]
    fn test_empty_chain_is_explicit_none() {
        assert_eq!(FilterChain::new().to_css(), "none");
    }

    #[test]
    fn test_chain_preserves_order() {
        let chain = FilterChain::new()
            .with(Filter::grayscale(1).unwrap())
            .with(Filter::blur(4).unwrap())
            .with(Filter::invert("100%").unwrap());
        assert_eq!(chain.to_css(), "grayscale(1) blur(4px) invert(1)");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let base = FilterChain::new().with(Filter::sepia(1).unwrap());
        let extended = base.with(Filter::opacity(0.5).unwrap());
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.as_slice()[0], base.as_slice()[0]);
    }
}
