//! Resize with CSS `object-fit` / `object-position` semantics.
//!
//! # Algorithm
//!
//! 1. Resolve the target size against the current logical size. When only a
//!    width or a height is given, the other follows the current aspect ratio.
//! 2. Pick the image patch, the part of the current image that will be visible:
//!    - `fill`: the whole image (aspect ratio may change)
//!    - `contain`: the smallest target-shaped rectangle that holds the whole
//!      image, so the result is letterboxed
//!    - `cover`: the largest target-shaped rectangle inside the image, so the
//!      longer axis is cropped
//!    - `none`: a target-sized rectangle, no scaling
//! 3. Resolve `position` against the slack `current - patch` to offset the patch.
//! 4. Emit `scale(target / patch)` followed by `translate(-offset)`.
//!
//! The scale has to be issued before the translate: the offset is expressed in
//! unscaled image pixels.

use serde::{Deserialize, Serialize};

use super::{TransformUnit, UnitOutput};
use crate::css::{check_length, length_to_px, CssPoint, CssSize, CssUnit};
use crate::error::{Result, TransformError};
use crate::geometry::{Affine, Point, Size};

/// How the image is fitted into the target size, as CSS `object-fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Fill,
    Contain,
    Cover,
    None,
}

/// Options for [`resize`]. Give `size`, or one or both of `width`/`height`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    pub size: Option<CssSize>,
    pub width: Option<CssUnit>,
    pub height: Option<CssUnit>,
    pub mode: ResizeMode,
    /// Patch placement, as CSS `object-position`. Defaults to `50%`.
    pub position: Option<CssPoint>,
}

impl ResizeOptions {
    pub fn new(size: impl Into<CssSize>) -> Self {
        Self {
            size: Some(size.into()),
            ..Default::default()
        }
    }

    /// Resize to a width, keeping the aspect ratio.
    pub fn to_width(width: impl Into<CssUnit>) -> Self {
        Self {
            width: Some(width.into()),
            ..Default::default()
        }
    }

    /// Resize to a height, keeping the aspect ratio.
    pub fn to_height(height: impl Into<CssUnit>) -> Self {
        Self {
            height: Some(height.into()),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_position(mut self, position: impl Into<CssPoint>) -> Self {
        self.position = Some(position.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Size(CssSize),
    Width(CssUnit),
    Height(CssUnit),
}

/// A validated resize step.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeUnit {
    target: Target,
    mode: ResizeMode,
    position: CssPoint,
}

/// Build a resize unit.
///
/// # Errors
///
/// - `InvalidOption` when no target is given, or `size` is combined with
///   `width`/`height`
/// - `Parse` / `UnsupportedUnit` for malformed or non-length values
///
/// A target that resolves to a negative size fails with `InvalidOption` when
/// the unit is applied.
pub fn resize(options: &ResizeOptions) -> Result<ResizeUnit> {
    let target = match (&options.size, &options.width, &options.height) {
        (Some(size), None, None) => {
            size.validate()?;
            Target::Size(size.clone())
        }
        (Some(_), _, _) => {
            return Err(TransformError::InvalidOption(
                "resize accepts either `size` or `width`/`height`, not both".to_string(),
            ))
        }
        (None, Some(width), Some(height)) => {
            let size = CssSize::new(width.clone(), height.clone());
            size.validate()?;
            Target::Size(size)
        }
        (None, Some(width), None) => {
            check_length(width)?;
            Target::Width(width.clone())
        }
        (None, None, Some(height)) => {
            check_length(height)?;
            Target::Height(height.clone())
        }
        (None, None, None) => {
            return Err(TransformError::InvalidOption(
                "resize needs a `size`, `width` or `height`".to_string(),
            ))
        }
    };

    let position = options.position.clone().unwrap_or_default();
    position.validate()?;

    Ok(ResizeUnit {
        target,
        mode: options.mode,
        position,
    })
}

/// Size of the image patch that `mode` makes visible inside `target`,
/// in current-image pixels.
pub fn compute_patch(current: Size, target: Size, mode: ResizeMode) -> Size {
    let img_ar = current.aspect_ratio();
    let trg_ar = target.aspect_ratio();
    match mode {
        ResizeMode::Fill => current,
        ResizeMode::Contain => {
            if img_ar >= trg_ar {
                Size::new(current.width, current.width / trg_ar)
            } else {
                Size::new(current.height * trg_ar, current.height)
            }
        }
        ResizeMode::Cover => {
            if img_ar >= trg_ar {
                Size::new(current.height * trg_ar, current.height)
            } else {
                Size::new(current.width, current.width / trg_ar)
            }
        }
        ResizeMode::None => target,
    }
}

impl ResizeUnit {
    fn target_size(&self, current: Size) -> Result<Size> {
        match &self.target {
            Target::Size(size) => size.resolve(Some(current)),
            Target::Width(width) => {
                let width = length_to_px(width, Some(current.width))?;
                Ok(Size::new(width, width / current.aspect_ratio()))
            }
            Target::Height(height) => {
                let height = length_to_px(height, Some(current.height))?;
                Ok(Size::new(height * current.aspect_ratio(), height))
            }
        }
    }
}

impl TransformUnit for ResizeUnit {
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        let target = self.target_size(size)?;
        if target.width < 0.0 || target.height < 0.0 {
            return Err(TransformError::InvalidOption(format!(
                "resize target must not be negative, got {}x{}",
                target.width, target.height
            )));
        }
        let patch = compute_patch(size, target, self.mode);

        let offset = self.position.resolve(Some(Point::new(
            size.width - patch.width,
            size.height - patch.height,
        )))?;
        let scale_x = target.width / patch.width;
        let scale_y = target.height / patch.height;

        let transform = Affine::identity()
            .scale(scale_x, scale_y)
            .translate(-offset.x, -offset.y);

        Ok(UnitOutput::resized(transform, target))
    }

    fn name(&self) -> &'static str {
        "resize"
    }
}
