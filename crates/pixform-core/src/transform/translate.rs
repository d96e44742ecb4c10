//! Plain translation; percentages are relative to the current size.

use serde::{Deserialize, Serialize};

use super::{TransformUnit, UnitOutput};
use crate::css::{CssPoint, CssUnit};
use crate::error::Result;
use crate::geometry::{Affine, Size};

/// Options for [`translate`]. Missing offsets are 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    pub x: Option<CssUnit>,
    pub y: Option<CssUnit>,
}

impl TranslateOptions {
    pub fn new(x: impl Into<CssUnit>, y: impl Into<CssUnit>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateUnit {
    offset: CssPoint,
}

/// Build a translate unit.
pub fn translate(options: &TranslateOptions) -> Result<TranslateUnit> {
    let offset = CssPoint::new(
        options.x.clone().unwrap_or(CssUnit::Number(0.0)),
        options.y.clone().unwrap_or(CssUnit::Number(0.0)),
    );
    offset.validate()?;
    Ok(TranslateUnit { offset })
}

impl TransformUnit for TranslateUnit {
    fn apply(&self, size: Size) -> Result<UnitOutput> {
        let offset = self.offset.resolve(Some(size.as_point()))?;
        Ok(UnitOutput::transform(
            Affine::identity().translate(offset.x, offset.y),
        ))
    }

    fn name(&self) -> &'static str {
        "translate"
    }
}
