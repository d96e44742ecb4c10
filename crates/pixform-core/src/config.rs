//! Execution settings carried by a pipeline.

use serde::{Deserialize, Serialize};

/// Largest output edge, in pixels, the engine will allocate.
pub const MAX_CANVAS_EDGE: u32 = 16_384;

/// Sampling used when the software surface draws a transformed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbor - hard pixel edges, fastest.
    Nearest,
    /// Bilinear - smooth, the usual canvas behaviour.
    #[default]
    Bilinear,
}

/// Render settings. Every field has a default, so partial documents
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Maximum width or height of the output surface.
    pub max_edge: u32,
    /// Image sampling for the software surface.
    pub interpolation: InterpolationFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_edge: MAX_CANVAS_EDGE,
            interpolation: InterpolationFilter::default(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_edge(mut self, max_edge: u32) -> Self {
        self.max_edge = max_edge;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationFilter) -> Self {
        self.interpolation = interpolation;
        self
    }
}
