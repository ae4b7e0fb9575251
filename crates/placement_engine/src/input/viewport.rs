//! Viewport size and screen → NDC conversion

use crate::error::{EngineError, EngineResult};

/// Host view size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether the size can be used for picking (finite, non-zero)
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, `None` for an unusable viewport
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.is_usable().then(|| self.width / self.height)
    }

    /// Convert screen coordinates to Normalized Device Coordinates (NDC)
    ///
    /// Screen space has its origin at the top-left with Y growing downward;
    /// NDC X runs -1 (left) to +1 (right), Y runs -1 (bottom) to +1 (top).
    ///
    /// # Errors
    /// [`EngineError::NotReady`] for a zero or non-finite viewport,
    /// [`EngineError::InvalidInput`] for non-finite coordinates.
    pub fn screen_to_ndc(&self, screen_x: f32, screen_y: f32) -> EngineResult<(f32, f32)> {
        if !self.is_usable() {
            return Err(EngineError::NotReady(format!(
                "viewport {}x{} is not usable",
                self.width, self.height
            )));
        }
        if !(screen_x.is_finite() && screen_y.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "tap ({screen_x}, {screen_y}) is not finite"
            )));
        }

        let ndc_x = (screen_x / self.width) * 2.0 - 1.0;
        let ndc_y = -(screen_y / self.height) * 2.0 + 1.0;
        Ok((ndc_x, ndc_y))
    }
}
