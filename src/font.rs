//! Font scaler: applies the configured font-size percentage to the root style
//! of the loaded document.

use crate::{Error, FontScalePercent, RenderSurface, Result};

/// Script that sets the document root's text scale to `percent`.
///
/// Assigning a fixed value makes repeated application a no-op visually.
pub fn font_scale_script(percent: FontScalePercent) -> String {
    format!(
        "(function(){{var s=document.documentElement.style;\
s.webkitTextSizeAdjust='{p}%';s.textSizeAdjust='{p}%';s.fontSize='{p}%';return '{p}';}})()",
        p = percent.get()
    )
}

/// Tracks what was last applied to the current document.
#[derive(Debug, Default, Clone)]
pub struct FontScaler {
    applied: Option<FontScalePercent>,
}

impl FontScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Option<FontScalePercent> {
        self.applied
    }

    /// Forget the applied value; the next document starts unscaled.
    pub fn reset(&mut self) {
        self.applied = None;
    }

    /// Apply `percent` unless it is already in effect. Returns whether a
    /// script was sent to the surface.
    pub fn apply<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        percent: FontScalePercent,
    ) -> Result<bool> {
        if self.applied == Some(percent) {
            return Ok(false);
        }
        let res = surface.evaluate_script(&font_scale_script(percent))?;
        if res.is_error {
            return Err(Error::ScriptError(format!(
                "font scale {}% rejected: {}",
                percent.get(),
                res.value
            )));
        }
        self.applied = Some(percent);
        Ok(true)
    }
}
