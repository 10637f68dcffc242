// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer settings

use crate::{Result, ViewerError};
use serde::{Deserialize, Serialize};

/// Tunables of the viewer core
///
/// Every field has a default, so a settings file only needs to name what it
/// changes:
///
/// ```ignore
/// let settings = ViewerSettings::from_json(r#"{ "drag_threshold_px": 6.0 }"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Pointer travel (pixels) above which a press/release pair is a drag
    pub drag_threshold_px: f64,
    /// Vertical field of view of the perspective camera, in degrees
    pub camera_fov_deg: f64,
    /// Stable tag of the category-filter subset
    pub subset_tag: String,
    /// Camera offset from the model center, in multiples of the fit distance
    pub fit_margin: [f64; 3],
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: 4.0,
            camera_fov_deg: 60.0,
            subset_tag: "category-filter".to_string(),
            fit_margin: [1.2, 0.9, 1.2],
        }
    }
}

impl ViewerSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ViewerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0) {
            return Err(ViewerError::config(format!(
                "drag_threshold_px must be a non-negative number, got {}",
                self.drag_threshold_px
            )));
        }
        if !(self.camera_fov_deg > 0.0 && self.camera_fov_deg < 180.0) {
            return Err(ViewerError::config(format!(
                "camera_fov_deg must be in (0, 180), got {}",
                self.camera_fov_deg
            )));
        }
        if self.subset_tag.trim().is_empty() {
            return Err(ViewerError::config("subset_tag must not be empty"));
        }
        if self.fit_margin.iter().any(|m| !m.is_finite()) {
            return Err(ViewerError::config("fit_margin must be finite"));
        }
        Ok(())
    }
}
