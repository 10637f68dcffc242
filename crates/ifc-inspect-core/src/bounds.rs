// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding box of the loaded model

use ifc_inspect_model::{Aabb, RenderableId, SceneRenderer};

/// Tracks the axis-aligned bounds of the current model
#[derive(Clone, Debug, Default)]
pub struct BoundsTracker {
    bounds: Option<Aabb>,
}

impl BoundsTracker {
    /// Recompute bounds from the model's full renderable
    pub fn update(&mut self, renderer: &dyn SceneRenderer, model: RenderableId) -> Option<Aabb> {
        self.bounds = renderer.bounding_box(model);
        if self.bounds.is_none() {
            log::warn!("[Bounds] Model has no measurable geometry");
        }
        self.bounds
    }

    pub fn clear(&mut self) {
        self.bounds = None;
    }

    pub fn get(&self) -> Option<Aabb> {
        self.bounds
    }
}
