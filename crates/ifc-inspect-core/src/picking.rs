// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Click-to-inspect picking
//!
//! A press/release pair counts as a click only if the pointer moved at most
//! the drag threshold in between; anything further is an orbit gesture and
//! resolves nothing.

use crate::session::ModelSession;
use crate::visibility::PickTarget;
use ifc_inspect_model::{ElementId, ModelHandle, ModelService, SceneRenderer};
use nalgebra::Point2;

/// Pointer-down position awaiting its pointer-up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerGesture {
    pub origin: Point2<f64>,
}

/// Classification of a pointer-up
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Click(Point2<f64>),
    Drag { distance: f64 },
    /// Pointer-up without a recorded pointer-down
    Unpaired,
}

/// Element of a specific model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub model: ModelHandle,
    pub element: ElementId,
}

/// Result of resolving a pointer-up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickResult {
    Element(ElementRef),
    /// Clicked, but there is no element under the cursor
    NothingSelected,
    /// Drag or unpaired release: not a pick at all
    Ignored,
}

/// Turns pointer events into picked elements
#[derive(Clone, Debug)]
pub struct PickResolver {
    drag_threshold: f64,
    gesture: Option<PointerGesture>,
}

impl PickResolver {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            drag_threshold,
            gesture: None,
        }
    }

    /// Start a gesture; a stale unmatched one is overwritten
    pub fn on_pointer_down(&mut self, point: Point2<f64>) {
        self.gesture = Some(PointerGesture { origin: point });
    }

    /// Finish the gesture and classify it
    pub fn classify(&mut self, point: Point2<f64>) -> Gesture {
        match self.gesture.take() {
            Some(gesture) => {
                let distance = nalgebra::distance(&gesture.origin, &point);
                if distance > self.drag_threshold {
                    Gesture::Drag { distance }
                } else {
                    Gesture::Click(point)
                }
            }
            None => Gesture::Unpaired,
        }
    }

    /// Finish the gesture and resolve the element under the cursor
    ///
    /// Ray casts go to `target`; when no target has been computed yet the
    /// session's full model is used. An explicit [`PickTarget::Nothing`]
    /// resolves nothing.
    pub fn on_pointer_up(
        &mut self,
        point: Point2<f64>,
        target: Option<PickTarget>,
        session: Option<&ModelSession>,
        service: &dyn ModelService,
        renderer: &dyn SceneRenderer,
    ) -> PickResult {
        let point = match self.classify(point) {
            Gesture::Click(point) => point,
            Gesture::Drag { distance } => {
                log::debug!("[Picking] Drag of {:.1}px, not a click", distance);
                return PickResult::Ignored;
            }
            Gesture::Unpaired => return PickResult::Ignored,
        };

        let Some(session) = session else {
            return PickResult::NothingSelected;
        };
        let renderable = match target {
            Some(PickTarget::Nothing) => return PickResult::NothingSelected,
            Some(PickTarget::FullModel(id)) | Some(PickTarget::Subset(id)) => id,
            None => session.renderable,
        };

        let Some(hit) = renderer.raycast(point, renderable) else {
            return PickResult::NothingSelected;
        };
        if hit.face_index.is_none() {
            return PickResult::NothingSelected;
        }

        match service
            .element_at(session.model, &hit)
            .and_then(ElementId::from_raw)
        {
            Some(element) => {
                log::debug!("[Picking] Hit {} at {:.2}", element, hit.distance);
                PickResult::Element(ElementRef {
                    model: session.model,
                    element,
                })
            }
            None => PickResult::NothingSelected,
        }
    }
}
