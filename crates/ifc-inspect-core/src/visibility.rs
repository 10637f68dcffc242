// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visibility engine
//!
//! Turns the category filter into what the scene shows and what ray casts
//! hit. The engine is the only owner of the filtered-subset renderable and
//! of the pick target, so the two can never disagree: whenever a subset is
//! shown the full model is hidden, and the pick target always names the one
//! renderable that is actually on screen.

use crate::category::CategoryIndex;
use crate::filter::{FilterSelection, VisibleSet};
use crate::session::ModelSession;
use crate::ViewerError;
use ifc_inspect_model::{
    ModelHandle, ModelService, RenderableId, SceneRenderer, SubsetRequest,
};

/// Renderable that currently receives ray casts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickTarget {
    /// The unfiltered model
    FullModel(RenderableId),
    /// The category-filtered subset
    Subset(RenderableId),
    /// Nothing is visible, nothing can be picked
    Nothing,
}

impl PickTarget {
    pub fn renderable(&self) -> Option<RenderableId> {
        match self {
            PickTarget::FullModel(id) | PickTarget::Subset(id) => Some(*id),
            PickTarget::Nothing => None,
        }
    }
}

/// Result of one recomputation
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOutcome {
    pub elements: VisibleSet,
    pub pick_target: PickTarget,
    /// Subset creation failed and the full model is shown instead
    pub fell_back: bool,
}

/// Keeps the filtered subset, full-model visibility and pick target in sync
#[derive(Debug)]
pub struct VisibilityEngine {
    tag: String,
    subset: Option<(ModelHandle, RenderableId)>,
    pick_target: Option<PickTarget>,
}

impl VisibilityEngine {
    /// Create an engine whose subsets are keyed by `tag`
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            subset: None,
            pick_target: None,
        }
    }

    /// Current pick target, `None` until the first recomputation
    pub fn pick_target(&self) -> Option<PickTarget> {
        self.pick_target
    }

    /// Recompute visibility for `session`
    ///
    /// `index` is `None` when categories could not be enumerated. Policy, in
    /// order:
    /// 1. no usable index: full model shown and picked
    /// 2. nothing visible: full model hidden, nothing picked
    /// 3. subset materialized: subset shown and picked, full model hidden
    /// 4. subset failed: full model shown and picked
    pub fn recompute(
        &mut self,
        index: Option<&CategoryIndex>,
        selection: &FilterSelection,
        session: &ModelSession,
        service: &dyn ModelService,
        renderer: &dyn SceneRenderer,
    ) -> VisibilityOutcome {
        let full = session.renderable;

        let Some(index) = index.filter(|index| !index.is_empty()) else {
            self.retire_subset(service, renderer);
            renderer.set_visible(full, true);
            return self.settle(
                VisibleSet::everything(&session.elements),
                PickTarget::FullModel(full),
                false,
            );
        };

        let elements = VisibleSet::partition(index, selection, &session.elements);
        if elements.visible.is_empty() {
            self.retire_subset(service, renderer);
            renderer.set_visible(full, false);
            return self.settle(elements, PickTarget::Nothing, false);
        }

        let request = SubsetRequest {
            model: session.model,
            tag: self.tag.clone(),
            ids: elements.visible.iter().copied().collect(),
        };
        match service.create_subset(&request) {
            Ok(subset) => {
                // swap in one synchronous step so old and new never show together
                if let Some((_, previous)) = self.subset.replace((session.model, subset)) {
                    if previous != subset {
                        renderer.remove_renderable(previous);
                    }
                }
                renderer.add_renderable(subset);
                renderer.set_visible(subset, true);
                renderer.set_visible(full, false);
                self.settle(elements, PickTarget::Subset(subset), false)
            }
            Err(e) => {
                log::warn!("[Visibility] {}", ViewerError::SubsetUnavailable(e));
                self.retire_subset(service, renderer);
                renderer.set_visible(full, true);
                self.settle(elements, PickTarget::FullModel(full), true)
            }
        }
    }

    /// Drop the subset and pick target (session disposal)
    pub fn retire(&mut self, service: &dyn ModelService, renderer: &dyn SceneRenderer) {
        self.retire_subset(service, renderer);
        self.pick_target = None;
    }

    fn retire_subset(&mut self, service: &dyn ModelService, renderer: &dyn SceneRenderer) {
        if let Some((model, subset)) = self.subset.take() {
            renderer.remove_renderable(subset);
            service.remove_subset(model, &self.tag);
        }
    }

    fn settle(
        &mut self,
        elements: VisibleSet,
        pick_target: PickTarget,
        fell_back: bool,
    ) -> VisibilityOutcome {
        log::debug!(
            "[Visibility] {} visible, {} hidden, target {:?}",
            elements.visible.len(),
            elements.hidden.len(),
            pick_target
        );
        self.pick_target = Some(pick_target);
        VisibilityOutcome {
            elements,
            pick_target,
            fell_back,
        }
    }
}
