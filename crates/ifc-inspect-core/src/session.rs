// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session coordinator
//!
//! Owns the one live [`ModelSession`] and everything derived from it. A load
//! disposes the previous model first, so at no point are two models in the
//! scene. Every load and unload bumps a generation token; async completions
//! compare the token they captured against the current one and drop their
//! result if a different model is live by then.
//!
//! All methods take `&self`. State sits behind a `RefCell` that is never
//! borrowed across an `.await`, so UI handlers may call in while a load or
//! attribute fetch is suspended.

use crate::bounds::BoundsTracker;
use crate::camera::fit_to_bounds;
use crate::category::{normalize_category, CategoryIndex};
use crate::filter::{FilterSelection, VisibleSet};
use crate::picking::{ElementRef, PickResolver, PickResult};
use crate::section::{SectionController, SectionState};
use crate::settings::ViewerSettings;
use crate::status::{MetadataPanel, ViewerStatus};
use crate::storage::{SectionStorage, ViewerSnapshot};
use crate::visibility::{PickTarget, VisibilityEngine, VisibilityOutcome};
use crate::{Result, ViewerError};
use ifc_inspect_model::{
    Aabb, Axis, ClipPlane, ElementAttributes, ElementId, ModelFile, ModelHandle, ModelService,
    RenderableId, SceneRenderer,
};
use nalgebra::Point2;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// One loaded model
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSession {
    /// Generation token of the load that created this session
    pub generation: u64,
    pub file_name: String,
    pub model: ModelHandle,
    /// Unfiltered renderable of the whole model
    pub renderable: RenderableId,
    pub elements: BTreeSet<ElementId>,
    pub bounds: Option<Aabb>,
}

/// Result of a pointer-up
#[derive(Clone, Debug, PartialEq)]
pub enum PickOutcome {
    Selected {
        element: ElementRef,
        attributes: ElementAttributes,
    },
    NothingSelected,
    /// Drag gesture, not a click
    Ignored,
    /// The fetch finished after a reload or a newer click and was dropped
    Stale,
}

#[derive(Debug)]
struct ViewerState {
    session: Option<ModelSession>,
    index: Option<CategoryIndex>,
    selection: FilterSelection,
    visibility: VisibilityEngine,
    section: SectionController,
    picking: PickResolver,
    bounds: BoundsTracker,
    status: ViewerStatus,
    panel: MetadataPanel,
    /// Disabled categories waiting for the next load
    pending_filters: Vec<String>,
}

/// Clears the in-flight flag on every exit path of a load
struct LoadGuard<'a>(&'a Cell<bool>);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Coordinates model loading, category filters, the section plane and
/// click-to-inspect for a single viewer
pub struct SessionCoordinator {
    service: Rc<dyn ModelService>,
    renderer: Rc<dyn SceneRenderer>,
    settings: ViewerSettings,
    state: RefCell<ViewerState>,
    generation: Cell<u64>,
    pick_sequence: Cell<u64>,
    loading: Cell<bool>,
}

impl SessionCoordinator {
    pub fn new(
        service: Rc<dyn ModelService>,
        renderer: Rc<dyn SceneRenderer>,
        settings: ViewerSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let state = ViewerState {
            session: None,
            index: None,
            selection: FilterSelection::default(),
            visibility: VisibilityEngine::new(settings.subset_tag.clone()),
            section: SectionController::default(),
            picking: PickResolver::new(settings.drag_threshold_px),
            bounds: BoundsTracker::default(),
            status: ViewerStatus::Ready,
            panel: MetadataPanel::Placeholder,
            pending_filters: Vec::new(),
        };
        Ok(Self {
            service,
            renderer,
            settings,
            state: RefCell::new(state),
            generation: Cell::new(0),
            pick_sequence: Cell::new(0),
            loading: Cell::new(false),
        })
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Replace the current model with the one in `file`
    ///
    /// Category enumeration and subset failures are recovered from and only
    /// logged. A rejected file leaves no model loaded.
    pub async fn load_model(&self, file: &ModelFile) -> Result<ModelSession> {
        if self.loading.replace(true) {
            log::warn!(
                "[Session] Load of {} refused, another load is running",
                file.name
            );
            self.state.borrow_mut().status = ViewerStatus::Busy;
            return Err(ViewerError::LoadInProgress);
        }
        let _guard = LoadGuard(&self.loading);

        let generation = self.next_generation();
        {
            let mut state = self.state.borrow_mut();
            self.dispose(&mut state);
            state.status = ViewerStatus::Loading {
                file: file.name.clone(),
            };
        }
        log::info!("[Session] Loading {} ({} bytes)", file.name, file.bytes.len());

        let loaded = match self.service.load_model(file).await {
            Ok(loaded) => loaded,
            Err(e) => {
                let error = ViewerError::load_failed(&file.name, e);
                log::error!("[Session] {}", error);
                self.state.borrow_mut().status = ViewerStatus::LoadFailed {
                    file: file.name.clone(),
                };
                return Err(error);
            }
        };
        self.renderer.add_renderable(loaded.renderable);
        let bounds = self
            .state
            .borrow_mut()
            .bounds
            .update(&*self.renderer, loaded.renderable);

        let index = match CategoryIndex::build(&*self.service, loaded.handle).await {
            Ok(index) => Some(index),
            Err(e) => {
                log::warn!("[Session] {}, filters disabled", e);
                None
            }
        };

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let session = ModelSession {
            generation,
            file_name: file.name.clone(),
            model: loaded.handle,
            renderable: loaded.renderable,
            elements: index
                .as_ref()
                .map(CategoryIndex::all_elements)
                .unwrap_or_default(),
            bounds,
        };

        state.selection = index
            .as_ref()
            .map(FilterSelection::all_enabled)
            .unwrap_or_default();
        let pending = std::mem::take(&mut state.pending_filters);
        if let Some(index) = index.as_ref() {
            disable_known(&mut state.selection, index, &pending);
        }
        state.visibility.recompute(
            index.as_ref(),
            &state.selection,
            &session,
            &*self.service,
            &*self.renderer,
        );

        if let Err(e) = state.section.reapply(bounds.as_ref(), &*self.renderer) {
            log::warn!("[Session] Section not reapplied: {}", e);
        }

        if let Some(bounds) = bounds {
            let fit = fit_to_bounds(
                &bounds,
                self.settings.camera_fov_deg,
                self.settings.fit_margin,
            );
            self.renderer.fit_camera(&fit);
        }

        let categories = index.as_ref().map_or(0, CategoryIndex::len);
        state.status = ViewerStatus::Loaded {
            file: file.name.clone(),
            elements: session.elements.len(),
            categories,
            filters_available: categories > 0,
        };
        state.index = index;
        state.session = Some(session.clone());

        log::info!(
            "[Session] Loaded {} as {}: {} elements, {} categories",
            session.file_name,
            session.model,
            session.elements.len(),
            categories
        );
        Ok(session)
    }

    /// Dispose the current model
    ///
    /// The section intent is kept for the next model.
    pub fn unload(&self) -> Result<()> {
        if self.loading.get() {
            self.state.borrow_mut().status = ViewerStatus::Busy;
            return Err(ViewerError::LoadInProgress);
        }
        self.next_generation();
        let mut state = self.state.borrow_mut();
        self.dispose(&mut state);
        state.status = ViewerStatus::Unloaded;
        Ok(())
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn dispose(&self, state: &mut ViewerState) {
        state.visibility.retire(&*self.service, &*self.renderer);
        if let Some(session) = state.session.take() {
            self.renderer.remove_renderable(session.renderable);
            self.service.close_model(session.model);
            log::info!("[Session] Disposed {} ({})", session.file_name, session.model);
        }
        state.section.suspend(&*self.renderer);
        state.index = None;
        state.selection.clear();
        state.bounds.clear();
        state.panel = MetadataPanel::Placeholder;
    }

    /// Enable or disable one category
    ///
    /// Returns the new visibility, or `None` if the toggle changed nothing.
    pub fn set_category_enabled(
        &self,
        category: &str,
        enabled: bool,
    ) -> Result<Option<VisibilityOutcome>> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.session.is_none() {
            return Err(ViewerError::NoModelLoaded);
        }
        if !state.selection.set(category, enabled)? {
            return Ok(None);
        }
        Ok(self.recompute(state))
    }

    /// Enable or disable every category in one recomputation
    pub fn set_all_categories(&self, enabled: bool) -> Result<Option<VisibilityOutcome>> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.session.is_none() {
            return Err(ViewerError::NoModelLoaded);
        }
        if !state.selection.set_all(enabled) {
            return Ok(None);
        }
        Ok(self.recompute(state))
    }

    fn recompute(&self, state: &mut ViewerState) -> Option<VisibilityOutcome> {
        let session = state.session.as_ref()?;
        Some(state.visibility.recompute(
            state.index.as_ref(),
            &state.selection,
            session,
            &*self.service,
            &*self.renderer,
        ))
    }

    /// `(category, element count, enabled)` sorted by category name
    pub fn categories(&self) -> Vec<(String, usize, bool)> {
        let state = self.state.borrow();
        let Some(index) = state.index.as_ref() else {
            return Vec::new();
        };
        index
            .categories()
            .map(|(name, ids)| (name.to_string(), ids.len(), state.selection.is_enabled(name)))
            .collect()
    }

    /// Whether category toggles can be offered
    pub fn filters_available(&self) -> bool {
        self.state
            .borrow()
            .index
            .as_ref()
            .is_some_and(|index| !index.is_empty())
    }

    /// Current visible/hidden partition
    pub fn visible_set(&self) -> Option<VisibleSet> {
        let state = self.state.borrow();
        let session = state.session.as_ref()?;
        Some(match state.index.as_ref() {
            Some(index) => VisibleSet::partition(index, &state.selection, &session.elements),
            None => VisibleSet::everything(&session.elements),
        })
    }

    /// Switch sectioning on at `axis`/`offset`
    pub fn apply_section(&self, axis: Axis, offset: f64) -> Result<ClipPlane> {
        let mut state = self.state.borrow_mut();
        let bounds = state.bounds.get();
        state
            .section
            .apply(axis, offset, bounds.as_ref(), &*self.renderer)
    }

    pub fn set_section_axis(&self, axis: Axis) -> Result<Option<ClipPlane>> {
        let mut state = self.state.borrow_mut();
        let bounds = state.bounds.get();
        state.section.set_axis(axis, bounds.as_ref(), &*self.renderer)
    }

    pub fn set_section_offset(&self, offset: f64) -> Result<Option<ClipPlane>> {
        let mut state = self.state.borrow_mut();
        let bounds = state.bounds.get();
        state
            .section
            .set_offset(offset, bounds.as_ref(), &*self.renderer)
    }

    pub fn clear_section(&self) {
        self.state.borrow_mut().section.clear(&*self.renderer);
    }

    pub fn section_state(&self) -> SectionState {
        self.state.borrow().section.state()
    }

    pub fn pointer_down(&self, point: Point2<f64>) {
        self.state.borrow_mut().picking.on_pointer_down(point);
    }

    /// Finish a pointer gesture and inspect the clicked element
    ///
    /// The attribute fetch result is only shown if no reload and no newer
    /// click happened while it was running.
    pub async fn pointer_up(&self, point: Point2<f64>) -> Result<PickOutcome> {
        let (generation, sequence, element, category) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let target = state.visibility.pick_target();
            let result = state.picking.on_pointer_up(
                point,
                target,
                state.session.as_ref(),
                &*self.service,
                &*self.renderer,
            );
            match result {
                PickResult::Ignored => return Ok(PickOutcome::Ignored),
                PickResult::NothingSelected => {
                    // supersedes any fetch still running for an earlier click
                    self.pick_sequence.set(self.pick_sequence.get() + 1);
                    state.panel = MetadataPanel::nothing_selected();
                    return Ok(PickOutcome::NothingSelected);
                }
                PickResult::Element(element) => {
                    let category = state
                        .index
                        .as_ref()
                        .and_then(|index| index.category_of(element.element))
                        .map(str::to_string);
                    let sequence = self.pick_sequence.get() + 1;
                    self.pick_sequence.set(sequence);
                    (self.generation.get(), sequence, element, category)
                }
            }
        };

        let reply = self
            .service
            .element_attributes(element.model, element.element)
            .await;

        if self.generation.get() != generation || self.pick_sequence.get() != sequence {
            log::debug!("[Session] Dropping stale attributes of {}", element.element);
            return Ok(PickOutcome::Stale);
        }

        let mut state = self.state.borrow_mut();
        match reply {
            Ok(attributes) => {
                state.panel = MetadataPanel::Element {
                    model: element.model,
                    element: element.element,
                    category,
                    attributes: attributes.clone(),
                };
                Ok(PickOutcome::Selected {
                    element,
                    attributes,
                })
            }
            Err(source) => {
                let error = ViewerError::MetadataFetch {
                    element: element.element,
                    source,
                };
                log::warn!("[Session] {}", error);
                state.panel = MetadataPanel::Message(error.to_string());
                Err(error)
            }
        }
    }

    /// User intent worth persisting
    pub fn snapshot(&self) -> ViewerSnapshot {
        let state = self.state.borrow();
        ViewerSnapshot {
            section: Some(state.section.state().into()),
            disabled_categories: state.selection.disabled().map(str::to_string).collect(),
        }
    }

    /// Adopt the disabled categories of a snapshot
    ///
    /// Applied right away when a model is loaded, otherwise after the next
    /// load. Categories the model does not have are skipped.
    pub fn restore_filters(&self, snapshot: &ViewerSnapshot) -> Option<VisibilityOutcome> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.session.is_none() {
            state.pending_filters = snapshot.disabled_categories.clone();
            return None;
        }
        let index = state.index.as_ref()?;
        state.selection.set_all(true);
        disable_known(&mut state.selection, index, &snapshot.disabled_categories);
        self.recompute(state)
    }

    /// Adopt a stored section intent
    ///
    /// Applied right away when a model is loaded, otherwise on the next load.
    pub fn restore_section(&self, storage: SectionStorage) -> Result<Option<ClipPlane>> {
        let restored = SectionState::try_from(storage)?;
        let mut state = self.state.borrow_mut();
        let bounds = state.bounds.get();
        if !restored.active {
            state.section.clear(&*self.renderer);
        }
        state.section = SectionController::new(restored);
        match bounds {
            Some(bounds) => state.section.reapply(Some(&bounds), &*self.renderer),
            None => Ok(None),
        }
    }

    pub fn status(&self) -> ViewerStatus {
        self.state.borrow().status.clone()
    }

    pub fn panel(&self) -> MetadataPanel {
        self.state.borrow().panel.clone()
    }

    pub fn session(&self) -> Option<ModelSession> {
        self.state.borrow().session.clone()
    }

    pub fn pick_target(&self) -> Option<PickTarget> {
        self.state.borrow().visibility.pick_target()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }
}

fn disable_known(selection: &mut FilterSelection, index: &CategoryIndex, names: &[String]) {
    for name in names {
        let category = normalize_category(name);
        if index.contains(&category) {
            // known category, cannot fail
            let _ = selection.set(&category, false);
        } else {
            log::debug!("[Session] Skipping stored filter for missing {}", category);
        }
    }
}
