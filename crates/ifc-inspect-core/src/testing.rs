// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory collaborators for unit tests
//!
//! [`FakeBackend`] implements both [`ModelService`] and [`SceneRenderer`] over
//! shared state, so tests can inspect exactly which renderables ended up in
//! the scene, which were hidden, and what clip planes were applied.

use futures_util::future::LocalBoxFuture;
use ifc_inspect_model::{
    Aabb, CameraFit, ClipPlane, ElementAttributes, ElementId, LoadedModel, ModelFile,
    ModelHandle, ModelService, RayHit, RenderableId, Result, SceneRenderer, ServiceError,
    SubsetRequest,
};
use nalgebra::{Point2, Point3};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::oneshot;

/// Reply of the fake category query for one element
#[derive(Clone, Debug)]
pub enum CategoryReply {
    Type(&'static str),
    Fails,
}

/// Contents of a fake model file
#[derive(Clone, Debug)]
pub struct FakeModelSpec {
    pub elements: Vec<(u32, CategoryReply)>,
    pub bounds: Option<Aabb>,
    pub fail_enumeration: bool,
}

impl FakeModelSpec {
    /// Small building: three walls, two doors (mixed casing), one slab,
    /// one element with an empty type and one whose query fails
    pub fn house() -> Self {
        use CategoryReply::*;
        Self {
            elements: vec![
                (1, Type("IFCWALL")),
                (2, Type("IFCWALL")),
                (3, Type("IfcWall")),
                (4, Type("IFCDOOR")),
                (5, Type("ifcdoor")),
                (6, Type("IFCSLAB")),
                (7, Type("")),
                (8, Fails),
            ],
            bounds: Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 4.0, 20.0)),
            fail_enumeration: false,
        }
    }

    /// Second model with different categories and bounds
    pub fn shed() -> Self {
        use CategoryReply::*;
        Self {
            elements: vec![(100, Type("IFCROOF")), (101, Type("IFCCOLUMN"))],
            bounds: Aabb::new(Point3::new(-2.0, -1.0, -3.0), Point3::new(2.0, 1.0, 3.0)),
            fail_enumeration: false,
        }
    }
}

/// Scripted result of the next ray casts
#[derive(Clone, Copy, Debug)]
pub struct PickScript {
    pub face_index: Option<u32>,
    pub raw_id: Option<i64>,
}

#[derive(Clone, Debug)]
struct OpenModel {
    spec: FakeModelSpec,
    name: String,
}

/// Fake parsing service and scene graph
#[derive(Default)]
pub struct FakeBackend {
    files: RefCell<FxHashMap<String, FakeModelSpec>>,
    models: RefCell<FxHashMap<ModelHandle, OpenModel>>,
    next_handle: Cell<u32>,
    next_renderable: Cell<u64>,

    owners: RefCell<FxHashMap<RenderableId, ModelHandle>>,
    bounds: RefCell<FxHashMap<RenderableId, Aabb>>,
    scene: RefCell<Vec<RenderableId>>,
    hidden: RefCell<FxHashSet<RenderableId>>,

    subsets: RefCell<FxHashMap<(ModelHandle, String), RenderableId>>,
    subset_members: RefCell<FxHashMap<RenderableId, Vec<ElementId>>>,
    pub fail_subsets: Cell<bool>,

    pick: Cell<Option<PickScript>>,
    raycast_targets: RefCell<Vec<RenderableId>>,

    load_gate: RefCell<Option<oneshot::Receiver<()>>>,
    attribute_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub fail_attributes: Cell<bool>,

    clip_planes: RefCell<Vec<ClipPlane>>,
    camera_fits: RefCell<Vec<CameraFit>>,
    closed: RefCell<Vec<ModelHandle>>,
}

impl FakeBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register a file the fake parser can open
    pub fn add_file(&self, name: &str, spec: FakeModelSpec) {
        self.files.borrow_mut().insert(name.to_string(), spec);
    }

    pub fn script_pick(&self, script: Option<PickScript>) {
        self.pick.set(script);
    }

    /// Make the next model load wait until the returned sender fires
    pub fn hold_next_load(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.load_gate.borrow_mut() = Some(rx);
        tx
    }

    /// Make the next attribute fetch wait until the returned sender fires
    pub fn hold_next_attribute_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.attribute_gate.borrow_mut() = Some(rx);
        tx
    }

    fn allocate_renderable(&self, owner: ModelHandle) -> RenderableId {
        let id = RenderableId(self.next_renderable.get() + 1);
        self.next_renderable.set(id.0);
        self.owners.borrow_mut().insert(id, owner);
        id
    }

    /// Renderables currently in the scene, in insertion order
    pub fn scene(&self) -> Vec<RenderableId> {
        self.scene.borrow().clone()
    }

    /// Renderables in the scene that are not hidden
    pub fn visible(&self) -> Vec<RenderableId> {
        let hidden = self.hidden.borrow();
        self.scene
            .borrow()
            .iter()
            .copied()
            .filter(|id| !hidden.contains(id))
            .collect()
    }

    pub fn in_scene(&self, id: RenderableId) -> bool {
        self.scene.borrow().contains(&id)
    }

    pub fn is_shown(&self, id: RenderableId) -> bool {
        self.in_scene(id) && !self.hidden.borrow().contains(&id)
    }

    /// Scene renderables that belong to `model`
    pub fn scene_renderables_of(&self, model: ModelHandle) -> Vec<RenderableId> {
        let owners = self.owners.borrow();
        self.scene
            .borrow()
            .iter()
            .copied()
            .filter(|id| owners.get(id) == Some(&model))
            .collect()
    }

    /// Scene renderables that are filtered subsets
    pub fn scene_subsets(&self) -> Vec<RenderableId> {
        let members = self.subset_members.borrow();
        self.scene
            .borrow()
            .iter()
            .copied()
            .filter(|id| members.contains_key(id))
            .collect()
    }

    pub fn subset_members(&self, id: RenderableId) -> Option<Vec<ElementId>> {
        self.subset_members.borrow().get(&id).cloned()
    }

    pub fn live_subset_count(&self) -> usize {
        self.subsets.borrow().len()
    }

    pub fn clip_planes(&self) -> Vec<ClipPlane> {
        self.clip_planes.borrow().clone()
    }

    pub fn camera_fits(&self) -> Vec<CameraFit> {
        self.camera_fits.borrow().clone()
    }

    pub fn closed_models(&self) -> Vec<ModelHandle> {
        self.closed.borrow().clone()
    }

    pub fn raycast_targets(&self) -> Vec<RenderableId> {
        self.raycast_targets.borrow().clone()
    }

    fn spec_of(&self, model: ModelHandle) -> Option<FakeModelSpec> {
        self.models.borrow().get(&model).map(|m| m.spec.clone())
    }
}

impl ModelService for FakeBackend {
    fn load_model<'a>(&'a self, file: &'a ModelFile) -> LocalBoxFuture<'a, Result<LoadedModel>> {
        let spec = self.files.borrow().get(&file.name).cloned();
        let result = match spec {
            Some(spec) => {
                let handle = ModelHandle(self.next_handle.get() + 1);
                self.next_handle.set(handle.0);
                let renderable = self.allocate_renderable(handle);
                if let Some(bounds) = spec.bounds {
                    self.bounds.borrow_mut().insert(renderable, bounds);
                }
                self.models.borrow_mut().insert(
                    handle,
                    OpenModel {
                        spec,
                        name: file.name.clone(),
                    },
                );
                Ok(LoadedModel { handle, renderable })
            }
            None => Err(ServiceError::load(format!("{} is not a valid IFC file", file.name))),
        };
        let gate = self.load_gate.borrow_mut().take();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        })
    }

    fn close_model(&self, model: ModelHandle) {
        self.models.borrow_mut().remove(&model);
        self.subsets.borrow_mut().retain(|(m, _), _| *m != model);
        self.closed.borrow_mut().push(model);
    }

    fn all_element_ids(&self, model: ModelHandle) -> LocalBoxFuture<'_, Result<Vec<ElementId>>> {
        let result = match self.spec_of(model) {
            Some(spec) if spec.fail_enumeration => {
                Err(ServiceError::enumerate("element table is corrupt"))
            }
            Some(spec) => Ok(spec.elements.iter().map(|(id, _)| ElementId(*id)).collect()),
            None => Err(ServiceError::other(format!("{model} is closed"))),
        };
        Box::pin(std::future::ready(result))
    }

    fn element_category(
        &self,
        model: ModelHandle,
        id: ElementId,
    ) -> LocalBoxFuture<'_, Result<String>> {
        let reply = self
            .spec_of(model)
            .and_then(|spec| spec.elements.into_iter().find(|(e, _)| *e == id.0))
            .map(|(_, reply)| reply);
        let result = match reply {
            Some(CategoryReply::Type(name)) => Ok(name.to_string()),
            _ => Err(ServiceError::query(id, "no type information")),
        };
        Box::pin(std::future::ready(result))
    }

    fn element_attributes(
        &self,
        model: ModelHandle,
        id: ElementId,
    ) -> LocalBoxFuture<'_, Result<ElementAttributes>> {
        let gate = self.attribute_gate.borrow_mut().take();
        let name = self.models.borrow().get(&model).map(|m| m.name.clone());
        let result = match name {
            Some(_) if self.fail_attributes.get() => {
                Err(ServiceError::query(id, "property table unreadable"))
            }
            Some(file) => Ok(json!({
                "expressID": id.0,
                "Name": format!("Element {}", id.0),
                "file": file,
            })),
            None => Err(ServiceError::query(id, "model closed")),
        };
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        })
    }

    fn element_at(&self, _model: ModelHandle, _hit: &RayHit) -> Option<i64> {
        self.pick.get().and_then(|p| p.raw_id)
    }

    fn create_subset(&self, request: &SubsetRequest) -> Result<RenderableId> {
        if self.fail_subsets.get() {
            return Err(ServiceError::subset("out of GPU memory"));
        }
        let id = self.allocate_renderable(request.model);
        self.subsets
            .borrow_mut()
            .insert((request.model, request.tag.clone()), id);
        self.subset_members
            .borrow_mut()
            .insert(id, request.ids.clone());
        Ok(id)
    }

    fn remove_subset(&self, model: ModelHandle, tag: &str) {
        self.subsets.borrow_mut().remove(&(model, tag.to_string()));
    }
}

impl SceneRenderer for FakeBackend {
    fn add_renderable(&self, id: RenderableId) {
        let mut scene = self.scene.borrow_mut();
        if !scene.contains(&id) {
            scene.push(id);
        }
    }

    fn remove_renderable(&self, id: RenderableId) {
        self.scene.borrow_mut().retain(|r| *r != id);
        self.hidden.borrow_mut().remove(&id);
    }

    fn set_visible(&self, id: RenderableId, visible: bool) {
        if visible {
            self.hidden.borrow_mut().remove(&id);
        } else {
            self.hidden.borrow_mut().insert(id);
        }
    }

    fn bounding_box(&self, id: RenderableId) -> Option<Aabb> {
        self.bounds.borrow().get(&id).copied()
    }

    fn raycast(&self, _point: Point2<f64>, target: RenderableId) -> Option<RayHit> {
        self.raycast_targets.borrow_mut().push(target);
        if !self.is_shown(target) {
            return None;
        }
        self.pick.get().map(|script| RayHit {
            renderable: target,
            distance: 5.0,
            point: Point3::new(1.0, 1.0, 1.0),
            face_index: script.face_index,
        })
    }

    fn set_clip_planes(&self, planes: &[ClipPlane]) {
        *self.clip_planes.borrow_mut() = planes.to_vec();
    }

    fn fit_camera(&self, fit: &CameraFit) {
        self.camera_fits.borrow_mut().push(*fit);
    }
}
