// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability interfaces of the viewer's collaborators
//!
//! The viewer core only ever reaches the parser and the scene graph through
//! these traits, which keeps ownership of renderables in a few well-known
//! places and makes the core testable with in-memory fakes.

use crate::{
    Aabb, CameraFit, ClipPlane, ElementAttributes, ElementId, LoadedModel, ModelFile,
    ModelHandle, RayHit, RenderableId, Result, SubsetRequest,
};
use futures_util::future::LocalBoxFuture;
use nalgebra::Point2;

/// Parsing and query service
///
/// Wraps the component that turns a model file into a navigable element
/// graph with geometry. All methods take `&self`; implementations that need
/// mutation use interior mutability, since several calls (an attribute fetch
/// and a model load, say) may be suspended at the same time.
///
/// # Example
///
/// ```ignore
/// use ifc_inspect_model::ModelService;
///
/// async fn print_categories(service: &dyn ModelService, model: ModelHandle) -> Result<()> {
///     for id in service.all_element_ids(model).await? {
///         let category = service.element_category(model, id).await?;
///         println!("{id}: {category}");
///     }
///     Ok(())
/// }
/// ```
pub trait ModelService {
    /// Parse a model file and build its full-model renderable
    ///
    /// The renderable is returned detached; the caller adds it to the scene.
    fn load_model<'a>(&'a self, file: &'a ModelFile) -> LocalBoxFuture<'a, Result<LoadedModel>>;

    /// Release all resources (geometry, subsets, caches) held for a model
    fn close_model(&self, model: ModelHandle);

    /// Enumerate every element identifier of a model
    fn all_element_ids(&self, model: ModelHandle) -> LocalBoxFuture<'_, Result<Vec<ElementId>>>;

    /// Query the most specific type name of an element (e.g. "IFCWALL")
    ///
    /// Casing is not guaranteed; an empty string means the type is unknown.
    fn element_category(
        &self,
        model: ModelHandle,
        id: ElementId,
    ) -> LocalBoxFuture<'_, Result<String>>;

    /// Fetch the full attribute set of an element
    fn element_attributes(
        &self,
        model: ModelHandle,
        id: ElementId,
    ) -> LocalBoxFuture<'_, Result<ElementAttributes>>;

    /// Map a ray hit back to the raw identifier of the element that owns
    /// the hit primitive
    ///
    /// Returns `None` or a negative value when no element owns it.
    fn element_at(&self, model: ModelHandle, hit: &RayHit) -> Option<i64>;

    /// Create or replace the filtered subset keyed by `(model, tag)`
    ///
    /// The returned renderable is detached; the caller owns its place in the
    /// scene. Any renderable returned for the same key earlier is invalid
    /// after this call.
    fn create_subset(&self, request: &SubsetRequest) -> Result<RenderableId>;

    /// Release the subset keyed by `(model, tag)`, if any
    fn remove_subset(&self, model: ModelHandle, tag: &str);
}

/// Rendering / scene-graph service
pub trait SceneRenderer {
    /// Add a renderable to the scene
    fn add_renderable(&self, id: RenderableId);

    /// Remove a renderable from the scene
    fn remove_renderable(&self, id: RenderableId);

    /// Show or hide a renderable without removing it
    fn set_visible(&self, id: RenderableId, visible: bool);

    /// World-space bounds of a renderable, `None` if it has no geometry
    fn bounding_box(&self, id: RenderableId) -> Option<Aabb>;

    /// Cast a ray from a viewport point (pixels) through the camera and
    /// return the nearest hit on `target`
    fn raycast(&self, point: Point2<f64>, target: RenderableId) -> Option<RayHit>;

    /// Replace the active clipping planes (an empty slice clears them)
    fn set_clip_planes(&self, planes: &[ClipPlane]);

    /// Move the camera and orbit target
    fn fit_camera(&self, fit: &CameraFit);
}
