// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section plane
//!
//! Cuts the model with a single clipping plane perpendicular to one of the
//! principal axes. The offset slider runs from -100 (plane at the low end of
//! the model) to 100 (plane at the high end). The plane normal points toward
//! the low end, so everything below the plane stays visible.

use crate::{Result, ViewerError};
use ifc_inspect_model::{Aabb, Axis, ClipPlane, SceneRenderer};
use serde::{Deserialize, Serialize};

/// Lowest slider value
pub const OFFSET_MIN: f64 = -100.0;
/// Highest slider value
pub const OFFSET_MAX: f64 = 100.0;

/// User's section intent; survives model reloads
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionState {
    pub axis: Axis,
    /// Percentage in [-100, 100]
    pub offset: f64,
    pub active: bool,
}

impl Default for SectionState {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            offset: 0.0,
            active: false,
        }
    }
}

/// Clamp a slider value; NaN counts as the center
pub fn clamp_offset(offset: f64) -> f64 {
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(OFFSET_MIN, OFFSET_MAX)
    }
}

/// Plane for `axis`/`offset` through `bounds`
///
/// The plane point lies at the box center on the two other axes and is
/// interpolated between `min` and `max` on `axis`.
pub fn section_plane(axis: Axis, offset: f64, bounds: &Aabb) -> ClipPlane {
    let t = (clamp_offset(offset) - OFFSET_MIN) / (OFFSET_MAX - OFFSET_MIN);
    let (lo, hi) = bounds.axis_range(axis);
    let mut point = bounds.center();
    point[axis.index()] = lo + (hi - lo) * t;
    ClipPlane::from_point_normal(point, -axis.unit())
}

/// Owns the renderer's clip-plane list
#[derive(Clone, Debug, Default)]
pub struct SectionController {
    state: SectionState,
    plane: Option<ClipPlane>,
}

impl SectionController {
    pub fn new(state: SectionState) -> Self {
        Self {
            state: SectionState {
                offset: clamp_offset(state.offset),
                ..state
            },
            plane: None,
        }
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Plane currently handed to the renderer
    pub fn plane(&self) -> Option<ClipPlane> {
        self.plane
    }

    /// Cut the model at `axis`/`offset` and switch sectioning on
    ///
    /// Without bounds nothing is applied and the previous clip state stays as
    /// it was; the requested axis and offset are still remembered.
    pub fn apply(
        &mut self,
        axis: Axis,
        offset: f64,
        bounds: Option<&Aabb>,
        renderer: &dyn SceneRenderer,
    ) -> Result<ClipPlane> {
        self.state.axis = axis;
        self.state.offset = clamp_offset(offset);

        let Some(bounds) = bounds else {
            log::warn!("[Section] Cannot apply section: no model loaded");
            return Err(ViewerError::NoModelLoaded);
        };

        let plane = section_plane(self.state.axis, self.state.offset, bounds);
        self.state.active = true;
        self.plane = Some(plane);
        renderer.set_clip_planes(&[plane]);
        log::debug!(
            "[Section] Clipping at {} = {:.3} ({:+.0}%)",
            axis,
            plane.point[axis.index()],
            self.state.offset
        );
        Ok(plane)
    }

    /// Re-apply the stored intent, e.g. after new bounds arrived
    ///
    /// Returns `Ok(None)` when sectioning is off.
    pub fn reapply(
        &mut self,
        bounds: Option<&Aabb>,
        renderer: &dyn SceneRenderer,
    ) -> Result<Option<ClipPlane>> {
        if !self.state.active {
            return Ok(None);
        }
        self.apply(self.state.axis, self.state.offset, bounds, renderer)
            .map(Some)
    }

    /// Change the axis; recomputes the plane when active
    pub fn set_axis(
        &mut self,
        axis: Axis,
        bounds: Option<&Aabb>,
        renderer: &dyn SceneRenderer,
    ) -> Result<Option<ClipPlane>> {
        self.state.axis = axis;
        self.reapply(bounds, renderer)
    }

    /// Change the offset; recomputes the plane when active
    pub fn set_offset(
        &mut self,
        offset: f64,
        bounds: Option<&Aabb>,
        renderer: &dyn SceneRenderer,
    ) -> Result<Option<ClipPlane>> {
        self.state.offset = clamp_offset(offset);
        self.reapply(bounds, renderer)
    }

    /// Switch sectioning off and remove all clip planes
    ///
    /// Axis and offset are kept for the next apply.
    pub fn clear(&mut self, renderer: &dyn SceneRenderer) {
        self.state.active = false;
        self.plane = None;
        renderer.set_clip_planes(&[]);
    }

    /// Remove the clip planes from the renderer but keep sectioning on, so
    /// the next model is cut the same way
    pub fn suspend(&mut self, renderer: &dyn SceneRenderer) {
        if self.plane.take().is_some() {
            renderer.set_clip_planes(&[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn bounds() -> Aabb {
        Aabb::new(Point3::new(-10.0, 0.0, 2.0), Point3::new(10.0, 6.0, 4.0)).unwrap()
    }

    #[test]
    fn test_offset_maps_linearly_across_bounds() {
        let b = bounds();
        for axis in Axis::ALL {
            let (lo, hi) = b.axis_range(axis);
            let i = axis.index();
            assert_relative_eq!(section_plane(axis, -100.0, &b).point[i], lo);
            assert_relative_eq!(section_plane(axis, 100.0, &b).point[i], hi);
            assert_relative_eq!(section_plane(axis, 0.0, &b).point[i], b.center()[i]);
            assert_relative_eq!(section_plane(axis, 50.0, &b).point[i], lo + (hi - lo) * 0.75);
        }
    }

    #[test]
    fn test_plane_point_centered_on_other_axes() {
        let b = bounds();
        let plane = section_plane(Axis::X, 80.0, &b);
        assert_relative_eq!(plane.point.y, 3.0);
        assert_relative_eq!(plane.point.z, 3.0);
    }

    #[test]
    fn test_normal_points_to_negative_axis() {
        let b = bounds();
        let plane = section_plane(Axis::Y, 0.0, &b);
        assert_eq!(plane.normal, -Vector3::y());
        // the lower half stays visible
        assert!(plane.is_visible(&Point3::new(0.0, 1.0, 3.0)));
        assert!(!plane.is_visible(&Point3::new(0.0, 5.0, 3.0)));
    }

    #[test]
    fn test_offset_is_clamped() {
        let b = bounds();
        assert_eq!(section_plane(Axis::Z, 250.0, &b), section_plane(Axis::Z, 100.0, &b));
        assert_eq!(section_plane(Axis::Z, -1e9, &b), section_plane(Axis::Z, -100.0, &b));
        assert_eq!(section_plane(Axis::Z, f64::NAN, &b), section_plane(Axis::Z, 0.0, &b));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let backend = FakeBackend::new();
        let mut section = SectionController::default();
        let b = bounds();

        let first = section.apply(Axis::X, 30.0, Some(&b), &*backend).unwrap();
        let second = section.apply(Axis::X, 30.0, Some(&b), &*backend).unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.clip_planes(), vec![second]);
    }

    #[test]
    fn test_apply_without_bounds_keeps_previous_state() {
        let backend = FakeBackend::new();
        let mut section = SectionController::default();

        // refuses to switch on before a model exists
        assert!(matches!(
            section.apply(Axis::Z, 10.0, None, &*backend),
            Err(ViewerError::NoModelLoaded)
        ));
        assert!(!section.is_active());
        assert!(backend.clip_planes().is_empty());

        // an active section is not dropped by a bounds-less apply
        let b = bounds();
        let plane = section.apply(Axis::Y, 0.0, Some(&b), &*backend).unwrap();
        assert!(section.apply(Axis::X, 50.0, None, &*backend).is_err());
        assert!(section.is_active());
        assert_eq!(section.plane(), Some(plane));
        assert_eq!(backend.clip_planes(), vec![plane]);
        assert_eq!(section.state().axis, Axis::X);
    }

    #[test]
    fn test_changes_while_active_recompute_plane() {
        let backend = FakeBackend::new();
        let mut section = SectionController::default();
        let b = bounds();
        section.apply(Axis::Y, 0.0, Some(&b), &*backend).unwrap();

        let moved = section.set_offset(100.0, Some(&b), &*backend).unwrap().unwrap();
        assert_relative_eq!(moved.point.y, 6.0);
        let turned = section.set_axis(Axis::X, Some(&b), &*backend).unwrap().unwrap();
        assert_relative_eq!(turned.point.x, 10.0);
        assert_eq!(backend.clip_planes(), vec![turned]);
        assert!(section.is_active());
    }

    #[test]
    fn test_changes_while_inactive_only_store_intent() {
        let backend = FakeBackend::new();
        let mut section = SectionController::default();
        let b = bounds();

        assert_eq!(section.set_axis(Axis::Z, Some(&b), &*backend).unwrap(), None);
        assert_eq!(section.set_offset(-40.0, Some(&b), &*backend).unwrap(), None);
        assert!(backend.clip_planes().is_empty());
        assert_eq!(section.state().axis, Axis::Z);
        assert_eq!(section.state().offset, -40.0);
    }

    #[test]
    fn test_clear_keeps_axis_and_offset() {
        let backend = FakeBackend::new();
        let mut section = SectionController::default();
        let b = bounds();
        section.apply(Axis::Z, -25.0, Some(&b), &*backend).unwrap();

        section.clear(&*backend);
        assert!(!section.is_active());
        assert!(section.plane().is_none());
        assert!(backend.clip_planes().is_empty());
        assert_eq!(section.state().axis, Axis::Z);
        assert_eq!(section.state().offset, -25.0);
    }
}
