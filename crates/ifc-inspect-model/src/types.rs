// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared value types exchanged with collaborators

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe element identifier
///
/// Wraps the express ID the parsing service reports for an element
/// (e.g., #123 becomes ElementId(123)).
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Convert a raw identifier reported by a geometry lookup
    ///
    /// Lookups report `-1` (or other negative values) when a primitive has
    /// no owning element; those map to `None`, as do values that do not fit.
    pub fn from_raw(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(ElementId)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        ElementId(id)
    }
}

impl From<ElementId> for u32 {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

/// Opaque handle of a model opened by the parsing service
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ModelHandle(pub u32);

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model {}", self.0)
    }
}

/// Handle of a renderable object in the scene graph
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RenderableId(pub u64);

/// Principal axis
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2)
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector pointing along the positive direction of the axis
    pub fn unit(&self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Parse from string ("x", "Y", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a box from its corners
    ///
    /// Returns `None` for non-finite coordinates or when `min` exceeds `max`
    /// on any axis (the "empty box" a renderer reports for a model without
    /// geometry).
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Option<Self> {
        let finite = min.iter().chain(max.iter()).all(|v| v.is_finite());
        let ordered = Axis::ALL.iter().all(|a| min[a.index()] <= max[a.index()]);
        (finite && ordered).then_some(Self { min, max })
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f64 {
        self.size().max()
    }

    /// `(min, max)` extent along one axis
    pub fn axis_range(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }
}

/// Clipping plane: points with `normal · p + constant >= 0` stay visible
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlane {
    pub normal: Vector3<f64>,
    /// Point the plane was constructed through
    pub point: Point3<f64>,
    pub constant: f64,
}

impl ClipPlane {
    pub fn from_point_normal(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            point,
            constant: -normal.dot(&point.coords),
        }
    }

    /// Signed distance of `p` from the plane (positive side is kept)
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) + self.constant
    }

    pub fn is_visible(&self, p: &Point3<f64>) -> bool {
        self.signed_distance(p) >= 0.0
    }
}

/// Nearest intersection returned by a ray cast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Renderable that was hit
    pub renderable: RenderableId,
    /// Distance from the ray origin
    pub distance: f64,
    /// World-space intersection point
    pub point: Point3<f64>,
    /// Triangle index within the renderable's geometry, if resolvable
    pub face_index: Option<u32>,
}

/// Camera placement that frames a bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFit {
    /// Orbit target (box center)
    pub target: Point3<f64>,
    /// Camera position
    pub position: Point3<f64>,
    /// Near clipping distance
    pub near: f64,
    /// Far clipping distance
    pub far: f64,
}

/// A model file selected by the user
#[derive(Clone, Debug)]
pub struct ModelFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Result of a successful model load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedModel {
    /// Handle for subsequent queries
    pub handle: ModelHandle,
    /// Renderable holding the full, unfiltered model geometry
    pub renderable: RenderableId,
}

/// Request to materialize a filtered render subset
///
/// Subsets are keyed by `(model, tag)`: a request with the same key
/// replaces the previous subset instead of adding another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubsetRequest {
    pub model: ModelHandle,
    pub tag: String,
    pub ids: Vec<ElementId>,
}

/// Full attribute set of an element as structured data
pub type ElementAttributes = serde_json::Value;
