// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fit-to-view camera placement

use ifc_inspect_model::{Aabb, CameraFit};
use nalgebra::Vector3;

/// Frame `bounds` with a perspective camera of `fov_deg` vertical field of
/// view, looking at the box center from the `margin` direction
pub fn fit_to_bounds(bounds: &Aabb, fov_deg: f64, margin: [f64; 3]) -> CameraFit {
    let center = bounds.center();
    let fov = fov_deg.to_radians();

    // Calculate distance to fit the largest dimension
    let mut distance = bounds.max_dimension() / (2.0 * (fov / 2.0).tan());
    if !distance.is_finite() || distance <= f64::EPSILON {
        // single point or empty model
        distance = 1.0;
    }

    let offset = Vector3::from(margin) * distance;
    CameraFit {
        target: center,
        position: center + offset,
        near: (distance / 1000.0).max(0.1),
        far: distance * 1000.0,
    }
}
