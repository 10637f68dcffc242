// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Inspect Core - Visibility, section and pick coordination
//!
//! Keeps the loaded model, the per-category filters, the section plane and
//! the click-to-inspect pick target consistent while the user loads files,
//! toggles categories, drags the section slider and clicks elements.
//!
//! # Components
//!
//! - [`CategoryIndex`] - category name to element ids, built per model
//! - [`VisibilityEngine`] - filtered subset and the single [`PickTarget`]
//! - [`SectionController`] - clip plane from axis, offset and model bounds
//! - [`PickResolver`] - click vs. drag, ray cast to element id
//! - [`SessionCoordinator`] - model replacement and async staleness checks
//!
//! # Example
//!
//! ```ignore
//! use ifc_inspect_core::{SessionCoordinator, ViewerSettings};
//! use ifc_inspect_model::{Axis, ModelFile};
//!
//! let viewer = SessionCoordinator::new(service, renderer, ViewerSettings::default())?;
//! viewer.load_model(&ModelFile::new("house.ifc", bytes)).await?;
//! viewer.set_category_enabled("IFCSLAB", false)?;
//! viewer.apply_section(Axis::Y, 25.0)?;
//! ```

pub mod bounds;
pub mod camera;
pub mod category;
pub mod error;
pub mod filter;
pub mod picking;
pub mod section;
pub mod session;
pub mod settings;
pub mod status;
pub mod storage;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use bounds::BoundsTracker;
pub use camera::fit_to_bounds;
pub use category::{normalize_category, CategoryIndex, UNKNOWN_CATEGORY};
pub use error::{Result, ViewerError};
pub use filter::{FilterSelection, VisibleSet};
pub use picking::{ElementRef, Gesture, PickResolver, PickResult, PointerGesture};
pub use section::{clamp_offset, section_plane, SectionController, SectionState};
pub use session::{ModelSession, PickOutcome, SessionCoordinator};
pub use settings::ViewerSettings;
pub use status::{MetadataPanel, ViewerStatus};
pub use storage::{SectionStorage, ViewerSnapshot};
pub use visibility::{PickTarget, VisibilityEngine, VisibilityOutcome};
