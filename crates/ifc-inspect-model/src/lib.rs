// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Inspect Model - Collaborator traits and shared types
//!
//! The inspection viewer never parses IFC files or talks to a GPU itself.
//! It drives two collaborators through the traits defined here:
//!
//! - [`ModelService`] - loads a model file, enumerates elements, answers
//!   category and attribute queries, and materializes filtered subsets
//! - [`SceneRenderer`] - owns the scene graph, visibility flags, ray casts,
//!   clipping planes and the camera
//!
//! Both are single-threaded: async calls return [`LocalBoxFuture`]s and
//! implementations are shared through `Rc<dyn ...>`.
//!
//! # Example
//!
//! ```ignore
//! use ifc_inspect_model::{ModelFile, ModelService};
//!
//! let file = ModelFile::new("house.ifc", bytes);
//! let loaded = service.load_model(&file).await?;
//! let ids = service.all_element_ids(loaded.handle).await?;
//! println!("{} elements", ids.len());
//! ```
//!
//! [`LocalBoxFuture`]: futures_util::future::LocalBoxFuture

pub mod error;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
