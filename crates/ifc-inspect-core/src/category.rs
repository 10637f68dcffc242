// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category index: element type name -> element identifiers
//!
//! Built once per loaded model by asking the parsing service for the type of
//! every element. Categories are case-normalized so "IfcWall" and "IFCWALL"
//! land in the same bucket, and every element ends up in exactly one
//! category. Elements whose type cannot be determined go to
//! [`UNKNOWN_CATEGORY`] instead of being dropped.

use crate::{Result, ViewerError};
use futures_util::future::join_all;
use ifc_inspect_model::{ElementId, ModelHandle, ModelService};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Reserved category for elements without a usable type
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// Canonical (upper-case, trimmed) form of a category name
pub fn normalize_category(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        UNKNOWN_CATEGORY.to_string()
    } else {
        name.to_uppercase()
    }
}

/// Mapping from category name to the elements of that category
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryIndex {
    categories: BTreeMap<String, BTreeSet<ElementId>>,
    element_category: FxHashMap<ElementId, String>,
}

impl CategoryIndex {
    /// Build the index for a freshly loaded model
    ///
    /// Fails only when the element list itself cannot be obtained. Per-element
    /// query failures put that element into [`UNKNOWN_CATEGORY`]. The queries
    /// are issued together and awaited as a batch.
    pub async fn build(service: &dyn ModelService, model: ModelHandle) -> Result<Self> {
        let ids: BTreeSet<ElementId> = service
            .all_element_ids(model)
            .await
            .map_err(ViewerError::IndexUnavailable)?
            .into_iter()
            .collect();

        let queries = ids.iter().map(|&id| async move {
            let reply = service.element_category(model, id).await;
            (id, reply)
        });

        let mut index = Self::default();
        let mut failed = 0usize;
        for (id, reply) in join_all(queries).await {
            let category = match reply {
                Ok(name) => normalize_category(&name),
                Err(e) => {
                    failed += 1;
                    log::debug!("[Categories] {}", e);
                    UNKNOWN_CATEGORY.to_string()
                }
            };
            index.insert(id, category);
        }

        if failed > 0 {
            log::warn!(
                "[Categories] {} of {} category queries failed, filed under {}",
                failed,
                ids.len(),
                UNKNOWN_CATEGORY
            );
        }
        log::debug!(
            "[Categories] Indexed {} elements in {} categories",
            index.element_count(),
            index.len()
        );
        Ok(index)
    }

    /// Build an index from known `(element, category)` pairs
    ///
    /// Names are normalized; a repeated element keeps its last category.
    pub fn from_assignments<I, S>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (ElementId, S)>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (id, name) in assignments {
            index.insert(id, normalize_category(name.as_ref()));
        }
        index
    }

    fn insert(&mut self, id: ElementId, category: String) {
        if let Some(previous) = self.element_category.insert(id, category.clone()) {
            if let Some(set) = self.categories.get_mut(&previous) {
                set.remove(&id);
                if set.is_empty() {
                    self.categories.remove(&previous);
                }
            }
        }
        self.categories.entry(category).or_default().insert(id);
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of indexed elements
    pub fn element_count(&self) -> usize {
        self.element_category.len()
    }

    /// Categories in name order with their elements
    pub fn categories(&self) -> impl Iterator<Item = (&str, &BTreeSet<ElementId>)> {
        self.categories.iter().map(|(name, ids)| (name.as_str(), ids))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Elements of a (normalized) category
    pub fn elements_in(&self, category: &str) -> Option<&BTreeSet<ElementId>> {
        self.categories.get(category)
    }

    /// Category of an element
    pub fn category_of(&self, id: ElementId) -> Option<&str> {
        self.element_category.get(&id).map(String::as_str)
    }

    /// Every indexed element
    pub fn all_elements(&self) -> BTreeSet<ElementId> {
        self.element_category.keys().copied().collect()
    }
}
