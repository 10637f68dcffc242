// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-category filter toggles and the visible/hidden partition they induce

use crate::category::{normalize_category, CategoryIndex};
use crate::{Result, ViewerError};
use ifc_inspect_model::ElementId;
use std::collections::{BTreeMap, BTreeSet};

/// Enabled state of every category of the current model
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    enabled: BTreeMap<String, bool>,
}

impl FilterSelection {
    /// Every category of `index`, enabled
    pub fn all_enabled(index: &CategoryIndex) -> Self {
        Self {
            enabled: index.names().map(|name| (name.to_string(), true)).collect(),
        }
    }

    /// Enable or disable a category
    ///
    /// The name is normalized first. Returns whether the state changed.
    pub fn set(&mut self, category: &str, enabled: bool) -> Result<bool> {
        let key = normalize_category(category);
        match self.enabled.get_mut(&key) {
            Some(state) => {
                let changed = *state != enabled;
                *state = enabled;
                Ok(changed)
            }
            None => Err(ViewerError::UnknownCategory(key)),
        }
    }

    /// Set every category at once, returns whether anything changed
    pub fn set_all(&mut self, enabled: bool) -> bool {
        let mut changed = false;
        for state in self.enabled.values_mut() {
            changed |= *state != enabled;
            *state = enabled;
        }
        changed
    }

    /// Categories missing from the selection count as enabled
    pub fn is_enabled(&self, category: &str) -> bool {
        self.enabled.get(category).copied().unwrap_or(true)
    }

    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.enabled
            .iter()
            .filter(|(_, enabled)| !**enabled)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.enabled.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn clear(&mut self) {
        self.enabled.clear();
    }
}

/// Visible and hidden elements for one filter selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    pub visible: BTreeSet<ElementId>,
    pub hidden: BTreeSet<ElementId>,
}

impl VisibleSet {
    /// Partition `all` by the categories `selection` disables
    ///
    /// `visible ∪ hidden == all` and `visible ∩ hidden == ∅` always hold.
    pub fn partition(
        index: &CategoryIndex,
        selection: &FilterSelection,
        all: &BTreeSet<ElementId>,
    ) -> Self {
        let hidden: BTreeSet<ElementId> = selection
            .disabled()
            .filter_map(|category| index.elements_in(category))
            .flatten()
            .copied()
            .filter(|id| all.contains(id))
            .collect();
        let visible = all.difference(&hidden).copied().collect();
        Self { visible, hidden }
    }

    /// Everything visible, nothing hidden
    pub fn everything(all: &BTreeSet<ElementId>) -> Self {
        Self {
            visible: all.clone(),
            hidden: BTreeSet::new(),
        }
    }
}
