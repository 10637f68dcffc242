// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON persistence of user intent (section settings, disabled filters)

use crate::section::{clamp_offset, SectionState};
use crate::{Result, ViewerError};
use ifc_inspect_model::Axis;
use serde::{Deserialize, Serialize};

/// Section plane state for storage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionStorage {
    pub active: bool,
    pub axis: String, // "x", "y", or "z"
    pub offset: f64,  // -100 to 100
}

impl From<SectionState> for SectionStorage {
    fn from(state: SectionState) -> Self {
        Self {
            active: state.active,
            axis: state.axis.as_str().to_string(),
            offset: state.offset,
        }
    }
}

impl TryFrom<SectionStorage> for SectionState {
    type Error = ViewerError;

    fn try_from(storage: SectionStorage) -> Result<Self> {
        let axis = Axis::parse(&storage.axis).ok_or_else(|| {
            ViewerError::config(format!("invalid section axis {:?}", storage.axis))
        })?;
        Ok(SectionState {
            axis,
            offset: clamp_offset(storage.offset),
            active: storage.active,
        })
    }
}

/// Everything the user chose that is worth restoring later
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub section: Option<SectionStorage>,
    #[serde(default)]
    pub disabled_categories: Vec<String>,
}

impl ViewerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
