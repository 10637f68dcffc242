// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status line and metadata panel contents

use ifc_inspect_model::{ElementAttributes, ElementId, ModelHandle};
use std::fmt;

/// Lifecycle state shown in the status line
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewerStatus {
    #[default]
    Ready,
    Loading {
        file: String,
    },
    Loaded {
        file: String,
        elements: usize,
        categories: usize,
        filters_available: bool,
    },
    LoadFailed {
        file: String,
    },
    /// A load was refused because another one is running
    Busy,
    Unloaded,
}

impl fmt::Display for ViewerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerStatus::Ready => write!(f, "Viewer ready. Load an IFC file to begin."),
            ViewerStatus::Loading { file } => write!(f, "Loading {}...", file),
            ViewerStatus::Loaded {
                file,
                elements,
                categories,
                filters_available,
            } => {
                if *filters_available {
                    write!(
                        f,
                        "Loaded {} ({} elements, {} categories)",
                        file, elements, categories
                    )
                } else {
                    // element count is unknown without an index
                    write!(f, "Loaded {} - filters unavailable", file)
                }
            }
            ViewerStatus::LoadFailed { file } => {
                write!(f, "Failed to load {}. See log for details.", file)
            }
            ViewerStatus::Busy => write!(f, "A model is still loading. Please wait."),
            ViewerStatus::Unloaded => write!(f, "Model unloaded."),
        }
    }
}

/// What the metadata panel shows
#[derive(Clone, Debug, PartialEq, Default)]
pub enum MetadataPanel {
    #[default]
    Placeholder,
    Element {
        model: ModelHandle,
        element: ElementId,
        category: Option<String>,
        attributes: ElementAttributes,
    },
    Message(String),
}

impl MetadataPanel {
    pub fn nothing_selected() -> Self {
        MetadataPanel::Message("No element selected.".to_string())
    }

    /// Panel text: identifiers followed by the attributes as pretty JSON
    pub fn render(&self) -> String {
        match self {
            MetadataPanel::Placeholder => {
                "Select an element to inspect its properties.".to_string()
            }
            MetadataPanel::Element {
                model,
                element,
                category,
                attributes,
            } => {
                let attributes = serde_json::to_string_pretty(attributes)
                    .unwrap_or_else(|_| attributes.to_string());
                format!(
                    "Model: {}\nElement: {}\nCategory: {}\n\n{}",
                    model.0,
                    element,
                    category.as_deref().unwrap_or("-"),
                    attributes
                )
            }
            MetadataPanel::Message(message) => message.clone(),
        }
    }
}
