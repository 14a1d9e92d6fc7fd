use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// How the backend evaluates a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Evaluated by the language model against document text.
    AiPrompt,
    /// Evaluated by a fixed rule.
    Deterministic,
    #[serde(other)]
    Unknown,
}

/// A SOC 2 control definition. Reference data: immutable from the client's
/// point of view and cached with a long staleness window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    /// Human identifier such as `CC6.1`; evidence items refer to controls by it.
    pub control_id: String,
    #[serde(default)]
    pub framework: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub check_type: CheckType,
    pub category: String,
    #[serde(default)]
    pub required_file_types: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlList {
    #[serde(default)]
    pub controls: Vec<Control>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCategory {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub controls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlCategories {
    #[serde(default)]
    pub categories: Vec<ControlCategory>,
    #[serde(default)]
    pub total_categories: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSummaryCounts {
    #[serde(default)]
    pub total_controls: u32,
    #[serde(default)]
    pub categories: BTreeMap<String, u32>,
}

/// Response of `GET /controls/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSummary {
    #[serde(default)]
    pub summary: ControlSummaryCounts,
    #[serde(default)]
    pub quick_scan_count: u32,
    #[serde(default)]
    pub full_scan_count: u32,
}

/// Lookup of control definitions by `control_id`.
///
/// Evidence items and gaps hold a control id as a weak reference; the catalog
/// resolves it when the view needs a title, category or description.
#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    by_id: HashMap<String, Control>,
}

impl ControlCatalog {
    pub fn get(&self, control_id: &str) -> Option<&Control> {
        self.by_id.get(control_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Control> for ControlCatalog {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        Self {
            by_id: iter
                .into_iter()
                .map(|control| (control.control_id.clone(), control))
                .collect(),
        }
    }
}

impl From<&ControlList> for ControlCatalog {
    fn from(list: &ControlList) -> Self {
        list.controls.iter().cloned().collect()
    }
}
