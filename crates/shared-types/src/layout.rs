//! Chart-wide layout and the final render plan

use crate::trace::TraceSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layout keys owned by the client theme; response hints never replace them
pub const THEME_OWNED_KEYS: &[&str] = &[
    "paper_bgcolor",
    "plot_bgcolor",
    "margin",
    "xaxis",
    "yaxis",
    "legend",
    "hovermode",
];

/// Axis configuration, kept as an open field map so backend hints can set
/// anything the charting library understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Axis(Map<String, Value>);

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Field-by-field override: every field the hints set wins, every other
    /// field keeps its current value.
    pub fn merge_hints(&mut self, hints: &Map<String, Value>) {
        for (field, value) in hints {
            self.0.insert(field.clone(), value.clone());
        }
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.0.insert("showgrid".to_string(), Value::Bool(show));
    }

    pub fn show_grid(&self) -> Option<bool> {
        self.0.get("showgrid").and_then(Value::as_bool)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub r: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendFont {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub bgcolor: String,
    pub font: LegendFont,
}

/// Chart-wide presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub margin: Margin,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub hovermode: String,
    /// Backend layout hints that do not collide with theme-owned keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layout {
    /// Merge backend layout hints, skipping keys the theme owns
    pub fn merge_extra(&mut self, hints: &Map<String, Value>) {
        for (key, value) in hints {
            if THEME_OWNED_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// The (traces, layout) pair handed to the chart sink, plus the fitted
/// equation caption. Rebuilt on every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub traces: Vec<TraceSpec>,
    pub layout: Layout,
    pub equation_text: String,
}
