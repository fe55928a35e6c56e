//! Click selection on a data point and the detail surfaced for it

use crate::query_state::QueryState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The clicked point as reported by the chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSelection {
    #[serde(default)]
    pub x: Value,
    #[serde(default)]
    pub y: Value,
    #[serde(default, rename = "customdata")]
    pub custom_data: Option<Vec<Value>>,
}

/// Label, purpose and designer of a building plus its live-axis coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDetail {
    pub label: String,
    pub purpose: String,
    pub designer: String,
    pub x_column: String,
    pub x_value: String,
    pub y_column: String,
    pub y_value: String,
}

impl PointDetail {
    /// Points without auxiliary data produce no detail
    pub fn from_selection(selection: &PointSelection, state: &QueryState) -> Option<Self> {
        let data = selection.custom_data.as_ref()?;
        let field = |index: usize| data.get(index).map(display_value).unwrap_or_default();

        Some(Self {
            label: field(0),
            purpose: field(1),
            designer: field(2),
            x_column: state.x_column.clone(),
            x_value: display_value(&selection.x),
            y_column: state.y_column.clone(),
            y_value: display_value(&selection.y),
        })
    }
}

/// Render a JSON value the way a person reads it: strings unquoted,
/// integral numbers without a fractional part, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            Some(f) => format!("{f}"),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}
