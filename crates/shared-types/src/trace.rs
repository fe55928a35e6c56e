//! Renderable trace specifications as produced by the backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind tag of a trace, read from its `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    /// Point-level series (markers or lines)
    Scatter,
    /// Aggregate/count series
    Bar,
    /// Any other tag the backend sends
    Other,
    /// No `type` field at all; the charting library treats it as scatter
    Untagged,
}

/// One renderable data series.
///
/// The client never interprets coordinates; it only reads the kind tag and
/// the per-point auxiliary tuple (`customdata`), and attaches presentation
/// fields. It is a plain value: cloning yields an independent copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceSpec(Map<String, Value>);

impl TraceSpec {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn kind(&self) -> TraceKind {
        match self.0.get("type").and_then(Value::as_str) {
            Some("scatter") => TraceKind::Scatter,
            Some("bar") => TraceKind::Bar,
            Some(_) => TraceKind::Other,
            None => TraceKind::Untagged,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Whether the trace carries per-point auxiliary data
    pub fn has_custom_data(&self) -> bool {
        self.0.get("customdata").is_some_and(Value::is_array)
    }

    pub fn hover_template(&self) -> Option<&str> {
        self.0.get("hovertemplate").and_then(Value::as_str)
    }

    pub fn set_hover_template(&mut self, template: String) {
        self.0
            .insert("hovertemplate".to_string(), Value::String(template));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: &str, value: Value) -> Option<Value> {
        self.0.insert(field.to_string(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TraceSpec {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
