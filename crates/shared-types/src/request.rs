//! Query request sent to the backend, one per cycle

use crate::filters::FilterGroup;
use crate::query_state::GraphType;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of the query selections in wire form.
///
/// Numeric bounds travel as the raw input text; parsing and bounds checks
/// belong to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub x_col: String,
    pub y_col: String,
    pub degree: u8,
    pub graph_type: GraphType,
    pub filters: FilterGroup,
    pub capacity_min: String,
    pub capacity_max: String,
    pub log_x: bool,
    pub log_y: bool,
    pub search: String,
}

impl QueryRequest {
    /// Serialize to the JSON payload posted to the backend
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
