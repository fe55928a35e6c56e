//! Query request assembly

use explorer_shared::{FilterGroup, QueryRequest, QueryState};

/// Builds the wire request for one cycle
pub struct RequestBuilder;

impl RequestBuilder {
    /// Snapshot `state` and `filters` into a request. Pure: bound inputs are
    /// passed through as raw text and nothing is rejected here.
    pub fn build(state: &QueryState, filters: &FilterGroup) -> QueryRequest {
        QueryRequest {
            x_col: state.x_column.clone(),
            y_col: state.y_column.clone(),
            degree: state.polynomial_degree,
            graph_type: state.graph_type,
            filters: filters.clone(),
            capacity_min: state.capacity_min.clone(),
            capacity_max: state.capacity_max.clone(),
            log_x: state.log_x,
            log_y: state.log_y,
            search: state.search_text.clone(),
        }
    }
}
