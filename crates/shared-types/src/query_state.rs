// Query state structures for the explorer controller
// The page supplies the column enumeration at load time; every UI control
// then mutates one field of the single QueryState owned by the controller.

use crate::filters::FilterGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Graph mode requested from the backend.
///
/// Serialized with the backend's own labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphType {
    #[default]
    #[serde(rename = "散布図")]
    Scatter,
    #[serde(rename = "ヒストグラム")]
    Histogram,
}

impl GraphType {
    pub fn label(&self) -> &'static str {
        match self {
            GraphType::Scatter => "散布図",
            GraphType::Histogram => "ヒストグラム",
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "散布図" => Ok(GraphType::Scatter),
            "ヒストグラム" => Ok(GraphType::Histogram),
            other => match other.to_ascii_lowercase().as_str() {
                "scatter" => Ok(GraphType::Scatter),
                "histogram" => Ok(GraphType::Histogram),
                _ => Err(format!("Unknown graph type: {other}")),
            },
        }
    }
}

/// Load-time payload from the page hosting the explorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupContext {
    pub columns: Vec<String>,
    pub usage_colors: BTreeMap<String, String>,
    /// Filter key -> option values offered for it
    pub filters: BTreeMap<String, Vec<String>>,
}

/// Initial selections applied when the state is first built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub preferred_x: String,
    pub preferred_y: String,
    pub degree: u8,
    /// Advisory upper bound, only reported as a validation warning
    pub max_degree: u8,
    pub graph_type: GraphType,
    pub show_grid: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            preferred_x: "延床面積 [㎡]".to_string(),
            preferred_y: "合計設備容量 [kVA]".to_string(),
            degree: 1,
            max_degree: 5,
            graph_type: GraphType::Scatter,
            show_grid: true,
        }
    }
}

/// A single field mutation coming from one UI control
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    XColumn(String),
    YColumn(String),
    Degree(u8),
    GraphType(GraphType),
    CapacityMin(String),
    CapacityMax(String),
    LogX(bool),
    LogY(bool),
    ShowGrid(bool),
    Search(String),
    Filters(FilterGroup),
}

/// Advisory validation result; nothing is ever rejected client-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateValidationResult {
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

/// Current user selections. Lives for the whole page session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    /// Server-supplied column enumeration
    pub columns: Vec<String>,
    pub x_column: String,
    /// Preserved while the histogram mode disables the Y selector
    pub y_column: String,
    pub polynomial_degree: u8,
    pub graph_type: GraphType,
    pub filters: FilterGroup,
    /// Raw text of the bound inputs; the backend parses them
    pub capacity_min: String,
    pub capacity_max: String,
    pub log_x: bool,
    pub log_y: bool,
    pub show_grid: bool,
    pub search_text: String,
}

impl QueryState {
    /// Build the initial state from the column list.
    ///
    /// Preferred columns are used when present, otherwise the first and
    /// second available columns. A singleton list puts the same column on
    /// both axes; an empty list leaves both empty.
    pub fn from_startup(context: &StartupContext, defaults: &QueryDefaults) -> Self {
        let columns = context.columns.clone();
        let has = |name: &str| columns.iter().any(|c| c == name);

        let x_column = if has(&defaults.preferred_x) {
            defaults.preferred_x.clone()
        } else {
            columns.first().cloned().unwrap_or_default()
        };

        let y_column = if has(&defaults.preferred_y) {
            defaults.preferred_y.clone()
        } else {
            columns
                .get(1)
                .or_else(|| columns.first())
                .cloned()
                .unwrap_or_default()
        };

        let mut filters = FilterGroup::new();
        for key in context.filters.keys() {
            filters.ensure_key(key);
        }

        Self {
            columns,
            x_column,
            y_column,
            polynomial_degree: defaults.degree,
            graph_type: defaults.graph_type,
            filters,
            capacity_min: String::new(),
            capacity_max: String::new(),
            log_x: false,
            log_y: false,
            show_grid: defaults.show_grid,
            search_text: String::new(),
        }
    }

    /// Apply one field update. Always returns true: no combination of fields
    /// is rejected before querying.
    pub fn set(&mut self, update: StateUpdate) -> bool {
        match update {
            StateUpdate::XColumn(column) => self.x_column = column,
            StateUpdate::YColumn(column) => self.y_column = column,
            StateUpdate::Degree(degree) => self.polynomial_degree = degree,
            StateUpdate::GraphType(graph_type) => self.graph_type = graph_type,
            StateUpdate::CapacityMin(raw) => self.capacity_min = raw,
            StateUpdate::CapacityMax(raw) => self.capacity_max = raw,
            StateUpdate::LogX(on) => self.log_x = on,
            StateUpdate::LogY(on) => self.log_y = on,
            StateUpdate::ShowGrid(on) => self.show_grid = on,
            StateUpdate::Search(text) => self.search_text = text,
            StateUpdate::Filters(filters) => self.filters = filters,
        }
        true
    }

    /// The Y selector is presented as disabled in histogram mode
    pub fn y_axis_enabled(&self) -> bool {
        self.graph_type != GraphType::Histogram
    }

    /// Permissively parsed capacity bounds; empty or invalid input is no bound
    pub fn capacity_bounds(&self) -> (Option<f64>, Option<f64>) {
        (parse_bound(&self.capacity_min), parse_bound(&self.capacity_max))
    }

    pub fn validate(&self, max_degree: u8) -> StateValidationResult {
        let mut warnings = Vec::new();

        if !self.columns.contains(&self.x_column) {
            warnings.push(format!("X column not in column list: {:?}", self.x_column));
        }

        if self.y_axis_enabled() && !self.columns.contains(&self.y_column) {
            warnings.push(format!("Y column not in column list: {:?}", self.y_column));
        }

        if self.polynomial_degree > max_degree {
            warnings.push(format!(
                "Polynomial degree {} above recommended maximum {}",
                self.polynomial_degree, max_degree
            ));
        }

        if let (Some(min), Some(max)) = self.capacity_bounds() {
            if min > max {
                warnings.push(format!("Capacity bounds inverted: {min} > {max}"));
            }
        }

        StateValidationResult {
            is_valid: true,
            warnings,
        }
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
