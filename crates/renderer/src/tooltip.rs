//! Hover templates and point detail text

use explorer_shared::PointDetail;
use serde::{Deserialize, Serialize};

/// Captions used in hover templates and point details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipLabels {
    pub purpose: String,
    pub designer: String,
    pub count: String,
}

impl Default for TooltipLabels {
    fn default() -> Self {
        Self {
            purpose: "発行目的".to_string(),
            designer: "設計会社".to_string(),
            count: "件数".to_string(),
        }
    }
}

impl TooltipLabels {
    /// Template for point-level traces: label, purpose and designer from the
    /// auxiliary tuple, then both live axis columns with their coordinates.
    pub fn point_template(&self, x_column: &str, y_column: &str) -> String {
        format!(
            "%{{customdata[0]}}<br>{}:%{{customdata[1]}}<br>{}:%{{customdata[2]}}<br>\
             {x_column}: %{{x}}<br>{y_column}: %{{y}}<extra></extra>",
            self.purpose, self.designer
        )
    }

    /// Template for aggregate (bar) traces
    pub fn count_template(&self, x_column: &str) -> String {
        format!("{x_column}: %{{x}}<br>{}: %{{y}}<extra></extra>", self.count)
    }

    /// Multi-line text shown when a point is clicked
    pub fn describe_point(&self, detail: &PointDetail) -> String {
        format!(
            "{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
            detail.label,
            self.purpose,
            detail.purpose,
            self.designer,
            detail.designer,
            detail.x_column,
            detail.x_value,
            detail.y_column,
            detail.y_value
        )
    }
}
