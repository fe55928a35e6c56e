//! Dark theme applied to every layout

use explorer_shared::{Axis, Layout, Legend, LegendFont, Margin};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Theme colours and spacing. Colours are `#RRGGBB` strings as the charting
/// library expects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub grid_color: String,
    pub zeroline_color: String,
    pub margin: Margin,
    pub legend_bgcolor: String,
    pub legend_font_color: String,
    pub hovermode: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            paper_bgcolor: "#2E3440".to_string(),
            plot_bgcolor: "#0B1420".to_string(),
            grid_color: "#444444".to_string(),
            zeroline_color: "#444444".to_string(),
            margin: Margin {
                t: 40,
                r: 20,
                l: 60,
                b: 60,
            },
            legend_bgcolor: "#2E3440".to_string(),
            legend_font_color: "#ECEFF4".to_string(),
            hovermode: "closest".to_string(),
        }
    }
}

impl Theme {
    /// Default axis before any backend hints are merged
    pub fn base_axis(&self) -> Axis {
        Axis::new()
            .with("gridcolor", self.grid_color.clone())
            .with("zerolinecolor", self.zeroline_color.clone())
    }

    pub fn base_layout(&self) -> Layout {
        Layout {
            paper_bgcolor: self.paper_bgcolor.clone(),
            plot_bgcolor: self.plot_bgcolor.clone(),
            margin: self.margin,
            xaxis: self.base_axis(),
            yaxis: self.base_axis(),
            legend: Legend {
                bgcolor: self.legend_bgcolor.clone(),
                font: LegendFont {
                    color: self.legend_font_color.clone(),
                },
            },
            hovermode: self.hovermode.clone(),
            extra: Map::new(),
        }
    }

    /// Every colour field with its name, for validation
    pub fn colors(&self) -> [(&'static str, &str); 6] {
        [
            ("paper_bgcolor", self.paper_bgcolor.as_str()),
            ("plot_bgcolor", self.plot_bgcolor.as_str()),
            ("grid_color", self.grid_color.as_str()),
            ("zeroline_color", self.zeroline_color.as_str()),
            ("legend_bgcolor", self.legend_bgcolor.as_str()),
            ("legend_font_color", self.legend_font_color.as_str()),
        ]
    }
}
