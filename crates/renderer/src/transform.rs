//! Response transformer: backend response + live query state -> render plan

use crate::theme::Theme;
use crate::tooltip::TooltipLabels;
use explorer_shared::{QueryResponse, QueryState, RenderPlan, TraceKind, TraceSpec};

/// Builds the ordered trace list and the themed layout for one cycle.
///
/// Hover templates depend on the current axis selection, so a plan is never
/// cached: every cycle transforms again.
#[derive(Debug, Clone, Default)]
pub struct ResponseTransformer {
    theme: Theme,
    labels: TooltipLabels,
}

impl ResponseTransformer {
    pub fn new(theme: Theme, labels: TooltipLabels) -> Self {
        Self { theme, labels }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn labels(&self) -> &TooltipLabels {
        &self.labels
    }

    /// Transform a successful response. Must never be called with an error
    /// response; the controller short-circuits those.
    pub fn transform(&self, response: &QueryResponse, state: &QueryState) -> RenderPlan {
        let mut traces = self.ordered_traces(response);
        self.attach_hover_templates(&mut traces, state);

        let mut layout = self.theme.base_layout();
        if let Some(hints) = &response.xaxis {
            layout.xaxis.merge_hints(hints);
        }
        if let Some(hints) = &response.yaxis {
            layout.yaxis.merge_hints(hints);
        }
        // The grid toggle beats any backend hint for this one field
        if !state.show_grid {
            layout.xaxis.set_show_grid(false);
            layout.yaxis.set_show_grid(false);
        }
        if let Some(hints) = &response.layout {
            layout.merge_extra(hints);
        }

        log::debug!(
            "Transformed response into {} traces (x: {}, y: {})",
            traces.len(),
            state.x_column,
            state.y_column
        );

        RenderPlan {
            traces,
            layout,
            equation_text: response.equation.clone().unwrap_or_default(),
        }
    }

    /// Base traces in backend order, then highlight copies, then the fit on top
    fn ordered_traces(&self, response: &QueryResponse) -> Vec<TraceSpec> {
        let highlight = response.highlight.as_deref().unwrap_or_default();
        let mut traces = Vec::with_capacity(response.traces.len() + highlight.len() + 1);

        traces.extend(response.traces.iter().cloned());
        traces.extend(highlight.iter().cloned());
        if let Some(fit) = &response.fit {
            traces.push(fit.clone());
        }

        traces
    }

    fn attach_hover_templates(&self, traces: &mut [TraceSpec], state: &QueryState) {
        for trace in traces.iter_mut() {
            match trace.kind() {
                TraceKind::Scatter if trace.has_custom_data() => {
                    trace.set_hover_template(
                        self.labels.point_template(&state.x_column, &state.y_column),
                    );
                }
                TraceKind::Bar => {
                    trace.set_hover_template(self.labels.count_template(&state.x_column));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_shared::{QueryDefaults, StartupContext, StateUpdate};
    use serde_json::{json, Value};

    fn state() -> QueryState {
        let ctx = StartupContext {
            columns: vec!["area".to_string(), "load".to_string(), "floors".to_string()],
            ..Default::default()
        };
        QueryState::from_startup(&ctx, &QueryDefaults::default())
    }

    fn response(value: Value) -> QueryResponse {
        serde_json::from_value(value).unwrap()
    }

    fn names(plan: &RenderPlan) -> Vec<&str> {
        plan.traces.iter().map(|t| t.name().unwrap_or("")).collect()
    }

    #[test]
    fn test_trace_order_base_highlight_fit() {
        let response = response(json!({
            "traces": [{"type": "scatter", "name": "A"}, {"type": "scatter", "name": "B"}],
            "highlight": [{"type": "scatter", "name": "H1", "marker": {"size": 14}}],
            "fit": {"mode": "lines", "name": "F"}
        }));
        let plan = ResponseTransformer::default().transform(&response, &state());

        assert_eq!(names(&plan), vec!["A", "B", "H1", "F"]);
    }

    #[test]
    fn test_highlight_copy_does_not_alias_response() {
        let response = response(json!({
            "traces": [],
            "highlight": [{"type": "scatter", "name": "H1"}]
        }));
        let mut plan = ResponseTransformer::default().transform(&response, &state());
        plan.traces[0].insert("opacity", json!(0.2));

        let original = &response.highlight.as_ref().unwrap()[0];
        assert!(original.get("opacity").is_none());
        assert_eq!(plan.traces[0].name(), Some("H1"));
    }

    #[test]
    fn test_empty_highlight_and_missing_fit_add_nothing() {
        let response = response(json!({"traces": [{"type": "bar", "name": "A"}], "highlight": []}));
        let plan = ResponseTransformer::default().transform(&response, &state());
        assert_eq!(names(&plan), vec!["A"]);
        assert_eq!(plan.equation_text, "");
    }

    #[test]
    fn test_axis_hints_override_defaults_field_by_field() {
        let response = response(json!({
            "traces": [],
            "xaxis": {"title": "area", "type": "log", "showgrid": true},
            "yaxis": {"zerolinecolor": "#ff0000"}
        }));
        let plan = ResponseTransformer::default().transform(&response, &state());

        assert_eq!(plan.layout.xaxis.get("type"), Some(&json!("log")));
        assert_eq!(plan.layout.xaxis.get("gridcolor"), Some(&json!("#444444")));
        assert_eq!(plan.layout.xaxis.show_grid(), Some(true));
        assert_eq!(plan.layout.yaxis.get("zerolinecolor"), Some(&json!("#ff0000")));
        assert_eq!(plan.layout.yaxis.get("gridcolor"), Some(&json!("#444444")));
    }

    #[test]
    fn test_grid_toggle_beats_hints() {
        let response = response(json!({
            "traces": [],
            "xaxis": {"showgrid": true},
            "yaxis": {"showgrid": true}
        }));
        let transformer = ResponseTransformer::default();
        let mut state = state();

        state.set(StateUpdate::ShowGrid(false));
        let hidden = transformer.transform(&response, &state);
        assert_eq!(hidden.layout.xaxis.show_grid(), Some(false));
        assert_eq!(hidden.layout.yaxis.show_grid(), Some(false));

        state.set(StateUpdate::ShowGrid(true));
        let shown = transformer.transform(&response, &state);
        assert_eq!(shown.layout.xaxis.show_grid(), Some(true));
        assert_eq!(shown.layout.yaxis.show_grid(), Some(true));

        let no_hints = transformer.transform(&self::response(json!({"traces": []})), &state);
        assert_eq!(no_hints.layout.xaxis.show_grid(), None);
    }

    #[test]
    fn test_hover_templates_follow_live_axis_selection() {
        let response = response(json!({
            "traces": [
                {"type": "scatter", "name": "A", "customdata": [["Aビル", "完成図", "大成建設"]]},
                {"type": "bar", "name": "B"},
                {"type": "scatter", "name": "plain"}
            ],
            "fit": {"mode": "lines", "name": "F"}
        }));
        let transformer = ResponseTransformer::default();
        let mut state = state();

        let first = transformer.transform(&response, &state);
        assert!(first.traces[0].hover_template().unwrap().contains("load: %{y}"));
        assert_eq!(
            first.traces[1].hover_template(),
            Some("area: %{x}<br>件数: %{y}<extra></extra>")
        );
        assert_eq!(first.traces[2].hover_template(), None);
        assert_eq!(first.traces[3].hover_template(), None);

        state.set(StateUpdate::YColumn("floors".to_string()));
        let second = transformer.transform(&response, &state);
        assert!(second.traces[0].hover_template().unwrap().contains("floors: %{y}"));
    }

    #[test]
    fn test_equation_and_layout_hints() {
        let response = response(json!({
            "traces": [],
            "equation": "0.512·x + 12.3",
            "layout": {"barmode": "overlay", "hovermode": "x"}
        }));
        let plan = ResponseTransformer::default().transform(&response, &state());

        assert_eq!(plan.equation_text, "0.512·x + 12.3");
        assert_eq!(plan.layout.extra.get("barmode"), Some(&json!("overlay")));
        assert_eq!(plan.layout.hovermode, "closest");
    }
}
