//! Plotly.js as the chart sink

use super::{document, element, fire};
use explorer_renderer::ChartSink;
use explorer_shared::{
    ControlEvent, ExplorerError, ExplorerResult, Layout, PointSelection, TraceSpec,
};
use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = react, catch)]
    fn plotly_react(
        root: &str,
        data: &JsValue,
        layout: &JsValue,
        config: &JsValue,
    ) -> Result<JsValue, JsValue>;

    /// A chart div after Plotly has decorated it with `on`
    #[wasm_bindgen(extends = web_sys::HtmlElement)]
    type PlotlyElement;

    /// Missing until Plotly has drawn into the div once
    #[wasm_bindgen(method, catch, js_name = on)]
    fn on(this: &PlotlyElement, event: &str, handler: &js_sys::Function) -> Result<(), JsValue>;
}

/// Renders through `Plotly.react(chart_id, traces, layout, {responsive: true})`
pub struct PlotlySink {
    chart_id: String,
    /// Controller to receive `plotly_click`, until the handler is bound
    click_target: Option<Uuid>,
}

impl PlotlySink {
    pub fn new(chart_id: impl Into<String>) -> Self {
        Self {
            chart_id: chart_id.into(),
            click_target: None,
        }
    }

    /// Forward point clicks to `id` once the first render has succeeded
    pub fn with_point_clicks(mut self, id: Uuid) -> Self {
        self.click_target = Some(id);
        self
    }

    pub fn clicks_pending(&self) -> bool {
        self.click_target.is_some()
    }
}

impl ChartSink for PlotlySink {
    fn render(&mut self, traces: &[TraceSpec], layout: &Layout) -> ExplorerResult<()> {
        let data = to_js(traces)?;
        let layout = to_js(layout)?;
        let config = to_js(&serde_json::json!({ "responsive": true }))?;

        plotly_react(&self.chart_id, &data, &layout, &config)
            .map_err(|e| ExplorerError::render(format!("Plotly.react failed: {e:?}")))?;

        if let Some(id) = self.click_target {
            // A chart without click details is still a chart
            match bind_point_clicks(id, &self.chart_id) {
                Ok(()) => self.click_target = None,
                Err(e) => log::warn!("Point clicks not bound yet: {e}"),
            }
        }
        Ok(())
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> ExplorerResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ExplorerError::render(e.to_string()))
}

/// Forward `plotly_click` on the chart div to the controller. The div must
/// already have been drawn by Plotly.
pub fn bind_point_clicks(id: Uuid, chart_id: &str) -> ExplorerResult<()> {
    let document = document()?;
    let chart: web_sys::HtmlElement = element(&document, chart_id)?;
    let chart: PlotlyElement = chart.unchecked_into();

    let handler = Closure::wrap(Box::new(move |event: JsValue| {
        if let Some(selection) = selection_from_event(&event) {
            fire(&id, ControlEvent::PointClicked(selection));
        }
    }) as Box<dyn FnMut(JsValue)>);

    chart
        .on("plotly_click", handler.as_ref().unchecked_ref())
        .map_err(|e| ExplorerError::JsInterop {
            message: format!("Chart #{chart_id} has no Plotly event API: {e:?}"),
        })?;
    handler.forget();
    Ok(())
}

/// First clicked point. Only the fields needed are read; Plotly point
/// objects reference the whole figure.
fn selection_from_event(event: &JsValue) -> Option<PointSelection> {
    let points = js_sys::Reflect::get(event, &JsValue::from_str("points")).ok()?;
    let point = points.dyn_into::<js_sys::Array>().ok()?.get(0);
    if point.is_undefined() || point.is_null() {
        return None;
    }

    let field = |name: &str| js_sys::Reflect::get(&point, &JsValue::from_str(name)).ok();
    let x = field("x").and_then(|v| serde_wasm_bindgen::from_value(v).ok())?;
    let y = field("y").and_then(|v| serde_wasm_bindgen::from_value(v).ok())?;
    let custom_data = field("customdata")
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| serde_wasm_bindgen::from_value(v).ok());

    Some(PointSelection { x, y, custom_data })
}
