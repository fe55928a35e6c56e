use super::{document, element, fire, listen, schedule, window};
use crate::controller::ControlSurface;
use crate::debounce::DebounceGate;
use explorer_data::{FilterControl, FilterSource};
use explorer_shared::{
    ControlEvent, ExplorerError, ExplorerResult, GraphType, PointDetail, QueryState, StateUpdate,
};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub const X_COLUMN_ID: &str = "x_col";
pub const Y_COLUMN_ID: &str = "y_col";
pub const DEGREE_ID: &str = "degree";
pub const GRAPH_TYPE_ID: &str = "graph_type";
pub const SEARCH_ID: &str = "search";
pub const CAPACITY_MIN_ID: &str = "cap_min";
pub const CAPACITY_MAX_ID: &str = "cap_max";
pub const LOG_X_ID: &str = "log_x";
pub const LOG_Y_ID: &str = "log_y";
pub const GRID_ID: &str = "grid";
pub const UPDATE_ID: &str = "update";
pub const EQUATION_ID: &str = "equation";
const FILTER_SELECTOR: &str = ".filter";

/// Filter checkboxes (`.filter`, grouped by `data-key`), read live
pub struct DomFilterSource {
    document: Document,
}

impl DomFilterSource {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl FilterSource for DomFilterSource {
    fn controls(&self) -> Vec<FilterControl> {
        filter_inputs(&self.document)
            .into_iter()
            .filter_map(|input| {
                let key = input.dataset().get("key")?;
                Some(FilterControl::new(key, input.value(), input.checked()))
            })
            .collect()
    }
}

fn filter_inputs(document: &Document) -> Vec<HtmlInputElement> {
    let Ok(nodes) = document.query_selector_all(FILTER_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// Equation text, alerts and the Y selector
pub struct DomSurface {
    equation: HtmlElement,
    y_select: HtmlSelectElement,
}

impl DomSurface {
    pub fn new(document: &Document) -> ExplorerResult<Self> {
        Ok(Self {
            equation: element(document, EQUATION_ID)?,
            y_select: element(document, Y_COLUMN_ID)?,
        })
    }

    fn alert(message: &str) {
        let shown = window().and_then(|w| w.alert_with_message(message).map_err(ExplorerError::from));
        if let Err(e) = shown {
            log::error!("Could not show alert: {e}");
        }
    }
}

impl ControlSurface for DomSurface {
    fn show_equation(&mut self, text: &str) {
        self.equation.set_text_content(Some(text));
    }

    fn notify_error(&mut self, message: &str) {
        Self::alert(message);
    }

    fn show_point_detail(&mut self, _detail: &PointDetail, text: &str) {
        Self::alert(text);
    }

    fn set_y_axis_enabled(&mut self, enabled: bool) {
        self.y_select.set_disabled(!enabled);
    }
}

/// Fill both axis selectors from the column list and select the state's
/// initial columns
pub fn populate_columns(state: &QueryState) -> ExplorerResult<()> {
    let document = document()?;
    for (id, selected) in [(X_COLUMN_ID, &state.x_column), (Y_COLUMN_ID, &state.y_column)] {
        let select: HtmlSelectElement = element(&document, id)?;
        for column in &state.columns {
            let option = document.create_element("option")?;
            option.set_attribute("value", column)?;
            option.set_text_content(Some(column));
            select.append_child(&option)?;
        }
        select.set_value(selected);
    }
    Ok(())
}

/// Register listeners for every control on the page. Each text input gets
/// its own debounce gate.
pub fn bind_controls(id: Uuid, debounce_ms: u32) -> ExplorerResult<()> {
    let document = document()?;

    bind_select(&document, X_COLUMN_ID, id, |v| Some(StateUpdate::XColumn(v)))?;
    bind_select(&document, Y_COLUMN_ID, id, |v| Some(StateUpdate::YColumn(v)))?;
    bind_select(&document, DEGREE_ID, id, |v| match v.parse::<u8>() {
        Ok(degree) => Some(StateUpdate::Degree(degree)),
        Err(_) => {
            log::warn!("Ignoring degree {v:?}");
            None
        }
    })?;
    bind_select(&document, GRAPH_TYPE_ID, id, |v| match v.parse::<GraphType>() {
        Ok(graph_type) => Some(StateUpdate::GraphType(graph_type)),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    })?;

    bind_checkbox(&document, LOG_X_ID, id, StateUpdate::LogX)?;
    bind_checkbox(&document, LOG_Y_ID, id, StateUpdate::LogY)?;
    bind_checkbox(&document, GRID_ID, id, StateUpdate::ShowGrid)?;

    bind_text(&document, SEARCH_ID, id, debounce_ms, StateUpdate::Search)?;
    bind_text(&document, CAPACITY_MIN_ID, id, debounce_ms, StateUpdate::CapacityMin)?;
    bind_text(&document, CAPACITY_MAX_ID, id, debounce_ms, StateUpdate::CapacityMax)?;

    let update: HtmlElement = element(&document, UPDATE_ID)?;
    listen(&update, "click", move |_| fire(&id, ControlEvent::UpdateRequested))?;

    for input in filter_inputs(&document) {
        let checkbox = input.clone();
        listen(&input, "change", move |_| {
            let Some(key) = checkbox.dataset().get("key") else {
                return;
            };
            fire(
                &id,
                ControlEvent::FilterToggled {
                    key,
                    value: checkbox.value(),
                    checked: checkbox.checked(),
                },
            );
        })?;
    }

    Ok(())
}

fn bind_select(
    document: &Document,
    element_id: &str,
    id: Uuid,
    map: impl Fn(String) -> Option<StateUpdate> + 'static,
) -> ExplorerResult<()> {
    let select: HtmlSelectElement = element(document, element_id)?;
    let source = select.clone();
    listen(&select, "change", move |_| {
        if let Some(update) = map(source.value()) {
            fire(&id, ControlEvent::Field(update));
        }
    })
}

fn bind_checkbox(
    document: &Document,
    element_id: &str,
    id: Uuid,
    map: fn(bool) -> StateUpdate,
) -> ExplorerResult<()> {
    let input: HtmlInputElement = element(document, element_id)?;
    let source = input.clone();
    listen(&input, "change", move |_| {
        fire(&id, ControlEvent::Field(map(source.checked())));
    })
}

/// Text inputs fire on `change`, or debounced on every keystroke when the
/// gate is enabled
fn bind_text(
    document: &Document,
    element_id: &str,
    id: Uuid,
    debounce_ms: u32,
    map: fn(String) -> StateUpdate,
) -> ExplorerResult<()> {
    let input: HtmlInputElement = element(document, element_id)?;
    let source = input.clone();
    let gate = DebounceGate::new(debounce_ms);

    if !gate.is_enabled() {
        return listen(&input, "change", move |_| {
            fire(&id, ControlEvent::Field(map(source.value())));
        });
    }

    listen(&input, "input", move |_| {
        let token = gate.arm();
        let source = source.clone();
        let scheduled = schedule(gate.delay_ms(), move || {
            if token.is_current() {
                fire(&id, ControlEvent::Field(map(source.value())));
            }
        });
        if let Err(e) = scheduled {
            log::error!("Could not schedule debounced update: {e}");
        }
    })
}
