//! Browser wiring: DOM controls, the Plotly chart and page notifications

pub mod dom;
pub mod plotly;

use crate::driver::dispatch;
use crate::instance_manager::InstanceManager;
use explorer_shared::{ControlEvent, ExplorerError, ExplorerResult};
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use dom::{bind_controls, populate_columns, DomFilterSource, DomSurface};
pub use plotly::{bind_point_clicks, PlotlySink};

/// Deliver an event to a registered controller and spawn its cycle
pub fn fire(id: &Uuid, event: ControlEvent) {
    let Some(controller) = InstanceManager::get(id) else {
        log::warn!("Explorer instance {id} not found");
        return;
    };

    if let Some(cycle) = dispatch(&controller, event) {
        wasm_bindgen_futures::spawn_local(async move {
            cycle.await;
        });
    }
}

/// Run `f` once after `delay_ms`
pub(crate) fn schedule(delay_ms: u32, f: impl FnOnce() + 'static) -> ExplorerResult<()> {
    let window = window()?;
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    )?;
    Ok(())
}

pub(crate) fn window() -> ExplorerResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| ExplorerError::JsInterop {
        message: "No window object available".to_string(),
    })
}

pub(crate) fn document() -> ExplorerResult<web_sys::Document> {
    window()?.document().ok_or_else(|| ExplorerError::JsInterop {
        message: "No document available".to_string(),
    })
}

/// Look up an element by id and cast it
pub(crate) fn element<T: JsCast>(document: &web_sys::Document, id: &str) -> ExplorerResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ExplorerError::JsInterop {
            message: format!("Element #{id} not found"),
        })?
        .dyn_into::<T>()
        .map_err(|_| ExplorerError::JsInterop {
            message: format!("Element #{id} has an unexpected type"),
        })
}

/// Attach a listener for the lifetime of the page
pub(crate) fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> ExplorerResult<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
