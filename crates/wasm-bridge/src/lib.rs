//! WASM bridge crate for the explorer
//! Owns the reactive controller and wires it to the page

pub mod controller;
pub mod debounce;
pub mod driver;
pub mod instance_manager;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use controller::{
    ControlSurface, ControllerPhase, CycleOutcome, PendingCycle, ReactiveController,
};
pub use debounce::{DebounceGate, DebounceToken};
pub use driver::{dispatch, run_cycle, SharedController};
pub use instance_manager::InstanceManager;

#[cfg(target_arch = "wasm32")]
pub use wasm_api::Explorer;

#[cfg(target_arch = "wasm32")]
mod wasm_api {
    use crate::browser::{
        bind_controls, fire, populate_columns, window, DomFilterSource, DomSurface, PlotlySink,
    };
    use crate::controller::ReactiveController;
    use crate::instance_manager::InstanceManager;
    use explorer_config::{ConfigManager, ConfigParser, ExplorerConfig};
    use explorer_data::{FetchClient, FilterCollector};
    use explorer_shared::{
        ControlEvent, ErrorResponse, ExplorerError, ExplorerResult, QueryState, StartupContext,
    };
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::sync::Arc;
    use uuid::Uuid;
    use wasm_bindgen::prelude::*;

    const CHART_ID: &str = "chart";

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
    }

    fn to_js_error(error: ExplorerError, operation: &str) -> JsValue {
        JsValue::from_str(
            &ErrorResponse::new(error)
                .with_context("explorer", operation)
                .to_json(),
        )
    }

    fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> ExplorerResult<T> {
        if value.is_undefined() || value.is_null() {
            return Ok(T::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| ExplorerError::InvalidConfig {
            message: e.to_string(),
            field: None,
        })
    }

    /// A config object, or config text in YAML, JSON or TOML
    fn config_from_js(value: JsValue) -> ExplorerResult<ExplorerConfig> {
        match value.as_string() {
            Some(text) => Ok(ConfigParser::parse_text(&text)?),
            None => from_js(value),
        }
    }

    #[wasm_bindgen]
    pub struct Explorer {
        instance_id: Uuid,
        config: Arc<ConfigManager>,
        usage_colors: BTreeMap<String, String>,
    }

    impl Explorer {
        fn build(startup: JsValue, config: JsValue) -> ExplorerResult<Explorer> {
            let context: StartupContext = from_js(startup)?;
            let config = Arc::new(ConfigManager::new(config_from_js(config)?)?);
            let current = config.current();

            // Fails harmlessly when a second explorer is created
            let _ = console_log::init_with_level(current.log_level());
            config.on_update(|event| {
                log::info!("Explorer config changed: {}", event.changed_sections.join(", "));
            });

            let base_url = window()?.location().href()?;
            let url = current.endpoint.resolve(&base_url)?;
            let client = Rc::new(FetchClient::with_timeout(url, current.endpoint.timeout_ms));

            let document = crate::browser::document()?;
            let state = QueryState::from_startup(&context, &current.defaults);
            populate_columns(&state)?;
            let surface = DomSurface::new(&document)?;

            let collector = FilterCollector::new(Box::new(DomFilterSource::new(document.clone())))
                .with_known_keys(context.filters.keys().cloned());

            // The sink needs the id for click forwarding, so the id is
            // chosen before the controller exists
            let instance_id = Uuid::new_v4();
            let controller = ReactiveController::new(
                state,
                collector,
                client,
                Box::new(PlotlySink::new(CHART_ID).with_point_clicks(instance_id)),
                Box::new(surface),
                config.clone(),
            );
            InstanceManager::register(instance_id, controller);

            if let Err(e) = bind_controls(instance_id, current.controller.debounce_ms) {
                InstanceManager::remove_instance(&instance_id);
                return Err(e);
            }

            log::info!(
                "Explorer {instance_id} ready with {} columns",
                context.columns.len()
            );
            fire(&instance_id, ControlEvent::Initial);

            Ok(Explorer {
                instance_id,
                config,
                usage_colors: context.usage_colors,
            })
        }

        pub fn instance_id(&self) -> Uuid {
            self.instance_id
        }
    }

    #[wasm_bindgen]
    impl Explorer {
        /// `startup` is the page's load-time payload (`columns`,
        /// `usage_colors`, `filters`). `config` is optional: an object, or
        /// YAML, JSON or TOML text.
        #[wasm_bindgen(constructor)]
        pub fn new(startup: JsValue, config: JsValue) -> Result<Explorer, JsValue> {
            Self::build(startup, config).map_err(|e| to_js_error(e, "new"))
        }

        /// Same as pressing the update button
        #[wasm_bindgen]
        pub fn update(&self) {
            fire(&self.instance_id, ControlEvent::UpdateRequested);
        }

        /// Swap in a new configuration. Theme, tooltip captions and the
        /// overlap policy apply from the next event; endpoint and debounce
        /// changes need a new explorer.
        #[wasm_bindgen]
        pub fn reconfigure(&self, config: JsValue) -> Result<(), JsValue> {
            config_from_js(config)
                .and_then(|config| Ok(self.config.update(config)?))
                .map_err(|e| to_js_error(e, "reconfigure"))
        }

        /// Return to an earlier accepted configuration
        #[wasm_bindgen]
        pub fn rollback_config(&self, steps: usize) -> Result<(), JsValue> {
            self.config
                .rollback(steps)
                .map_err(|e| to_js_error(e.into(), "rollback_config"))
        }

        /// Colour assigned to a building usage, if the page supplied one
        #[wasm_bindgen]
        pub fn usage_color(&self, usage: &str) -> Option<String> {
            self.usage_colors.get(usage).cloned()
        }

        /// Current query state as JSON
        #[wasm_bindgen]
        pub fn state_json(&self) -> Result<String, JsValue> {
            InstanceManager::with_instance(&self.instance_id, |controller| {
                serde_json::to_string(controller.state()).map_err(ExplorerError::from)
            })
            .unwrap_or_else(|| {
                Err(ExplorerError::Internal {
                    message: "Explorer instance not found".to_string(),
                })
            })
            .map_err(|e| to_js_error(e, "state_json"))
        }

        /// Unregister the controller. Listeners already bound become no-ops.
        #[wasm_bindgen]
        pub fn destroy(&self) {
            InstanceManager::remove_instance(&self.instance_id);
        }
    }
}
