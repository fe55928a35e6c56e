//! Integration tests for the reactive controller

use explorer_config::{ConfigManager, ExplorerConfig, OverlapPolicy};
use explorer_data::{decode_response, FilterCollector, FilterRegistry, QueryClient, QueryFuture};
use explorer_renderer::{ChartSink, MemorySink};
use explorer_shared::{
    ControlEvent, ExplorerError, ExplorerResult, GraphType, Layout, PointDetail, PointSelection,
    QueryRequest, QueryResponse, QueryState, StartupContext, StateUpdate, TraceSpec,
};
use explorer_wasm::{
    dispatch, ControlSurface, ControllerPhase, CycleOutcome, InstanceManager, ReactiveController,
    SharedController,
};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

type Reply = oneshot::Sender<ExplorerResult<QueryResponse>>;

/// Client whose responses are released by the test, in any order
#[derive(Default)]
struct ScriptedClient {
    sent: RefCell<Vec<(QueryRequest, Option<Reply>)>>,
}

impl ScriptedClient {
    fn respond(&self, index: usize, result: ExplorerResult<QueryResponse>) {
        let reply = self.sent.borrow_mut()[index].1.take().expect("already answered");
        reply.send(result).expect("cycle dropped");
    }

    fn request(&self, index: usize) -> QueryRequest {
        self.sent.borrow()[index].0.clone()
    }

    fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl QueryClient for ScriptedClient {
    fn send(&self, request: &QueryRequest) -> QueryFuture {
        let (tx, rx) = oneshot::channel();
        self.sent.borrow_mut().push((request.clone(), Some(tx)));
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(ExplorerError::transport("request dropped")))
        })
    }
}

struct SharedSink(Rc<RefCell<MemorySink>>);

impl ChartSink for SharedSink {
    fn render(&mut self, traces: &[TraceSpec], layout: &Layout) -> ExplorerResult<()> {
        self.0.borrow_mut().render(traces, layout)
    }
}

struct RejectingSink;

impl ChartSink for RejectingSink {
    fn render(&mut self, _traces: &[TraceSpec], _layout: &Layout) -> ExplorerResult<()> {
        Err(ExplorerError::render("malformed trace"))
    }
}

#[derive(Default)]
struct SurfaceLog {
    equations: Vec<String>,
    errors: Vec<String>,
    details: Vec<(PointDetail, String)>,
    y_enabled: Vec<bool>,
}

struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

impl ControlSurface for RecordingSurface {
    fn show_equation(&mut self, text: &str) {
        self.0.borrow_mut().equations.push(text.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.0.borrow_mut().errors.push(message.to_string());
    }

    fn show_point_detail(&mut self, detail: &PointDetail, text: &str) {
        self.0
            .borrow_mut()
            .details
            .push((detail.clone(), text.to_string()));
    }

    fn set_y_axis_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().y_enabled.push(enabled);
    }
}

struct Harness {
    controller: SharedController,
    client: Rc<ScriptedClient>,
    sink: Rc<RefCell<MemorySink>>,
    surface: Rc<RefCell<SurfaceLog>>,
    config: Arc<ConfigManager>,
    outcomes: Rc<RefCell<Vec<CycleOutcome>>>,
    pool: LocalPool,
}

impl Harness {
    fn new(overlap: OverlapPolicy) -> Self {
        Self::with_sink(overlap, None)
    }

    fn with_sink(overlap: OverlapPolicy, sink: Option<Box<dyn ChartSink>>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut filters = BTreeMap::new();
        filters.insert(
            "建物用途".to_string(),
            vec!["事務所".to_string(), "病院".to_string()],
        );
        filters.insert("設計会社".to_string(), Vec::new());
        let context = StartupContext {
            columns: vec![
                "階数".to_string(),
                "延床面積 [㎡]".to_string(),
                "合計設備容量 [kVA]".to_string(),
            ],
            usage_colors: BTreeMap::new(),
            filters,
        };

        let mut config = ExplorerConfig::default();
        config.controller.overlap = overlap;
        let config = Arc::new(ConfigManager::new(config).unwrap());

        let client = Rc::new(ScriptedClient::default());
        let memory = Rc::new(RefCell::new(MemorySink::new()));
        let surface = Rc::new(RefCell::new(SurfaceLog::default()));

        let collector = FilterCollector::new(Box::new(FilterRegistry::from_startup(&context)))
            .with_known_keys(context.filters.keys().cloned());
        let controller = ReactiveController::new(
            QueryState::from_startup(&context, &config.current().defaults),
            collector,
            client.clone(),
            sink.unwrap_or_else(|| Box::new(SharedSink(memory.clone())) as Box<dyn ChartSink>),
            Box::new(RecordingSurface(surface.clone())),
            config.clone(),
        );

        Self {
            controller: Rc::new(RefCell::new(controller)),
            client,
            sink: memory,
            surface,
            config,
            outcomes: Rc::new(RefCell::new(Vec::new())),
            pool: LocalPool::new(),
        }
    }

    /// Returns whether the event started a cycle
    fn fire(&mut self, event: ControlEvent) -> bool {
        let Some(cycle) = dispatch(&self.controller, event) else {
            return false;
        };
        let outcomes = self.outcomes.clone();
        self.pool
            .spawner()
            .spawn_local(cycle.map(move |outcome| outcomes.borrow_mut().push(outcome)))
            .unwrap();
        self.pool.run_until_stalled();
        true
    }

    fn respond(&mut self, index: usize, result: ExplorerResult<QueryResponse>) {
        self.client.respond(index, result);
        self.pool.run_until_stalled();
    }

    fn rendered_names(&self) -> Vec<String> {
        self.sink
            .borrow()
            .current_traces()
            .unwrap_or_default()
            .iter()
            .map(|t| t.name().unwrap_or_default().to_string())
            .collect()
    }
}

fn response(name: &str, equation: &str) -> QueryResponse {
    serde_json::from_value(json!({
        "traces": [{"type": "scatter", "name": name, "x": [1, 2], "y": [3, 4]}],
        "equation": equation
    }))
    .unwrap()
}

#[test]
fn test_initial_load_renders() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    assert!(harness.fire(ControlEvent::Initial));
    assert_eq!(
        *harness.controller.borrow().phase(),
        ControllerPhase::Fetching { seq: 1 }
    );

    harness.respond(0, Ok(response("base", "y = 2x + 1")));

    assert_eq!(harness.rendered_names(), vec!["base"]);
    assert_eq!(harness.surface.borrow().equations, vec!["y = 2x + 1"]);
    assert_eq!(harness.surface.borrow().y_enabled, vec![true]);
    assert_eq!(*harness.controller.borrow().phase(), ControllerPhase::Idle);
    assert_eq!(*harness.outcomes.borrow(), vec![CycleOutcome::Rendered]);
}

#[test]
fn test_out_of_order_completion_keeps_latest() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::Initial);
    harness.fire(ControlEvent::Field(StateUpdate::XColumn("階数".to_string())));
    assert_eq!(harness.client.sent_count(), 2);

    harness.respond(1, Ok(response("second", "eq 2")));
    harness.respond(0, Ok(response("first", "eq 1")));

    assert_eq!(harness.rendered_names(), vec!["second"]);
    assert_eq!(harness.sink.borrow().render_count(), 1);
    assert_eq!(harness.surface.borrow().equations, vec!["eq 2"]);
    assert_eq!(
        *harness.outcomes.borrow(),
        vec![
            CycleOutcome::Rendered,
            CycleOutcome::Discarded { seq: 1, latest: 2 }
        ]
    );
}

#[test]
fn test_stale_failure_is_silent() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::Initial);
    harness.fire(ControlEvent::UpdateRequested);

    harness.respond(0, Err(ExplorerError::transport("connection reset")));
    assert!(harness.surface.borrow().errors.is_empty());

    harness.respond(1, Ok(response("fresh", "")));
    assert_eq!(harness.rendered_names(), vec!["fresh"]);
}

#[test]
fn test_server_error_keeps_last_chart() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::Initial);
    harness.respond(0, Ok(response("good", "y = x")));

    harness.fire(ControlEvent::Field(StateUpdate::LogX(true)));
    let state_before = harness.controller.borrow().state().clone();
    harness.respond(1, decode_response(500, "{}"));

    assert_eq!(harness.rendered_names(), vec!["good"]);
    assert_eq!(harness.sink.borrow().render_count(), 1);
    assert_eq!(harness.surface.borrow().equations, vec!["y = x"]);
    assert_eq!(
        harness.surface.borrow().errors,
        vec!["Data fetch error: unknown"]
    );
    assert_eq!(*harness.controller.borrow().state(), state_before);
    assert!(matches!(
        harness.controller.borrow().phase(),
        ControllerPhase::Failed { .. }
    ));

    // Failed accepts new triggers
    assert!(harness.fire(ControlEvent::UpdateRequested));
    harness.respond(2, Ok(response("recovered", "")));
    assert_eq!(harness.rendered_names(), vec!["recovered"]);
}

#[test]
fn test_render_error_is_not_user_facing() {
    let mut harness =
        Harness::with_sink(OverlapPolicy::Concurrent, Some(Box::new(RejectingSink)));
    harness.fire(ControlEvent::Initial);
    harness.respond(0, Ok(response("base", "eq")));

    assert!(harness.surface.borrow().errors.is_empty());
    assert!(harness.surface.borrow().equations.is_empty());
    assert!(matches!(
        harness.outcomes.borrow()[0],
        CycleOutcome::Failed(ExplorerError::Render { .. })
    ));
}

#[test]
fn test_histogram_preserves_y_column() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    let y_before = harness.controller.borrow().state().y_column.clone();

    harness.fire(ControlEvent::Field(StateUpdate::GraphType(GraphType::Histogram)));
    assert_eq!(harness.controller.borrow().state().y_column, y_before);
    assert_eq!(harness.client.request(0).y_col, y_before);
    assert_eq!(harness.client.request(0).graph_type, GraphType::Histogram);

    harness.fire(ControlEvent::Field(StateUpdate::GraphType(GraphType::Scatter)));
    assert_eq!(harness.surface.borrow().y_enabled, vec![false, true]);
    assert_eq!(harness.controller.borrow().state().y_column, y_before);
}

#[test]
fn test_every_filter_key_is_sent() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::FilterToggled {
        key: "建物用途".to_string(),
        value: "病院".to_string(),
        checked: true,
    });

    let payload: serde_json::Value =
        serde_json::from_str(&harness.client.request(0).to_payload().unwrap()).unwrap();
    assert_eq!(
        payload["filters"],
        json!({"建物用途": ["病院"], "設計会社": []})
    );
    assert!(harness
        .controller
        .borrow()
        .state()
        .filters
        .selected("建物用途")
        .is_some_and(|s| s.contains("病院")));
}

#[test]
fn test_coalesce_issues_one_follow_up() {
    let mut harness = Harness::new(OverlapPolicy::Coalesce);
    assert!(harness.fire(ControlEvent::Initial));
    for text in ["タ", "タワ", "タワー"] {
        assert!(!harness.fire(ControlEvent::Field(StateUpdate::Search(text.to_string()))));
    }
    assert_eq!(harness.client.sent_count(), 1);

    harness.respond(0, Ok(response("first", "")));
    assert_eq!(harness.client.sent_count(), 2);
    assert_eq!(harness.client.request(1).search, "タワー");

    harness.respond(1, Ok(response("second", "")));
    assert_eq!(harness.client.sent_count(), 2);
    assert_eq!(harness.rendered_names(), vec!["second"]);
    assert_eq!(*harness.controller.borrow().phase(), ControllerPhase::Idle);
}

#[test]
fn test_point_click_surfaces_detail() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    let selection = PointSelection {
        x: json!(120),
        y: json!(45),
        custom_data: Some(vec![
            json!("Bldg-7"),
            json!("renovation"),
            json!("Acme Design"),
        ]),
    };

    assert!(!harness.fire(ControlEvent::PointClicked(selection)));

    let surface = harness.surface.borrow();
    let (detail, text) = &surface.details[0];
    assert_eq!(detail.label, "Bldg-7");
    assert_eq!(detail.purpose, "renovation");
    assert_eq!(detail.designer, "Acme Design");
    assert_eq!(detail.x_value, "120");
    assert_eq!(detail.y_value, "45");
    assert_eq!(
        *text,
        "Bldg-7\n発行目的: renovation\n設計会社: Acme Design\n延床面積 [㎡]: 120\n合計設備容量 [kVA]: 45"
    );
    assert_eq!(harness.client.sent_count(), 0);
}

#[test]
fn test_point_without_custom_data_is_ignored() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::PointClicked(PointSelection {
        x: json!(3),
        y: json!(17),
        custom_data: None,
    }));
    assert!(harness.surface.borrow().details.is_empty());
}

#[test]
fn test_config_update_applies_to_next_event() {
    let mut harness = Harness::new(OverlapPolicy::Concurrent);
    harness.fire(ControlEvent::Initial);

    let mut updated = (*harness.config.current()).clone();
    updated.version = "1.1.0".to_string();
    updated.controller.overlap = OverlapPolicy::Coalesce;
    updated.tooltip.purpose = "Purpose".to_string();
    harness.config.update(updated).unwrap();

    // Coalesce now holds back triggers while cycle #1 is in flight
    assert!(!harness.fire(ControlEvent::UpdateRequested));
    assert_eq!(harness.client.sent_count(), 1);

    harness.fire(ControlEvent::PointClicked(PointSelection {
        x: json!(1),
        y: json!(2),
        custom_data: Some(vec![json!("A"), json!("office"), json!("B")]),
    }));
    assert!(harness.surface.borrow().details[0]
        .1
        .contains("Purpose: office"));

    // Rolling back restores the concurrent policy
    harness.respond(0, Ok(response("first", "")));
    assert_eq!(harness.client.sent_count(), 2);
    harness.config.rollback(1).unwrap();
    assert!(harness.fire(ControlEvent::UpdateRequested));
    assert!(harness.fire(ControlEvent::UpdateRequested));
    assert_eq!(harness.client.sent_count(), 4);
}

#[test]
fn test_instance_registry() {
    InstanceManager::clear_all();
    let harness = Harness::new(OverlapPolicy::Concurrent);
    let controller = Rc::try_unwrap(harness.controller)
        .ok()
        .map(RefCell::into_inner)
        .unwrap();

    let id = InstanceManager::create_instance(controller);
    assert!(InstanceManager::instance_exists(&id));
    assert_eq!(
        InstanceManager::with_instance(&id, |c| c.latest_issued()),
        Some(0)
    );

    let shared = InstanceManager::get(&id).unwrap();
    assert!(dispatch(&shared, ControlEvent::UpdateRequested).is_some());
    assert_eq!(harness.client.sent_count(), 0);

    InstanceManager::remove_instance(&id);
    assert!(!InstanceManager::instance_exists(&id));
    assert_eq!(InstanceManager::instance_count(), 0);
}
