//! Reactive controller: owns the query state and runs query/render cycles
//!
//! Every trigger issues a request tagged with a monotonically increasing
//! sequence number. A completion is applied only when its sequence number is
//! the latest one issued; anything older is dropped without touching the
//! chart, the equation text or the error surface.

use explorer_config::{ConfigManager, ExplorerConfig, OverlapPolicy};
use explorer_data::{FilterCollector, QueryClient, QueryFuture, RequestBuilder};
use explorer_renderer::{ChartSink, ResponseTransformer};
use explorer_shared::{
    ControlEvent, ExplorerError, ExplorerResult, PointDetail, QueryRequest, QueryResponse,
    QueryState, StateUpdate,
};
use std::rc::Rc;
use std::sync::Arc;

/// Page elements the controller talks to besides the chart itself
pub trait ControlSurface {
    fn show_equation(&mut self, text: &str);

    /// Blocking notification is acceptable
    fn notify_error(&mut self, message: &str);

    fn show_point_detail(&mut self, detail: &PointDetail, text: &str);

    fn set_y_axis_enabled(&mut self, enabled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Fetching { seq: u64 },
    /// Last cycle failed; accepts new triggers like `Idle`
    Failed { message: String },
}

/// Result of applying one completion
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Rendered,
    Failed(ExplorerError),
    /// A newer request was issued after this one
    Discarded { seq: u64, latest: u64 },
}

/// A request that has been issued but not yet sent
pub struct PendingCycle {
    pub seq: u64,
    pub request: QueryRequest,
    client: Rc<dyn QueryClient>,
}

impl PendingCycle {
    pub fn send(&self) -> QueryFuture {
        self.client.send(&self.request)
    }
}

impl std::fmt::Debug for PendingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCycle")
            .field("seq", &self.seq)
            .field("request", &self.request)
            .finish()
    }
}

pub struct ReactiveController {
    state: QueryState,
    collector: FilterCollector,
    transformer: ResponseTransformer,
    client: Rc<dyn QueryClient>,
    sink: Box<dyn ChartSink>,
    surface: Box<dyn ControlSurface>,
    config: Arc<ConfigManager>,
    /// Snapshot the transformer was built from
    applied: Arc<ExplorerConfig>,
    latest_issued: u64,
    phase: ControllerPhase,
    follow_up: bool,
}

impl ReactiveController {
    pub fn new(
        state: QueryState,
        collector: FilterCollector,
        client: Rc<dyn QueryClient>,
        sink: Box<dyn ChartSink>,
        surface: Box<dyn ControlSurface>,
        config: Arc<ConfigManager>,
    ) -> Self {
        let applied = config.current();
        Self {
            state,
            collector,
            transformer: ResponseTransformer::new(applied.theme.clone(), applied.tooltip.clone()),
            client,
            sink,
            surface,
            config,
            applied,
            latest_issued: 0,
            phase: ControllerPhase::Idle,
            follow_up: false,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn phase(&self) -> &ControllerPhase {
        &self.phase
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    /// Apply an event to the state. Returns the cycle to run, if any.
    pub fn handle_event(&mut self, event: ControlEvent) -> Option<PendingCycle> {
        self.refresh_config();
        match event {
            ControlEvent::Initial => {
                self.surface.set_y_axis_enabled(self.state.y_axis_enabled());
                self.begin_cycle()
            }
            ControlEvent::Field(update) => {
                let graph_changed = matches!(update, StateUpdate::GraphType(_));
                self.state.set(update);
                if graph_changed {
                    self.surface.set_y_axis_enabled(self.state.y_axis_enabled());
                }
                self.begin_cycle()
            }
            ControlEvent::FilterToggled {
                key,
                value,
                checked,
            } => {
                self.collector.toggle(&key, &value, checked);
                self.begin_cycle()
            }
            ControlEvent::UpdateRequested => self.begin_cycle(),
            ControlEvent::PointClicked(selection) => {
                if let Some(detail) = PointDetail::from_selection(&selection, &self.state) {
                    let text = self.transformer.labels().describe_point(&detail);
                    self.surface.show_point_detail(&detail, &text);
                }
                None
            }
        }
    }

    /// Pick up a configuration swapped in since the last event. Cycles
    /// already in flight render with the new theme.
    fn refresh_config(&mut self) {
        let current = self.config.current();
        if Arc::ptr_eq(&current, &self.applied) {
            return;
        }
        log::debug!("Controller now on config version {}", current.version);
        self.transformer = ResponseTransformer::new(current.theme.clone(), current.tooltip.clone());
        self.applied = current;
    }

    /// Collect filters, snapshot the state and issue a new sequence number
    fn begin_cycle(&mut self) -> Option<PendingCycle> {
        if self.applied.controller.overlap == OverlapPolicy::Coalesce
            && matches!(self.phase, ControllerPhase::Fetching { .. })
        {
            self.follow_up = true;
            log::debug!("Cycle in flight, follow-up scheduled");
            return None;
        }

        let filters = self.collector.collect();
        self.state.set(StateUpdate::Filters(filters.clone()));

        for warning in self.state.validate(self.applied.defaults.max_degree).warnings {
            log::warn!("{warning}");
        }

        let request = RequestBuilder::build(&self.state, &filters);
        self.latest_issued += 1;
        let seq = self.latest_issued;
        self.phase = ControllerPhase::Fetching { seq };

        log::debug!(
            "Issuing cycle #{seq} ({} bytes)",
            request.to_payload().map(|p| p.len()).unwrap_or(0)
        );

        Some(PendingCycle {
            seq,
            request,
            client: self.client.clone(),
        })
    }

    /// Apply the completion of cycle `seq`
    pub fn complete_cycle(
        &mut self,
        seq: u64,
        result: ExplorerResult<QueryResponse>,
    ) -> CycleOutcome {
        if seq != self.latest_issued {
            log::debug!(
                "Discarding response #{seq}, latest is #{}",
                self.latest_issued
            );
            return CycleOutcome::Discarded {
                seq,
                latest: self.latest_issued,
            };
        }
        self.refresh_config();

        let response = match result {
            Ok(response) => response,
            Err(err) => return self.fail(err),
        };

        let plan = self.transformer.transform(&response, &self.state);
        if let Err(err) = self.sink.render_plan(&plan) {
            return self.fail(err);
        }
        self.surface.show_equation(&plan.equation_text);
        self.phase = ControllerPhase::Idle;

        log::info!("Rendered cycle #{seq} ({} traces)", plan.traces.len());
        CycleOutcome::Rendered
    }

    /// The coalesced follow-up cycle, once the latest cycle has completed
    pub fn take_follow_up(&mut self) -> Option<PendingCycle> {
        if !self.follow_up || matches!(self.phase, ControllerPhase::Fetching { .. }) {
            return None;
        }
        self.follow_up = false;
        self.begin_cycle()
    }

    /// State and chart stay as they were
    fn fail(&mut self, err: ExplorerError) -> CycleOutcome {
        let message = err.to_string();
        if err.is_user_facing() {
            log::warn!("{message}");
            self.surface.notify_error(&message);
        } else {
            log::error!("{message}");
        }
        self.phase = ControllerPhase::Failed { message };
        CycleOutcome::Failed(err)
    }
}
