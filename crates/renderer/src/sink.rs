//! Chart sink: the rendering target a render plan is handed to

use explorer_shared::{ExplorerResult, Layout, RenderPlan, TraceSpec};

/// Rendering target. `render` sets the current view and is idempotent:
/// rendering the same traces and layout twice shows the same chart.
pub trait ChartSink {
    fn render(&mut self, traces: &[TraceSpec], layout: &Layout) -> ExplorerResult<()>;

    fn render_plan(&mut self, plan: &RenderPlan) -> ExplorerResult<()> {
        self.render(&plan.traces, &plan.layout)
    }
}

/// In-memory sink that keeps the last view it was given.
/// Used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    current: Option<(Vec<TraceSpec>, Layout)>,
    render_count: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_traces(&self) -> Option<&[TraceSpec]> {
        self.current.as_ref().map(|(traces, _)| traces.as_slice())
    }

    pub fn current_layout(&self) -> Option<&Layout> {
        self.current.as_ref().map(|(_, layout)| layout)
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }
}

impl ChartSink for MemorySink {
    fn render(&mut self, traces: &[TraceSpec], layout: &Layout) -> ExplorerResult<()> {
        self.current = Some((traces.to_vec(), layout.clone()));
        self.render_count += 1;
        Ok(())
    }
}
