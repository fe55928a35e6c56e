//! Response-to-chart transformation for the explorer
//!
//! This crate turns a backend query response into the final ordered trace
//! list and themed layout, and defines the sink those are handed to. It never
//! touches the network.

pub mod sink;
pub mod theme;
pub mod tooltip;
pub mod transform;

pub use sink::{ChartSink, MemorySink};
pub use theme::Theme;
pub use tooltip::TooltipLabels;
pub use transform::ResponseTransformer;
