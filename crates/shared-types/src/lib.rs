//! Shared types for the equipment explorer
//!
//! This crate contains every type that crosses a crate boundary: the user's
//! query selections, the wire request/response contract with the backend,
//! the renderable trace/layout pair, and the error type. Nothing in here
//! performs I/O.

pub mod errors;
pub mod events;
pub mod filters;
pub mod layout;
pub mod point;
pub mod query_state;
pub mod request;
pub mod response;
pub mod trace;

pub use errors::{ErrorResponse, ExplorerError, ExplorerResult, UNKNOWN_ERROR_MESSAGE};
pub use events::ControlEvent;
pub use filters::FilterGroup;
pub use layout::{Axis, Layout, Legend, LegendFont, Margin, RenderPlan, THEME_OWNED_KEYS};
pub use point::{display_value, PointDetail, PointSelection};
pub use query_state::{
    GraphType, QueryDefaults, QueryState, StartupContext, StateUpdate, StateValidationResult,
};
pub use request::QueryRequest;
pub use response::{ErrorBody, QueryResponse};
pub use trace::{TraceKind, TraceSpec};
