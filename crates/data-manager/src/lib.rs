//! Data crate for the explorer
//! Filter collection, request assembly and the network boundary

pub mod client;
pub mod filters;
pub mod request;

#[cfg(not(target_arch = "wasm32"))]
pub mod http_client;
#[cfg(target_arch = "wasm32")]
pub mod wasm_fetch;

pub use client::{decode_response, QueryClient, QueryFuture};
pub use filters::{FilterCollector, FilterControl, FilterRegistry, FilterSource};
pub use request::RequestBuilder;

#[cfg(not(target_arch = "wasm32"))]
pub use http_client::HttpClient;
#[cfg(target_arch = "wasm32")]
pub use wasm_fetch::FetchClient;
