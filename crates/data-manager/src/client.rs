//! The network boundary: one request in, one response or error out

use explorer_shared::{ErrorBody, ExplorerError, ExplorerResult, QueryRequest, QueryResponse};
use futures::future::LocalBoxFuture;

pub type QueryFuture = LocalBoxFuture<'static, ExplorerResult<QueryResponse>>;

/// Performs one network exchange per call. No retry, caching or
/// deduplication; the controller decides what to do with overlapping calls.
pub trait QueryClient {
    fn send(&self, request: &QueryRequest) -> QueryFuture;
}

/// Turn an HTTP status and body into a response or a typed error.
///
/// Only a 200 body is read as chart data. Any other status yields a server
/// error carrying the body's `error` message when there is one.
pub fn decode_response(status: u16, body: &str) -> ExplorerResult<QueryResponse> {
    if status == 200 {
        return serde_json::from_str(body).map_err(|e| ExplorerError::DataParse {
            message: format!("Invalid query response: {e}"),
        });
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error);
    log::warn!("Query failed with status {status}");
    Err(ExplorerError::server(status, message))
}
