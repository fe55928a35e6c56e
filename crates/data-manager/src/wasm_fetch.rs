use crate::client::{decode_response, QueryClient, QueryFuture};
use explorer_shared::{ExplorerError, ExplorerResult, QueryRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

const TIMEOUT_MARKER: &str = "Request timeout";

/// Query client using the browser's fetch API
#[derive(Debug, Clone)]
pub struct FetchClient {
    url: String,
    timeout_ms: u32,
}

impl FetchClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, 30_000)
    }

    pub fn with_timeout(url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
        }
    }

    /// POST the payload and return (status, body text)
    async fn post_json(
        url: String,
        payload: String,
        timeout_ms: u32,
    ) -> ExplorerResult<(u16, String)> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&JsValue::from_str(&payload));

        // Abort controller backs the timeout
        let abort_controller = AbortController::new()?;
        let signal = abort_controller.signal();
        opts.set_signal(Some(&signal));

        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&url, &opts)?;

        let window = web_sys::window().ok_or_else(|| ExplorerError::JsInterop {
            message: "No window object available".to_string(),
        })?;

        let mut timer = None;
        let timeout_promise = js_sys::Promise::new(&mut |_, reject| {
            timer = Some(RequestTimer::arm(
                &window,
                abort_controller.clone(),
                reject,
                timeout_ms,
            ));
        });

        let fetch_promise = window.fetch_with_request(&request);
        let race = js_sys::Promise::race(&js_sys::Array::of2(&fetch_promise, &timeout_promise));

        let raced = JsFuture::from(race).await;
        drop(timer);
        let resp_value = raced.map_err(|e| map_fetch_rejection(e, timeout_ms))?;
        let resp: Response = resp_value.dyn_into()?;
        let status = resp.status();

        let text = JsFuture::from(resp.text()?)
            .await
            .map_err(|e| map_fetch_rejection(e, timeout_ms))?;

        Ok((status, text.as_string().unwrap_or_default()))
    }
}

impl QueryClient for FetchClient {
    fn send(&self, request: &QueryRequest) -> QueryFuture {
        let url = self.url.clone();
        let timeout_ms = self.timeout_ms;
        let payload = request.to_payload();

        Box::pin(async move {
            let payload = payload?;
            log::debug!("POST {url} ({} bytes)", payload.len());

            let (status, body) = Self::post_json(url, payload, timeout_ms).await?;
            decode_response(status, &body)
        })
    }
}

/// Aborts the request and rejects with the timeout marker when it fires.
/// Dropping it cancels the timer.
struct RequestTimer {
    window: web_sys::Window,
    handle: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

impl RequestTimer {
    fn arm(
        window: &web_sys::Window,
        abort_controller: AbortController,
        reject: js_sys::Function,
        timeout_ms: u32,
    ) -> Self {
        let callback = Closure::once(move || {
            abort_controller.abort();
            let _ = reject.call1(&JsValue::null(), &JsValue::from_str(TIMEOUT_MARKER));
        });

        let handle = match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            timer_delay(timeout_ms),
        ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not arm request timeout: {e:?}");
                None
            }
        };

        Self {
            window: window.clone(),
            handle,
            _callback: callback,
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Browsers treat delays above `i32::MAX` as zero
fn timer_delay(timeout_ms: u32) -> i32 {
    i32::try_from(timeout_ms).unwrap_or(i32::MAX)
}

fn map_fetch_rejection(error: JsValue, timeout_ms: u32) -> ExplorerError {
    if error.as_string().as_deref() == Some(TIMEOUT_MARKER) {
        return ExplorerError::Timeout {
            message: TIMEOUT_MARKER.to_string(),
            duration_ms: u64::from(timeout_ms),
        };
    }

    let message = error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"));
    ExplorerError::transport(message)
}
