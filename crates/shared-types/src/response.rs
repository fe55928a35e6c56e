//! Backend response bodies

use crate::trace::TraceSpec;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Successful (status 200) query response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// `null` reads as no traces
    #[serde(default, deserialize_with = "null_as_empty")]
    pub traces: Vec<TraceSpec>,
    #[serde(default)]
    pub highlight: Option<Vec<TraceSpec>>,
    /// Fitted curve; the backend sends `null` when no fit was possible
    #[serde(default)]
    pub fit: Option<TraceSpec>,
    #[serde(default)]
    pub xaxis: Option<Map<String, Value>>,
    #[serde(default)]
    pub yaxis: Option<Map<String, Value>>,
    #[serde(default)]
    pub equation: Option<String>,
    #[serde(default)]
    pub layout: Option<Map<String, Value>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a non-200 response; only the message is meaningful
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scatter_response_with_null_fit() {
        let body = json!({
            "traces": [{"type": "scatter", "x": [1.0], "y": [2.0]}],
            "fit": null,
            "equation": "データ不足で近似不可",
            "highlight": [],
            "xaxis": {"title": "x", "type": "linear"},
            "yaxis": {"title": "y", "type": "log"},
            "layout": {"showlegend": true}
        });
        let response: QueryResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.traces.len(), 1);
        assert!(response.fit.is_none());
        assert_eq!(response.highlight.as_ref().map(Vec::len), Some(0));
        assert_eq!(response.yaxis.unwrap()["type"], json!("log"));
    }

    #[test]
    fn test_histogram_response_omits_optional_fields() {
        let response: QueryResponse =
            serde_json::from_value(json!({"traces": [{"type": "bar"}]})).unwrap();
        assert!(response.highlight.is_none());
        assert!(response.equation.is_none());
    }

    #[test]
    fn test_null_traces_read_as_empty() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"traces": null, "equation": "y"}"#).unwrap();
        assert!(response.traces.is_empty());
        assert_eq!(response.equation.as_deref(), Some("y"));
    }

    #[test]
    fn test_empty_error_body() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error, None);
    }
}
