use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /models/{owner}/{name}/predictions` and `POST /predictions`.
///
/// `version` is only sent for pinned model versions; the official-model
/// endpoint infers it from the path.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub input: Map<String, Value>,
}

impl PredictionRequest {
    pub fn new(input: Map<String, Value>) -> Self {
        Self {
            version: None,
            input,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionUrls {
    pub get: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<String>,
}

/// A prediction as returned by every prediction endpoint.
///
/// `output` is model specific: image models answer with a single URL or an
/// array of URLs. It stays a `Value` so unknown shapes still deserialise.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,

    /// Fields we do not model (metrics, timestamps, …).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Prediction {
    /// First URL in `output`, whether the model returned a string or a list.
    pub fn first_output_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            Value::String(url) => Some(url.as_str()),
            Value::Array(items) => items.iter().find_map(Value::as_str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn prediction(output: Value) -> Prediction {
        serde_json::from_value(json!({
            "id": "p1",
            "status": "succeeded",
            "output": output,
            "metrics": { "predict_time": 3.2 }
        }))
        .unwrap()
    }

    #[test]
    fn output_may_be_string_or_list() {
        assert_eq!(
            prediction(json!("https://replicate.delivery/a.webp")).first_output_url(),
            Some("https://replicate.delivery/a.webp")
        );
        assert_eq!(
            prediction(json!(["https://replicate.delivery/b.png", "https://replicate.delivery/c.png"]))
                .first_output_url(),
            Some("https://replicate.delivery/b.png")
        );
        assert_eq!(prediction(json!({ "weird": true })).first_output_url(), None);
    }

    #[test]
    fn unknown_fields_are_kept() {
        let p = prediction(Value::Null);
        assert!(p.extra.contains_key("metrics"));
        assert_eq!(p.first_output_url(), None);
    }

    #[test]
    fn version_is_omitted_unless_pinned() {
        let body = serde_json::to_value(PredictionRequest::new(Map::new())).unwrap();
        assert_eq!(body, json!({ "input": {} }));

        let body = serde_json::to_value(PredictionRequest::new(Map::new()).with_version("abc")).unwrap();
        assert_eq!(body, json!({ "version": "abc", "input": {} }));
    }
}
