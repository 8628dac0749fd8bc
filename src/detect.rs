//! Version and front-end detection.
//!
//! Pure inspection of headers and body shape — no I/O, and it never fails:
//! the platform is assumed to always send one of the known shapes, so
//! unknown markers fall back to generation 1 and a best-guess front end.

use serde_json::Value;

use crate::adapter::Headers;
use crate::conversation::{ApiVersion, FrontEnd};

/// Generation marker header. Value `"2"` selects generation 2; the header's
/// request value is echoed back on the response when present.
pub const API_VERSION_HEADER: &str = "assistant-api-version";

/// Agent build label the platform attaches; logged, never interpreted.
pub const AGENT_VERSION_HEADER: &str = "agent-version-label";

/// Decide `(ApiVersion, FrontEnd)` for an inbound call.
///
/// Precedence, first match wins:
/// 1. marker header `"2"`, or embedded `originalRequest.version == 2` ⇒ V2
/// 2. otherwise V1
/// 3. front end: a top-level `inputs` array ⇒ direct; a `result` /
///    `queryResult` envelope ⇒ NLU; anything else ⇒ NLU (best guess).
pub fn detect(headers: &Headers, body: &Value) -> (ApiVersion, FrontEnd) {
    let version = detect_version(headers, body);
    let front_end = detect_front_end(body);
    tracing::debug!(?version, ?front_end, "detected wire format");
    (version, front_end)
}

fn detect_version(headers: &Headers, body: &Value) -> ApiVersion {
    if headers.get(API_VERSION_HEADER).map(str::trim) == Some("2") {
        return ApiVersion::V2;
    }
    if embedded_version_is_two(body) {
        return ApiVersion::V2;
    }
    ApiVersion::V1
}

/// `originalRequest.version` arrives as either the number `2` or the string
/// `"2"` depending on the agent runtime.
fn embedded_version_is_two(body: &Value) -> bool {
    match body.get("originalRequest").and_then(|o| o.get("version")) {
        Some(Value::Number(n)) => n.as_i64() == Some(2),
        Some(Value::String(s)) => s.trim() == "2",
        _ => false,
    }
}

fn detect_front_end(body: &Value) -> FrontEnd {
    if body.get("inputs").is_some_and(Value::is_array) {
        return FrontEnd::Direct;
    }
    if body.get("result").is_some() || body.get("queryResult").is_some() {
        return FrontEnd::Nlu;
    }
    FrontEnd::Nlu
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers_with(name: &str, value: &str) -> Headers {
        let mut h = Headers::new();
        h.insert(name, value);
        h
    }

    #[test]
    fn marker_header_selects_v2() {
        let (v, _) = detect(
            &headers_with("Assistant-Api-Version", "2"),
            &json!({"inputs": []}),
        );
        assert_eq!(v, ApiVersion::V2);
    }

    #[test]
    fn marker_header_is_case_insensitive() {
        let (v, _) = detect(
            &headers_with("ASSISTANT-API-VERSION", "2"),
            &json!({"inputs": []}),
        );
        assert_eq!(v, ApiVersion::V2);
    }

    #[test]
    fn embedded_numeric_version_selects_v2() {
        let (v, f) = detect(
            &Headers::new(),
            &json!({"result": {}, "originalRequest": {"version": 2}}),
        );
        assert_eq!(v, ApiVersion::V2);
        assert_eq!(f, FrontEnd::Nlu);
    }

    #[test]
    fn embedded_string_version_selects_v2() {
        let (v, _) = detect(
            &Headers::new(),
            &json!({"result": {}, "originalRequest": {"version": "2"}}),
        );
        assert_eq!(v, ApiVersion::V2);
    }

    #[test]
    fn absent_markers_default_to_v1() {
        let (v, _) = detect(&Headers::new(), &json!({"result": {}}));
        assert_eq!(v, ApiVersion::V1);
    }

    #[test]
    fn unknown_marker_value_defaults_to_v1() {
        let (v, _) = detect(
            &headers_with("Assistant-Api-Version", "3"),
            &json!({"result": {}}),
        );
        assert_eq!(v, ApiVersion::V1);
    }

    #[test]
    fn inputs_array_selects_direct() {
        let (_, f) = detect(&Headers::new(), &json!({"inputs": []}));
        assert_eq!(f, FrontEnd::Direct);
    }

    #[test]
    fn query_result_selects_nlu() {
        let (_, f) = detect(&Headers::new(), &json!({"queryResult": {}}));
        assert_eq!(f, FrontEnd::Nlu);
    }

    #[test]
    fn unrecognized_shape_guesses_nlu() {
        let (v, f) = detect(&Headers::new(), &json!({"something": "else"}));
        assert_eq!(v, ApiVersion::V1);
        assert_eq!(f, FrontEnd::Nlu);
    }

    #[test]
    fn inputs_must_be_an_array_to_count() {
        let (_, f) = detect(&Headers::new(), &json!({"inputs": "nope"}));
        assert_eq!(f, FrontEnd::Nlu);
    }
}
