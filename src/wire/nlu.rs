//! NLU front end: an agent performs intent matching and posts its result as
//! a `result` (generation 1) or `queryResult` (generation 2) envelope, with
//! the raw platform request nested under `originalRequest` when the turn
//! originated from the assistant surface.

use serde::Deserialize;
use serde_json::Value;

use super::{OriginalRequest, WireContext};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NluRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "sessionId", alias = "session")]
    pub session_id: Option<String>,
    /// Generation-1 envelope.
    #[serde(default)]
    pub result: Option<NluResult>,
    /// Generation-2 envelope.
    #[serde(default, rename = "queryResult")]
    pub query_result: Option<NluResult>,
    #[serde(default, alias = "originalRequest")]
    pub original_request: Option<OriginalRequest>,
}

impl NluRequest {
    /// Whichever envelope the caller sent. `queryResult` wins when both are
    /// present, matching the generation the newer spelling implies.
    pub fn envelope(&self) -> Option<&NluResult> {
        self.query_result.as_ref().or(self.result.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NluResult {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, alias = "resolvedQuery", alias = "queryText")]
    pub query: Option<String>,
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
    #[serde(default, alias = "outputContexts")]
    pub contexts: Vec<WireContext>,
    /// Generation-1 intent metadata.
    #[serde(default)]
    pub metadata: Option<NluMetadata>,
    /// Generation-2 matched intent.
    #[serde(default)]
    pub intent: Option<NluIntent>,
    #[serde(default, alias = "actionIncomplete")]
    pub action_incomplete: bool,
}

impl NluResult {
    /// Dispatch key for this turn: the developer-assigned action, falling
    /// back to the matched intent's display name.
    pub fn dispatch_key(&self) -> Option<&str> {
        self.action
            .as_deref()
            .filter(|a| !a.is_empty())
            .or_else(|| {
                self.metadata
                    .as_ref()
                    .and_then(|m| m.intent_name.as_deref())
            })
            .or_else(|| {
                self.intent
                    .as_ref()
                    .and_then(|i| i.display_name.as_deref())
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NluMetadata {
    #[serde(default, alias = "intentName")]
    pub intent_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NluIntent {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_BODY: &str = r#"{
        "id": "req-1",
        "sessionId": "s-1",
        "result": {
            "source": "agent",
            "resolvedQuery": "50",
            "action": "check_guess",
            "actionIncomplete": false,
            "parameters": {"guess": "50"},
            "contexts": [{"name": "game", "lifespan": 5, "parameters": {"answer": "42"}}],
            "metadata": {"intentName": "provide_guess"}
        }
    }"#;

    const V2_BODY: &str = r#"{
        "session": "s-2",
        "queryResult": {
            "queryText": "50",
            "action": "check_guess",
            "parameters": {"guess": "50"},
            "outputContexts": [{"name": "game", "lifespanCount": 5}],
            "intent": {"displayName": "provide_guess"}
        },
        "originalRequest": {"source": "assistant", "version": "2"}
    }"#;

    #[test]
    fn parses_generation_1_envelope() {
        let req: NluRequest = serde_json::from_str(V1_BODY).unwrap();
        let env = req.envelope().unwrap();
        assert_eq!(env.action.as_deref(), Some("check_guess"));
        assert_eq!(env.query.as_deref(), Some("50"));
        assert_eq!(env.contexts[0].lifespan, 5);
        assert_eq!(env.contexts[0].parameters["answer"], "42");
        assert_eq!(req.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn parses_generation_2_envelope() {
        let req: NluRequest = serde_json::from_str(V2_BODY).unwrap();
        let env = req.envelope().unwrap();
        assert_eq!(env.query.as_deref(), Some("50"));
        assert_eq!(env.contexts[0].lifespan, 5);
        assert_eq!(req.session_id.as_deref(), Some("s-2"));
        assert!(req.original_request.is_some());
    }

    #[test]
    fn dispatch_key_prefers_action() {
        let req: NluRequest = serde_json::from_str(V1_BODY).unwrap();
        assert_eq!(req.envelope().unwrap().dispatch_key(), Some("check_guess"));
    }

    #[test]
    fn dispatch_key_falls_back_to_intent_name() {
        let req: NluRequest = serde_json::from_str(
            r#"{"result": {"action": "", "metadata": {"intentName": "provide_guess"}}}"#,
        )
        .unwrap();
        assert_eq!(
            req.envelope().unwrap().dispatch_key(),
            Some("provide_guess")
        );
    }

    #[test]
    fn empty_body_has_no_envelope() {
        let req: NluRequest = serde_json::from_str("{}").unwrap();
        assert!(req.envelope().is_none());
    }
}
