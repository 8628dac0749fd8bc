//! Persisted-state round-tripping.
//!
//! Nothing survives on the server between turns. The direct front end
//! threads a JSON-encoded `{state, data}` string through the conversation
//! token; the NLU front end threads the same payload through a reserved
//! long-lived context. Both are opaque to the platform and echoed back on
//! the next call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiVersion;
use crate::wire::WireContext;

/// Reserved-context lifespan per generation. Generation 1 uses 100,
/// generation 2 shortened it to 99; both are far above any real dialog
/// length, the point is only "does not expire mid-conversation".
pub fn state_context_lifespan(version: ApiVersion) -> u32 {
    match version {
        ApiVersion::V1 => 100,
        ApiVersion::V2 => 99,
    }
}

// ── Dialog state ──────────────────────────────────────────────────

/// The `{state, data}` payload carried by the dialog token / reserved
/// context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

impl DialogState {
    /// Lenient decode: malformed JSON yields an empty state rather than an
    /// error — a turn must still produce a well-formed reply after a
    /// platform-side token corruption. The loss is logged so operators get
    /// a signal.
    pub fn decode(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(%err, "malformed dialog state token, resetting to empty");
                Self::default()
            }
        }
    }

    /// JSON-encode for the wire. Deterministic field order (`state` then
    /// `data`) so golden tests can compare byte-for-byte.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}

// ── Contexts ──────────────────────────────────────────────────────

/// A named, lifespan-bounded parameter bag. Lifespan 0 means logically
/// expired; the serializer never forwards an expired context except as an
/// explicit generation-2 deletion marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub lifespan: u32,
    pub parameters: serde_json::Map<String, Value>,
}

/// Per-turn context bookkeeping: what the platform sent in, and what the
/// developer set for the next turn.
#[derive(Debug, Clone, Default)]
pub struct ContextSet {
    inbound: BTreeMap<String, Context>,
    outbound: BTreeMap<String, Context>,
}

impl ContextSet {
    pub fn from_wire(contexts: &[WireContext], reserved_name: &str) -> (Self, Option<String>) {
        let mut inbound = BTreeMap::new();
        let mut reserved_payload = None;
        for ctx in contexts {
            if ctx.name == reserved_name {
                reserved_payload = ctx
                    .parameters
                    .get("data")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned);
                continue;
            }
            inbound.insert(
                ctx.name.clone(),
                Context {
                    lifespan: ctx.lifespan,
                    parameters: ctx.parameters.clone(),
                },
            );
        }
        (
            Self {
                inbound,
                outbound: BTreeMap::new(),
            },
            reserved_payload,
        )
    }

    /// Active contexts the platform sent with this turn, reserved context
    /// excluded.
    pub fn inbound(&self) -> &BTreeMap<String, Context> {
        &self.inbound
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.inbound.get(name)
    }

    /// Create or overwrite a context for the next turn.
    pub fn set(&mut self, name: &str, lifespan: u32, parameters: serde_json::Map<String, Value>) {
        self.outbound.insert(
            name.to_owned(),
            Context {
                lifespan,
                parameters,
            },
        );
    }

    /// Delete a context. Observable contract on every generation: the
    /// context is absent from the next inbound call's active list. On the
    /// wire, generation 1 simply omits it while generation 2 emits an
    /// explicit zero-lifespan entry — the serializer decides, this just
    /// records lifespan 0.
    pub fn delete(&mut self, name: &str) {
        self.outbound.insert(
            name.to_owned(),
            Context {
                lifespan: 0,
                parameters: serde_json::Map::new(),
            },
        );
    }

    /// Developer-set contexts for the response, deletions included.
    pub fn outbound(&self) -> &BTreeMap<String, Context> {
        &self.outbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_round_trips_encode() {
        let mut data = serde_json::Map::new();
        data.insert("guess".into(), json!(50));
        let state = DialogState {
            state: Some("guessing".into()),
            data,
        };
        let decoded = DialogState::decode(&state.encode());
        assert_eq!(decoded, state);
    }

    #[test]
    fn decode_empty_string_is_default() {
        assert_eq!(DialogState::decode(""), DialogState::default());
        assert_eq!(DialogState::decode("   "), DialogState::default());
    }

    #[test]
    fn decode_malformed_json_is_default() {
        assert_eq!(DialogState::decode("{not json"), DialogState::default());
        assert_eq!(DialogState::decode("[]"), DialogState::default());
    }

    #[test]
    fn encode_field_order_is_stable() {
        assert_eq!(DialogState::default().encode(), r#"{"state":null,"data":{}}"#);
    }

    fn wire_ctx(name: &str, lifespan: u32) -> WireContext {
        serde_json::from_value(json!({"name": name, "lifespan": lifespan})).unwrap()
    }

    #[test]
    fn reserved_context_is_split_out() {
        let reserved: WireContext = serde_json::from_value(json!({
            "name": "_voxhook_dialog_",
            "lifespan": 100,
            "parameters": {"data": "{\"state\":null,\"data\":{\"answer\":42}}"}
        }))
        .unwrap();
        let contexts = vec![reserved, wire_ctx("game", 5)];
        let (set, payload) = ContextSet::from_wire(&contexts, "_voxhook_dialog_");
        assert_eq!(set.inbound().len(), 1);
        assert!(set.get("game").is_some());
        let dialog = DialogState::decode(&payload.unwrap());
        assert_eq!(dialog.data["answer"], 42);
    }

    #[test]
    fn set_then_delete_records_zero_lifespan() {
        let (mut set, _) = ContextSet::from_wire(&[], "_voxhook_dialog_");
        set.set("game", 5, serde_json::Map::new());
        assert_eq!(set.outbound()["game"].lifespan, 5);
        set.delete("game");
        assert_eq!(set.outbound()["game"].lifespan, 0);
    }

    #[test]
    fn lifespans_per_generation() {
        assert_eq!(state_context_lifespan(ApiVersion::V1), 100);
        assert_eq!(state_context_lifespan(ApiVersion::V2), 99);
    }
}
