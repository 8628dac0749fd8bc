//! NLU front-end response projection.
//!
//! Generation 1 answers the legacy envelope: top-level `speech`, a
//! snake_case platform payload under `data`, and `contextOut`. Generation 2
//! answers the current envelope: `fulfillmentText`, a camelCase payload
//! under `payload`, and `outputContexts` with `lifespanCount` — including
//! explicit zero-lifespan entries for deletions, which generation 1 instead
//! just omits.

use serde_json::{Value, json};

use crate::config::AdapterConfig;
use crate::conversation::state::state_context_lifespan;
use crate::conversation::{ApiVersion, Conversation};
use crate::response::ResponseModel;

use super::direct::rich_response_json;
use super::prompt_json;

/// Platform-data key inside the NLU envelope; a fixed wire constant.
pub const PLATFORM_DATA_KEY: &str = "google";

pub fn serialize(config: &AdapterConfig, conv: &Conversation, model: &ResponseModel) -> Value {
    match conv.api_version() {
        ApiVersion::V1 => serialize_v1(config, conv, model),
        ApiVersion::V2 => serialize_v2(config, conv, model),
    }
}

// ── Generation 1 ──────────────────────────────────────────────────

fn serialize_v1(config: &AdapterConfig, conv: &Conversation, model: &ResponseModel) -> Value {
    let speech = model
        .rich
        .first_simple()
        .map(|s| s.prompt.clone())
        .unwrap_or_default();

    let mut platform = json!({
        "expect_user_response": model.expect_user_response,
        "is_ssml": speech.is_ssml(),
        "no_input_prompts": model
            .reprompts
            .no_input
            .iter()
            .map(|p| prompt_json(p, ApiVersion::V1))
            .collect::<Vec<_>>(),
    });
    if let Some(ref intent) = model.system_intent {
        platform.as_object_mut().expect("literal object").insert(
            "system_intent".into(),
            json!({
                "intent": intent.intent_id(ApiVersion::V1),
                "spec": {intent.v1_spec_key(): intent.value_spec(ApiVersion::V1)},
            }),
        );
    }

    json!({
        "speech": speech.speech,
        "data": {PLATFORM_DATA_KEY: platform},
        "contextOut": contexts_json(config, conv, model, ApiVersion::V1),
    })
}

// ── Generation 2 ──────────────────────────────────────────────────

fn serialize_v2(config: &AdapterConfig, conv: &Conversation, model: &ResponseModel) -> Value {
    let display_text = model
        .rich
        .first_simple()
        .map(|s| {
            s.prompt
                .display_text
                .clone()
                .unwrap_or_else(|| s.prompt.speech.clone())
        })
        .unwrap_or_default();

    let mut platform = json!({
        "expectUserResponse": model.expect_user_response,
        "richResponse": rich_response_json(&model.rich),
    });
    if let Some(ref intent) = model.system_intent {
        platform.as_object_mut().expect("literal object").insert(
            "systemIntent".into(),
            json!({
                "intent": intent.intent_id(ApiVersion::V2),
                "data": intent.value_spec(ApiVersion::V2),
            }),
        );
    }

    json!({
        "fulfillmentText": display_text,
        "payload": {PLATFORM_DATA_KEY: platform},
        "outputContexts": contexts_json(config, conv, model, ApiVersion::V2),
    })
}

// ── Contexts ──────────────────────────────────────────────────────

/// Outbound context list. Every ask re-emits the reserved dialog-state
/// context first; developer contexts follow. Expired contexts are dropped
/// on generation 1 and emitted as explicit zero-lifespan deletions on
/// generation 2.
fn contexts_json(
    config: &AdapterConfig,
    conv: &Conversation,
    model: &ResponseModel,
    version: ApiVersion,
) -> Vec<Value> {
    let lifespan_key = match version {
        ApiVersion::V1 => "lifespan",
        ApiVersion::V2 => "lifespanCount",
    };
    let mut out = Vec::new();

    if model.expect_user_response {
        out.push(json!({
            "name": config.state_context_name,
            lifespan_key: state_context_lifespan(version),
            "parameters": {"data": conv.dialog_state().encode()},
        }));
    }

    for (name, ctx) in conv.contexts().outbound() {
        if ctx.lifespan == 0 && version == ApiVersion::V1 {
            continue;
        }
        out.push(json!({
            "name": name,
            lifespan_key: ctx.lifespan,
            "parameters": ctx.parameters,
        }));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::FrontEnd;
    use crate::response::{Reprompts, RichResponse, SystemIntent};
    use serde_json::json;

    fn nlu_turn(version: ApiVersion) -> Conversation {
        Conversation::hydrate(
            version,
            FrontEnd::Nlu,
            json!({"result": {"action": "check_guess"}}),
            "_voxhook_dialog_",
        )
    }

    fn config() -> AdapterConfig {
        AdapterConfig::default()
    }

    #[test]
    fn v1_tell_matches_legacy_envelope_exactly() {
        let conv = nlu_turn(ApiVersion::V1);
        let model = ResponseModel::tell(RichResponse::of("hello")).unwrap();
        let out = serialize(&config(), &conv, &model);
        assert_eq!(
            out,
            json!({
                "speech": "hello",
                "data": {"google": {
                    "expect_user_response": false,
                    "is_ssml": false,
                    "no_input_prompts": []
                }},
                "contextOut": []
            })
        );
    }

    #[test]
    fn v1_ssml_tell_sets_flag() {
        let conv = nlu_turn(ApiVersion::V1);
        let model = ResponseModel::tell(RichResponse::of("<speak>hello</speak>")).unwrap();
        let out = serialize(&config(), &conv, &model);
        assert_eq!(out["speech"], "<speak>hello</speak>");
        assert_eq!(out["data"]["google"]["is_ssml"], json!(true));
    }

    #[test]
    fn v1_ask_appends_reserved_context_with_lifespan_100() {
        let mut conv = nlu_turn(ApiVersion::V1);
        conv.data_mut().insert("answer".into(), json!(42));
        let model = ResponseModel::ask(RichResponse::of("guess?"), Reprompts::none()).unwrap();
        let out = serialize(&config(), &conv, &model);
        let ctx = &out["contextOut"][0];
        assert_eq!(ctx["name"], "_voxhook_dialog_");
        assert_eq!(ctx["lifespan"], 100);
        let payload: Value = serde_json::from_str(ctx["parameters"]["data"].as_str().unwrap()).unwrap();
        assert_eq!(payload["data"]["answer"], 42);
    }

    #[test]
    fn v1_drops_expired_developer_contexts() {
        let mut conv = nlu_turn(ApiVersion::V1);
        conv.set_context("game", 5, serde_json::Map::new());
        conv.delete_context("stale");
        let model = ResponseModel::ask(RichResponse::of("go on"), Reprompts::none()).unwrap();
        let out = serialize(&config(), &conv, &model);
        let names: Vec<&str> = out["contextOut"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["_voxhook_dialog_", "game"]);
    }

    #[test]
    fn v1_tell_omits_reserved_but_keeps_developer_contexts() {
        let mut conv = nlu_turn(ApiVersion::V1);
        conv.set_context("game", 2, serde_json::Map::new());
        let model = ResponseModel::tell(RichResponse::of("done")).unwrap();
        let out = serialize(&config(), &conv, &model);
        let names: Vec<&str> = out["contextOut"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["game"]);
    }

    #[test]
    fn v2_ask_appends_reserved_context_with_lifespan_count_99() {
        let mut conv = nlu_turn(ApiVersion::V2);
        conv.data_mut().insert("answer".into(), json!(7));
        let model = ResponseModel::ask(RichResponse::of("guess?"), Reprompts::none()).unwrap();
        let out = serialize(&config(), &conv, &model);
        let ctx = &out["outputContexts"][0];
        assert_eq!(ctx["name"], "_voxhook_dialog_");
        assert_eq!(ctx["lifespanCount"], 99);
        assert!(ctx.get("lifespan").is_none());
    }

    #[test]
    fn v2_emits_explicit_zero_lifespan_deletions() {
        let mut conv = nlu_turn(ApiVersion::V2);
        conv.delete_context("stale");
        let model = ResponseModel::tell(RichResponse::of("bye")).unwrap();
        let out = serialize(&config(), &conv, &model);
        assert_eq!(
            out["outputContexts"],
            json!([{"name": "stale", "lifespanCount": 0, "parameters": {}}])
        );
    }

    #[test]
    fn v2_payload_wraps_rich_response() {
        let conv = nlu_turn(ApiVersion::V2);
        let model = ResponseModel::tell(RichResponse::of("bye")).unwrap();
        let out = serialize(&config(), &conv, &model);
        assert_eq!(out["fulfillmentText"], "bye");
        assert_eq!(out["payload"]["google"]["expectUserResponse"], json!(false));
        assert_eq!(
            out["payload"]["google"]["richResponse"]["items"][0]["simpleResponse"]["textToSpeech"],
            "bye"
        );
    }

    #[test]
    fn v2_system_intent_rides_the_payload() {
        let conv = nlu_turn(ApiVersion::V2);
        let model =
            ResponseModel::system(SystemIntent::confirmation("are you sure?").unwrap()).unwrap();
        let out = serialize(&config(), &conv, &model);
        let system = &out["payload"]["google"]["systemIntent"];
        assert_eq!(system["intent"], "assistant.intent.CONFIRMATION");
        assert_eq!(
            system["data"]["dialogSpec"]["requestConfirmationText"],
            "are you sure?"
        );
        assert_eq!(out["payload"]["google"]["expectUserResponse"], json!(true));
    }

    #[test]
    fn custom_reserved_context_name_is_honored() {
        let mut cfg = AdapterConfig::default();
        cfg.state_context_name = "_my_dialog_".into();
        let conv = nlu_turn(ApiVersion::V1);
        let model = ResponseModel::ask(RichResponse::of("hm"), Reprompts::none()).unwrap();
        let out = serialize(&cfg, &conv, &model);
        assert_eq!(out["contextOut"][0]["name"], "_my_dialog_");
    }
}
