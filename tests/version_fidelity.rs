//! End-to-end wire fidelity: a whole turn through the adapter must produce
//! exactly the JSON document the calling generation expects.

use serde_json::{Value, json};
use voxhook::{AdapterConfig, HandlerTable, ProtocolAdapter, WebhookRequest};

fn adapter() -> ProtocolAdapter {
    ProtocolAdapter::new(AdapterConfig::default())
}

#[tokio::test]
async fn v1_nlu_tell_hello_is_byte_faithful() {
    let mut table = HandlerTable::new();
    table.insert_fn("check_guess", |conv| conv.tell("hello"));

    let request = WebhookRequest::new(
        json!({
            "result": {
                "resolvedQuery": "50",
                "action": "check_guess",
                "parameters": {"guess": "50"}
            }
        })
        .to_string(),
    );

    let response = adapter().handle(&request, &table).await;
    assert_eq!(response.status, 200);

    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        body,
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

#[tokio::test]
async fn v1_nlu_ssml_tell_flips_the_flag() {
    let mut table = HandlerTable::new();
    table.insert_fn("speak", |conv| conv.tell("<speak>hi there</speak>"));

    let request =
        WebhookRequest::new(json!({"result": {"action": "speak"}}).to_string());
    let response = adapter().handle(&request, &table).await;
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["data"]["google"]["is_ssml"], json!(true));
    assert_eq!(body["speech"], "<speak>hi there</speak>");
}

#[tokio::test]
async fn v2_nlu_ask_appends_reserved_context() {
    let mut table = HandlerTable::new();
    table.insert_fn("start", |conv| {
        conv.data_mut().insert("answer".into(), json!(42));
        conv.ask("pick a number")
    });

    let request = WebhookRequest::new(
        json!({
            "queryResult": {"action": "start"},
            "originalRequest": {"version": "2"}
        })
        .to_string(),
    );

    let response = adapter().handle(&request, &table).await;
    let body: Value = serde_json::from_str(&response.body).unwrap();

    assert_eq!(body["payload"]["google"]["expectUserResponse"], json!(true));
    let ctx = &body["outputContexts"][0];
    assert_eq!(ctx["name"], "_voxhook_dialog_");
    assert_eq!(ctx["lifespanCount"], 99);
    let payload: Value = serde_json::from_str(ctx["parameters"]["data"].as_str().unwrap()).unwrap();
    assert_eq!(payload["data"]["answer"], 42);
}

#[tokio::test]
async fn v1_direct_ask_declares_text_intent_and_token() {
    let mut table = HandlerTable::new();
    table.insert_fn("assistant.intent.action.MAIN", |conv| {
        conv.data_mut().insert("started".into(), json!(true));
        conv.ask("welcome, guess a number")
    });

    let request = WebhookRequest::new(
        json!({
            "conversation": {"conversation_id": "c-1", "type": 1},
            "inputs": [{
                "intent": "assistant.intent.action.MAIN",
                "raw_inputs": [{"input_type": 2, "query": "talk to number genie"}]
            }]
        })
        .to_string(),
    );

    let response = adapter().handle(&request, &table).await;
    let body: Value = serde_json::from_str(&response.body).unwrap();

    assert_eq!(body["expect_user_response"], json!(true));
    assert_eq!(
        body["expected_inputs"][0]["possible_intents"],
        json!([{"intent": "assistant.intent.action.TEXT"}])
    );
    assert_eq!(
        body["expected_inputs"][0]["input_prompt"]["initial_prompts"],
        json!([{"text_to_speech": "welcome, guess a number"}])
    );
    let token: Value = serde_json::from_str(body["conversation_token"].as_str().unwrap()).unwrap();
    assert_eq!(token["data"]["started"], true);
}

#[tokio::test]
async fn v2_direct_tell_wraps_rich_response() {
    let mut table = HandlerTable::new();
    table.insert_fn("assistant.intent.TEXT", |conv| conv.tell("goodbye"));

    let request = WebhookRequest::new(
        json!({
            "inputs": [{
                "intent": "assistant.intent.TEXT",
                "rawInputs": [{"inputType": "VOICE", "query": "quit"}]
            }]
        })
        .to_string(),
    )
    .with_header("Assistant-Api-Version", "2");

    let response = adapter().handle(&request, &table).await;
    let body: Value = serde_json::from_str(&response.body).unwrap();

    assert_eq!(body["expectUserResponse"], json!(false));
    assert_eq!(
        body["finalResponse"]["richResponse"]["items"][0],
        json!({"simpleResponse": {"textToSpeech": "goodbye"}})
    );
    assert!(
        response
            .headers
            .contains(&("assistant-api-version".to_owned(), "2".to_owned()))
    );
}

#[tokio::test]
async fn detection_falls_back_to_v1_nlu_for_unknown_shapes() {
    let mut table = HandlerTable::new();
    table.fallback_fn(|conv| conv.tell("shrug"));

    let request = WebhookRequest::new(json!({"unexpected": true}).to_string());
    let response = adapter().handle(&request, &table).await;
    let body: Value = serde_json::from_str(&response.body).unwrap();
    // best-guess NLU, generation 1
    assert_eq!(body["speech"], "shrug");
    assert!(body.get("contextOut").is_some());
}

#[tokio::test]
async fn identical_turns_serialize_identically() {
    let mut table = HandlerTable::new();
    table.insert_fn("check_guess", |conv| conv.tell("hello"));
    let request =
        WebhookRequest::new(json!({"result": {"action": "check_guess"}}).to_string());

    let a = adapter().handle(&request, &table).await;
    let b = adapter().handle(&request, &table).await;
    assert_eq!(a.body, b.body);
    assert_eq!(a.headers, b.headers);
}
