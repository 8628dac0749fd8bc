//! Direct front-end response projection.
//!
//! Generation 1 has no rich-item sequence: asks carry flat prompt arrays and
//! tells collapse to the first simple item's speech. Generation 2 wraps
//! everything in a rich response envelope.

use serde_json::{Value, json};

use crate::conversation::{ApiVersion, Conversation, intents};
use crate::response::{
    BasicCard, BrowseCarousel, MediaResponse, ResponseItem, ResponseModel, RichResponse,
    SimpleResponse, TableCard,
};

use super::prompt_json;

pub fn serialize(conv: &Conversation, model: &ResponseModel) -> Value {
    match conv.api_version() {
        ApiVersion::V1 => serialize_v1(conv, model),
        ApiVersion::V2 => serialize_v2(conv, model),
    }
}

// ── Generation 1 ──────────────────────────────────────────────────

fn serialize_v1(conv: &Conversation, model: &ResponseModel) -> Value {
    if !model.expect_user_response {
        let speech = model
            .rich
            .first_simple()
            .map(|s| &s.prompt)
            .cloned()
            .unwrap_or_default();
        return json!({
            "expect_user_response": false,
            "final_response": {"speech_response": prompt_json(&speech, ApiVersion::V1)},
        });
    }

    let initial = model
        .rich
        .items
        .iter()
        .filter_map(|item| match item {
            ResponseItem::Simple(s) => Some(prompt_json(&s.prompt, ApiVersion::V1)),
            _ => None,
        })
        .take(1)
        .collect::<Vec<_>>();

    let possible_intent = match model.system_intent {
        Some(ref intent) => json!({
            "intent": intent.intent_id(ApiVersion::V1),
            "input_value_spec": {intent.v1_spec_key(): intent.value_spec(ApiVersion::V1)},
        }),
        None => json!({"intent": intents::text_intent(ApiVersion::V1)}),
    };

    json!({
        "conversation_token": conv.dialog_state().encode(),
        "expect_user_response": true,
        "expected_inputs": [{
            "input_prompt": {
                "initial_prompts": initial,
                "no_match_prompts": model
                    .reprompts
                    .no_match
                    .iter()
                    .map(|p| prompt_json(p, ApiVersion::V1))
                    .collect::<Vec<_>>(),
                "no_input_prompts": model
                    .reprompts
                    .no_input
                    .iter()
                    .map(|p| prompt_json(p, ApiVersion::V1))
                    .collect::<Vec<_>>(),
            },
            "possible_intents": [possible_intent],
        }],
    })
}

// ── Generation 2 ──────────────────────────────────────────────────

fn serialize_v2(conv: &Conversation, model: &ResponseModel) -> Value {
    if !model.expect_user_response {
        return json!({
            "expectUserResponse": false,
            "finalResponse": {"richResponse": rich_response_json(&model.rich)},
        });
    }

    let possible_intent = match model.system_intent {
        Some(ref intent) => json!({
            "intent": intent.intent_id(ApiVersion::V2),
            "inputValueData": intent.value_spec(ApiVersion::V2),
        }),
        None => json!({"intent": intents::text_intent(ApiVersion::V2)}),
    };

    json!({
        "conversationToken": conv.dialog_state().encode(),
        "expectUserResponse": true,
        "expectedInputs": [{
            "inputPrompt": {
                "richInitialPrompt": rich_response_json(&model.rich),
                "noInputPrompts": model
                    .reprompts
                    .no_input
                    .iter()
                    .map(|p| prompt_json(p, ApiVersion::V2))
                    .collect::<Vec<_>>(),
            },
            "possibleIntents": [possible_intent],
        }],
    })
}

/// Generation-2 rich response envelope, shared by asks, tells, and the NLU
/// payload.
pub(crate) fn rich_response_json(rich: &RichResponse) -> Value {
    let mut out = json!({
        "items": rich.items.iter().map(item_json).collect::<Vec<_>>(),
    });
    let obj = out.as_object_mut().expect("literal object");
    if !rich.suggestions.is_empty() {
        obj.insert(
            "suggestions".into(),
            Value::Array(
                rich.suggestions
                    .iter()
                    .map(|s| json!({"title": s.title}))
                    .collect(),
            ),
        );
    }
    if let Some(ref link) = rich.link_out {
        obj.insert(
            "linkOutSuggestion".into(),
            json!({"destinationName": link.destination_name, "url": link.url}),
        );
    }
    out
}

fn item_json(item: &ResponseItem) -> Value {
    match item {
        ResponseItem::Simple(simple) => simple_json(simple),
        ResponseItem::BasicCard(card) => basic_card_json(card),
        ResponseItem::Table(table) => table_json(table),
        ResponseItem::Media(media) => media_json(media),
        ResponseItem::BrowseCarousel(carousel) => browse_carousel_json(carousel),
    }
}

fn simple_json(simple: &SimpleResponse) -> Value {
    let mut inner = prompt_json(&simple.prompt, ApiVersion::V2);
    if let Some(ref display) = simple.prompt.display_text {
        inner
            .as_object_mut()
            .expect("prompt json is an object")
            .insert("displayText".into(), json!(display));
    }
    json!({"simpleResponse": inner})
}

fn basic_card_json(card: &BasicCard) -> Value {
    let mut inner = json!({"title": card.title});
    let obj = inner.as_object_mut().expect("literal object");
    if let Some(ref subtitle) = card.subtitle {
        obj.insert("subtitle".into(), json!(subtitle));
    }
    if let Some(ref text) = card.formatted_text {
        obj.insert("formattedText".into(), json!(text));
    }
    if let Some(ref image) = card.image {
        obj.insert(
            "image".into(),
            json!({"url": image.url, "accessibilityText": image.accessibility_text}),
        );
    }
    if !card.buttons.is_empty() {
        obj.insert(
            "buttons".into(),
            Value::Array(
                card.buttons
                    .iter()
                    .map(|b| json!({"title": b.title, "openUrlAction": {"url": b.open_url}}))
                    .collect(),
            ),
        );
    }
    json!({"basicCard": inner})
}

fn table_json(table: &TableCard) -> Value {
    let mut inner = json!({
        "columnProperties": table
            .columns
            .iter()
            .map(|c| json!({"header": c}))
            .collect::<Vec<_>>(),
        "rows": table
            .rows
            .iter()
            .map(|row| {
                json!({"cells": row.iter().map(|cell| json!({"text": cell})).collect::<Vec<_>>()})
            })
            .collect::<Vec<_>>(),
    });
    if let Some(ref title) = table.title {
        inner
            .as_object_mut()
            .expect("literal object")
            .insert("title".into(), json!(title));
    }
    json!({"tableCard": inner})
}

fn media_json(media: &MediaResponse) -> Value {
    json!({
        "mediaResponse": {
            "mediaType": "AUDIO",
            "mediaObjects": media
                .objects
                .iter()
                .map(|o| {
                    let mut obj = json!({"name": o.name, "contentUrl": o.url});
                    let map = obj.as_object_mut().expect("literal object");
                    if let Some(ref description) = o.description {
                        map.insert("description".into(), json!(description));
                    }
                    if let Some(ref icon) = o.icon_url {
                        map.insert("icon".into(), json!({"url": icon}));
                    }
                    obj
                })
                .collect::<Vec<_>>(),
        }
    })
}

fn browse_carousel_json(carousel: &BrowseCarousel) -> Value {
    json!({
        "carouselBrowse": {
            "items": carousel
                .items
                .iter()
                .map(|item| {
                    let mut obj = json!({
                        "title": item.title,
                        "openUrlAction": {"url": item.url},
                    });
                    let map = obj.as_object_mut().expect("literal object");
                    if let Some(ref description) = item.description {
                        map.insert("description".into(), json!(description));
                    }
                    if let Some(ref footer) = item.footer {
                        map.insert("footer".into(), json!(footer));
                    }
                    if let Some(ref image) = item.image {
                        map.insert(
                            "image".into(),
                            json!({"url": image.url, "accessibilityText": image.accessibility_text}),
                        );
                    }
                    obj
                })
                .collect::<Vec<_>>(),
        }
    })
}
