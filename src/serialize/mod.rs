//! Wire projection: `(generation, front end, turn state, response model)` →
//! the exact JSON document the caller expects.
//!
//! Pure and deterministic — same inputs, same document — which is what the
//! golden-output tests lean on. Field naming per generation is a fixed
//! mapping, never inferred.

pub mod direct;
pub mod nlu;

use serde_json::{Value, json};

use crate::config::AdapterConfig;
use crate::conversation::{ApiVersion, Conversation, FrontEnd};
use crate::detect::API_VERSION_HEADER;
use crate::response::{Prompt, ResponseModel};

/// Project a finished response model into the wire document for the turn's
/// detected format.
pub fn serialize(config: &AdapterConfig, conv: &Conversation, model: &ResponseModel) -> Value {
    match conv.front_end() {
        FrontEnd::Direct => direct::serialize(conv, model),
        FrontEnd::Nlu => nlu::serialize(config, conv, model),
    }
}

/// Response headers: the fixed JSON content type, plus the platform
/// generation marker echoed back when the request carried one.
pub fn response_headers(echo_version: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("content-type".to_owned(), "application/json".to_owned())];
    if let Some(version) = echo_version {
        headers.push((API_VERSION_HEADER.to_owned(), version.to_owned()));
    }
    headers
}

/// One prompt as a wire object, SSML-classified independently of any other
/// prompt on the response.
pub(crate) fn prompt_json(prompt: &Prompt, version: ApiVersion) -> Value {
    let field = match (version, prompt.is_ssml()) {
        (ApiVersion::V1, true) | (ApiVersion::V2, true) => "ssml",
        (ApiVersion::V1, false) => "text_to_speech",
        (ApiVersion::V2, false) => "textToSpeech",
    };
    json!({field: prompt.speech})
}
