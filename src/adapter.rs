//! Request-lifecycle façade.
//!
//! The transport boundary is a pair of plain structs ([`WebhookRequest`] /
//! [`WebhookResponse`]); anything that can read bytes off a socket can feed
//! this. One call to [`ProtocolAdapter::handle`] owns exactly one turn:
//! signature predicate → format detection → turn hydration → dispatch →
//! serialization. Every failure path still yields a well-formed terminal
//! response; only configuration errors and malformed bodies come back as a
//! marker-prefixed 400 text instead of conversational JSON.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::AdapterConfig;
use crate::conversation::Conversation;
use crate::detect::{self, AGENT_VERSION_HEADER, API_VERSION_HEADER};
use crate::error::{RequestError, RouterError, VoxhookError};
use crate::response::{Reprompts, ResponseModel, RichResponse};
use crate::router::{HandlerTable, IntentRouter};
use crate::serialize;

// ── Boundary types ────────────────────────────────────────────────

/// Case-insensitive header map. Names are folded to lowercase on insert so
/// lookups match however the platform spells them.
#[derive(Debug, Clone, Default)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_ascii_lowercase(), value.to_owned());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value.as_ref());
        }
        headers
    }
}

/// One inbound webhook call as the transport hands it over.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl WebhookRequest {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: Headers::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The single outbound write for a turn.
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

// ── Façade ────────────────────────────────────────────────────────

/// One configured adapter instance. All behavior knobs live in the
/// [`AdapterConfig`] passed at construction; nothing is process-global, so
/// differently configured adapters coexist.
pub struct ProtocolAdapter {
    config: AdapterConfig,
}

impl ProtocolAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Run one turn end to end. The only suspension point is the handler's
    /// own deferred result.
    pub async fn handle(&self, request: &WebhookRequest, table: &HandlerTable) -> WebhookResponse {
        let echo_version = request.headers.get(API_VERSION_HEADER);
        if let Some(label) = request.headers.get(AGENT_VERSION_HEADER) {
            tracing::debug!(label, "agent version label");
        }

        // Boundary predicate, not cryptography: a configured header/value
        // pair compared in constant time.
        let presented = request.headers.get(&self.config.signature.header);
        if !self.config.signature.verify(presented) {
            tracing::warn!("request signature check failed");
            return self.error_response(401, &RequestError::BadSignature.to_string(), echo_version);
        }

        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%err, "webhook body is not valid JSON");
                return self.error_response(
                    400,
                    &RequestError::MalformedJson(err.to_string()).to_string(),
                    echo_version,
                );
            }
        };

        let (api_version, front_end) = detect::detect(&request.headers, &body);
        let mut conv = Conversation::hydrate(
            api_version,
            front_end,
            body,
            &self.config.state_context_name,
        );
        tracing::debug!(
            version = %api_version,
            front_end = %front_end,
            intent = conv.intent(),
            "turn normalized"
        );

        let mut router = IntentRouter::new();
        match router.dispatch(table, &mut conv).await {
            Ok(()) => {}
            Err(VoxhookError::Router(RouterError::NoHandler(key))) => {
                // Recoverable: answer with the apology tell instead of
                // propagating a developer mistake to the platform.
                tracing::warn!(key = %key, "no matching handler, sending apology response");
                return self.apology_response(conv, echo_version);
            }
            Err(err) if err.is_configuration() => {
                return self.error_response(400, &err.to_string(), echo_version);
            }
            Err(err) => {
                tracing::error!(error = %err, "handler failed with no error handler registered");
                return self.apology_response(conv, echo_version);
            }
        }

        let Some(model) = conv.take_outcome() else {
            tracing::warn!(
                intent = conv.intent(),
                "handler completed without declaring a response"
            );
            return self.apology_response(conv, echo_version);
        };
        self.wire_response(&conv, &model, echo_version)
    }

    fn wire_response(
        &self,
        conv: &Conversation,
        model: &ResponseModel,
        echo_version: Option<&str>,
    ) -> WebhookResponse {
        let body = serialize::serialize(&self.config, conv, model);
        WebhookResponse {
            status: 200,
            headers: serialize::response_headers(echo_version),
            body: body.to_string(),
        }
    }

    /// Terminal apology: a fixed well-formed tell, so the platform never
    /// sees a broken body for a recoverable failure.
    fn apology_response(
        &self,
        mut conv: Conversation,
        echo_version: Option<&str>,
    ) -> WebhookResponse {
        conv.take_outcome();
        let model = ResponseModel {
            expect_user_response: false,
            rich: RichResponse::of(self.config.apology_text.clone()),
            reprompts: Reprompts::none(),
            system_intent: None,
        };
        self.wire_response(&conv, &model, echo_version)
    }

    /// Marker-prefixed plain-text error, never the conversational shape.
    fn error_response(
        &self,
        status: u16,
        message: &str,
        echo_version: Option<&str>,
    ) -> WebhookResponse {
        let mut headers = vec![("content-type".to_owned(), "text/plain".to_owned())];
        if let Some(version) = echo_version {
            headers.push((API_VERSION_HEADER.to_owned(), version.to_owned()));
        }
        WebhookResponse {
            status,
            headers,
            body: format!("{}{message}", self.config.error_prefix),
        }
    }
}
