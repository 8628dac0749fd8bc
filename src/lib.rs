#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

//! voxhook — webhook fulfillment for voice-assistant conversations.
//!
//! One inbound webhook call is one *turn*: the platform posts a JSON body in
//! one of four wire shapes (two API generations × two front-end
//! integrations), voxhook normalizes it into a [`Conversation`], dispatches
//! it to a developer handler keyed by intent or state, and serializes the
//! handler's declared response back into the exact shape the caller expects.
//!
//! Nothing is persisted server-side: session continuity rides on an opaque
//! dialog token (direct front end) or a reserved long-lived context (NLU
//! front end) that the platform echoes back on the next call.

pub mod adapter;
pub mod config;
pub mod conversation;
pub mod detect;
pub mod error;
#[cfg(feature = "gateway")]
pub mod gateway;
pub mod response;
pub mod router;
pub mod serialize;
pub mod wire;

pub use adapter::{Headers, ProtocolAdapter, WebhookRequest, WebhookResponse};
pub use config::{AdapterConfig, SignatureConfig};
pub use conversation::{ApiVersion, Conversation, FrontEnd};
pub use error::{RequestError, ResponseError, Result, RouterError, VoxhookError};
pub use response::{Prompt, Reprompts, RichResponse};
pub use router::{
    HandlerEntry, HandlerOutcome, HandlerTable, IntentRouter, RouterState, TurnErrorHandler,
    TurnHandler,
};
