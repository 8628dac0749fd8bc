//! Inbound wire shapes.
//!
//! Two front ends, two API generations, four logical request envelopes. The
//! generation split is purely a field-naming split (snake_case vs camelCase),
//! so each shape is declared once with serde aliases absorbing the other
//! spelling. Outbound projection lives in [`crate::serialize`] and is built
//! with `serde_json::json!` rather than mirrored structs — the response
//! envelopes differ structurally between generations, not just in casing.

pub mod direct;
pub mod nlu;

use serde::Deserialize;
use serde_json::Value;

/// A named, lifespan-bounded parameter bag (NLU front end).
///
/// Generation 1 spells the lifespan `lifespan`, generation 2 `lifespanCount`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireContext {
    pub name: String,
    #[serde(default, alias = "lifespanCount")]
    pub lifespan: u32,
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
}

/// The embedded direct-front-end request an NLU envelope may carry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginalRequest {
    #[serde(default)]
    pub source: Option<String>,
    /// Generation marker; the platform sends it as either a number or a
    /// string, so it is kept loose here and interpreted by the detector.
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub data: Option<direct::DirectRequest>,
}
