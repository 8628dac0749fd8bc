//! Direct (conversation-API) front end: the platform posts the turn as a
//! top-level `inputs` array, with session continuity in an opaque
//! conversation token. Rust field names carry the generation-1 snake_case
//! spelling; `alias` attributes absorb generation 2's camelCase.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectRequest {
    #[serde(default)]
    pub user: Option<UserEnvelope>,
    #[serde(default)]
    pub device: Option<DeviceEnvelope>,
    #[serde(default)]
    pub surface: Option<SurfaceEnvelope>,
    #[serde(default)]
    pub conversation: Option<ConversationEnvelope>,
    #[serde(default)]
    pub inputs: Vec<TurnInput>,
    #[serde(default, alias = "isInSandbox")]
    pub is_in_sandbox: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEnvelope {
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "givenName")]
    pub given_name: Option<String>,
    #[serde(default, alias = "familyName")]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceEnvelope {
    #[serde(default)]
    pub location: Option<DeviceLocation>,
}

/// Populated only after the user granted a location permission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceLocation {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "formattedAddress")]
    pub formatted_address: Option<String>,
    #[serde(default, alias = "zipCode")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Declared output surfaces (generation 2 only).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurfaceEnvelope {
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capability {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationEnvelope {
    #[serde(default, alias = "conversationId")]
    pub conversation_id: Option<String>,
    /// Integer in generation 1, string constant in generation 2.
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default, alias = "conversationToken")]
    pub conversation_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnInput {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default, alias = "rawInputs")]
    pub raw_inputs: Vec<RawInput>,
    #[serde(default)]
    pub arguments: Vec<WireArgument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInput {
    /// Integer in generation 1, enum string in generation 2.
    #[serde(default, alias = "inputType")]
    pub input_type: Option<Value>,
    #[serde(default)]
    pub query: Option<String>,
}

/// One typed argument delivered by a built-in system intent.
///
/// The platform populates exactly one value field per argument; the rest
/// stay absent. Interpretation into [`crate::conversation::Argument`]
/// happens during normalization, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireArgument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "rawText")]
    pub raw_text: Option<String>,
    #[serde(default, alias = "textValue")]
    pub text_value: Option<String>,
    #[serde(default, alias = "boolValue")]
    pub bool_value: Option<bool>,
    #[serde(default, alias = "intValue")]
    pub int_value: Option<i64>,
    #[serde(default, alias = "datetimeValue")]
    pub datetime_value: Option<Value>,
    /// Typed payloads (sign-in status, transaction results, delivery
    /// address) arrive as an `@type`-tagged extension object.
    #[serde(default)]
    pub extension: Option<Value>,
}
