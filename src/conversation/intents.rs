//! Built-in intent identifiers, argument names, and capability names.
//!
//! Generation 1 prefixes built-in intents with `assistant.intent.action.`,
//! generation 2 with `assistant.intent.`; most system intents exist only in
//! generation 2. These are fixed platform strings, not inferred.

use super::ApiVersion;

pub mod v1 {
    pub const MAIN: &str = "assistant.intent.action.MAIN";
    pub const TEXT: &str = "assistant.intent.action.TEXT";
    pub const PERMISSION: &str = "assistant.intent.action.PERMISSION";
}

pub mod v2 {
    pub const MAIN: &str = "assistant.intent.MAIN";
    pub const TEXT: &str = "assistant.intent.TEXT";
    pub const PERMISSION: &str = "assistant.intent.PERMISSION";
    pub const OPTION: &str = "assistant.intent.OPTION";
    pub const CONFIRMATION: &str = "assistant.intent.CONFIRMATION";
    pub const DATETIME: &str = "assistant.intent.DATETIME";
    pub const SIGN_IN: &str = "assistant.intent.SIGN_IN";
    pub const TRANSACTION_REQUIREMENTS_CHECK: &str =
        "assistant.intent.TRANSACTION_REQUIREMENTS_CHECK";
    pub const TRANSACTION_DECISION: &str = "assistant.intent.TRANSACTION_DECISION";
    pub const DELIVERY_ADDRESS: &str = "assistant.intent.DELIVERY_ADDRESS";
}

/// Built-in argument names as they appear on the wire.
pub mod args {
    /// Raw text argument (both generations).
    pub const TEXT: &str = "text";
    /// Generation-1 permission grant flag, delivered as text `"true"`.
    pub const PERMISSION_GRANTED: &str = "permission_granted";
    pub const PERMISSION: &str = "PERMISSION";
    pub const OPTION: &str = "OPTION";
    pub const CONFIRMATION: &str = "CONFIRMATION";
    pub const DATETIME: &str = "DATETIME";
    pub const SIGN_IN: &str = "SIGN_IN";
    pub const TRANSACTION_REQUIREMENTS_CHECK_RESULT: &str =
        "TRANSACTION_REQUIREMENTS_CHECK_RESULT";
    pub const TRANSACTION_DECISION_VALUE: &str = "TRANSACTION_DECISION_VALUE";
    pub const DELIVERY_ADDRESS_VALUE: &str = "DELIVERY_ADDRESS_VALUE";
}

/// Declared surface capabilities (generation 2).
pub mod capability {
    pub const AUDIO_OUTPUT: &str = "assistant.capability.AUDIO_OUTPUT";
    pub const SCREEN_OUTPUT: &str = "assistant.capability.SCREEN_OUTPUT";
}

/// `@type` tag prefix for system-intent value specs (generation 2).
pub const VALUE_SPEC_TYPE_PREFIX: &str = "type.assistant.api/";

/// The free-form text intent for the active generation; asks declare it as
/// the expected follow-up input.
pub fn text_intent(version: ApiVersion) -> &'static str {
    match version {
        ApiVersion::V1 => v1::TEXT,
        ApiVersion::V2 => v2::TEXT,
    }
}
