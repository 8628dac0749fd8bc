use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `voxhook`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum VoxhookError {
    // ── Inbound body / wire format ───────────────────────────────────────
    #[error("request: {0}")]
    Request(#[from] RequestError),

    // ── Response construction ───────────────────────────────────────────
    #[error("response: {0}")]
    Response(#[from] ResponseError),

    // ── Dispatch ────────────────────────────────────────────────────────
    #[error("router: {0}")]
    Router(#[from] RouterError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Inbound request errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("request signature missing or invalid")]
    BadSignature,
}

// ─── Response construction errors ────────────────────────────────────────────

/// Structural validation failures raised at build time, before any wire
/// write occurs. Each rule has its own variant so callers (and tests) can
/// match on the exact constraint that was violated.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("rich response requires at least one simple (text or SSML) item")]
    MissingSimpleItem,

    #[error("{kind} requires at least 2 items, got {got}")]
    TooFewItems { kind: &'static str, got: usize },

    #[error("{kind} prompts are capped at {max}, got {got}")]
    TooManyPrompts {
        kind: &'static str,
        max: usize,
        got: usize,
    },

    #[error("system intent {intent}: {reason}")]
    InvalidSystemIntent {
        intent: &'static str,
        reason: String,
    },

    #[error("prompt text must not be empty")]
    EmptyPrompt,
}

// ─── Dispatch errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no handler registered for key {0:?}")]
    NoHandler(String),

    #[error("circular handler redirect involving key {0:?}")]
    CircularRedirect(String),

    #[error("handler for {key:?} failed: {message}")]
    HandlerFailed { key: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, VoxhookError>;

impl VoxhookError {
    /// Whether this error stems from developer configuration (bad handler
    /// table, invalid response construction) rather than a transient turn
    /// condition. Configuration errors surface as HTTP 400 and are never
    /// retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            VoxhookError::Response(_) | VoxhookError::Router(RouterError::CircularRedirect(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_displays_constraint() {
        let err = VoxhookError::Response(ResponseError::TooFewItems {
            kind: "list",
            got: 1,
        });
        assert!(err.to_string().contains("at least 2"));
        assert!(err.to_string().contains("list"));
    }

    #[test]
    fn circular_redirect_names_key() {
        let err = VoxhookError::Router(RouterError::CircularRedirect("guess".into()));
        assert!(err.to_string().contains("guess"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: VoxhookError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }

    #[test]
    fn configuration_classification() {
        assert!(VoxhookError::Response(ResponseError::MissingSimpleItem).is_configuration());
        assert!(VoxhookError::Router(RouterError::CircularRedirect("a".into())).is_configuration());
        assert!(!VoxhookError::Router(RouterError::NoHandler("a".into())).is_configuration());
    }

    #[test]
    fn too_many_prompts_displays_counts() {
        let err = ResponseError::TooManyPrompts {
            kind: "no-input",
            max: 3,
            got: 4,
        };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('4'));
    }
}
