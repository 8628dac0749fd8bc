use serde::{Deserialize, Serialize};

// ── Adapter configuration ─────────────────────────────────────────

/// Configuration for one [`ProtocolAdapter`](crate::adapter::ProtocolAdapter)
/// instance.
///
/// Everything here is instance-scoped: there are no process-global flags or
/// module-level mutable defaults. Two adapters with different configs can
/// coexist in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Text spoken for unrecoverable turn failures (unknown dispatch key,
    /// handler error with no registered error handler).
    #[serde(default = "default_apology_text")]
    pub apology_text: String,

    /// Prefix attached to HTTP 400 error bodies. The 400 body is a short
    /// human-readable string, never the conversational JSON shape.
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,

    /// Name of the reserved long-lived context that carries session data on
    /// the NLU front end. The leading/trailing underscores keep it out of
    /// the way of developer context names.
    #[serde(default = "default_state_context_name")]
    pub state_context_name: String,

    #[serde(default)]
    pub signature: SignatureConfig,
}

fn default_apology_text() -> String {
    "Sorry, I am unable to process your request.".into()
}

fn default_error_prefix() -> String {
    "Fulfillment Error: ".into()
}

fn default_state_context_name() -> String {
    "_voxhook_dialog_".into()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            apology_text: default_apology_text(),
            error_prefix: default_error_prefix(),
            state_context_name: default_state_context_name(),
            signature: SignatureConfig::default(),
        }
    }
}

// ── Request-signature predicate ───────────────────────────────────

/// Boundary check for inbound requests: a developer-supplied header/value
/// pair compared in constant time. This is a shared-secret predicate, not
/// cryptographic signature verification — that stays outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Header the platform sends the shared secret in.
    #[serde(default = "default_signature_header")]
    pub header: String,

    /// Expected value. `None` disables the check entirely.
    #[serde(default)]
    pub expected: Option<String>,
}

fn default_signature_header() -> String {
    "Assistant-Signature".into()
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            header: default_signature_header(),
            expected: None,
        }
    }
}

impl SignatureConfig {
    /// Constant-time verification of the presented header value. Returns
    /// `true` when no expected value is configured.
    pub fn verify(&self, presented: Option<&str>) -> bool {
        let Some(ref expected) = self.expected else {
            return true;
        };
        let Some(presented) = presented else {
            return false;
        };
        constant_time_eq(presented, expected)
    }
}

/// Constant-time equality comparison for secret strings.
fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let cfg = AdapterConfig::default();
        assert!(cfg.apology_text.starts_with("Sorry"));
        assert_eq!(cfg.error_prefix, "Fulfillment Error: ");
        assert_eq!(cfg.state_context_name, "_voxhook_dialog_");
        assert!(cfg.signature.expected.is_none());
    }

    #[test]
    fn config_deserializes_from_partial_toml_shaped_json() {
        let cfg: AdapterConfig =
            serde_json::from_str(r#"{"signature": {"expected": "s3cret"}}"#).unwrap();
        assert_eq!(cfg.signature.header, "Assistant-Signature");
        assert_eq!(cfg.signature.expected.as_deref(), Some("s3cret"));
        assert!(cfg.apology_text.starts_with("Sorry"));
    }

    #[test]
    fn signature_disabled_accepts_anything() {
        let sig = SignatureConfig::default();
        assert!(sig.verify(None));
        assert!(sig.verify(Some("whatever")));
    }

    #[test]
    fn signature_enabled_requires_exact_match() {
        let sig = SignatureConfig {
            header: "Assistant-Signature".into(),
            expected: Some("s3cret".into()),
        };
        assert!(sig.verify(Some("s3cret")));
        assert!(!sig.verify(Some("s3cret ")));
        assert!(!sig.verify(Some("S3CRET")));
        assert!(!sig.verify(None));
    }
}
