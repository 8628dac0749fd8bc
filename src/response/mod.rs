//! Response model: what a handler declares, validated before serialization.

pub mod items;
pub mod options;
pub mod ssml;
pub mod system_intent;

pub use items::{
    BasicCard, BrowseCarousel, BrowseCarouselItem, Button, Image, LinkOutSuggestion,
    MediaObject, MediaResponse, ResponseItem, RichResponse, SimpleResponse, Suggestion, TableCard,
};
pub use options::{CarouselSelect, ListSelect, OptionItem};
pub use system_intent::{OptionSelectKind, Permission, SystemIntent};

use crate::error::ResponseError;

/// No-match and no-input prompt arrays are each capped at this many
/// entries; a fourth is a configuration error, not a silent truncation.
pub const MAX_REPROMPTS: usize = 3;

// ── Prompt ────────────────────────────────────────────────────────

/// One spoken prompt, optionally with separate display text. Whether the
/// speech goes out on the SSML or plain text field is decided per prompt by
/// [`ssml::is_ssml`] at serialization time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub speech: String,
    pub display_text: Option<String>,
}

impl Prompt {
    pub fn new(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            display_text: None,
        }
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    pub fn is_ssml(&self) -> bool {
        ssml::is_ssml(&self.speech)
    }
}

impl From<&str> for Prompt {
    fn from(speech: &str) -> Self {
        Prompt::new(speech)
    }
}

impl From<String> for Prompt {
    fn from(speech: String) -> Self {
        Prompt::new(speech)
    }
}

// ── Reprompts ─────────────────────────────────────────────────────

/// The ask-side prompt bundle: one initial prompt plus capped no-match and
/// no-input arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reprompts {
    pub no_match: Vec<Prompt>,
    pub no_input: Vec<Prompt>,
}

impl Reprompts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ResponseError> {
        if self.no_match.len() > MAX_REPROMPTS {
            return Err(ResponseError::TooManyPrompts {
                kind: "no-match",
                max: MAX_REPROMPTS,
                got: self.no_match.len(),
            });
        }
        if self.no_input.len() > MAX_REPROMPTS {
            return Err(ResponseError::TooManyPrompts {
                kind: "no-input",
                max: MAX_REPROMPTS,
                got: self.no_input.len(),
            });
        }
        Ok(())
    }
}

// ── Response model ────────────────────────────────────────────────

/// The finished per-turn response, ready for wire projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseModel {
    /// true ⇒ ask, false ⇒ terminal tell.
    pub expect_user_response: bool,
    pub rich: RichResponse,
    pub reprompts: Reprompts,
    pub system_intent: Option<SystemIntent>,
}

impl ResponseModel {
    /// A terminal tell.
    pub fn tell(rich: RichResponse) -> Result<Self, ResponseError> {
        rich.validate()?;
        Ok(Self {
            expect_user_response: false,
            rich,
            reprompts: Reprompts::none(),
            system_intent: None,
        })
    }

    /// An ask expecting free-form input.
    pub fn ask(rich: RichResponse, reprompts: Reprompts) -> Result<Self, ResponseError> {
        rich.validate()?;
        reprompts.validate()?;
        Ok(Self {
            expect_user_response: true,
            rich,
            reprompts,
            system_intent: None,
        })
    }

    /// An ask driven by a system intent. The initial prompt is the intent's
    /// placeholder; a system intent implies `expect_user_response`.
    pub fn system(intent: SystemIntent) -> Result<Self, ResponseError> {
        let rich = RichResponse::of(intent.placeholder_prompt());
        Ok(Self {
            expect_user_response: true,
            rich,
            reprompts: Reprompts::none(),
            system_intent: Some(intent),
        })
    }
}
