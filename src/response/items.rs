//! Rich-response items.
//!
//! Generation 2 renders an ordered item sequence; generation 1 has no item
//! sequence concept, so the serializer collapses everything to the first
//! simple item there. Structural constraints are enforced by
//! [`RichResponse::validate`] before any serialization happens.

use crate::error::ResponseError;

use super::Prompt;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseItem {
    Simple(SimpleResponse),
    BasicCard(BasicCard),
    Table(TableCard),
    Media(MediaResponse),
    BrowseCarousel(BrowseCarousel),
}

impl ResponseItem {
    pub fn is_simple(&self) -> bool {
        matches!(self, ResponseItem::Simple(_))
    }
}

/// Bare spoken/displayed reply; the mandatory backbone of any
/// non-system-intent response.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleResponse {
    pub prompt: Prompt,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub url: String,
    pub accessibility_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub title: String,
    pub open_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicCard {
    pub title: String,
    pub subtitle: Option<String>,
    pub formatted_text: Option<String>,
    pub image: Option<Image>,
    pub buttons: Vec<Button>,
}

impl BasicCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.formatted_text = Some(text.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>, alt: impl Into<String>) -> Self {
        self.image = Some(Image {
            url: url.into(),
            accessibility_text: alt.into(),
        });
        self
    }

    pub fn with_button(mut self, title: impl Into<String>, open_url: impl Into<String>) -> Self {
        self.buttons.push(Button {
            title: title.into(),
            open_url: open_url.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCard {
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaObject {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaResponse {
    pub objects: Vec<MediaObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseCarouselItem {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub footer: Option<String>,
    pub image: Option<Image>,
}

/// Web-link carousel. Like selection lists, fewer than 2 entries is a
/// structural error on the platform side, so it is rejected at build time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseCarousel {
    pub items: Vec<BrowseCarouselItem>,
}

impl BrowseCarousel {
    pub fn validate(&self) -> Result<(), ResponseError> {
        if self.items.len() < 2 {
            return Err(ResponseError::TooFewItems {
                kind: "browse carousel",
                got: self.items.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkOutSuggestion {
    pub destination_name: String,
    pub url: String,
}

// ── Rich response ─────────────────────────────────────────────────

/// Accumulated response items plus suggestion chips. Suggestion order is
/// preserved and uncapped here; the platform truncates on its side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichResponse {
    pub items: Vec<ResponseItem>,
    pub suggestions: Vec<Suggestion>,
    pub link_out: Option<LinkOutSuggestion>,
}

impl RichResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(prompt: impl Into<Prompt>) -> Self {
        Self::new().with_simple(prompt)
    }

    pub fn with_simple(mut self, prompt: impl Into<Prompt>) -> Self {
        self.items.push(ResponseItem::Simple(SimpleResponse {
            prompt: prompt.into(),
        }));
        self
    }

    pub fn with_basic_card(mut self, card: BasicCard) -> Self {
        self.items.push(ResponseItem::BasicCard(card));
        self
    }

    pub fn with_table(mut self, table: TableCard) -> Self {
        self.items.push(ResponseItem::Table(table));
        self
    }

    pub fn with_media(mut self, media: MediaResponse) -> Self {
        self.items.push(ResponseItem::Media(media));
        self
    }

    pub fn with_browse_carousel(mut self, carousel: BrowseCarousel) -> Self {
        self.items.push(ResponseItem::BrowseCarousel(carousel));
        self
    }

    pub fn with_suggestions<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions.extend(titles.into_iter().map(|t| Suggestion {
            title: t.into(),
        }));
        self
    }

    pub fn with_link_out(mut self, destination_name: impl Into<String>, url: impl Into<String>) -> Self {
        self.link_out = Some(LinkOutSuggestion {
            destination_name: destination_name.into(),
            url: url.into(),
        });
        self
    }

    /// First simple item, the one generation 1 collapses to.
    pub fn first_simple(&self) -> Option<&SimpleResponse> {
        self.items.iter().find_map(|item| match item {
            ResponseItem::Simple(s) => Some(s),
            _ => None,
        })
    }

    /// Structural validation for a non-system-intent response: at least one
    /// simple item, every prompt non-empty, nested carousels well-formed.
    pub fn validate(&self) -> Result<(), ResponseError> {
        if self.first_simple().is_none() {
            return Err(ResponseError::MissingSimpleItem);
        }
        for item in &self.items {
            match item {
                ResponseItem::Simple(s) if s.prompt.speech.trim().is_empty() => {
                    return Err(ResponseError::EmptyPrompt);
                }
                ResponseItem::BrowseCarousel(c) => c.validate()?,
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_builds_single_simple() {
        let rich = RichResponse::of("hello");
        assert_eq!(rich.items.len(), 1);
        assert!(rich.items[0].is_simple());
        assert!(rich.validate().is_ok());
    }

    #[test]
    fn card_only_response_is_invalid() {
        let rich = RichResponse::new().with_basic_card(BasicCard::new("title"));
        assert!(matches!(
            rich.validate(),
            Err(ResponseError::MissingSimpleItem)
        ));
    }

    #[test]
    fn empty_prompt_is_invalid() {
        let rich = RichResponse::of("   ");
        assert!(matches!(rich.validate(), Err(ResponseError::EmptyPrompt)));
    }

    #[test]
    fn suggestion_order_is_preserved() {
        let rich = RichResponse::of("hi").with_suggestions(["a", "b", "c"]);
        let titles: Vec<_> = rich.suggestions.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn browse_carousel_under_two_items_is_invalid() {
        let carousel = BrowseCarousel {
            items: vec![BrowseCarouselItem {
                title: "only".into(),
                url: "https://example.com".into(),
                description: None,
                footer: None,
                image: None,
            }],
        };
        let rich = RichResponse::of("look").with_browse_carousel(carousel);
        assert!(matches!(
            rich.validate(),
            Err(ResponseError::TooFewItems { kind: "browse carousel", got: 1 })
        ));
    }

    #[test]
    fn first_simple_skips_cards() {
        let rich = RichResponse::new()
            .with_basic_card(BasicCard::new("card"))
            .with_simple("speech");
        assert_eq!(rich.first_simple().unwrap().prompt.speech, "speech");
    }
}
