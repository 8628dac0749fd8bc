//! Selection lists and carousels.
//!
//! Both ride the option-select system intent: the platform renders the
//! choices and the next turn arrives with the chosen key as an option
//! argument. The 2-item floor is a platform structural constraint checked
//! at build time, never at serialization.

use crate::error::ResponseError;

use super::items::Image;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionItem {
    /// Key echoed back in the option argument of the follow-up turn.
    pub key: String,
    /// Alternative spoken matches for the key.
    pub synonyms: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<Image>,
}

impl OptionItem {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>, alt: impl Into<String>) -> Self {
        self.image = Some(Image {
            url: url.into(),
            accessibility_text: alt.into(),
        });
        self
    }
}

/// Vertical selection list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSelect {
    pub title: Option<String>,
    pub items: Vec<OptionItem>,
}

impl ListSelect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_item(mut self, item: OptionItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn validate(&self) -> Result<(), ResponseError> {
        validate_options("list", &self.items)
    }
}

/// Horizontal browsing carousel of selectable tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselSelect {
    pub items: Vec<OptionItem>,
}

impl CarouselSelect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: OptionItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn validate(&self) -> Result<(), ResponseError> {
        validate_options("carousel", &self.items)
    }
}

fn validate_options(kind: &'static str, items: &[OptionItem]) -> Result<(), ResponseError> {
    if items.len() < 2 {
        return Err(ResponseError::TooFewItems {
            kind,
            got: items.len(),
        });
    }
    for item in items {
        if item.key.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "option select",
                reason: format!("item {:?} has an empty key", item.title),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str) -> OptionItem {
        OptionItem::new(key, format!("title {key}"))
    }

    #[test]
    fn empty_list_is_invalid() {
        assert!(matches!(
            ListSelect::new().validate(),
            Err(ResponseError::TooFewItems { kind: "list", got: 0 })
        ));
    }

    #[test]
    fn single_item_list_is_invalid() {
        let list = ListSelect::new().with_item(item("a"));
        assert!(matches!(
            list.validate(),
            Err(ResponseError::TooFewItems { kind: "list", got: 1 })
        ));
    }

    #[test]
    fn two_item_list_is_valid() {
        let list = ListSelect::new()
            .with_title("pick one")
            .with_item(item("a"))
            .with_item(item("b"));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn carousel_mirrors_list_floor() {
        assert!(matches!(
            CarouselSelect::new().with_item(item("a")).validate(),
            Err(ResponseError::TooFewItems { kind: "carousel", got: 1 })
        ));
        let ok = CarouselSelect::new().with_item(item("a")).with_item(item("b"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn blank_key_is_invalid() {
        let list = ListSelect::new()
            .with_item(item("a"))
            .with_item(OptionItem::new("  ", "blank"));
        assert!(matches!(
            list.validate(),
            Err(ResponseError::InvalidSystemIntent { intent: "option select", .. })
        ));
    }

    #[test]
    fn option_item_builder_collects_synonyms() {
        let it = item("a").with_synonyms(["one", "uno"]).with_description("first");
        assert_eq!(it.synonyms, ["one", "uno"]);
        assert_eq!(it.description.as_deref(), Some("first"));
    }
}
