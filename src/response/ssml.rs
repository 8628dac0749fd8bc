//! SSML detection.
//!
//! One rule, one call site to get it from: text is SSML when, after
//! trimming surrounding whitespace, it starts with the `<speak` open tag
//! and ends with the matching `</speak>` close tag, case-insensitively.
//! Every prompt string (initial, no-match, no-input) is classified
//! independently through this function — there is deliberately no second
//! detection path with different trimming.

/// Whether `text` should be written to the SSML wire field instead of the
/// plain text-to-speech one.
pub fn is_ssml(text: &str) -> bool {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();
    if !lower.ends_with("</speak>") {
        return false;
    }
    // `<speak>` or `<speak ...attrs>`, not `<speaker>`.
    if let Some(rest) = lower.strip_prefix("<speak") {
        matches!(rest.as_bytes().first(), Some(b'>' | b' ' | b'\t' | b'\n' | b'\r'))
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_pair_is_ssml() {
        assert!(is_ssml("<speak></speak>"));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(is_ssml("  <speak></speak>  "));
        assert!(is_ssml("\n<speak>hi</speak>\n"));
    }

    #[test]
    fn case_insensitive() {
        assert!(is_ssml("<SPEAK>hi</SPEAK>"));
        assert!(is_ssml("<Speak>hi</Speak>"));
    }

    #[test]
    fn attributes_allowed_on_open_tag() {
        assert!(is_ssml(r#"<speak version="1.0">hi</speak>"#));
    }

    #[test]
    fn plain_text_is_not_ssml() {
        assert!(!is_ssml("hello"));
        assert!(!is_ssml(""));
    }

    #[test]
    fn partial_markup_is_not_ssml() {
        assert!(!is_ssml("<speak>unclosed"));
        assert!(!is_ssml("unopened</speak>"));
        assert!(!is_ssml("say <speak>this</speak> please"));
    }

    #[test]
    fn speaker_tag_is_not_speak() {
        assert!(!is_ssml("<speaker>hi</speaker>"));
    }
}
