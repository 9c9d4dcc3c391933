//! Serde adapters for free-text request fields.
//!
//! Values are trimmed while deserializing so length rules see what will be
//! stored. Use them with `#[serde(deserialize_with = "...")]`; the optional
//! forms also need `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

/// A required string, trimmed. A blank value becomes `""` so a
/// `length(min = 1)` rule rejects it.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// An optional string, trimmed. A blank value stays `Some("")` so a
/// `length(min = 1)` rule still rejects it.
pub fn trimmed_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// An optional string where blank means absent.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(Option::<String>::deserialize(deserializer)?))
}

/// A nullable column in a partial update.
///
/// A missing field is `None` (keep the stored value); `null` or a blank
/// string is `Some(None)` (clear it); anything else is `Some(Some(value))`.
pub fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(non_blank(Option::<String>::deserialize(deserializer)?)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(deserialize_with = "super::trimmed")]
        tag: String,
        #[serde(default, deserialize_with = "super::trimmed_optional")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::blank_as_none")]
        notes: Option<String>,
        #[serde(default, deserialize_with = "super::nullable")]
        email: Option<Option<String>>,
    }

    fn parse(json: &str) -> Patch {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn required_and_optional_values_are_trimmed() {
        let patch = parse(r#"{"tag": "  IT-9 ", "name": "   "}"#);
        assert_eq!(patch.tag, "IT-9");
        assert_eq!(patch.name.as_deref(), Some(""));
    }

    #[test]
    fn blank_optional_text_is_absent() {
        let patch = parse(r#"{"tag": "x", "notes": "  "}"#);
        assert_eq!(patch.notes, None);
        let patch = parse(r#"{"tag": "x", "notes": " spare "}"#);
        assert_eq!(patch.notes.as_deref(), Some("spare"));
    }

    #[test]
    fn nullable_distinguishes_missing_from_cleared() {
        assert_eq!(parse(r#"{"tag": "x"}"#).email, None);
        assert_eq!(parse(r#"{"tag": "x", "email": null}"#).email, Some(None));
        assert_eq!(parse(r#"{"tag": "x", "email": ""}"#).email, Some(None));
        assert_eq!(
            parse(r#"{"tag": "x", "email": " a@b.io "}"#).email,
            Some(Some("a@b.io".to_string()))
        );
    }
}
