//! Common validation utilities.

use validator::ValidationError;

/// Maximum number of dietary tags per item.
const MAX_TAGS: usize = 10;

/// Maximum length of a single tag.
const MAX_TAG_LENGTH: usize = 32;

lazy_static::lazy_static! {
    static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
    static ref CURRENCY_REGEX: regex::Regex = regex::Regex::new(r"^[A-Z]{3}$").unwrap();
}

/// Parses `#RGB` or `#RRGGBB` into an RGB triple.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    if !HEX_COLOR_REGEX.is_match(value) {
        return None;
    }
    let hex = &value[1..];
    if hex.len() == 3 {
        let mut rgb = [0u8; 3];
        for (i, c) in hex.chars().enumerate() {
            let v = c.to_digit(16)? as u8;
            rgb[i] = v * 16 + v;
        }
        Some(rgb)
    } else {
        Some([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ])
    }
}

/// Validates a CSS-style hex color (`#RGB` or `#RRGGBB`).
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if parse_hex_color(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value like #1A2B3C".into());
        Err(err)
    }
}

/// Validates an ISO-4217 style currency code (three uppercase letters).
pub fn validate_currency_code(value: &str) -> Result<(), ValidationError> {
    if CURRENCY_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_code");
        err.message = Some("Currency must be a three-letter code like USD".into());
        Err(err)
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a list of short free-form tags.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        let mut err = ValidationError::new("tags_count");
        err.message = Some(format!("At most {} tags are allowed", MAX_TAGS).into());
        return Err(err);
    }
    if tags
        .iter()
        .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_LENGTH)
    {
        let mut err = ValidationError::new("tag_length");
        err.message = Some(format!("Tags must be 1-{} characters", MAX_TAG_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Returns true when the value looks like an absolute http(s) URL.
pub fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
