//! Input validation helpers.
//!
//! Pure functions that check or normalize strings coming from the environment or
//! from interaction options. The limits mirror the ones Discord enforces on its side
//! so a request that passes here is not rejected later by the API.

use crate::errors::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Discord audit log reason limit
pub const MAX_REASON_LENGTH: usize = 512;
/// Discord message content limit
pub const MAX_MESSAGE_LENGTH: usize = 2000;
/// Embed title limit
pub const MAX_EMBED_TITLE_LENGTH: usize = 256;
/// Embed description limit
pub const MAX_EMBED_DESCRIPTION_LENGTH: usize = 4096;
/// Embed field name limit
pub const MAX_EMBED_FIELD_NAME_LENGTH: usize = 256;
/// Embed field value limit
pub const MAX_EMBED_FIELD_VALUE_LENGTH: usize = 1024;

#[allow(clippy::expect_used)]
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid token pattern"));
#[allow(clippy::expect_used)]
static SNOWFLAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{17,19}$").expect("valid snowflake pattern"));
#[allow(clippy::expect_used)]
static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("valid colour pattern"));
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
#[allow(clippy::expect_used)]
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([smhd])$").expect("valid duration pattern"));

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Checks the general shape of a bot token. An optional `Bot ` prefix is ignored.
#[must_use]
pub fn is_valid_discord_token(token: &str) -> bool {
    let bare = token.strip_prefix("Bot ").unwrap_or(token);
    token.len() > 50 && TOKEN_RE.is_match(bare)
}

/// Application ids and every other snowflake are 17 to 19 decimal digits.
#[must_use]
pub fn is_valid_client_id(client_id: &str) -> bool {
    SNOWFLAKE_RE.is_match(client_id)
}

/// Same rule as [`is_valid_client_id`], named for guild/user/channel ids.
#[must_use]
pub fn is_valid_snowflake(id: &str) -> bool {
    is_valid_client_id(id)
}

/// 2-32 characters and none of `@ # : `` ` ``.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    let len = char_len(username);
    (2..=32).contains(&len) && !username.contains(['@', '#', ':', '`'])
}

/// Server names are 2-100 characters.
#[must_use]
pub fn is_valid_guild_name(name: &str) -> bool {
    (2..=100).contains(&char_len(name))
}

/// Legacy command prefix: 1-5 characters without whitespace.
#[must_use]
pub fn is_valid_prefix(prefix: &str) -> bool {
    (1..=5).contains(&char_len(prefix)) && !prefix.chars().any(char::is_whitespace)
}

/// Moderation reasons fit the 512 character audit log limit.
#[must_use]
pub fn is_valid_reason(reason: &str) -> bool {
    char_len(reason) <= MAX_REASON_LENGTH
}

/// Non-empty and within the message limit.
#[must_use]
pub fn is_valid_message_content(content: &str) -> bool {
    (1..=MAX_MESSAGE_LENGTH).contains(&char_len(content))
}

/// Embed title, may be empty.
#[must_use]
pub fn is_valid_embed_title(title: &str) -> bool {
    char_len(title) <= MAX_EMBED_TITLE_LENGTH
}

/// Embed description, may be empty.
#[must_use]
pub fn is_valid_embed_description(description: &str) -> bool {
    char_len(description) <= MAX_EMBED_DESCRIPTION_LENGTH
}

/// Embed field names must not be empty.
#[must_use]
pub fn is_valid_embed_field_name(name: &str) -> bool {
    (1..=MAX_EMBED_FIELD_NAME_LENGTH).contains(&char_len(name))
}

/// Embed field values must not be empty.
#[must_use]
pub fn is_valid_embed_field_value(value: &str) -> bool {
    (1..=MAX_EMBED_FIELD_VALUE_LENGTH).contains(&char_len(value))
}

/// `#RRGGBB`, case-insensitive.
#[must_use]
pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color)
}

/// Parses `value` as an integer and checks the optional inclusive bounds.
#[must_use]
pub fn is_valid_integer(value: &str, min: Option<i64>, max: Option<i64>) -> bool {
    let Ok(num) = value.trim().parse::<i64>() else {
        return false;
    };
    min.is_none_or(|min| num >= min) && max.is_none_or(|max| num <= max)
}

/// Absolute URL with a scheme.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Loose `local@domain.tld` shape check.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Any well-formed JSON document.
#[must_use]
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Durations look like `30s`, `15m`, `2h` or `7d`.
#[must_use]
pub fn is_valid_duration(duration: &str) -> bool {
    DURATION_RE.is_match(duration)
}

/// Converts a duration string (see [`is_valid_duration`]) into a [`Duration`].
pub fn parse_duration(duration: &str) -> Result<Duration> {
    let invalid = || Error::Validation {
        field: "duration".to_string(),
        message: format!("`{duration}` is not of the form <number><s|m|h|d>"),
    };

    let captures = DURATION_RE.captures(duration).ok_or_else(invalid)?;
    let amount: u64 = captures[1].parse().map_err(|_| invalid())?;
    let unit_secs = match &captures[2] {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

/// Strips markup-sensitive characters, trims and caps the result at the message limit.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect::<String>()
        .trim()
        .chars()
        .take(MAX_MESSAGE_LENGTH)
        .collect()
}

/// Cuts `value` to at most `max` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate(value: &str, max: usize) -> String {
    if char_len(value) <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validation() {
        let token = format!("{}.{}.{}", "A".repeat(24), "b".repeat(6), "c".repeat(27));
        assert!(is_valid_discord_token(&token));
        assert!(is_valid_discord_token(&format!("Bot {token}")));
        assert!(!is_valid_discord_token("short"));
        assert!(!is_valid_discord_token(&format!("{token} with spaces")));
    }

    #[test]
    fn test_snowflake_validation() {
        assert!(is_valid_client_id("123456789012345678"));
        assert!(is_valid_snowflake("12345678901234567"));
        assert!(!is_valid_client_id("1234"));
        assert!(!is_valid_client_id("12345678901234567890"));
        assert!(!is_valid_client_id("12345678901234567a"));
    }

    #[test]
    fn test_name_and_prefix_rules() {
        assert!(is_valid_username("ferris"));
        assert!(!is_valid_username("a"));
        assert!(!is_valid_username("bad#name"));
        assert!(is_valid_guild_name("Rustaceans"));
        assert!(!is_valid_guild_name("x"));
        assert!(is_valid_prefix("!"));
        assert!(is_valid_prefix("?!"));
        assert!(!is_valid_prefix(""));
        assert!(!is_valid_prefix("a b"));
        assert!(!is_valid_prefix("toolong"));
    }

    #[test]
    fn test_length_limits() {
        assert!(is_valid_reason(&"r".repeat(512)));
        assert!(!is_valid_reason(&"r".repeat(513)));
        assert!(!is_valid_message_content(""));
        assert!(is_valid_message_content(&"m".repeat(2000)));
        assert!(!is_valid_message_content(&"m".repeat(2001)));
        assert!(is_valid_embed_title(""));
        assert!(!is_valid_embed_title(&"t".repeat(257)));
        assert!(is_valid_embed_description(&"d".repeat(4096)));
        assert!(!is_valid_embed_description(&"d".repeat(4097)));
        assert!(!is_valid_embed_field_name(""));
        assert!(is_valid_embed_field_name(&"n".repeat(256)));
        assert!(!is_valid_embed_field_name(&"n".repeat(257)));
        assert!(is_valid_embed_field_value(&"v".repeat(1024)));
        assert!(!is_valid_embed_field_value(&"v".repeat(1025)));
    }

    #[test]
    fn test_misc_formats() {
        assert!(is_valid_hex_color("#5865f2"));
        assert!(!is_valid_hex_color("5865F2"));
        assert!(is_valid_integer("5", Some(1), Some(100)));
        assert!(!is_valid_integer("0", Some(1), None));
        assert!(!is_valid_integer("five", None, None));
        assert!(is_valid_url("https://discord.com/developers"));
        assert!(!is_valid_url("not a url"));
        assert!(is_valid_email("mod@example.org"));
        assert!(!is_valid_email("mod@example"));
        assert!(is_valid_json(r#"{"ownerId": "1"}"#));
        assert!(!is_valid_json("{"));
    }

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("30s")?, Duration::from_secs(30));
        assert_eq!(parse_duration("15m")?, Duration::from_secs(900));
        assert_eq!(parse_duration("2h")?, Duration::from_secs(7200));
        assert_eq!(parse_duration("1d")?, Duration::from_secs(86_400));
        assert!(is_valid_duration("10m"));
        assert!(!is_valid_duration("10w"));
        assert!(matches!(
            parse_duration("1.5h"),
            Err(Error::Validation { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_sanitize_and_truncate() {
        assert_eq!(sanitize_input("  <b>hi</b> & 'bye'  "), "bhi/b  bye");
        assert_eq!(sanitize_input(&"x".repeat(2500)).len(), 2000);
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
