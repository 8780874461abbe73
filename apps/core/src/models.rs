use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Lowest allowed value for consecutive runs per request.
pub const MIN_REQUEST_COUNT: i64 = 1;
/// Highest allowed value for consecutive runs per request.
pub const MAX_REQUEST_COUNT: i64 = 10;

/// Per-user processing preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct UserSettings {
    /// Custom LLM prompt with `{text}` and `{exc}` placeholders. `None` means the default prompt.
    pub prompt_template: Option<String>,
    /// How many times a request is run back to back.
    #[validate(range(min = 1, max = 10))]
    pub request_count: i64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            prompt_template: None,
            request_count: MIN_REQUEST_COUNT,
        }
    }
}

/// One stored request and its result.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Row identifier.
    pub id: i64,
    /// Owner of the request (chat id).
    pub user_id: String,
    /// The text as submitted.
    pub request_text: String,
    /// Raw exclude string, if one was active.
    pub exclude_words: Option<String>,
    /// The text returned to the user.
    pub result_text: String,
    /// Unix timestamp of when the request was stored.
    pub created_at: i64,
}

/// Clamps a raw count argument into the allowed range.
///
/// Unparseable input counts as 1; digit strings too large for an integer count as the maximum.
pub fn clamp_request_count(raw: &str) -> i64 {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => n.clamp(MIN_REQUEST_COUNT, MAX_REQUEST_COUNT),
        Err(_) if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) => MAX_REQUEST_COUNT,
        Err(_) => MIN_REQUEST_COUNT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_request_count() {
        assert_eq!(clamp_request_count("3"), 3);
        assert_eq!(clamp_request_count(" 10 "), 10);
        assert_eq!(clamp_request_count("0"), 1);
        assert_eq!(clamp_request_count("-4"), 1);
        assert_eq!(clamp_request_count("25"), 10);
        assert_eq!(clamp_request_count("99999999999999999999999"), 10);
        assert_eq!(clamp_request_count("many"), 1);
        assert_eq!(clamp_request_count(""), 1);
    }

    #[test]
    fn test_settings_validation() {
        assert!(UserSettings::default().validate().is_ok());

        let too_many = UserSettings {
            prompt_template: None,
            request_count: 11,
        };
        assert!(too_many.validate().is_err());
    }
}
