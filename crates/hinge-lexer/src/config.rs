//! Delimiter configuration for the scanner.

use serde::Deserialize;

/// Tag and comment delimiters recognized by the [`Scanner`](crate::Scanner).
///
/// Deserializes from a partial object; missing fields keep their defaults:
///
/// ```
/// let config: hinge_lexer::LexerConfig =
///     serde_json::from_str(r#"{ "block_start": "<%", "block_end": "%>" }"#).unwrap();
/// assert_eq!(config.comment_start, "{#");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    pub block_start: String,
    pub block_end: String,
    pub comment_start: String,
    pub comment_end: String,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            block_start: "{%".into(),
            block_end: "%}".into(),
            comment_start: "{#".into(),
            comment_end: "#}".into(),
        }
    }
}

/// Rejected delimiter configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Delimiter '{name}' must not be empty")]
    EmptyDelimiter { name: &'static str },

    #[error("Block start and comment start must differ (both are '{delimiter}')")]
    AmbiguousStart { delimiter: String },
}

impl LexerConfig {
    /// Check that the delimiters can be told apart while scanning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delimiters = [
            ("block_start", &self.block_start),
            ("block_end", &self.block_end),
            ("comment_start", &self.comment_start),
            ("comment_end", &self.comment_end),
        ];
        for (name, value) in delimiters {
            if value.is_empty() {
                return Err(ConfigError::EmptyDelimiter { name });
            }
        }

        if self.block_start == self.comment_start {
            return Err(ConfigError::AmbiguousStart {
                delimiter: self.block_start.clone(),
            });
        }

        Ok(())
    }
}
