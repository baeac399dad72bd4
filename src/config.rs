//! Display limits read by the parser.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Maximum number of digits shown for a number before it is elided.
pub const DISPLAYED_DIGITS: &str = "displayedDigits";
/// Tier (0..=3) of the longest line that is parsed at all.
pub const SHOW_LENGTH: &str = "showLength";

/// Key-value store of integer settings.
pub trait ConfigSource {
    fn read_int(&self, key: &str) -> Option<i64>;
}

/// Settings file as written by the application.
///
/// ```json
/// { "displayedDigits": 60, "showLength": 1 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    #[serde(default)]
    pub displayed_digits: Option<i64>,
    #[serde(default)]
    pub show_length: Option<i64>,
}

impl ParserConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse parser configuration")
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid configuration in {}", path))
    }
}

impl ConfigSource for ParserConfig {
    fn read_int(&self, key: &str) -> Option<i64> {
        match key {
            DISPLAYED_DIGITS => self.displayed_digits,
            SHOW_LENGTH => self.show_length,
            _ => None,
        }
    }
}

impl ConfigSource for BTreeMap<String, i64> {
    fn read_int(&self, key: &str) -> Option<i64> {
        self.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keys_are_camel_case() {
        let cfg = ParserConfig::from_json_str(r#"{"displayedDigits": 12}"#).unwrap();
        assert_eq!(cfg.read_int(DISPLAYED_DIGITS), Some(12));
        assert_eq!(cfg.read_int(SHOW_LENGTH), None);
        assert_eq!(cfg.read_int("other"), None);
    }

    #[test]
    fn map_source() {
        let mut map = BTreeMap::new();
        map.insert(SHOW_LENGTH.to_string(), 3);
        assert_eq!(map.read_int(SHOW_LENGTH), Some(3));
    }
}
