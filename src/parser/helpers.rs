//! Helper functions for walking worksheet XML and applying display limits.

use roxmltree::Node;

/// Text shown instead of a line that exceeds the configured length.
pub const TOO_LONG_MESSAGE: &str =
    " << Expression longer than allowed by the configuration setting! >>";

pub const MINUS_SIGN: char = '\u{2212}';
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

const DEFAULT_DISPLAYED_DIGITS: i64 = 100;
const MIN_DISPLAYED_DIGITS: i64 = 10;
const MAX_ELIDED_SEGMENT: usize = 30;

/// True for text nodes that carry only indentation.
pub fn is_whitespace_text(node: Node) -> bool {
    node.is_text() && node.text().is_none_or(|t| t.trim().is_empty())
}

/// Elements and non-blank text nodes below `node`, in document order.
pub fn significant_children<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|c| c.is_element() || (c.is_text() && !is_whitespace_text(*c)))
        .collect()
}

/// `name="true"`, with `default` when the attribute is absent.
pub fn bool_attribute(node: Node, name: &str, default: bool) -> bool {
    node.attribute(name).map_or(default, |v| v == "true")
}

pub fn has_attributes(node: Node) -> bool {
    node.attributes().next().is_some()
}

/// Digit limit from the `displayedDigits` setting.
pub fn displayed_digits(setting: Option<i64>) -> usize {
    let digits = setting
        .unwrap_or(DEFAULT_DISPLAYED_DIGITS)
        .max(MIN_DISPLAYED_DIGITS);
    usize::try_from(digits).unwrap_or(usize::MAX)
}

/// Shorten a number longer than `limit` to `<left>[<n> digits]<right>`.
pub fn elide_digits(number: &str, limit: usize) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() <= limit {
        return number.to_string();
    }
    let keep = (limit / 3).min(MAX_ELIDED_SEGMENT);
    let left: String = chars[..keep].iter().collect();
    let right: String = chars[chars.len() - keep..].iter().collect();
    format!("{}[{} digits]{}", left, chars.len() - 2 * keep, right)
}

/// Character threshold for the `showLength` setting. `None` means unlimited;
/// lines at or above the threshold are not parsed.
pub fn show_length_threshold(setting: Option<i64>) -> Option<usize> {
    match setting.unwrap_or(0) {
        0 => Some(50_000),
        1 => Some(500_000),
        2 => Some(5_000_000),
        3 => None,
        // A negative setting rejects every line.
        other => Some(usize::try_from(other).unwrap_or(0)),
    }
}

/// Replace every control character, line breaks included, with U+FFFD.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { REPLACEMENT_CHAR } else { c })
        .collect()
}

/// Decode the content of an `<ascii>` tag.
pub fn decode_char_code(content: &str) -> String {
    content
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(char::from_u32)
        .map_or_else(|| content.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elides_long_numbers() {
        let n = "1".repeat(1000);
        let out = elide_digits(&n, 10);
        assert_eq!(out, "111[994 digits]111");
    }

    #[test]
    fn elision_segment_is_capped() {
        let n = "7".repeat(500);
        let out = elide_digits(&n, 200);
        assert_eq!(out, format!("{}[440 digits]{}", "7".repeat(30), "7".repeat(30)));
    }

    #[test]
    fn short_numbers_are_kept() {
        assert_eq!(elide_digits("12345", 10), "12345");
        assert_eq!(elide_digits(&"9".repeat(10), 10), "9".repeat(10));
    }

    #[test]
    fn digit_limit_is_clamped() {
        assert_eq!(displayed_digits(None), 100);
        assert_eq!(displayed_digits(Some(3)), 10);
        assert_eq!(displayed_digits(Some(42)), 42);
    }

    #[test]
    fn show_length_tiers() {
        assert_eq!(show_length_threshold(None), Some(50_000));
        assert_eq!(show_length_threshold(Some(0)), Some(50_000));
        assert_eq!(show_length_threshold(Some(1)), Some(500_000));
        assert_eq!(show_length_threshold(Some(2)), Some(5_000_000));
        assert_eq!(show_length_threshold(Some(3)), None);
        assert_eq!(show_length_threshold(Some(20)), Some(20));
        assert_eq!(show_length_threshold(Some(-5)), Some(0));
    }

    #[test]
    fn control_chars_replaced() {
        assert_eq!(strip_control_chars("a\u{7}b"), "a\u{FFFD}b");
        assert_eq!(strip_control_chars("a\nb\tc\r"), "a\u{FFFD}b\u{FFFD}c\u{FFFD}");
    }

    #[test]
    fn char_codes() {
        assert_eq!(decode_char_code("65"), "A");
        assert_eq!(decode_char_code("x"), "x");
    }
}
