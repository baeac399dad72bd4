//! Tag names of the worksheet XML.
//!
//! Every tag has the short wire name that wxMaxima writes and a descriptive
//! alias; both map to the same [`Tag`].

use crate::model::TextStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Atom with a fixed text style.
    Atom(TextStyle),
    /// `<t>`: plain text, error style when `type="error"`.
    OtherText,
    HiddenText,
    Label,
    Space,
    Fraction,
    Power,
    Subscript,
    SubSup,
    Root,
    Abs,
    Conjugate,
    Paren,
    Diff,
    Sum,
    Integral,
    Function,
    At,
    Limit,
    Table,
    Run,
    /// `<mth>` and `<line>`: a run that starts on a new line.
    MathLine,
    Highlight,
    Image,
    Animation,
    Editor,
    Cell,
    CharCode,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "v" | "variable" => Tag::Atom(TextStyle::Variable),
            "n" | "number" => Tag::Atom(TextStyle::Number),
            "g" | "greek" => Tag::Atom(TextStyle::GreekConstant),
            "s" | "special-constant" => Tag::Atom(TextStyle::SpecialConstant),
            "fnm" | "function-name" => Tag::Atom(TextStyle::Function),
            "st" | "string" => Tag::Atom(TextStyle::String),
            "t" | "other-text" => Tag::OtherText,
            "h" | "hidden-text" => Tag::HiddenText,
            "lbl" | "label" => Tag::Label,
            "mspace" | "space" => Tag::Space,
            "f" | "fraction" => Tag::Fraction,
            "e" | "power" => Tag::Power,
            "i" | "subscript" => Tag::Subscript,
            "ie" | "sub-superscript" => Tag::SubSup,
            "q" | "root" => Tag::Root,
            "a" | "absolute-value" => Tag::Abs,
            "cj" | "conjugate" => Tag::Conjugate,
            "p" | "parenthesis" => Tag::Paren,
            "d" | "derivative" => Tag::Diff,
            "sm" | "sum" => Tag::Sum,
            "in" | "integral" => Tag::Integral,
            "fn" | "function-application" => Tag::Function,
            "at" | "at-evaluation" => Tag::At,
            "lm" | "limit" => Tag::Limit,
            "tb" | "table" => Tag::Table,
            "r" | "grouped-run" => Tag::Run,
            "mth" | "line" | "math-line" | "document-line" => Tag::MathLine,
            "hl" | "highlighted-run" => Tag::Highlight,
            "img" | "image" => Tag::Image,
            "slide" | "animation" => Tag::Animation,
            "editor" => Tag::Editor,
            "cell" => Tag::Cell,
            "ascii" | "character-code" => Tag::CharCode,
            _ => return None,
        };
        Some(tag)
    }
}

// Attribute names.
pub const ALT_COPY: &str = "altCopy";
pub const BREAK_LINE: &str = "breakline";
pub const TYPE: &str = "type";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_and_aliases_agree() {
        assert_eq!(Tag::from_name("f"), Tag::from_name("fraction"));
        assert_eq!(Tag::from_name("lm"), Some(Tag::Limit));
        assert_eq!(Tag::from_name("line"), Some(Tag::MathLine));
        assert_eq!(Tag::from_name("v"), Some(Tag::Atom(TextStyle::Variable)));
        assert_eq!(Tag::from_name("bogus"), None);
    }
}
