use super::helpers::{MINUS_SIGN, decode_char_code, displayed_digits, elide_digits};
use super::{ContentSource, MathParser, ParseContext};
use crate::config::DISPLAYED_DIGITS;
use crate::model::*;
use roxmltree::Node;

impl<S: ContentSource> MathParser<S> {
    /// Turn text content into text cells, one per line. Never empty: missing
    /// content gives a single empty cell.
    pub(super) fn text_cells(
        &self,
        content: Option<&str>,
        style: TextStyle,
        ctx: ParseContext,
    ) -> Chain {
        let mut chain = Chain::new();
        if let Some(content) = content.filter(|c| !c.is_empty()) {
            let mut text = content.replace('-', &MINUS_SIGN.to_string());
            if style == TextStyle::Number {
                let limit = displayed_digits(self.config.read_int(DISPLAYED_DIGITS));
                text = elide_digits(&text, limit);
            }
            for (i, line) in text.split('\n').filter(|l| !l.is_empty()).enumerate() {
                let mut cell = Cell::text(line);
                cell.cell_type = if style == TextStyle::Error {
                    CellType::Error
                } else {
                    ctx.style
                };
                cell.text_style = style;
                cell.highlight = ctx.highlight;
                cell.break_line = i > 0;
                chain.push(cell);
            }
        }
        if chain.is_empty() {
            chain.push(Cell::text(""));
        }
        chain
    }
}

/// `<ascii>65</ascii>`: a single character given by its code point.
pub(super) fn parse_char_code(node: Node, ctx: ParseContext) -> Cell {
    let Some(content) = node.text().filter(|c| !c.is_empty()) else {
        return Cell::text("");
    };
    let mut cell = Cell::text(decode_char_code(content));
    cell.cell_type = ctx.style;
    cell.highlight = ctx.highlight;
    cell
}
