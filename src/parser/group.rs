//! Worksheet units (`<cell>`) and their editable text (`<editor>`).
//!
//! Any change to the group structure has to be mirrored here, otherwise
//! older `.wxmx` files stop loading correctly.

use super::helpers::{bool_attribute, significant_children};
use super::tags::TYPE;
use super::{ContentSource, MathParser, ParseContext};
use crate::model::*;
use roxmltree::Node;

impl<S: ContentSource> MathParser<S> {
    /// Build one group from a `<cell type="...">` element. Unknown types yield `None`.
    pub(super) fn parse_group(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let type_attr = node.attribute(TYPE).unwrap_or("text");
        let sectioning_level = node.attribute("sectioning_level").unwrap_or("0");
        let group_type = match type_attr {
            "code" => GroupType::Code,
            "image" => GroupType::Image,
            "text" => GroupType::Text,
            "pagebreak" => GroupType::Pagebreak,
            "title" => GroupType::Title,
            "section" => GroupType::Section,
            // Sub-subsections are stored as subsections with sectioning level 4
            // so that older readers still show them as subsections.
            "subsection" if sectioning_level == "4" => GroupType::Subsubsection,
            "subsection" => GroupType::Subsection,
            "subsubsection" => GroupType::Subsubsection,
            other => {
                tracing::warn!(cell_type = other, "skipping cell of unknown type");
                return None;
            }
        };

        let id = self.next_group_id();
        let mut group = GroupCell::new(id, group_type);
        match group_type {
            GroupType::Code => self.fill_code(&mut group, node, ctx),
            GroupType::Image => self.fill_image(&mut group, node, ctx),
            GroupType::Text => {
                let content = self.parse_children(node, ctx);
                group.editable_content = editable_value(&content);
            }
            GroupType::Pagebreak => {}
            GroupType::Title
            | GroupType::Section
            | GroupType::Subsection
            | GroupType::Subsubsection => self.fill_heading(&mut group, node, ctx),
        }
        group.hidden = bool_attribute(node, "hide", false);
        group.output.claim(id);
        if let Some(folded) = group.folded.as_mut() {
            folded.claim(id);
        }

        let mut cell = Cell::new(CellKind::Group(Box::new(group)));
        cell.cell_type = CellType::Group;
        cell.group = Some(id);
        Some(cell)
    }

    fn fill_code(&mut self, group: &mut GroupCell, node: Node, ctx: ParseContext) {
        let mut has_input = false;
        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "input" if has_input => {
                    tracing::warn!(group = group.id.0, "ignoring extra <input> in code cell");
                }
                "input" => {
                    let content = self.parse_children(child, ctx);
                    group.editable_content = editable_value(&content);
                    has_input = true;
                }
                "output" => {
                    let output = self.parse_children(child, ctx);
                    group.output.append(output);
                }
                other => tracing::debug!(tag = other, "unexpected tag in code cell"),
            }
        }
    }

    fn fill_image(&mut self, group: &mut GroupCell, node: Node, ctx: ParseContext) {
        for child in significant_children(node) {
            if child.has_tag_name("editor") {
                group.editable_content = editor_text(child);
            } else if let Some(output) = self.parse_node(child, ctx) {
                group.output.append(output);
            }
        }
    }

    fn fill_heading(&mut self, group: &mut GroupCell, node: Node, ctx: ParseContext) {
        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "editor" => group.editable_content = editor_text(child),
                "fold" => {
                    let mut folded = Chain::new();
                    for hidden in significant_children(child) {
                        if let Some(cells) = self.parse_node(hidden, ctx) {
                            folded.append(cells);
                        }
                    }
                    if !folded.is_empty() {
                        group.folded = Some(folded);
                    }
                }
                other => tracing::debug!(tag = other, "unexpected tag in heading cell"),
            }
        }
    }
}

/// `<editor type="...">` with one `<line>` per line of text.
pub(super) fn parse_editor(node: Node) -> Cell {
    let cell_type = match node.attribute(TYPE).unwrap_or("input") {
        "text" => CellType::Text,
        "title" => CellType::Title,
        "section" => CellType::Section,
        "subsection" => CellType::Subsection,
        "subsubsection" => CellType::Subsubsection,
        _ => CellType::Input,
    };
    let mut cell = Cell::new(CellKind::Editor(EditorCell {
        value: editor_text(node),
    }));
    cell.cell_type = cell_type;
    cell
}

/// Lines of an editor joined with `\n`. Leading empty lines are dropped.
fn editor_text(node: Node) -> String {
    let mut text = String::new();
    for line in node.children().filter(|c| c.has_tag_name("line")) {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line.text().unwrap_or(""));
    }
    text
}

/// The text a user edits, taken from the first editor in `chain`.
fn editable_value(chain: &Chain) -> String {
    chain
        .iter()
        .find_map(|cell| match &cell.kind {
            CellKind::Editor(editor) => Some(editor.value.clone()),
            _ => None,
        })
        .unwrap_or_else(|| chain.to_plain_text())
}
