//! Builders for math constructs (fractions, powers, sums, integrals, ...).
//!
//! Each builder reads its required children in document order. A missing or
//! empty slot makes the whole construct yield `None`.

use super::helpers::{bool_attribute, has_attributes, significant_children};
use super::tags::TYPE;
use super::{ContentSource, MathParser, ParseContext};
use crate::model::*;
use roxmltree::Node;

impl<S: ContentSource> MathParser<S> {
    /// The child at `index` as one slot.
    fn slot(&mut self, children: &[Node], index: usize, ctx: ParseContext) -> Option<Chain> {
        let child = children.get(index)?;
        self.parse_node(*child, ctx)
    }

    /// Every child from `from` on, as one slot.
    fn rest(&mut self, children: &[Node], from: usize, ctx: ParseContext) -> Option<Chain> {
        let rest = children.get(from..)?;
        let chain = self.parse_sequence(rest, ctx);
        (!chain.is_empty()).then_some(chain)
    }

    pub(super) fn parse_fraction(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let numerator = self.slot(&children, 0, ctx)?;
        let denominator = self.slot(&children, 1, ctx)?;
        let style = if node.attribute("diffstyle") == Some("yes") {
            FracStyle::Diff
        } else if node.attribute("line") == Some("no") {
            FracStyle::Choose
        } else {
            ctx.frac_style
        };
        Some(ctx.construct(CellKind::Fraction(FracCell {
            numerator,
            denominator,
            style,
        })))
    }

    pub(super) fn parse_diff(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let diff = self.slot(&children, 0, ctx.with_frac_style(FracStyle::Diff))?;
        let base = self.rest(&children, 1, ctx)?;
        Some(ctx.construct(CellKind::Diff(DiffCell { diff, base })))
    }

    pub(super) fn parse_power(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let base = self.slot(&children, 0, ctx)?;
        let mut power = self.slot(&children, 1, ctx)?;
        power.set_exponent_flag();
        Some(ctx.construct(CellKind::Power(PowerCell {
            base,
            power,
            is_matrix: has_attributes(node),
        })))
    }

    pub(super) fn parse_subscript(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let base = self.slot(&children, 0, ctx)?;
        let mut index = self.slot(&children, 1, ctx)?;
        index.set_exponent_flag();
        Some(ctx.construct(CellKind::Subscript(SubCell { base, index })))
    }

    pub(super) fn parse_subsup(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let base = self.slot(&children, 0, ctx)?;
        let mut index = self.slot(&children, 1, ctx)?;
        let mut exponent = self.slot(&children, 2, ctx)?;
        index.set_exponent_flag();
        exponent.set_exponent_flag();
        Some(ctx.construct(CellKind::SubSup(SubSupCell {
            base,
            index,
            exponent,
        })))
    }

    /// Root, absolute value and conjugate: one argument spanning all children.
    pub(super) fn parse_inner(
        &mut self,
        node: Node,
        ctx: ParseContext,
        kind: fn(InnerCell) -> CellKind,
    ) -> Option<Cell> {
        let children = significant_children(node);
        let inner = self.rest(&children, 0, ctx)?;
        Some(ctx.construct(kind(InnerCell { inner })))
    }

    pub(super) fn parse_paren(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let inner = self.rest(&children, 0, ctx)?;
        Some(ctx.construct(CellKind::Paren(ParenCell {
            inner,
            print: !has_attributes(node),
        })))
    }

    pub(super) fn parse_limit(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let name = self.slot(&children, 0, ctx)?;
        let under = self.slot(&children, 1, ctx)?;
        let base = self.slot(&children, 2, ctx)?;
        Some(ctx.construct(CellKind::Limit(LimitCell { name, under, base })))
    }

    pub(super) fn parse_sum(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let style = match node.attribute(TYPE) {
            Some("prod") => SumStyle::Product,
            Some("lsum") => SumStyle::ListSum,
            _ => SumStyle::Sum,
        };
        let children = significant_children(node);
        let under = self.slot(&children, 0, ctx)?;
        // A list sum still reserves the position of the upper bound.
        let over = match style {
            SumStyle::ListSum => {
                children.get(1)?;
                None
            }
            SumStyle::Sum | SumStyle::Product => Some(self.slot(&children, 1, ctx)?),
        };
        let base = self.slot(&children, 2, ctx)?;
        Some(ctx.construct(CellKind::Sum(SumCell {
            style,
            under,
            over,
            base,
        })))
    }

    pub(super) fn parse_integral(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let integral = if bool_attribute(node, "def", true) {
            let under = self.slot(&children, 0, ctx)?;
            let over = self.slot(&children, 1, ctx)?;
            let base = self.slot(&children, 2, ctx)?;
            let var = self.rest(&children, 3, ctx)?;
            IntCell {
                style: IntegralStyle::Definite,
                under: Some(under),
                over: Some(over),
                base,
                var,
            }
        } else {
            let base = self.slot(&children, 0, ctx)?;
            let var = self.rest(&children, 1, ctx)?;
            IntCell {
                style: IntegralStyle::Indefinite,
                under: None,
                over: None,
                base,
                var,
            }
        };
        Some(ctx.construct(CellKind::Integral(integral)))
    }

    pub(super) fn parse_function(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let name = self.slot(&children, 0, ctx)?;
        let arg = self.slot(&children, 1, ctx)?;
        Some(ctx.construct(CellKind::Function(FunCell { name, arg })))
    }

    pub(super) fn parse_at(&mut self, node: Node, ctx: ParseContext) -> Option<Cell> {
        let children = significant_children(node);
        let base = self.slot(&children, 0, ctx)?;
        let index = self.slot(&children, 1, ctx)?;
        Some(ctx.construct(CellKind::At(AtCell { base, index })))
    }

    /// Rows are the element children; cells that produce nothing stay as
    /// empty entries so every row keeps its width.
    pub(super) fn parse_table(&mut self, node: Node, ctx: ParseContext) -> Cell {
        let inference = bool_attribute(node, "inference", false);
        let mut matrix = MatrixCell {
            special: inference || bool_attribute(node, "special", false),
            inference,
            col_names: bool_attribute(node, "colnames", false),
            row_names: bool_attribute(node, "rownames", false),
            ..MatrixCell::default()
        };
        for row in node.children().filter(Node::is_element) {
            let cells: Vec<Chain> = significant_children(row)
                .into_iter()
                .map(|cell| self.parse_node(cell, ctx).unwrap_or_default())
                .collect();
            matrix.rows.push(cells);
        }
        matrix.set_dimension();
        ctx.construct(CellKind::Matrix(matrix))
    }
}
