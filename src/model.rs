use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Classifications
// ────────────────────────────────────────────────────────────────────────────

/// Display-style classification of a cell. Drives colors and fonts in the
/// renderer; the parser stamps every node with the style of the line it
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    #[default]
    Default,
    MainPrompt,
    Prompt,
    Label,
    Input,
    Error,
    Text,
    Title,
    Section,
    Subsection,
    Subsubsection,
    Image,
    Slide,
    Group,
}

/// Text style of a cell (font class used for atoms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Default,
    Variable,
    Number,
    Function,
    SpecialConstant,
    GreekConstant,
    String,
    Label,
    UserLabel,
    Error,
}

/// How a fraction is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FracStyle {
    #[default]
    Normal,
    /// Binomial coefficient: no fraction bar.
    Choose,
    /// Differential quotient as written in a derivative.
    Diff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SumStyle {
    #[default]
    Sum,
    Product,
    /// Sum over the elements of a list; has no upper bound.
    ListSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegralStyle {
    Definite,
    Indefinite,
}

/// Kind of a worksheet unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    Code,
    Image,
    Text,
    Title,
    Section,
    Subsection,
    Subsubsection,
    Pagebreak,
}

/// Identifies a group within one parser's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

// ────────────────────────────────────────────────────────────────────────────
// Cell
// ────────────────────────────────────────────────────────────────────────────

/// One node of the parsed expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub kind: CellKind,
    pub cell_type: CellType,
    pub text_style: TextStyle,
    pub highlight: bool,
    /// Set when the cell sits in an exponent, index or subscript position.
    pub is_exponent: bool,
    /// Set for the contents of `<h>` tags (hidden multiplication dots and the like).
    pub is_hidden: bool,
    /// Text used instead of [`Cell::to_plain_text`] when copying.
    pub alt_copy: Option<String>,
    pub break_line: bool,
    /// Worksheet unit this cell belongs to, if any.
    pub group: Option<GroupId>,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            cell_type: CellType::Default,
            text_style: TextStyle::Default,
            highlight: false,
            is_exponent: false,
            is_hidden: false,
            alt_copy: None,
            break_line: false,
            group: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(CellKind::Text(TextCell {
            value: value.into(),
        }))
    }

    /// The value of a text or editor cell.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            CellKind::Text(t) => Some(&t.value),
            CellKind::Editor(e) => Some(&e.value),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupCell> {
        match &self.kind {
            CellKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Kind-specific children, in slot order. Groups report none: their
    /// output and folded chains belong to the group, not to an expression.
    pub fn child_chains_mut(&mut self) -> Vec<&mut Chain> {
        match &mut self.kind {
            CellKind::Text(_)
            | CellKind::Editor(_)
            | CellKind::Image(_)
            | CellKind::Animation(_)
            | CellKind::Group(_) => Vec::new(),
            CellKind::Fraction(f) => vec![&mut f.numerator, &mut f.denominator],
            CellKind::Power(p) => vec![&mut p.base, &mut p.power],
            CellKind::Subscript(s) => vec![&mut s.base, &mut s.index],
            CellKind::SubSup(s) => vec![&mut s.base, &mut s.index, &mut s.exponent],
            CellKind::Root(i) | CellKind::Abs(i) | CellKind::Conjugate(i) => vec![&mut i.inner],
            CellKind::Paren(p) => vec![&mut p.inner],
            CellKind::Diff(d) => vec![&mut d.diff, &mut d.base],
            CellKind::Limit(l) => vec![&mut l.name, &mut l.under, &mut l.base],
            CellKind::Sum(s) => {
                let mut out = vec![&mut s.under];
                if let Some(over) = s.over.as_mut() {
                    out.push(over);
                }
                out.push(&mut s.base);
                out
            }
            CellKind::Integral(i) => {
                let mut out = Vec::with_capacity(4);
                if let Some(under) = i.under.as_mut() {
                    out.push(under);
                }
                if let Some(over) = i.over.as_mut() {
                    out.push(over);
                }
                out.push(&mut i.base);
                out.push(&mut i.var);
                out
            }
            CellKind::Function(f) => vec![&mut f.name, &mut f.arg],
            CellKind::At(a) => vec![&mut a.base, &mut a.index],
            CellKind::Matrix(m) => m.rows.iter_mut().flatten().collect(),
        }
    }

    /// Linear text form of this cell and everything below it.
    pub fn to_plain_text(&self) -> String {
        if let Some(alt) = &self.alt_copy {
            return alt.clone();
        }
        match &self.kind {
            CellKind::Text(t) => t.value.clone(),
            CellKind::Fraction(f) => format!(
                "({})/({})",
                f.numerator.to_plain_text(),
                f.denominator.to_plain_text()
            ),
            CellKind::Power(p) => {
                format!("{}^{}", p.base.to_plain_text(), p.power.to_plain_text())
            }
            CellKind::Subscript(s) => {
                format!("{}[{}]", s.base.to_plain_text(), s.index.to_plain_text())
            }
            CellKind::SubSup(s) => format!(
                "{}[{}]^{}",
                s.base.to_plain_text(),
                s.index.to_plain_text(),
                s.exponent.to_plain_text()
            ),
            CellKind::Root(i) => format!("sqrt({})", i.inner.to_plain_text()),
            CellKind::Abs(i) => format!("abs({})", i.inner.to_plain_text()),
            CellKind::Conjugate(i) => format!("conjugate({})", i.inner.to_plain_text()),
            CellKind::Paren(p) => {
                if p.print {
                    format!("({})", p.inner.to_plain_text())
                } else {
                    p.inner.to_plain_text()
                }
            }
            CellKind::Diff(d) => format!("{}{}", d.diff.to_plain_text(), d.base.to_plain_text()),
            CellKind::Limit(l) => format!(
                "{}({},{})",
                l.name.to_plain_text(),
                l.base.to_plain_text(),
                l.under.to_plain_text()
            ),
            CellKind::Sum(s) => {
                let name = match s.style {
                    SumStyle::Product => "product",
                    SumStyle::Sum | SumStyle::ListSum => "sum",
                };
                let mut out = format!("{}({},{}", name, s.base.to_plain_text(), s.under.to_plain_text());
                if let Some(over) = &s.over {
                    out.push(',');
                    out.push_str(&over.to_plain_text());
                }
                out.push(')');
                out
            }
            CellKind::Integral(i) => {
                let mut out = format!(
                    "integrate({},{}",
                    i.base.to_plain_text(),
                    i.var.to_plain_text()
                );
                if let (Some(under), Some(over)) = (&i.under, &i.over) {
                    out.push_str(&format!(",{},{}", under.to_plain_text(), over.to_plain_text()));
                }
                out.push(')');
                out
            }
            CellKind::Function(f) => {
                format!("{}{}", f.name.to_plain_text(), f.arg.to_plain_text())
            }
            CellKind::At(a) => {
                format!("at({},{})", a.base.to_plain_text(), a.index.to_plain_text())
            }
            CellKind::Matrix(m) => {
                let rows: Vec<String> = m
                    .rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<String> = row.iter().map(Chain::to_plain_text).collect();
                        format!("[{}]", cells.join(","))
                    })
                    .collect();
                format!("matrix({})", rows.join(","))
            }
            CellKind::Editor(e) => e.value.clone(),
            CellKind::Image(i) => i.name.clone(),
            CellKind::Animation(a) => {
                let names: Vec<&str> = a.frames.iter().map(|f| f.name.as_str()).collect();
                names.join(";")
            }
            CellKind::Group(g) => g.editable_content.clone(),
        }
    }
}

/// Kind-specific payload of a [`Cell`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellKind {
    Text(TextCell),
    Fraction(FracCell),
    Power(PowerCell),
    Subscript(SubCell),
    SubSup(SubSupCell),
    Root(InnerCell),
    Abs(InnerCell),
    Conjugate(InnerCell),
    Paren(ParenCell),
    Diff(DiffCell),
    Limit(LimitCell),
    Sum(SumCell),
    Integral(IntCell),
    Function(FunCell),
    At(AtCell),
    Matrix(MatrixCell),
    Editor(EditorCell),
    Image(ImageCell),
    Animation(AnimationCell),
    Group(Box<GroupCell>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCell {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FracCell {
    pub numerator: Chain,
    pub denominator: Chain,
    pub style: FracStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCell {
    pub base: Chain,
    pub power: Chain,
    /// Written as a matrix power (`^^`).
    pub is_matrix: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCell {
    pub base: Chain,
    pub index: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubSupCell {
    pub base: Chain,
    pub index: Chain,
    pub exponent: Chain,
}

/// Payload shared by root, absolute value and conjugate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnerCell {
    pub inner: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenCell {
    pub inner: Chain,
    /// False when the parenthesis is implied and must not be drawn.
    pub print: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffCell {
    pub diff: Chain,
    pub base: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitCell {
    pub name: Chain,
    pub under: Chain,
    pub base: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumCell {
    pub style: SumStyle,
    pub under: Chain,
    pub over: Option<Chain>,
    pub base: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntCell {
    pub style: IntegralStyle,
    pub under: Option<Chain>,
    pub over: Option<Chain>,
    pub base: Chain,
    pub var: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunCell {
    pub name: Chain,
    pub arg: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtCell {
    pub base: Chain,
    pub index: Chain,
}

/// A matrix or table, stored row-major. Rows may differ in width.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatrixCell {
    pub rows: Vec<Vec<Chain>>,
    pub special: bool,
    pub inference: bool,
    pub col_names: bool,
    pub row_names: bool,
    pub row_count: usize,
    pub col_count: usize,
}

impl MatrixCell {
    /// Recompute the dimension from the current rows.
    pub fn set_dimension(&mut self) {
        self.row_count = self.rows.len();
        self.col_count = self.rows.iter().map(Vec::len).max().unwrap_or(0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorCell {
    pub value: String,
}

/// Where the bytes of an image come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImageSource {
    /// Loaded from the worksheet bundle.
    Embedded {
        len: usize,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// A file on disk.
    Path { path: camino::Utf8PathBuf },
    /// Could not be resolved; rendered as a placeholder.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageCell {
    pub name: String,
    pub source: ImageSource,
    /// The file is a temporary produced for this worksheet and may be removed after loading.
    pub deletable: bool,
    pub draw_rectangle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationCell {
    pub frames: Vec<ImageCell>,
    pub frame_rate: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Groups
// ────────────────────────────────────────────────────────────────────────────

/// One worksheet unit: an input with its output, a heading, a text block,
/// an image or a page break.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCell {
    pub id: GroupId,
    pub group_type: GroupType,
    /// Output is hidden.
    pub hidden: bool,
    pub editable_content: String,
    pub output: Chain,
    /// Folded sub-sections. Part of the logical order but never drawn.
    pub folded: Option<Chain>,
}

impl GroupCell {
    pub fn new(id: GroupId, group_type: GroupType) -> Self {
        Self {
            id,
            group_type,
            hidden: false,
            editable_content: String::new(),
            output: Chain::new(),
            folded: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Chain
// ────────────────────────────────────────────────────────────────────────────

/// A sequence of sibling cells in document order.
///
/// The sibling order is the logical order. Draw order is the same sequence;
/// folded subtrees hang off their group and are only reached through
/// [`Chain::logical_order`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Chain(Vec<Cell>);

impl Chain {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn head(&self) -> Option<&Cell> {
        self.0.first()
    }

    pub fn head_mut(&mut self) -> Option<&mut Cell> {
        self.0.first_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.0.get(index)
    }

    pub fn push(&mut self, cell: Cell) {
        self.0.push(cell);
    }

    pub fn append(&mut self, mut other: Chain) {
        self.0.append(&mut other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.0.iter()
    }

    /// Cells in the order they are drawn.
    pub fn draw_order(&self) -> impl Iterator<Item = &Cell> {
        self.0.iter()
    }

    /// Cells in logical order: every group is followed by its folded subtree.
    pub fn logical_order(&self) -> Vec<&Cell> {
        let mut out = Vec::with_capacity(self.0.len());
        for cell in &self.0 {
            out.push(cell);
            if let Some(folded) = cell.as_group().and_then(|g| g.folded.as_ref()) {
                out.extend(folded.logical_order());
            }
        }
        out
    }

    /// Top-level groups of this chain.
    pub fn groups(&self) -> impl Iterator<Item = &GroupCell> {
        self.0.iter().filter_map(Cell::as_group)
    }

    /// Plain text of the drawn cells; forced breaks become newlines.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (i, cell) in self.draw_order().enumerate() {
            if i > 0 && cell.break_line {
                out.push('\n');
            }
            out.push_str(&cell.to_plain_text());
        }
        out
    }

    pub(crate) fn set_exponent_flag(&mut self) {
        for cell in &mut self.0 {
            cell.is_exponent = true;
        }
    }

    /// Record `id` as the owning group of every cell below this chain that
    /// has none yet. Nested groups already own themselves and are skipped.
    pub(crate) fn claim(&mut self, id: GroupId) {
        for cell in &mut self.0 {
            if cell.group.is_some() {
                continue;
            }
            cell.group = Some(id);
            for child in cell.child_chains_mut() {
                child.claim(id);
            }
        }
    }
}

impl From<Cell> for Chain {
    fn from(cell: Cell) -> Self {
        Self(vec![cell])
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Worksheet
// ────────────────────────────────────────────────────────────────────────────

/// A complete document as stored in `content.xml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worksheet {
    pub version: Option<String>,
    pub zoom: Option<u32>,
    pub cells: Chain,
}
