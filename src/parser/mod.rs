//! Worksheet XML parser.
//!
//! Provides [`MathParser`] to turn wxMaxima XML (single math lines as well as
//! whole `content.xml` documents) into a [`Chain`] of typed cells. Sub-modules
//! split the parser into focused areas:
//!
//! - [`source`] – File I/O abstraction (filesystem vs. ZIP) and image lookup
//! - [`helpers`] – Whitespace skipping, digit elision, length limits
//! - [`tags`] – Tag name table
//! - [`notify`] – One-shot user notification
//! - `builders`, `text`, `group`, `media` – cell builders per construct

mod builders;
mod group;
mod media;
mod text;

pub mod helpers;
pub mod notify;
pub mod source;
pub mod tags;

pub use notify::{LogNotifier, Notify};
pub use source::*;

use crate::config::{ConfigSource, ParserConfig, SHOW_LENGTH};
use crate::model::*;
use anyhow::{Context, Result};
use camino::Utf8Path;
use group::parse_editor;
use helpers::{bool_attribute, significant_children};
use roxmltree::{Document, Node};
use tags::{ALT_COPY, BREAK_LINE, TYPE, Tag};
use text::parse_char_code;

/// Settings inherited by everything below a node.
///
/// Passed by value: a builder that needs a different mode for one slot hands
/// a modified copy to that slot only, so nothing leaks to siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    pub style: CellType,
    pub frac_style: FracStyle,
    pub highlight: bool,
}

impl ParseContext {
    pub fn new(style: CellType) -> Self {
        Self {
            style,
            frac_style: FracStyle::Normal,
            highlight: false,
        }
    }

    #[must_use]
    pub fn with_frac_style(self, frac_style: FracStyle) -> Self {
        Self { frac_style, ..self }
    }

    #[must_use]
    pub fn highlighted(self) -> Self {
        Self {
            highlight: true,
            ..self
        }
    }

    /// A math construct carrying this context's style.
    fn construct(self, kind: CellKind) -> Cell {
        let mut cell = Cell::new(kind);
        cell.cell_type = self.style;
        cell.text_style = TextStyle::Variable;
        cell.highlight = self.highlight;
        cell
    }
}

/// Core worksheet parser. Generic over [`ContentSource`] so images resolve
/// from the filesystem ([`FsSource`]) or from a `.wxmx` bundle ([`ZipSource`]).
///
/// One instance is not reentrant; parse concurrently with one instance per thread.
pub struct MathParser<S: ContentSource> {
    source: S,
    config: Box<dyn ConfigSource>,
    notifier: Box<dyn Notify>,
    next_group: u32,
    unknown_tags: Vec<String>,
}

impl<S: ContentSource> MathParser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: Box::new(ParserConfig::default()),
            notifier: Box::new(LogNotifier),
            next_group: 0,
            unknown_tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notify + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Parse one line of Maxima output, e.g. `<mth><v>x</v><v>+</v><n>1</n></mth>`.
    ///
    /// The cells below the root element are returned. Lines longer than the
    /// `showLength` setting are not parsed; a single notice cell is returned
    /// instead. Malformed XML yields an empty chain.
    pub fn parse_line(&mut self, line: &str, style: CellType) -> Chain {
        let line = helpers::strip_control_chars(line);
        let limit = helpers::show_length_threshold(self.config.read_int(SHOW_LENGTH));
        if limit.is_some_and(|limit| line.chars().count() >= limit) {
            let mut cell = Cell::text(helpers::TOO_LONG_MESSAGE);
            cell.break_line = true;
            return Chain::from(cell);
        }

        let doc = match Document::parse(&line) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("Failed to parse math line: {err}");
                return Chain::new();
            }
        };
        self.unknown_tags.clear();
        let chain = self.parse_children(doc.root_element(), ParseContext::new(style));
        self.report_unknown_tags();
        chain
    }

    /// Parse a complete `content.xml` document.
    pub fn parse_document(&mut self, xml: &str) -> Result<Worksheet> {
        let doc = Document::parse(xml).context("Failed to parse worksheet XML")?;
        let root = doc.root_element();
        if !root.has_tag_name("wxMaximaDocument") {
            tracing::debug!(root = root.tag_name().name(), "unexpected worksheet root element");
        }
        let version = root.attribute("version").map(str::to_string);
        let zoom = root.attribute("zoom").and_then(|z| z.parse().ok());

        self.unknown_tags.clear();
        let cells = self.parse_children(root, ParseContext::new(CellType::Default));
        self.report_unknown_tags();
        Ok(Worksheet {
            version,
            zoom,
            cells,
        })
    }

    /// Read a document through the content source and parse it.
    pub fn parse_document_file(&mut self, path: impl AsRef<Utf8Path>) -> Result<Worksheet> {
        let path = path.as_ref();
        let text = self.source.read_to_string(path)?;
        self.parse_document(&text)
            .with_context(|| format!("Failed to load worksheet {}", path))
    }

    fn report_unknown_tags(&mut self) {
        if self.unknown_tags.is_empty() {
            return;
        }
        let tags = std::mem::take(&mut self.unknown_tags);
        self.notifier
            .notify_once(&notify::unknown_tags_message(&tags));
    }

    fn next_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        id
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sequence assembly & tag dispatch
// ────────────────────────────────────────────────────────────────────────────

impl<S: ContentSource> MathParser<S> {
    fn parse_children(&mut self, node: Node, ctx: ParseContext) -> Chain {
        self.parse_sequence(&significant_children(node), ctx)
    }

    /// Parse sibling nodes in order and link everything they produce.
    fn parse_sequence(&mut self, nodes: &[Node], ctx: ParseContext) -> Chain {
        let mut chain = Chain::new();
        for node in nodes {
            if let Some(cells) = self.parse_node(*node, ctx) {
                chain.append(cells);
            }
        }
        chain
    }

    /// Parse exactly one node. `None` when it contributes nothing.
    fn parse_node(&mut self, node: Node, ctx: ParseContext) -> Option<Chain> {
        if node.is_text() {
            return Some(self.text_cells(node.text(), TextStyle::Default, ctx));
        }
        if !node.is_element() {
            return None;
        }
        let mut chain = self.dispatch(node, ctx)?;
        let head = chain.head_mut()?;
        if let Some(alt) = node.attribute(ALT_COPY) {
            head.alt_copy = Some(alt.to_string());
        }
        if bool_attribute(node, BREAK_LINE, false) {
            head.break_line = true;
        }
        Some(chain)
    }

    fn dispatch(&mut self, node: Node, ctx: ParseContext) -> Option<Chain> {
        let name = node.tag_name().name();
        let Some(tag) = Tag::from_name(name) else {
            if node.has_children() {
                return non_empty(self.parse_children(node, ctx));
            }
            tracing::debug!(tag = name, "unknown tag");
            if !self.unknown_tags.iter().any(|t| t == name) {
                self.unknown_tags.push(name.to_string());
            }
            return None;
        };

        let cell = match tag {
            Tag::Atom(style) => return Some(self.text_cells(node.text(), style, ctx)),
            Tag::OtherText => {
                let style = if node.attribute(TYPE) == Some("error") {
                    TextStyle::Error
                } else {
                    TextStyle::Default
                };
                return Some(self.text_cells(node.text(), style, ctx));
            }
            Tag::HiddenText => {
                let mut chain = self.text_cells(node.text(), TextStyle::Default, ctx);
                if let Some(head) = chain.head_mut() {
                    head.is_hidden = true;
                }
                return Some(chain);
            }
            Tag::Label => {
                let style = if node.attribute("userdefined") == Some("yes") {
                    TextStyle::UserLabel
                } else {
                    TextStyle::Label
                };
                let mut chain = self.text_cells(node.text(), style, ctx);
                if let Some(head) = chain.head_mut() {
                    head.break_line = true;
                }
                return Some(chain);
            }
            Tag::Run => return non_empty(self.parse_children(node, ctx)),
            Tag::Highlight => return non_empty(self.parse_children(node, ctx.highlighted())),
            Tag::MathLine => {
                let mut chain = self.parse_children(node, ctx);
                match chain.head_mut() {
                    Some(head) => head.break_line = true,
                    None => chain.push(Cell::text(" ")),
                }
                return Some(chain);
            }
            Tag::Space => {
                let mut cell = Cell::text(" ");
                cell.cell_type = ctx.style;
                cell
            }
            Tag::Fraction => self.parse_fraction(node, ctx)?,
            Tag::Power => self.parse_power(node, ctx)?,
            Tag::Subscript => self.parse_subscript(node, ctx)?,
            Tag::SubSup => self.parse_subsup(node, ctx)?,
            Tag::Root => self.parse_inner(node, ctx, CellKind::Root)?,
            Tag::Abs => self.parse_inner(node, ctx, CellKind::Abs)?,
            Tag::Conjugate => self.parse_inner(node, ctx, CellKind::Conjugate)?,
            Tag::Paren => self.parse_paren(node, ctx)?,
            Tag::Diff => self.parse_diff(node, ctx)?,
            Tag::Sum => self.parse_sum(node, ctx)?,
            Tag::Integral => self.parse_integral(node, ctx)?,
            Tag::Function => self.parse_function(node, ctx)?,
            Tag::At => self.parse_at(node, ctx)?,
            Tag::Limit => self.parse_limit(node, ctx)?,
            Tag::Table => self.parse_table(node, ctx),
            Tag::Image => self.parse_image(node),
            Tag::Animation => self.parse_animation(node),
            Tag::Editor => parse_editor(node),
            Tag::Cell => self.parse_group(node, ctx)?,
            Tag::CharCode => parse_char_code(node, ctx),
        };
        Some(Chain::from(cell))
    }
}

fn non_empty(chain: Chain) -> Option<Chain> {
    (!chain.is_empty()).then_some(chain)
}
