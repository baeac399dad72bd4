use anyhow::Result;
use camino::Utf8Path;
use mathcells::model::*;
use mathcells::parser::{ContentSource, ImageRequest, MathParser};
use pretty_assertions::assert_eq;

struct MemSource;

impl ContentSource for MemSource {
    fn read_bytes(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        Err(anyhow::anyhow!("not found: {}", path))
    }
    fn resolve_image(&mut self, _request: ImageRequest<'_>) -> ImageSource {
        ImageSource::Missing
    }
}

fn parse(xml: &str) -> Chain {
    MathParser::new(MemSource).parse_line(xml, CellType::Default)
}

fn single(xml: &str) -> Cell {
    let chain = parse(xml);
    assert_eq!(chain.len(), 1, "expected exactly one cell for {xml}");
    chain.head().unwrap().clone()
}

#[test]
fn fraction_slots_and_styles() {
    let cell = single("<mth><f><v>a</v><n>2</n></f></mth>");
    let CellKind::Fraction(f) = &cell.kind else {
        panic!("expected fraction, got {:?}", cell.kind)
    };
    assert_eq!(f.numerator.to_plain_text(), "a");
    assert_eq!(f.denominator.to_plain_text(), "2");
    assert_eq!(f.style, FracStyle::Normal);
    assert_eq!(cell.text_style, TextStyle::Variable);

    let styles: Vec<FracStyle> = [
        r#"<mth><f line="no"><v>n</v><v>k</v></f></mth>"#,
        r#"<mth><f diffstyle="yes"><v>d</v><v>dx</v></f></mth>"#,
        r#"<mth><f line="no" diffstyle="yes"><v>d</v><v>dx</v></f></mth>"#,
    ]
    .iter()
    .map(|xml| match single(xml).kind {
        CellKind::Fraction(f) => f.style,
        other => panic!("expected fraction, got {other:?}"),
    })
    .collect();
    assert_eq!(styles, vec![FracStyle::Choose, FracStyle::Diff, FracStyle::Diff]);
}

#[test]
fn fraction_without_denominator_is_dropped() {
    let chain = parse("<mth><f><v>a</v></f><v>b</v></mth>");
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.to_plain_text(), "b");
}

#[test]
fn derivative_mode_does_not_leak_to_siblings() {
    let chain = parse("<mth><d><f><v>d</v><v>dx</v></f><v>y</v></d><f><v>a</v><v>b</v></f></mth>");
    assert_eq!(chain.len(), 2);
    let CellKind::Diff(diff) = &chain.get(0).unwrap().kind else {
        panic!("expected derivative")
    };
    match &diff.diff.head().unwrap().kind {
        CellKind::Fraction(f) => assert_eq!(f.style, FracStyle::Diff),
        other => panic!("expected nested fraction, got {other:?}"),
    }
    assert_eq!(diff.base.to_plain_text(), "y");
    match &chain.get(1).unwrap().kind {
        CellKind::Fraction(f) => assert_eq!(f.style, FracStyle::Normal),
        other => panic!("expected fraction, got {other:?}"),
    }
}

#[test]
fn power_flags_exponent_and_matrix() {
    let cell = single("<mth><e><v>x</v><n>2</n></e></mth>");
    let CellKind::Power(p) = &cell.kind else {
        panic!("expected power")
    };
    assert!(!p.base.head().unwrap().is_exponent);
    assert!(p.power.head().unwrap().is_exponent);
    assert!(!p.is_matrix);

    let cell = single(r#"<mth><e type="mat"><v>M</v><n>2</n></e></mth>"#);
    let CellKind::Power(p) = &cell.kind else {
        panic!("expected power")
    };
    assert!(p.is_matrix);
}

#[test]
fn subscript_needs_index() {
    let chain = parse("<mth><i><v>x</v></i><v>y</v></mth>");
    assert_eq!(chain.to_plain_text(), "y");

    let cell = single("<mth><i><v>x</v><n>1</n></i></mth>");
    let CellKind::Subscript(s) = &cell.kind else {
        panic!("expected subscript")
    };
    assert_eq!(s.base.to_plain_text(), "x");
    assert!(s.index.head().unwrap().is_exponent);
}

#[test]
fn sub_superscript_flags_both() {
    let cell = single("<mth><ie><v>x</v><n>1</n><n>2</n></ie></mth>");
    let CellKind::SubSup(s) = &cell.kind else {
        panic!("expected subsup")
    };
    assert_eq!(s.base.to_plain_text(), "x");
    assert_eq!(s.index.to_plain_text(), "1");
    assert_eq!(s.exponent.to_plain_text(), "2");
    assert!(s.index.head().unwrap().is_exponent);
    assert!(s.exponent.head().unwrap().is_exponent);
}

#[test]
fn root_abs_conjugate_take_all_children() {
    let cell = single("<mth><q><v>x</v><v>+</v><n>1</n></q></mth>");
    let CellKind::Root(r) = &cell.kind else {
        panic!("expected root")
    };
    assert_eq!(r.inner.len(), 3);
    assert_eq!(cell.to_plain_text(), "sqrt(x+1)");

    assert!(matches!(single("<mth><a><v>x</v></a></mth>").kind, CellKind::Abs(_)));
    assert!(matches!(single("<mth><cj><v>z</v></cj></mth>").kind, CellKind::Conjugate(_)));
    assert!(parse("<mth><q/></mth>").is_empty());
}

#[test]
fn parenthesis_attributes_hide_glyphs() {
    let cell = single("<mth><p><v>x</v></p></mth>");
    assert!(matches!(&cell.kind, CellKind::Paren(p) if p.print));
    let cell = single(r#"<mth><p print="no"><v>x</v></p></mth>"#);
    assert!(matches!(&cell.kind, CellKind::Paren(p) if !p.print));
}

#[test]
fn limit_sum_integral_function_at() {
    let cell = single("<mth><lm><fnm>lim</fnm><v>x</v><v>f</v></lm></mth>");
    let CellKind::Limit(l) = &cell.kind else {
        panic!("expected limit")
    };
    assert_eq!(
        (l.name.to_plain_text(), l.under.to_plain_text(), l.base.to_plain_text()),
        ("lim".to_string(), "x".to_string(), "f".to_string())
    );

    let cell = single(r#"<mth><sm type="prod"><r><v>k</v><v>=</v><n>1</n></r><v>n</v><v>k</v></sm></mth>"#);
    let CellKind::Sum(s) = &cell.kind else {
        panic!("expected sum")
    };
    assert_eq!(s.style, SumStyle::Product);
    assert_eq!(s.under.to_plain_text(), "k=1");
    assert_eq!(s.over.as_ref().map(Chain::to_plain_text).as_deref(), Some("n"));
    assert_eq!(s.base.to_plain_text(), "k");

    let cell = single(r#"<mth><sm type="lsum"><v>i</v><v>L</v><v>i</v></sm></mth>"#);
    let CellKind::Sum(s) = &cell.kind else {
        panic!("expected sum")
    };
    assert_eq!(s.style, SumStyle::ListSum);
    assert!(s.over.is_none());
    assert_eq!(s.base.to_plain_text(), "i");
    assert!(parse(r#"<mth><sm type="lsum"><v>i</v><v>L</v></sm></mth>"#).is_empty());

    let cell = single("<mth><in><n>0</n><n>1</n><v>f</v><v>x</v></in></mth>");
    let CellKind::Integral(i) = &cell.kind else {
        panic!("expected integral")
    };
    assert_eq!(i.style, IntegralStyle::Definite);
    assert_eq!(i.under.as_ref().map(Chain::to_plain_text).as_deref(), Some("0"));
    assert_eq!(i.over.as_ref().map(Chain::to_plain_text).as_deref(), Some("1"));
    assert_eq!(i.base.to_plain_text(), "f");
    assert_eq!(i.var.to_plain_text(), "x");

    let cell = single(r#"<mth><in def="false"><v>f</v><v>x</v></in></mth>"#);
    let CellKind::Integral(i) = &cell.kind else {
        panic!("expected integral")
    };
    assert_eq!(i.style, IntegralStyle::Indefinite);
    assert!(i.under.is_none() && i.over.is_none());
    assert!(parse("<mth><in><n>0</n><n>1</n><v>f</v></in></mth>").is_empty());

    let cell = single("<mth><fn><fnm>sin</fnm><p><v>x</v></p></fn></mth>");
    let CellKind::Function(f) = &cell.kind else {
        panic!("expected function")
    };
    assert_eq!(f.name.head().unwrap().text_style, TextStyle::Function);
    assert_eq!(cell.to_plain_text(), "sin(x)");

    let cell = single("<mth><hl><at><v>f</v><v>x</v></at></hl></mth>");
    let CellKind::At(a) = &cell.kind else {
        panic!("expected at")
    };
    assert!(cell.highlight);
    assert!(a.base.head().unwrap().highlight);
    assert_eq!(a.index.to_plain_text(), "x");
}

#[test]
fn table_dimensions_follow_rows() {
    let cell = single(
        "<mth><tb><mtr><mtd><n>1</n></mtd><mtd><n>2</n></mtd></mtr><mtr><mtd><n>3</n></mtd></mtr></tb></mth>",
    );
    let CellKind::Matrix(m) = &cell.kind else {
        panic!("expected matrix")
    };
    let widths: Vec<usize> = m.rows.iter().map(Vec::len).collect();
    assert_eq!(widths, vec![2, 1]);
    assert_eq!((m.row_count, m.col_count), (2, 2));
    assert_eq!(m.rows[1][0].to_plain_text(), "3");
    assert!(!m.special && !m.inference);

    let cell = single(r#"<mth><tb inference="true" colnames="true"><mtr><mtd><v>a</v></mtd></mtr></tb></mth>"#);
    let CellKind::Matrix(m) = &cell.kind else {
        panic!("expected matrix")
    };
    assert!(m.special && m.inference && m.col_names && !m.row_names);
}

#[test]
fn text_atoms() {
    let chain = parse(
        r#"<mth><lbl userdefined="yes">(a)</lbl><t type="error">oops</t><h>*</h><mspace/><ascii>945</ascii><n>-1</n><v/></mth>"#,
    );
    let cells: Vec<&Cell> = chain.iter().collect();
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[0].text_style, TextStyle::UserLabel);
    assert!(cells[0].break_line);
    assert_eq!(cells[1].cell_type, CellType::Error);
    assert_eq!(cells[1].text_style, TextStyle::Error);
    assert!(cells[2].is_hidden);
    assert_eq!(cells[3].value(), Some(" "));
    assert_eq!(cells[4].value(), Some("\u{3b1}"));
    assert_eq!(cells[5].value(), Some("\u{2212}1"));
    assert_eq!(cells[6].value(), Some(""));
}

#[test]
fn alt_copy_and_breakline_attributes() {
    let chain = parse(r#"<mth><v altCopy="x_1">x1</v><f breakline="true" altCopy="1/2"><n>1</n><n>2</n></f></mth>"#);
    let first = chain.get(0).unwrap();
    assert_eq!(first.alt_copy.as_deref(), Some("x_1"));
    let second = chain.get(1).unwrap();
    assert!(second.break_line);
    assert_eq!(chain.to_plain_text(), "x_1\n1/2");
}

#[test]
fn line_style_is_stamped() {
    let mut parser = MathParser::new(MemSource);
    let chain = parser.parse_line("<mth><v>x</v><f><n>1</n><n>2</n></f></mth>", CellType::Prompt);
    assert!(chain.iter().all(|c| c.cell_type == CellType::Prompt));
}

#[test]
fn plain_text_follows_document_order() {
    let chain = parse("<mth><v>x</v><v>+</v><f><n>1</n><n>2</n></f><v>+</v><e><v>y</v><n>3</n></e></mth>");
    assert_eq!(chain.to_plain_text(), "x+(1)/(2)+y^3");

    let chain = parse("<mth><mth><v>a</v></mth><mth><v>b</v></mth><mth/></mth>");
    let breaks: Vec<bool> = chain.iter().map(|c| c.break_line).collect();
    assert_eq!(breaks, vec![true, true, false]);
    assert_eq!(chain.get(2).unwrap().value(), Some(" "));
    assert_eq!(chain.to_plain_text(), "a\nb ");
}
