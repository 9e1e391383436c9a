use super::*;
use crate::font::BitmapTypeface;
use crate::template::TemplateConfig;
use pretty_assertions::assert_eq;

fn template() -> Template {
    Template::with_typeface(TemplateConfig::default(), Box::new(BitmapTypeface)).unwrap()
}

fn paragraph_style() -> Style {
    Style::for_role(Role::Paragraph)
}

fn height(template: &Template, node: &Node) -> f32 {
    let cx = Context::new(template);
    node_height(node, cx, template.content_width(), &paragraph_style())
}

/// Records the vertical band touched by every drawing call.
#[derive(Default)]
struct Recorder {
    spans: Vec<(&'static str, f32, f32)>,
}

impl Surface for Recorder {
    const DRAWS: bool = true;

    fn text(&mut self, at: Cursor, _text: &str, _style: &Style) {
        self.spans.push(("text", at.y, at.y));
    }

    fn rounded_rect(&mut self, area: Area, _radius: f32, _fill: Rgba<u8>) {
        self.spans.push(("rounded", area.y, area.y + area.height));
    }

    fn cell(&mut self, area: Area, _fill: Rgba<u8>, _border: Rgba<u8>, _thickness: f32) {
        self.spans.push(("cell", area.y, area.y + area.height));
    }

    fn rule(&mut self, from: Cursor, to: Cursor, _color: Rgba<u8>, _thickness: f32) {
        self.spans.push(("rule", from.y.min(to.y), from.y.max(to.y)));
    }

    fn bitmap(&mut self, at: Cursor, _image: &DynamicImage, _width: u32, height: u32) {
        self.spans.push(("bitmap", at.y, at.y + height as f32));
    }
}

fn sample_nodes() -> Vec<Node> {
    vec![
        Node::heading(1, "Title"),
        Node::paragraph("x".repeat(200)),
        Node::List {
            items: vec![vec![Node::text("one")], vec![Node::text("two")]],
        },
        Node::Blockquote {
            children: vec![Node::paragraph("quoted ".repeat(30))],
        },
        Node::ThematicBreak,
        Node::Code {
            raw: "fn main() {\n    run();\n}\n".into(),
        },
        Node::InlineCode { raw: "let x".into() },
        Node::Table {
            rows: vec![
                vec![vec![Node::text("name")], vec![Node::text("value")]],
                vec![vec![Node::text("a")], vec![]],
            ],
        },
        Node::Container {
            children: vec![
                Node::Delete {
                    children: vec![Node::text("gone")],
                },
                Node::Link {
                    url: "https://example.com".into(),
                    children: vec![Node::text("here")],
                },
            ],
        },
        Node::Image {
            src: "missing.png".into(),
            alt: String::new(),
        },
    ]
}

#[test]
fn heading_adds_trailing_gap() {
    let template = template();
    // Level 1: 36px -> 3px dots -> 21px line * 1.5.
    assert_eq!(height(&template, &Node::heading(1, "Title")), 21.0 * 1.5 + 18.0);
    assert_eq!(
        height(&template, &Node::heading(7, "Title")),
        height(&template, &Node::heading(1, "Title"))
    );
}

#[test]
fn paragraph_wraps_at_content_width() {
    let template = template();
    // 880px / 12px cells = 73 chars per line.
    let node = Node::paragraph("x".repeat(150));
    assert_eq!(height(&template, &node), 3.0 * 14.0 * 1.5);
}

#[test]
fn list_sums_bulleted_items() {
    let template = template();
    let node = Node::List {
        items: vec![vec![Node::text("a")], vec![Node::text("b")], vec![]],
    };
    assert_eq!(height(&template, &node), 3.0 * 21.0);
}

#[test]
fn blockquote_pads_and_enforces_minimum() {
    let template = template();
    let empty = Node::Blockquote { children: vec![] };
    assert_eq!(height(&template, &empty), 50.0);

    let short = Node::Blockquote {
        children: vec![Node::paragraph("hi")],
    };
    assert_eq!(height(&template, &short), 50.0);

    // 850px inner width -> 70 chars per line.
    let long = Node::Blockquote {
        children: vec![Node::paragraph("y".repeat(140)), Node::paragraph("z")],
    };
    assert_eq!(height(&template, &long), 3.0 * 21.0 + 24.0);
}

#[test]
fn fixed_height_nodes() {
    let template = template();
    assert_eq!(height(&template, &Node::ThematicBreak), 36.0);
    assert_eq!(height(&template, &Node::LineBreak), 12.0);
}

#[test]
fn code_block_counts_lines_gap_and_padding() {
    let template = template();
    let code = Node::Code { raw: "a\n\nb\n".into() };
    // 28px -> 14px lines; the blank line has no ink.
    assert_eq!(height(&template, &code), (14.0 + 8.0) + 8.0 + (14.0 + 8.0) + 32.0);
    assert_eq!(height(&template, &Node::InlineCode { raw: "abc".into() }), 14.0 + 12.0);
}

#[test]
fn trailing_newline_adds_no_code_line() {
    let template = template();
    let closed = height(&template, &Node::Code { raw: "a\n".into() });
    assert_eq!(closed, height(&template, &Node::Code { raw: "a".into() }));
    assert_eq!(closed, (14.0 + 8.0) + 32.0);
}

#[test]
fn table_rows_take_tallest_cell() {
    let template = template();
    let table = Node::Table {
        rows: vec![
            vec![vec![Node::text("h1")], vec![Node::text("h2")]],
            vec![vec![], vec![Node::text("v")]],
            vec![vec![]],
        ],
    };
    // 32px -> 21px glyphs + 2 * 12px padding; an all-empty row keeps its padding.
    assert_eq!(height(&template, &table), 45.0 + 45.0 + 24.0);
}

#[test]
fn inline_styles_derive_from_inherited_style() {
    let template = template();
    let cx = Context::new(&template);
    let strong = Node::Container {
        children: vec![Node::Strong {
            children: vec![Node::text("bold")],
        }],
    };
    let width = template.content_width();
    assert_eq!(node_height(&strong, cx, width, &paragraph_style()), 21.0);
    // Template default is 48px -> 4px dots.
    assert_eq!(node_height(&strong, cx, width, &Style::root(&template)), 42.0);
}

#[test]
fn missing_image_uses_placeholder_text() {
    let template = template();
    let node = Node::Image {
        src: "does/not/exist.png".into(),
        alt: "alt".into(),
    };
    assert_eq!(height(&template, &node), 21.0);
    let remote = Node::Image {
        src: "https://example.com/cat.png".into(),
        alt: String::new(),
    };
    assert_eq!(height(&template, &remote), 21.0);
}

#[test]
fn images_scale_down_to_width_but_never_up() {
    let template = template();
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::new(1760, 400).save(dir.path().join("wide.png")).unwrap();
    image::RgbaImage::new(100, 60).save(dir.path().join("small.png")).unwrap();
    let cx = Context::new(&template).with_assets(dir.path());
    let width = template.content_width();

    let wide = Node::Image {
        src: "wide.png".into(),
        alt: String::new(),
    };
    assert_eq!(node_height(&wide, cx, width, &paragraph_style()), 200.0);
    let small = Node::Image {
        src: "small.png".into(),
        alt: String::new(),
    };
    assert_eq!(node_height(&small, cx, width, &paragraph_style()), 60.0);
}

#[test]
fn drawing_stays_inside_measured_band() {
    let template = template();
    let cx = Context::new(&template);
    let width = template.content_width();
    let style = paragraph_style();
    for node in sample_nodes() {
        let measured = node_height(&node, cx, width, &style);
        let top = CONTENT_TOP;
        let mut layout = Layout::new(cx, Recorder::default());
        let drawn = layout.node(&node, Cursor::new(100.0, top), width, &style);
        assert_eq!(drawn, measured, "{node:?}");
        for (kind, from, to) in layout.into_surface().spans {
            assert!(from >= top && to <= top + measured, "{kind} {from}..{to} escapes {node:?}");
        }
    }
}
