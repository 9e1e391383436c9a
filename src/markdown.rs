//! Markdown front-end producing the [`Node`] tree.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use crate::model::{Node, plain_text};

/// Parse markdown into top-level block nodes.
pub fn parse(text: &str) -> Vec<Node> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(text, options) {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Debug)]
enum Kind {
    Root,
    Heading(u8),
    Paragraph,
    Blockquote,
    Code,
    List,
    Item,
    Table,
    Row,
    Cell,
    Strong,
    Emphasis,
    Delete,
    Link(String),
    Image(String),
    Container,
}

#[derive(Debug)]
struct Frame {
    kind: Kind,
    nodes: Vec<Node>,
    /// List items or table cells collected so far.
    groups: Vec<Vec<Node>>,
    /// Table rows collected so far.
    rows: Vec<Vec<Vec<Node>>>,
}

impl Frame {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            groups: Vec::new(),
            rows: Vec::new(),
        }
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Kind::Root)],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(Frame::new(kind_of(tag))),
            Event::End(_) => self.close(),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push(Node::text(text.to_string()))
            }
            Event::Code(code) => self.push(Node::InlineCode {
                raw: code.to_string(),
            }),
            Event::SoftBreak => self.push(Node::text(" ")),
            Event::HardBreak => self.push(Node::LineBreak),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::TaskListMarker(done) => self.push(Node::text(if done { "[x] " } else { "[ ] " })),
            Event::FootnoteReference(label) => self.push(Node::text(format!("[{label}]"))),
            _ => {}
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.nodes.push(node);
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        match frame.kind {
            Kind::Item | Kind::Cell => parent.groups.push(frame.nodes),
            Kind::Row => parent.rows.push(frame.groups),
            _ => {
                if let Some(node) = build(frame) {
                    parent.nodes.push(node);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().map(|root| root.nodes).unwrap_or_default()
    }
}

fn kind_of(tag: Tag<'_>) -> Kind {
    match tag {
        Tag::Heading { level, .. } => Kind::Heading(heading_level(level)),
        Tag::Paragraph | Tag::HtmlBlock => Kind::Paragraph,
        Tag::BlockQuote(_) => Kind::Blockquote,
        Tag::CodeBlock(_) => Kind::Code,
        Tag::List(_) => Kind::List,
        Tag::Item => Kind::Item,
        Tag::Table(_) => Kind::Table,
        Tag::TableHead | Tag::TableRow => Kind::Row,
        Tag::TableCell => Kind::Cell,
        Tag::Strong => Kind::Strong,
        Tag::Emphasis => Kind::Emphasis,
        Tag::Strikethrough => Kind::Delete,
        Tag::Link { dest_url, .. } => Kind::Link(dest_url.to_string()),
        Tag::Image { dest_url, .. } => Kind::Image(dest_url.to_string()),
        _ => Kind::Container,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn build(frame: Frame) -> Option<Node> {
    let Frame {
        kind, nodes, groups, rows,
    } = frame;
    let node = match kind {
        Kind::Heading(level) => Node::Heading {
            level,
            children: nodes,
        },
        Kind::Paragraph => match nodes.as_slice() {
            [Node::Image { .. }] => nodes.into_iter().next()?,
            _ => Node::Paragraph { children: nodes },
        },
        Kind::Blockquote => Node::Blockquote { children: nodes },
        Kind::Code => Node::Code {
            raw: plain_text(&nodes),
        },
        Kind::List => Node::List { items: groups },
        Kind::Table => Node::Table { rows },
        Kind::Strong => Node::Strong { children: nodes },
        Kind::Emphasis => Node::Emphasis { children: nodes },
        Kind::Delete => Node::Delete { children: nodes },
        Kind::Link(url) => Node::Link {
            url,
            children: nodes,
        },
        Kind::Image(src) => Node::Image {
            src,
            alt: plain_text(&nodes),
        },
        Kind::Container if nodes.is_empty() => return None,
        Kind::Container => Node::Container { children: nodes },
        Kind::Root | Kind::Item | Kind::Row | Kind::Cell => return None,
    };
    Some(node)
}
