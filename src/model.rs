//! Parsed document tree consumed by the layout engine.

/// One structural unit of a document.
///
/// Children are always fully built before layout runs; the tree is never
/// mutated once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading { level: u8, children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    /// Each item is its own inline sequence.
    List { items: Vec<Vec<Node>> },
    Blockquote { children: Vec<Node> },
    Code { raw: String },
    InlineCode { raw: String },
    /// Rows of cells, each cell an inline sequence.
    Table { rows: Vec<Vec<Vec<Node>>> },
    Image { src: String, alt: String },
    ThematicBreak,
    LineBreak,
    Strong { children: Vec<Node> },
    Emphasis { children: Vec<Node> },
    Delete { children: Vec<Node> },
    Link { url: String, children: Vec<Node> },
    Text { raw: String },
    /// Transparent grouping for blocks without a dedicated layout rule.
    Container { children: Vec<Node> },
}

impl Node {
    pub fn text<S: Into<String>>(raw: S) -> Self {
        Node::Text { raw: raw.into() }
    }

    pub fn paragraph<S: Into<String>>(raw: S) -> Self {
        Node::Paragraph {
            children: vec![Node::text(raw)],
        }
    }

    pub fn heading<S: Into<String>>(level: u8, raw: S) -> Self {
        Node::Heading {
            level,
            children: vec![Node::text(raw)],
        }
    }

    /// Flatten the node into the text it displays.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { raw } | Node::Code { raw } | Node::InlineCode { raw } => out.push_str(raw),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::LineBreak => out.push('\n'),
            Node::ThematicBreak => {}
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::Blockquote { children }
            | Node::Strong { children }
            | Node::Emphasis { children }
            | Node::Delete { children }
            | Node::Link { children, .. }
            | Node::Container { children } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Node::List { items } => {
                for item in items {
                    for child in item {
                        child.collect_text(out);
                    }
                }
            }
            Node::Table { rows } => {
                for (row_idx, row) in rows.iter().enumerate() {
                    if row_idx > 0 {
                        out.push('\n');
                    }
                    for (cell_idx, cell) in row.iter().enumerate() {
                        if cell_idx > 0 {
                            out.push(' ');
                        }
                        out.push_str(&plain_text(cell));
                    }
                }
            }
        }
    }
}

/// Concatenated display text of an inline sequence.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}
