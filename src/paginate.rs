//! Greedy page assignment.
//!
//! Nodes are packed in order into pages until the next node would overflow
//! the page's budget. A node is never split and never dropped: one that
//! overflows an empty page still gets that page to itself.

use crate::layout::{CONTENT_TOP, Context, node_height};
use crate::model::Node;
use crate::style::Style;

/// An ordered run of nodes drawn onto one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub nodes: Vec<Node>,
    /// Measured height of the nodes, excluding the header band.
    pub extent: f32,
}

/// What decides where a page ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBreakPolicy {
    /// Measured layout height against the template's usable height.
    #[default]
    Height,
    /// Character count of each block's markdown-like text against a fixed budget.
    CharBudget(usize),
}

/// Split `nodes` into pages. Identical input always yields the identical partition.
pub fn paginate(nodes: Vec<Node>, cx: Context<'_>, policy: PageBreakPolicy) -> Vec<Page> {
    let template = cx.template;
    let width = template.content_width();
    let root = Style::root(template);
    let measured: Vec<(Node, f32)> = nodes
        .into_iter()
        .map(|node| {
            let height = node_height(&node, cx, width, &root);
            (node, height)
        })
        .collect();

    match policy {
        PageBreakPolicy::Height => pack(measured, template.content_bottom() - CONTENT_TOP, |_, height| height),
        PageBreakPolicy::CharBudget(max_chars) => {
            pack(measured, max_chars as f32, |node, _| block_chars(node) as f32)
        }
    }
}

fn pack(
    measured: Vec<(Node, f32)>,
    budget: f32,
    weigh: impl Fn(&Node, f32) -> f32,
) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page {
        nodes: Vec::new(),
        extent: 0.0,
    };
    let mut used = 0.0;
    for (node, height) in measured {
        let weight = weigh(&node, height);
        if used + weight > budget && !current.nodes.is_empty() {
            pages.push(std::mem::replace(
                &mut current,
                Page {
                    nodes: Vec::new(),
                    extent: 0.0,
                },
            ));
            used = 0.0;
        }
        current.nodes.push(node);
        current.extent += height;
        used += weight;
    }
    if !current.nodes.is_empty() {
        pages.push(current);
    }
    pages
}

/// Length in characters of the text a block stands for, counted the way a
/// markdown source would spell it.
fn block_chars(node: &Node) -> usize {
    match node {
        Node::ThematicBreak => "---\n".len(),
        Node::Heading { level, .. } => *level as usize + 1 + node.plain_text().chars().count() + 1,
        Node::Blockquote { children } => children
            .iter()
            .map(|child| 2 + child.plain_text().chars().count() + 1)
            .sum(),
        Node::List { items } => items
            .iter()
            .map(|item| 2 + crate::model::plain_text(item).chars().count() + 1)
            .sum(),
        _ => node.plain_text().chars().count() + 1,
    }
}
