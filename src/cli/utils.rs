//! Convenience helpers shared by the command handler.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mdcards::{Node, Page, card_file_name};

/// Read the markdown input, treating `-` as stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return read_stdin();
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Directory relative image links resolve against: the input's own directory.
pub fn asset_root(input: &Path) -> PathBuf {
    if input.as_os_str() == "-" {
        return PathBuf::from(".");
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// One line per page, then one indented line per node.
pub fn describe_plan(pages: &[Page]) -> String {
    let mut out = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} | {} node(s) | {:.0}px",
            card_file_name(idx + 1),
            page.nodes.len(),
            page.extent
        );
        for node in &page.nodes {
            let _ = writeln!(out, "    {}", summarize(node));
        }
    }
    out
}

fn summarize(node: &Node) -> String {
    let kind = match node {
        Node::Heading { level, .. } => format!("h{level}"),
        Node::Paragraph { .. } => "paragraph".to_string(),
        Node::List { items } => format!("list[{}]", items.len()),
        Node::Blockquote { .. } => "quote".to_string(),
        Node::Code { .. } => "code".to_string(),
        Node::Table { rows } => format!("table[{}]", rows.len()),
        Node::Image { src, .. } => format!("image {src}"),
        Node::ThematicBreak => "rule".to_string(),
        _ => "block".to_string(),
    };
    let text: String = node.plain_text().chars().take(40).collect();
    let text = text.replace('\n', " ");
    if text.is_empty() {
        kind
    } else {
        format!("{kind}: {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn asset_root_is_the_input_directory() {
        assert_eq!(asset_root(Path::new("docs/post.md")), PathBuf::from("docs"));
        assert_eq!(asset_root(Path::new("post.md")), PathBuf::from("."));
        assert_eq!(asset_root(Path::new("-")), PathBuf::from("."));
    }

    #[test]
    fn plan_lists_pages_and_nodes() {
        let pages = vec![
            Page {
                nodes: vec![Node::heading(2, "Intro"), Node::ThematicBreak],
                extent: 90.0,
            },
            Page {
                nodes: vec![Node::paragraph("body")],
                extent: 21.0,
            },
        ];
        assert_eq!(
            describe_plan(&pages),
            "page_01.png | 2 node(s) | 90px\n    h2: Intro\n    rule\npage_02.png | 1 node(s) | 21px\n    paragraph: body\n"
        );
    }
}
