//! Per-node typography.
//!
//! Styles are plain values: a child style is always a modified copy of its
//! parent, never an in-place edit.

use image::Rgba;

use crate::color::rgb;
use crate::font::Face;
use crate::template::Template;

pub const STRONG_COLOR: Rgba<u8> = rgb(0x00, 0x00, 0x00);
pub const LINK_COLOR: Rgba<u8> = rgb(0x19, 0x76, 0xd2);
pub const STRIKE_COLOR: Rgba<u8> = rgb(0x88, 0x88, 0x88);
const BODY_COLOR: Rgba<u8> = rgb(0x33, 0x33, 0x33);
const ACCENT_COLOR: Rgba<u8> = rgb(0xff, 0x66, 0x00);

/// Line decoration drawn alongside each wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub font_size: f32,
    pub color: Rgba<u8>,
    pub bold: bool,
    pub italic: bool,
    pub background: Option<Rgba<u8>>,
    pub decoration: Decoration,
}

/// Structural roles with a fixed style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading(u8),
    Paragraph,
    List,
    Blockquote,
    Code,
    Table,
    HeaderTitle,
}

impl Style {
    pub const fn new(font_size: f32, color: Rgba<u8>) -> Self {
        Self {
            font_size,
            color,
            bold: false,
            italic: false,
            background: None,
            decoration: Decoration::None,
        }
    }

    /// The template's default text style; the context every traversal starts from.
    pub fn root(template: &Template) -> Self {
        Self::new(template.font_size, template.font_color)
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Heading(level) => heading(level),
            Role::Paragraph | Role::List => Self::new(24.0, BODY_COLOR),
            Role::Blockquote => Self::new(24.0, ACCENT_COLOR).with_background(rgb(0xff, 0xf3, 0xe0)),
            Role::Code => Self::new(28.0, BODY_COLOR).with_background(rgb(0xf5, 0xf5, 0xf5)),
            Role::Table => Self::new(32.0, BODY_COLOR),
            Role::HeaderTitle => Self::new(38.0, rgb(0xff, 0xd6, 0x0a)),
        }
    }

    pub fn strong(self) -> Self {
        Self {
            bold: true,
            color: STRONG_COLOR,
            ..self
        }
    }

    pub fn emphasis(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn deleted(self) -> Self {
        Self {
            decoration: Decoration::Strikethrough,
            ..self
        }
    }

    pub fn linked(self) -> Self {
        Self {
            color: LINK_COLOR,
            decoration: Decoration::Underline,
            ..self
        }
    }

    pub fn with_background(self, color: Rgba<u8>) -> Self {
        Self {
            background: Some(color),
            ..self
        }
    }

    pub fn without_background(self) -> Self {
        Self {
            background: None,
            ..self
        }
    }

    pub fn face(&self) -> Face {
        Face {
            size: self.font_size,
            bold: self.bold,
        }
    }
}

/// Level 1..=6; anything else uses the level 1 entry.
fn heading(level: u8) -> Style {
    let (size, color) = match level {
        2 => (32.0, ACCENT_COLOR),
        3 => (28.0, ACCENT_COLOR),
        4 => (24.0, BODY_COLOR),
        5 => (20.0, BODY_COLOR),
        6 => (18.0, BODY_COLOR),
        _ => (36.0, rgb(0x22, 0x22, 0x22)),
    };
    Style {
        bold: true,
        ..Style::new(size, color)
    }
}
