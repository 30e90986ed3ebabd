// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering primitives shared by the panels.
//!
//! Components describe what they want drawn with named [`StyleKey`]s; the concrete colours come
//! from a [`StyleResolver`] handed in by the caller, so nothing here reads a global palette.

use ratatui::style::Style;

pub mod interaction;
pub mod rows;
pub(crate) mod text;

pub use interaction::{Interaction, InteractionKind, InteractionMap};
pub use rows::{row_height, row_lines, RowOverlay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Text,
    Dimmed,
    Markers,
    Checked,
    Selected,
    Title,
    Empty,
    Error,
    HelpKey,
    HelpText,
}

pub trait StyleResolver {
    fn style(&self, key: StyleKey) -> Style;
}

impl<F> StyleResolver for F
where
    F: Fn(StyleKey) -> Style,
{
    fn style(&self, key: StyleKey) -> Style {
        self(key)
    }
}

/// A run of overlay text drawn with a named style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub text: String,
    pub style: StyleKey,
}

impl Decoration {
    pub fn new(text: impl Into<String>, style: StyleKey) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn marker(text: impl Into<String>) -> Self {
        Self::new(text, StyleKey::Markers)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, StyleKey::Text)
    }

    pub fn dimmed(text: impl Into<String>) -> Self {
        Self::new(text, StyleKey::Dimmed)
    }
}

/// Concatenated text of a decoration run, for tests and width checks.
pub fn decorations_text(decorations: &[Decoration]) -> String {
    decorations.iter().map(|d| d.text.as_str()).collect()
}
