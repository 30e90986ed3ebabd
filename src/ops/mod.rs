// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modal operations layered over the revisions view.
//!
//! An operation sees key presses before the revisions view does, follows the selected revision,
//! and draws overlay decorations into rows. It never mutates app state directly: everything it
//! wants done comes back as an [`Effect`]. Every operation ends by emitting
//! [`Msg::CloseOperation`](crate::ui::Msg::CloseOperation).

pub mod batch;
pub mod bookmark_create;
pub mod bookmark_move;
mod name_input;

use crossterm::event::KeyEvent;

pub use batch::BatchOperation;
pub use bookmark_create::{CreateBookmarkOperation, CreateStage};
pub use bookmark_move::MoveBookmarkOperation;

use crate::jj::{Commit, CommandRunner};
use crate::render::Decoration;
use crate::ui::{CheckedRevisions, Effect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    BeforeChangeId,
    AfterRow,
}

/// What became of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; the host may use it.
    Pass,
    Consumed,
    Effect(Effect),
}

/// Host services available while handling a key.
pub struct OpContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub checked: &'a mut CheckedRevisions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub help: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, help: &'static str) -> Self {
        Self { key, help }
    }
}

/// Panel that receives focus when an operation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Revisions,
    Bookmarks,
}

#[derive(Debug, Clone)]
pub enum Operation {
    Batch(BatchOperation),
    MoveBookmark(MoveBookmarkOperation),
    CreateBookmark(CreateBookmarkOperation),
}

impl Operation {
    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut OpContext<'_>) -> KeyOutcome {
        match self {
            Self::Batch(op) => op.handle_key(key, ctx),
            Self::MoveBookmark(op) => op.handle_key(key),
            Self::CreateBookmark(op) => op.handle_key(key, ctx),
        }
    }

    pub fn set_selected_revision(&mut self, commit: Option<&Commit>) {
        match self {
            Self::Batch(op) => op.set_selected_revision(commit),
            Self::MoveBookmark(op) => op.set_selected_revision(commit),
            Self::CreateBookmark(op) => op.set_selected_revision(commit),
        }
    }

    /// Overlay for `commit` at `position`; empty when there is nothing to draw.
    pub fn render(&self, commit: &Commit, position: RenderPosition) -> Vec<Decoration> {
        match self {
            Self::Batch(op) => op.render(commit, position),
            Self::MoveBookmark(op) => op.render(commit, position),
            Self::CreateBookmark(op) => op.render(commit, position),
        }
    }

    /// True while the operation drives the revisions cursor.
    pub fn is_focused(&self) -> bool {
        match self {
            Self::Batch(_) | Self::MoveBookmark(_) => true,
            Self::CreateBookmark(op) => op.is_focused(),
        }
    }

    /// True while the operation owns every key, text entry included.
    pub fn is_editing(&self) -> bool {
        match self {
            Self::Batch(_) | Self::MoveBookmark(_) => false,
            Self::CreateBookmark(op) => op.is_editing(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Batch(op) => op.name().to_string(),
            Self::MoveBookmark(op) => op.name(),
            Self::CreateBookmark(op) => op.name().to_string(),
        }
    }

    pub fn short_help(&self) -> Vec<KeyHint> {
        match self {
            Self::Batch(op) => op.short_help(),
            Self::MoveBookmark(op) => op.short_help(),
            Self::CreateBookmark(op) => op.short_help(),
        }
    }

    /// One-line summary for the footer, if the operation has one.
    pub fn status(&self) -> Option<String> {
        match self {
            Self::Batch(op) => Some(op.status()),
            Self::MoveBookmark(_) | Self::CreateBookmark(_) => None,
        }
    }

    pub fn owner(&self) -> Owner {
        match self {
            Self::Batch(_) => Owner::Revisions,
            Self::MoveBookmark(_) | Self::CreateBookmark(_) => Owner::Bookmarks,
        }
    }
}
