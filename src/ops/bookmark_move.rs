// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use super::{KeyHint, KeyOutcome, RenderPosition};
use crate::jj::{Commit, JjCommand};
use crate::render::Decoration;
use crate::ui::{Effect, Msg};

/// Picks the revision a bookmark should move to.
#[derive(Debug, Clone)]
pub struct MoveBookmarkOperation {
    bookmark: String,
    target: Option<Commit>,
}

impl MoveBookmarkOperation {
    pub fn new(bookmark: impl Into<String>) -> Self {
        Self {
            bookmark: bookmark.into(),
            target: None,
        }
    }

    pub fn bookmark(&self) -> &str {
        &self.bookmark
    }

    pub fn target(&self) -> Option<&Commit> {
        self.target.as_ref()
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => KeyOutcome::Effect(exit()),
            KeyCode::Enter => {
                let Some(target) = &self.target else {
                    return KeyOutcome::Effect(exit());
                };
                debug!(bookmark = %self.bookmark, target = %target.change_id, "moving bookmark");
                let command = JjCommand::BookmarkMove {
                    name: self.bookmark.clone(),
                    revision: target.revision().to_string(),
                };
                KeyOutcome::Effect(Effect::sequence([
                    Effect::run(command, [Msg::Refresh]),
                    Effect::emit(Msg::EndMoveMode),
                    Effect::emit(Msg::CloseOperation),
                ]))
            }
            _ => KeyOutcome::Pass,
        }
    }

    pub(super) fn set_selected_revision(&mut self, commit: Option<&Commit>) {
        self.target = commit.cloned();
    }

    pub(super) fn render(&self, commit: &Commit, position: RenderPosition) -> Vec<Decoration> {
        let Some(target) = self.target.as_ref().filter(|t| t.change_id == commit.change_id)
        else {
            return Vec::new();
        };
        match position {
            RenderPosition::BeforeChangeId => {
                vec![Decoration::marker("<< onto >>"), Decoration::text(" ")]
            }
            RenderPosition::AfterRow => vec![
                Decoration::marker("<< onto >>"),
                Decoration::text(format!(
                    " move bookmark '{}' to {}",
                    self.bookmark,
                    target.revision()
                )),
            ],
        }
    }

    pub(super) fn name(&self) -> String {
        format!("move bookmark '{}'", self.bookmark)
    }

    pub(super) fn short_help(&self) -> Vec<KeyHint> {
        vec![
            KeyHint::new("enter", "move bookmark"),
            KeyHint::new("esc", "cancel move"),
        ]
    }
}

/// End-move must reach the bookmark panel before the close does.
fn exit() -> Effect {
    Effect::sequence([
        Effect::emit(Msg::EndMoveMode),
        Effect::emit(Msg::CloseOperation),
    ])
}
