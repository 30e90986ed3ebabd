// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use super::{KeyHint, KeyOutcome, OpContext, RenderPosition};
use crate::jj::Commit;
use crate::render::Decoration;
use crate::ui::{Effect, Msg};

/// Range selection: the start stays where the operation began, the end follows the cursor.
#[derive(Debug, Clone)]
pub struct BatchOperation {
    start: Commit,
    current: Option<Commit>,
}

impl BatchOperation {
    pub fn new(start: Commit) -> Self {
        Self {
            current: Some(start.clone()),
            start,
        }
    }

    pub fn start(&self) -> &Commit {
        &self.start
    }

    pub fn current(&self) -> Option<&Commit> {
        self.current.as_ref()
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent, ctx: &mut OpContext<'_>) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => KeyOutcome::Effect(self.confirm()),
            KeyCode::Esc => KeyOutcome::Effect(Effect::emit(Msg::CloseOperation)),
            KeyCode::Char(' ') => {
                if let Some(current) = &self.current {
                    ctx.checked.toggle(current);
                }
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Pass,
        }
    }

    fn confirm(&self) -> Effect {
        let Some(current) = &self.current else {
            return Effect::emit(Msg::CloseOperation);
        };
        debug!(start = %self.start.change_id, end = %current.change_id, "batch confirmed");
        Effect::batch([
            Effect::emit(Msg::ToggleRange {
                start: self.start.change_id.clone(),
                end: current.change_id.clone(),
            }),
            Effect::emit(Msg::CloseOperation),
        ])
    }

    pub(super) fn set_selected_revision(&mut self, commit: Option<&Commit>) {
        self.current = commit.cloned();
    }

    pub(super) fn render(&self, commit: &Commit, position: RenderPosition) -> Vec<Decoration> {
        if position != RenderPosition::BeforeChangeId {
            return Vec::new();
        }
        let marker = if commit.change_id == self.start.change_id {
            "<< start >>"
        } else if self
            .current
            .as_ref()
            .is_some_and(|current| current.change_id == commit.change_id)
        {
            "<< end >>"
        } else {
            return Vec::new();
        };
        vec![Decoration::marker(marker), Decoration::text(" ")]
    }

    pub(super) fn name(&self) -> &'static str {
        "batch"
    }

    pub(super) fn status(&self) -> String {
        let mut status = format!("Batch select from: {}", self.start.revision());
        if let Some(current) = self
            .current
            .as_ref()
            .filter(|current| current.change_id != self.start.change_id)
        {
            status.push_str(&format!(" to: {}", current.revision()));
        }
        status
    }

    pub(super) fn short_help(&self) -> Vec<KeyHint> {
        vec![
            KeyHint::new("enter", "toggle range"),
            KeyHint::new("space", "toggle"),
            KeyHint::new("esc", "cancel"),
        ]
    }
}
