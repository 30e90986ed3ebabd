// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, warn};

use super::name_input::NameInput;
use super::{KeyHint, KeyOutcome, OpContext, RenderPosition};
use crate::jj::{parse_bookmark_list, Commit, JjCommand};
use crate::render::Decoration;
use crate::ui::{Effect, Msg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    SelectingRevision,
    EnteringName,
}

/// Two-stage bookmark creation: pick a revision with the cursor, then type a name.
#[derive(Debug, Clone)]
pub struct CreateBookmarkOperation {
    stage: CreateStage,
    target: Option<Commit>,
    name: NameInput,
}

impl Default for CreateBookmarkOperation {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateBookmarkOperation {
    pub fn new() -> Self {
        Self {
            stage: CreateStage::SelectingRevision,
            target: None,
            name: NameInput::new(),
        }
    }

    pub fn stage(&self) -> CreateStage {
        self.stage
    }

    pub fn target(&self) -> Option<&Commit> {
        self.target.as_ref()
    }

    pub fn name_value(&self) -> String {
        self.name.value()
    }

    pub fn suggestions(&self) -> &[String] {
        self.name.suggestions()
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent, ctx: &mut OpContext<'_>) -> KeyOutcome {
        match self.stage {
            CreateStage::SelectingRevision => match key.code {
                KeyCode::Esc => KeyOutcome::Effect(exit()),
                KeyCode::Enter => {
                    if let Some(target) = self.target.clone() {
                        self.enter_name_stage(&target, ctx);
                    }
                    KeyOutcome::Consumed
                }
                _ => KeyOutcome::Pass,
            },
            CreateStage::EnteringName => match key.code {
                KeyCode::Esc => {
                    debug!("back to revision selection");
                    self.stage = CreateStage::SelectingRevision;
                    self.name.clear();
                    KeyOutcome::Consumed
                }
                KeyCode::Enter => self.confirm(),
                _ => {
                    self.name.handle_key(key);
                    KeyOutcome::Consumed
                }
            },
        }
    }

    fn enter_name_stage(&mut self, target: &Commit, ctx: &mut OpContext<'_>) {
        debug!(target = %target.change_id, "entering bookmark name");
        self.stage = CreateStage::EnteringName;
        self.name.clear();
        let command = JjCommand::BookmarkListMovable {
            revision: target.revision().to_string(),
        };
        let suggestions = match ctx.runner.run(&command) {
            Ok(output) => parse_bookmark_list(&String::from_utf8_lossy(&output))
                .into_iter()
                .filter(|bookmark| !bookmark.name.is_empty() && !bookmark.backwards)
                .map(|bookmark| bookmark.name)
                .collect(),
            Err(err) => {
                warn!(%err, "bookmark suggestions unavailable");
                Vec::new()
            }
        };
        self.name.set_suggestions(suggestions);
    }

    fn confirm(&self) -> KeyOutcome {
        let name = self.name.normalized_name();
        let Some(target) = self.target.as_ref().filter(|_| !name.is_empty()) else {
            return KeyOutcome::Consumed;
        };
        debug!(%name, target = %target.change_id, "creating bookmark");
        let command = JjCommand::BookmarkCreate {
            name,
            revision: target.revision().to_string(),
        };
        KeyOutcome::Effect(Effect::sequence([
            Effect::run(command, [Msg::Refresh]),
            Effect::emit(Msg::EndCreateMode),
            Effect::emit(Msg::CloseOperation),
        ]))
    }

    /// The target is frozen while the name is typed.
    pub(super) fn set_selected_revision(&mut self, commit: Option<&Commit>) {
        if self.stage == CreateStage::SelectingRevision {
            self.target = commit.cloned();
        }
    }

    pub(super) fn render(&self, commit: &Commit, position: RenderPosition) -> Vec<Decoration> {
        if !self
            .target
            .as_ref()
            .is_some_and(|target| target.change_id == commit.change_id)
        {
            return Vec::new();
        }
        let entering = self.stage == CreateStage::EnteringName;
        match position {
            RenderPosition::BeforeChangeId if entering => {
                let mut out = self.name.view();
                out.push(Decoration::text(" "));
                out
            }
            RenderPosition::BeforeChangeId => {
                vec![Decoration::marker("<< on >>"), Decoration::text(" ")]
            }
            RenderPosition::AfterRow => {
                let hint = if entering {
                    " enter bookmark name"
                } else {
                    " create bookmark here"
                };
                vec![Decoration::marker("<< on >>"), Decoration::text(hint)]
            }
        }
    }

    pub(super) fn is_focused(&self) -> bool {
        self.stage == CreateStage::SelectingRevision
    }

    pub(super) fn is_editing(&self) -> bool {
        self.stage == CreateStage::EnteringName
    }

    pub(super) fn name(&self) -> &'static str {
        match self.stage {
            CreateStage::SelectingRevision => "create bookmark",
            CreateStage::EnteringName => "create bookmark (enter name)",
        }
    }

    pub(super) fn short_help(&self) -> Vec<KeyHint> {
        match self.stage {
            CreateStage::SelectingRevision => vec![
                KeyHint::new("enter", "select revision"),
                KeyHint::new("esc", "cancel"),
            ],
            CreateStage::EnteringName => vec![
                KeyHint::new("enter", "create"),
                KeyHint::new("tab", "complete"),
                KeyHint::new("esc", "back"),
            ],
        }
    }
}

fn exit() -> Effect {
    Effect::sequence([
        Effect::emit(Msg::EndCreateMode),
        Effect::emit(Msg::CloseOperation),
    ])
}
