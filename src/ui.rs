// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Messages and effects shared by the panels and the modal operations.
//!
//! Components never call each other. They return an [`Effect`], and the app shell interprets it:
//! running commands, then feeding the resulting [`Msg`]s back through its update function.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::jj::{Commit, JjCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Reload the revision log.
    Refresh,
    /// Reload the revision log and put the cursor on `revision`.
    RefreshAndSelect(String),
    /// Reload the bookmark panel.
    ReloadBookmarks,
    /// Toggle the checked state of every row between two change ids, inclusive.
    ToggleRange {
        start: SmolStr,
        end: SmolStr,
    },
    StartMoveMode {
        bookmark: String,
    },
    StartCreateMode,
    EndMoveMode,
    EndCreateMode,
    /// The active operation is done.
    CloseOperation,
    UpdateRevset(String),
    Toast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a command; on success, process `then` in order.
    Run { command: JjCommand, then: Vec<Msg> },
    Emit(Msg),
    /// Strictly in order.
    Sequence(Vec<Effect>),
    /// No ordering guarantee between members.
    Batch(Vec<Effect>),
}

impl Effect {
    pub fn emit(msg: Msg) -> Self {
        Self::Emit(msg)
    }

    pub fn run(command: JjCommand, then: impl IntoIterator<Item = Msg>) -> Self {
        Self::Run {
            command,
            then: then.into_iter().collect(),
        }
    }

    pub fn sequence(effects: impl IntoIterator<Item = Effect>) -> Self {
        Self::Sequence(effects.into_iter().collect())
    }

    pub fn batch(effects: impl IntoIterator<Item = Effect>) -> Self {
        Self::Batch(effects.into_iter().collect())
    }

    /// Commands this effect would run, depth first.
    pub fn commands(&self) -> Vec<&JjCommand> {
        let mut out = Vec::new();
        self.walk(&mut |effect| {
            if let Self::Run { command, .. } = effect {
                out.push(command);
            }
        });
        out
    }

    /// Messages this effect emits directly, depth first. Messages chained behind a command are
    /// not included.
    pub fn emitted(&self) -> Vec<&Msg> {
        let mut out = Vec::new();
        self.walk(&mut |effect| {
            if let Self::Emit(msg) = effect {
                out.push(msg);
            }
        });
        out
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Effect)) {
        visit(self);
        if let Self::Sequence(effects) | Self::Batch(effects) = self {
            for effect in effects {
                effect.walk(visit);
            }
        }
    }
}

/// Revisions the user has checked, keyed by change id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedRevisions {
    rev: u64,
    ids: BTreeSet<SmolStr>,
}

impl CheckedRevisions {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn contains(&self, commit: &Commit) -> bool {
        self.ids.contains(&commit.change_id)
    }

    pub fn toggle(&mut self, commit: &Commit) {
        if !self.ids.remove(&commit.change_id) {
            self.ids.insert(commit.change_id.clone());
        }
        self.rev = self.rev.wrapping_add(1);
    }

    /// Toggles each commit once.
    pub fn toggle_all<'a>(&mut self, commits: impl IntoIterator<Item = &'a Commit>) {
        for commit in commits {
            if !self.ids.remove(&commit.change_id) {
                self.ids.insert(commit.change_id.clone());
            }
        }
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.ids.clear();
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.ids.iter()
    }
}
