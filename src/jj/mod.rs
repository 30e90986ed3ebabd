// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Everything that talks about `jj` itself: revision identity, bookmark listings, the command
//! vocabulary, and the process runner.

pub mod bookmark;
pub mod command;
pub mod runner;

use serde::Serialize;
use smol_str::SmolStr;

pub use bookmark::{parse_bookmark_list, parse_simple_bookmark_list, Bookmark, BookmarkRemote};
pub use command::JjCommand;
pub use runner::{CommandRunner, ProcessRunner, RunError};

const CONFLICT_SUFFIX: &str = "??";

/// Identity of one revision as read off a log line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Commit {
    pub change_id: SmolStr,
    pub commit_id: Option<SmolStr>,
    pub is_working_copy: bool,
    pub is_conflicted: bool,
}

impl Commit {
    pub fn new(change_id: impl Into<SmolStr>) -> Self {
        Self {
            change_id: change_id.into(),
            ..Self::default()
        }
    }

    pub fn with_commit_id(mut self, commit_id: impl Into<SmolStr>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    /// True when `jj` printed the change id with the divergence suffix.
    pub fn has_divergent_change_id(&self) -> bool {
        self.change_id.ends_with(CONFLICT_SUFFIX)
    }

    /// Identifier usable as a revset.
    ///
    /// A `??`-suffixed change id is ambiguous, so the commit id is preferred when one was found.
    pub fn revision(&self) -> &str {
        if self.has_divergent_change_id() {
            if let Some(commit_id) = &self.commit_id {
                return commit_id;
            }
            return self.change_id.trim_end_matches('?');
        }
        &self.change_id
    }
}
