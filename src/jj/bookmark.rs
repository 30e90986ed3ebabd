// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `jj bookmark list` output parsing.
//!
//! Two formats are understood. The tabular one is produced by [`super::command`]'s templates,
//! one `name;remote;tracked;conflict;backwards;commit_id` record per remote. The simple one is
//! `name [(conflict)] change_id`, with the name possibly wrapped in colour codes.
//! Malformed lines are skipped.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Remote name used for the local pointer.
pub const LOCAL_REMOTE: &str = ".";
const GIT_REMOTE: &str = "git";
const ORIGIN_REMOTE: &str = "origin";
const CONFLICT_MARKER: &str = "(conflict)";
const TABULAR_FIELDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRemote {
    pub remote: String,
    pub commit_id: String,
    pub tracked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Bookmark {
    pub name: String,
    pub local: Option<BookmarkRemote>,
    pub remotes: Vec<BookmarkRemote>,
    pub conflict: bool,
    pub backwards: bool,
    pub commit_id: String,
}

impl Bookmark {
    pub fn is_deletable(&self) -> bool {
        self.local.is_some()
    }

    pub fn is_trackable(&self) -> bool {
        self.local.is_some() && self.remotes.is_empty()
    }
}

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi regex"))
}

pub fn strip_ansi(text: &str) -> std::borrow::Cow<'_, str> {
    ansi_re().replace_all(text, "")
}

/// Parses the `name [(conflict)] change_id` format.
pub fn parse_simple_bookmark_list(output: &str) -> Vec<Bookmark> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            let (conflict, change_id) = if parts.len() > 2 && parts[1] == CONFLICT_MARKER {
                (true, parts[2])
            } else {
                (false, parts[1])
            };
            Some(Bookmark {
                name: strip_ansi(parts[0]).into_owned(),
                conflict,
                commit_id: change_id.to_string(),
                local: Some(BookmarkRemote {
                    remote: LOCAL_REMOTE.to_string(),
                    commit_id: change_id.to_string(),
                    tracked: false,
                }),
                ..Bookmark::default()
            })
        })
        .collect()
}

/// Parses the tabular format, merging the per-remote records of one name into a single bookmark.
///
/// Output order follows first appearance of each name. `git` records are dropped and `origin` is
/// always the first remote.
pub fn parse_bookmark_list(output: &str) -> Vec<Bookmark> {
    let mut bookmarks: Vec<Bookmark> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split(';').collect();
        if parts.len() < TABULAR_FIELDS {
            continue;
        }
        let name = parts[0].trim_matches('"');
        let remote = parts[1];
        let tracked = parts[2] == "true";
        let conflict = parts[3] == "true";
        let backwards = parts[4] == "true";
        let commit_id = parts[5];

        if remote == GIT_REMOTE {
            continue;
        }

        let idx = *by_name.entry(name.to_string()).or_insert_with(|| {
            bookmarks.push(Bookmark {
                name: name.to_string(),
                conflict,
                backwards,
                commit_id: commit_id.to_string(),
                ..Bookmark::default()
            });
            bookmarks.len() - 1
        });
        let bookmark = &mut bookmarks[idx];

        let pointer = BookmarkRemote {
            remote: remote.to_string(),
            commit_id: commit_id.to_string(),
            tracked,
        };
        if remote == LOCAL_REMOTE {
            bookmark.commit_id = commit_id.to_string();
            bookmark.local = Some(pointer);
        } else if remote == ORIGIN_REMOTE {
            bookmark.remotes.insert(0, pointer);
        } else {
            bookmark.remotes.push(pointer);
        }
    }

    bookmarks
}
