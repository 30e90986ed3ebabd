// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Tabular template for bookmarks near a revision. The `backwards` column is true when moving the
/// bookmark to the revision would move it backwards.
const MOVABLE_TEMPLATE: &str = r#"separate(";", name, if(remote, remote, "."), tracked, conflict, normal_target.contained_in("{after}"), normal_target.commit_id().shortest(1)) ++ "\n""#;

const SIMPLE_TEMPLATE: &str = r#"if(conflict, label("bookmark", name) ++ " (conflict)", label("bookmark", name)) ++ " " ++ coalesce(normal_target.change_id().shortest(6), "(deleted)") ++ "\n""#;

/// The `jj` invocations this crate knows how to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JjCommand {
    Log {
        revset: Option<String>,
        limit: Option<usize>,
    },
    BookmarkListSimple,
    BookmarkListMovable {
        revision: String,
    },
    BookmarkMove {
        name: String,
        revision: String,
    },
    BookmarkCreate {
        name: String,
        revision: String,
    },
    BookmarkDelete {
        name: String,
    },
    BookmarkForget {
        name: String,
    },
    BookmarkTrack {
        name: String,
        remote: String,
    },
    BookmarkUntrack {
        name: String,
        remote: String,
    },
    New {
        revisions: Vec<String>,
    },
}

impl JjCommand {
    pub fn args(&self) -> Vec<String> {
        let owned = |parts: &[&str]| parts.iter().map(|part| part.to_string()).collect::<Vec<_>>();
        match self {
            Self::Log { revset, limit } => {
                let mut args = owned(&["log", "--color", "always"]);
                if let Some(revset) = revset {
                    args.extend(["-r".to_string(), revset.clone()]);
                }
                if let Some(limit) = limit {
                    args.extend(["--limit".to_string(), limit.to_string()]);
                }
                args
            }
            Self::BookmarkListSimple => owned(&[
                "bookmark",
                "list",
                "--color",
                "always",
                "--template",
                SIMPLE_TEMPLATE,
            ]),
            Self::BookmarkListMovable { revision } => {
                let after = format!("{revision}::");
                let revset = format!("::{revision} | {after}");
                let template = MOVABLE_TEMPLATE.replace("{after}", &after);
                vec![
                    "bookmark".to_string(),
                    "list".to_string(),
                    "-r".to_string(),
                    revset,
                    "--template".to_string(),
                    template,
                    "--color".to_string(),
                    "never".to_string(),
                ]
            }
            Self::BookmarkMove { name, revision } => {
                owned(&["bookmark", "move", name.as_str(), "--to", revision.as_str()])
            }
            Self::BookmarkCreate { name, revision } => {
                owned(&["bookmark", "create", name.as_str(), "-r", revision.as_str()])
            }
            Self::BookmarkDelete { name } => owned(&["bookmark", "delete", name.as_str()]),
            Self::BookmarkForget { name } => owned(&["bookmark", "forget", name.as_str()]),
            Self::BookmarkTrack { name, remote } => {
                vec![
                    "bookmark".to_string(),
                    "track".to_string(),
                    format!("{name}@{remote}"),
                ]
            }
            Self::BookmarkUntrack { name, remote } => {
                vec![
                    "bookmark".to_string(),
                    "untrack".to_string(),
                    format!("{name}@{remote}"),
                ]
            }
            Self::New { revisions } => {
                let mut args = vec!["new".to_string()];
                args.extend(revisions.iter().cloned());
                args
            }
        }
    }
}

impl fmt::Display for JjCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log { revset: Some(revset), .. } => write!(f, "jj log -r {revset}"),
            Self::Log { revset: None, .. } => f.write_str("jj log"),
            Self::BookmarkListSimple => f.write_str("jj bookmark list"),
            Self::BookmarkListMovable { revision } => {
                write!(f, "jj bookmark list -r ::{revision} | {revision}::")
            }
            _ => write!(f, "jj {}", self.args().join(" ")),
        }
    }
}
