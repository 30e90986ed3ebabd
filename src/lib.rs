// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! jjgraph: a terminal dashboard for the `jj` log.
//!
//! Colored `jj log` output is decoded into styled segments ([`screen`]), grouped into revision
//! rows ([`parser`]) and streamed to the UI in batches. The [`tui`] lays rows out through a
//! virtualized viewport ([`layout`]) and runs modal operations ([`ops`]) that turn key presses
//! into `jj` commands ([`jj`]).

pub mod config;
pub mod jj;
pub mod layout;
pub mod ops;
pub mod parser;
pub mod render;
pub mod screen;
pub mod tui;
pub mod ui;
