// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout of variable-height lists inside a terminal viewport.

pub mod viewport;

pub use viewport::{layout_list, ItemSpan, ListLayout, ListViewport};
