// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::layout::Rect;

use crate::layout::viewport::rect_contains;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    Drag,
    Scroll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction<M> {
    pub rect: Rect,
    pub kind: InteractionKind,
    pub msg: M,
}

/// Mouse targets registered during a draw. Rebuilt every frame; later registrations sit on top.
#[derive(Debug, Clone)]
pub struct InteractionMap<M> {
    items: Vec<Interaction<M>>,
}

impl<M> Default for InteractionMap<M> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<M> InteractionMap<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn register(&mut self, rect: Rect, kind: InteractionKind, msg: M) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.items.push(Interaction { rect, kind, msg });
    }

    /// Topmost target of `kind` under the cell.
    pub fn hit(&self, x: u16, y: u16, kind: InteractionKind) -> Option<&M> {
        self.items
            .iter()
            .rev()
            .find(|item| item.kind == kind && rect_contains(item.rect, x, y))
            .map(|item| &item.msg)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
