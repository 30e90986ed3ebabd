// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Virtualized list layout.
//!
//! Items have variable heights measured in lines. The list is a tall strip of
//! `sum(heights)` lines of which a `view.height`-line window is visible, starting at the scroll
//! offset. [`layout_list`] is pure; [`ListViewport`] remembers the last result so mouse
//! coordinates can be mapped back to items.

use ratatui::layout::Rect;

use crate::render::{InteractionKind, InteractionMap};

/// One visible item. `rect` is already clipped to the view; `clip_top` is the number of the
/// item's leading lines hidden above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpan {
    pub index: usize,
    pub rect: Rect,
    pub clip_top: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLayout {
    pub scroll_offset: usize,
    pub spans: Vec<ItemSpan>,
}

impl ListLayout {
    pub fn first_visible_index(&self) -> Option<usize> {
        self.spans.first().map(|span| span.index)
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.spans.last().map(|span| span.index)
    }
}

/// Lays out `item_count` items inside `view`.
///
/// The returned scroll offset is clamped to `0..=max(0, total - view.height)`. When `cursor` names
/// an item, the offset is adjusted so that item is visible: scrolled up to its first line when it
/// is above the window, down to its last line when it ends below it.
pub fn layout_list(
    scroll_offset: usize,
    item_count: usize,
    measure: impl Fn(usize) -> usize,
    view: Rect,
    cursor: Option<usize>,
) -> ListLayout {
    if item_count == 0 {
        return ListLayout::default();
    }

    let heights: Vec<usize> = (0..item_count).map(measure).collect();
    let total: usize = heights.iter().sum();
    let window = usize::from(view.height);
    let max_offset = total.saturating_sub(window);
    if window == 0 {
        return ListLayout {
            scroll_offset: scroll_offset.min(max_offset),
            spans: Vec::new(),
        };
    }

    let mut start = scroll_offset.min(max_offset);
    if let Some(cursor) = cursor.filter(|&cursor| cursor < item_count) {
        let cursor_start: usize = heights[..cursor].iter().sum();
        let cursor_end = cursor_start + heights[cursor];
        if cursor_start < start {
            start = cursor_start;
        } else if cursor_end > start + window {
            start = cursor_end.saturating_sub(window);
        }
        start = start.min(max_offset);
    }

    let end = start + window;
    let mut spans = Vec::new();
    let mut offset = 0;
    for (index, &height) in heights.iter().enumerate() {
        let item_start = offset;
        let item_end = offset + height;
        offset = item_end;
        if height == 0 || item_end <= start {
            continue;
        }
        if item_start >= end {
            break;
        }
        let visible_start = item_start.max(start);
        let visible_end = item_end.min(end);
        spans.push(ItemSpan {
            index,
            rect: Rect::new(
                view.x,
                view.y.saturating_add(to_u16(visible_start - start)),
                view.width,
                to_u16(visible_end - visible_start),
            ),
            clip_top: visible_start - item_start,
        });
    }

    ListLayout {
        scroll_offset: start,
        spans,
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Stateful wrapper around [`layout_list`].
#[derive(Debug, Clone, Default)]
pub struct ListViewport {
    scroll_offset: usize,
    layout: ListLayout,
    view: Rect,
}

impl ListViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a layout pass. Pass `cursor: None` to leave the scroll offset where the user put it.
    pub fn layout(
        &mut self,
        view: Rect,
        item_count: usize,
        measure: impl Fn(usize) -> usize,
        cursor: Option<usize>,
    ) -> &[ItemSpan] {
        self.view = view;
        self.layout = layout_list(self.scroll_offset, item_count, measure, view, cursor);
        self.scroll_offset = self.layout.scroll_offset;
        &self.layout.spans
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Moves the window. The next layout pass clamps the result.
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.layout = ListLayout::default();
    }

    pub fn spans(&self) -> &[ItemSpan] {
        &self.layout.spans
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.layout.first_visible_index()
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.layout.last_visible_index()
    }

    pub fn view(&self) -> Rect {
        self.view
    }

    /// Item under a screen cell, from the last layout pass.
    pub fn item_index_at(&self, x: u16, y: u16) -> Option<usize> {
        self.layout
            .spans
            .iter()
            .find(|span| rect_contains(span.rect, x, y))
            .map(|span| span.index)
    }

    /// Registers one click target per visible item.
    pub fn register_clicks<M>(&self, map: &mut InteractionMap<M>, msg: impl Fn(usize) -> M) {
        for span in &self.layout.spans {
            map.register(span.rect, InteractionKind::Click, msg(span.index));
        }
    }

    /// Registers one drag target per visible item.
    pub fn register_drags<M>(&self, map: &mut InteractionMap<M>, msg: impl Fn(usize) -> M) {
        for span in &self.layout.spans {
            map.register(span.rect, InteractionKind::Drag, msg(span.index));
        }
    }

    /// Registers the whole view as a wheel target.
    pub fn register_scroll<M>(&self, map: &mut InteractionMap<M>, msg: M) {
        map.register(self.view, InteractionKind::Scroll, msg);
    }
}

pub(crate) fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}
