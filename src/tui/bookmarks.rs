// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::theme::TuiTheme;
use super::UiTarget;
use crate::jj::{parse_simple_bookmark_list, Bookmark, Commit, CommandRunner, JjCommand, RunError};
use crate::layout::ListViewport;
use crate::ops::{KeyHint, KeyOutcome};
use crate::render::text::{text_len, truncate_with_ellipsis};
use crate::render::{InteractionMap, StyleKey, StyleResolver};
use crate::ui::{Effect, Msg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PanelMode {
    Browse,
    Moving,
    Creating,
}

#[derive(Debug)]
pub(crate) struct BookmarkPanel {
    bookmarks: Vec<Bookmark>,
    cursor: usize,
    visible: bool,
    focused: bool,
    mode: PanelMode,
    target: Option<Commit>,
    viewport: ListViewport,
}

impl BookmarkPanel {
    pub(crate) fn new() -> Self {
        Self {
            bookmarks: Vec::new(),
            cursor: 0,
            visible: false,
            focused: false,
            mode: PanelMode::Browse,
            target: None,
            viewport: ListViewport::new(),
        }
    }

    pub(crate) fn load(&mut self, runner: &dyn CommandRunner) -> Result<(), RunError> {
        let output = runner.run(&JjCommand::BookmarkListSimple)?;
        self.set_bookmarks(parse_simple_bookmark_list(&String::from_utf8_lossy(&output)));
        Ok(())
    }

    pub(crate) fn set_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        debug!(count = bookmarks.len(), "bookmarks loaded");
        self.bookmarks = bookmarks;
        self.cursor = self.cursor.min(self.bookmarks.len().saturating_sub(1));
    }

    pub(crate) fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub(crate) fn selected(&self) -> Option<&Bookmark> {
        self.bookmarks.get(self.cursor)
    }

    pub(crate) fn select(&mut self, index: usize) {
        if index < self.bookmarks.len() {
            self.cursor = index;
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn is_focused(&self) -> bool {
        self.visible && self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub(crate) fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Showing the panel focuses it.
    pub(crate) fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        self.focused = self.visible;
    }

    pub(crate) fn set_target(&mut self, commit: Option<&Commit>) {
        self.target = commit.cloned();
    }

    pub(crate) fn start_mode(&mut self, mode: PanelMode, target: Option<&Commit>) {
        self.mode = mode;
        self.target = target.cloned();
        self.focused = false;
    }

    /// Leaves move or create mode. Focus comes back with the close of the operation.
    pub(crate) fn end_mode(&mut self) {
        self.mode = PanelMode::Browse;
        self.target = None;
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        let last = self.bookmarks.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, default_remote: &str) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => {
                self.toggle_visible();
                KeyOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                KeyOutcome::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                KeyOutcome::Consumed
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor = 0;
                KeyOutcome::Consumed
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.bookmarks.len().saturating_sub(1);
                KeyOutcome::Consumed
            }
            KeyCode::Enter => self.with_selected(|bookmark| {
                Effect::emit(Msg::UpdateRevset(format!("trunk()::{}", bookmark.name)))
            }),
            KeyCode::Char('m') => {
                let Some(bookmark) = self.selected().map(|b| b.name.clone()) else {
                    return KeyOutcome::Consumed;
                };
                self.start_mode(PanelMode::Moving, None);
                KeyOutcome::Effect(Effect::emit(Msg::StartMoveMode { bookmark }))
            }
            KeyCode::Char('c') => {
                self.start_mode(PanelMode::Creating, None);
                KeyOutcome::Effect(Effect::emit(Msg::StartCreateMode))
            }
            KeyCode::Char('n') => self.with_selected(|bookmark| {
                Effect::run(
                    JjCommand::New {
                        revisions: vec![bookmark.name.clone()],
                    },
                    [Msg::RefreshAndSelect("@".to_string())],
                )
            }),
            KeyCode::Char('d') => match self.selected().filter(|b| b.is_deletable()) {
                Some(bookmark) => KeyOutcome::Effect(reloading(JjCommand::BookmarkDelete {
                    name: bookmark.name.clone(),
                })),
                None => KeyOutcome::Consumed,
            },
            KeyCode::Char('f') => self.with_selected(|bookmark| {
                reloading(JjCommand::BookmarkForget {
                    name: bookmark.name.clone(),
                })
            }),
            KeyCode::Char('t') => match self.selected().filter(|b| b.is_trackable()) {
                Some(bookmark) => KeyOutcome::Effect(reloading(JjCommand::BookmarkTrack {
                    name: bookmark.name.clone(),
                    remote: default_remote.to_string(),
                })),
                None => KeyOutcome::Consumed,
            },
            KeyCode::Char('u') => {
                let untrack = self.selected().and_then(|bookmark| {
                    bookmark.remotes.first().map(|remote| JjCommand::BookmarkUntrack {
                        name: bookmark.name.clone(),
                        remote: remote.remote.clone(),
                    })
                });
                match untrack {
                    Some(command) => KeyOutcome::Effect(reloading(command)),
                    None => KeyOutcome::Consumed,
                }
            }
            _ => KeyOutcome::Pass,
        }
    }

    fn with_selected(&self, effect: impl FnOnce(&Bookmark) -> Effect) -> KeyOutcome {
        match self.selected() {
            Some(bookmark) => KeyOutcome::Effect(effect(bookmark)),
            None => KeyOutcome::Consumed,
        }
    }

    pub(crate) fn title(&self) -> String {
        match (self.mode, &self.target) {
            (PanelMode::Moving, Some(target)) => format!("Move bookmark to: {}", target.change_id),
            (PanelMode::Creating, _) => "Create bookmark: select revision".to_string(),
            _ => format!("Bookmarks ({})", self.bookmarks.len()),
        }
    }

    pub(crate) fn short_help(&self) -> Vec<KeyHint> {
        vec![
            KeyHint::new("enter", "view revset"),
            KeyHint::new("c", "create"),
            KeyHint::new("n", "new revision"),
            KeyHint::new("m", "move"),
            KeyHint::new("d", "delete"),
            KeyHint::new("f", "forget"),
            KeyHint::new("t", "track"),
            KeyHint::new("u", "untrack"),
            KeyHint::new("esc", "close"),
        ]
    }

    pub(crate) fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &TuiTheme,
        interactions: &mut InteractionMap<UiTarget>,
    ) {
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(theme.panel_border_style(self.is_focused()))
            .title(Span::styled(
                format!(" {}", self.title()),
                theme.style(StyleKey::Title),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        // One blank line under the title.
        let list_area = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };

        if self.bookmarks.is_empty() {
            let empty = Line::from(Span::styled(" No bookmarks found", theme.style(StyleKey::Empty)));
            frame.render_widget(Paragraph::new(empty), list_area);
            self.viewport.reset();
            return;
        }

        self.viewport
            .layout(list_area, self.bookmarks.len(), |_| 1, Some(self.cursor));
        let width = usize::from(list_area.width);
        for span in self.viewport.spans() {
            let bookmark = &self.bookmarks[span.index];
            let selected = span.index == self.cursor;
            frame.render_widget(
                Paragraph::new(bookmark_line(bookmark, width, selected, theme)),
                span.rect,
            );
        }
        self.viewport.register_clicks(interactions, UiTarget::BookmarkRow);
        self.viewport.register_scroll(interactions, UiTarget::BookmarksScroll);
    }
}

fn reloading(command: JjCommand) -> Effect {
    Effect::run(command, [Msg::Refresh, Msg::ReloadBookmarks])
}

/// ` name[ (conflict)]` on the left, the commit id in the remaining width, dimmed.
fn bookmark_line(
    bookmark: &Bookmark,
    width: usize,
    selected: bool,
    theme: &TuiTheme,
) -> Line<'static> {
    let mut title = format!(" {}", bookmark.name);
    if bookmark.conflict {
        title.push_str(" (conflict)");
    }
    let mut title_style = theme.style(StyleKey::Text);
    let mut desc_style = theme.style(StyleKey::Dimmed);
    if selected {
        let selection = theme.style(StyleKey::Selected);
        title_style = title_style.patch(selection);
        desc_style = desc_style.patch(selection);
    }

    let title = truncate_with_ellipsis(&title, width);
    let mut spans = vec![Span::styled(title.clone(), title_style)];
    let available = width.saturating_sub(text_len(&title) + 1);
    if !bookmark.commit_id.is_empty() && available > 1 {
        let desc = truncate_with_ellipsis(&format!(" {}", bookmark.commit_id), available);
        spans.push(Span::styled(desc, desc_style));
    }
    let used: usize = spans.iter().map(|span| text_len(&span.content)).sum();
    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), title_style));
    }
    Line::from(spans)
}
