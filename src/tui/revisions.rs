// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::{self, Read};

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::theme::TuiTheme;
use super::UiTarget;
use crate::jj::Commit;
use crate::layout::ListViewport;
use crate::ops::{Operation, RenderPosition};
use crate::parser::{parse_rows_streaming, Row, RowBatch, RowStream, StreamPoll};
use crate::render::{
    row_height, row_lines, Decoration, InteractionMap, RowOverlay, StyleKey, StyleResolver,
};
use crate::ui::CheckedRevisions;

/// Rows left below the cursor (or the last visible row) before the next batch is requested.
const LOAD_AHEAD: usize = 10;
const CHECKED_MARKER: &str = "✓ ";
const WORKING_COPY: &str = "@";

/// The revision log: rows, the cursor, the checked set, and the stream feeding them.
#[derive(Debug)]
pub(crate) struct RevisionsView {
    rows: Vec<Row>,
    cursor: usize,
    checked: CheckedRevisions,
    viewport: ListViewport,
    stream: Option<RowStream>,
    batch_size: usize,
    awaiting: bool,
    replace_next: bool,
    select_after_load: Option<String>,
}

impl RevisionsView {
    pub(crate) fn new(batch_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            cursor: 0,
            checked: CheckedRevisions::default(),
            viewport: ListViewport::new(),
            stream: None,
            batch_size,
            awaiting: false,
            replace_next: false,
            select_after_load: None,
        }
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn selected(&self) -> Option<&Commit> {
        self.rows.get(self.cursor).map(|row| &row.commit)
    }

    pub(crate) fn checked(&self) -> &CheckedRevisions {
        &self.checked
    }

    pub(crate) fn checked_mut(&mut self) -> &mut CheckedRevisions {
        &mut self.checked
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.stream.is_some()
    }

    /// Starts a new load. Rows already shown stay until the first batch replaces them; the
    /// cursor then goes to `select` or back to the revision it was on.
    pub(crate) fn start_load(
        &mut self,
        reader: Box<dyn Read + Send>,
        select: Option<String>,
    ) -> io::Result<()> {
        if let Some(mut previous) = self.stream.take() {
            previous.close();
        }
        let stream = parse_rows_streaming(reader, self.batch_size)?;
        self.awaiting = stream.request_more();
        self.stream = Some(stream);
        self.replace_next = true;
        self.select_after_load =
            select.or_else(|| self.selected().map(|commit| commit.change_id.to_string()));
        debug!(select = ?self.select_after_load, "revisions load started");
        Ok(())
    }

    /// Applies whatever the producer has delivered. With `blocking`, waits for an outstanding
    /// request to be answered. Returns true when rows changed.
    pub(crate) fn pump(&mut self, blocking: bool) -> bool {
        let mut changed = false;
        while let Some(stream) = self.stream.as_mut() {
            let poll = if blocking && self.awaiting {
                match stream.next_blocking() {
                    Some(batch) => StreamPoll::Batch(batch),
                    None => StreamPoll::Finished,
                }
            } else {
                stream.try_next()
            };
            match poll {
                StreamPoll::Batch(batch) => {
                    self.awaiting = false;
                    self.apply_batch(batch);
                    changed = true;
                }
                StreamPoll::Pending => break,
                StreamPoll::Finished => {
                    self.finish_load();
                    changed = true;
                }
            }
        }
        changed
    }

    fn apply_batch(&mut self, batch: RowBatch) {
        debug!(rows = batch.rows.len(), has_more = batch.has_more, "row batch received");
        if self.replace_next {
            self.replace_next = false;
            self.rows = batch.rows;
            self.cursor = 0;
            self.viewport.reset();
        } else {
            self.rows.extend(batch.rows);
        }
        if let Some(revision) = self.select_after_load.as_deref() {
            if let Some(idx) = self.find_revision(revision) {
                self.cursor = idx;
                self.select_after_load = None;
            }
        }
        self.clamp_cursor();
        if !batch.has_more {
            self.finish_load();
        }
    }

    fn finish_load(&mut self) {
        if self.replace_next {
            self.rows.clear();
            self.replace_next = false;
        }
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
        self.awaiting = false;
        self.select_after_load = None;
        self.clamp_cursor();
        debug!(rows = self.rows.len(), "revisions load finished");
    }

    /// Asks for the next batch once the cursor or the window nears the end of the loaded rows.
    pub(crate) fn maybe_request_more(&mut self) -> bool {
        let Some(stream) = &self.stream else {
            return false;
        };
        if self.awaiting || self.replace_next {
            return false;
        }
        let horizon = self
            .viewport
            .last_visible_index()
            .unwrap_or(0)
            .max(self.cursor);
        if horizon + LOAD_AHEAD < self.rows.len() {
            return false;
        }
        self.awaiting = stream.request_more();
        self.awaiting
    }

    fn find_revision(&self, revision: &str) -> Option<usize> {
        if revision == WORKING_COPY {
            return self.rows.iter().position(|row| row.commit.is_working_copy);
        }
        self.rows.iter().position(|row| {
            let commit = &row.commit;
            commit.change_id == revision
                || commit.revision() == revision
                || commit.commit_id.as_deref() == Some(revision)
        })
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index >= self.rows.len() || index == self.cursor {
            return false;
        }
        self.cursor = index;
        true
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) -> bool {
        let last = self.rows.len().saturating_sub(1);
        let next = self.cursor.saturating_add_signed(delta).min(last);
        self.select(next)
    }

    pub(crate) fn select_first(&mut self) -> bool {
        self.select(0)
    }

    pub(crate) fn select_last(&mut self) -> bool {
        self.select(self.rows.len().saturating_sub(1))
    }

    /// Rows currently on screen, at least one.
    pub(crate) fn page_len(&self) -> usize {
        self.viewport.spans().len().max(1)
    }

    pub(crate) fn scroll_by(&mut self, delta: isize) {
        self.viewport.scroll_by(delta);
    }

    pub(crate) fn toggle_selected(&mut self) {
        if let Some(row) = self.rows.get(self.cursor) {
            self.checked.toggle(&row.commit);
        }
    }

    /// Toggles every row between two change ids, inclusive, in either order.
    pub(crate) fn toggle_range(&mut self, start: &str, end: &str) -> bool {
        let position = |id: &str| self.rows.iter().position(|row| row.commit.change_id == id);
        let (Some(a), Some(b)) = (position(start), position(end)) else {
            debug!(start, end, "range endpoints not loaded");
            return false;
        };
        let (lo, hi) = (a.min(b), a.max(b));
        self.checked
            .toggle_all(self.rows[lo..=hi].iter().map(|row| &row.commit));
        true
    }

    pub(crate) fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &TuiTheme,
        operation: Option<&Operation>,
        follow_cursor: bool,
        interactions: &mut InteractionMap<UiTarget>,
    ) {
        if self.rows.is_empty() {
            let text = if self.is_loading() {
                "Loading…"
            } else {
                "No revisions"
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, theme.style(StyleKey::Empty)))),
                area,
            );
            self.viewport.reset();
            return;
        }

        let overlays: Vec<RowOverlay> = self
            .rows
            .iter()
            .map(|row| overlay_for(&row.commit, operation, &self.checked))
            .collect();
        let heights: Vec<usize> = self
            .rows
            .iter()
            .zip(&overlays)
            .map(|(row, overlay)| row_height(row, overlay))
            .collect();
        let cursor = follow_cursor.then_some(self.cursor);
        self.viewport
            .layout(area, self.rows.len(), |idx| heights[idx], cursor);

        let highlight = theme.style(StyleKey::Selected);
        for span in self.viewport.spans() {
            let row = &self.rows[span.index];
            let patch = (span.index == self.cursor).then_some(highlight);
            let lines: Vec<Line<'static>> = row_lines(row, &overlays[span.index], patch, theme)
                .into_iter()
                .skip(span.clip_top)
                .take(usize::from(span.rect.height))
                .collect();
            frame.render_widget(Paragraph::new(lines), span.rect);
        }

        self.viewport.register_clicks(interactions, UiTarget::RevisionRow);
        self.viewport.register_drags(interactions, UiTarget::RevisionRow);
        self.viewport.register_scroll(interactions, UiTarget::RevisionsScroll);
    }
}

fn overlay_for(
    commit: &Commit,
    operation: Option<&Operation>,
    checked: &CheckedRevisions,
) -> RowOverlay {
    let mut overlay = RowOverlay::default();
    if checked.contains(commit) {
        overlay
            .before_change_id
            .push(Decoration::new(CHECKED_MARKER, StyleKey::Checked));
    }
    if let Some(operation) = operation {
        overlay
            .before_change_id
            .extend(operation.render(commit, RenderPosition::BeforeChangeId));
        overlay.after_row = operation.render(commit, RenderPosition::AfterRow);
    }
    overlay
}
