// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The app shell owns every piece of state and is the only place effects are interpreted. Key
//! presses go, in order, to the help overlay, an operation that is editing text, the focused
//! bookmark panel, a focused operation, the global keys and finally the revisions view.

use std::{
    error::Error,
    io,
    rc::Rc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::jj::{CommandRunner, ProcessRunner};
use crate::ops::{
    BatchOperation, CreateBookmarkOperation, KeyHint, KeyOutcome, MoveBookmarkOperation,
    OpContext, Operation, Owner,
};
use crate::render::{InteractionKind, InteractionMap, StyleKey, StyleResolver};
use crate::ui::{Effect, Msg};

mod bookmarks;
mod revisions;
pub(crate) mod theme;

use bookmarks::{BookmarkPanel, PanelMode};
use revisions::RevisionsView;
use theme::TuiTheme;

const POLL_IDLE: Duration = Duration::from_millis(250);
const POLL_LOADING: Duration = Duration::from_millis(30);
const TOAST_TTL: Duration = Duration::from_secs(2);
const WHEEL_LINES: isize = 3;

/// Runs the interactive terminal UI against the repository named in `config`.
pub fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let process = ProcessRunner::new(config.jj_program.clone(), config.repo_dir.clone());
    let repo = process.repo_dir().display().to_string();
    let runner: Rc<dyn CommandRunner> = Rc::new(process);
    let mut app = App::new(config, runner, theme);
    let mut terminal = TerminalSession::new()?;
    app.start();
    info!(%repo, "ui started");

    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(app.poll_interval())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    info!("ui stopped");
    Ok(())
}

/// Hit-test targets registered while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiTarget {
    RevisionRow(usize),
    RevisionsScroll,
    BookmarkRow(usize),
    BookmarksScroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Revisions,
    Bookmarks,
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    config: Config,
    runner: Rc<dyn CommandRunner>,
    theme: TuiTheme,
    revisions: RevisionsView,
    bookmarks: BookmarkPanel,
    operation: Option<Operation>,
    focus: Focus,
    interactions: InteractionMap<UiTarget>,
    follow_cursor: bool,
    dragging: bool,
    show_help: bool,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(config: Config, runner: Rc<dyn CommandRunner>, theme: TuiTheme) -> Self {
        let revisions = RevisionsView::new(config.batch_size);
        Self {
            config,
            runner,
            theme,
            revisions,
            bookmarks: BookmarkPanel::new(),
            operation: None,
            focus: Focus::Revisions,
            interactions: InteractionMap::new(),
            follow_cursor: true,
            dragging: false,
            show_help: false,
            toast: None,
            should_quit: false,
        }
    }

    fn start(&mut self) {
        self.reload_revisions(None);
    }

    fn poll_interval(&self) -> Duration {
        if self.revisions.is_loading() {
            POLL_LOADING
        } else {
            POLL_IDLE
        }
    }

    /// Picks up streamed rows.
    fn tick(&mut self) {
        if self.revisions.pump(false) {
            self.rows_changed();
        }
    }

    fn rows_changed(&mut self) {
        self.notify_selection();
        self.revisions.maybe_request_more();
    }

    fn notify_selection(&mut self) {
        let selected = self.revisions.selected().cloned();
        if let Some(operation) = self.operation.as_mut() {
            operation.set_selected_revision(selected.as_ref());
        }
        if self.bookmarks.mode() != PanelMode::Browse {
            self.bookmarks.set_target(selected.as_ref());
        }
    }

    fn cursor_moved(&mut self) {
        self.follow_cursor = true;
        self.notify_selection();
        self.revisions.maybe_request_more();
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn toast_suffix(&mut self) -> String {
        match &self.toast {
            Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
            Some(_) => {
                self.toast = None;
                String::new()
            }
            None => String::new(),
        }
    }

    fn reload_revisions(&mut self, select: Option<String>) {
        let command = self.config.log_command();
        let result = self
            .runner
            .stream(&command)
            .map_err(|err| err.to_string())
            .and_then(|reader| {
                self.revisions
                    .start_load(reader, select)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            warn!(%err, "loading revisions failed");
            self.set_toast(err);
        }
    }

    fn load_bookmarks(&mut self) {
        if let Err(err) = self.bookmarks.load(self.runner.as_ref()) {
            warn!(%err, "loading bookmarks failed");
            self.set_toast(err.to_string());
        }
    }

    fn update(&mut self, msg: Msg) {
        debug!(?msg, "update");
        match msg {
            Msg::Refresh => self.reload_revisions(None),
            Msg::RefreshAndSelect(revision) => self.reload_revisions(Some(revision)),
            Msg::ReloadBookmarks => self.load_bookmarks(),
            Msg::ToggleRange { start, end } => {
                self.revisions.toggle_range(&start, &end);
            }
            Msg::StartMoveMode { bookmark } => {
                let selected = self.revisions.selected().cloned();
                self.bookmarks
                    .start_mode(PanelMode::Moving, selected.as_ref());
                self.start_operation(Operation::MoveBookmark(MoveBookmarkOperation::new(
                    bookmark,
                )));
            }
            Msg::StartCreateMode => {
                let selected = self.revisions.selected().cloned();
                self.bookmarks
                    .start_mode(PanelMode::Creating, selected.as_ref());
                self.start_operation(Operation::CreateBookmark(CreateBookmarkOperation::new()));
            }
            Msg::EndMoveMode | Msg::EndCreateMode => self.bookmarks.end_mode(),
            Msg::CloseOperation => self.close_operation(),
            Msg::UpdateRevset(revset) => {
                self.config.revset = Some(revset);
                self.focus = Focus::Revisions;
                self.bookmarks.set_focused(false);
                self.reload_revisions(None);
            }
            Msg::Toast(message) => self.set_toast(message),
        }
    }

    fn start_operation(&mut self, mut operation: Operation) {
        debug!(operation = %operation.name(), "operation started");
        operation.set_selected_revision(self.revisions.selected());
        self.operation = Some(operation);
        self.focus = Focus::Revisions;
        self.bookmarks.set_focused(false);
    }

    fn close_operation(&mut self) {
        let Some(operation) = self.operation.take() else {
            return;
        };
        debug!(operation = %operation.name(), "operation closed");
        match operation.owner() {
            Owner::Revisions => {
                self.focus = Focus::Revisions;
                self.reload_revisions(None);
            }
            Owner::Bookmarks => {
                self.bookmarks.end_mode();
                if self.bookmarks.is_visible() {
                    self.focus = Focus::Bookmarks;
                    self.bookmarks.set_focused(true);
                }
                self.load_bookmarks();
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Emit(msg) => self.update(msg),
            Effect::Run { command, then } => match self.runner.run(&command) {
                Ok(_) => {
                    for msg in then {
                        self.update(msg);
                    }
                }
                Err(err) => {
                    warn!(%err, "command failed");
                    self.set_toast(err.to_string());
                }
            },
            Effect::Sequence(effects) | Effect::Batch(effects) => {
                for effect in effects {
                    self.apply_effect(effect);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.operation.as_ref().is_some_and(Operation::is_editing) {
            self.dispatch_to_operation(key);
            return;
        }

        if self.focus == Focus::Bookmarks && self.bookmarks.is_focused() {
            let outcome = self
                .bookmarks
                .handle_key(key, &self.config.default_remote);
            let handled = !matches!(outcome, KeyOutcome::Pass);
            if let KeyOutcome::Effect(effect) = outcome {
                self.apply_effect(effect);
            }
            if !self.bookmarks.is_visible() {
                self.focus = Focus::Revisions;
            }
            if handled {
                return;
            }
        }

        if self.operation.as_ref().is_some_and(Operation::is_focused)
            && self.dispatch_to_operation(key)
        {
            return;
        }

        if self.handle_global_key(key) {
            return;
        }
        self.handle_revisions_key(key);
    }

    /// Returns false when the operation passed on the key.
    fn dispatch_to_operation(&mut self, key: KeyEvent) -> bool {
        let Some(operation) = self.operation.as_mut() else {
            return false;
        };
        let mut ctx = OpContext {
            runner: self.runner.as_ref(),
            checked: self.revisions.checked_mut(),
        };
        match operation.handle_key(key, &mut ctx) {
            KeyOutcome::Pass => false,
            KeyOutcome::Consumed => true,
            KeyOutcome::Effect(effect) => {
                self.apply_effect(effect);
                true
            }
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.update(Msg::Refresh),
            KeyCode::Char('b') if self.operation.is_none() => {
                self.bookmarks.toggle_visible();
                if self.bookmarks.is_visible() {
                    self.focus = Focus::Bookmarks;
                    self.load_bookmarks();
                } else {
                    self.focus = Focus::Revisions;
                }
            }
            KeyCode::Tab if self.operation.is_none() && self.bookmarks.is_visible() => {
                self.focus = match self.focus {
                    Focus::Revisions => Focus::Bookmarks,
                    Focus::Bookmarks => Focus::Revisions,
                };
                self.bookmarks.set_focused(self.focus == Focus::Bookmarks);
            }
            KeyCode::Esc if self.operation.is_none() && !self.revisions.checked().is_empty() => {
                self.revisions.checked_mut().clear();
            }
            _ => return false,
        }
        true
    }

    fn handle_revisions_key(&mut self, key: KeyEvent) {
        let page = isize::try_from(self.revisions.page_len()).unwrap_or(isize::MAX);
        let moved = match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.revisions.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.revisions.move_cursor(-1),
            KeyCode::PageDown => self.revisions.move_cursor(page),
            KeyCode::PageUp => self.revisions.move_cursor(-page),
            KeyCode::Home | KeyCode::Char('g') => self.revisions.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.revisions.select_last(),
            KeyCode::Char(' ') => {
                self.revisions.toggle_selected();
                false
            }
            KeyCode::Char('v') if self.operation.is_none() => {
                if let Some(start) = self.revisions.selected().cloned() {
                    self.start_operation(Operation::Batch(BatchOperation::new(start)));
                }
                false
            }
            _ => false,
        };
        if moved {
            self.cursor_moved();
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.interactions.hit(x, y, InteractionKind::Click).copied() {
                    Some(UiTarget::RevisionRow(index)) => {
                        if self.operation.as_ref().is_some_and(Operation::is_editing) {
                            return;
                        }
                        self.dragging = true;
                        self.focus = Focus::Revisions;
                        self.bookmarks.set_focused(false);
                        if self.revisions.select(index) {
                            self.cursor_moved();
                        }
                    }
                    Some(UiTarget::BookmarkRow(index))
                        if self.bookmarks.mode() == PanelMode::Browse =>
                    {
                        self.focus = Focus::Bookmarks;
                        self.bookmarks.set_focused(true);
                        self.bookmarks.select(index);
                    }
                    _ => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                if let Some(UiTarget::RevisionRow(index)) =
                    self.interactions.hit(x, y, InteractionKind::Drag).copied()
                {
                    if self.revisions.select(index) {
                        self.cursor_moved();
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = false,
            MouseEventKind::ScrollDown => self.scroll(x, y, WHEEL_LINES),
            MouseEventKind::ScrollUp => self.scroll(x, y, -WHEEL_LINES),
            _ => {}
        }
    }

    fn scroll(&mut self, x: u16, y: u16, delta: isize) {
        match self.interactions.hit(x, y, InteractionKind::Scroll).copied() {
            Some(UiTarget::RevisionsScroll) => {
                self.follow_cursor = false;
                self.revisions.scroll_by(delta);
                self.revisions.maybe_request_more();
            }
            Some(UiTarget::BookmarksScroll) => self.bookmarks.move_cursor(delta.signum()),
            _ => {}
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    app.interactions.clear();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let (revisions_area, bookmarks_area) = if app.bookmarks.is_visible() {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_area);
        (panes[0], Some(panes[1]))
    } else {
        (main_area, None)
    };

    app.revisions.render(
        frame,
        revisions_area,
        &app.theme,
        app.operation.as_ref(),
        app.follow_cursor,
        &mut app.interactions,
    );
    if let Some(bookmarks_area) = bookmarks_area {
        app.bookmarks
            .render(frame, bookmarks_area, &app.theme, &mut app.interactions);
    }

    let toast_suffix = app.toast_suffix();
    frame.render_widget(Paragraph::new(footer_line(app, &toast_suffix)), status_area);

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

// Footer and help overlay.
include!("chrome.rs");

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::{backend::TestBackend, Terminal};

    use super::{draw, App, Focus};
    use crate::config::Config;
    use crate::jj::runner::testing::FakeRunner;
    use crate::jj::{CommandRunner, JjCommand};
    use crate::ops::Operation;
    use crate::tui::theme::TuiTheme;

    /// Drives the app without a terminal. Every input is followed by waiting for the log stream
    /// to answer outstanding requests.
    pub(crate) struct HeadlessTui {
        app: App,
        runner: Rc<FakeRunner>,
        terminal: Terminal<TestBackend>,
    }

    impl HeadlessTui {
        pub(crate) fn new(runner: FakeRunner) -> Self {
            Self::with_config(Config::default(), runner)
        }

        pub(crate) fn with_config(config: Config, runner: FakeRunner) -> Self {
            let runner = Rc::new(runner);
            let shared: Rc<dyn CommandRunner> = runner.clone();
            let mut app = App::new(config, shared, TuiTheme::default());
            app.start();
            let terminal = Terminal::new(TestBackend::new(60, 12)).expect("terminal");
            let mut tui = Self {
                app,
                runner,
                terminal,
            };
            tui.settle();
            tui
        }

        pub(crate) fn settle(&mut self) {
            while self.app.revisions.pump(true) {
                self.app.rows_changed();
            }
        }

        pub(crate) fn press(&mut self, code: KeyCode) {
            self.press_key(KeyEvent::new(code, KeyModifiers::NONE));
        }

        pub(crate) fn press_key(&mut self, key: KeyEvent) {
            self.app.handle_key(key);
            self.settle();
        }

        pub(crate) fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        pub(crate) fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
            self.app.handle_mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            });
            self.settle();
        }

        pub(crate) fn click(&mut self, column: u16, row: u16) {
            self.mouse(MouseEventKind::Down(MouseButton::Left), column, row);
            self.mouse(MouseEventKind::Up(MouseButton::Left), column, row);
        }

        /// Renders a frame and returns it as text, one string per terminal row.
        pub(crate) fn render(&mut self) -> Vec<String> {
            let app = &mut self.app;
            self.terminal
                .draw(|frame| draw(frame, app))
                .expect("draw");
            let buffer = self.terminal.backend().buffer();
            let area = buffer.area;
            (0..area.height)
                .map(|y| {
                    (0..area.width)
                        .map(|x| buffer[(x, y)].symbol())
                        .collect::<String>()
                        .trim_end()
                        .to_string()
                })
                .collect()
        }

        pub(crate) fn calls(&self) -> Vec<JjCommand> {
            self.runner.calls()
        }

        pub(crate) fn row_count(&self) -> usize {
            self.app.revisions.rows().len()
        }

        pub(crate) fn cursor(&self) -> usize {
            self.app.revisions.cursor()
        }

        pub(crate) fn selected_change_id(&self) -> Option<String> {
            self.app
                .revisions
                .selected()
                .map(|commit| commit.change_id.to_string())
        }

        pub(crate) fn checked_count(&self) -> usize {
            self.app.revisions.checked().len()
        }

        pub(crate) fn operation(&self) -> Option<&Operation> {
            self.app.operation.as_ref()
        }

        pub(crate) fn bookmarks_focused(&self) -> bool {
            self.app.focus == Focus::Bookmarks && self.app.bookmarks.is_focused()
        }

        pub(crate) fn bookmark_title(&self) -> String {
            self.app.bookmarks.title()
        }

        pub(crate) fn toast(&self) -> Option<&str> {
            self.app.toast.as_ref().map(|toast| toast.message.as_str())
        }

        pub(crate) fn revset(&self) -> Option<&str> {
            self.app.config.revset.as_deref()
        }

        pub(crate) fn should_quit(&self) -> bool {
            self.app.should_quit
        }

        pub(crate) fn show_help(&self) -> bool {
            self.app.show_help
        }
    }
}

#[cfg(test)]
mod tests;
