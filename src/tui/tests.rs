// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};

use super::testing::HeadlessTui;
use crate::config::Config;
use crate::jj::runner::testing::FakeRunner;
use crate::jj::JjCommand;
use crate::parser::testing::LogBuilder;

fn log(count: usize) -> String {
    let mut log = LogBuilder::default();
    for idx in 0..count {
        let glyph = if idx == 1 { "@" } else { "○" };
        log.write(&format!("{glyph}  id=r{idx}x author=x id=c{idx}f"));
        log.write("│  description");
    }
    log.into_string()
}

fn is_simple_list(command: &JjCommand) -> bool {
    matches!(command, JjCommand::BookmarkListSimple)
}

fn is_movable_list(command: &JjCommand) -> bool {
    matches!(command, JjCommand::BookmarkListMovable { .. })
}

fn is_delete(command: &JjCommand) -> bool {
    matches!(command, JjCommand::BookmarkDelete { .. })
}

const BOOKMARKS: &str = "main abc123\nfeature def456\n";

fn with_bookmarks(rows: usize) -> HeadlessTui {
    HeadlessTui::new(FakeRunner::with_log(log(rows)).reply(is_simple_list, BOOKMARKS))
}

fn log_calls(tui: &HeadlessTui) -> usize {
    tui.calls()
        .iter()
        .filter(|command| matches!(command, JjCommand::Log { .. }))
        .count()
}

fn find(screen: &[String], needle: &str) -> Option<(u16, u16)> {
    screen.iter().enumerate().find_map(|(y, line)| {
        line.find(needle).map(|byte| {
            let x = line[..byte].chars().count();
            (x as u16, y as u16)
        })
    })
}

#[test]
fn startup_streams_the_log_and_renders_rows() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(3)));
    assert_eq!(tui.row_count(), 3);
    assert_eq!(tui.selected_change_id().as_deref(), Some("r0x"));
    assert_eq!(
        tui.calls(),
        [JjCommand::Log {
            revset: None,
            limit: None,
        }]
    );

    let screen = tui.render();
    assert!(screen[0].contains("r0x"));
    assert!(screen[1].contains("description"));
    assert!(screen[2].contains("r1x"));
    assert!(screen[11].contains("j/k move"));
}

#[test]
fn empty_log_shows_a_placeholder() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(""));
    assert_eq!(tui.row_count(), 0);
    let screen = tui.render();
    assert!(screen[0].contains("No revisions"));
}

#[test]
fn keys_move_the_cursor_within_bounds() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(4)));
    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Down);
    assert_eq!(tui.cursor(), 2);
    tui.press(KeyCode::Char('k'));
    assert_eq!(tui.cursor(), 1);
    tui.press(KeyCode::Char('G'));
    assert_eq!(tui.selected_change_id().as_deref(), Some("r3x"));
    tui.press(KeyCode::Char('j'));
    assert_eq!(tui.cursor(), 3);
    tui.press(KeyCode::Char('g'));
    assert_eq!(tui.cursor(), 0);
    tui.press(KeyCode::Up);
    assert_eq!(tui.cursor(), 0);
}

#[test]
fn long_logs_load_as_the_cursor_approaches_the_end() {
    let config = Config {
        batch_size: 4,
        ..Config::default()
    };
    let mut tui = HeadlessTui::with_config(config, FakeRunner::with_log(log(30)));
    let initial = tui.row_count();
    assert!(initial > 0 && initial < 30);

    for _ in 0..20 {
        tui.press(KeyCode::Char('G'));
    }
    assert_eq!(tui.row_count(), 30);
    assert_eq!(tui.selected_change_id().as_deref(), Some("r29x"));
}

#[test]
fn space_toggles_and_escape_clears_checked() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(3)));
    tui.press(KeyCode::Char(' '));
    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Char(' '));
    assert_eq!(tui.checked_count(), 2);

    let screen = tui.render();
    assert!(screen[0].contains("✓"));
    assert!(screen[11].contains("2 checked"));

    tui.press(KeyCode::Esc);
    assert_eq!(tui.checked_count(), 0);
}

#[test]
fn batch_mode_toggles_the_range_and_reloads() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(5)));
    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Char('v'));
    assert_eq!(tui.operation().map(|op| op.name()).as_deref(), Some("batch"));

    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Char('j'));
    let screen = tui.render();
    assert!(find(&screen, "<< start >>").is_some());
    assert!(find(&screen, "<< end >>").is_some());
    assert!(screen[11].contains("Batch select from: r1x to: r3x"));

    tui.press(KeyCode::Enter);
    assert!(tui.operation().is_none());
    assert_eq!(tui.checked_count(), 3);
    assert_eq!(log_calls(&tui), 2);
    assert_eq!(tui.selected_change_id().as_deref(), Some("r3x"));
}

#[test]
fn batch_mode_can_be_cancelled() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(3)));
    tui.press(KeyCode::Char('v'));
    tui.press(KeyCode::Char(' '));
    assert_eq!(tui.checked_count(), 1);
    tui.press(KeyCode::Esc);
    assert!(tui.operation().is_none());
    assert_eq!(tui.checked_count(), 1);
}

#[test]
fn bookmark_panel_opens_focused_and_tab_switches_focus() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    assert!(tui.bookmarks_focused());
    assert_eq!(tui.bookmark_title(), "Bookmarks (2)");

    let screen = tui.render();
    assert!(find(&screen, "Bookmarks (2)").is_some());
    assert!(find(&screen, "main").is_some());
    assert!(screen[11].contains("enter view revset"));

    tui.press(KeyCode::Tab);
    assert!(!tui.bookmarks_focused());
    tui.press(KeyCode::Char('j'));
    assert_eq!(tui.cursor(), 1);

    tui.press(KeyCode::Tab);
    tui.press(KeyCode::Esc);
    assert!(!tui.bookmarks_focused());
    let screen = tui.render();
    assert!(find(&screen, "Bookmarks").is_none());
}

#[test]
fn enter_on_a_bookmark_reloads_with_its_revset() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Enter);
    assert_eq!(tui.revset(), Some("trunk()::main"));
    assert!(!tui.bookmarks_focused());
    assert_eq!(
        tui.calls().last(),
        Some(&JjCommand::Log {
            revset: Some("trunk()::main".to_string()),
            limit: None,
        })
    );
}

#[test]
fn move_mode_follows_the_cursor_and_moves_on_enter() {
    let mut tui = with_bookmarks(4);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('m'));
    assert_eq!(
        tui.operation().map(|op| op.name()).as_deref(),
        Some("move bookmark 'main'")
    );
    assert!(!tui.bookmarks_focused());
    assert_eq!(tui.bookmark_title(), "Move bookmark to: r0x");

    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Char('j'));
    assert_eq!(tui.bookmark_title(), "Move bookmark to: r2x");
    let screen = tui.render();
    assert!(find(&screen, "<< onto >>").is_some());

    tui.press(KeyCode::Enter);
    assert!(tui.operation().is_none());
    assert!(tui.bookmarks_focused());
    assert_eq!(tui.bookmark_title(), "Bookmarks (2)");
    assert!(tui.calls().contains(&JjCommand::BookmarkMove {
        name: "main".to_string(),
        revision: "r2x".to_string(),
    }));
    assert_eq!(log_calls(&tui), 2);
}

#[test]
fn move_mode_escape_runs_nothing() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('m'));
    tui.press(KeyCode::Esc);
    assert!(tui.operation().is_none());
    assert!(tui.bookmarks_focused());
    assert!(!tui
        .calls()
        .iter()
        .any(|command| matches!(command, JjCommand::BookmarkMove { .. })));
}

#[test]
fn create_flow_selects_a_revision_then_takes_a_name() {
    let runner = FakeRunner::with_log(log(3))
        .reply(is_simple_list, BOOKMARKS)
        .reply(is_movable_list, "feature;.;false;false;false;abc\n");
    let mut tui = HeadlessTui::new(runner);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('c'));
    assert_eq!(tui.bookmark_title(), "Create bookmark: select revision");
    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Enter);
    assert_eq!(
        tui.operation().map(|op| op.name()).as_deref(),
        Some("create bookmark (enter name)")
    );
    assert!(tui.calls().contains(&JjCommand::BookmarkListMovable {
        revision: "r1x".to_string(),
    }));

    // Keys are text while the name is edited.
    tui.type_text("my fix q");
    assert!(!tui.should_quit());
    assert_eq!(tui.cursor(), 1);
    let screen = tui.render();
    assert!(find(&screen, "my-fix-q").is_some());

    tui.press(KeyCode::Backspace);
    tui.press(KeyCode::Backspace);
    tui.press(KeyCode::Enter);
    assert!(tui.operation().is_none());
    assert!(tui.calls().contains(&JjCommand::BookmarkCreate {
        name: "my-fix".to_string(),
        revision: "r1x".to_string(),
    }));
    assert_eq!(tui.bookmark_title(), "Bookmarks (2)");
}

#[test]
fn create_flow_escape_steps_back_then_exits() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('c'));
    tui.press(KeyCode::Enter);
    tui.type_text("wip");
    tui.press(KeyCode::Esc);
    assert_eq!(
        tui.operation().map(|op| op.name()).as_deref(),
        Some("create bookmark")
    );
    tui.press(KeyCode::Esc);
    assert!(tui.operation().is_none());
    assert!(!tui
        .calls()
        .iter()
        .any(|command| matches!(command, JjCommand::BookmarkCreate { .. })));
}

#[test]
fn failed_commands_toast_and_skip_follow_ups() {
    let runner = FakeRunner::with_log(log(3))
        .reply(is_simple_list, BOOKMARKS)
        .fail(is_delete, "Error: bookmark is protected\nHint: none");
    let mut tui = HeadlessTui::new(runner);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('d'));
    let toast = tui.toast().unwrap_or_default().to_string();
    assert!(toast.contains("bookmark is protected"), "{toast}");
    assert!(!toast.contains("Hint"));
    assert_eq!(log_calls(&tui), 1);
}

#[test]
fn successful_bookmark_actions_reload_both_views() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('j'));
    tui.press(KeyCode::Char('f'));
    assert!(tui.calls().contains(&JjCommand::BookmarkForget {
        name: "feature".to_string(),
    }));
    assert_eq!(log_calls(&tui), 2);
    let lists = tui
        .calls()
        .iter()
        .filter(|command| is_simple_list(command))
        .count();
    assert_eq!(lists, 2);
}

#[test]
fn new_on_bookmark_selects_the_working_copy() {
    let mut tui = with_bookmarks(4);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('n'));
    assert!(tui.calls().contains(&JjCommand::New {
        revisions: vec!["main".to_string()],
    }));
    assert_eq!(tui.selected_change_id().as_deref(), Some("r1x"));
}

#[test]
fn help_overlay_swallows_keys_until_closed() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(3)));
    tui.press(KeyCode::Char('?'));
    assert!(tui.show_help());
    let screen = tui.render();
    assert!(find(&screen, "Help").is_some());

    tui.press(KeyCode::Char('j'));
    assert_eq!(tui.cursor(), 0);
    tui.press(KeyCode::Char('q'));
    assert!(!tui.show_help());
    assert!(!tui.should_quit());

    tui.press(KeyCode::Char('q'));
    assert!(tui.should_quit());
}

#[test]
fn ctrl_c_quits_even_while_editing() {
    let mut tui = with_bookmarks(2);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Char('c'));
    tui.press(KeyCode::Enter);
    tui.press_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(tui.should_quit());
}

#[test]
fn clicking_a_row_selects_it() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(4)));
    tui.render();
    tui.click(3, 5);
    assert_eq!(tui.cursor(), 2);

    tui.mouse(MouseEventKind::Down(crossterm::event::MouseButton::Left), 3, 0);
    tui.render();
    tui.mouse(MouseEventKind::Drag(crossterm::event::MouseButton::Left), 3, 6);
    assert_eq!(tui.cursor(), 3);
}

#[test]
fn wheel_scrolls_without_moving_the_cursor() {
    let mut tui = HeadlessTui::new(FakeRunner::with_log(log(10)));
    tui.render();
    tui.mouse(MouseEventKind::ScrollDown, 1, 1);
    let screen = tui.render();
    assert_eq!(tui.cursor(), 0);
    assert!(find(&screen, "r0x").is_none());
    assert!(find(&screen, "r2x").is_some());

    tui.press(KeyCode::Char('j'));
    let screen = tui.render();
    assert!(find(&screen, "r1x").is_some());
}

#[test]
fn clicking_a_bookmark_focuses_the_panel() {
    let mut tui = with_bookmarks(3);
    tui.press(KeyCode::Char('b'));
    tui.press(KeyCode::Tab);
    assert!(!tui.bookmarks_focused());

    let screen = tui.render();
    let (x, y) = find(&screen, "feature").expect("feature listed");
    tui.click(x, y);
    assert!(tui.bookmarks_focused());
    tui.press(KeyCode::Char('m'));
    assert_eq!(
        tui.operation().map(|op| op.name()).as_deref(),
        Some("move bookmark 'feature'")
    );
}
