// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Footer and help overlay helpers used by TUI rendering.
const REVISIONS_HINTS: &[KeyHint] = &[
    KeyHint::new("j/k", "move"),
    KeyHint::new("space", "toggle"),
    KeyHint::new("v", "batch"),
    KeyHint::new("b", "bookmarks"),
    KeyHint::new("r", "refresh"),
    KeyHint::new("?", "help"),
    KeyHint::new("q", "quit"),
];

fn footer_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let theme = &app.theme;
    let mut spans = Vec::<Span<'static>>::new();

    if let Some(operation) = &app.operation {
        spans.push(Span::styled(operation.name(), theme.style(StyleKey::Markers)));
        if let Some(status) = operation.status() {
            spans.push(Span::styled(" | ", theme.style(StyleKey::Dimmed)));
            spans.push(Span::styled(status, theme.style(StyleKey::Text)));
        }
        push_hints(&mut spans, &operation.short_help(), theme);
    } else if app.focus == Focus::Bookmarks && app.bookmarks.is_focused() {
        push_hints(&mut spans, &app.bookmarks.short_help(), theme);
    } else {
        let checked = app.revisions.checked().len();
        if checked > 0 {
            spans.push(Span::styled(
                format!("{checked} checked"),
                theme.style(StyleKey::Checked),
            ));
        }
        push_hints(&mut spans, REVISIONS_HINTS, theme);
    }

    if !toast_suffix.is_empty() {
        spans.push(Span::styled(toast_suffix.to_owned(), theme.style(StyleKey::Error)));
    }
    Line::from(spans)
}

fn push_hints(spans: &mut Vec<Span<'static>>, hints: &[KeyHint], theme: &TuiTheme) {
    for hint in hints {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", theme.style(StyleKey::Dimmed)));
        }
        spans.push(Span::styled(hint.key, theme.style(StyleKey::HelpKey)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(hint.help, theme.style(StyleKey::HelpText)));
    }
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>key_width$}"), theme.style(StyleKey::HelpKey)),
        Span::raw("  "),
        Span::styled(desc.to_owned(), theme.style(StyleKey::HelpText)),
    ])
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Help (toggle)"),
            ("q, Ctrl-C", "Quit"),
            ("r", "Reload the log"),
            ("b", "Toggle bookmark panel"),
            ("Tab", "Switch panel focus"),
        ],
    ),
    (
        "Revisions",
        &[
            ("j/k, ↑/↓", "Move cursor"),
            ("PgUp/PgDn", "Move one page"),
            ("g/G, Home/End", "First/last revision"),
            ("space", "Toggle checked"),
            ("v", "Batch toggle a range"),
            ("Esc", "Clear checked"),
        ],
    ),
    (
        "Bookmarks",
        &[
            ("Enter", "Show trunk()::bookmark"),
            ("m", "Move bookmark"),
            ("c", "Create bookmark"),
            ("n", "New change on bookmark"),
            ("d/f", "Delete/forget"),
            ("t/u", "Track/untrack"),
            ("Esc", "Hide panel"),
        ],
    ),
];

fn render_help(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let theme = &app.theme;
    let key_width = HELP_SECTIONS
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (idx, (title, entries)) in HELP_SECTIONS.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("--- {title} ---"),
            theme.style(StyleKey::Title),
        )));
        for (key, desc) in entries.iter() {
            lines.push(help_kv(key, desc, key_width, theme));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style(true))
        .title(" Help ");
    let paragraph = Paragraph::new(lines)
        .style(theme.base_style())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
