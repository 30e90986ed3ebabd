// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::{Decoration, StyleResolver};
use crate::parser::{GraphRowLine, LineFlags, Row};

/// Extra content drawn into a row by the active operation and the checked-set marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowOverlay {
    pub before_change_id: Vec<Decoration>,
    pub after_row: Vec<Decoration>,
}

impl RowOverlay {
    pub fn is_empty(&self) -> bool {
        self.before_change_id.is_empty() && self.after_row.is_empty()
    }
}

/// Lines a row occupies once its overlay is applied.
pub fn row_height(row: &Row, overlay: &RowOverlay) -> usize {
    row.height() + usize::from(!overlay.after_row.is_empty())
}

/// Builds the styled lines for one row.
///
/// `highlight` is patched over every highlightable line when the row is selected. An after-row
/// overlay gets its own line that continues the graph gutter.
pub fn row_lines(
    row: &Row,
    overlay: &RowOverlay,
    highlight: Option<Style>,
    styles: &impl StyleResolver,
) -> Vec<Line<'static>> {
    let change_id_idx = row.change_id_idx();
    let mut lines = Vec::with_capacity(row_height(row, overlay));

    for (line_idx, line) in row.lines.iter().enumerate() {
        let patch = highlight.filter(|_| line.flags.contains(LineFlags::HIGHLIGHTABLE));
        let mut spans = Vec::with_capacity(line.segments.len() + overlay.before_change_id.len());
        for (segment_idx, segment) in line.segments.iter().enumerate() {
            if line_idx == 0 && Some(segment_idx) == change_id_idx {
                spans.extend(decoration_spans(&overlay.before_change_id, patch, styles));
            }
            spans.push(Span::styled(
                segment.text.clone(),
                patched(segment.style, patch),
            ));
        }
        lines.push(Line::from(spans));
    }

    if !overlay.after_row.is_empty() {
        let gutter: GraphRowLine = row.extend();
        let mut spans: Vec<Span<'static>> = gutter
            .segments
            .iter()
            .map(|segment| Span::styled(segment.text.clone(), segment.style))
            .collect();
        spans.extend(decoration_spans(&overlay.after_row, None, styles));
        lines.push(Line::from(spans));
    }

    lines
}

fn decoration_spans<'a>(
    decorations: &'a [Decoration],
    patch: Option<Style>,
    styles: &'a impl StyleResolver,
) -> impl Iterator<Item = Span<'static>> + 'a {
    decorations.iter().map(move |decoration| {
        Span::styled(
            decoration.text.clone(),
            patched(styles.style(decoration.style), patch),
        )
    })
}

fn patched(style: Style, patch: Option<Style>) -> Style {
    match patch {
        Some(patch) => style.patch(patch),
        None => style,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Style};
    use ratatui::text::Line;

    use super::{row_height, row_lines, RowOverlay};
    use crate::parser::testing::LogBuilder;
    use crate::parser::{parse_rows, Row};
    use crate::render::{Decoration, StyleKey};

    fn sample_row() -> Row {
        let mut log = LogBuilder::default();
        log.write("○  id=kxyz author=x id=c0ff");
        log.write("│  message");
        log.write("~");
        parse_rows(log.as_bytes()).expect("parse").remove(0)
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn styles(key: StyleKey) -> Style {
        match key {
            StyleKey::Markers => Style::default().fg(Color::LightBlue),
            _ => Style::default(),
        }
    }

    #[test]
    fn before_change_id_decorations_sit_in_front_of_the_id() {
        let row = sample_row();
        let overlay = RowOverlay {
            before_change_id: vec![Decoration::marker("<< on >>"), Decoration::text(" ")],
            after_row: Vec::new(),
        };
        let lines = row_lines(&row, &overlay, None, &styles);
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0]), "○  << on >> kxyz x c0ff");
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::LightBlue));
    }

    #[test]
    fn after_row_overlay_adds_a_gutter_line() {
        let row = sample_row();
        let overlay = RowOverlay {
            before_change_id: Vec::new(),
            after_row: vec![Decoration::marker("<< onto >>"), Decoration::text(" move")],
        };
        assert_eq!(row_height(&row, &overlay), 4);
        let lines = row_lines(&row, &overlay, None, &styles);
        assert_eq!(lines.len(), 4);
        assert_eq!(plain(&lines[3]), "   << onto >> move");
    }

    #[test]
    fn highlight_skips_elided_lines() {
        let row = sample_row();
        let highlight = Style::default().bg(Color::DarkGray);
        let lines = row_lines(&row, &RowOverlay::default(), Some(highlight), &styles);
        assert!(lines[0].spans.iter().all(|span| span.style.bg == Some(Color::DarkGray)));
        assert!(lines[1].spans.iter().all(|span| span.style.bg == Some(Color::DarkGray)));
        assert!(lines[2].spans.iter().all(|span| span.style.bg.is_none()));
    }
}
