// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::{BitOr, BitOrAssign};

use ratatui::style::Style;
use serde::Serialize;
use smol_str::SmolStr;
use tracing::{trace, warn};

use crate::jj::Commit;
use crate::screen::{line_text, Segment, SegmentLine};

const CONFLICT_SUFFIX: &str = "??";
const CONFLICT_GLYPH: char = '×';
const CONFLICT_LABEL: &str = "conflict";
const WORKING_COPY_GLYPH: char = '@';
const ELIDED_GLYPH: char = '~';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineFlags(u8);

impl LineFlags {
    pub const NONE: Self = Self(0);
    /// The line that carries the change id.
    pub const REVISION: Self = Self(1);
    /// Receives the selection highlight.
    pub const HIGHLIGHTABLE: Self = Self(1 << 1);
    /// A `~` line standing in for hidden revisions.
    pub const ELIDED: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for LineFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LineFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRowLine {
    pub segments: SegmentLine,
    pub flags: LineFlags,
}

impl GraphRowLine {
    pub fn new(segments: SegmentLine) -> Self {
        Self {
            segments,
            flags: LineFlags::NONE,
        }
    }

    pub fn text(&self) -> String {
        line_text(&self.segments)
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    /// Index of the first segment that could be a change id.
    pub fn find_possible_change_id_idx(&self) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| is_identifier_token(&segment.text))
    }

    /// Index of the change-id segment, if this line starts a row.
    ///
    /// An identifier in the final segment never counts: description lines commonly end in a
    /// single styled word that looks like an id.
    pub fn row_start_idx(&self) -> Option<usize> {
        self.find_possible_change_id_idx()
            .filter(|&idx| idx + 1 != self.segments.len())
    }

    /// First identifier at or after `from` whose style is set and differs from `change_style`.
    pub fn find_commit_id(&self, from: usize, change_style: Style) -> Option<SmolStr> {
        self.segments.iter().skip(from).find_map(|segment| {
            let styled = segment.style != Style::default() && segment.style != change_style;
            (styled && is_identifier_token(&segment.text)).then(|| SmolStr::new(&segment.text))
        })
    }

    fn is_elided(&self) -> bool {
        self.text()
            .chars()
            .find(|ch| !ch.is_whitespace() && !is_vertical_connector(*ch))
            == Some(ELIDED_GLYPH)
    }

    fn has_text_after(&self, indent: usize) -> bool {
        self.text()
            .chars()
            .skip(indent)
            .any(|ch| !ch.is_whitespace() && !is_graph_glyph(ch))
    }
}

/// One revision in the log graph plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub commit: Commit,
    /// Display columns before the change id.
    pub indent: usize,
    pub lines: Vec<GraphRowLine>,
    /// Index of the row sealed right before this one.
    pub previous: Option<usize>,
}

impl Row {
    fn from_revision_line(mut line: GraphRowLine, idx: usize, previous: Option<usize>) -> Self {
        let indent = line.segments[..idx].iter().map(Segment::width).sum();
        let change_segment = &line.segments[idx];

        let mut extended = change_segment.text.clone();
        let mut span_end = idx + 1;
        for segment in &line.segments[idx + 1..] {
            if segment.is_blank() || segment.text.contains(char::is_whitespace) {
                break;
            }
            extended.push_str(&segment.text);
            span_end += 1;
        }
        let change_id = if extended.ends_with(CONFLICT_SUFFIX) {
            SmolStr::new(&extended)
        } else {
            SmolStr::new(&change_segment.text)
        };

        let commit_id = line.find_commit_id(span_end, change_segment.style);
        if commit_id.is_none() {
            warn!(change_id = %change_id, "no commit id found on revision line");
        }

        let prefix = &line.segments[..idx];
        let is_working_copy = prefix
            .iter()
            .any(|segment| segment.text.contains(WORKING_COPY_GLYPH));
        let is_conflicted = change_id.ends_with(CONFLICT_SUFFIX)
            || prefix
                .iter()
                .any(|segment| segment.text.contains(CONFLICT_GLYPH))
            || line.segments[span_end..]
                .iter()
                .any(|segment| segment.text.trim() == CONFLICT_LABEL);

        line.flags = LineFlags::REVISION | LineFlags::HIGHLIGHTABLE;
        Self {
            commit: Commit {
                change_id,
                commit_id,
                is_working_copy,
                is_conflicted,
            },
            indent,
            lines: vec![line],
            previous,
        }
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn add_line(&mut self, mut line: GraphRowLine) {
        if line.is_elided() {
            line.flags.insert(LineFlags::ELIDED);
        } else if line.has_text_after(self.indent) {
            line.flags.insert(LineFlags::HIGHLIGHTABLE);
        }
        self.lines.push(line);
    }

    /// Index of the change-id segment on the revision line.
    pub fn change_id_idx(&self) -> Option<usize> {
        self.lines.first().and_then(GraphRowLine::row_start_idx)
    }

    /// Builds a line that continues the graph below this row.
    ///
    /// Only the gutter (the first `indent` columns of the last line) is kept; node glyphs and
    /// vertical connectors become `│`, everything else becomes blank, and segment styles are
    /// preserved so the edge keeps its colour.
    pub fn extend(&self) -> GraphRowLine {
        let mut segments = SegmentLine::new();
        let mut remaining = self.indent;
        if let Some(last) = self.lines.last() {
            for segment in &last.segments {
                if remaining == 0 {
                    break;
                }
                let text: String = segment
                    .text
                    .chars()
                    .take(remaining)
                    .map(continuation_glyph)
                    .collect();
                remaining -= text.chars().count();
                segments.push(Segment::new(text, segment.style));
            }
        }
        if remaining > 0 {
            segments.push(Segment::plain(" ".repeat(remaining)));
        }
        GraphRowLine::new(segments)
    }

    pub fn summary(&self) -> RowSummary {
        RowSummary {
            change_id: self.commit.change_id.clone(),
            commit_id: self.commit.commit_id.clone(),
            is_working_copy: self.commit.is_working_copy,
            is_conflicted: self.commit.is_conflicted,
            indent: self.indent,
            previous: self.previous,
            lines: self.lines.iter().map(GraphRowLine::text).collect(),
        }
    }
}

/// Serializable, style-free view of a [`Row`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSummary {
    pub change_id: SmolStr,
    pub commit_id: Option<SmolStr>,
    pub is_working_copy: bool,
    pub is_conflicted: bool,
    pub indent: usize,
    pub previous: Option<usize>,
    pub lines: Vec<String>,
}

/// Groups lines into rows. Feed lines in order, then call [`RowBuilder::finish`].
#[derive(Debug, Default)]
pub struct RowBuilder {
    open: Option<Row>,
    sealed: usize,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `segments` would start a new row.
    pub fn starts_row(segments: &[Segment]) -> bool {
        segments
            .iter()
            .position(|segment| is_identifier_token(&segment.text))
            .is_some_and(|idx| idx + 1 != segments.len())
    }

    /// Adds a line; returns the row it sealed, if any.
    pub fn push_line(&mut self, segments: SegmentLine) -> Option<Row> {
        let line = GraphRowLine::new(segments);
        let Some(idx) = line.row_start_idx() else {
            match self.open.as_mut() {
                Some(row) => row.add_line(line),
                None => trace!("dropping line before the first revision"),
            }
            return None;
        };

        let sealed = self.open.take();
        let previous = if sealed.is_some() {
            self.sealed += 1;
            Some(self.sealed - 1)
        } else {
            None
        };
        self.open = Some(Row::from_revision_line(line, idx, previous));
        sealed
    }

    /// Seals the open row at end of input.
    pub fn finish(&mut self) -> Option<Row> {
        let row = self.open.take()?;
        self.sealed += 1;
        Some(row)
    }

    /// Rows sealed so far.
    pub fn sealed(&self) -> usize {
        self.sealed
    }
}

fn is_identifier_token(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphanumeric)
}

fn is_vertical_connector(ch: char) -> bool {
    matches!(ch, '│' | '|' | '├' | '┤' | '┼' | '┆' | '┊')
}

fn is_node_glyph(ch: char) -> bool {
    matches!(ch, '@' | '○' | '◆' | '×' | '◉' | '●' | '*')
}

fn is_graph_glyph(ch: char) -> bool {
    is_vertical_connector(ch)
        || is_node_glyph(ch)
        || matches!(
            ch,
            ELIDED_GLYPH | '─' | '╭' | '╮' | '╯' | '╰' | '┬' | '┴' | '/' | '\\'
        )
}

fn continuation_glyph(ch: char) -> char {
    match ch {
        '|' => '|',
        ch if is_vertical_connector(ch) || is_node_glyph(ch) => '│',
        _ => ' ',
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier, Style};

    use super::{LineFlags, Row, RowBuilder};
    use crate::parser::testing::LogBuilder;
    use crate::parser::parse_rows;
    use crate::screen::{decode_lines, Segment, SegmentLine};

    fn rows_of(log: &LogBuilder) -> Vec<Row> {
        parse_rows(log.as_bytes()).expect("parse")
    }

    #[test]
    fn single_row_with_continuation() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=x id=xyrq");
        log.write("│   doc");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.commit.change_id, "abcde");
        assert_eq!(row.commit.commit_id.as_deref(), Some("xyrq"));
        assert_eq!(row.previous, None);
        assert_eq!(row.indent, 4);
        assert_eq!(row.height(), 2);
        assert!(!row.commit.is_working_copy);
    }

    #[test]
    fn consecutive_rows_link_previous() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=x id=xyrq");
        log.write("│   doc");
        log.write("*   id=fghij author=x id=zzzz");
        log.write("│   more");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].commit.change_id, "fghij");
        assert_eq!(rows[1].previous, Some(0));
    }

    #[test]
    fn working_copy_marker_is_detected() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=some@author id=xyrq");
        log.write("│   some documentation");
        log.write("@   id=kdys author=some@author id=12cd");
        log.write("│   some documentation");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 2);
        assert!(!rows[0].commit.is_working_copy);
        assert!(rows[1].commit.is_working_copy);
    }

    #[test]
    fn elided_lines_stay_with_their_row() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=some@author id=xyrq");
        log.write("│   some documentation");
        log.write("~\n");
        log.write("*   id=abcde author=some@author id=xyrq");
        log.write("│   another commit");
        log.write("~\n");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 2);
        let elided = &rows[0].lines[2];
        assert!(elided.flags.contains(LineFlags::ELIDED));
        assert!(!elided.flags.contains(LineFlags::HIGHLIGHTABLE));
        assert!(rows[0].lines[1].flags.contains(LineFlags::HIGHLIGHTABLE));
        assert!(rows[0].lines[0].flags.contains(LineFlags::REVISION));
    }

    #[test]
    fn lines_before_first_row_are_dropped() {
        let mut log = LogBuilder::default();
        log.write("│   orphan");
        log.write("*   id=abcde author=x id=xyrq");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height(), 1);
    }

    #[test]
    fn identifier_in_last_segment_never_starts_a_row() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=x id=xyrq");
        log.write("│   see id=deadbeef");
        let rows = rows_of(&log);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height(), 2);
    }

    #[test]
    fn conflict_suffix_extends_the_change_id() {
        let magenta = Style::default().fg(Color::Magenta);
        let dim = Style::default().fg(Color::DarkGray);
        let blue = Style::default().fg(Color::Blue);
        let line: SegmentLine = [
            Segment::plain("×  "),
            Segment::new("p", magenta),
            Segment::new("??", dim),
            Segment::plain(" "),
            Segment::new("9c1f", blue),
            Segment::plain(" divergent"),
        ]
        .into_iter()
        .collect();

        let mut builder = RowBuilder::new();
        assert!(builder.push_line(line).is_none());
        let row = builder.finish().expect("row");

        assert_eq!(row.commit.change_id, "p??");
        assert_eq!(row.commit.commit_id.as_deref(), Some("9c1f"));
        assert!(row.commit.is_conflicted);
    }

    #[test]
    fn extension_without_suffix_keeps_the_short_id() {
        let bold_magenta = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);
        let lines = decode_lines(
            "○  \x1b[1;35mX\x1b[0m\x1b[90myzw\x1b[39m \x1b[1;34mE\x1b[0m\x1b[90m4f\x1b[39m msg\n",
        );
        let mut builder = RowBuilder::new();
        builder.push_line(lines[0].clone());
        let row = builder.finish().expect("row");

        assert_eq!(row.lines[0].segments[1].style, bold_magenta);
        assert_eq!(row.commit.change_id, "X");
        assert_eq!(row.commit.commit_id.as_deref(), Some("E"));
        assert!(!row.commit.is_conflicted);
    }

    #[test]
    fn conflict_label_marks_the_row() {
        let lines = decode_lines(
            "@  \x1b[35mkxyz\x1b[39m \x1b[34m1a2b\x1b[39m \x1b[31mconflict\x1b[39m\n",
        );
        let mut builder = RowBuilder::new();
        builder.push_line(lines[0].clone());
        let row = builder.finish().expect("row");

        assert!(row.commit.is_conflicted);
        assert!(row.commit.is_working_copy);
        assert_eq!(row.commit.change_id, "kxyz");
    }

    #[test]
    fn missing_commit_id_keeps_the_row() {
        let lines = decode_lines("○  \x1b[35mkxyz\x1b[39m plain words\n");
        let mut builder = RowBuilder::new();
        builder.push_line(lines[0].clone());
        let row = builder.finish().expect("row");

        assert_eq!(row.commit.change_id, "kxyz");
        assert_eq!(row.commit.commit_id, None);
    }

    #[test]
    fn extend_keeps_the_gutter() {
        let mut log = LogBuilder::default();
        log.write("*   id=abcde author=some@author id=xyrq");
        log.write("│   some documentation");
        let rows = rows_of(&log);

        let extended = rows[0].extend();
        assert_eq!(extended.text(), "│   ");
        assert_eq!(extended.width(), rows[0].indent);
    }

    #[test]
    fn starts_row_agrees_with_push_line() {
        let lines = decode_lines("○  \x1b[35mkxyz\x1b[39m tail\n│  \x1b[35mword\x1b[39m\n");
        assert!(RowBuilder::starts_row(&lines[0]));
        assert!(!RowBuilder::starts_row(&lines[1]));
    }
}
