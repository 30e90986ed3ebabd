// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Styled terminal text.
//!
//! Raw `jj --color=always` output is decoded into [`Segment`]s: runs of text that share one
//! terminal style. Escape sequences never appear in segment text, so concatenating the segments
//! of a line reproduces the escape-stripped line.

mod ansi;

use std::collections::VecDeque;
use std::io::{self, Read};

use ratatui::style::Style;
use smallvec::SmallVec;

pub use ansi::{AnsiDecoder, Chunk};

const READ_BUF_LEN: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }

    /// Display width in runes.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One physical line. Most graph lines have only a handful of segments.
pub type SegmentLine = SmallVec<[Segment; 8]>;

pub fn line_text(segments: &[Segment]) -> String {
    segments.iter().map(|segment| segment.text.as_str()).collect()
}

/// Lazily decodes chunks from a reader.
///
/// The iterator is single pass: once it returns `None` (or an error) the underlying reader has been
/// consumed and it cannot be restarted.
pub struct SegmentReader<R> {
    reader: R,
    decoder: AnsiDecoder,
    pending: VecDeque<Chunk>,
    scratch: Vec<Chunk>,
    buf: Box<[u8]>,
    done: bool,
}

impl<R: Read> SegmentReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: AnsiDecoder::new(),
            pending: VecDeque::new(),
            scratch: Vec::new(),
            buf: vec![0; READ_BUF_LEN].into_boxed_slice(),
            done: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        while self.pending.is_empty() && !self.done {
            let read = match self.reader.read(&mut self.buf) {
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            };
            if read == 0 {
                self.decoder.finish(&mut self.scratch);
                self.done = true;
            } else {
                self.decoder.feed(&self.buf[..read], &mut self.scratch);
            }
            self.pending.extend(self.scratch.drain(..));
        }
        Ok(())
    }
}

impl<R: Read> Iterator for SegmentReader<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.fill() {
            return Some(Err(err));
        }
        self.pending.pop_front().map(Ok)
    }
}

/// Groups decoded chunks into lines. A trailing line without a final newline is still yielded.
pub struct Lines<I> {
    chunks: I,
    current: SegmentLine,
    done: bool,
}

impl<I> Iterator for Lines<I>
where
    I: Iterator<Item = io::Result<Chunk>>,
{
    type Item = io::Result<SegmentLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.chunks.next() {
                Some(Ok(Chunk::Segment(segment))) => self.current.push(segment),
                Some(Ok(Chunk::LineBreak)) => return Some(Ok(std::mem::take(&mut self.current))),
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    if self.current.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.current)));
                }
            }
        }
    }
}

pub fn read_lines<R: Read>(reader: R) -> Lines<SegmentReader<R>> {
    Lines {
        chunks: SegmentReader::new(reader),
        current: SegmentLine::new(),
        done: false,
    }
}

/// Decodes an in-memory string. Useful for fixtures and small command outputs.
pub fn decode_lines(input: &str) -> Vec<SegmentLine> {
    let mut decoder = AnsiDecoder::new();
    let mut chunks = Vec::new();
    decoder.feed(input.as_bytes(), &mut chunks);
    decoder.finish(&mut chunks);
    let mut lines = Lines {
        chunks: chunks.into_iter().map(Ok),
        current: SegmentLine::new(),
        done: false,
    };
    let mut out = Vec::new();
    while let Some(Ok(line)) = lines.next() {
        out.push(line);
    }
    out
}
