// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Color, Modifier, Style};

use super::Segment;

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Output of the decoder: styled text or a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Segment(Segment),
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Csi,
    Osc,
    OscEscape,
}

/// Incremental SGR decoder.
///
/// Bytes may be fed in arbitrary slices; escape sequences and multi-byte characters that straddle
/// two `feed` calls are reassembled. Text is only emitted when the style changes, a line ends, or
/// [`AnsiDecoder::finish`] is called, so adjacent runs with the same style become one segment.
#[derive(Debug, Default)]
pub struct AnsiDecoder {
    state: State,
    fg: Option<Color>,
    bg: Option<Color>,
    modifiers: Modifier,
    text: Vec<u8>,
    params: Vec<u8>,
}

impl AnsiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style that applies to the next text byte.
    pub fn style(&self) -> Style {
        let mut style = Style::default().add_modifier(self.modifiers);
        style.fg = self.fg;
        style.bg = self.bg;
        style
    }

    pub fn feed(&mut self, bytes: &[u8], out: &mut Vec<Chunk>) {
        let mut pos = 0;
        while pos < bytes.len() {
            match self.state {
                State::Ground => {
                    let rest = &bytes[pos..];
                    match memchr::memchr3(ESC, b'\n', b'\r', rest) {
                        None => {
                            self.text.extend_from_slice(rest);
                            pos = bytes.len();
                        }
                        Some(offset) => {
                            self.text.extend_from_slice(&rest[..offset]);
                            pos += offset + 1;
                            match rest[offset] {
                                ESC => self.state = State::Escape,
                                b'\n' => {
                                    self.flush(out);
                                    out.push(Chunk::LineBreak);
                                }
                                _ => {}
                            }
                        }
                    }
                }
                State::Escape => {
                    let byte = bytes[pos];
                    pos += 1;
                    self.state = match byte {
                        b'[' => {
                            self.params.clear();
                            State::Csi
                        }
                        b']' => State::Osc,
                        // two-byte sequences (ESC 7, ESC =, ...) carry no text
                        _ => State::Ground,
                    };
                }
                State::Csi => {
                    let byte = bytes[pos];
                    pos += 1;
                    if (0x40..=0x7e).contains(&byte) {
                        if byte == b'm' {
                            self.apply_sgr(out);
                        }
                        self.params.clear();
                        self.state = State::Ground;
                    } else {
                        self.params.push(byte);
                    }
                }
                State::Osc => {
                    let rest = &bytes[pos..];
                    match memchr::memchr2(BEL, ESC, rest) {
                        None => pos = bytes.len(),
                        Some(offset) => {
                            pos += offset + 1;
                            self.state = if rest[offset] == BEL {
                                State::Ground
                            } else {
                                State::OscEscape
                            };
                        }
                    }
                }
                State::OscEscape => {
                    // ST is `ESC \`; anything else also ends the string.
                    pos += 1;
                    self.state = State::Ground;
                }
            }
        }
    }

    /// Emits any buffered text. Call once the input is exhausted.
    pub fn finish(&mut self, out: &mut Vec<Chunk>) {
        self.flush(out);
        self.state = State::Ground;
        self.params.clear();
    }

    fn flush(&mut self, out: &mut Vec<Chunk>) {
        self.flush_with(self.style(), out);
    }

    fn flush_with(&mut self, style: Style, out: &mut Vec<Chunk>) {
        if self.text.is_empty() {
            return;
        }
        let text = match String::from_utf8(std::mem::take(&mut self.text)) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        out.push(Chunk::Segment(Segment::new(text, style)));
    }

    fn apply_sgr(&mut self, out: &mut Vec<Chunk>) {
        let before = self.style();
        let params = parse_params(&self.params);
        let mut idx = 0;
        while idx < params.len() {
            let code = params[idx];
            idx += 1;
            match code {
                0 => {
                    self.fg = None;
                    self.bg = None;
                    self.modifiers = Modifier::empty();
                }
                1 => self.modifiers.insert(Modifier::BOLD),
                2 => self.modifiers.insert(Modifier::DIM),
                3 => self.modifiers.insert(Modifier::ITALIC),
                4 => self.modifiers.insert(Modifier::UNDERLINED),
                5 => self.modifiers.insert(Modifier::SLOW_BLINK),
                6 => self.modifiers.insert(Modifier::RAPID_BLINK),
                7 => self.modifiers.insert(Modifier::REVERSED),
                8 => self.modifiers.insert(Modifier::HIDDEN),
                9 => self.modifiers.insert(Modifier::CROSSED_OUT),
                22 => self.modifiers.remove(Modifier::BOLD | Modifier::DIM),
                23 => self.modifiers.remove(Modifier::ITALIC),
                24 => self.modifiers.remove(Modifier::UNDERLINED),
                25 => self
                    .modifiers
                    .remove(Modifier::SLOW_BLINK | Modifier::RAPID_BLINK),
                27 => self.modifiers.remove(Modifier::REVERSED),
                28 => self.modifiers.remove(Modifier::HIDDEN),
                29 => self.modifiers.remove(Modifier::CROSSED_OUT),
                30..=37 => self.fg = Some(basic_color(code - 30)),
                38 => self.fg = extended_color(&params, &mut idx).or(self.fg),
                39 => self.fg = None,
                40..=47 => self.bg = Some(basic_color(code - 40)),
                48 => self.bg = extended_color(&params, &mut idx).or(self.bg),
                49 => self.bg = None,
                90..=97 => self.fg = Some(bright_color(code - 90)),
                100..=107 => self.bg = Some(bright_color(code - 100)),
                _ => {}
            }
        }

        // Text buffered so far belongs to the previous style.
        if self.style() != before {
            self.flush_with(before, out);
        }
    }
}

fn parse_params(raw: &[u8]) -> Vec<u32> {
    if raw.is_empty() {
        return vec![0];
    }
    raw.split(|&byte| byte == b';' || byte == b':')
        .map(|part| {
            part.iter()
                .take_while(|byte| byte.is_ascii_digit())
                .fold(0u32, |acc, byte| {
                    acc.saturating_mul(10).saturating_add(u32::from(byte - b'0'))
                })
        })
        .collect()
}

fn extended_color(params: &[u32], idx: &mut usize) -> Option<Color> {
    match params.get(*idx).copied() {
        Some(5) => {
            let value = params.get(*idx + 1).copied();
            *idx += 2;
            value.map(|n| Color::Indexed(clamp_u8(n)))
        }
        Some(2) => {
            let channels = params.get(*idx + 1..*idx + 4);
            *idx += 4;
            channels.map(|rgb| Color::Rgb(clamp_u8(rgb[0]), clamp_u8(rgb[1]), clamp_u8(rgb[2])))
        }
        _ => None,
    }
}

fn clamp_u8(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn basic_color(idx: u32) -> Color {
    match idx {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn bright_color(idx: u32) -> Color {
    match idx {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        _ => Color::White,
    }
}
