// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::render::Decoration;

const CHAR_LIMIT: usize = 120;
const MIN_FUZZY_RATIO: f64 = 0.5;

/// Single-line text entry for bookmark names, with completion from known names.
///
/// The raw value keeps whatever the user typed; whitespace is folded to `-` when displayed and
/// when the name is taken.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameInput {
    value: Vec<char>,
    cursor: usize,
    suggestions: Vec<String>,
}

impl NameInput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(CHAR_LIMIT).collect();
        self.cursor = self.value.len();
    }

    pub(crate) fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub(crate) fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Trimmed value with every whitespace run replaced by `-`.
    pub(crate) fn normalized_name(&self) -> String {
        self.value().split_whitespace().collect::<Vec<_>>().join("-")
    }

    /// Returns true when the key edited the value or moved the cursor.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.clear();
                true
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                true
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.value.len();
                true
            }
            KeyCode::Char(ch)
                if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) && !ch.is_control() =>
            {
                if self.value.len() >= CHAR_LIMIT {
                    return false;
                }
                self.value.insert(self.cursor, ch);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                self.value.remove(self.cursor);
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.len() {
                    return false;
                }
                self.value.remove(self.cursor);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.len());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                true
            }
            KeyCode::Tab => self.accept_suggestion(),
            _ => false,
        }
    }

    /// Replaces the value with the best-ranked suggestion.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        let Some(best) = self.ranked().first().map(|s| s.to_string()) else {
            return false;
        };
        self.set_value(&best);
        true
    }

    /// Suggestions ordered for display: prefix matches (shortest first), then fuzzy matches by
    /// descending similarity. An empty value lists everything in its original order.
    pub(crate) fn ranked(&self) -> Vec<&str> {
        let needle = self.normalized_name();
        if needle.is_empty() {
            return self.suggestions.iter().map(String::as_str).collect();
        }

        let mut prefix: Vec<&str> = Vec::new();
        let mut fuzzy: Vec<(f64, &str)> = Vec::new();
        for suggestion in &self.suggestions {
            if suggestion == &needle {
                continue;
            }
            if suggestion.starts_with(&needle) {
                prefix.push(suggestion);
                continue;
            }
            let ratio = rapidfuzz::fuzz::ratio(needle.chars(), suggestion.chars());
            if ratio >= MIN_FUZZY_RATIO {
                fuzzy.push((ratio, suggestion));
            }
        }
        prefix.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        fuzzy.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        prefix.extend(fuzzy.into_iter().map(|(_, s)| s));
        prefix
    }

    /// Remainder of the best prefix match, drawn after the typed text.
    pub(crate) fn completion(&self) -> Option<String> {
        let needle = self.normalized_name();
        if needle.is_empty() || self.cursor != self.value.len() {
            return None;
        }
        let best = self.ranked().into_iter().next()?;
        best.strip_prefix(needle.as_str())
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn view(&self) -> Vec<Decoration> {
        let shown: String = self
            .value
            .iter()
            .map(|&ch| if ch.is_whitespace() { '-' } else { ch })
            .collect();
        let mut out = vec![Decoration::text(shown)];
        if let Some(rest) = self.completion() {
            out.push(Decoration::dimmed(rest));
        }
        out
    }
}
