// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if text_len(text) <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncates or right-pads `text` to exactly `width` columns.
pub(crate) fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = truncate_with_ellipsis(text, width);
    let len = text_len(&out);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

#[cfg(test)]
mod tests {
    use super::{fit_to_width, text_len, truncate_with_ellipsis};

    #[test]
    fn truncate_with_ellipsis_handles_small_widths() {
        assert_eq!(truncate_with_ellipsis("bookmark", 0), "");
        assert_eq!(truncate_with_ellipsis("bookmark", 1), "…");
        assert_eq!(truncate_with_ellipsis("b", 1), "b");
        assert_eq!(truncate_with_ellipsis("bookmark", 3), "bo…");
    }

    #[test]
    fn widths_count_chars_not_bytes() {
        assert_eq!(text_len("│○─"), 3);
        assert_eq!(truncate_with_ellipsis("ünïcode", 3), "ün…");
    }

    #[test]
    fn fit_to_width_pads_and_truncates() {
        assert_eq!(fit_to_width("main", 6), "main  ");
        assert_eq!(fit_to_width("feature", 4), "fea…");
        assert_eq!(fit_to_width("x", 0), "");
    }
}
