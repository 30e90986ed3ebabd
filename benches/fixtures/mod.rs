// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use jjgraph::parser::Row;

const ESC: &str = "\x1b";

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    if prefix.len() >= target_len {
        return prefix[..target_len].to_owned();
    }
    let mut out = String::with_capacity(target_len);
    out.push_str(prefix);
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

/// Order-sensitive checksum so the optimizer cannot drop the parse.
pub fn checksum_rows(rows: &[Row]) -> u64 {
    let mut acc = 0xcbf2_9ce4_8422_2325u64;
    for row in rows {
        for byte in row.commit.change_id.bytes() {
            acc = (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3);
        }
        acc = acc.wrapping_add(row.lines.len() as u64);
        acc = acc.rotate_left(7) ^ row.indent as u64;
    }
    acc
}

pub mod log {
    use super::{ascii_repeat_to_len, ESC};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub revisions: usize,
        /// Every n-th revision sits on a side branch; 0 keeps the log linear.
        pub branch_every: usize,
        pub description_lines: usize,
        pub description_len: usize,
    }

    impl Params {
        pub const fn new(
            revisions: usize,
            branch_every: usize,
            description_lines: usize,
            description_len: usize,
        ) -> Self {
            Self {
                revisions,
                branch_every,
                description_lines,
                description_len,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumBranchy,
        LargeLongDescriptions,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumBranchy => "medium_branchy",
                Self::LargeLongDescriptions => "large_long_descriptions",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(100, 0, 1, 24),
                Self::MediumBranchy => Params::new(2_000, 5, 1, 40),
                Self::LargeLongDescriptions => Params::new(10_000, 9, 3, 120),
            }
        }
    }

    /// Change ids use jj's reversed-hex alphabet.
    fn change_id(idx: usize) -> String {
        const ALPHABET: &[u8] = b"zyxwvutsrqponmlk";
        let mut value = idx;
        let mut out = String::with_capacity(8);
        for _ in 0..8 {
            out.push(char::from(ALPHABET[value % 16]));
            value /= 16;
        }
        out
    }

    fn commit_id(idx: usize) -> String {
        format!("{:08x}", idx.wrapping_mul(2_654_435_761) & 0xffff_ffff)
    }

    fn id(text: &str, color: u8) -> String {
        let (head, tail) = text.split_at(1);
        format!("{ESC}[1m{ESC}[38;5;{color}m{head}{ESC}[0m{ESC}[38;5;8m{tail}{ESC}[39m")
    }

    /// Colored `jj log` output with the default template's shape.
    pub fn text(params: Params) -> String {
        let mut out = String::new();
        for idx in 0..params.revisions {
            let side =
                params.branch_every > 0 && idx % params.branch_every == params.branch_every - 1;
            let (node_gutter, text_gutter) = match (idx, side) {
                (0, _) => ("@  ", "│  "),
                (_, true) => ("│ ○  ", "├─╯  "),
                _ => ("○  ", "│  "),
            };
            out.push_str(node_gutter);
            out.push_str(&id(&change_id(idx), 5));
            out.push_str(&format!(
                " {ESC}[38;5;3mdev{}@example.com{ESC}[39m {ESC}[38;5;6m2026-10-{:02} 12:00:00{ESC}[39m ",
                idx % 7,
                1 + idx % 28
            ));
            out.push_str(&id(&commit_id(idx), 4));
            out.push('\n');

            for line in 0..params.description_lines {
                let gutter = if line == 0 { text_gutter } else { "│  " };
                let base = format!("change {idx} line {line} ");
                out.push_str(gutter);
                out.push_str(&ascii_repeat_to_len(&base, '.', params.description_len));
                out.push('\n');
            }
        }
        out.push_str(&format!("◆  {} {ESC}[38;5;2mroot(){ESC}[39m ", id("zzzzzzzz", 5)));
        out.push_str(&id("00000000", 4));
        out.push('\n');
        out
    }

    pub fn fixture(case: Case) -> String {
        text(case.params())
    }
}
