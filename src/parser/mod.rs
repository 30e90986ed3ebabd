// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Log graph parsing: styled lines in, [`Row`]s out.

mod row;
mod streaming;

use std::io::{self, Read};

pub use row::{GraphRowLine, LineFlags, Row, RowBuilder, RowSummary};
pub use streaming::{
    parse_rows_streaming, ControlMsg, RowBatch, RowStream, StreamPoll, DEFAULT_BATCH_SIZE,
};

use crate::screen;

/// Parses a whole log synchronously.
pub fn parse_rows<R: Read>(reader: R) -> io::Result<Vec<Row>> {
    let mut builder = RowBuilder::new();
    let mut rows = Vec::new();
    for line in screen::read_lines(reader) {
        if let Some(row) = builder.push_line(line?) {
            rows.push(row);
        }
    }
    rows.extend(builder.finish());
    Ok(rows)
}
