// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pull-driven row streaming.
//!
//! A producer thread reads the log, builds rows, and parks whenever it has accumulated more than
//! `batch_size` rows. It only hands a batch over after the consumer asks for one with
//! [`ControlMsg::RequestMore`]; [`ControlMsg::Close`] stops it and drops the reader. The batch
//! channel holds a single batch, so at most one batch is ever in flight.
//!
//! At end of input the producer waits for one more signal before flushing the remainder with
//! `has_more == false`, then waits for a final signal as a completion handshake.

use std::io::{self, Read};
use std::mem;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::row::{Row, RowBuilder};
use crate::screen;

pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    RequestMore,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
    pub rows: Vec<Row>,
    pub has_more: bool,
}

/// Result of a non-blocking poll.
#[derive(Debug)]
pub enum StreamPoll {
    Batch(RowBatch),
    Pending,
    Finished,
}

/// Consumer side of a streaming parse.
///
/// Dropping the stream sends [`ControlMsg::Close`].
#[derive(Debug)]
pub struct RowStream {
    batches: mpsc::Receiver<RowBatch>,
    control: mpsc::UnboundedSender<ControlMsg>,
    worker: Option<JoinHandle<()>>,
    closed: bool,
}

pub fn parse_rows_streaming<R>(reader: R, batch_size: usize) -> io::Result<RowStream>
where
    R: Read + Send + 'static,
{
    let (batch_tx, batches) = mpsc::channel(1);
    let (control, control_rx) = mpsc::unbounded_channel();
    let worker = thread::Builder::new()
        .name("jjgraph-log-parser".to_string())
        .spawn(move || produce(reader, batch_size, batch_tx, control_rx))?;
    Ok(RowStream {
        batches,
        control,
        worker: Some(worker),
        closed: false,
    })
}

impl RowStream {
    /// Asks the producer for the next batch. Returns false once the producer is gone.
    pub fn request_more(&self) -> bool {
        !self.closed && self.control.send(ControlMsg::RequestMore).is_ok()
    }

    /// Stops the producer. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.control.send(ControlMsg::Close);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn try_next(&mut self) -> StreamPoll {
        match self.batches.try_recv() {
            Ok(batch) => StreamPoll::Batch(batch),
            Err(TryRecvError::Empty) => StreamPoll::Pending,
            Err(TryRecvError::Disconnected) => StreamPoll::Finished,
        }
    }

    /// Blocks until the next batch arrives or the producer exits.
    pub fn next_blocking(&mut self) -> Option<RowBatch> {
        self.batches.blocking_recv()
    }

    /// Pulls every remaining batch and returns the rows in order.
    pub fn drain(mut self) -> Vec<Row> {
        let mut rows = Vec::new();
        while self.request_more() {
            let Some(batch) = self.next_blocking() else {
                break;
            };
            rows.extend(batch.rows);
            if !batch.has_more {
                break;
            }
        }
        self.join();
        rows
    }

    /// Closes the stream and waits for the producer thread to exit.
    pub fn join(mut self) {
        self.close();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("log parser thread panicked");
            }
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn produce<R: Read>(
    reader: R,
    batch_size: usize,
    batches: mpsc::Sender<RowBatch>,
    mut control: mpsc::UnboundedReceiver<ControlMsg>,
) {
    debug!(batch_size, "log parser started");
    let mut builder = RowBuilder::new();
    let mut rows = Vec::new();

    for line in screen::read_lines(reader) {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "reading log output failed");
                break;
            }
        };
        if rows.len() > batch_size
            && RowBuilder::starts_row(&line)
            && !hand_over(&mut rows, true, &batches, &mut control)
        {
            return;
        }
        rows.extend(builder.push_line(line));
    }

    // End of input seals the open row, which is a row boundary like any other.
    let last = builder.finish();
    if last.is_some()
        && rows.len() > batch_size
        && !hand_over(&mut rows, true, &batches, &mut control)
    {
        return;
    }
    rows.extend(last);

    if !rows.is_empty() && !hand_over(&mut rows, false, &batches, &mut control) {
        return;
    }
    let _ = control.blocking_recv();
    debug!(rows = builder.sealed(), "log parser finished");
}

/// Parks until the consumer signals, then sends the accumulated rows. Returns false when the
/// producer should stop.
fn hand_over(
    rows: &mut Vec<Row>,
    has_more: bool,
    batches: &mpsc::Sender<RowBatch>,
    control: &mut mpsc::UnboundedReceiver<ControlMsg>,
) -> bool {
    match control.blocking_recv() {
        Some(ControlMsg::RequestMore) => {
            let batch = RowBatch {
                rows: mem::take(rows),
                has_more,
            };
            debug!(rows = batch.rows.len(), has_more, "flushing row batch");
            batches.blocking_send(batch).is_ok()
        }
        Some(ControlMsg::Close) | None => {
            debug!("log parser closed");
            false
        }
    }
}
