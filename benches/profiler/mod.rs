// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Reads a `JJGRAPH_BENCH_*` knob, falling back to `default` when unset or unparsable.
fn knob<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(format!("JJGRAPH_BENCH_{name}"))
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Criterion with a flamegraph profiler attached; run with `--profile-time <secs>` to sample.
pub fn criterion() -> Criterion {
    let frequency: i32 = knob("PROFILE_FREQ", 100).clamp(1, 1000);
    let sample_size: usize = knob("SAMPLE_SIZE", 50).clamp(10, 200);
    let warmup_secs: u64 = knob("WARMUP_SECS", 2).clamp(1, 60);
    let measurement_secs: u64 = knob("MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
