// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Jjgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of jjgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! jjgraph CLI entrypoint.
//!
//! By default this runs the interactive TUI on the repository in the current directory. Use
//! `--dump` to parse a colored `jj log` capture and print the rows as JSON instead.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jjgraph::config::{parse_batch_size, Config};
use jjgraph::parser::{parse_rows, Row, RowSummary};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "JJGRAPH_LOG";
const STDIN_SOURCE: &str = "-";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--repo <dir>] [--revset <revset>] [--limit <n>] [--batch-size <n>] [--log-file <path>]\n  {program} --dump [<file>|-]\n\nThe TUI runs `jj log` in --repo (default: current directory) and streams rows in batches of\n--batch-size (default 50, env JJGRAPH_BATCH_SIZE).\n\n--dump parses a colored `jj log` capture from <file> or stdin and prints the rows as JSON.\n\nLogs are filtered by JJGRAPH_LOG (default info). The TUI only logs with --log-file."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    repo: Option<PathBuf>,
    revset: Option<String>,
    limit: Option<usize>,
    batch_size: Option<usize>,
    log_file: Option<PathBuf>,
    dump: Option<String>,
    help: bool,
}

fn next_value(args: &mut impl Iterator<Item = String>) -> Result<String, ()> {
    args.next().filter(|value| !value.starts_with("--")).ok_or(())
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut args: Peekable<_> = args.peekable();
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--repo" => {
                if options.repo.is_some() {
                    return Err(());
                }
                options.repo = Some(PathBuf::from(next_value(&mut args)?));
            }
            "--revset" => {
                if options.revset.is_some() {
                    return Err(());
                }
                options.revset = Some(next_value(&mut args)?);
            }
            "--limit" => {
                if options.limit.is_some() {
                    return Err(());
                }
                let raw = next_value(&mut args)?;
                let limit: usize = raw.parse().map_err(|_| ())?;
                if limit == 0 {
                    return Err(());
                }
                options.limit = Some(limit);
            }
            "--batch-size" => {
                if options.batch_size.is_some() {
                    return Err(());
                }
                let raw = next_value(&mut args)?;
                options.batch_size = Some(parse_batch_size(&raw).ok_or(())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(PathBuf::from(next_value(&mut args)?));
            }
            "--dump" => {
                if options.dump.is_some() {
                    return Err(());
                }
                // The source is optional; a following flag is not a file name.
                let source = args
                    .next_if(|next| next == STDIN_SOURCE || !next.starts_with('-'))
                    .unwrap_or_else(|| STDIN_SOURCE.to_owned());
                options.dump = Some(source);
            }
            "-h" | "--help" => options.help = true,
            _ => return Err(()),
        }
    }

    Ok(options)
}

impl CliOptions {
    fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.repo_dir = repo.clone();
        }
        if let Some(revset) = &self.revset {
            config.revset = Some(revset.clone());
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .try_init()?;
    Ok(())
}

fn init_stderr_logging() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()?;
    Ok(())
}

fn dump_rows(source: &str) -> Result<(), Box<dyn Error>> {
    let rows = if source == STDIN_SOURCE {
        parse_rows(io::stdin().lock())?
    } else {
        parse_rows(File::open(source)?)?
    };
    let summaries: Vec<RowSummary> = rows.iter().map(Row::summary).collect();
    info!(source, rows = summaries.len(), "log parsed");

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &summaries)?;
    writeln!(out)?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "jjgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) if !options.help => options,
            Ok(_) => {
                print_usage(&program);
                return Ok(());
            }
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(source) = &options.dump {
            init_stderr_logging()?;
            return dump_rows(source);
        }

        if let Some(path) = &options.log_file {
            init_file_logging(path)?;
        }

        let mut config = Config::from_env()?;
        options.apply(&mut config);
        info!(
            repo = %config.repo_dir.display(),
            revset = ?config.revset,
            batch_size = config.batch_size,
            "starting"
        );
        jjgraph::tui::run(config)
    })();

    if let Err(err) = result {
        eprintln!("jjgraph: {err}");
        std::process::exit(1);
    }
}
