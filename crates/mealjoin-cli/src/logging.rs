// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Tracing subscriber setup for the `mealjoin` binary.
//!
//! Filter priority, highest first: `MEALJOIN_LOG`, `RUST_LOG`, the `[log].level`
//! config value, then `warn`. The TUI owns the terminal, so interactive runs
//! log to `[log].file` or nowhere; one-shot commands log to stderr.

use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const PROJECT_LOG_ENV: &str = "MEALJOIN_LOG";
const FALLBACK_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

pub fn init_subscriber(config_level: &str, target: LogTarget) -> Result<()> {
    let directive = resolve_directive(
        std::env::var(PROJECT_LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        config_level,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    let installed = match target {
        LogTarget::Discard => return Ok(()),
        LogTarget::Stderr => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_ansi)
                        .with_target(true)
                        .without_time()
                        .compact(),
                )
                .try_init()
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| {
                    format!(
                        "open log file {} -- fix [log].file or remove it",
                        path.display()
                    )
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
        }
    };
    installed.map_err(|error| anyhow!("install log subscriber: {error}"))
}

/// First directive string that parses, in priority order. Unparseable env
/// values fall through instead of failing startup.
fn resolve_directive(
    project_env: Option<String>,
    rust_log: Option<String>,
    config_level: &str,
) -> String {
    [project_env, rust_log, Some(config_level.to_owned())]
        .into_iter()
        .flatten()
        .map(|directive| directive.trim().to_owned())
        .find(|directive| !directive.is_empty() && EnvFilter::try_new(directive).is_ok())
        .unwrap_or_else(|| FALLBACK_LEVEL.to_owned())
}
