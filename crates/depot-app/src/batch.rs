// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use tracing::{info, warn};

use crate::RowKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: Vec<RowKey>,
    pub failed: Vec<(RowKey, String)>,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Counts settled requests of one batch. Failures count toward completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTracker {
    summary: BatchSummary,
    reported: bool,
}

impl BatchTracker {
    pub fn new(total: usize) -> Self {
        Self {
            summary: BatchSummary {
                total,
                ..BatchSummary::default()
            },
            reported: false,
        }
    }

    pub fn settled(&self) -> usize {
        self.summary.succeeded.len() + self.summary.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.summary.total
    }

    /// Returns the summary exactly once, on the record that settles the batch.
    pub fn record(&mut self, key: RowKey, outcome: Result<(), String>) -> Option<BatchSummary> {
        match outcome {
            Ok(()) => self.summary.succeeded.push(key),
            Err(message) => self.summary.failed.push((key, message)),
        }
        self.take_completion()
    }

    fn take_completion(&mut self) -> Option<BatchSummary> {
        if self.reported || !self.is_complete() {
            return None;
        }
        self.reported = true;
        Some(self.summary.clone())
    }
}

/// Runs `op` once per key on scoped threads and reports each outcome through
/// `notify` as it arrives. The caller refetches once after this returns.
pub fn run_batch<F, N>(action: &str, keys: &[RowKey], op: F, mut notify: N) -> BatchSummary
where
    F: Fn(&RowKey) -> Result<()> + Sync,
    N: FnMut(Notice),
{
    let mut tracker = BatchTracker::new(keys.len());
    if keys.is_empty() {
        return tracker.take_completion().unwrap_or_default();
    }

    let (tx, rx) = mpsc::channel();
    let mut completion = None;
    thread::scope(|scope| {
        for key in keys {
            let tx = tx.clone();
            let op = &op;
            scope.spawn(move || {
                let outcome = op(key).map_err(|error| error.to_string());
                let _ = tx.send((key.clone(), outcome));
            });
        }
        drop(tx);

        for (key, outcome) in rx {
            match &outcome {
                Ok(()) => notify(Notice::success(format!("{action} {key}: done"))),
                Err(message) => {
                    warn!(%key, "{action} failed: {message}");
                    notify(Notice::error(format!("{action} {key}: {message}")));
                }
            }
            if let Some(summary) = tracker.record(key, outcome) {
                completion = Some(summary);
            }
        }
    });

    let summary = completion.unwrap_or_else(|| tracker.summary.clone());
    info!(
        action,
        total = summary.total,
        failed = summary.failed.len(),
        "batch finished"
    );
    summary
}
