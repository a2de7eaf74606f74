//! `rollcall watch` - follow counts and the event log live
//!
//! Runs the background refresh and prints the counts whenever they change
//! and each new log entry as it appears, until Ctrl-C.

use anyhow::Result;
use clap::Args;
use rollcall_common::session::spawn_refresh;
use rollcall_common::{Counts, EventLogEntry, RosterSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::roster::counts_lines;
use crate::render;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Refresh interval in milliseconds (default from config)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

pub async fn run_watch(
    args: &WatchArgs,
    session: RosterSession,
    default_interval: Duration,
) -> Result<()> {
    let interval = args
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or(default_interval);

    let session = Arc::new(Mutex::new(session));
    let cancel = CancellationToken::new();
    let refresher = spawn_refresh(session.clone(), interval, cancel.clone());
    info!("Watching roster every {:?} (Ctrl-C to stop)", interval);

    let mut last_counts: Option<Counts> = None;
    let mut cursor = LogCursor::default();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let guard = session.lock().await;

                for line in render::log_lines(cursor.advance(guard.log()), None) {
                    println!("{}", line);
                }

                let counts = guard.counts();
                if last_counts != Some(counts) {
                    for line in counts_lines(guard.roster()) {
                        println!("{}", line);
                    }
                    last_counts = Some(counts);
                }
            }
        }
    }

    cancel.cancel();
    refresher.await?;
    Ok(())
}

/// Remembers how far the log has been printed
#[derive(Debug, Default)]
struct LogCursor {
    printed: usize,
    last: Option<EventLogEntry>,
}

impl LogCursor {
    /// Entries not printed yet
    ///
    /// If the entry printed last is no longer where it was, the log was
    /// cleared (and possibly refilled) in between, so all of it is new.
    fn advance<'a>(&mut self, log: &'a [EventLogEntry]) -> &'a [EventLogEntry] {
        let continues = match &self.last {
            None => self.printed == 0,
            Some(last) => self.printed > 0 && log.get(self.printed - 1) == Some(last),
        };
        let start = if continues { self.printed } else { 0 };

        self.printed = log.len();
        self.last = log.last().cloned();
        &log[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, status: &str) -> EventLogEntry {
        EventLogEntry {
            timestamp: "2024-05-01 09:00:00".into(),
            full_name: name.into(),
            group: "Blue".into(),
            status_text: status.into(),
        }
    }

    #[test]
    fn test_cursor_prints_only_new_entries() {
        let mut cursor = LogCursor::default();
        let mut log = vec![entry("Anna Smith", "Guests arrived")];
        assert_eq!(cursor.advance(&log).len(), 1);
        assert!(cursor.advance(&log).is_empty());

        log.push(entry("Ben Jones", "Team arrived"));
        assert_eq!(cursor.advance(&log), &log[1..]);
    }

    #[test]
    fn test_cursor_restarts_after_clear_and_regrowth() {
        let mut cursor = LogCursor::default();
        let before = vec![entry("Anna Smith", "Guests arrived"), entry("Anna Smith", "Guests left")];
        cursor.advance(&before);

        // Cleared and refilled past the old length between two ticks
        let after = vec![
            entry("Ben Jones", "Team arrived"),
            entry("Cara Lee", "Guests arrived"),
            entry("Dan Roe", "Guests arrived"),
        ];
        assert_eq!(cursor.advance(&after), &after[..]);
    }

    #[test]
    fn test_cursor_handles_cleared_log() {
        let mut cursor = LogCursor::default();
        cursor.advance(&[entry("Anna Smith", "Guests arrived")]);
        assert!(cursor.advance(&[]).is_empty());

        let refilled = vec![entry("Ben Jones", "Team arrived")];
        assert_eq!(cursor.advance(&refilled), &refilled[..]);
    }
}
