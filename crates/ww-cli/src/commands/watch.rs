//! Watch command: the poll loop and its lifecycle.
//!
//! Startup reads the focused window once, directly from the platform source;
//! if that fails the process exits rather than recording a bogus `unknown`
//! session. After that every probe failure is logged and recorded as the
//! `unknown` sentinel.
//!
//! The loop polls, feeds the tracker, filters and appends any closed session,
//! then sleeps for the poll interval. The sleep is raced against a
//! cancellation token that the signal listener trips on Ctrl-C / `SIGTERM`.
//! The data file is only open for the duration of a single append, so
//! cancellation has nothing to flush.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use ww_core::{EventFilter, FocusSession, FocusTracker, WindowEvent, WindowSource, poll_window};
use ww_store::EventLog;

use crate::Config;
use crate::platform;

/// Source of the current time, in Unix seconds.
pub trait Clock {
    /// Returns the current Unix timestamp in whole seconds.
    fn now(&self) -> i64;
}

/// Wall clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Counts from one run of the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    /// Events appended to the data file.
    pub written: usize,
    /// Events dropped by ignore rules.
    pub suppressed: usize,
    /// The session still open when the loop stopped. It is never written.
    pub open_session: FocusSession,
}

/// The poll loop and the collaborators it drives.
pub struct Watcher<'a> {
    source: &'a dyn WindowSource,
    clock: &'a dyn Clock,
    filter: EventFilter,
    log: EventLog,
    poll_interval: Duration,
}

impl<'a> Watcher<'a> {
    /// Wires a watcher together.
    pub fn new(
        source: &'a dyn WindowSource,
        clock: &'a dyn Clock,
        filter: EventFilter,
        log: EventLog,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            filter,
            log,
            poll_interval,
        }
    }

    /// Runs until `cancel` is tripped or an append fails.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<WatchSummary> {
        let initial = self
            .source
            .fetch_focused_window()
            .context("failed to read the focused window at startup")?;
        tracing::debug!(window = %initial, "initial window");

        let mut tracker = FocusTracker::new(initial, self.clock.now());
        let mut written = 0;
        let mut suppressed = 0;

        loop {
            let current = poll_window(self.source);
            if let Some(event) = tracker.observe(current, self.clock.now()) {
                if self.record(&event)? {
                    written += 1;
                } else {
                    suppressed += 1;
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        Ok(WatchSummary {
            written,
            suppressed,
            open_session: tracker.session().clone(),
        })
    }

    /// Filters and appends one closed session. Returns `false` if suppressed.
    fn record(&self, event: &WindowEvent) -> Result<bool> {
        if let Some(rule) = self.filter.matching_rule(event) {
            tracing::info!(
                appname = %event.appname,
                duration = event.duration,
                pattern = rule.as_str(),
                "ignored window event"
            );
            return Ok(false);
        }

        self.log.append(event).with_context(|| {
            format!("failed to write event to {}", self.log.path().display())
        })?;
        tracing::debug!(
            started_at = event.started_at,
            duration = event.duration,
            appname = %event.appname,
            title = %event.title,
            "wrote window event"
        );
        Ok(true)
    }
}

/// Runs the watch command until interrupted.
pub async fn run(config: &Config) -> Result<()> {
    let poll_interval = config.poll_interval()?;
    let filter =
        EventFilter::compile(&config.ignore_regex).context("failed to compile ignore patterns")?;
    let source = platform::native_source().context("failed to initialize window source")?;

    tracing::info!(
        datafile = %config.datafile.display(),
        poll_time = config.poll_time,
        ignore_rules = filter.len(),
        "window watcher started"
    );

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    let watcher = Watcher::new(
        source.as_ref(),
        &SystemClock,
        filter,
        EventLog::new(&config.datafile),
        poll_interval,
    );
    let result = watcher.run(&cancel).await;
    listener.abort();

    let summary = result?;
    tracing::info!(
        written = summary.written,
        suppressed = summary.suppressed,
        open_appname = %summary.open_session.appname,
        open_since = summary.open_session.started_at,
        "window watcher stopped"
    );
    Ok(())
}

/// Trips `cancel` on the first Ctrl-C or `SIGTERM`.
async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
    cancel.cancel();
}
