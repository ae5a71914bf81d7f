//! The auto-play worker.
//!
//! The ticker never touches session state. It sleeps for the configured
//! delay, then asks the session task to advance by sending a `Tick`. The
//! sleep races a cancellation channel, so stopping does not wait out the
//! remainder of the delay.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::trace;

use super::command::Command;

#[derive(Debug)]
pub(super) struct Ticker {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker for auto-play run `run`.
    ///
    /// Holds only a weak sender, so it never keeps the session task alive.
    pub(super) fn spawn(delay: Duration, run: u64, commands: mpsc::WeakSender<Command>) -> Self {
        let (cancel, mut cancelled) = watch::channel(false);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = tokio::time::sleep(delay) => {}
                }

                let Some(commands) = commands.upgrade() else {
                    break;
                };
                if commands.send(Command::Tick { run }).await.is_err() {
                    break;
                }
            }
            trace!(run, "ticker exited");
        });

        Self { cancel, task }
    }

    /// Stop ticking. A tick already in the channel may still arrive; the
    /// session task discards it.
    pub(super) fn cancel(self) {
        let _ = self.cancel.send(true);
        // A ticker parked on a full command channel never sees the signal.
        self.task.abort();
    }

    #[cfg(test)]
    pub(super) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_the_configured_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_millis(100), 7, tx.downgrade());

        let start = tokio::time::Instant::now();
        match rx.recv().await {
            Some(Command::Tick { run }) => assert_eq!(run, 7),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(start.elapsed() >= Duration::from_millis(100));

        ticker.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_sleep() {
        let (tx, mut rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_secs(3600), 1, tx.downgrade());
        let task = ticker.task.abort_handle();

        ticker.cancel();
        tokio::task::yield_now().await;
        while !task.is_finished() {
            tokio::task::yield_now().await;
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_releases_ticker_blocked_on_full_channel() {
        let (tx, mut rx) = mpsc::channel(1);
        let ticker = Ticker::spawn(Duration::from_millis(10), 3, tx.downgrade());

        // First tick fills the channel, the second parks in `send`.
        tokio::time::sleep(Duration::from_millis(25)).await;
        let task = ticker.task.abort_handle();
        ticker.cancel();
        while !task.is_finished() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(rx.try_recv(), Ok(Command::Tick { run: 3 })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_session_is_gone() {
        let (tx, rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_millis(10), 1, tx.downgrade());
        drop(tx);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ticker.is_finished());
    }
}
