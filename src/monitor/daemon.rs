// Monitoring Daemon - periodic check loop

use crate::Result;
use crate::credentials::CredentialSource;
use crate::monitor::checker::Checker;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Re-checks one credential every `period` until stopped or a check fails
pub struct MonitorDaemon {
    checker: Checker,
    source: CredentialSource,
    period: Duration,
    running: Arc<AtomicBool>,
    wakeup: Arc<Notify>,
}

impl MonitorDaemon {
    pub fn new(checker: Checker, source: CredentialSource, period: Duration) -> Self {
        Self {
            checker,
            source,
            period,
            running: Arc::new(AtomicBool::new(false)),
            wakeup: Arc::new(Notify::new()),
        }
    }

    /// Start the daemon with SIGTERM/SIGINT handling
    pub async fn start(&self) -> Result<()> {
        tracing::info!(
            "Starting cert-checker daemon for {} every {}s",
            self.source.path(),
            self.period.as_secs()
        );

        self.setup_signal_handlers();
        self.run().await
    }

    /// Check, sleep, repeat
    ///
    /// Cycles never overlap and missed cycles are not caught up. The first
    /// failing check ends the loop with its error.
    pub async fn run(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);

        while self.running.load(Ordering::SeqCst) {
            self.run_cycle().await?;

            tokio::select! {
                _ = tokio::time::sleep(self.period) => {}
                _ = self.wakeup.notified() => {}
            }
        }

        tracing::info!("Monitoring daemon stopped");
        Ok(())
    }

    /// Stop the daemon after the current cycle
    pub fn stop(&self) {
        tracing::info!("Stopping monitoring daemon...");
        self.running.store(false, Ordering::SeqCst);
        self.wakeup.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run_cycle(&self) -> Result<()> {
        let report = self.checker.check(&self.source).await?;
        tracing::debug!("Check of {} finished: {:?}", self.source.path(), report);
        Ok(())
    }

    /// Setup signal handlers for graceful shutdown
    fn setup_signal_handlers(&self) {
        let running = Arc::clone(&self.running);
        let wakeup = Arc::clone(&self.wakeup);

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                        (Err(e), _) | (_, Err(e)) => {
                            tracing::error!("Failed to setup signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT");
                    }
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to setup Ctrl+C handler: {}", e);
                    return;
                }
                tracing::info!("Received Ctrl+C");
            }

            running.store(false, Ordering::SeqCst);
            wakeup.notify_one();
        });
    }
}
