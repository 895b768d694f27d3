// src/health.rs
//! Liveness heartbeat for long-running service mode.
//!
//! A background task rewrites a small file on a fixed interval so that an
//! external probe can check its modification time.

use crate::config::HeartbeatConfig;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a running heartbeat task.
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
    beats: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
}

impl HeartbeatHandle {
    /// Number of successful writes so far.
    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }

    /// Number of failed writes so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Stops the heartbeat. The file is left in place.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Starts writing the heartbeat file, first immediately and then every interval.
///
/// A failed write is logged and counted but never stops the task.
pub fn spawn_heartbeat(config: HeartbeatConfig) -> HeartbeatHandle {
    let beats = Arc::new(AtomicU64::new(0));
    let failures = Arc::new(AtomicU64::new(0));

    log::info!(
        "Heartbeat started: {} every {:?}",
        config.path.display(),
        config.interval
    );

    let task = {
        let beats = Arc::clone(&beats);
        let failures = Arc::clone(&failures);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            loop {
                ticker.tick().await;
                match write_beat(&config.path).await {
                    Ok(()) => {
                        beats.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        failures.fetch_add(1, Ordering::Relaxed);
                        log::warn!(
                            "Failed to write heartbeat to {}: {}",
                            config.path.display(),
                            e
                        );
                    }
                }
            }
        })
    };

    HeartbeatHandle {
        task,
        beats,
        failures,
    }
}

async fn write_beat(path: &Path) -> std::io::Result<()> {
    let stamp = format!("ok {}\n", chrono::Utc::now().to_rfc3339());
    tokio::fs::write(path, stamp).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn writes_a_timestamped_beat() {
        let path = std::env::temp_dir().join(format!("notion-context-health-{}", uuid::Uuid::new_v4()));
        let handle = spawn_heartbeat(HeartbeatConfig {
            path: path.clone(),
            interval: Duration::from_millis(20),
        });

        let mut waited = 0;
        while handle.beats() == 0 && waited < 100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += 1;
        }

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("ok "));
        assert!(chrono::DateTime::parse_from_rfc3339(written.trim_start_matches("ok ").trim()).is_ok());
        assert_eq!(handle.failures(), 0);

        handle.shutdown();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn counts_failed_writes_and_keeps_running() {
        let path = std::env::temp_dir()
            .join(format!("notion-context-missing-{}", uuid::Uuid::new_v4()))
            .join("healthz");
        let handle = spawn_heartbeat(HeartbeatConfig {
            path,
            interval: Duration::from_millis(10),
        });

        let mut waited = 0;
        while handle.failures() < 2 && waited < 100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += 1;
        }

        assert!(handle.failures() >= 2);
        assert_eq!(handle.beats(), 0);
        handle.shutdown();
    }
}
