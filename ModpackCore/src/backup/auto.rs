//! Periodic save backups on a background thread

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::SaveBackups;
use crate::error::Result;

/// Running auto-backup timer. Stops when dropped.
#[derive(Debug)]
pub struct AutoBackup {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<usize>>,
    interval: Duration,
}

impl AutoBackup {
    /// Start backing up every `interval`.
    ///
    /// The first backup happens one interval after starting. A missing save
    /// file is reported through `on_backup` and does not stop the timer.
    ///
    /// # Arguments
    /// * `backups` - Slot to back up
    /// * `interval` - Time between backups
    /// * `on_backup` - Called with the outcome of every attempt
    pub fn start<F>(backups: SaveBackups, interval: Duration, on_backup: F) -> Self
    where
        F: Fn(Result<PathBuf>) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        tracing::info!("Auto backup started (every {}s)", interval.as_secs());

        let thread = thread::spawn(move || {
            let mut made = 0;
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let outcome = backups.perform();
                        match &outcome {
                            Ok(_) => made += 1,
                            Err(e) => tracing::warn!("Auto backup failed: {e}"),
                        }
                        on_backup(outcome);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            made
        });

        Self {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer and wait for the thread.
    ///
    /// # Returns
    /// Number of successful backups made while running.
    pub fn stop(&mut self) -> usize {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        let made = self
            .thread
            .take()
            .and_then(|t| t.join().ok())
            .unwrap_or(0);
        tracing::info!("Auto backup stopped after {made} backups");
        made
    }
}

impl Drop for AutoBackup {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_backs_up_until_stopped() {
        let temp = TempDir::new().unwrap();
        let save = temp.path().join("1").join("save.jkr");
        fs::create_dir_all(save.parent().unwrap()).unwrap();
        fs::write(&save, "run").unwrap();
        let backups = SaveBackups::new(&save, temp.path().join("1").join("autosave"));

        let seen = Arc::new(Mutex::new(0usize));
        let seen_cb = Arc::clone(&seen);
        let mut auto = AutoBackup::start(backups.clone(), Duration::from_millis(20), move |r| {
            if r.is_ok() {
                *seen_cb.lock().unwrap() += 1;
            }
        });

        thread::sleep(Duration::from_millis(150));
        let made = auto.stop();
        assert!(made >= 1);
        assert_eq!(made, *seen.lock().unwrap());
        assert!(!auto.is_running());
        assert!(!backups.list().unwrap().is_empty());
    }

    #[test]
    fn test_missing_save_keeps_running() {
        let temp = TempDir::new().unwrap();
        let backups = SaveBackups::new(temp.path().join("save.jkr"), temp.path().join("autosave"));

        let failures = Arc::new(Mutex::new(0usize));
        let failures_cb = Arc::clone(&failures);
        let mut auto = AutoBackup::start(backups, Duration::from_millis(10), move |r| {
            if r.is_err() {
                *failures_cb.lock().unwrap() += 1;
            }
        });

        thread::sleep(Duration::from_millis(100));
        assert!(auto.is_running());
        assert_eq!(auto.stop(), 0);
        assert!(*failures.lock().unwrap() >= 2);
    }
}
