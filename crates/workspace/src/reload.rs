//! Out-of-band reload requests: SIGUSR1 and config file changes.
//!
//! Both arrive on other threads and are funneled through one channel that
//! the window drains on the foreground executor, so a reload always runs on
//! the UI thread, between events, through the same method as the keybinding.

use gpui::{App, Task};
use notify::RecommendedWatcher;
use notify_debouncer_mini::Debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tokio::task::JoinError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTrigger {
    Signal,
    FileChanged,
}

pub struct ReloadSources {
    tx: Sender<ReloadTrigger>,
    rx: Receiver<ReloadTrigger>,
    watched: Option<PathBuf>,
    watcher: Option<Debouncer<RecommendedWatcher>>,
    _signal_task: Option<Task<Result<(), JoinError>>>,
}

impl ReloadSources {
    /// A channel with no sources attached.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            watched: None,
            watcher: None,
            _signal_task: None,
        }
    }

    pub fn sender(&self) -> Sender<ReloadTrigger> {
        self.tx.clone()
    }

    /// Listen for SIGUSR1 on the Tokio runtime.
    #[cfg(unix)]
    pub fn listen_for_signal(&mut self, cx: &App) {
        use tokio::signal::unix::{signal, SignalKind};

        if !gpui_tokio::is_initialized(cx) {
            tracing::warn!("no async runtime, SIGUSR1 reload disabled");
            return;
        }
        let tx = self.sender();
        let task = gpui_tokio::spawn(cx, async move {
            let mut stream = match signal(SignalKind::user_defined1()) {
                Ok(stream) => stream,
                Err(error) => {
                    tracing::warn!(%error, "failed to install SIGUSR1 handler");
                    return;
                }
            };
            while stream.recv().await.is_some() {
                tracing::debug!("SIGUSR1 received");
                if tx.send(ReloadTrigger::Signal).is_err() {
                    break;
                }
            }
        });
        self._signal_task = Some(task);
    }

    #[cfg(not(unix))]
    pub fn listen_for_signal(&mut self, _cx: &App) {}

    /// Watch `path`, replacing any previous watch. No-op if it is already watched.
    pub fn watch(&mut self, path: &Path) {
        if self.watched.as_deref() == Some(path) {
            return;
        }
        let tx = self.sender();
        self.watcher = settings::watch_config_file(path, move || {
            let _ = tx.send(ReloadTrigger::FileChanged);
        });
        self.watched = self.watcher.as_ref().map(|_| path.to_path_buf());
    }

    pub fn watched(&self) -> Option<&Path> {
        self.watched.as_deref()
    }

    /// Drain pending requests. Any number of them collapse into one reload.
    pub fn take_pending(&self) -> Option<ReloadTrigger> {
        let mut pending = None;
        loop {
            match self.rx.try_recv() {
                Ok(trigger) => pending = Some(trigger),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return pending,
            }
        }
    }
}

impl Default for ReloadSources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn pending_requests_collapse() {
        let sources = ReloadSources::new();
        assert_eq!(sources.take_pending(), None);

        let tx = sources.sender();
        tx.send(ReloadTrigger::FileChanged).unwrap();
        tx.send(ReloadTrigger::Signal).unwrap();
        assert_eq!(sources.take_pending(), Some(ReloadTrigger::Signal));
        assert_eq!(sources.take_pending(), None);
    }

    #[test]
    fn watching_the_same_path_twice_keeps_the_watch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[options]\n").unwrap();

        let mut sources = ReloadSources::new();
        sources.watch(&path);
        assert_eq!(sources.watched(), Some(path.as_path()));
        sources.watch(&path);
        assert_eq!(sources.watched(), Some(path.as_path()));
    }
}
