// Watch-and-regenerate controller.
//
// A background thread owns the `notify` watcher and forwards matching change
// events over a single-slot channel. Everything else (debounce, settle delay,
// reload/generate/save) happens on whichever thread calls `tick`, which in the
// app is the main thread. The controller never touches the session from the
// background thread.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bevy::log::{debug, info, warn};
use notify::{EventKind, RecursiveMode, Watcher};

use super::debounce::Debouncer;
use crate::core::config::SdfConfig;
use crate::core::error::SdfError;
use crate::core::session::{SaveOutcome, SdfSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
}

/// One change notification, stamped on the notifier thread.
#[derive(Debug, Clone, Copy)]
pub struct WatchSignal {
    pub at: Instant,
}

/// Result of one automatic regeneration cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Regenerated { saved: Option<PathBuf> },
    Failed(String),
}

/// A live listener on one file. Dropping it stops and joins the notifier thread.
struct WatchSession {
    path: PathBuf,
    rx: Receiver<WatchSignal>,
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl WatchSession {
    fn spawn(path: &Path) -> Result<Self, SdfError> {
        let (tx, rx) = mpsc::sync_channel::<WatchSignal>(1);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let target = path.to_path_buf();
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let thread = std::thread::Builder::new()
            .name("sdf-watch".into())
            .spawn(move || {
                let file_name = target.file_name().map(|n| n.to_os_string());
                let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                    match res {
                        Ok(ev) => {
                            // Editors that save via temp file + rename show up as Create.
                            if !matches!(ev.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                                return;
                            }
                            let hit = ev
                                .paths
                                .iter()
                                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                            if hit {
                                forward(&tx, WatchSignal { at: Instant::now() });
                            }
                        }
                        Err(e) => warn!(target: "watch", "notify error: {e}"),
                    }
                });
                let mut watcher = match watcher {
                    Ok(w) => w,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                // Watch the directory, not the file, so rename-style saves keep working.
                if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
                    let _ = ready_tx.send(Err(format!("{}: {e}", dir.display())));
                    return;
                }
                let _ = ready_tx.send(Ok(()));
                // Parked until stop is requested or the session is dropped.
                let _ = stop_rx.recv();
                drop(watcher);
            })
            .map_err(|e| SdfError::Watch(e.to_string()))?;

        let ready = ready_rx
            .recv()
            .unwrap_or_else(|_| Err("watcher thread exited during setup".into()));
        match ready {
            Ok(()) => Ok(Self {
                path: path.to_path_buf(),
                rx,
                stop_tx,
                thread: Some(thread),
            }),
            Err(e) => {
                let _ = thread.join();
                Err(SdfError::Watch(e))
            }
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!(target: "watch", "watcher thread panicked during shutdown");
            }
        }
    }
}

fn forward(tx: &SyncSender<WatchSignal>, signal: WatchSignal) {
    // Full: an undrained signal is already waiting, this one is coalesced into it.
    // Disconnected: the controller is tearing the session down.
    let _ = tx.try_send(signal);
}

/// Owns at most one watch session plus the debounce / settle bookkeeping.
pub struct WatchController {
    session: Option<WatchSession>,
    debouncer: Debouncer,
    settle: Duration,
    pending: Option<Instant>,
}

impl WatchController {
    pub fn new(debounce: Duration, settle: Duration) -> Self {
        Self {
            session: None,
            debouncer: Debouncer::new(debounce),
            settle,
            pending: None,
        }
    }

    pub fn from_config(cfg: &SdfConfig) -> Self {
        Self::new(cfg.debounce(), cfg.settle())
    }

    pub fn state(&self) -> WatchState {
        if self.session.is_some() {
            WatchState::Watching
        } else {
            WatchState::Idle
        }
    }

    pub fn is_watching(&self) -> bool {
        self.state() == WatchState::Watching
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.path.as_path())
    }

    /// Begin watching `path`, replacing any current session. A missing path
    /// leaves the controller Idle.
    pub fn start(&mut self, path: impl AsRef<Path>) -> Result<(), SdfError> {
        let path = path.as_ref();
        self.stop();
        if !path.is_file() {
            return Err(SdfError::invalid_path(path, "gradient image does not exist"));
        }
        self.session = Some(WatchSession::spawn(path)?);
        info!(target: "watch", "watching {}", path.display());
        Ok(())
    }

    /// Tear down the current session (joins the notifier thread). No-op when Idle.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            let path = session.path.clone();
            drop(session);
            info!(target: "watch", "stopped watching {}", path.display());
        }
        self.pending = None;
        self.debouncer.reset();
    }

    /// Feed one change observed at `at` through the debouncer. An accepted
    /// change (re)arms the settle deadline; a regeneration already waiting is
    /// pushed back rather than queued twice.
    pub fn notify_change(&mut self, at: Instant) -> bool {
        if !self.debouncer.accept(at) {
            debug!(target: "watch", "change debounced");
            return false;
        }
        self.pending = Some(at + self.settle);
        true
    }

    /// Drain signals delivered by the notifier thread. Returns how many were accepted.
    pub fn pump(&mut self) -> usize {
        let signals: Vec<Instant> = match &self.session {
            Some(s) => s.rx.try_iter().map(|s| s.at).collect(),
            None => return 0,
        };
        signals.into_iter().filter(|at| self.notify_change(*at)).count()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Claim the pending regeneration once its settle deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(due) if now >= due => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// One foreground step: drain notifications, and if a regeneration is due
    /// run it against `session`. Failures are logged and reported, never
    /// propagated; the controller keeps watching either way.
    pub fn tick(&mut self, session: &mut SdfSession, output: Option<&Path>, now: Instant) -> Option<CycleReport> {
        self.pump();
        if !self.take_due(now) {
            return None;
        }
        let source = self
            .watched_path()
            .or_else(|| session.source_path())
            .map(Path::to_path_buf);
        let report = match source {
            Some(src) => match regenerate(session, &src, output) {
                Ok(saved) => {
                    match &saved {
                        Some(p) => info!(target: "watch", "auto-update: regenerated and saved {}", p.display()),
                        None => info!(target: "watch", "auto-update: regenerated (no output path set)"),
                    }
                    CycleReport::Regenerated { saved }
                }
                Err(e) => {
                    warn!(target: "watch", "auto-update failed: {e}");
                    CycleReport::Failed(e.to_string())
                }
            },
            None => {
                warn!(target: "watch", "auto-update fired without a source path");
                CycleReport::Failed("no source path".into())
            }
        };
        Some(report)
    }
}

impl Default for WatchController {
    fn default() -> Self {
        Self::from_config(&SdfConfig::default())
    }
}

/// Reload `source`, generate, and (if given) write `output`, overwriting.
/// Returns the path actually written.
pub fn regenerate(session: &mut SdfSession, source: &Path, output: Option<&Path>) -> Result<Option<PathBuf>, SdfError> {
    session.load_source(source)?;
    session.generate()?;
    let Some(out) = output else {
        return Ok(None);
    };
    match session.save(out, false)? {
        SaveOutcome::Written(p) => Ok(Some(p)),
        SaveOutcome::NeedsConfirmation(p) => Err(SdfError::invalid_path(p, "output exists and was not overwritten")),
    }
}
