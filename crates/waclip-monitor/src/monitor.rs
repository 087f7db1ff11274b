//! The clipboard dispatch loop.
//!
//! A [`Monitor`] owns the state shared between the polling worker and the
//! control surface: settings, the set of numbers already dispatched, and the
//! last clipboard snapshot. Cycles run one after another on a single worker
//! thread; a stop request is observed between cycles, never inside one.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use waclip_config::Settings;
use waclip_core::{Detection, PatternSet};

use crate::activity::{Activity, ActivityLine, Notifier};
use crate::clipboard::ClipboardSource;
use crate::launcher::Launcher;
use crate::opener::{open_chat, OpenOptions, OpenOutcome};
use crate::{MonitorError, Result};

pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Unchanged,
    Blank,
    NoNumber,
    SkippedExtraText,
    SkippedDuplicate(String),
    Dispatched(OpenOutcome),
    OpenFailed { number: String, reason: String },
}

#[derive(Debug)]
pub struct MonitorShared {
    settings: RwLock<Settings>,
    message_override: RwLock<Option<String>>,
    seen: Mutex<HashSet<String>>,
    snapshot: Mutex<String>,
}

impl MonitorShared {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            message_override: RwLock::new(None),
            seen: Mutex::new(HashSet::new()),
            snapshot: Mutex::new(String::new()),
        }
    }

    pub fn settings(&self) -> Settings {
        read(&self.settings).clone()
    }

    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        update(&mut write(&self.settings));
    }

    pub fn replace_settings(&self, settings: Settings) {
        *write(&self.settings) = settings;
    }

    /// Unsaved message from the control surface; blank values are ignored.
    pub fn set_message_override(&self, message: Option<String>) {
        *write(&self.message_override) = message;
    }

    pub fn message(&self) -> String {
        if let Some(message) = read(&self.message_override).as_deref() {
            let trimmed = message.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        read(&self.settings).default_message.clone()
    }

    /// Swaps in an empty set. A cycle that already checked the old set is
    /// not affected.
    pub fn clear_seen(&self) {
        let _previous = std::mem::take(&mut *lock(&self.seen));
    }

    pub fn seen_count(&self) -> usize {
        lock(&self.seen).len()
    }

    pub fn has_seen(&self, number: &str) -> bool {
        lock(&self.seen).contains(number)
    }

    pub fn snapshot(&self) -> String {
        lock(&self.snapshot).clone()
    }
}

/// Runs one polling cycle: read, compare with the snapshot, classify,
/// dedupe, then open the chat.
pub fn run_cycle(
    shared: &MonitorShared,
    patterns: &PatternSet,
    clipboard: &mut dyn ClipboardSource,
    launcher: &dyn Launcher,
    notifier: &dyn Notifier,
) -> Result<CycleOutcome> {
    let text = clipboard.read_text()?;
    if text.trim().is_empty() {
        return Ok(CycleOutcome::Blank);
    }
    {
        let mut snapshot = lock(&shared.snapshot);
        if *snapshot == text {
            return Ok(CycleOutcome::Unchanged);
        }
        snapshot.clone_from(&text);
    }

    let settings = shared.settings();
    let number = match patterns.classify(&text, settings.numbers_only_mode) {
        Detection::NoNumber => return Ok(CycleOutcome::NoNumber),
        Detection::ExtraText => {
            emit(notifier, Activity::SkippedExtraText);
            return Ok(CycleOutcome::SkippedExtraText);
        }
        Detection::Number(number) => number,
    };

    {
        let mut seen = lock(&shared.seen);
        if settings.avoid_duplicates && seen.contains(&number) {
            drop(seen);
            emit(
                notifier,
                Activity::SkippedDuplicate {
                    number: number.clone(),
                },
            );
            return Ok(CycleOutcome::SkippedDuplicate(number));
        }
        // recorded before dispatch so a second detection of the same value
        // is already a duplicate
        seen.insert(number.clone());
    }

    emit(
        notifier,
        Activity::Detected {
            number: number.clone(),
        },
    );

    let message = shared.message();
    let options = OpenOptions::from(&settings);
    let mut forward = |activity: Activity| emit(notifier, activity);
    match open_chat(launcher, &number, &message, options, &mut forward) {
        Ok(outcome) => Ok(CycleOutcome::Dispatched(outcome)),
        Err(err) => {
            let reason = err.to_string();
            emit(
                notifier,
                Activity::OpenFailed {
                    number: number.clone(),
                    reason: reason.clone(),
                },
            );
            Ok(CycleOutcome::OpenFailed { number, reason })
        }
    }
}

fn emit(notifier: &dyn Notifier, activity: Activity) {
    activity.trace();
    notifier.notify(&ActivityLine::now(activity));
}

pub struct Monitor<C, L> {
    shared: Arc<MonitorShared>,
    patterns: Arc<PatternSet>,
    clipboard: Arc<Mutex<C>>,
    launcher: Arc<L>,
    notifier: Arc<dyn Notifier>,
    error_backoff: Duration,
    worker: Option<Worker>,
    retired: Option<JoinHandle<()>>,
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl<C, L> Monitor<C, L>
where
    C: ClipboardSource + Send + 'static,
    L: Launcher + Send + Sync + 'static,
{
    pub fn new(settings: Settings, clipboard: C, launcher: L, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            shared: Arc::new(MonitorShared::new(settings)),
            patterns: Arc::new(PatternSet::default()),
            clipboard: Arc::new(Mutex::new(clipboard)),
            launcher: Arc::new(launcher),
            notifier,
            error_backoff: DEFAULT_ERROR_BACKOFF,
            worker: None,
            retired: None,
        }
    }

    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = Arc::new(patterns);
        self
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn shared(&self) -> &Arc<MonitorShared> {
        &self.shared
    }

    pub fn state(&self) -> MonitorState {
        if self.worker.is_some() {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    /// Spawns the polling worker. Returns `false` when already running.
    pub fn start(&mut self) -> Result<bool> {
        if self.worker.is_some() {
            return Ok(false);
        }
        if let Some(previous) = self.retired.take() {
            join_worker(previous);
        }

        let (stop, stop_rx) = mpsc::channel();
        let context = WorkerContext {
            shared: Arc::clone(&self.shared),
            patterns: Arc::clone(&self.patterns),
            clipboard: Arc::clone(&self.clipboard),
            launcher: Arc::clone(&self.launcher),
            notifier: Arc::clone(&self.notifier),
            error_backoff: self.error_backoff,
        };
        emit(self.notifier.as_ref(), Activity::MonitorStarted);
        let handle = thread::Builder::new()
            .name("waclip-monitor".to_string())
            .spawn(move || context.run(stop_rx))?;
        self.worker = Some(Worker { stop, handle });
        Ok(true)
    }

    /// Asks the worker to exit after its current cycle. Returns `false` when
    /// already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return false;
        };
        let _ = worker.stop.send(());
        self.retired = Some(worker.handle);
        emit(self.notifier.as_ref(), Activity::MonitorStopped);
        true
    }

    /// Stops and waits for the worker to finish its current cycle.
    pub fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.retired.take() {
            join_worker(handle);
        }
    }

    /// Blocks until the worker exits. Returns at once when stopped.
    pub fn wait(mut self) -> Result<()> {
        let joined = match self.worker.take() {
            Some(Worker { stop, handle }) => {
                let joined = handle.join();
                drop(stop);
                joined
            }
            None => match self.retired.take() {
                Some(handle) => handle.join(),
                None => return Ok(()),
            },
        };
        joined.map_err(|payload| MonitorError::Panicked(panic_message(payload.as_ref())))
    }

    /// Runs a single cycle on the calling thread. Serialised with the worker
    /// through the clipboard lock.
    pub fn poll_once(&self) -> Result<CycleOutcome> {
        let mut clipboard = lock(&self.clipboard);
        run_cycle(
            &self.shared,
            &self.patterns,
            &mut *clipboard,
            self.launcher.as_ref(),
            self.notifier.as_ref(),
        )
    }

    pub fn clear_duplicates(&self) {
        self.shared.clear_seen();
        emit(self.notifier.as_ref(), Activity::DuplicatesCleared);
    }

    pub fn seen_count(&self) -> usize {
        self.shared.seen_count()
    }

    pub fn settings(&self) -> Settings {
        self.shared.settings()
    }

    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        self.shared.update_settings(update);
    }

    pub fn set_message_override(&self, message: Option<String>) {
        self.shared.set_message_override(message);
    }

    pub fn notify(&self, activity: Activity) {
        emit(self.notifier.as_ref(), activity);
    }
}

impl<C, L> Drop for Monitor<C, L> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
        }
    }
}

struct WorkerContext<C, L> {
    shared: Arc<MonitorShared>,
    patterns: Arc<PatternSet>,
    clipboard: Arc<Mutex<C>>,
    launcher: Arc<L>,
    notifier: Arc<dyn Notifier>,
    error_backoff: Duration,
}

impl<C, L> WorkerContext<C, L>
where
    C: ClipboardSource,
    L: Launcher,
{
    fn run(self, stop: Receiver<()>) {
        tracing::debug!("monitor worker started");
        loop {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut clipboard = lock(&self.clipboard);
                run_cycle(
                    &self.shared,
                    &self.patterns,
                    &mut *clipboard,
                    self.launcher.as_ref(),
                    self.notifier.as_ref(),
                )
            }));

            let wait = match result {
                Ok(Ok(_)) => self.shared.settings().poll_interval(),
                Ok(Err(err)) => self.fail(err),
                Err(payload) => self.fail(MonitorError::Panicked(panic_message(payload.as_ref()))),
            };

            match stop.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("monitor worker exited");
    }

    fn fail(&self, err: MonitorError) -> Duration {
        emit(
            self.notifier.as_ref(),
            Activity::CycleFailed {
                reason: err.to_string(),
            },
        );
        self.error_backoff
    }
}

fn join_worker(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        tracing::warn!("monitor worker panicked");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("monitor state lock poisoned, continuing with recovered data");
            poisoned.into_inner()
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
