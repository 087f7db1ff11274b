use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use waclip_config::Settings;
use waclip_core::PatternSet;
use waclip_monitor::{
    run_cycle, Activity, ActivityLog, ClipboardSource, CycleOutcome, Launcher, Monitor,
    MonitorError, MonitorShared, MonitorState, OpenKind, Result,
};

/// Plays back scripted reads, then keeps returning the last text.
#[derive(Default)]
struct ScriptedClipboard {
    script: VecDeque<std::result::Result<String, String>>,
    last: String,
}

impl ScriptedClipboard {
    fn new(items: &[&str]) -> Self {
        Self {
            script: items.iter().map(|item| Ok(item.to_string())).collect(),
            last: String::new(),
        }
    }

    fn failing_then(failures: usize, text: &str) -> Self {
        let mut script: VecDeque<_> = (0..failures)
            .map(|_| Err("clipboard locked".to_string()))
            .collect();
        script.push_back(Ok(text.to_string()));
        Self {
            script,
            last: String::new(),
        }
    }
}

impl ClipboardSource for ScriptedClipboard {
    fn read_text(&mut self) -> Result<String> {
        match self.script.pop_front() {
            Some(Ok(text)) => {
                self.last = text.clone();
                Ok(text)
            }
            Some(Err(message)) => Err(MonitorError::Clipboard(message)),
            None => Ok(self.last.clone()),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingLauncher {
    targets: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingLauncher {
    fn targets(&self) -> Vec<String> {
        self.targets.lock().expect("targets").clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        self.targets.lock().expect("targets").push(target.to_string());
        if self.fail {
            return Err(MonitorError::Launch {
                target: target.to_string(),
                message: "no browser".to_string(),
            });
        }
        Ok(())
    }
}

fn drive(
    settings: Settings,
    clipboard: &mut ScriptedClipboard,
    launcher: &RecordingLauncher,
    log: &ActivityLog,
    cycles: usize,
) -> (MonitorShared, Vec<CycleOutcome>) {
    let shared = MonitorShared::new(settings);
    let outcomes = (0..cycles)
        .map(|_| {
            run_cycle(&shared, PatternSet::default_set(), &mut *clipboard, launcher, log)
                .expect("cycle")
        })
        .collect();
    (shared, outcomes)
}

fn activity_texts(log: &ActivityLog) -> Vec<String> {
    log.lines()
        .into_iter()
        .map(|line| line.activity.to_string())
        .collect()
}

#[test]
fn duplicate_number_opens_once_when_avoiding_duplicates() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890", "hello", "+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();

    let (shared, outcomes) = drive(Settings::default(), &mut clipboard, &launcher, &log, 3);

    assert_eq!(launcher.targets().len(), 1);
    assert!(matches!(outcomes[0], CycleOutcome::Dispatched(_)));
    assert_eq!(outcomes[1], CycleOutcome::NoNumber);
    assert_eq!(
        outcomes[2],
        CycleOutcome::SkippedDuplicate("+1234567890".to_string())
    );
    assert!(shared.has_seen("+1234567890"));
    assert!(activity_texts(&log).contains(&"Skipping duplicate: +1234567890".to_string()));
}

#[test]
fn duplicate_number_opens_twice_when_duplicates_allowed() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890", "hello", "+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let settings = Settings {
        avoid_duplicates: false,
        ..Settings::default()
    };

    drive(settings, &mut clipboard, &launcher, &log, 3);

    assert_eq!(launcher.targets().len(), 2);
}

#[test]
fn unchanged_clipboard_is_not_processed_again() {
    let mut clipboard = ScriptedClipboard::new(&["(234) 567-8900"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let settings = Settings {
        avoid_duplicates: false,
        ..Settings::default()
    };

    let (shared, outcomes) = drive(settings, &mut clipboard, &launcher, &log, 3);

    assert!(matches!(outcomes[0], CycleOutcome::Dispatched(_)));
    assert_eq!(outcomes[1], CycleOutcome::Unchanged);
    assert_eq!(outcomes[2], CycleOutcome::Unchanged);
    assert_eq!(
        launcher.targets(),
        vec!["https://wa.me/12345678900?text=Hello%21%20I%20got%20your%20number%20and%20wanted%20to%20reach%20out.".to_string()]
    );
    assert_eq!(shared.snapshot(), "(234) 567-8900");
}

#[test]
fn blank_clipboard_keeps_previous_snapshot() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890", "   ", "+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let settings = Settings {
        avoid_duplicates: false,
        ..Settings::default()
    };

    let (_, outcomes) = drive(settings, &mut clipboard, &launcher, &log, 3);

    assert_eq!(outcomes[1], CycleOutcome::Blank);
    assert_eq!(outcomes[2], CycleOutcome::Unchanged);
    assert_eq!(launcher.targets().len(), 1);
}

#[test]
fn strict_mode_skips_numbers_inside_prose() {
    let mut clipboard = ScriptedClipboard::new(&["Call me at +1234567890", "+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let settings = Settings {
        numbers_only_mode: true,
        ..Settings::default()
    };

    let (_, outcomes) = drive(settings, &mut clipboard, &launcher, &log, 2);

    assert_eq!(outcomes[0], CycleOutcome::SkippedExtraText);
    assert!(matches!(outcomes[1], CycleOutcome::Dispatched(_)));
    assert_eq!(launcher.targets().len(), 1);
    assert_eq!(
        activity_texts(&log)[0],
        "Skipped: clipboard has extra text (numbers only mode)"
    );
}

#[test]
fn notifications_follow_cycle_order() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();

    drive(Settings::default(), &mut clipboard, &launcher, &log, 1);

    let activities: Vec<Activity> = log.lines().into_iter().map(|line| line.activity).collect();
    assert_eq!(
        activities,
        vec![
            Activity::Detected {
                number: "+1234567890".to_string()
            },
            Activity::OpenedWeb {
                number: "+1234567890".to_string()
            },
        ]
    );
}

#[test]
fn message_override_wins_over_saved_message() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let shared = MonitorShared::new(Settings::default());
    shared.set_message_override(Some("  Quick question  ".to_string()));

    run_cycle(
        &shared,
        PatternSet::default_set(),
        &mut clipboard,
        &launcher,
        &log,
    )
    .expect("cycle");

    assert_eq!(
        launcher.targets(),
        vec!["https://wa.me/1234567890?text=Quick%20question".to_string()]
    );
}

#[test]
fn blank_override_falls_back_to_saved_message() {
    let shared = MonitorShared::new(Settings {
        default_message: "Saved".to_string(),
        ..Settings::default()
    });
    shared.set_message_override(Some("   ".to_string()));
    assert_eq!(shared.message(), "Saved");
}

#[test]
fn disabled_auto_open_reports_url_only() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890"]);
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let settings = Settings {
        auto_open_browser: false,
        default_message: "Hi".to_string(),
        ..Settings::default()
    };

    let (_, outcomes) = drive(settings, &mut clipboard, &launcher, &log, 1);

    match &outcomes[0] {
        CycleOutcome::Dispatched(outcome) => {
            assert_eq!(outcome.kind, OpenKind::Surfaced);
            assert_eq!(outcome.target, "https://wa.me/1234567890?text=Hi");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(launcher.targets().is_empty());
}

#[test]
fn open_failure_keeps_number_marked_as_seen() {
    let mut clipboard = ScriptedClipboard::new(&["+1234567890"]);
    let launcher = RecordingLauncher {
        fail: true,
        ..RecordingLauncher::default()
    };
    let log = ActivityLog::default();

    let (shared, outcomes) = drive(Settings::default(), &mut clipboard, &launcher, &log, 1);

    assert!(matches!(outcomes[0], CycleOutcome::OpenFailed { .. }));
    assert!(shared.has_seen("+1234567890"));
    assert!(log.lines().last().expect("line").activity.is_failure());
}

#[test]
fn clipboard_failure_aborts_cycle() {
    let mut clipboard = ScriptedClipboard::failing_then(1, "+1234567890");
    let launcher = RecordingLauncher::default();
    let log = ActivityLog::default();
    let shared = MonitorShared::new(Settings::default());

    let err = run_cycle(
        &shared,
        PatternSet::default_set(),
        &mut clipboard,
        &launcher,
        &log,
    )
    .unwrap_err();
    assert!(matches!(err, MonitorError::Clipboard(_)));
    assert!(launcher.targets().is_empty());
}

#[test]
fn clearing_duplicates_allows_dispatch_again() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let monitor = Monitor::new(
        Settings::default(),
        ScriptedClipboard::new(&["+1234567890", "other", "+1234567890", "x", "+1234567890"]),
        launcher.clone(),
        log.clone(),
    );

    for _ in 0..3 {
        monitor.poll_once().expect("cycle");
    }
    assert_eq!(launcher.targets().len(), 1);
    assert_eq!(monitor.seen_count(), 1);

    monitor.clear_duplicates();
    assert_eq!(monitor.seen_count(), 0);
    monitor.poll_once().expect("cycle");
    monitor.poll_once().expect("cycle");
    assert_eq!(launcher.targets().len(), 2);
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn worker_dispatches_and_stops_on_request() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let settings = Settings {
        check_interval: 0.1,
        ..Settings::default()
    };
    let mut monitor = Monitor::new(
        settings,
        ScriptedClipboard::new(&["+1234567890"]),
        launcher.clone(),
        log.clone(),
    );

    assert_eq!(monitor.state(), MonitorState::Stopped);
    assert!(monitor.start().expect("start"));
    assert!(!monitor.start().expect("second start"));
    assert_eq!(monitor.state(), MonitorState::Running);

    assert!(wait_for(|| launcher.targets().len() == 1));

    assert!(monitor.stop());
    assert!(!monitor.stop());
    assert_eq!(monitor.state(), MonitorState::Stopped);
    monitor.shutdown();

    let texts = activity_texts(&log);
    assert_eq!(texts.first().map(String::as_str), Some("Started clipboard monitoring"));
    assert_eq!(texts.last().map(String::as_str), Some("Clipboard monitoring stopped"));
    assert_eq!(launcher.targets().len(), 1);
}

#[test]
fn worker_survives_failing_cycles() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let settings = Settings {
        check_interval: 0.1,
        ..Settings::default()
    };
    let mut monitor = Monitor::new(
        settings,
        ScriptedClipboard::failing_then(2, "+1234567890"),
        launcher.clone(),
        log.clone(),
    )
    .with_error_backoff(Duration::from_millis(10));

    monitor.start().expect("start");
    assert!(wait_for(|| launcher.targets().len() == 1));
    monitor.shutdown();

    let failures = log
        .lines()
        .into_iter()
        .filter(|line| matches!(line.activity, Activity::CycleFailed { .. }))
        .count();
    assert_eq!(failures, 2);
}

#[test]
fn settings_changes_apply_without_restart() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let monitor = Monitor::new(
        Settings::default(),
        ScriptedClipboard::new(&["Call +1234567890", "Call +1987654321"]),
        launcher.clone(),
        log,
    );

    assert!(matches!(
        monitor.poll_once().expect("cycle"),
        CycleOutcome::Dispatched(_)
    ));
    monitor.update_settings(|settings| settings.numbers_only_mode = true);
    assert_eq!(
        monitor.poll_once().expect("cycle"),
        CycleOutcome::SkippedExtraText
    );
}

#[test]
fn restart_does_not_retrigger_on_unchanged_clipboard() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let settings = Settings {
        check_interval: 0.1,
        avoid_duplicates: false,
        ..Settings::default()
    };
    let mut monitor = Monitor::new(
        settings,
        ScriptedClipboard::new(&["+1234567890"]),
        launcher.clone(),
        log,
    );

    monitor.start().expect("start");
    assert!(wait_for(|| launcher.targets().len() == 1));
    assert!(monitor.stop());

    assert!(monitor.start().expect("restart"));
    thread::sleep(Duration::from_millis(400));
    monitor.shutdown();

    assert_eq!(launcher.targets().len(), 1);
}

#[test]
fn huge_interval_keeps_worker_alive_and_stoppable() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let settings = Settings {
        check_interval: 1e300,
        ..Settings::default()
    };
    let mut monitor = Monitor::new(
        settings,
        ScriptedClipboard::new(&["+1234567890"]),
        launcher.clone(),
        log.clone(),
    );

    monitor.start().expect("start");
    assert!(wait_for(|| launcher.targets().len() == 1));
    assert_eq!(monitor.state(), MonitorState::Running);

    let stopped_at = Instant::now();
    monitor.shutdown();
    assert!(stopped_at.elapsed() < Duration::from_secs(5));
    assert!(!log
        .lines()
        .iter()
        .any(|line| matches!(line.activity, Activity::CycleFailed { .. })));
}

#[test]
fn wait_returns_once_the_worker_has_exited() {
    let launcher = RecordingLauncher::default();
    let log = Arc::new(ActivityLog::default());
    let idle = Monitor::new(
        Settings::default(),
        ScriptedClipboard::new(&[]),
        launcher.clone(),
        log.clone(),
    );
    idle.wait().expect("wait on idle monitor");

    let settings = Settings {
        check_interval: 0.1,
        ..Settings::default()
    };
    let mut monitor = Monitor::new(
        settings,
        ScriptedClipboard::new(&["+1234567890"]),
        launcher.clone(),
        log,
    );
    monitor.start().expect("start");
    assert!(wait_for(|| launcher.targets().len() == 1));
    assert!(monitor.stop());

    let started = Instant::now();
    monitor.wait().expect("wait on stopped monitor");
    assert!(started.elapsed() < Duration::from_secs(5));
}
