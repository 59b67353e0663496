//! Integration tests for `Lumina`
//!
//! Drives the public API end to end: the one-shot CLI against a simulated
//! display set, and the tray presenter fed with menu and hotkey events,
//! including events delivered from another thread.

#![expect(clippy::unwrap_used, reason = "Tests use .unwrap() for brevity")]

use clap::Parser;
use lumina::{
    brightness::{BrightnessController, BrightnessWrite, InMemoryBackend},
    cli::{self, Cli, CliOutcome},
    config::{AppConfig, HotkeyBinding},
    error::{LuminaError, Result, get_user_friendly_error},
    tray::{
        HotkeyRegistry, PresenterState, TrayAction, TrayEvent, TrayMenuState, TrayPresenter,
        TrayShell,
    },
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct ShellLog {
    menus: Vec<String>,
    notifications: Vec<String>,
    stopped: bool,
}

#[derive(Clone, Default)]
struct FakeShell(Arc<Mutex<ShellLog>>);

impl TrayShell for FakeShell {
    fn show_menu(&mut self, menu: &TrayMenuState) -> Result<()> {
        self.0.lock().menus.push(menu.current_label().to_string());
        Ok(())
    }

    fn notify(&mut self, _title: &str, message: &str) -> Result<()> {
        self.0.lock().notifications.push(message.to_string());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.0.lock().stopped = true;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FakeHotkeys(Arc<Mutex<Vec<String>>>);

impl HotkeyRegistry for FakeHotkeys {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<()> {
        self.0.lock().push(binding.accelerator.clone());
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        self.0.lock().clear();
        Ok(())
    }
}

fn run_cli(
    args: &[&str],
    controller: &BrightnessController<InMemoryBackend>,
) -> (CliOutcome, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let outcome = cli::run_one_shot(&cli, controller, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

/// Setting brightness leaves the built-in panel alone and averages the rest
#[test]
fn test_cli_set_then_get_ignores_builtin_panel() {
    let controller = BrightnessController::new(InMemoryBackend::new(vec![80, 40, 60]));

    let (outcome, output) = run_cli(&["lumina", "--get"], &controller);
    assert_eq!(outcome, CliOutcome::Completed);
    assert_eq!(output.trim(), "Current brightness: 50%");

    let (outcome, output) = run_cli(&["lumina", "30"], &controller);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(output.trim(), "Brightness set to: 30%");
    assert_eq!(controller.backend().displays(), vec![80, 30, 30]);

    let (_, output) = run_cli(&["lumina", "--get"], &controller);
    assert_eq!(output.trim(), "Current brightness: 30%");
}

/// With no positional argument the CLI applies the default level
#[test]
fn test_cli_default_brightness() {
    let controller = BrightnessController::new(InMemoryBackend::new(vec![100, 70]));

    let (outcome, _) = run_cli(&["lumina"], &controller);

    assert_eq!(outcome, CliOutcome::Completed);
    assert_eq!(controller.backend().displays(), vec![100, 5]);
}

/// Out-of-range input is rejected without touching any display
#[test]
fn test_cli_rejects_out_of_range_without_platform_call() {
    for value in ["150", "-1", "101"] {
        let controller = BrightnessController::new(InMemoryBackend::new(vec![80, 40]));

        let (outcome, output) = run_cli(&["lumina", value], &controller);

        assert_eq!(outcome.exit_code(), 1, "value {value}");
        assert_eq!(output.trim(), "Error: Brightness must be between 0-100");
        assert_eq!(controller.backend().read_count(), 0);
        assert!(controller.backend().writes().is_empty());
    }
}

/// `--get` wins over an invalid positional value
#[test]
fn test_cli_get_ignores_positional_value() {
    let controller = BrightnessController::new(InMemoryBackend::scalar(42));

    let (outcome, output) = run_cli(&["lumina", "--get", "150"], &controller);

    assert_eq!(outcome, CliOutcome::Completed);
    assert_eq!(output.trim(), "Current brightness: 42%");
}

/// A transient write failure is retried once as a uniform write
#[test]
fn test_cli_set_survives_single_write_failure() {
    let controller = BrightnessController::new(InMemoryBackend::new(vec![80, 40, 60]));
    controller.backend().fail_next_writes(1);

    let (outcome, _) = run_cli(&["lumina", "50"], &controller);

    assert_eq!(outcome, CliOutcome::Completed);
    assert_eq!(
        controller.backend().writes(),
        vec![
            BrightnessWrite::PerDisplay(vec![80, 50, 50]),
            BrightnessWrite::All(50)
        ]
    );
}

/// A second failure propagates to the caller with a readable message
#[test]
fn test_cli_set_propagates_repeated_write_failure() {
    let controller = BrightnessController::new(InMemoryBackend::new(vec![80, 40]));
    controller.backend().fail_next_writes(2);

    let cli = Cli::try_parse_from(["lumina", "50"]).unwrap();
    let err = cli::run_one_shot(&cli, &controller, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, LuminaError::PlatformWriteError(_)));
    assert!(get_user_friendly_error(&err).contains("DDC/CI"));
}

/// A decrease hotkey lowers brightness, notifies and updates the menu
#[test]
fn test_daemon_decrease_hotkey_updates_menu() {
    let shell = FakeShell::default();
    let hotkeys = FakeHotkeys::default();
    let controller = Arc::new(BrightnessController::new(InMemoryBackend::new(vec![70, 10])));

    let presenter = TrayPresenter::new(
        Arc::clone(&controller),
        shell.clone(),
        hotkeys.clone(),
        AppConfig::default(),
    )
    .unwrap();
    assert_eq!(hotkeys.0.lock().len(), 2);

    presenter
        .run([
            TrayEvent::Hotkey(TrayAction::Decrease),
            TrayEvent::Menu(TrayAction::Exit),
        ])
        .unwrap();

    let log = shell.0.lock();
    assert_eq!(log.notifications, vec!["Decreased brightness: 5%"]);
    assert_eq!(
        log.menus.last().map(String::as_str),
        Some("Current Brightness: 5%")
    );
    assert!(log.stopped);
    assert!(hotkeys.0.lock().is_empty());
    assert_eq!(controller.backend().displays(), vec![70, 5]);
}

/// Menu clicks and hotkeys produce the same outcome
#[test]
fn test_daemon_menu_and_hotkey_are_equivalent() {
    let mut results = Vec::new();

    for event in [
        TrayEvent::Menu(TrayAction::Increase),
        TrayEvent::Hotkey(TrayAction::Increase),
    ] {
        let shell = FakeShell::default();
        let controller = Arc::new(BrightnessController::new(InMemoryBackend::scalar(30)));
        let presenter = TrayPresenter::new(
            Arc::clone(&controller),
            shell.clone(),
            FakeHotkeys::default(),
            AppConfig::default(),
        )
        .unwrap();

        presenter.run([event]).unwrap();

        let notifications = shell.0.lock().notifications.clone();
        results.push((controller.get_brightness().unwrap(), notifications));
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].0, 35);
}

/// A brightness failure is reported and the tray keeps running
#[test]
fn test_daemon_survives_platform_failure() {
    let shell = FakeShell::default();
    let controller = Arc::new(BrightnessController::new(InMemoryBackend::new(vec![70, 40])));
    let mut presenter = TrayPresenter::new(
        Arc::clone(&controller),
        shell.clone(),
        FakeHotkeys::default(),
        AppConfig::default(),
    )
    .unwrap();

    controller.backend().fail_next_writes(2);
    assert!(
        presenter
            .handle_event(TrayEvent::Hotkey(TrayAction::Increase))
            .is_continue()
    );
    assert_eq!(presenter.state(), PresenterState::Running);

    assert!(
        presenter
            .handle_event(TrayEvent::Hotkey(TrayAction::Increase))
            .is_continue()
    );
    assert_eq!(controller.get_brightness().unwrap(), 45);

    let notifications = shell.0.lock().notifications.clone();
    assert!(notifications[0].starts_with("Brightness change failed"));
    assert_eq!(notifications[1], "Increased brightness: 45%");
}

/// Events sent from another thread are handled in order until exit
#[test]
fn test_daemon_events_from_listener_thread() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let shell = FakeShell::default();
    let controller = Arc::new(BrightnessController::new(InMemoryBackend::scalar(50)));

    let presenter = TrayPresenter::new(
        Arc::clone(&controller),
        shell.clone(),
        FakeHotkeys::default(),
        AppConfig::default(),
    )
    .unwrap();
    let event_loop = thread::spawn(move || presenter.run(rx));

    let sender = thread::spawn(move || {
        for action in [TrayAction::Increase, TrayAction::Increase, TrayAction::Decrease] {
            tx.send(TrayEvent::Hotkey(action)).unwrap();
            thread::sleep(Duration::from_millis(5));
        }
        tx.send(TrayEvent::Menu(TrayAction::ShowCurrent)).unwrap();
        tx.send(TrayEvent::Menu(TrayAction::Exit)).unwrap();
        // Ignored: the presenter has already stopped
        let _ = tx.send(TrayEvent::Hotkey(TrayAction::Increase));
    });

    sender.join().unwrap();
    event_loop.join().unwrap().unwrap();

    assert_eq!(controller.get_brightness().unwrap(), 55);
    let log = shell.0.lock();
    assert_eq!(
        log.notifications,
        vec![
            "Increased brightness: 55%",
            "Increased brightness: 60%",
            "Decreased brightness: 55%",
            "Current brightness: 55%",
        ]
    );
    assert!(log.stopped);
}

/// Concurrent hotkey and menu callbacks never lose an update
#[test]
fn test_concurrent_adjustments_are_serialized() {
    let controller = Arc::new(BrightnessController::new(InMemoryBackend::new(vec![100, 0, 0])));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                for _ in 0..5 {
                    controller.increase_brightness(1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(controller.get_brightness().unwrap(), 20);
    assert_eq!(controller.backend().displays(), vec![100, 20, 20]);
}

/// Startup refuses identical increase and decrease hotkeys
#[test]
fn test_daemon_startup_rejects_invalid_config() {
    let mut config = AppConfig::default();
    config.hotkeys.increase = config.hotkeys.decrease.clone();

    let result = TrayPresenter::new(
        Arc::new(BrightnessController::new(InMemoryBackend::scalar(50))),
        FakeShell::default(),
        FakeHotkeys::default(),
        config,
    );

    assert!(matches!(result, Err(LuminaError::ConfigError(_))));
}
