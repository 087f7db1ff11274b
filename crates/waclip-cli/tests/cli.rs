use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn run_cmd(config_path: &Path, args: &[&str]) -> String {
    let output = cargo_bin_cmd!("waclip")
        .args(["--config", config_path.to_str().expect("config path")])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(config_path: &Path, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("waclip")
        .args(["--config", config_path.to_str().expect("config path"), "--json"])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

#[test]
fn check_reports_detection() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("config.json");

    let report = run_cmd_json(&config_path, &["check", "Call me at +1234567890"]);
    assert_eq!(report["contains_number"], true);
    assert_eq!(report["number_only"], false);
    assert_eq!(report["number"], "+1234567890");

    let report = run_cmd_json(&config_path, &["check", "(555) 123-4567"]);
    assert_eq!(report["number_only"], true);
    assert_eq!(report["number"], "+15551234567");

    let text = run_cmd(&config_path, &["check", "12345"]);
    assert!(text.contains("contains number: no"), "{text}");
}

#[test]
fn link_uses_saved_message_and_override() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("config.json");

    run_cmd(&config_path, &["config", "set", "default_message", "Hi there"]);

    let links = run_cmd_json(&config_path, &["link", "5551234567"]);
    assert_eq!(links["number"], "+15551234567");
    assert_eq!(links["web"], "https://wa.me/15551234567?text=Hi%20there");
    assert_eq!(
        links["app"],
        "whatsapp://send?phone=15551234567&text=Hi%20there"
    );

    let text = run_cmd(&config_path, &["link", "5551234567", "--message", "Yo"]);
    assert!(text.contains("web: https://wa.me/15551234567?text=Yo"), "{text}");

    let links = run_cmd_json(&config_path, &["link", "5551234567", "--message", "   "]);
    assert_eq!(links["web"], "https://wa.me/15551234567?text=Hi%20there");
}

#[test]
fn link_without_number_is_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("config.json");

    let output = cargo_bin_cmd!("waclip")
        .args(["--config", config_path.to_str().expect("config path")])
        .args(["link", "12345"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_set_show_reset_round_trip() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("nested").join("config.json");

    let shown = run_cmd_json(&config_path, &["config", "show"]);
    assert_eq!(shown["check_interval"], 1.0);
    assert_eq!(shown["avoid_duplicates"], true);

    run_cmd(&config_path, &["config", "set", "numbers_only_mode", "yes"]);
    run_cmd(&config_path, &["config", "set", "check_interval", "2.5"]);
    assert!(config_path.exists());

    let shown = run_cmd_json(&config_path, &["config", "show"]);
    assert_eq!(shown["numbers_only_mode"], true);
    assert_eq!(shown["check_interval"], 2.5);

    run_cmd(&config_path, &["config", "reset"]);
    let shown = run_cmd_json(&config_path, &["config", "show"]);
    assert_eq!(shown["numbers_only_mode"], false);
    assert_eq!(shown["check_interval"], 1.0);
}

#[test]
fn config_set_rejects_bad_values() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("config.json");

    for args in [
        ["config", "set", "check_interval", "-1"],
        ["config", "set", "use_whatsapp_app", "maybe"],
        ["config", "set", "colour", "blue"],
    ] {
        let output = cargo_bin_cmd!("waclip")
            .args(["--config", config_path.to_str().expect("config path")])
            .args(args)
            .output()
            .expect("run command");
        assert_eq!(output.status.code(), Some(3), "{args:?}");
    }
    assert!(!config_path.exists());
}

#[test]
fn unknown_keys_survive_a_set() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, r#"{"window_geometry": "800x600", "check_interval": 3}"#)
        .expect("seed config");

    run_cmd(&config_path, &["config", "set", "avoid_duplicates", "off"]);

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).expect("read"))
            .expect("parse");
    assert_eq!(raw["window_geometry"], "800x600");
    assert_eq!(raw["avoid_duplicates"], false);
    assert_eq!(raw["check_interval"], 3.0);
}
