use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_playalong_cli"))
}

fn prefs_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("playalong-cli-{}-{}.json", name, std::process::id()))
}

fn run_json(args: &[&str]) -> Value {
    let output = cli().args(args).output().expect("run command");
    assert!(
        output.status.success(),
        "{:?} exited with {:?}: {}",
        args,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    serde_json::from_str(&stdout).unwrap_or_else(|err| panic!("{err}: {stdout}"))
}

#[test]
fn simulate_then_show_reports_calibration() {
    let path = prefs_path("simulate");
    let prefs = path.to_str().expect("utf8 path");

    let report = run_json(&[
        "--prefs", prefs, "simulate", "--device", "mouse", "--offset-ms", "-25", "--taps", "8",
    ]);
    assert_eq!(report["accepted"], 8);
    assert_eq!(report["rejected"], 0);
    let mouse = report["mouse_calibration"].as_f64().unwrap();
    assert!((mouse + 0.025).abs() < 1e-6, "mouse calibration {mouse}");

    let shown = run_json(&["--prefs", prefs, "show"]);
    assert_eq!(shown["prefs"], prefs);
    let mouse = shown["mouse_calibration"].as_f64().unwrap();
    assert!((mouse + 0.025).abs() < 1e-6);
    assert_eq!(shown["key_calibration"].as_f64(), Some(0.0));
    assert_eq!(shown["controls_preset"], "Default");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn simulate_far_off_beat_rejects_every_tap() {
    let path = prefs_path("rejected");
    let prefs = path.to_str().expect("utf8 path");

    let report = run_json(&["--prefs", prefs, "simulate", "--offset-ms", "192", "--taps", "4"]);
    assert_eq!(report["accepted"], 0);
    assert_eq!(report["rejected"], 4);
    assert_eq!(report["key_calibration"].as_f64(), Some(0.0));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn reset_zeroes_stored_calibration() {
    let path = prefs_path("reset");
    let prefs = path.to_str().expect("utf8 path");

    run_json(&["--prefs", prefs, "simulate", "--offset-ms", "40", "--taps", "4"]);
    let summary = run_json(&["--prefs", prefs, "reset", "keyboard"]);
    assert_eq!(summary["key_calibration"].as_f64(), Some(0.0));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn sfx_and_controls_commands_persist() {
    let path = prefs_path("sfx-controls");
    let prefs = path.to_str().expect("utf8 path");

    let output = cli()
        .args(["--prefs", prefs, "sfx", "monster-ace"])
        .output()
        .expect("run sfx");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("playalong_sfx_monster_ace off"), "{stdout}");

    let output = cli()
        .args(["--prefs", prefs, "controls", "--steps", "-1"])
        .output()
        .expect("run controls");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Controls: Numpad"), "{stdout}");

    let shown = run_json(&["--prefs", prefs, "show"]);
    assert_eq!(shown["sfx"]["playalong_sfx_monster_ace"], false);
    assert_eq!(shown["controls_preset"], "Numpad");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn telemetry_history_follows_config() {
    let path = prefs_path("telemetry");
    let prefs = path.to_str().expect("utf8 path");
    let config_path = prefs_path("telemetry-config");
    std::fs::write(
        &config_path,
        r#"{ "telemetry": { "channel_capacity": 1, "history_capacity": 1 } }"#,
    )
    .expect("write config");
    let config = config_path.to_str().expect("utf8 path");

    let output = cli()
        .env_remove("RUST_LOG")
        .args([
            "--config", config, "--prefs", prefs, "--telemetry", "simulate", "--taps", "5",
        ])
        .output()
        .expect("run simulate");
    assert!(output.status.success());

    // Five samples plus the exit event, only the last one kept
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    let snapshot: Value =
        serde_json::from_str(stderr.trim()).unwrap_or_else(|err| panic!("{err}: {stderr}"));
    let recent = snapshot["recent"].as_array().expect("recent events");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["type"], "settings_exited");
    assert_eq!(snapshot["total_events"], 6);
    assert_eq!(snapshot["dropped_events"], 5);

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&config_path);
}
