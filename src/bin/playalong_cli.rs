use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use playalong_settings::audio::{ClockTrack, LogSoundPlayer, ManualTrack, ReferenceTrack};
use playalong_settings::config::AppConfig;
use playalong_settings::preferences::JsonPreferences;
use playalong_settings::sfx::SfxSetting;
use playalong_settings::telemetry::{self, TelemetryHub};
use playalong_settings::tempo::beats_to_seconds;
use playalong_settings::{
    CalibrationSetup, InputDevice, PointerButton, SampleOutcome, SessionSummary, SettingsSession,
};

#[derive(Parser, Debug)]
#[command(
    name = "playalong_cli",
    about = "Headless driver for the playalong settings screen"
)]
struct Cli {
    /// Preference file (overrides the config file's preferences.path)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print the analytics events recorded during the command to stderr
    #[arg(long, global = true)]
    telemetry: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print stored calibrations, sound-effect toggles and controls
    Show,
    /// Zero one device's calibration
    Reset {
        #[arg(value_enum)]
        device: DeviceArg,
    },
    /// Feed synthetic taps at a fixed offset from the beat and store the result
    Simulate {
        #[arg(long, value_enum, default_value_t = DeviceArg::Keyboard)]
        device: DeviceArg,
        /// Offset of every tap from its beat (positive = late)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_ms: f64,
        /// Alternating +/- jitter added on top of the offset
        #[arg(long, default_value_t = 0.0)]
        jitter_ms: f64,
        #[arg(long, default_value_t = 16)]
        taps: u32,
    },
    /// Tap along interactively: every line on stdin is one tap, `q` or EOF ends
    Tap {
        #[arg(long, value_enum, default_value_t = DeviceArg::Keyboard)]
        device: DeviceArg,
    },
    /// Toggle one sound effect
    Sfx {
        #[arg(value_enum)]
        setting: SfxArg,
    },
    /// Cycle the control preset by the given number of steps
    Controls {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        steps: i32,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceArg {
    Keyboard,
    Mouse,
}

impl From<DeviceArg> for InputDevice {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Keyboard => InputDevice::Keyboard,
            DeviceArg::Mouse => InputDevice::Mouse,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SfxArg {
    PerfectFail,
    MonsterFail,
    MonsterAce,
}

impl From<SfxArg> for SfxSetting {
    fn from(arg: SfxArg) -> Self {
        match arg {
            SfxArg::PerfectFail => SfxSetting::PerfectFail,
            SfxArg::MonsterFail => SfxSetting::MonsterFail,
            SfxArg::MonsterAce => SfxSetting::MonsterAce,
        }
    }
}

type CliSession<T> = SettingsSession<T, JsonPreferences, LogSoundPlayer, &'static TelemetryHub>;

fn main() -> ExitCode {
    playalong_settings::init_logging("warn");
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };
    config.validate().context("validating configuration")?;

    let prefs_path = cli
        .prefs
        .clone()
        .unwrap_or_else(|| config.preferences.path.clone());
    let setup = config.calibration.to_setup();
    let hub = telemetry::init_hub(&config.telemetry);

    match cli.command {
        Commands::Show => run_show(setup, prefs_path)?,
        Commands::Reset { device } => run_reset(setup, prefs_path, device.into())?,
        Commands::Simulate {
            device,
            offset_ms,
            jitter_ms,
            taps,
        } => run_simulate(setup, prefs_path, device.into(), offset_ms, jitter_ms, taps)?,
        Commands::Tap { device } => run_tap(setup, prefs_path, device.into())?,
        Commands::Sfx { setting } => run_sfx(setup, prefs_path, setting.into())?,
        Commands::Controls { steps } => run_controls(setup, prefs_path, steps)?,
    }

    if cli.telemetry {
        let snapshot = hub.snapshot();
        eprintln!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(ExitCode::from(0))
}

fn open_session<T: ReferenceTrack>(
    setup: CalibrationSetup,
    prefs_path: PathBuf,
    track: T,
) -> Result<CliSession<T>> {
    let store = JsonPreferences::open(&prefs_path)
        .with_context(|| format!("opening preferences {}", prefs_path.display()))?;
    let session = SettingsSession::open(setup, store, track, LogSoundPlayer::new(), telemetry::hub())
        .context("opening settings session")?;
    Ok(session)
}

fn run_show(setup: CalibrationSetup, prefs_path: PathBuf) -> Result<()> {
    let session = open_session(setup, prefs_path, ManualTrack::new())?;
    let report = ShowReport {
        prefs: session.store().path().to_path_buf(),
        summary: session.summary(),
        controls: session.controls_label(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_reset(setup: CalibrationSetup, prefs_path: PathBuf, device: InputDevice) -> Result<()> {
    let mut session = open_session(setup, prefs_path, ManualTrack::new())?;
    session.reset(device);
    let summary = session.close().context("persisting calibration")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_simulate(
    setup: CalibrationSetup,
    prefs_path: PathBuf,
    device: InputDevice,
    offset_ms: f64,
    jitter_ms: f64,
    taps: u32,
) -> Result<()> {
    let mut session = open_session(setup, prefs_path, ManualTrack::new())?;
    session.toggle_playback();

    let button_a = session.controls().button_a.clone();
    let mut accepted = 0u32;
    for tap in 0..taps {
        let jitter = if tap % 2 == 0 { jitter_ms } else { -jitter_ms };
        let beat = f64::from(tap % setup.loop_beats.max(1.0) as u32 + 1);
        let position = setup.music_offset_secs
            + beats_to_seconds(beat, setup.bpm)
            + (offset_ms + jitter) / 1000.0;
        session.track_mut().seek(position);

        let outcome = match device {
            InputDevice::Keyboard => session.on_key_pressed(&button_a),
            InputDevice::Mouse => session.on_pointer_pressed(true, PointerButton::Left),
        };
        if outcome.is_some_and(|o| o.is_accepted()) {
            accepted += 1;
        }
    }

    let summary = session.close().context("persisting calibration")?;
    let report = SimulateReport {
        device,
        taps,
        accepted,
        rejected: taps - accepted,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_tap(setup: CalibrationSetup, prefs_path: PathBuf, device: InputDevice) -> Result<()> {
    let track = ClockTrack::new(setup.loop_duration_secs());
    let mut session = open_session(setup, prefs_path, track)?;
    let button_a = session.controls().button_a.clone();

    eprintln!(
        "Start a {} BPM metronome now and press Enter on every beat. `q` to finish.",
        setup.bpm
    );
    session.toggle_playback();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        let outcome = match device {
            InputDevice::Keyboard => session.on_key_pressed(&button_a),
            InputDevice::Mouse => session.on_pointer_pressed(true, PointerButton::Left),
        };
        if let Some(outcome) = outcome {
            writeln!(
                stdout,
                "{} {:+.1} ms -> calibration {}",
                describe(&outcome),
                outcome.offset_secs() * 1000.0,
                session.calibration_label(device)
            )?;
        }
    }

    let summary = session.close().context("persisting calibration")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_sfx(setup: CalibrationSetup, prefs_path: PathBuf, setting: SfxSetting) -> Result<()> {
    let mut session = open_session(setup, prefs_path, ManualTrack::new())?;
    let enabled = session.toggle_sfx(setting).context("toggling sound effect")?;
    session.close().context("closing settings session")?;
    println!(
        "{} {}",
        setting.preference_key(),
        if enabled { "on" } else { "off" }
    );
    Ok(())
}

fn run_controls(setup: CalibrationSetup, prefs_path: PathBuf, steps: i32) -> Result<()> {
    let mut session = open_session(setup, prefs_path, ManualTrack::new())?;
    for _ in 0..steps.unsigned_abs() {
        session
            .cycle_controls(steps.signum())
            .context("storing controls")?;
    }
    session.close().context("closing settings session")?;
    println!("{}", session.controls_button_label());
    println!("{}", session.controls_label());
    Ok(())
}

fn describe(outcome: &SampleOutcome) -> &'static str {
    if outcome.is_accepted() {
        "accepted"
    } else {
        "rejected"
    }
}

#[derive(Serialize)]
struct ShowReport {
    prefs: PathBuf,
    #[serde(flatten)]
    summary: SessionSummary,
    controls: String,
}

#[derive(Serialize)]
struct SimulateReport {
    device: InputDevice,
    taps: u32,
    accepted: u32,
    rejected: u32,
    #[serde(flatten)]
    summary: SessionSummary,
}
