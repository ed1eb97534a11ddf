use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use clickwise::{
    Level, PinMode, Polarity, SwitchDebouncer, SwitchEvent, SwitchEventKind, SwitchTiming,
};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "switch_replay")]
#[command(about = "Replay a recorded switch trace through the debouncer")]
struct Cli {
    /// Trace file with one `ms,level` sample per line.
    trace: PathBuf,
    /// Expected event kinds, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// TOML file overriding any of debounce_ms, hold_ms, repeat_ms, double_click_ms.
    #[arg(long)]
    timing: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ModeArg::PullUp)]
    mode: ModeArg,
    #[arg(long, conflicts_with = "active_low")]
    active_high: bool,
    #[arg(long)]
    active_low: bool,
    /// Keep polling the last level this long after the trace ends so pending
    /// clicks settle.
    #[arg(long = "tail-ms", default_value_t = 1_000)]
    tail_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Input,
    PullUp,
    PullDown,
}

impl From<ModeArg> for PinMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Input => PinMode::Input,
            ModeArg::PullUp => PinMode::InputPullUp,
            ModeArg::PullDown => PinMode::InputPullDown,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingFile {
    debounce_ms: Option<u64>,
    hold_ms: Option<u64>,
    repeat_ms: Option<u64>,
    double_click_ms: Option<u64>,
}

impl TimingFile {
    fn apply(&self, base: SwitchTiming) -> SwitchTiming {
        SwitchTiming {
            debounce_ms: self.debounce_ms.unwrap_or(base.debounce_ms),
            hold_ms: self.hold_ms.unwrap_or(base.hold_ms),
            repeat_ms: self.repeat_ms.unwrap_or(base.repeat_ms),
            double_click_ms: self.double_click_ms.unwrap_or(base.double_click_ms),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ReplaySample {
    ms: u64,
    level: Level,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let timing = match &cli.timing {
        Some(path) => load_timing(path)?.apply(SwitchTiming::DEFAULT),
        None => SwitchTiming::DEFAULT,
    };
    let polarity = if cli.active_high {
        Polarity::ActiveHigh
    } else if cli.active_low {
        Polarity::ActiveLow
    } else {
        Polarity::Auto
    };

    let samples = parse_trace(&cli.trace)?;
    let mut switch = SwitchDebouncer::new(cli.mode.into(), polarity, timing);
    let events = replay(&mut switch, &samples, cli.tail_ms);

    println!("event,ms,kind");
    for event in &events {
        println!("event,{},{}", event.t_ms, event.kind.name());
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<SwitchEventKind> = events.iter().map(|e| e.kind).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", join_kinds(&expected));
            eprintln!("actual kinds:   {}", join_kinds(&actual));
            bail!("event sequence mismatch");
        }
    }

    Ok(())
}

fn replay(switch: &mut SwitchDebouncer<'_>, samples: &[ReplaySample], tail_ms: u64) -> Vec<SwitchEvent> {
    let mut events = Vec::new();
    for sample in samples {
        events.extend(switch.poll(sample.ms, sample.level).events);
    }

    // Let a click waiting on its double-click window settle even when the
    // capture stops right after the last edge.
    if let Some(last) = samples.last() {
        for offset in 1..=tail_ms {
            events.extend(switch.poll(last.ms.saturating_add(offset), last.level).events);
        }
    }

    events
}

fn load_timing(path: &Path) -> Result<TimingFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read timing file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid timing file {}", path.display()))
}

fn parse_trace(path: &Path) -> Result<Vec<ReplaySample>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_trace_str(&raw, &path.display().to_string())
}

fn parse_trace_str(raw: &str, origin: &str) -> Result<Vec<ReplaySample>> {
    let mut out: Vec<ReplaySample> = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "ms,level" {
            continue;
        }

        let Some((ms, level)) = trimmed.split_once(',') else {
            bail!("{origin}:{line_no} invalid trace line, expected `ms,level`");
        };
        let ms = ms
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{origin}:{line_no} invalid ms '{}'", ms.trim()))?;
        let level = parse_level(level.trim())
            .with_context(|| format!("{origin}:{line_no} invalid level '{}'", level.trim()))?;

        if let Some(prev) = out.last() {
            if ms < prev.ms {
                bail!("{origin}:{line_no} timestamp {ms} goes backwards (previous {})", prev.ms);
            }
        }
        out.push(ReplaySample { ms, level });
    }

    Ok(out)
}

fn parse_level(raw: &str) -> Option<Level> {
    match raw.to_ascii_lowercase().as_str() {
        "0" | "low" | "l" => Some(Level::Low),
        "1" | "high" | "h" => Some(Level::High),
        _ => None,
    }
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<SwitchEventKind>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_expected_str(&raw, &path.display().to_string())
}

fn parse_expected_str(raw: &str, origin: &str) -> Result<Vec<SwitchEventKind>> {
    let mut kinds = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let Some(kind) = SwitchEventKind::from_name(&token.to_ascii_lowercase()) else {
            bail!(
                "{origin}:{} invalid expected event kind: {token}",
                line_no + 1
            );
        };
        kinds.push(kind);
    }

    Ok(kinds)
}

fn join_kinds(kinds: &[SwitchEventKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(",")
}
