//! Colorful console output for solver events.
//!
//! Provides a `tracing` layer that formats the structured events emitted by
//! `timeforge-solver` with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solving/phase start/end)
//! - **DEBUG**: Progress, new best, restarts and scouts
//! - **TRACE**: Individual iterations
//!
//! Set `RUST_LOG` to override the default `timeforge_solver=info` filter.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use timeforge_core::TimetableScore;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_FILTER: &str = "timeforge_solver=info,timeforge=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(TimetableConsoleLayer)
            .try_init();
    });
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 _____ _                  __
|_   _(_)_ __ ___   ___  / _| ___  _ __ __ _  ___
  | | | | '_ ` _ \ / _ \| |_ / _ \| '__/ _` |/ _ \
  | | | | | | | | |  __/|  _| (_) | | | (_| |  __/
  |_| |_|_| |_| |_|\___||_|  \___/|_|  \__, |\___|
                                       |___/
"#;

    let version_line = format!("             v{VERSION} - High-School Timetabling\n");

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct TimetableConsoleLayer;

impl<S: Subscriber> Layer<S> for TimetableConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("timeforge_solver")
            && target != "timeforge"
            && !target.starts_with("timeforge::")
        {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{output}");
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    bees: Option<String>,
    score: Option<String>,
    current: Option<String>,
    phase_index: Option<u64>,
    steps: Option<u64>,
    speed: Option<u64>,
    step: Option<u64>,
    source: Option<u64>,
    duration_ms: Option<u64>,
    event_count: Option<u64>,
    slot_count: Option<u64>,
    phases: Option<u64>,
    candidates_evaluated: Option<u64>,
    cost: Option<i64>,
    temperature: Option<f64>,
    accepted: Option<bool>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "bees" => self.bees = Some(value),
            "score" => self.score = Some(value),
            "current" => self.current = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{value:?}");
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "steps" => self.steps = Some(value),
            "speed" => self.speed = Some(value),
            "step" => self.step = Some(value),
            "source" => self.source = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "event_count" => self.event_count = Some(value),
            "slot_count" => self.slot_count = Some(value),
            "phases" => self.phases = Some(value),
            "candidates_evaluated" => self.candidates_evaluated = Some(value),
            "cost" => self.cost = Some(value as i64),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "cost" => self.cost = Some(value),
            _ if value >= 0 => self.record_u64(field, value as u64),
            _ => {}
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "temperature" {
            self.temperature = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "accepted" {
            self.accepted = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "progress" => format_progress(v),
        "new_best" => format_new_best(v),
        "restart" | "scout" => format_restart(v),
        "step" => format_step(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let events = v.event_count.unwrap_or(0);
    let slots = v.slot_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving │ {} events │ {} slots",
        format_elapsed(),
        "▶".bright_green().bold(),
        format_count(events).bright_yellow(),
        format_count(slots).bright_yellow(),
    );
    if let Some(phases) = v.phases {
        output.push_str(&format!(" │ {} phases", phases.bright_yellow()));
    }
    output
}

fn is_feasible(score: &str) -> bool {
    TimetableScore::parse(score).is_ok_and(|s| s.is_feasible())
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let feasible = is_feasible(score);

    let status = if feasible {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_score(score),
        status
    );

    let border = "══════════════════════════════════════════════════════════";
    output.push_str("\n\n");
    output.push_str(&format!("╔{border}╗").bright_cyan().to_string());
    output.push('\n');

    let status_text = if feasible {
        "FEASIBLE TIMETABLE FOUND"
    } else {
        "INFEASIBLE (hard constraints violated)"
    };
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    let status_colored = if feasible {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!("╠{border}╣").bright_cyan().to_string());
    output.push('\n');

    let mut row = |label: &str, value: String| {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}\n",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
    };
    row("Final Score:", score.to_string());
    if let Some(steps) = v.steps {
        row("Steps:", format_count(steps));
    }
    if let Some(candidates) = v.candidates_evaluated {
        row("Candidates:", format_count(candidates));
    }
    if let Some(ms) = v.duration_ms {
        row("Time:", format_duration_ms(ms));
    }

    output.push_str(&format!("╚{border}╝").bright_cyan().to_string());
    output.push('\n');
    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let steps = v.steps.unwrap_or(0);
    let speed = v.speed.unwrap_or(0);
    let score = v.score.as_deref().unwrap_or("N/A");
    let duration = v.duration_ms.unwrap_or(0);

    format!(
        "{} {} {} ended │ {} │ {} steps │ {} steps/s │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
        format_count(steps).white(),
        format_count(speed).bright_magenta().bold(),
        format_score(score),
    )
}

fn format_progress(v: &EventVisitor) -> String {
    let steps = v.steps.unwrap_or(0);
    let mut output = format!(
        "{} {} {:>10} steps",
        format_elapsed(),
        "⚡".bright_cyan(),
        format_count(steps).white(),
    );
    if let Some(best) = &v.score {
        output.push_str(&format!(" │ best {}", format_score(best)));
    }
    if let Some(current) = &v.current {
        output.push_str(&format!(" │ current {}", format_score(current)));
    }
    if let Some(t) = v.temperature {
        output.push_str(&format!(" │ T {:.3}", t).bright_black().to_string());
    }
    output
}

fn format_new_best(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let mut output = format!(
        "{} {} New best at step {} │ {}",
        format_elapsed(),
        "★".bright_yellow().bold(),
        format_count(v.step.unwrap_or(0)),
        format_score(score),
    );
    if let Some(bees) = &v.bees {
        output.push_str(&format!(" │ {} bees", bees.bright_black()));
    }
    output
}

fn format_restart(v: &EventVisitor) -> String {
    let what = match (v.event.as_deref(), v.source) {
        (Some("scout"), Some(source)) => format!("Scout replaced source {source}"),
        (Some("scout"), None) => "Scout replaced a source".to_string(),
        _ => "Restart".to_string(),
    };
    format!(
        "{} {} {} at step {} │ {}",
        format_elapsed(),
        "↻".bright_blue(),
        what,
        format_count(v.step.unwrap_or(0)),
        format_score(v.score.as_deref().unwrap_or("N/A")),
    )
}

fn format_step(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let icon = if v.accepted.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };

    format!(
        "{} {} Step {:>10} │ cost {}",
        format_elapsed(),
        icon,
        format_count(v.step.unwrap_or(0)).bright_black(),
        v.cost.unwrap_or(0).bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{mins}m {secs}s")
    }
}

fn format_score(score: &str) -> String {
    let Ok(parsed) = TimetableScore::parse(score) else {
        return score.white().to_string();
    };

    let hard = format!("{}hard", parsed.hard());
    let hard = if parsed.hard() < 0 {
        hard.bright_red().to_string()
    } else {
        hard.bright_green().to_string()
    };

    let soft = format!("{}soft", parsed.soft());
    let soft = if parsed.soft() < 0 {
        soft.yellow().to_string()
    } else {
        soft.white().to_string()
    };

    format!("{hard}/{soft}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (false, c) => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_format_score_keeps_levels() {
        assert_eq!(strip(&format_score("-2hard/-15soft")), "-2hard/-15soft");
        assert_eq!(strip(&format_score("N/A")), "N/A");
    }

    #[test]
    fn test_progress_shows_scores_as_emitted() {
        let visitor = EventVisitor {
            event: Some("progress".to_string()),
            steps: Some(20),
            score: Some("0hard/-1500soft".to_string()),
            current: Some("-1hard/-3soft".to_string()),
            ..Default::default()
        };
        let line = strip(&format_event(&visitor, Level::DEBUG));
        assert!(line.contains("best 0hard/-1500soft"));
        assert!(line.contains("current -1hard/-3soft"));
    }

    #[test]
    fn test_feasibility_from_score() {
        assert!(is_feasible("0hard/-40soft"));
        assert!(!is_feasible("-1hard/0soft"));
        assert!(!is_feasible("N/A"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("event#3".to_string()),
            ..Default::default()
        };
        assert!(format_event(&visitor, Level::INFO).is_empty());
    }

    #[test]
    fn test_scout_line_names_the_source() {
        let visitor = EventVisitor {
            event: Some("scout".to_string()),
            source: Some(4),
            step: Some(12),
            score: Some("-1hard/-5soft".to_string()),
            ..Default::default()
        };
        let line = strip(&format_event(&visitor, Level::DEBUG));
        assert!(line.contains("Scout replaced source 4 at step 12"));
        assert!(line.contains("-1hard/-5soft"));
    }
}
