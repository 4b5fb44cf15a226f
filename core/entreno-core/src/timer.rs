//! Session clocks: a count-up total-time clock and a count-down rest clock.
//!
//! ## Design Principles
//!
//! - **Wall-clock derived**: the displayed value is always computed from
//!   `(start instant, paused accumulator, now)`. Nothing counts callback
//!   firings, so a clock read after the process was suspended for a minute
//!   shows a minute more, regardless of how many ticks actually ran.
//! - **Injected now**: every query takes `now: DateTime<Utc>`, which makes
//!   suspension trivially simulable in tests.
//! - **No audio**: the rest clock reports an `AlarmFired` event when it hits
//!   zero; playing a sound (foreground-only, best-effort) is the caller's
//!   concern.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default rest-clock duration, in seconds.
pub const DEFAULT_REST_SECS: u64 = 60;

/// Delay before an expired rest clock snaps back to its full duration.
const RESTART_DELAY_SECS: i64 = 1;

/// Accepted tap-to-edit clock input: `M:SS` or `MM:SS`.
static CLOCK_INPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]|[0-5][0-9]):([0-5][0-9])$").expect("valid regex"));

/// Event surfaced by `RestClock::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The countdown reached zero; the caller may play its alert sound.
    AlarmFired,
}

// ─────────────────────────────────────────────────────────────────────────────
// Count-Up Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Total session time. Accumulates across pauses; the session's `duracion`
/// is read from here at finish and never recomputed.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    started_at: Option<DateTime<Utc>>,
    paused_secs: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds to display: wall-clock delta since start plus everything
    /// accumulated before the last pause.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .started_at
            .map(|start| (now - start).num_seconds().max(0) as u64)
            .unwrap_or(0);
        self.paused_secs + running
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freezes the displayed value into the accumulator.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.paused_secs = self.elapsed(now);
        self.started_at = None;
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.paused_secs = 0;
    }

    /// ±1-minute style adjustment. Mutates the accumulator and, if running,
    /// restarts the start instant in the same step so the next read reflects
    /// the adjustment without double-counting.
    pub fn adjust_minutes(&mut self, delta_minutes: i64, now: DateTime<Utc>) {
        let adjusted = self.elapsed(now) as i64 + delta_minutes * 60;
        self.paused_secs = adjusted.max(0) as u64;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    /// Tap-to-edit. Only honored while stopped; returns whether the input
    /// was applied.
    pub fn set_from_input(&mut self, input: &str) -> bool {
        if self.is_running() {
            return false;
        }
        match parse_clock_input(input) {
            Some(secs) => {
                self.paused_secs = secs;
                true
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Count-Down Clock
// ─────────────────────────────────────────────────────────────────────────────

/// Rest timer. Counts from a configurable duration toward zero; on expiry it
/// stops, fires the alarm event, and snaps back to the full duration one
/// second later, ready to start again.
#[derive(Debug, Clone)]
pub struct RestClock {
    original_secs: u64,
    started_at: Option<DateTime<Utc>>,
    paused_secs: u64,
    restart_at: Option<DateTime<Utc>>,
}

impl Default for RestClock {
    fn default() -> Self {
        Self {
            original_secs: DEFAULT_REST_SECS,
            started_at: None,
            paused_secs: 0,
            restart_at: None,
        }
    }
}

impl RestClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(original_secs: u64) -> Self {
        Self {
            original_secs,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// The configured full duration.
    pub fn original_secs(&self) -> u64 {
        self.original_secs
    }

    fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .started_at
            .map(|start| (now - start).num_seconds().max(0) as u64)
            .unwrap_or(0);
        self.paused_secs + running
    }

    /// Seconds remaining to display. During the post-expiry restart window
    /// this stays at zero; afterwards it shows the full duration again.
    pub fn remaining(&self, now: DateTime<Utc>) -> u64 {
        if let Some(at) = self.restart_at {
            if now < at {
                return 0;
            }
            return self.original_secs;
        }
        self.original_secs.saturating_sub(self.elapsed(now))
    }

    /// Advances clock bookkeeping to `now`. Returns the alarm event exactly
    /// once per expiry. Safe to call at any cadence; correctness never
    /// depends on it being called every second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if let Some(at) = self.restart_at {
            if now >= at {
                // Restart window elapsed: stopped, back at full duration.
                self.restart_at = None;
                self.paused_secs = 0;
            }
            return None;
        }
        if self.is_running() && self.original_secs.saturating_sub(self.elapsed(now)) == 0 {
            self.started_at = None;
            self.paused_secs = self.original_secs;
            self.restart_at = Some(now + Duration::seconds(RESTART_DELAY_SECS));
            return Some(TimerEvent::AlarmFired);
        }
        None
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.restart_at.is_some() {
            self.restart_at = None;
            self.paused_secs = 0;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.paused_secs = self.elapsed(now);
        self.started_at = None;
    }

    /// Back to stopped at the full configured duration.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.paused_secs = 0;
        self.restart_at = None;
    }

    /// ±15-second style adjustment. While running it shifts the remaining
    /// time in place, leaving the configured duration untouched; while
    /// stopped it permanently changes the configured duration.
    pub fn adjust_seconds(&mut self, delta_secs: i64, now: DateTime<Utc>) {
        if self.is_running() {
            let remaining = self.remaining(now) as i64 + delta_secs;
            let remaining = remaining.clamp(0, self.original_secs as i64) as u64;
            self.paused_secs = self.original_secs - remaining;
            self.started_at = Some(now);
        } else {
            let original = self.original_secs as i64 + delta_secs;
            self.original_secs = original.max(0) as u64;
            self.restart_at = None;
        }
    }

    /// Tap-to-edit of the configured duration. Only honored while stopped;
    /// returns whether the input was applied.
    pub fn set_from_input(&mut self, input: &str) -> bool {
        if self.is_running() {
            return false;
        }
        match parse_clock_input(input) {
            Some(secs) => {
                self.original_secs = secs;
                self.paused_secs = 0;
                self.restart_at = None;
                true
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock Strings
// ─────────────────────────────────────────────────────────────────────────────

/// Formats seconds as `MM:SS`, or `HH:MM:SS` once there is a nonzero hour.
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Parses validated `M:SS`/`MM:SS` tap-to-edit input into seconds.
pub fn parse_clock_input(input: &str) -> Option<u64> {
    let caps = CLOCK_INPUT.captures(input.trim())?;
    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Masks raw digit input into a clock string as the user types:
/// "5" stays "5", "0530" becomes "05:30", "013500" becomes "01:35:00".
pub fn mask_time_input(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}:{}", &digits[..2], &digits[2..]),
        5..=6 => format!("{}:{}:{}", &digits[..2], &digits[2..4], &digits[4..]),
        _ => format!("{}:{}:{}", &digits[..2], &digits[2..4], &digits[4..6]),
    }
}

/// Parses a masked time string ("MM:SS" or "HH:MM:SS") into seconds.
/// Anything else (partial or empty input) parses as zero.
pub fn parse_time_to_seconds(time: &str) -> u64 {
    let parts: Vec<u64> = time
        .split(':')
        .map(|p| p.parse().unwrap_or(0))
        .collect();
    match parts.as_slice() {
        [h, m, s] => h * 3600 + m * 60 + s,
        [m, s] => m * 60 + s,
        _ => 0,
    }
}
