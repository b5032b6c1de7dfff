use serde::Serialize;

/// Parses a `HH:MM` clock time into minutes since midnight.
pub fn parse_hhmm(raw: &str) -> Option<f64> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours * 60 + minutes) as f64)
}

/// Formats minutes since midnight as `HH:MM`. Times past midnight wrap.
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{:02}:{:02}", (total / 60) % 24, total % 60)
}

/// Service or operating interval in minutes since midnight.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(TimeWindow {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Minutes past the window end, zero when on time.
    pub fn lateness(&self, arrival: f64) -> f64 {
        (arrival - self.end).max(0.0)
    }

    /// Minutes spent waiting for the window to open, zero when arriving
    /// after it opened.
    pub fn waiting(&self, arrival: f64) -> f64 {
        (self.start - arrival).max(0.0)
    }

    pub fn format(&self) -> String {
        format!("{} - {}", format_minutes(self.start), format_minutes(self.end))
    }
}
