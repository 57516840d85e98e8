//! Slot text and time matching.
//!
//! Slots come straight from the schedule file and carry no enforced schema. The raw text
//! is kept as-is; structured matching parses it on demand.

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SLOT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?:\s*-\s*(\d{1,2}):(\d{2}))?$")
        .expect("slot pattern is valid")
});

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(am|pm)?$").expect("time pattern is valid")
});

/// How a requested time is compared against slot text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Parse both sides and check that the requested time falls inside the slot window.
    #[default]
    Structured,
    /// Legacy behaviour: the slot text contains the requested time as a substring,
    /// so `"9:00"` matches `"19:00-19:30"`.
    Substring,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Structured => "structured",
            MatchMode::Substring => "substring",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "structured" => Ok(MatchMode::Structured),
            "substring" => Ok(MatchMode::Substring),
            _ => Err(format!(
                "Invalid match mode: '{}'. Must be one of: structured, substring",
                value
            )),
        }
    }
}

/// A time window parsed from slot text. `start == end` for single-time slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// A slot is booked as a whole, so only its start time is bookable.
    pub fn starts_at(&self, time: NaiveTime) -> bool {
        self.start == time
    }
}

/// One bookable window as written in the schedule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot {
    raw: String,
}

impl Slot {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The untrimmed text from the file.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text with surrounding whitespace removed, for display.
    pub fn label(&self) -> &str {
        self.raw.trim()
    }

    /// Parse the slot as `HH:MM` or `HH:MM-HH:MM`.
    pub fn range(&self) -> Option<TimeRange> {
        let caps = SLOT_PATTERN.captures(self.raw.trim())?;
        let start = hm(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
        let end = match (caps.get(3), caps.get(4)) {
            (Some(h), Some(m)) => hm(h.as_str(), m.as_str())?,
            _ => start,
        };
        if end < start {
            return None;
        }
        Some(TimeRange { start, end })
    }

    /// Check whether this slot satisfies `requested` under `mode`.
    ///
    /// In structured mode the requested time must equal the slot's start; an unparseable
    /// slot never matches.
    pub fn matches(&self, requested: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.raw.contains(requested),
            MatchMode::Structured => match (parse_time(requested), self.range()) {
                (Some(time), Some(range)) => range.starts_at(time),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Split a slot column on commas, keeping every item untrimmed.
pub fn split_slots(column: &str) -> Vec<Slot> {
    column.split(',').map(Slot::new).collect()
}

/// Parse a requested time such as `09:00`, `9:00`, `9:00 PM` or `09:00am`.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_PATTERN.captures(text.trim())?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;

    if let Some(meridiem) = caps.get(3) {
        if hour == 0 || hour > 12 {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn hm(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
