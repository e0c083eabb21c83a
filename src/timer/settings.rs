//! Interval durations and the long-break cadence
//!
//! Every value is clamped into its field's range whenever it is read from
//! storage or written by the user. Input that does not start with an integer
//! falls back to the field's default instead of failing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::Mode;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_CYCLES_UNTIL_LONG_BREAK: u32 = 4;

/// A single user-editable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingField {
    Focus,
    Break,
    Long,
    Cycles,
}

impl SettingField {
    pub const ALL: [SettingField; 4] = [
        SettingField::Focus,
        SettingField::Break,
        SettingField::Long,
        SettingField::Cycles,
    ];

    /// Key used in the persisted record and in routes
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::Focus => "focus",
            SettingField::Break => "break",
            SettingField::Long => "long",
            SettingField::Cycles => "cycles",
        }
    }

    /// Inclusive range accepted for this field
    pub fn range(&self) -> (u32, u32) {
        match self {
            SettingField::Focus => (1, 180),
            SettingField::Break => (1, 60),
            SettingField::Long => (1, 120),
            SettingField::Cycles => (1, 12),
        }
    }

    pub fn default_value(&self) -> u32 {
        match self {
            SettingField::Focus => DEFAULT_FOCUS_MINUTES,
            SettingField::Break => DEFAULT_BREAK_MINUTES,
            SettingField::Long => DEFAULT_LONG_BREAK_MINUTES,
            SettingField::Cycles => DEFAULT_CYCLES_UNTIL_LONG_BREAK,
        }
    }

    /// Clamp an optional integer into range, using the default when absent
    pub fn clamp(&self, value: Option<i64>) -> u32 {
        let Some(value) = value else {
            return self.default_value();
        };
        let (min, max) = self.range();
        // In range after the clamp, so the narrowing cannot truncate.
        value.clamp(i64::from(min), i64::from(max)) as u32
    }

    /// Clamp raw user text such as `"30"`, `" 45min"` or `"abc"`
    pub fn clamp_text(&self, raw: &str) -> u32 {
        self.clamp(parse_leading_int(raw))
    }

    /// Clamp a value taken from a persisted JSON record
    pub fn clamp_json(&self, value: Option<&Value>) -> u32 {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => parse_leading_int(s),
            _ => None,
        };
        self.clamp(parsed)
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        SettingField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| format!("Unknown setting: {}", s))
    }
}

/// Parse the integer at the start of `raw`.
///
/// Leading whitespace and a single sign are accepted and anything after the
/// digits is ignored. Returns `None` when no digit is present. Magnitudes too
/// large for `i64` saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Durations in minutes plus the number of focus intervals per long break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "focus")]
    pub focus_minutes: u32,
    #[serde(rename = "break")]
    pub break_minutes: u32,
    #[serde(rename = "long")]
    pub long_break_minutes: u32,
    #[serde(rename = "cycles")]
    pub cycles_until_long_break: u32,
}

impl Settings {
    /// Build settings from a persisted record.
    ///
    /// Each field falls back on its own; anything that is not a JSON object
    /// yields the defaults.
    pub fn from_json(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return Self::default();
        };

        let mut settings = Self::default();
        for field in SettingField::ALL {
            settings.put(field, field.clamp_json(record.get(field.key())));
        }
        settings
    }

    /// Store raw user text into `field`, returning the clamped value
    pub fn set(&mut self, field: SettingField, raw: &str) -> u32 {
        let value = field.clamp_text(raw);
        self.put(field, value);
        value
    }

    /// Full length of an interval in seconds
    pub fn duration_secs(&self, mode: Mode) -> u64 {
        let minutes = match mode {
            Mode::Focus => self.focus_minutes,
            Mode::Break => self.break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        u64::from(minutes) * 60
    }

    fn put(&mut self, field: SettingField, value: u32) {
        match field {
            SettingField::Focus => self.focus_minutes = value,
            SettingField::Break => self.break_minutes = value,
            SettingField::Long => self.long_break_minutes = value,
            SettingField::Cycles => self.cycles_until_long_break = value,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            cycles_until_long_break: DEFAULT_CYCLES_UNTIL_LONG_BREAK,
        }
    }
}
