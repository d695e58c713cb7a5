//! Recovers a calendar from model text that was asked for, but not guaranteed to be, a JSON array.
//!
//! Stages:
//! 1. Parse the whole (trimmed) text as JSON.
//! 2. If that fails or is not an array, parse the substring from the first `[`
//!    to the last `]`. This recovers arrays wrapped in prose or markdown fences.
//! 3. Validate each element against the entry schema.

use serde_json::Value;
use tracing::{debug, warn};

use crate::calendar::models::CalendarEntry;

pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 7;

/// The three distinguishable results of parsing a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// At least one valid entry, sorted by day.
    Entries(Vec<CalendarEntry>),
    /// The model returned an empty array.
    Empty,
    /// No usable array could be recovered.
    Malformed(String),
}

impl ParseOutcome {
    /// Collapses to the wire representation, where `Empty` and `Malformed` are both `[]`.
    pub fn into_entries(self) -> Vec<CalendarEntry> {
        match self {
            ParseOutcome::Entries(entries) => entries,
            ParseOutcome::Empty | ParseOutcome::Malformed(_) => Vec::new(),
        }
    }
}

pub fn parse_calendar(text: &str) -> ParseOutcome {
    let items = match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            debug!("Top-level JSON is not an array, trying bracket extraction");
            match parse_bracketed(text) {
                Ok(items) => items,
                Err(detail) => return ParseOutcome::Malformed(detail),
            }
        }
        Err(e) => {
            debug!("Direct JSON parse failed ({e}), trying bracket extraction");
            match parse_bracketed(text) {
                Ok(items) => items,
                Err(detail) => return ParseOutcome::Malformed(detail),
            }
        }
    };

    validate_entries(items)
}

/// Returns the greedy `[` ... `]` region of `text`, if any.
pub fn extract_bracketed(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_bracketed(text: &str) -> Result<Vec<Value>, String> {
    let region = extract_bracketed(text).ok_or("response contains no bracketed array")?;
    match serde_json::from_str::<Value>(region) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err("bracketed region is not a JSON array".to_string()),
        Err(e) => Err(format!("bracketed region is not valid JSON: {e}")),
    }
}

fn validate_entries(items: Vec<Value>) -> ParseOutcome {
    if items.is_empty() {
        return ParseOutcome::Empty;
    }

    let total = items.len();
    let mut seen = [false; LAST_DAY as usize + 1];
    let mut entries = Vec::with_capacity(total);

    for (index, item) in items.iter().enumerate() {
        match entry_from_value(item) {
            Ok(entry) => {
                let slot = &mut seen[entry.day as usize];
                if *slot {
                    debug!("Dropping element {index}: duplicate day {}", entry.day);
                    continue;
                }
                *slot = true;
                entries.push(entry);
            }
            Err(reason) => debug!("Dropping element {index}: {reason}"),
        }
    }

    if entries.is_empty() {
        return ParseOutcome::Malformed(format!(
            "none of the {total} array elements is a valid calendar entry"
        ));
    }

    if entries.len() < total {
        warn!(
            "Kept {} of {} calendar entries after validation",
            entries.len(),
            total
        );
    }

    entries.sort_by_key(|e| e.day);
    ParseOutcome::Entries(entries)
}

fn entry_from_value(value: &Value) -> Result<CalendarEntry, String> {
    let obj = value.as_object().ok_or("not a JSON object")?;

    let day = obj
        .get("day")
        .and_then(day_from_value)
        .ok_or("missing or non-integer `day`")?;
    if !(FIRST_DAY..=LAST_DAY).contains(&day) {
        return Err(format!("`day` {day} outside {FIRST_DAY}..={LAST_DAY}"));
    }

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or("missing or empty `title`")?;

    let caption = obj
        .get("caption")
        .and_then(Value::as_str)
        .ok_or("missing `caption`")?;

    Ok(CalendarEntry {
        day,
        title: title.to_string(),
        caption: caption.trim().to_string(),
    })
}

/// Accepts `3`, `3.0` and `"3"`.
fn day_from_value(value: &Value) -> Option<u8> {
    let day = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u8::try_from(day).ok()
}
