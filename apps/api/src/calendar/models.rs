use serde::{Deserialize, Serialize};

/// One day's post idea. Only produced by `parser`, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub day: u8,
    pub title: String,
    pub caption: String,
}

/// Response envelope for a single generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResult {
    /// Echo of the request input, unmodified.
    pub profession: String,
    pub calendar: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCalendarRequest {
    pub profession: String,
}
