use crate::api::CalendarResult;

/// Renders the calendar as a plain-text card list.
pub fn render_calendar(result: &CalendarResult) -> String {
    let mut out = format!("\nContent Calendar for {}\n", result.profession);

    if result.calendar.is_empty() {
        out.push_str("  (no entries were generated, try again)\n");
        return out;
    }

    for entry in &result.calendar {
        out.push_str(&format!("\n  [{}] {}\n", entry.day, entry.title));
        for line in entry.caption.lines() {
            out.push_str(&format!("      {line}\n"));
        }
    }
    out
}
