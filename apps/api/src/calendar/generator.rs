//! Calendar generation pipeline: prompt → model call → parse → envelope.

use std::time::Duration;

use tracing::{info, warn};

use crate::calendar::models::CalendarResult;
use crate::calendar::parser::{parse_calendar, ParseOutcome};
use crate::calendar::prompts::build_calendar_prompt;
use crate::errors::AppError;
use crate::llm_client::{generate_with_timeout, GenerationClient};

/// Generates a 7-day content calendar for `profession`.
///
/// Only a failed model call is an error. Output that cannot be parsed
/// degrades to an empty calendar and is still returned as success.
pub async fn generate_calendar(
    profession: String,
    llm: &dyn GenerationClient,
    timeout: Duration,
) -> Result<CalendarResult, AppError> {
    let prompt = build_calendar_prompt(&profession);

    let text = generate_with_timeout(llm, &prompt, timeout).await?;

    let calendar = match parse_calendar(&text) {
        ParseOutcome::Entries(entries) => {
            info!("Generated {} calendar entries", entries.len());
            entries
        }
        ParseOutcome::Empty => {
            info!("Model returned an empty calendar");
            Vec::new()
        }
        ParseOutcome::Malformed(detail) => {
            warn!("Model output could not be parsed as a calendar: {detail}");
            Vec::new()
        }
    };

    Ok(CalendarResult {
        profession,
        calendar,
    })
}
