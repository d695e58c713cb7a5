//! Axum route handlers for the Calendar API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::calendar::generator::generate_calendar;
use crate::calendar::models::{CalendarResult, GenerateCalendarRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/gemini/text
///
/// Generates a 7-day content calendar for the given profession.
/// The profession is passed through without validation.
pub async fn handle_generate_calendar(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCalendarRequest>, JsonRejection>,
) -> Result<Json<CalendarResult>, AppError> {
    let Json(request) = payload?;

    let result = generate_calendar(
        request.profession,
        state.llm.as_ref(),
        state.generation_timeout,
    )
    .await?;

    Ok(Json(result))
}
