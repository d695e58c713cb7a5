//! Form controller: one profession input, one in-flight request, the last result.
//!
//! ```text
//! Idle ──submit(non-blank)──▶ Submitting ──ok──▶ Ready(result)
//!                                       └─err─▶ Failed(notice)
//! ```
//! Any state may submit again. Blank input never leaves the current state.

use thiserror::Error;
use tracing::error;

use crate::api::{CalendarApi, CalendarResult};
use crate::clipboard::{format_all, format_entry, Clipboard, ClipboardError};

/// Shown instead of the underlying failure.
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Ready(CalendarResult),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; no request was sent.
    Ignored,
    Generated,
    Failed,
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("there is no calendar to copy from")]
    NothingToCopy,

    #[error("day {0} is not in the calendar")]
    UnknownDay(u8),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

pub struct FormController<A, C> {
    api: A,
    clipboard: C,
    state: FormState,
}

impl<A: CalendarApi, C: Clipboard> FormController<A, C> {
    pub fn new(api: A, clipboard: C) -> Self {
        Self {
            api,
            clipboard,
            state: FormState::Idle,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    pub fn result(&self) -> Option<&CalendarResult> {
        match &self.state {
            FormState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match &self.state {
            FormState::Failed(notice) => Some(notice),
            _ => None,
        }
    }

    /// Sends `profession` as typed. Blank input is ignored.
    pub async fn submit(&mut self, profession: &str) -> SubmitOutcome {
        if profession.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.state = FormState::Submitting;

        match self.api.generate(profession).await {
            Ok(result) => {
                self.state = FormState::Ready(result);
                SubmitOutcome::Generated
            }
            Err(e) => {
                error!("Error generating calendar: {e}");
                self.state = FormState::Failed(FAILURE_NOTICE.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Discards the current result or notice.
    pub fn dismiss(&mut self) {
        self.state = FormState::Idle;
    }

    /// Copies one day's entry. Does not change form state.
    pub fn copy_entry(&self, day: u8) -> Result<(), CopyError> {
        let result = self.result().ok_or(CopyError::NothingToCopy)?;
        let entry = result
            .calendar
            .iter()
            .find(|e| e.day == day)
            .ok_or(CopyError::UnknownDay(day))?;
        self.clipboard.set_text(&format_entry(entry))?;
        Ok(())
    }

    /// Copies every entry. Does not change form state.
    pub fn copy_all(&self) -> Result<(), CopyError> {
        let result = self.result().ok_or(CopyError::NothingToCopy)?;
        self.clipboard.set_text(&format_all(&result.calendar))?;
        Ok(())
    }
}
