mod api;
mod clipboard;
mod form;
mod render;

use std::fmt;

use anyhow::{Context, Result};
use clap::Parser;
use inquire::{InquireError, Select, Text};
use tracing_subscriber::EnvFilter;

use crate::api::{CalendarApi, HttpCalendarApi};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::form::{FormController, SubmitOutcome};
use crate::render::render_calendar;

#[derive(Parser)]
#[command(
    name = "calendar-cli",
    version,
    about = "Generate a 7-day content calendar tailored to your profession"
)]
struct Cli {
    /// Base URL of the Calendar API
    #[arg(long, env = "CALENDAR_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Generate once for this profession and exit
    #[arg(long)]
    profession: Option<String>,

    /// With --profession, copy all captions to the clipboard
    #[arg(long, requires = "profession")]
    copy_all: bool,
}

enum MenuChoice {
    CopyDay(u8, String),
    CopyAll,
    NewProfession,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::CopyDay(day, title) => write!(f, "Copy day {day}: {title}"),
            MenuChoice::CopyAll => write!(f, "Copy all captions"),
            MenuChoice::NewProfession => write!(f, "New profession"),
            MenuChoice::Quit => write!(f, "Quit"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let api = HttpCalendarApi::new(&cli.api_url).context("Failed to build HTTP client")?;
    let mut form = FormController::new(api, SystemClipboard);

    match cli.profession {
        Some(profession) => run_once(&mut form, &profession, cli.copy_all).await,
        None => run_interactive(&mut form).await,
    }
}

async fn run_once<A: CalendarApi, C: Clipboard>(
    form: &mut FormController<A, C>,
    profession: &str,
    copy_all: bool,
) -> Result<()> {
    match form.submit(profession).await {
        SubmitOutcome::Ignored => anyhow::bail!("profession cannot be blank"),
        SubmitOutcome::Failed => anyhow::bail!("{}", form.notice().unwrap_or_default()),
        SubmitOutcome::Generated => {}
    }

    if let Some(result) = form.result() {
        print!("{}", render_calendar(result));
    }

    if copy_all {
        form.copy_all()?;
        println!("\nAll captions copied to clipboard!");
    }
    Ok(())
}

async fn run_interactive<A: CalendarApi, C: Clipboard>(
    form: &mut FormController<A, C>,
) -> Result<()> {
    loop {
        let profession = match Text::new("Enter your profession")
            .with_placeholder("e.g., Software Engineer")
            .prompt()
        {
            Ok(p) => p,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(())
            }
            Err(e) => return Err(e.into()),
        };

        println!("Generating...");
        match form.submit(&profession).await {
            SubmitOutcome::Ignored => continue,
            SubmitOutcome::Failed => {
                eprintln!("{}", form.notice().unwrap_or_default());
                continue;
            }
            SubmitOutcome::Generated => {}
        }

        if let Some(result) = form.result() {
            print!("{}", render_calendar(result));
        }

        if !result_menu(form)? {
            return Ok(());
        }
        form.dismiss();
    }
}

/// Runs the actions menu for the current result. Returns `false` to quit.
fn result_menu<A: CalendarApi, C: Clipboard>(form: &FormController<A, C>) -> Result<bool> {
    loop {
        let mut choices: Vec<MenuChoice> = form
            .result()
            .map(|r| {
                r.calendar
                    .iter()
                    .map(|e| MenuChoice::CopyDay(e.day, e.title.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if !choices.is_empty() {
            choices.push(MenuChoice::CopyAll);
        }
        choices.push(MenuChoice::NewProfession);
        choices.push(MenuChoice::Quit);

        let choice = match Select::new("What next?", choices).prompt() {
            Ok(c) => c,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(false)
            }
            Err(e) => return Err(e.into()),
        };

        let copied = match choice {
            MenuChoice::CopyDay(day, _) => form
                .copy_entry(day)
                .map(|()| format!("Day {day} caption copied!")),
            MenuChoice::CopyAll => form
                .copy_all()
                .map(|()| "All captions copied to clipboard!".to_string()),
            MenuChoice::NewProfession => return Ok(true),
            MenuChoice::Quit => return Ok(false),
        };

        match copied {
            Ok(message) => println!("{message}"),
            Err(e) => eprintln!("Copy failed: {e}"),
        }
    }
}
