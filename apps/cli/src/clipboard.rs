//! Clipboard text formatting and the system clipboard backend.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::api::CalendarEntry;

/// Platform clipboard tools, tried in order.
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard tool found (tried pbcopy, wl-copy, xclip, xsel, clip)")]
    Unavailable,

    #[error("clipboard command `{command}` failed: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("clipboard command `{command}` exited with {status}")]
    Exit { command: String, status: String },
}

pub trait Clipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Formats one entry as `Day {day}: {title}` followed by the caption.
pub fn format_entry(entry: &CalendarEntry) -> String {
    format!("Day {}: {}\n{}", entry.day, entry.title, entry.caption)
}

/// Formats every entry, in received order, separated by a blank line.
pub fn format_all(entries: &[CalendarEntry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pipes text into the first clipboard tool available on this machine.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in CLIPBOARD_COMMANDS {
            let mut child = match Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Clipboard tool `{program}` not found");
                    continue;
                }
                Err(source) => {
                    return Err(ClipboardError::Io {
                        command: program.to_string(),
                        source,
                    })
                }
            };

            let io_err = |source| ClipboardError::Io {
                command: program.to_string(),
                source,
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).map_err(io_err)?;
            }
            let status = child.wait().map_err(io_err)?;

            if !status.success() {
                return Err(ClipboardError::Exit {
                    command: program.to_string(),
                    status: status.to_string(),
                });
            }
            return Ok(());
        }

        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u8, title: &str, caption: &str) -> CalendarEntry {
        CalendarEntry {
            day,
            title: title.to_string(),
            caption: caption.to_string(),
        }
    }

    #[test]
    fn test_format_entry_literal_shape() {
        assert_eq!(
            format_entry(&entry(3, "Pair programming", "Two heads, one keyboard.")),
            "Day 3: Pair programming\nTwo heads, one keyboard."
        );
    }

    #[test]
    fn test_format_all_joins_with_blank_line_in_received_order() {
        let entries = vec![entry(1, "A", "a"), entry(2, "B", "b"), entry(3, "C", "c")];
        assert_eq!(format_all(&entries), "Day 1: A\na\n\nDay 2: B\nb\n\nDay 3: C\nc");
    }

    #[test]
    fn test_format_all_empty_is_empty_string() {
        assert_eq!(format_all(&[]), "");
    }
}
