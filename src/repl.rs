//! Interactive console loop.

use crate::error::Result;
use crate::llm::chat_session::{ChatSession, Transcript};
use crate::schedule::ScheduleStore;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// One line of console input, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Reload,
    Blank,
    Message(&'a str),
}

/// Classify a raw input line. Only the line terminator is stripped; `exit` must match
/// exactly.
pub fn parse_line(line: &str) -> Command<'_> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    match line {
        "exit" => Command::Exit,
        "/reload" => Command::Reload,
        _ if line.trim().is_empty() => Command::Blank,
        _ => Command::Message(line),
    }
}

/// Run the chat loop until `exit` or end of input, returning the final transcript.
///
/// Failed turns are reported on `output` and the conversation carries on from the last
/// good transcript.
pub async fn run<R: BufRead, W: Write>(
    session: &ChatSession,
    store: &ScheduleStore,
    clinic_name: &str,
    mut input: R,
    mut output: W,
) -> Result<Transcript> {
    let mut transcript = session.start();

    writeln!(output, "Welcome to the {} Chatbot!", clinic_name)?;
    writeln!(output, "Type 'exit' to quit.")?;

    let mut line = String::new();
    loop {
        write!(output, "\nYou: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input");
            writeln!(output)?;
            break;
        }

        match parse_line(&line) {
            Command::Exit => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            Command::Blank => continue,
            Command::Reload => match store.reload() {
                Ok(count) => writeln!(output, "Schedule reloaded: {} doctors", count)?,
                Err(e) => writeln!(output, "Error: {}", e)?,
            },
            Command::Message(text) => match session.turn(&transcript, text).await {
                Ok(outcome) => {
                    writeln!(output, "Chatbot: {}", outcome.reply)?;
                    transcript = outcome.transcript;
                }
                Err(e) => {
                    warn!("Turn failed: {}", e);
                    writeln!(output, "Error: {}", e)?;
                }
            },
        }
    }

    Ok(transcript)
}
