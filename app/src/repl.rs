//! Interactive read-eval-print loop.
//!
//! Each iteration reads one line, parses it into a command and runs it
//! against the session. Errors become printed messages; the loop keeps
//! going until `quit` or end of input.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

use crate::commands::{self, Command};
use crate::session::Session;

const PROMPT: &str = "datalens> ";

pub async fn run(session: &mut Session) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("DataLens interactive shell. Type 'help' for commands, 'quit' to leave.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                let command = match Command::parse(line) {
                    Ok(command) => command,
                    Err(usage) => {
                        println!("{usage}");
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }

                if let Err(e) = commands::dispatch(command, session).await {
                    if e.is_warning() {
                        warn!("{e}");
                    } else {
                        eprintln!("error: {e}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(connection) = session.connection() {
        connection.close().await;
    }
    Ok(())
}
