// Interactive prompt: reads command lines and prints their results.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::app::{AppState, CommandOutcome};

const PROMPT: &str = "> ";

/// Run the read-eval-print loop until `quit`, Ctrl-C, or Ctrl-D.
pub fn run(app: &mut AppState) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Type 'help' for commands.");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match app.handle_line(line) {
                    CommandOutcome::Continue(text) => {
                        if !text.is_empty() {
                            println!("{text}");
                        }
                    }
                    CommandOutcome::Quit => {
                        println!("Bye");
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("\nBye");
                break;
            }
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    info!("Session ended after {} picks", app.draft.picks().len());
    Ok(())
}
