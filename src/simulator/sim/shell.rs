use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::command::{Command, HELP};
use crate::error::SimResult;

/// Interactive command reader with line editing and history
pub struct Shell {
  editor: DefaultEditor,
}

impl Shell {
  pub fn new() -> SimResult<Self> {
    Ok(Self {
      editor: DefaultEditor::new()?,
    })
  }

  /// Next command; Enter steps once, Ctrl-C / Ctrl-D quit
  pub fn read_command(&mut self) -> SimResult<Command> {
    loop {
      match self.editor.readline("(dfii) ") {
        Ok(line) => {
          let trimmed = line.trim();
          if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
          }
          if trimmed == "help" || trimmed == "?" {
            println!("{}", HELP);
            continue;
          }

          match Command::parse(trimmed) {
            Ok(Some(command)) => return Ok(command),
            Ok(None) => return Ok(Command::Step(1)),
            Err(e) => eprintln!("Error: {}", e),
          }
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Command::Quit),
        Err(err) => return Err(err.into()),
      }
    }
  }
}
