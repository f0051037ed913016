//! Interactive yes/no confirmation

use std::io::{self, BufRead, Write};

/// Asks the user to confirm an action
pub trait Confirm: Send {
    /// Ask `question`; only an explicit yes counts as consent
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Prompts on stdout and reads the answer from stdin
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        print!("{question} [y/N] => ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(is_yes(&answer))
    }
}

/// Whether a typed answer means yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
