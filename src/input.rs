use std::collections::VecDeque;

use inquire::Text;

use crate::display;
use crate::error::AgendoError;

/// Where the resolver gets its answers when tokens do not cover every field.
///
/// The terminal implementation blocks until the user types something; the
/// scripted one feeds canned answers so resolution flows can run headless in
/// tests. A closed channel is the only failure and aborts the whole command.
pub trait Prompter {
    fn prompt_line(&mut self, label: &str) -> Result<String, AgendoError>;
    fn warn(&mut self, message: &str);
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt_line(&mut self, label: &str) -> Result<String, AgendoError> {
        Text::new(&format!("Enter {}:", label))
            .prompt()
            .map_err(|_| AgendoError::InputClosed)
    }

    fn warn(&mut self, message: &str) {
        display::error(message);
    }
}

/// Canned answers for tests, consumed front to back. Running out of answers
/// behaves like a closed stdin.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt_line(&mut self, label: &str) -> Result<String, AgendoError> {
        self.asked.push(label.to_string());
        self.answers.pop_front().ok_or(AgendoError::InputClosed)
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
