//! Interactive prompts and passphrase sources.

use std::collections::{HashMap, VecDeque};
use std::io::{self, IsTerminal};
use std::sync::Mutex;

use dialoguer::{theme::ColorfulTheme, Password};
use tracing::warn;

/// Check if we're running in an interactive terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Prompt for a password (hidden input). Empty input is allowed.
pub fn password(prompt: &str) -> io::Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Prompt for a password with confirmation.
///
/// The user must enter the same password twice for it to be accepted.
pub fn password_with_confirm(prompt: &str) -> io::Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Where key passphrases come from.
pub trait PassphraseSource: Send + Sync {
    /// Value of an environment variable, if set.
    fn env(&self, var: &str) -> Option<String>;

    /// Ask the user. An empty string means nothing was entered.
    fn prompt(&self, message: &str) -> io::Result<String>;

    /// Ask the user for a new passphrase, twice.
    fn prompt_new(&self, message: &str) -> io::Result<String> {
        self.prompt(message)
    }
}

/// Process environment plus a masked terminal prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPassphrases;

impl PassphraseSource for TerminalPassphrases {
    fn env(&self, var: &str) -> Option<String> {
        std::env::var(var).ok()
    }

    fn prompt(&self, message: &str) -> io::Result<String> {
        if !is_interactive() {
            warn!("No terminal for passphrase prompt: {}", message);
            return Ok(String::new());
        }
        password(message)
    }

    fn prompt_new(&self, message: &str) -> io::Result<String> {
        if !is_interactive() {
            warn!("No terminal for passphrase prompt: {}", message);
            return Ok(String::new());
        }
        password_with_confirm(message)
    }
}

/// Fixed environment and pre-recorded answers, for scripted runs.
///
/// Answers are handed out in order; once they run out every prompt gets an
/// empty string. Every prompt message is recorded.
#[derive(Debug, Default)]
pub struct ScriptedPassphrases {
    env: HashMap<String, String>,
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPassphrases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an environment variable.
    pub fn with_env(mut self, var: &str, value: &str) -> Self {
        self.env.insert(var.to_string(), value.to_string());
        self
    }

    /// Queue an answer for the next prompt.
    pub fn with_answer(self, answer: &str) -> Self {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(answer.to_string());
        }
        self
    }

    /// Messages of every prompt shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl PassphraseSource for ScriptedPassphrases {
    fn env(&self, var: &str) -> Option<String> {
        self.env.get(var).cloned()
    }

    fn prompt(&self, message: &str) -> io::Result<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        let mut answers = self
            .answers
            .lock()
            .map_err(|_| io::Error::other("answer queue poisoned"))?;
        Ok(answers.pop_front().unwrap_or_default())
    }
}
