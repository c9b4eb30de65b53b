//! Command intake implementations and small prompt helpers.

use std::collections::VecDeque;
use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use crate::app::selector::CommandSource;

/// Blocking stdin-backed command intake for the interactive flow.
#[derive(Debug, Default)]
pub struct StdinConsole;

impl CommandSource for StdinConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            bail!("input stream closed");
        }
        Ok(line)
    }
}

/// Feeds a predetermined line sequence and records every prompt it was
/// asked. Backs deterministic tests and scripted runs.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    queue: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts issued so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl CommandSource for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_owned());
        match self.queue.pop_front() {
            Some(line) => Ok(line),
            None => bail!("scripted input exhausted at prompt: {prompt}"),
        }
    }
}

/// Ask a yes/no question, treating anything but `y` as no.
pub fn ask_yes<S: CommandSource>(source: &mut S, prompt: &str) -> Result<bool> {
    let line = source.read_line(prompt)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

/// Ask a yes/no question, re-prompting until one of `y`/`n` arrives.
pub fn ask_yes_no_strict<S: CommandSource>(source: &mut S, prompt: &str) -> Result<bool> {
    loop {
        let line = source.read_line(prompt)?;
        match line.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => println!("Invalid input. Please enter 'y' or 'n'."),
        }
    }
}
