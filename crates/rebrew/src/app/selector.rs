//! Paginated interactive selection over an ordered candidate sequence.

use anyhow::Result;

use crate::domain::model::SelectionSet;

/// One user decision at a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Include,
    Exclude,
    Back,
    SelectAll,
    SelectNone,
}

impl Command {
    /// Parse the single-line command vocabulary. Unknown input yields `None`
    /// and the caller re-prompts at the same position.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" => Some(Command::Include),
            "n" => Some(Command::Exclude),
            "b" => Some(Command::Back),
            "aa" => Some(Command::SelectAll),
            "nn" => Some(Command::SelectNone),
            _ => None,
        }
    }
}

/// Blocking line-oriented command intake.
///
/// The selector only ever asks for "the next line". The stdin-backed
/// implementation lives in [`crate::infra::console`]; a scripted source
/// backs deterministic tests.
pub trait CommandSource {
    /// Present `prompt` and block until one line of input arrives.
    ///
    /// An exhausted or closed input stream is the sole error case and is
    /// surfaced to the caller rather than retried.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Walks an ordered candidate sequence one decision at a time.
///
/// The label names the kind of item in prompts ("package", "cask package").
/// The selector holds no state between calls; each [`Selector::select`] run
/// starts from an empty set and cursor zero.
#[derive(Debug, Clone)]
pub struct Selector {
    label: String,
}

impl Selector {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Run the selection loop and return the curated subset.
    ///
    /// An empty input sequence returns an empty set without consuming a
    /// prompt. `b` at the first item is accepted but does nothing. `aa`
    /// unions every item from the cursor onward into the set and terminates;
    /// `nn` terminates with the set as it stands. Unrecognized input
    /// re-prompts at the same position.
    pub fn select<S: CommandSource>(
        &self,
        source: &mut S,
        items: &[String],
    ) -> Result<SelectionSet> {
        let mut selected = SelectionSet::new();
        let mut cursor = 0usize;

        while cursor < items.len() {
            let item = &items[cursor];
            let prompt = format!(
                "[{}/{}] Include {} '{}'? (y/n/b [back]/aa [all]/nn [none]): ",
                cursor + 1,
                items.len(),
                self.label,
                item,
            );
            let line = source.read_line(&prompt)?;
            match Command::parse(&line) {
                Some(Command::Include) => {
                    selected.insert(item);
                    cursor += 1;
                }
                Some(Command::Exclude) => {
                    selected.remove(item);
                    cursor += 1;
                }
                Some(Command::Back) => {
                    cursor = cursor.saturating_sub(1);
                }
                Some(Command::SelectAll) => {
                    for remaining in &items[cursor..] {
                        selected.insert(remaining);
                    }
                    break;
                }
                Some(Command::SelectNone) => break,
                None => {
                    println!("Invalid input. Please enter 'y', 'n', 'b', 'aa', or 'nn'.");
                }
            }
        }

        Ok(selected)
    }
}
