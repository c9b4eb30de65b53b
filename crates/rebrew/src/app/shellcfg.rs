//! Shell configuration capture.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::app::selector::CommandSource;
use crate::domain::model::{MergeStrategy, ShellConfigEntry};
use crate::infra::config::Config;
use crate::infra::console;

/// Asks, per candidate dotfile, whether to capture it and how to merge it
/// later on the target machine.
#[derive(Debug, Clone)]
pub struct ShellConfigCollector {
    candidates: Vec<String>,
}

impl ShellConfigCollector {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shell.files.clone())
    }

    /// Walk the candidate files under `home`.
    ///
    /// Missing files are skipped silently and declined files without a
    /// strategy prompt. A file that cannot be read after confirmation is
    /// reported and skipped; capture never aborts the flow.
    pub fn collect<S: CommandSource>(
        &self,
        source: &mut S,
        home: &Path,
    ) -> Result<Vec<ShellConfigEntry>> {
        let mut entries = Vec::new();

        for file_name in &self.candidates {
            let path = home.join(file_name);
            if !path.exists() {
                continue;
            }

            let prompt = format!("Do you want to clone the contents of '{file_name}'? (y/n): ");
            if !console::ask_yes(source, &prompt)? {
                continue;
            }

            let strategy = ask_strategy(source, file_name)?;
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unable to read shell config file");
                    println!("Error: unable to read '{file_name}', skipping.");
                    continue;
                }
            };

            entries.push(ShellConfigEntry {
                file_name: file_name.clone(),
                contents,
                strategy,
            });
        }

        Ok(entries)
    }
}

fn ask_strategy<S: CommandSource>(source: &mut S, file_name: &str) -> Result<MergeStrategy> {
    loop {
        let prompt = format!(
            "How do you want to handle '{file_name}'? (o [overwrite]/a [append]/p [prepend]): "
        );
        let line = source.read_line(&prompt)?;
        match MergeStrategy::from_str(&line) {
            Ok(strategy) => return Ok(strategy),
            Err(_) => println!("Invalid input. Please enter 'o', 'a', or 'p'."),
        }
    }
}
