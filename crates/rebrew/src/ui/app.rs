//! Line-oriented interactive flow from inventory to compiled script.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::app::compile::ScriptCompiler;
use crate::app::normalize::Normalizer;
use crate::app::scan::{BundleScanner, ScannerConfig};
use crate::app::selector::{CommandSource, Selector};
use crate::app::shellcfg::ShellConfigCollector;
use crate::domain::model::ProvisionPlan;
use crate::infra::brew;
use crate::infra::catalog::{CatalogClient, CatalogStatus};
use crate::infra::config::Config;
use crate::infra::console::{self, StdinConsole};

/// Drives the end-to-end provisioning wizard.
///
/// Every stage degrades rather than aborts; the flow is designed to always
/// reach script emission. The one fatal error left is an unwritable output
/// location.
pub struct WizardApp<S: CommandSource> {
    config: Config,
    console: S,
    home_dir: Option<PathBuf>,
    output_path: PathBuf,
}

impl WizardApp<StdinConsole> {
    pub fn new(config: Config, output_override: Option<PathBuf>) -> Self {
        Self::with_console(config, output_override, StdinConsole)
    }
}

impl<S: CommandSource> WizardApp<S> {
    /// Build a wizard around an explicit command source.
    pub fn with_console(config: Config, output_override: Option<PathBuf>, console: S) -> Self {
        let output_path =
            output_override.unwrap_or_else(|| PathBuf::from(&config.defaults.output_path));
        Self {
            config,
            console,
            home_dir: dirs_next::home_dir(),
            output_path,
        }
    }

    /// Override the home directory used for shell config capture.
    pub fn with_home_dir(mut self, home: PathBuf) -> Self {
        self.home_dir = Some(home);
        self
    }

    /// Run the full flow: scan, check, curate, capture, compile.
    pub fn run(&mut self) -> Result<()> {
        let normalizer = Normalizer::from_config(&self.config);
        let scanner_cfg = ScannerConfig::from_config(&self.config);
        let candidates = BundleScanner::new().scan(&scanner_cfg, &normalizer)?;

        let catalog = CatalogClient::new(&self.config.defaults.catalog_base_url)?;
        let (found, not_found) = check_candidates(&catalog, &candidates);

        println!("\nApplications found in Homebrew casks:");
        for app in &found {
            println!("- {app}");
        }
        println!("\nApplications not found in Homebrew casks:");
        for app in &not_found {
            println!("- {app}");
        }

        let casks = Selector::new("cask package").select(&mut self.console, &found)?;
        println!("\nSelected {} Homebrew cask packages:", casks.len());
        println!("{}", casks.items().join(" "));

        let available = brew::installed_packages(&self.config.defaults.brew_command);
        if !available.is_empty() {
            println!("\nHomebrew packages:");
            for package in &available {
                println!(" - {package}");
            }
        }
        let packages = Selector::new("package").select(&mut self.console, &available)?;
        println!("\nSelected {} Homebrew packages:", packages.len());
        println!("{}", packages.items().join(" "));

        let collector = ShellConfigCollector::from_config(&self.config);
        let shell_entries = match self.home_dir.clone() {
            Some(home) => collector.collect(&mut self.console, &home)?,
            None => {
                tracing::warn!("home directory unavailable; skipping shell config capture");
                Vec::new()
            }
        };
        if !shell_entries.is_empty() {
            println!("\nCloned shell configuration files:");
            for entry in &shell_entries {
                println!(
                    "Handling '{}' with operation '{}': {} lines",
                    entry.file_name,
                    entry.strategy.as_str(),
                    entry.contents.lines().count()
                );
            }
        }

        let post_run = self.collect_post_run()?;
        if !post_run.is_empty() {
            println!("\nTotal {} lines of post run script setup.", post_run.len());
        }

        let refresh_ui = console::ask_yes_no_strict(
            &mut self.console,
            "Do you want the script to refresh the Dock and Finder after the script is done? (y/n): ",
        )?;

        let plan = ProvisionPlan {
            packages,
            casks,
            shell_entries,
            post_run,
            refresh_ui,
        };
        let compiler = ScriptCompiler::new()?;
        let result = compiler.compile_to(&plan, &self.output_path)?;
        println!(
            "Bash script '{}' has been created and made executable.",
            result.output_path.display()
        );
        Ok(())
    }

    fn collect_post_run(&mut self) -> Result<Vec<String>> {
        let wanted = console::ask_yes(
            &mut self.console,
            "\nDo you want to add a post run script? (y/n): ",
        )?;
        if !wanted {
            return Ok(Vec::new());
        }

        println!("Enter your post run script line by line. Type 'end' to finish.");
        let mut lines = Vec::new();
        loop {
            let line = self.console.read_line("")?;
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().eq_ignore_ascii_case("end") {
                break;
            }
            lines.push(line.to_owned());
        }
        Ok(lines)
    }
}

fn check_candidates(catalog: &CatalogClient, candidates: &[String]) -> (Vec<String>, Vec<String>) {
    let mut found = Vec::new();
    let mut not_found = Vec::new();

    for (index, name) in candidates.iter().enumerate() {
        print!(
            "[{}/{}] Checking {} formulae...",
            index + 1,
            candidates.len(),
            name
        );
        let _ = io::stdout().flush();
        match catalog.check(name) {
            CatalogStatus::Found => {
                println!(" Found");
                found.push(name.clone());
            }
            CatalogStatus::NotFound => {
                println!(" Not found");
                not_found.push(name.clone());
            }
        }
    }

    (found, not_found)
}
