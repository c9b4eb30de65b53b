use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use rebrew::infra::config::Config;
use rebrew::ui::app::WizardApp;

/// Inventory installed macOS software and compile a provisioning script.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Where to write the compiled script (defaults to the configured path).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Explicit workspace config file instead of .rebrew/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    rebrew::init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let name = command.get_name().to_owned();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    let config = match cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut app = WizardApp::new(config, cli.output);
    app.run()
}
