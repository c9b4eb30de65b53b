//! Provisioning script compilation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use minijinja::Environment;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::model::{MergeStrategy, ProvisionPlan};

const SCRIPT_TEMPLATE_NAME: &str = "provision_script";

/// Result of compiling and persisting the provisioning script.
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub rendered: String,
    pub output_path: PathBuf,
}

/// Renders provisioning plans into executable bash scripts.
///
/// Rendering is pure templating over the plan; the only failure modes are
/// template errors at construction and filesystem errors on write.
pub struct ScriptCompiler {
    env: Environment<'static>,
}

impl ScriptCompiler {
    /// Create a compiler with the built-in script template loaded.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template(SCRIPT_TEMPLATE_NAME, SCRIPT_TEMPLATE)
            .map_err(|err| anyhow!("failed to register script template: {err}"))?;
        Ok(Self { env })
    }

    /// Render the plan into script text.
    pub fn render(&self, plan: &ProvisionPlan) -> Result<String> {
        let context = build_template_context(plan)?;
        let template = self
            .env
            .get_template(SCRIPT_TEMPLATE_NAME)
            .map_err(|err| anyhow!("script template missing: {err}"))?;
        template
            .render(&context)
            .map_err(|err| anyhow!("failed to render provisioning script: {err}"))
    }

    /// Render the plan and write it once to `path`, marking it executable.
    ///
    /// An unwritable output location has no recovery path and is the one
    /// failure allowed to take the process down.
    pub fn compile_to(&self, plan: &ProvisionPlan, path: &Path) -> Result<CompileResult> {
        let rendered = self.render(plan)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
        fs::write(path, &rendered)
            .with_context(|| format!("failed to write provisioning script to {}", path.display()))?;
        mark_executable(path)?;

        Ok(CompileResult {
            rendered,
            output_path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn build_template_context(plan: &ProvisionPlan) -> Result<TemplateContext> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format script timestamp")?;

    let shell_files = plan
        .shell_entries
        .iter()
        .map(|entry| {
            let target = format!("~/{}", entry.file_name);
            let encoded = BASE64.encode(entry.contents.as_bytes());
            TemplateShellFile {
                action: action_verb(entry.strategy).to_owned(),
                command: merge_command(entry.strategy, &target, &encoded),
                target,
            }
        })
        .collect();

    Ok(TemplateContext {
        generated_at,
        packages: plan.packages.items().to_vec(),
        casks: plan.casks.items().to_vec(),
        shell_files,
        post_run: plan.post_run.clone(),
        refresh_ui: plan.refresh_ui,
    })
}

fn action_verb(strategy: MergeStrategy) -> &'static str {
    match strategy {
        MergeStrategy::Overwrite => "Overwriting",
        MergeStrategy::Append => "Appending to",
        MergeStrategy::Prepend => "Prepending to",
    }
}

/// Bash line that applies the captured contents to `target`.
///
/// Contents travel base64-encoded so arbitrary bytes survive embedding in
/// the script text.
fn merge_command(strategy: MergeStrategy, target: &str, encoded: &str) -> String {
    match strategy {
        MergeStrategy::Overwrite => {
            format!("echo {encoded} | base64 --decode > {target}")
        }
        MergeStrategy::Append => {
            format!("echo {encoded} | base64 --decode >> {target}")
        }
        MergeStrategy::Prepend => {
            let tmp = format!("{target}.rebrew_tmp");
            format!("echo {encoded} | base64 --decode | cat - {target} > {tmp} && mv {tmp} {target}")
        }
    }
}

#[derive(Serialize)]
struct TemplateContext {
    generated_at: String,
    packages: Vec<String>,
    casks: Vec<String>,
    shell_files: Vec<TemplateShellFile>,
    post_run: Vec<String>,
    refresh_ui: bool,
}

#[derive(Serialize)]
struct TemplateShellFile {
    target: String,
    action: String,
    command: String,
}

const SCRIPT_TEMPLATE: &str = r#"#!/bin/bash
# Provisioning script compiled by rebrew at {{ generated_at }}.
# Safe to re-run: every phase is a no-op once its work is done.

# Step 1: Install Homebrew
echo "[1/5] Installing Homebrew..."
if ! command -v brew >/dev/null 2>&1; then
  /bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)"
fi
eval "$(/opt/homebrew/bin/brew shellenv)"

# Step 2: Install Homebrew non-cask packages
echo "[2/5] Installing Homebrew non-cask packages..."
{% if packages %}
brew install {{ packages|join(" ") }}
{% endif %}

# Step 3: Install Homebrew cask packages
echo "[3/5] Installing Homebrew cask packages..."
{% if casks %}
brew install --cask {{ casks|join(" ") }}
{% endif %}

# Step 4: Update shell configuration files
{% for file in shell_files %}
echo '[4/5] {{ file.action }} {{ file.target }}...'
{{ file.command }}
{% endfor %}

# Step 5: Execute post run script
echo "[5/5] Executing {{ post_run|length }} lines of post run script..."
{% for line in post_run %}
{{ line }}
{% endfor %}
{% if refresh_ui %}
killall Dock Finder
{% endif %}

echo 'Configuration complete.'
"#;
