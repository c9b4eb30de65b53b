//! Configuration management utilities.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".rebrew/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub scan: Scan,
    #[serde(default = "default_overrides")]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub shell: Shell,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            scan: Scan::default(),
            overrides: default_overrides(),
            shell: Shell::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_output_path")]
    pub output_path: String,
    #[serde(default = "Defaults::default_catalog_base_url")]
    pub catalog_base_url: String,
    #[serde(default = "Defaults::default_brew_command")]
    pub brew_command: String,
}

impl Defaults {
    fn default_output_path() -> String {
        "initial_setup_compiled.sh".into()
    }

    fn default_catalog_base_url() -> String {
        "https://formulae.brew.sh/cask".into()
    }

    fn default_brew_command() -> String {
        "brew".into()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output_path: Self::default_output_path(),
            catalog_base_url: Self::default_catalog_base_url(),
            brew_command: Self::default_brew_command(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default = "Scan::default_app_dirs")]
    pub app_dirs: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl Scan {
    fn default_app_dirs() -> Vec<String> {
        vec!["/Applications".into(), "~/Applications".into()]
    }
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            app_dirs: Self::default_app_dirs(),
            blacklist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shell {
    #[serde(default = "Shell::default_files")]
    pub files: Vec<String>,
}

impl Shell {
    fn default_files() -> Vec<String> {
        vec![
            ".zshrc".into(),
            ".zprofile".into(),
            ".bashrc".into(),
            ".bash_profile".into(),
        ]
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self {
            files: Self::default_files(),
        }
    }
}

fn default_overrides() -> BTreeMap<String, String> {
    [
        ("iTerm.app".to_owned(), "iterm2".to_owned()),
        ("Chromium.app".to_owned(), "eloston-chromium".to_owned()),
    ]
    .into_iter()
    .collect()
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    output_path: Option<String>,
    catalog_base_url: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            output_path: env::var("REBREW_OUTPUT").ok(),
            catalog_base_url: env::var("REBREW_CATALOG_URL").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(output_path: &str, catalog_base_url: &str) -> Self {
        Self {
            output_path: Some(output_path.to_owned()),
            catalog_base_url: Some(catalog_base_url.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace
    /// config, and env overrides, later layers winning.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Load with an explicit workspace config file instead of the discovered
    /// one.
    pub fn load_from(workspace: PathBuf) -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), Some(workspace), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            scan: merge_scan(self.scan, other.scan),
            overrides: merge_overrides(self.overrides, other.overrides),
            shell: merge_shell(self.shell, other.shell),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        output_path: if overlay.output_path != Defaults::default_output_path() {
            overlay.output_path
        } else {
            base.output_path
        },
        catalog_base_url: if overlay.catalog_base_url != Defaults::default_catalog_base_url() {
            overlay.catalog_base_url
        } else {
            base.catalog_base_url
        },
        brew_command: if overlay.brew_command != Defaults::default_brew_command() {
            overlay.brew_command
        } else {
            base.brew_command
        },
    }
}

fn merge_scan(base: Scan, overlay: Scan) -> Scan {
    let app_dirs = if overlay.app_dirs != Scan::default_app_dirs() {
        overlay.app_dirs
    } else {
        base.app_dirs
    };

    let mut blacklist: BTreeSet<String> = base.blacklist.into_iter().collect();
    blacklist.extend(overlay.blacklist);

    Scan {
        app_dirs,
        blacklist: blacklist.into_iter().collect(),
    }
}

fn merge_overrides(
    mut base: BTreeMap<String, String>,
    overlay: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    base.extend(overlay);
    base
}

fn merge_shell(base: Shell, overlay: Shell) -> Shell {
    Shell {
        files: if overlay.files != Shell::default_files() {
            overlay.files
        } else {
            base.files
        },
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("rebrew/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    Ok(Some(cwd.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(output_path) = env.output_path {
        config.defaults.output_path = output_path;
    }
    if let Some(catalog_base_url) = env.catalog_base_url {
        config.defaults.catalog_base_url = catalog_base_url;
    }
    config
}
