//! Application bundle scanning.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::app::normalize::Normalizer;
use crate::infra::config::Config;

const BUNDLE_SUFFIX: &str = ".app";

/// Configuration inputs for the bundle scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub app_dirs: Vec<PathBuf>,
}

impl ScannerConfig {
    /// Expand configured directories, resolving a leading `~/` against the
    /// user's home directory.
    pub fn from_config(config: &Config) -> Self {
        let app_dirs = config
            .scan
            .app_dirs
            .iter()
            .map(|dir| expand_home(dir))
            .collect();
        Self { app_dirs }
    }
}

/// Scanner producing the ordered canonical candidate sequence.
#[derive(Debug, Default)]
pub struct BundleScanner;

impl BundleScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect `.app` bundle names from the configured directories, drop
    /// blacklisted names, normalize the rest, and return them sorted and
    /// de-duplicated.
    ///
    /// Missing or unreadable directories are skipped with a warning; the
    /// scan itself never aborts the flow.
    pub fn scan(&self, cfg: &ScannerConfig, normalizer: &Normalizer) -> Result<Vec<String>> {
        let mut raw_names = Vec::new();
        for dir in &cfg.app_dirs {
            if !dir.exists() {
                continue;
            }
            collect_bundle_names(dir, &mut raw_names);
        }

        let mut canonical: Vec<String> = raw_names
            .iter()
            .filter(|name| !normalizer.is_blacklisted(name))
            .map(|name| normalizer.normalize(name))
            .collect();
        canonical.sort();
        canonical.dedup();
        Ok(canonical)
    }
}

fn collect_bundle_names(dir: &Path, out: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "unable to list application directory");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(BUNDLE_SUFFIX) {
            out.push(name.to_owned());
        }
    }
}

fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/")
        && let Some(home) = dirs_next::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::fs;

    #[test]
    fn collects_sorted_canonical_names() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir(root.join("Zed.app"))?;
        fs::create_dir(root.join("Alfred 5.app"))?;
        fs::write(root.join("README.txt"), b"not a bundle")?;

        let cfg = ScannerConfig {
            app_dirs: vec![root.to_path_buf()],
        };
        let names = BundleScanner::new().scan(&cfg, &Normalizer::default())?;
        assert_eq!(names, ["alfred-5", "zed"]);
        Ok(())
    }

    #[test]
    fn blacklisted_bundles_never_become_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir(root.join("Keep.app"))?;
        fs::create_dir(root.join("Drop.app"))?;

        let blacklist: BTreeSet<String> = ["Drop.app".to_owned()].into_iter().collect();
        let normalizer = Normalizer::new(BTreeMap::new(), blacklist);

        let cfg = ScannerConfig {
            app_dirs: vec![root.to_path_buf()],
        };
        let names = BundleScanner::new().scan(&cfg, &normalizer)?;
        assert_eq!(names, ["keep"]);
        Ok(())
    }

    #[test]
    fn duplicate_bundles_across_directories_collapse() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let first = temp.path().join("system");
        let second = temp.path().join("user");
        fs::create_dir_all(first.join("Shared.app"))?;
        fs::create_dir_all(second.join("Shared.app"))?;

        let cfg = ScannerConfig {
            app_dirs: vec![first, second],
        };
        let names = BundleScanner::new().scan(&cfg, &Normalizer::default())?;
        assert_eq!(names, ["shared"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_skipped() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let cfg = ScannerConfig {
            app_dirs: vec![temp.path().join("does-not-exist")],
        };
        let names = BundleScanner::new().scan(&cfg, &Normalizer::default())?;
        assert!(names.is_empty());
        Ok(())
    }
}
