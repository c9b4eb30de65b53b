//! Canonical catalog keys for application bundle names.

use std::collections::{BTreeMap, BTreeSet};

use crate::infra::config::Config;

const BUNDLE_SUFFIX: &str = ".app";

/// Maps raw bundle names to catalog-lookup keys.
///
/// The override table and the blacklist are immutable once constructed and
/// both match the raw name exactly, case included.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    overrides: BTreeMap<String, String>,
    blacklist: BTreeSet<String>,
}

impl Normalizer {
    pub fn new(overrides: BTreeMap<String, String>, blacklist: BTreeSet<String>) -> Self {
        Self {
            overrides,
            blacklist,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.overrides.clone(),
            config.scan.blacklist.iter().cloned().collect(),
        )
    }

    /// Blacklisted names never reach normalization or selection.
    pub fn is_blacklisted(&self, raw: &str) -> bool {
        self.blacklist.contains(raw)
    }

    /// Canonical key for a raw bundle name.
    ///
    /// An override entry wins outright. Otherwise the name is lowercased,
    /// spaces become hyphens, and one trailing `.app` suffix is stripped.
    pub fn normalize(&self, raw: &str) -> String {
        if let Some(mapped) = self.overrides.get(raw) {
            return mapped.clone();
        }
        let lowered = raw.to_lowercase().replace(' ', "-");
        lowered
            .strip_suffix(BUNDLE_SUFFIX)
            .unwrap_or(&lowered)
            .to_owned()
    }
}
