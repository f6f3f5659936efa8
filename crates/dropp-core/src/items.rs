//! Catalog of tracked items, loaded from `config/items.yaml`.
//!
//! Each item names the upstream sources it is monitored through. Not every
//! item uses every source kind; the snapshot builder only runs the
//! normalizers an item is configured for.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::snapshot::ItemIdentity;
use crate::ConfigError;

/// One of the three upstream shapes an item may be configured to use.
///
/// Declaration order is the order the snapshot builder applies updates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Storefront HTML page; availability is scraped from a status element.
    HtmlScrape,
    /// Product-status JSON endpoint carrying a message and a final price.
    StatusJson,
    /// Third-party marketplace listing JSON.
    MarketplaceJson,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::HtmlScrape,
        SourceKind::StatusJson,
        SourceKind::MarketplaceJson,
    ];
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::HtmlScrape => write!(f, "html_scrape"),
            SourceKind::StatusJson => write!(f, "status_json"),
            SourceKind::MarketplaceJson => write!(f, "marketplace_json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Endpoint the fetch collaborator requests for this source.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    /// Canonical product page, carried into every diff for this item.
    pub url: String,
    /// CSS selector for the HTML status element. Defaults to `.status`.
    #[serde(default)]
    pub status_selector: Option<String>,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ItemConfig {
    /// Generate a URL-safe slug from the item name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    #[must_use]
    pub fn identity(&self) -> ItemIdentity {
        ItemIdentity {
            name: self.name.clone(),
            url: self.url.clone(),
        }
    }

    /// Configured source kinds, in builder application order.
    #[must_use]
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = self.sources.iter().map(|s| s.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    #[must_use]
    pub fn source(&self, kind: SourceKind) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    /// Both the scrape and the status endpoint write `availability`; their
    /// vocabularies are not known to agree.
    #[must_use]
    pub fn has_competing_availability_sources(&self) -> bool {
        self.source(SourceKind::HtmlScrape).is_some()
            && self.source(SourceKind::StatusJson).is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemsFile {
    pub items: Vec<ItemConfig>,
}

/// Load and validate the item catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_items(path: &Path) -> Result<ItemsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ItemsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_items(&content)
}

/// Parse and validate an item catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_items(content: &str) -> Result<ItemsFile, ConfigError> {
    let items_file: ItemsFile = serde_yaml::from_str(content)?;
    validate_items(&items_file)?;
    Ok(items_file)
}

fn validate_items(items_file: &ItemsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for item in &items_file.items {
        if item.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "item name must be non-empty".to_string(),
            ));
        }

        if item.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "item '{}' has an empty url",
                item.name
            )));
        }

        if item.sources.is_empty() {
            return Err(ConfigError::Validation(format!(
                "item '{}' has no sources configured",
                item.name
            )));
        }

        let mut seen_kinds = HashSet::new();
        for source in &item.sources {
            if !seen_kinds.insert(source.kind) {
                return Err(ConfigError::Validation(format!(
                    "item '{}' configures source '{}' more than once",
                    item.name, source.kind
                )));
            }
            if source.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "item '{}' source '{}' has an empty url",
                    item.name, source.kind
                )));
            }
        }

        if let Some(selector) = &item.status_selector {
            if selector.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "item '{}' has an empty status_selector",
                    item.name
                )));
            }
        }

        let lower_name = item.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate item name: '{}'",
                item.name
            )));
        }

        let slug = item.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate item slug: '{}' (from item '{}')",
                slug, item.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "items_test.rs"]
mod tests;
