//! Language label resolution.
//!
//! The editor's five sample languages have fixed judge identifiers. Any other
//! label is looked up in the judge's catalog with a case-insensitive substring
//! match against each entry's name and slug. The first match in catalog order
//! wins, so the order returned by the service is kept as is.

use crate::judge::client::JudgeClient;
use crate::judge::types::CatalogLanguage;

/// Labels with fixed identifiers; never sent to the catalog.
pub const COMMON_LANGUAGES: &[(&str, u32)] = &[
    ("python", 71),
    ("javascript", 63),
    ("java", 62),
    ("cpp", 54),
    ("c", 50),
];

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Look a label up in the static table only.
pub fn lookup_common(label: &str) -> Option<u32> {
    let label = normalize(label);
    COMMON_LANGUAGES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, id)| *id)
}

/// First catalog entry whose name or slug contains the label, ignoring case.
pub fn match_catalog(label: &str, catalog: &[CatalogLanguage]) -> Option<u32> {
    let label = normalize(label);
    if label.is_empty() {
        return None;
    }

    catalog
        .iter()
        .find(|language| {
            language.name.to_lowercase().contains(&label)
                || language
                    .slug
                    .as_deref()
                    .is_some_and(|slug| slug.to_lowercase().contains(&label))
        })
        .map(|language| language.id)
}

/// Resolve a label to a judge language id.
///
/// A failed catalog request is logged and treated as "no match".
pub async fn resolve_language(label: &str, judge: &dyn JudgeClient) -> Option<u32> {
    if let Some(id) = lookup_common(label) {
        log::debug!("Language '{}' resolved from table to id {}", label, id);
        return Some(id);
    }

    let catalog = match judge.languages().await {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("Language catalog lookup for '{}' failed: {}", label, e);
            return None;
        }
    };

    let resolved = match_catalog(label, &catalog);
    match resolved {
        Some(id) => log::debug!("Language '{}' resolved from catalog to id {}", label, id),
        None => log::info!(
            "Language '{}' not found among {} catalog entries",
            label,
            catalog.len()
        ),
    }
    resolved
}
