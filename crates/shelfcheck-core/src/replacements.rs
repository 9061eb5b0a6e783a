//! Replacement mapping: which product should be shown next to a given one.
//!
//! The mapping lives in a JSON object on disk (`{"B0OLD": "B0NEW"}`) and is
//! read once per run. Lookups are one hop only; chains are not followed.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::asin::Asin;
use crate::error::ResolveError;
use crate::product::ProductRecord;
use crate::source::{index_by_asin, ProductSource};

/// Original identifier to the record of its replacement.
pub type ReplacementLookup = HashMap<Asin, ProductRecord>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap(BTreeMap<Asin, Asin>);

impl ReplacementMap {
    /// Parses the on-disk JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when `content` is not an object of
    /// non-empty string keys to non-empty string values.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    #[must_use]
    pub fn get(&self, original: &Asin) -> Option<&Asin> {
        self.0.get(original)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Asin, &Asin)> {
        self.0.iter()
    }

    /// Distinct replacement identifiers.
    #[must_use]
    pub fn targets(&self) -> BTreeSet<Asin> {
        self.0.values().cloned().collect()
    }
}

impl FromIterator<(Asin, Asin)> for ReplacementMap {
    fn from_iter<T: IntoIterator<Item = (Asin, Asin)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Loads the replacement mapping from `path`.
///
/// Never fails: a missing file is normal and yields an empty mapping, and an
/// unreadable or malformed file is logged and also yields an empty mapping so
/// the run can continue.
#[must_use]
pub fn load_replacements(path: &Path) -> ReplacementMap {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                path = %path.display(),
                "no replacements file found; continuing without replacements"
            );
            return ReplacementMap::default();
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "could not read replacements file; continuing without replacements"
            );
            return ReplacementMap::default();
        }
    };

    match ReplacementMap::from_json(&content) {
        Ok(map) => {
            tracing::debug!(path = %path.display(), entries = map.len(), "loaded replacements");
            map
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "replacements file is not a JSON object of identifier strings; continuing without replacements"
            );
            ReplacementMap::default()
        }
    }
}

/// Fetches every replacement product in one batch and keys the results by
/// the original identifier.
///
/// # Errors
///
/// - [`ResolveError::Fetch`] when the batched fetch itself fails.
/// - [`ResolveError::MissingReplacement`] when the upstream returned no
///   record for a configured replacement identifier.
pub async fn resolve_replacements<S>(
    map: &ReplacementMap,
    source: &S,
) -> Result<ReplacementLookup, ResolveError>
where
    S: ProductSource + Sync,
{
    if map.is_empty() {
        return Ok(ReplacementLookup::new());
    }

    let targets: Vec<Asin> = map.targets().into_iter().collect();
    let fetched = source
        .get_items(&targets)
        .await
        .map_err(|e| ResolveError::Fetch(Box::new(e)))?;
    let by_asin = index_by_asin(fetched);

    let mut lookup = ReplacementLookup::with_capacity(map.len());
    for (original, replacement) in map.iter() {
        let record = by_asin
            .get(replacement)
            .ok_or_else(|| ResolveError::MissingReplacement {
                original: original.clone(),
                replacement: replacement.clone(),
            })?;
        lookup.insert(original.clone(), record.clone());
    }

    Ok(lookup)
}

#[cfg(test)]
#[path = "replacements_test.rs"]
mod tests;
