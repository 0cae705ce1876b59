//! First-match configuration lookup.

use crate::{Configuration, ConfigurationCatalog};

/// Select the active configuration for the current detected-ID set.
///
/// Scans the catalog in insertion order and returns the *first* entry with
/// at least one member ID among `detected_ids`. This is deliberately a
/// first-match policy, not a best-overlap policy: an earlier catalog entry
/// wins even when a later entry overlaps more, and a previously active
/// configuration gets no priority. Callers re-run the match every frame, so
/// an earlier entry can pre-empt the active one as soon as one of its
/// markers becomes visible.
///
/// Returns `None` when no entry overlaps (including the empty detected
/// set).
pub fn match_configuration<'a>(
    detected_ids: &[u32],
    catalog: &'a ConfigurationCatalog,
) -> Option<&'a Configuration> {
    if detected_ids.is_empty() {
        return None;
    }
    catalog.iter().find(|config| config.overlaps(detected_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::collections::BTreeMap;

    fn config(identifier: &str, ids: &[u32]) -> Configuration {
        Configuration {
            identifier: identifier.to_string(),
            name: identifier.to_uppercase(),
            kind: String::new(),
            date: String::new(),
            marker_ids: ids.to_vec(),
            relative_points: ids
                .iter()
                .map(|&id| (id, Vector3::zeros()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn catalog() -> ConfigurationCatalog {
        ConfigurationCatalog::from_entries([config("a", &[1, 2]), config("b", &[2, 3])]).unwrap()
    }

    #[test]
    fn first_match_beats_larger_overlap() {
        // "a" overlaps {2,3} on a single id, "b" on both; "a" still wins
        // because it comes first in catalog order.
        let catalog = catalog();
        let matched = match_configuration(&[2, 3], &catalog).unwrap();
        assert_eq!(matched.identifier, "a");
    }

    #[test]
    fn later_entry_matches_when_earlier_misses() {
        let catalog = catalog();
        let matched = match_configuration(&[3], &catalog).unwrap();
        assert_eq!(matched.identifier, "b");
    }

    #[test]
    fn no_overlap_yields_none() {
        let catalog = catalog();
        assert!(match_configuration(&[9, 42], &catalog).is_none());
    }

    #[test]
    fn empty_detection_yields_none() {
        let catalog = catalog();
        assert!(match_configuration(&[], &catalog).is_none());
    }

    #[test]
    fn match_is_idempotent() {
        let catalog = catalog();
        let first = match_configuration(&[2], &catalog).map(|c| c.identifier.clone());
        let second = match_configuration(&[2], &catalog).map(|c| c.identifier.clone());
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("a"));
    }

    #[test]
    fn empty_catalog_yields_none() {
        let catalog = ConfigurationCatalog::new();
        assert!(match_configuration(&[1], &catalog).is_none());
    }
}
