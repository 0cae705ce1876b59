use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation errors for a single configuration record.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("configuration identifier is empty")]
    EmptyIdentifier,
    #[error("configuration '{identifier}': duplicate member marker id {marker_id}")]
    DuplicateMarkerId { identifier: String, marker_id: u32 },
    #[error("configuration '{identifier}': no offset entry for member marker id {marker_id}")]
    MissingOffset { identifier: String, marker_id: u32 },
}

/// A named group of markers with known offsets to a logical reference point.
///
/// Offsets are expressed in the physical marker-edge-length unit, in the
/// frame of the marker they belong to. Records are immutable after catalog
/// load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub identifier: String,
    /// Human-readable name; may be empty.
    #[serde(default)]
    pub name: String,
    /// Free-form type tag.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Free-form creation date.
    #[serde(default)]
    pub date: String,
    /// Member marker IDs, unique within the set.
    pub marker_ids: Vec<u32>,
    /// Offset of the reference point relative to each member marker.
    pub relative_points: BTreeMap<u32, Vector3<f64>>,
}

impl Configuration {
    /// Check the record invariants: non-empty identifier, unique member
    /// IDs, and exactly one offset entry per member.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.identifier.is_empty() {
            return Err(ConfigurationError::EmptyIdentifier);
        }
        let mut seen = std::collections::BTreeSet::new();
        for &id in &self.marker_ids {
            if !seen.insert(id) {
                return Err(ConfigurationError::DuplicateMarkerId {
                    identifier: self.identifier.clone(),
                    marker_id: id,
                });
            }
            if !self.relative_points.contains_key(&id) {
                return Err(ConfigurationError::MissingOffset {
                    identifier: self.identifier.clone(),
                    marker_id: id,
                });
            }
        }
        Ok(())
    }

    /// Offset of the reference point relative to the given member marker.
    #[inline]
    pub fn offset_of(&self, marker_id: u32) -> Option<&Vector3<f64>> {
        self.relative_points.get(&marker_id)
    }

    /// Whether any of the given detected IDs belongs to this configuration.
    pub fn overlaps(&self, detected_ids: &[u32]) -> bool {
        self.marker_ids.iter().any(|id| detected_ids.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(identifier: &str, ids: &[u32]) -> Configuration {
        Configuration {
            identifier: identifier.to_string(),
            name: identifier.to_uppercase(),
            kind: "test".to_string(),
            date: String::new(),
            marker_ids: ids.to_vec(),
            relative_points: ids
                .iter()
                .map(|&id| (id, Vector3::new(f64::from(id), 0.0, 0.0)))
                .collect(),
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(config("rig-a", &[1, 2, 3]).validate().is_ok());
    }

    #[test]
    fn duplicate_member_id_rejected() {
        let mut c = config("rig-a", &[1, 2]);
        c.marker_ids.push(2);
        assert!(matches!(
            c.validate(),
            Err(ConfigurationError::DuplicateMarkerId { marker_id: 2, .. })
        ));
    }

    #[test]
    fn missing_offset_rejected() {
        let mut c = config("rig-a", &[1, 2]);
        c.relative_points.remove(&2);
        assert!(matches!(
            c.validate(),
            Err(ConfigurationError::MissingOffset { marker_id: 2, .. })
        ));
    }

    #[test]
    fn overlap_check() {
        let c = config("rig-a", &[4, 7]);
        assert!(c.overlaps(&[7, 9]));
        assert!(!c.overlaps(&[5, 6]));
        assert!(!c.overlaps(&[]));
    }
}
