use crate::{Configuration, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum CatalogIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
    #[error("duplicate configuration identifier '{0}'")]
    DuplicateIdentifier(String),
}

/// Insertion-order-preserving catalog of configurations.
///
/// First-match lookup iterates entries in the order they were inserted
/// (file order for JSON catalogs), and that order is observable through
/// [`crate::match_configuration`], so a plain hash map will not do here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigurationCatalog {
    entries: Vec<Configuration>,
    index: HashMap<String, usize>,
}

impl ConfigurationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, keeping their order.
    pub fn from_entries(
        entries: impl IntoIterator<Item = Configuration>,
    ) -> Result<Self, CatalogIoError> {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Append a validated record; identifiers must be unique.
    pub fn insert(&mut self, configuration: Configuration) -> Result<(), CatalogIoError> {
        configuration.validate()?;
        if self.index.contains_key(&configuration.identifier) {
            return Err(CatalogIoError::DuplicateIdentifier(
                configuration.identifier.clone(),
            ));
        }
        self.index
            .insert(configuration.identifier.clone(), self.entries.len());
        self.entries.push(configuration);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&Configuration> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a catalog from a JSON array on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogIoError> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<Configuration> = serde_json::from_str(&raw)?;
        let catalog = Self::from_entries(entries)?;
        log::info!("loaded {} configuration(s)", catalog.len());
        Ok(catalog)
    }

    /// Write this catalog to disk as a pretty JSON array.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CatalogIoError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Serialize for ConfigurationCatalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigurationCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Configuration>::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(serde::de::Error::custom)
    }
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

    #[test]
    fn preserves_insertion_order() {
        let catalog = ConfigurationCatalog::from_entries([
            config("b", &[3]),
            config("a", &[1]),
            config("c", &[2]),
        ])
        .unwrap();
        let order: Vec<&str> = catalog.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_identifier() {
        let err = ConfigurationCatalog::from_entries([config("a", &[1]), config("a", &[2])])
            .unwrap_err();
        assert!(matches!(err, CatalogIoError::DuplicateIdentifier(id) if id == "a"));
    }

    #[test]
    fn rejects_invalid_record() {
        let mut bad = config("a", &[1]);
        bad.relative_points.clear();
        let err = ConfigurationCatalog::from_entries([bad]).unwrap_err();
        assert!(matches!(err, CatalogIoError::Invalid(_)));
    }

    #[test]
    fn lookup_by_identifier() {
        let catalog =
            ConfigurationCatalog::from_entries([config("a", &[1]), config("b", &[2])]).unwrap();
        assert_eq!(catalog.get("b").unwrap().marker_ids, [2]);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configurations.json");

        let catalog = ConfigurationCatalog::from_entries([
            config("rig-front", &[1, 2]),
            config("rig-back", &[2, 3]),
        ])
        .unwrap();
        catalog.write_json(&path).unwrap();

        let loaded = ConfigurationCatalog::load_json(&path).unwrap();
        assert_eq!(catalog, loaded);
        let order: Vec<&str> = loaded.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(order, ["rig-front", "rig-back"]);
    }
}
