use super::FeatureCollection;
use crate::error::FetchError;
use crate::mesh::HighlightStyle;
use anyhow::{Context, Result};
use geojson::GeoJson;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves a country code to its boundary document
pub trait CountrySource {
    fn fetch(&self, code: &str) -> Result<FeatureCollection, FetchError>;
}

/// Reads `<root>/country/<CODE>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.root.join("country").join(format!("{code}.json"))
    }
}

impl CountrySource for DirectorySource {
    fn fetch(&self, code: &str) -> Result<FeatureCollection, FetchError> {
        // Codes become file names
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FetchError::UnknownCountry(code.to_string()));
        }
        let path = self.path_for(code);
        let doc = read_boundary(&path)?;
        debug!(code, features = doc.features.len(), "fetched country");
        Ok(doc)
    }
}

/// Parse a GeoJSON boundary file into a validated document
pub fn read_boundary(path: &Path) -> Result<FeatureCollection, FetchError> {
    let mut bytes = std::fs::read(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes).map_err(|source| FetchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    FeatureCollection::from_geojson(&geojson).map_err(|source| FetchError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Documents held in memory, keyed by code
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    countries: HashMap<String, FeatureCollection>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, doc: FeatureCollection) {
        self.countries.insert(code.into(), doc);
    }
}

impl CountrySource for MemorySource {
    fn fetch(&self, code: &str) -> Result<FeatureCollection, FetchError> {
        self.countries
            .get(code)
            .cloned()
            .ok_or_else(|| FetchError::UnknownCountry(code.to_string()))
    }
}

/// One playable country from `countries.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryEntry {
    pub cca2: String,
    pub name: String,
    #[serde(default)]
    pub style: HighlightStyle,
}

/// Load `<root>/countries.json`
pub fn load_catalog(root: &Path) -> Result<Vec<CountryEntry>> {
    let path = root.join("countries.json");
    let mut bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let entries: Vec<CountryEntry> =
        simd_json::serde::from_slice(&mut bytes).with_context(|| format!("parsing {}", path.display()))?;
    info!(count = entries.len(), path = %path.display(), "loaded country catalog");
    Ok(entries)
}
