//! Resolved satellite positions, keyed by satellite id

use std::collections::HashMap;

/// Sub-satellite point and display name for one id
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteData {
    pub id: String,
    pub name: String,
    /// Degrees
    pub longitude: f64,
    /// Degrees
    pub latitude: f64,
}

/// Cache of successfully fetched satellites
#[derive(Debug, Default)]
pub struct SatelliteDataCache {
    data: HashMap<String, SatelliteData>,
}

impl SatelliteDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `data.id`
    pub fn insert(&mut self, data: SatelliteData) {
        self.data.insert(data.id.clone(), data);
    }

    pub fn get(&self, satellite_id: &str) -> Option<&SatelliteData> {
        self.data.get(satellite_id)
    }

    pub fn contains(&self, satellite_id: &str) -> bool {
        self.data.contains_key(satellite_id)
    }

    pub fn remove(&mut self, satellite_id: &str) -> Option<SatelliteData> {
        self.data.remove(satellite_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
