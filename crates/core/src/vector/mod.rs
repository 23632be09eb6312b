//! Vector data structures
//!
//! - `Feature`: optional geometry + ordered attributes + optional id
//! - `FeatureCollection`: ordered collection of features
//! - `Extent`: bounding rectangle in the collection's CRS
//! - Geodesic measurements on geographic geometries

mod extent;
pub mod measurements;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crs::CRS;
use crate::error::Result;

pub use extent::Extent;
pub use measurements::{geodesic_area, geodesic_length};

/// Feature attributes, kept in insertion order.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Feature identifier as found in GeoJSON (`"id": "a"` or `"id": 7`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    String(String),
    Number(serde_json::Number),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<geojson::feature::Id> for FeatureId {
    fn from(id: geojson::feature::Id) -> Self {
        match id {
            geojson::feature::Id::String(s) => Self::String(s),
            geojson::feature::Id::Number(n) => Self::Number(n),
        }
    }
}

impl From<FeatureId> for geojson::feature::Id {
    fn from(id: FeatureId) -> Self {
        match id {
            FeatureId::String(s) => Self::String(s),
            FeatureId::Number(n) => Self::Number(n),
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: Properties,
    /// Optional feature ID
    pub id: Option<FeatureId>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set an attribute, keeping first-insertion order.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Builder-style attribute setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Return a copy of this feature with its geometry moved from `from` to `to`.
    pub fn transformed(&self, from: &CRS, to: &CRS) -> Result<Self> {
        let geometry = self
            .geometry
            .as_ref()
            .map(|g| from.transform_geometry(to, g))
            .transpose()?;
        Ok(Self {
            geometry,
            properties: self.properties.clone(),
            id: self.id.clone(),
        })
    }
}

/// Collection of features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Bounding extent of all feature geometries (empty when none have one).
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::empty();
        for geom in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            extent.extend_geometry(geom);
        }
        extent
    }

    /// Reproject every feature from `from` to `to`.
    pub fn transformed(&self, from: &CRS, to: &CRS) -> Result<Self> {
        let features = self
            .features
            .iter()
            .map(|f| f.transformed(from, to))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { features })
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
