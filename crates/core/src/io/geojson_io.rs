//! GeoJSON reading/writing via the `geojson` crate.

use geo_types::Geometry;
use geojson::GeoJson;

use crate::error::Result;
use crate::vector::{Feature, FeatureCollection};

/// Parse GeoJSON text into features.
///
/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
pub fn read_geojson_str(text: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = text.parse()?;
    read_geojson(geojson)
}

/// Convert an already-parsed GeoJSON document into features.
pub fn read_geojson(geojson: GeoJson) -> Result<FeatureCollection> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.into_iter().map(feature_from_geojson).collect(),
        GeoJson::Feature(f) => Ok(FeatureCollection::from(vec![feature_from_geojson(f)?])),
        GeoJson::Geometry(g) => {
            let geometry = Geometry::<f64>::try_from(g.value)?;
            Ok(FeatureCollection::from(vec![Feature::new(geometry)]))
        }
    }
}

fn feature_from_geojson(f: geojson::Feature) -> Result<Feature> {
    let geometry = f
        .geometry
        .map(|g| Geometry::<f64>::try_from(g.value))
        .transpose()?;
    Ok(Feature {
        geometry,
        properties: f.properties.unwrap_or_default(),
        id: f.id.map(Into::into),
    })
}

/// Build a GeoJSON FeatureCollection object.
pub fn write_geojson_value(fc: &FeatureCollection) -> geojson::FeatureCollection {
    geojson::FeatureCollection {
        bbox: None,
        features: fc.iter().map(feature_to_geojson).collect(),
        foreign_members: None,
    }
}

/// Serialize features as a compact GeoJSON FeatureCollection string.
pub fn write_geojson(fc: &FeatureCollection) -> Result<String> {
    Ok(serde_json::to_string(&write_geojson_value(fc))?)
}

fn feature_to_geojson(f: &Feature) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: f
            .geometry
            .as_ref()
            .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
        id: f.id.clone().map(Into::into),
        properties: if f.properties.is_empty() {
            None
        } else {
            Some(f.properties.clone())
        },
        foreign_members: None,
    }
}
