//! Shapefile reading from in-memory buffers.
//!
//! Browsers hand us a single file, so two inputs are accepted: a zip bundle
//! holding `<stem>.shp` (+ optional `<stem>.dbf`), or a bare `.shp` whose
//! features then carry no attributes. Geometry goes through the `shapefile`
//! crate, attributes through `dbase`.

use std::io::{Cursor, Read};

use geo_types::Geometry;
use serde_json::Value;
use shapefile::Shape;
use tracing::debug;

use crate::error::{Error, Result};
use crate::vector::{Feature, FeatureCollection, Properties};

const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";
/// File code 9994, big-endian, at the start of every `.shp`.
const SHP_MAGIC: [u8; 4] = [0x00, 0x00, 0x27, 0x0a];
const SHP_HEADER_LEN: usize = 100;

/// What kind of buffer was handed to [`read_shapefile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapefileSource {
    Zip,
    Shp,
}

impl ShapefileSource {
    /// Sniff the buffer's magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&ZIP_MAGIC) {
            Some(Self::Zip)
        } else if bytes.len() >= SHP_HEADER_LEN && bytes.starts_with(&SHP_MAGIC) {
            Some(Self::Shp)
        } else {
            None
        }
    }
}

/// Decode a shapefile buffer into features.
///
/// Null shapes become features without geometry so record/attribute
/// alignment is preserved.
pub fn read_shapefile(bytes: &[u8]) -> Result<FeatureCollection> {
    match ShapefileSource::detect(bytes) {
        Some(ShapefileSource::Zip) => {
            let (shp, dbf) = unzip_members(bytes)?;
            decode(shp, dbf)
        }
        Some(ShapefileSource::Shp) => decode(bytes.to_vec(), None),
        None => Err(Error::UnrecognisedShapefile(bytes.len())),
    }
}

fn unzip_members(bytes: &[u8]) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let names: Vec<String> = archive
        .file_names()
        .filter(|n| !n.starts_with("__MACOSX/"))
        .map(str::to_string)
        .collect();

    let shp_name = names
        .iter()
        .find(|n| n.to_ascii_lowercase().ends_with(".shp"))
        .ok_or(Error::MissingShp)?
        .clone();
    let stem = shp_name[..shp_name.len() - 4].to_ascii_lowercase();
    let dbf_name = names
        .iter()
        .find(|n| n.to_ascii_lowercase() == format!("{stem}.dbf"))
        .cloned();

    debug!(shp = %shp_name, dbf = ?dbf_name, "unzipping shapefile bundle");

    let shp = read_member(&mut archive, &shp_name)?;
    let dbf = dbf_name
        .map(|name| read_member(&mut archive, &name))
        .transpose()?;
    Ok((shp, dbf))
}

fn read_member(archive: &mut zip::ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(name)?;
    // The declared size comes from the archive header and is not trusted.
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

fn decode(shp: Vec<u8>, dbf: Option<Vec<u8>>) -> Result<FeatureCollection> {
    let shapes = shapefile::ShapeReader::new(Cursor::new(shp))?.read()?;
    let records = match dbf {
        Some(dbf) => read_records(dbf)?,
        None => Vec::new(),
    };
    if !records.is_empty() && records.len() != shapes.len() {
        debug!(
            shapes = shapes.len(),
            records = records.len(),
            "shape and attribute counts differ"
        );
    }
    let mut records = records.into_iter();

    shapes
        .into_iter()
        .map(|shape| {
            Ok(Feature {
                geometry: shape_to_geometry(shape)?,
                properties: records.next().unwrap_or_default(),
                id: None,
            })
        })
        .collect()
}

fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>> {
    if let Shape::NullShape = shape {
        return Ok(None);
    }
    let kind = shape.shapetype();
    Geometry::<f64>::try_from(shape)
        .map(Some)
        .map_err(|e| Error::Other(format!("cannot convert {kind:?} shape: {e:?}")))
}

fn read_records(dbf: Vec<u8>) -> Result<Vec<Properties>> {
    let mut reader = dbase::Reader::new(Cursor::new(dbf))?;
    let names: Vec<String> = reader.fields().iter().map(|f| f.name().to_string()).collect();

    let records = reader.read()?;
    Ok(records
        .iter()
        .map(|record| {
            let mut props = Properties::new();
            for name in &names {
                if let Some(value) = record.get(name) {
                    props.insert(name.clone(), field_to_json(value));
                }
            }
            props
        })
        .collect())
}

fn field_to_json(value: &dbase::FieldValue) -> Value {
    use dbase::FieldValue;

    match value {
        FieldValue::Character(s) => s
            .as_deref()
            .map(|s| Value::String(s.trim_end().to_string()))
            .unwrap_or(Value::Null),
        FieldValue::Memo(s) => Value::String(s.clone()),
        FieldValue::Numeric(n) => n.map(Value::from).unwrap_or(Value::Null),
        FieldValue::Float(n) => n.map(|v| Value::from(v as f64)).unwrap_or(Value::Null),
        FieldValue::Integer(n) => Value::from(*n),
        FieldValue::Double(n) | FieldValue::Currency(n) => Value::from(*n),
        FieldValue::Logical(b) => b.map(Value::Bool).unwrap_or(Value::Null),
        FieldValue::Date(d) => d
            .map(|d| Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())))
            .unwrap_or(Value::Null),
        other => Value::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Point;
    use std::io::Write;

    /// Minimal point `.shp`: 100-byte header + one 28-byte record per point.
    fn point_shp(points: &[(f64, f64)]) -> Vec<u8> {
        let file_len_words = ((SHP_HEADER_LEN + 28 * points.len()) / 2) as i32;
        let mut out = Vec::new();
        out.extend_from_slice(&9994i32.to_be_bytes());
        out.extend_from_slice(&[0u8; 20]);
        out.extend_from_slice(&file_len_words.to_be_bytes());
        out.extend_from_slice(&1000i32.to_le_bytes());
        out.extend_from_slice(&1i32.to_le_bytes()); // Point
        let (min_x, max_x) = points.iter().fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.0), b.max(p.0)));
        let (min_y, max_y) = points.iter().fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.1), b.max(p.1)));
        for v in [min_x, min_y, max_x, max_y, 0.0, 0.0, 0.0, 0.0] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        for (i, &(x, y)) in points.iter().enumerate() {
            out.extend_from_slice(&(i as i32 + 1).to_be_bytes());
            out.extend_from_slice(&10i32.to_be_bytes());
            out.extend_from_slice(&1i32.to_le_bytes());
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
        }
        out
    }

    /// dBASE III table with a `NAME` (C, 10) and `POP` (N, 10) column.
    fn cities_dbf(rows: &[(&str, u32)]) -> Vec<u8> {
        let mut out = vec![0x03, 124, 1, 1];
        out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        out.extend_from_slice(&(32u16 + 2 * 32 + 1).to_le_bytes());
        out.extend_from_slice(&(1u16 + 10 + 10).to_le_bytes());
        out.extend_from_slice(&[0u8; 20]);
        for (name, kind) in [("NAME", b'C'), ("POP", b'N')] {
            let mut field = [0u8; 32];
            field[..name.len()].copy_from_slice(name.as_bytes());
            field[11] = kind;
            field[16] = 10;
            out.extend_from_slice(&field);
        }
        out.push(0x0D);
        for (name, pop) in rows {
            out.push(b' ');
            out.extend_from_slice(format!("{name:<10}").as_bytes());
            out.extend_from_slice(format!("{pop:>10}").as_bytes());
        }
        out.push(0x1A);
        out
    }

    fn zip(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut w = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in members {
            w.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
            w.write_all(data).unwrap();
        }
        w.finish().unwrap().into_inner()
    }

    #[test]
    fn detects_sources() {
        assert_eq!(ShapefileSource::detect(&point_shp(&[(0.0, 0.0)])), Some(ShapefileSource::Shp));
        assert_eq!(ShapefileSource::detect(b"PK\x03\x04rest"), Some(ShapefileSource::Zip));
        assert_eq!(ShapefileSource::detect(b"{\"type\":1}"), None);
    }

    #[test]
    fn reads_bare_shp_without_attributes() {
        let fc = read_shapefile(&point_shp(&[(-6.84, 34.02), (-5.0, 34.03)])).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].geometry, Some(Geometry::Point(Point::new(-6.84, 34.02))));
        assert!(fc.features[0].properties.is_empty());
    }

    #[test]
    fn reads_zip_bundle_with_attributes() {
        let shp = point_shp(&[(-6.84, 34.02), (-5.0, 34.03)]);
        let dbf = cities_dbf(&[("Rabat", 577827), ("Fes", 1112072)]);
        let bundle = zip(&[("readme.txt", &b"hi"[..]), ("Cities.SHP", &shp[..]), ("cities.dbf", &dbf[..])]);

        let fc = read_shapefile(&bundle).unwrap();
        assert_eq!(fc.len(), 2);
        let props = &fc.features[1].properties;
        assert_eq!(props.get("NAME").and_then(Value::as_str), Some("Fes"));
        assert_eq!(props.get("POP").and_then(Value::as_f64), Some(1_112_072.0));
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["NAME", "POP"]);
    }

    #[test]
    fn zip_without_shp_is_an_error() {
        let dbf = cities_dbf(&[]);
        let bundle = zip(&[("cities.dbf", &dbf[..])]);
        assert!(matches!(read_shapefile(&bundle), Err(Error::MissingShp)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(read_shapefile(b"nope"), Err(Error::UnrecognisedShapefile(4))));
        let mut truncated = point_shp(&[(1.0, 1.0)]);
        truncated.truncate(110);
        assert!(read_shapefile(&truncated).is_err());
    }

    #[test]
    fn oversized_declared_member_size_does_not_abort() {
        let shp = point_shp(&[(1.0, 1.0)]);
        let mut bundle = zip(&[("big.shp", &shp[..])]);
        let huge = 0xFFFF_FFF0u32.to_le_bytes();
        // Local header: uncompressed size at +22. Central directory entry: at +24.
        bundle[22..26].copy_from_slice(&huge);
        let central = bundle
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        bundle[central + 24..central + 28].copy_from_slice(&huge);

        if let Ok(fc) = read_shapefile(&bundle) {
            assert_eq!(fc.len(), 1);
        }
    }
}
