//! Inspection and decoding tools for vector tiles.
//!
//! This crate turns an encoded tile into things a human can look at:
//!
//! - Summarize layers, feature counts and geometry types
//! - Decode properties and geometry into structured JSON
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what a tile contains.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use mvtile::{GeomType, Identifier, Tile, Value};
use serde::Serialize;

/// Per-tile structural summary.
#[derive(Debug, Serialize)]
pub struct TileReport {
    pub layers: Vec<LayerSummary>,
}

/// Per-layer structural summary.
#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub version: u32,
    pub extent: u32,
    pub bytes: usize,
    pub keys: usize,
    pub features: usize,
    pub points: usize,
    pub line_strings: usize,
    pub polygons: usize,
    pub unknown: usize,
}

/// Summarizes a tile without decoding geometry.
pub fn inspect_tile(bytes: &[u8]) -> Result<TileReport> {
    let tile = Tile::new(bytes).context("scan tile")?;
    let mut layers = Vec::new();
    for (name, view) in tile.layers() {
        let layer = tile
            .get_layer(name)
            .with_context(|| format!("parse layer {name}"))?;
        let mut summary = LayerSummary {
            name: layer.name().to_owned(),
            version: layer.version(),
            extent: layer.extent(),
            bytes: view.len(),
            keys: layer.keys().len(),
            features: layer.feature_count(),
            points: 0,
            line_strings: 0,
            polygons: 0,
            unknown: 0,
        };
        for feature in layer.features() {
            let feature = feature.with_context(|| format!("bind feature in {name}"))?;
            match feature.geom_type() {
                GeomType::Point => summary.points += 1,
                GeomType::LineString => summary.line_strings += 1,
                GeomType::Polygon => summary.polygons += 1,
                GeomType::Unknown => summary.unknown += 1,
            }
        }
        layers.push(summary);
    }
    Ok(TileReport { layers })
}

/// Renders a report the way `inspect` prints it.
#[must_use]
pub fn format_report_pretty(report: &TileReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "layers: {}", report.layers.len());
    for layer in &report.layers {
        let _ = writeln!(
            out,
            "== {} (version {}, extent {}, {} bytes) ==",
            layer.name, layer.version, layer.extent, layer.bytes
        );
        let _ = writeln!(out, "  keys: {}", layer.keys);
        let _ = writeln!(
            out,
            "  features: {} ({} points, {} linestrings, {} polygons, {} unknown)",
            layer.features, layer.points, layer.line_strings, layer.polygons, layer.unknown
        );
    }
    out
}

/// Fully decoded tile contents.
#[derive(Debug, Serialize)]
pub struct TileDump {
    pub layers: Vec<LayerDump>,
}

#[derive(Debug, Serialize)]
pub struct LayerDump {
    pub name: String,
    pub version: u32,
    pub extent: u32,
    pub features: Vec<FeatureDump>,
}

#[derive(Debug, Serialize)]
pub struct FeatureDump {
    pub id: serde_json::Value,
    pub geom_type: String,
    pub properties: BTreeMap<String, serde_json::Value>,
    pub paths: Vec<Vec<[i64; 2]>>,
}

/// Decodes every layer, property table and geometry in the tile.
pub fn dump_tile(bytes: &[u8], scale: f32) -> Result<TileDump> {
    let tile = Tile::new(bytes).context("scan tile")?;
    let mut layers = Vec::new();
    for name in tile.layer_names() {
        let layer = tile
            .get_layer(name)
            .with_context(|| format!("parse layer {name}"))?;
        let mut features = Vec::new();
        for (index, feature) in layer.features().enumerate() {
            let feature =
                feature.with_context(|| format!("bind feature {index} in {name}"))?;
            let properties = feature
                .properties()
                .with_context(|| format!("decode properties of feature {index} in {name}"))?
                .into_iter()
                .map(|(key, value)| (key.to_owned(), json_value(&value)))
                .collect();
            let geometry = feature
                .geometries::<i64>(scale)
                .with_context(|| format!("decode geometry of feature {index} in {name}"))?;
            features.push(FeatureDump {
                id: json_id(&feature.id()),
                geom_type: feature.geom_type().to_string(),
                properties,
                paths: geometry
                    .iter()
                    .map(|path| path.iter().map(|point| [point.x, point.y]).collect())
                    .collect(),
            });
        }
        layers.push(LayerDump {
            name: layer.name().to_owned(),
            version: layer.version(),
            extent: layer.extent(),
            features,
        });
    }
    Ok(TileDump { layers })
}

/// Renders a dump the way `decode --format pretty` prints it.
#[must_use]
pub fn format_dump_pretty(dump: &TileDump) -> String {
    let mut out = String::new();
    for layer in &dump.layers {
        let _ = writeln!(
            out,
            "== {} (version {}, extent {}) ==",
            layer.name, layer.version, layer.extent
        );
        for feature in &layer.features {
            let _ = writeln!(out, "  {} feature (id {})", feature.geom_type, feature.id);
            for (key, value) in &feature.properties {
                let _ = writeln!(out, "    {key} = {value}");
            }
            for path in &feature.paths {
                let rendered: Vec<String> = path
                    .iter()
                    .map(|[x, y]| format!("({x}, {y})"))
                    .collect();
                let _ = writeln!(out, "    path: {}", rendered.join(" "));
            }
        }
    }
    out
}

fn json_value(value: &Value<'_>) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(payload) => serde_json::Value::from(*payload),
        Value::U64(payload) => serde_json::Value::from(*payload),
        Value::I64(payload) => serde_json::Value::from(*payload),
        Value::Double(payload) => serde_json::Number::from_f64(*payload)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(payload) => serde_json::Value::from(*payload),
    }
}

fn json_id(id: &Identifier<'_>) -> serde_json::Value {
    match id {
        Identifier::Null => serde_json::Value::Null,
        Identifier::U64(payload) => serde_json::Value::from(*payload),
        Identifier::I64(payload) => serde_json::Value::from(*payload),
        Identifier::Double(payload) => serde_json::Number::from_f64(*payload)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Identifier::Str(payload) => serde_json::Value::from(*payload),
    }
}
