//! Top-level tile scanning: an ordered index of layer views.

use std::collections::BTreeMap;

use quick_protobuf::BytesReader;

use crate::error::{DecodeError, DecodeResult};
use crate::layer::Layer;
use crate::pbf;

/// A scanned tile.
///
/// Construction records each layer's name and raw view without decoding
/// the layer interior; [`get_layer`](Self::get_layer) does the real work
/// on demand. The tile borrows the caller's buffer and never outlives it.
#[derive(Debug, Clone)]
pub struct Tile<'a> {
    layers: BTreeMap<&'a str, &'a [u8]>,
}

impl<'a> Tile<'a> {
    /// Scans the top-level message of an encoded tile.
    ///
    /// Duplicate layer names keep the last occurrence. Unknown fields are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingLayerName`] when a layer sub-message
    /// has no `name` field, and [`DecodeError::Pbf`] on a malformed
    /// message.
    pub fn new(buffer: &'a [u8]) -> DecodeResult<Self> {
        let mut layers = BTreeMap::new();
        let mut reader = BytesReader::from_bytes(buffer);
        while !reader.is_eof() {
            let tag = reader.next_tag(buffer)?;
            match tag {
                pbf::TILE_LAYERS => {
                    let layer_view = reader.read_bytes(buffer)?;
                    layers.insert(layer_name(layer_view)?, layer_view);
                }
                other => reader.read_unknown(buffer, other)?,
            }
        }
        Ok(Self { layers })
    }

    /// Layer names in ascending order.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'a str> {
        self.layers.keys().copied().collect()
    }

    /// Number of distinct layers in the tile.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Fully parses the named layer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::LayerNotFound`] on a lookup miss, plus any
    /// layer parse error.
    pub fn get_layer(&self, name: &str) -> DecodeResult<Layer<'a>> {
        match self.layers.get(name).copied() {
            Some(view) => Layer::parse(view),
            None => Err(DecodeError::LayerNotFound {
                name: name.to_owned(),
            }),
        }
    }

    /// The raw ordered name-to-view index.
    #[must_use]
    pub fn layers(&self) -> &BTreeMap<&'a str, &'a [u8]> {
        &self.layers
    }
}

/// Finds the `name` field of a layer view without decoding the rest.
fn layer_name(layer_view: &[u8]) -> DecodeResult<&str> {
    let mut name = None;
    let mut reader = BytesReader::from_bytes(layer_view);
    while !reader.is_eof() {
        let tag = reader.next_tag(layer_view)?;
        match tag {
            pbf::LAYER_NAME => name = Some(reader.read_string(layer_view)?),
            other => reader.read_unknown(layer_view, other)?,
        }
    }
    name.ok_or(DecodeError::MissingLayerName)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_encode::{field_bytes, field_string, field_varint, layer_header};

    fn tile_with(layers: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        for layer in layers {
            field_bytes(pbf::TILE_LAYERS, layer, &mut out);
        }
        out
    }

    #[test]
    fn empty_buffer_has_no_layers() {
        let tile = Tile::new(&[]).unwrap();
        assert!(tile.layer_names().is_empty());
        assert_eq!(tile.layer_count(), 0);
    }

    #[test]
    fn layer_names_are_sorted() {
        let buffer = tile_with(&[
            layer_header("water"),
            layer_header("buildings"),
            layer_header("roads"),
        ]);
        let tile = Tile::new(&buffer).unwrap();
        assert_eq!(tile.layer_names(), ["buildings", "roads", "water"]);
    }

    #[test]
    fn get_layer_parses_on_demand() {
        let buffer = tile_with(&[layer_header("roads")]);
        let tile = Tile::new(&buffer).unwrap();
        let layer = tile.get_layer("roads").unwrap();
        assert_eq!(layer.name(), "roads");
        assert_eq!(layer.extent(), 4096);
    }

    #[test]
    fn get_layer_miss() {
        let tile = Tile::new(&[]).unwrap();
        let err = tile.get_layer("absent").unwrap_err();
        assert!(matches!(err, DecodeError::LayerNotFound { name } if name == "absent"));
    }

    #[test]
    fn duplicate_layer_names_keep_the_last() {
        let mut first = layer_header("roads");
        field_string(pbf::LAYER_KEYS, "only-in-first", &mut first);
        let mut second = Vec::new();
        field_string(pbf::LAYER_NAME, "roads", &mut second);
        field_varint(pbf::LAYER_EXTENT, 512, &mut second);
        field_varint(pbf::LAYER_VERSION, 2, &mut second);

        let buffer = tile_with(&[first, second]);
        let tile = Tile::new(&buffer).unwrap();
        assert_eq!(tile.layer_names(), ["roads"]);
        let layer = tile.get_layer("roads").unwrap();
        assert_eq!(layer.extent(), 512);
        assert!(layer.keys().is_empty());
    }

    #[test]
    fn layer_without_name_fails_at_scan() {
        let mut nameless = Vec::new();
        field_varint(pbf::LAYER_EXTENT, 4096, &mut nameless);
        field_varint(pbf::LAYER_VERSION, 2, &mut nameless);
        let buffer = tile_with(&[nameless]);
        let err = Tile::new(&buffer).unwrap_err();
        assert!(matches!(err, DecodeError::MissingLayerName));
    }

    #[test]
    fn scan_does_not_validate_layer_interiors() {
        // Only `name` is required at scan time; the rest fails on get_layer.
        let mut incomplete = Vec::new();
        field_string(pbf::LAYER_NAME, "partial", &mut incomplete);
        let buffer = tile_with(&[incomplete]);
        let tile = Tile::new(&buffer).unwrap();
        assert_eq!(tile.layer_names(), ["partial"]);
        assert!(matches!(
            tile.get_layer("partial"),
            Err(DecodeError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn unknown_top_level_fields_are_skipped() {
        let mut buffer = Vec::new();
        field_varint((9 << 3) | 0, 1234, &mut buffer);
        field_bytes(pbf::TILE_LAYERS, &layer_header("roads"), &mut buffer);
        let tile = Tile::new(&buffer).unwrap();
        assert_eq!(tile.layer_names(), ["roads"]);
    }

    #[test]
    fn repeated_lookups_are_equivalent() {
        let buffer = tile_with(&[layer_header("roads")]);
        let tile = Tile::new(&buffer).unwrap();
        let first = tile.get_layer("roads").unwrap();
        let second = tile.get_layer("roads").unwrap();
        assert_eq!(first.name(), second.name());
        assert_eq!(first.extent(), second.extent());
        assert_eq!(first.feature_count(), second.feature_count());
    }

    #[test]
    fn raw_layer_index_is_exposed() {
        let buffer = tile_with(&[layer_header("roads")]);
        let tile = Tile::new(&buffer).unwrap();
        assert!(tile.layers().contains_key("roads"));
    }
}
