//! Layer parsing: shared key/value tables plus raw feature views.

use std::collections::HashMap;

use quick_protobuf::BytesReader;

use crate::error::{DecodeError, DecodeResult, LayerField};
use crate::feature::Feature;
use crate::pbf;

/// A fully parsed layer.
///
/// Parsing materializes the layer's header and its shared tables; feature
/// and value payloads stay as raw views into the tile buffer and are only
/// decoded when asked for. A `Layer` is immutable after construction and
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct Layer<'a> {
    name: &'a str,
    version: u32,
    extent: u32,
    keys: Vec<&'a str>,
    key_index: HashMap<&'a str, Vec<u32>>,
    values: Vec<&'a [u8]>,
    features: Vec<&'a [u8]>,
}

impl<'a> Layer<'a> {
    /// Parses a raw layer view.
    ///
    /// Unknown fields are skipped. Key order and feature order are the
    /// wire order; duplicated key strings are kept and every slot they
    /// occupy stays reachable through the lookup index.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingRequiredField`] unless all of `name`,
    /// `extent` and `version` were present, and [`DecodeError::Pbf`] on a
    /// malformed message.
    pub fn parse(layer_view: &'a [u8]) -> DecodeResult<Self> {
        let mut name = None;
        let mut version = None;
        let mut extent = None;
        let mut keys: Vec<&str> = Vec::new();
        let mut key_index: HashMap<&str, Vec<u32>> = HashMap::new();
        let mut values: Vec<&[u8]> = Vec::new();
        let mut features: Vec<&[u8]> = Vec::new();

        let mut reader = BytesReader::from_bytes(layer_view);
        while !reader.is_eof() {
            let tag = reader.next_tag(layer_view)?;
            match tag {
                pbf::LAYER_NAME => name = Some(reader.read_string(layer_view)?),
                pbf::LAYER_FEATURES => features.push(reader.read_bytes(layer_view)?),
                pbf::LAYER_KEYS => {
                    let key = reader.read_string(layer_view)?;
                    let ordinal = keys.len() as u32;
                    keys.push(key);
                    key_index.entry(key).or_default().push(ordinal);
                }
                pbf::LAYER_VALUES => values.push(reader.read_bytes(layer_view)?),
                pbf::LAYER_EXTENT => extent = Some(reader.read_uint32(layer_view)?),
                pbf::LAYER_VERSION => version = Some(reader.read_uint32(layer_view)?),
                other => reader.read_unknown(layer_view, other)?,
            }
        }

        let name = name.ok_or(DecodeError::MissingRequiredField {
            field: LayerField::Name,
        })?;
        let extent = extent.ok_or(DecodeError::MissingRequiredField {
            field: LayerField::Extent,
        })?;
        let version = version.ok_or(DecodeError::MissingRequiredField {
            field: LayerField::Version,
        })?;

        Ok(Self {
            name,
            version,
            extent,
            keys,
            key_index,
            values,
            features,
        })
    }

    /// The layer name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The layer's schema version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// The resolution of the layer's coordinate grid.
    #[must_use]
    pub const fn extent(&self) -> u32 {
        self.extent
    }

    /// The shared key table, in wire order.
    #[must_use]
    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    /// Number of features in the layer.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// The raw view of the feature at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::IndexOutOfRange`] when `index` is at or past
    /// [`feature_count`](Self::feature_count).
    pub fn feature_view(&self, index: usize) -> DecodeResult<&'a [u8]> {
        self.features
            .get(index)
            .copied()
            .ok_or(DecodeError::IndexOutOfRange {
                index,
                count: self.features.len(),
            })
    }

    /// Decodes the feature at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::IndexOutOfRange`] on a bad index and
    /// [`DecodeError::Pbf`] when the feature message is malformed.
    pub fn feature<'l>(&'l self, index: usize) -> DecodeResult<Feature<'l, 'a>> {
        Feature::bind(self.feature_view(index)?, self)
    }

    /// Iterates the layer's features in wire order.
    pub fn features<'l>(&'l self) -> impl Iterator<Item = DecodeResult<Feature<'l, 'a>>> + 'l {
        self.features
            .iter()
            .copied()
            .map(move |view| Feature::bind(view, self))
    }

    /// Key-table slots occupied by `key`, in wire order.
    ///
    /// More than one slot means the layer carries duplicated key strings.
    pub(crate) fn key_indices(&self, key: &str) -> Option<&[u32]> {
        self.key_index.get(key).map(Vec::as_slice)
    }

    /// The key at table slot `index`, if in range.
    pub(crate) fn key(&self, index: u32) -> Option<&'a str> {
        self.keys.get(index as usize).copied()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// The raw value view at table slot `index`, if in range.
    pub(crate) fn value_view(&self, index: u32) -> Option<&'a [u8]> {
        self.values.get(index as usize).copied()
    }

    pub(crate) fn value_count(&self) -> usize {
        self.values.len()
    }
}
