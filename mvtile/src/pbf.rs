//! Field tags of the vector tile schema and the lazy packed-uint32 view.
//!
//! The heavy lifting of the protocol buffer wire format lives in
//! `quick_protobuf`; this module only names the tags the schema uses and
//! wraps a raw packed payload so its varints can be walked without
//! materializing them.

use quick_protobuf::BytesReader;

use crate::error::DecodeResult;

const WIRE_VARINT: u32 = 0;
const WIRE_FIXED64: u32 = 1;
const WIRE_LEN: u32 = 2;
const WIRE_FIXED32: u32 = 5;

const fn tag(field: u32, wire: u32) -> u32 {
    (field << 3) | wire
}

// Tile message.
pub(crate) const TILE_LAYERS: u32 = tag(3, WIRE_LEN);

// Layer message.
pub(crate) const LAYER_NAME: u32 = tag(1, WIRE_LEN);
pub(crate) const LAYER_FEATURES: u32 = tag(2, WIRE_LEN);
pub(crate) const LAYER_KEYS: u32 = tag(3, WIRE_LEN);
pub(crate) const LAYER_VALUES: u32 = tag(4, WIRE_LEN);
pub(crate) const LAYER_EXTENT: u32 = tag(5, WIRE_VARINT);
pub(crate) const LAYER_VERSION: u32 = tag(15, WIRE_VARINT);

// Feature message.
pub(crate) const FEATURE_ID: u32 = tag(1, WIRE_VARINT);
pub(crate) const FEATURE_TAGS: u32 = tag(2, WIRE_LEN);
pub(crate) const FEATURE_TYPE: u32 = tag(3, WIRE_VARINT);
pub(crate) const FEATURE_GEOMETRY: u32 = tag(4, WIRE_LEN);

// Value message.
pub(crate) const VALUE_STRING: u32 = tag(1, WIRE_LEN);
pub(crate) const VALUE_FLOAT: u32 = tag(2, WIRE_FIXED32);
pub(crate) const VALUE_DOUBLE: u32 = tag(3, WIRE_FIXED64);
pub(crate) const VALUE_INT: u32 = tag(4, WIRE_VARINT);
pub(crate) const VALUE_UINT: u32 = tag(5, WIRE_VARINT);
pub(crate) const VALUE_SINT: u32 = tag(6, WIRE_VARINT);
pub(crate) const VALUE_BOOL: u32 = tag(7, WIRE_VARINT);

/// A raw packed `uint32` payload, decoded lazily on iteration.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PackedU32<'a> {
    bytes: &'a [u8],
}

impl<'a> PackedU32<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn iter(&self) -> PackedU32Iter<'a> {
        PackedU32Iter {
            bytes: self.bytes,
            reader: BytesReader::from_bytes(self.bytes),
        }
    }
}

/// Iterator over the varints of a packed payload.
pub(crate) struct PackedU32Iter<'a> {
    bytes: &'a [u8],
    reader: BytesReader,
}

impl Iterator for PackedU32Iter<'_> {
    type Item = DecodeResult<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.is_eof() {
            return None;
        }
        Some(
            self.reader
                .read_varint32(self.bytes)
                .map_err(crate::error::DecodeError::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn tag_values_match_wire_layout() {
        assert_eq!(TILE_LAYERS, 26);
        assert_eq!(LAYER_NAME, 10);
        assert_eq!(LAYER_VERSION, 120);
        assert_eq!(FEATURE_TAGS, 18);
        assert_eq!(FEATURE_GEOMETRY, 34);
        assert_eq!(VALUE_FLOAT, 21);
        assert_eq!(VALUE_DOUBLE, 25);
        assert_eq!(VALUE_BOOL, 56);
    }

    #[test]
    fn empty_payload_yields_nothing() {
        let packed = PackedU32::new(&[]);
        assert_eq!(packed.iter().count(), 0);
    }

    #[test]
    fn single_byte_varints() {
        let packed = PackedU32::new(&[9, 50, 34]);
        let words: Vec<u32> = packed.iter().map(|w| w.unwrap()).collect();
        assert_eq!(words, [9, 50, 34]);
    }

    #[test]
    fn multi_byte_varint() {
        // 300 = 0b1_0010_1100 -> [0xAC, 0x02]
        let packed = PackedU32::new(&[0xAC, 0x02]);
        let words: Vec<u32> = packed.iter().map(|w| w.unwrap()).collect();
        assert_eq!(words, [300]);
    }

    #[test]
    fn iteration_is_repeatable() {
        let packed = PackedU32::new(&[1, 2, 3]);
        let first: Vec<u32> = packed.iter().map(|w| w.unwrap()).collect();
        let second: Vec<u32> = packed.iter().map(|w| w.unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn truncated_varint_is_an_error() {
        // Continuation bit set with no following byte.
        let packed = PackedU32::new(&[0x80]);
        let result = packed.iter().next().unwrap();
        assert!(matches!(result, Err(DecodeError::Pbf(_))));
    }
}
