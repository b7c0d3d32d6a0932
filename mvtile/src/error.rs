//! Error types for tile decoding.

use std::fmt;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding a tile.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// A layer sub-message carried no `name` field.
    MissingLayerName,

    /// No layer with the requested name exists in the tile.
    LayerNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A required layer field was absent after parsing.
    MissingRequiredField {
        /// The field that was missing.
        field: LayerField,
    },

    /// Feature index beyond the layer's feature count.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of features in the layer.
        count: usize,
    },

    /// A feature's tag pair stream ended on a half-pair.
    UnevenTags,

    /// A tag pair referenced a key beyond the layer's key table.
    KeyIndexOutOfRange {
        /// The referenced key index.
        index: u32,
        /// Number of keys in the table.
        count: usize,
    },

    /// A tag pair referenced a value beyond the layer's value table.
    ValueIndexOutOfRange {
        /// The referenced value index.
        index: u32,
        /// Number of values in the table.
        count: usize,
    },

    /// Geometry command id outside MoveTo/LineTo/ClosePath.
    UnknownCommand {
        /// The command id found in the stream.
        command: u8,
    },

    /// Geometry stream ended between the two halves of a parameter pair.
    TruncatedParameters,

    /// A scaled coordinate does not fit the requested coordinate type.
    CoordinateOutOfRange {
        /// Raw cursor x at the offending vertex.
        x: i64,
        /// Raw cursor y at the offending vertex.
        y: i64,
    },

    /// Protocol buffer scanning failed.
    Pbf(quick_protobuf::Error),
}

/// Required layer fields per the tile schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerField {
    Name,
    Extent,
    Version,
}

/// Non-fatal conditions reported alongside an otherwise successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// The looked-up key name resolves to more than one key-table slot.
    DuplicateKeys,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLayerName => write!(f, "layer missing name"),
            Self::LayerNotFound { name } => {
                write!(f, "layer not found: {name}")
            }
            Self::MissingRequiredField { field } => {
                write!(f, "missing required field: {field}")
            }
            Self::IndexOutOfRange { index, count } => {
                write!(f, "feature index {index} out of range for {count} features")
            }
            Self::UnevenTags => write!(f, "uneven number of feature tag ids"),
            Self::KeyIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "feature referenced out of range key {index} (table holds {count})"
                )
            }
            Self::ValueIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "feature referenced out of range value {index} (table holds {count})"
                )
            }
            Self::UnknownCommand { command } => {
                write!(f, "unknown geometry command {command}")
            }
            Self::TruncatedParameters => {
                write!(f, "geometry stream truncated mid parameter pair")
            }
            Self::CoordinateOutOfRange { x, y } => {
                write!(f, "vertex ({x}, {y}) outside valid range of coordinate type")
            }
            Self::Pbf(err) => write!(f, "protocol buffer error: {err}"),
        }
    }
}

impl fmt::Display for LayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Extent => "extent",
            Self::Version => "version",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKeys => {
                write!(f, "duplicate keys with different tag ids are found")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pbf(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_protobuf::Error> for DecodeError {
    fn from(err: quick_protobuf::Error) -> Self {
        Self::Pbf(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_layer_not_found() {
        let err = DecodeError::LayerNotFound {
            name: "roads".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("roads"), "should mention the layer name");
    }

    #[test]
    fn display_missing_required_field() {
        let err = DecodeError::MissingRequiredField {
            field: LayerField::Version,
        };
        let msg = err.to_string();
        assert!(msg.contains("version"), "should name the missing field");
    }

    #[test]
    fn display_index_out_of_range() {
        let err = DecodeError::IndexOutOfRange { index: 9, count: 3 };
        let msg = err.to_string();
        assert!(msg.contains('9'), "should mention the index");
        assert!(msg.contains('3'), "should mention the count");
    }

    #[test]
    fn display_key_index_out_of_range() {
        let err = DecodeError::KeyIndexOutOfRange {
            index: 12,
            count: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("key"));
    }

    #[test]
    fn display_unknown_command() {
        let err = DecodeError::UnknownCommand { command: 5 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("command"));
    }

    #[test]
    fn display_coordinate_out_of_range() {
        let err = DecodeError::CoordinateOutOfRange { x: 70000, y: -3 };
        let msg = err.to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("-3"));
    }

    #[test]
    fn warning_display_matches_wire_producers() {
        let msg = Warning::DuplicateKeys.to_string();
        assert_eq!(msg, "duplicate keys with different tag ids are found");
    }

    #[test]
    fn layer_field_display() {
        assert_eq!(LayerField::Name.to_string(), "name");
        assert_eq!(LayerField::Extent.to_string(), "extent");
        assert_eq!(LayerField::Version.to_string(), "version");
    }

    #[test]
    fn pbf_error_has_source() {
        let err = DecodeError::from(quick_protobuf::Error::Varint);
        assert!(matches!(err, DecodeError::Pbf(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn non_pbf_errors_have_no_source() {
        let err = DecodeError::UnevenTags;
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<DecodeError>();
    }
}
