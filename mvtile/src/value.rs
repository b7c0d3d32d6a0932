//! Attribute values shared through a layer's value table.

use quick_protobuf::BytesReader;

use crate::error::DecodeResult;
use crate::pbf;

/// A decoded attribute value.
///
/// String payloads borrow from the tile buffer; nothing is copied.
/// `float` and `double` wire fields both decode to [`Value::Double`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// No value-bearing field was present.
    Null,
    Bool(bool),
    U64(u64),
    I64(i64),
    Double(f64),
    Str(&'a str),
}

impl<'a> Value<'a> {
    /// Parses a raw value view from a layer's value table.
    ///
    /// The first value-bearing field wins; unknown fields are skipped.
    /// A message with no recognized payload decodes to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Pbf`](crate::DecodeError::Pbf) when the view
    /// is not a well-formed protocol buffer message.
    pub fn parse(view: &'a [u8]) -> DecodeResult<Self> {
        let mut reader = BytesReader::from_bytes(view);
        while !reader.is_eof() {
            let tag = reader.next_tag(view)?;
            match tag {
                pbf::VALUE_STRING => return Ok(Self::Str(reader.read_string(view)?)),
                pbf::VALUE_FLOAT => {
                    return Ok(Self::Double(f64::from(reader.read_float(view)?)))
                }
                pbf::VALUE_DOUBLE => return Ok(Self::Double(reader.read_double(view)?)),
                pbf::VALUE_INT => return Ok(Self::I64(reader.read_int64(view)?)),
                pbf::VALUE_UINT => return Ok(Self::U64(reader.read_uint64(view)?)),
                pbf::VALUE_SINT => return Ok(Self::I64(reader.read_sint64(view)?)),
                pbf::VALUE_BOOL => return Ok(Self::Bool(reader.read_bool(view)?)),
                other => reader.read_unknown(view, other)?,
            }
        }
        Ok(Self::Null)
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
