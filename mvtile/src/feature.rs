//! Feature cursors: lazy views over a single feature of a layer.

use std::collections::HashMap;
use std::fmt;

use quick_protobuf::BytesReader;

use crate::error::{DecodeError, DecodeResult, Warning};
use crate::geometry::{self, Coordinate, GeometryCollection};
use crate::layer::Layer;
use crate::limits::GeometryLimits;
use crate::pbf::{self, PackedU32};
use crate::value::Value;

/// Geometry type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeomType {
    #[default]
    Unknown,
    Point,
    LineString,
    Polygon,
}

impl GeomType {
    /// Maps the wire enum value; out-of-range values read as `Unknown`.
    fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Point,
            2 => Self::LineString,
            3 => Self::Polygon,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for GeomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Point => "point",
            Self::LineString => "linestring",
            Self::Polygon => "polygon",
        };
        write!(f, "{name}")
    }
}

/// A feature identifier.
///
/// The tile wire format only carries unsigned ids, so binding a feature
/// produces `Null` or `U64`; the remaining variants complete the
/// identifier sum type for API consumers that synthesize ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Identifier<'a> {
    Null,
    U64(u64),
    I64(i64),
    Double(f64),
    Str(&'a str),
}

impl Identifier<'_> {
    /// Returns `true` when the feature carried no id.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A lightweight cursor over one feature, bound to its layer.
///
/// Binding scans the feature message once and captures raw ranges; the
/// property table and geometry decode on demand and each call produces a
/// fresh output without touching the layer.
#[derive(Debug, Clone, Copy)]
pub struct Feature<'l, 'a> {
    layer: &'l Layer<'a>,
    id: Identifier<'a>,
    geom_type: GeomType,
    tags: PackedU32<'a>,
    geometry: PackedU32<'a>,
}

impl<'l, 'a> Feature<'l, 'a> {
    /// Scans a raw feature view from `layer`.
    ///
    /// Unknown fields are skipped; an absent `type` field reads as
    /// [`GeomType::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Pbf`] when the view is not a well-formed
    /// feature message.
    pub fn bind(feature_view: &'a [u8], layer: &'l Layer<'a>) -> DecodeResult<Self> {
        let mut id = Identifier::Null;
        let mut geom_type = GeomType::Unknown;
        let mut tags = PackedU32::default();
        let mut geometry = PackedU32::default();

        let mut reader = BytesReader::from_bytes(feature_view);
        while !reader.is_eof() {
            let tag = reader.next_tag(feature_view)?;
            match tag {
                pbf::FEATURE_ID => id = Identifier::U64(reader.read_uint64(feature_view)?),
                pbf::FEATURE_TAGS => {
                    tags = PackedU32::new(reader.read_bytes(feature_view)?);
                }
                pbf::FEATURE_TYPE => {
                    geom_type = GeomType::from_raw(reader.read_int32(feature_view)?);
                }
                pbf::FEATURE_GEOMETRY => {
                    geometry = PackedU32::new(reader.read_bytes(feature_view)?);
                }
                other => reader.read_unknown(feature_view, other)?,
            }
        }

        Ok(Self {
            layer,
            id,
            geom_type,
            tags,
            geometry,
        })
    }

    /// The feature's geometry type.
    #[must_use]
    pub const fn geom_type(&self) -> GeomType {
        self.geom_type
    }

    /// The feature's identifier, `Null` when absent.
    #[must_use]
    pub const fn id(&self) -> Identifier<'a> {
        self.id
    }

    /// The owning layer's extent.
    #[must_use]
    pub const fn extent(&self) -> u32 {
        self.layer.extent()
    }

    /// The owning layer's schema version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.layer.version()
    }

    /// Looks up a single property by key name.
    ///
    /// A key that is absent from the layer's key table yields
    /// `(Value::Null, None)` without touching the tag stream. When the
    /// name occupies more than one key-table slot (duplicated keys in a
    /// malformed tile), the first pair referencing any of those slots
    /// wins and [`Warning::DuplicateKeys`] is reported alongside.
    ///
    /// Pairs referencing out-of-range key slots are tolerated and
    /// skipped; out-of-range value slots are not.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnevenTags`] when the pair stream ends on a
    /// half-pair, [`DecodeError::ValueIndexOutOfRange`] when a scanned
    /// pair references a missing value, and [`DecodeError::Pbf`] on
    /// malformed varints.
    pub fn get_value(&self, key: &str) -> DecodeResult<(Value<'a>, Option<Warning>)> {
        let Some(slots) = self.layer.key_indices(key) else {
            return Ok((Value::Null, None));
        };
        let warning = (slots.len() > 1).then_some(Warning::DuplicateKeys);

        let mut words = self.tags.iter();
        loop {
            let Some(key_slot) = words.next() else { break };
            let key_slot = key_slot?;
            let Some(value_slot) = words.next() else {
                return Err(DecodeError::UnevenTags);
            };
            let value_slot = value_slot?;

            let view = self.layer.value_view(value_slot).ok_or(
                DecodeError::ValueIndexOutOfRange {
                    index: value_slot,
                    count: self.layer.value_count(),
                },
            )?;
            if slots.contains(&key_slot) {
                return Ok((Value::parse(view)?, warning));
            }
        }
        Ok((Value::Null, warning))
    }

    /// Decodes all tag pairs into a key-to-value map.
    ///
    /// Pairs are applied in wire order; when a key name repeats, later
    /// pairs overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnevenTags`],
    /// [`DecodeError::KeyIndexOutOfRange`],
    /// [`DecodeError::ValueIndexOutOfRange`] on malformed pair streams
    /// and [`DecodeError::Pbf`] on malformed varints.
    pub fn properties(&self) -> DecodeResult<HashMap<&'a str, Value<'a>>> {
        let mut properties = HashMap::new();
        let mut words = self.tags.iter();
        loop {
            let Some(key_slot) = words.next() else { break };
            let key_slot = key_slot?;
            let Some(value_slot) = words.next() else {
                return Err(DecodeError::UnevenTags);
            };
            let value_slot = value_slot?;

            let key = self
                .layer
                .key(key_slot)
                .ok_or(DecodeError::KeyIndexOutOfRange {
                    index: key_slot,
                    count: self.layer.key_count(),
                })?;
            let view = self.layer.value_view(value_slot).ok_or(
                DecodeError::ValueIndexOutOfRange {
                    index: value_slot,
                    count: self.layer.value_count(),
                },
            )?;
            properties.insert(key, Value::parse(view)?);
        }
        Ok(properties)
    }

    /// Decodes the feature's geometry with default limits.
    ///
    /// # Errors
    ///
    /// See [`geometries_with_limits`](Self::geometries_with_limits).
    pub fn geometries<C: Coordinate>(&self, scale: f32) -> DecodeResult<GeometryCollection<C>> {
        self.geometries_with_limits(scale, &GeometryLimits::default())
    }

    /// Decodes the feature's geometry with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownCommand`],
    /// [`DecodeError::TruncatedParameters`],
    /// [`DecodeError::CoordinateOutOfRange`] for invalid command streams
    /// and [`DecodeError::Pbf`] on malformed varints.
    pub fn geometries_with_limits<C: Coordinate>(
        &self,
        scale: f32,
        limits: &GeometryLimits,
    ) -> DecodeResult<GeometryCollection<C>> {
        geometry::decode(self.geometry, self.geom_type, scale, limits)
    }
}
