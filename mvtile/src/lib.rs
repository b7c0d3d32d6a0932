//! Read-only decoder for Mapbox Vector Tiles (v1 and v2).
//!
//! A tile is an opaque byte buffer; this crate exposes a lazy, navigable
//! view of its layers, features, attribute tables and geometries. Nothing
//! is decoded until asked for: opening a tile indexes the layer views,
//! opening a layer materializes its shared tables, and feature properties
//! and geometry decode per call.
//!
//! # Design Principles
//!
//! - **Hostile input is the normal case** - every count and index taken
//!   from the wire is validated or clamped before it drives allocation.
//! - **Zero-copy** - decoded views borrow the caller's buffer; strings
//!   and raw ranges are never duplicated.
//! - **No unsafe code, no panics** - malformed tiles decode to structured
//!   errors.
//!
//! # Example
//!
//! ```
//! use mvtile::Tile;
//!
//! // An empty buffer is a valid tile with no layers.
//! let tile = Tile::new(&[]).unwrap();
//! assert!(tile.layer_names().is_empty());
//! ```

mod error;
mod feature;
mod geometry;
mod layer;
mod limits;
mod pbf;
mod tile;
mod value;

#[cfg(test)]
mod test_encode;

pub use error::{DecodeError, DecodeResult, LayerField, Warning};
pub use feature::{Feature, GeomType, Identifier};
pub use geometry::{Coordinate, GeometryCollection, Point};
pub use layer::Layer;
pub use limits::GeometryLimits;
pub use tile::Tile;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = Tile::new(&[]);
        let _ = GeometryLimits::default();
        let _ = GeomType::Unknown;
        let _ = Identifier::Null;
        let _ = Value::Null;
        let _ = Point::new(0i32, 0i32);
        let _ = GeometryCollection::<i32>::default();
        let _ = Warning::DuplicateKeys;
        let _ = LayerField::Name;

        // Error types
        let _: DecodeResult<()> = Ok(());
    }

    #[test]
    fn geometry_collection_default_is_empty() {
        let collection = GeometryCollection::<i16>::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }
}
