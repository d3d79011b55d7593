//! Embedded in-memory geospatial object collection.
//!
//! A [`Collection`] stores geometric and plain-string values keyed by id,
//! kept in three coordinated indexes (id-ordered, value-ordered, and an
//! R-tree) with a schema-less numeric field table alongside. Queries cover
//! ordered scans, range searches, spatial containment and intersection,
//! k-nearest-neighbor traversal, quad-tree sparse sampling, and
//! cursor-paginated iteration with deadline enforcement.
//!
//! ```rust
//! use geoset::{Collection, Object};
//! use geo::Point;
//!
//! let mut col = Collection::new();
//! col.set("truck1", Object::from(Point::new(-112.26, 33.52)), None, &[])?;
//! col.set_field("truck1", "speed", 45.0)?;
//!
//! let (obj, fields) = col.get("truck1").unwrap();
//! assert!(obj.is_spatial());
//! assert_eq!(fields, &[45.0]);
//! # Ok::<(), geoset::CollectionError>(())
//! ```

pub mod collection;
pub mod cursor;
pub mod error;
pub mod field;
pub mod object;
pub mod spatial_index;

#[cfg(feature = "sync")]
pub mod sync;

pub use collection::{Collection, CollectionStats, SetOutcome};
pub use cursor::{Cursor, Deadline};
pub use error::{CollectionError, Result};
pub use object::{Circle, Object};

#[cfg(feature = "sync")]
pub use sync::SyncCollection;

pub use geo::{Point, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Collection, CollectionError, Result};

    pub use crate::{Circle, Object};

    pub use crate::{Cursor, Deadline};

    #[cfg(feature = "sync")]
    pub use crate::SyncCollection;

    pub use geo::{Point, Polygon, Rect};
}
