//! # tilegrid-types
//!
//! Core value types for the tilegrid crate.
//!
//! - **Level**: a validated level of detail of the Web-Mercator tile pyramid
//! - **BoundingBox**: the geographic extent of one tile, edge by edge
//!
//! Both types are serializable with Serde and convert to the `geo` crate's
//! primitives where a geometric counterpart exists.
//!
//! ## Examples
//!
//! ```rust
//! use tilegrid_types::bbox::BoundingBox;
//! use tilegrid_types::level::Level;
//!
//! let level = Level::new(4).unwrap();
//! assert_eq!(level.pixels_per_axis(), 4096);
//!
//! let bbox = BoundingBox::new(40.8, 40.7, -73.9, -74.0);
//! assert!(bbox.contains(40.75, -73.95));
//! ```

pub mod bbox;
pub mod level;

pub use bbox::BoundingBox;
pub use level::{DEFAULT_LEVEL, Level, LevelOutOfRange, MAX_LEVEL, PIXELS_PER_TILE};
