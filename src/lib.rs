//! Planar Voronoi diagrams via Fortune's sweep-line algorithm, with each
//! resulting cell optionally shrunk or inflated by a signed polygon offset.
//!
//! ```
//! use voronoi::{build_voronoi, geometry::Point};
//!
//! let sites = vec![Point::new(100.0, 100.0), Point::new(300.0, 300.0)];
//! let diagram = build_voronoi(&sites);
//! assert!(!diagram.segments().is_empty());
//! ```

pub mod beachline;
pub mod builder;
pub mod cells;
pub mod error;
pub mod events;
pub mod geometry;
pub mod io;
pub mod offset;

pub use builder::{build_voronoi, BoundingBox, VoronoiDiagram};
pub use error::VoronoiError;
pub use geometry::{point_in_polygon, winding_direction, Point, Polygon};
pub use offset::offset;
