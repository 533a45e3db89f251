//! Pure domain types with minimal dependencies
//!
//! Coordinate, region and transform types shared by the recorder, the
//! compositor and the session. Nothing here touches the network.

pub mod geometry;
pub mod selection;
pub mod transform;

pub use geometry::*;
pub use selection::*;
pub use transform::*;
