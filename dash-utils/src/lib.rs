mod geometry;
pub use geometry::*;
mod hash;
pub use hash::*;
mod json;
pub use json::*;
