//! Projection, quadtree subdivision, coordinate validation and point parsing.

pub mod mercator;
pub mod point;
pub mod quadtree;
pub mod validation;
