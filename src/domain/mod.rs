//! Domain logic and core data structures
//!
//! Pure yard geometry: the layout registry, container records, location
//! resolution and hit testing. Nothing here knows about cameras, input
//! devices or pixels.

pub mod container;
pub mod core;
pub mod layout;
pub mod resolver;
