//! Pure Rust decoder for the TSFL/TMDL model container family (unofficial).
//!
//! `.trb` model files and their `.tkl` keyframe-library companions are both
//! TSFL containers. The decoder is IO-free: it operates on in-memory byte
//! slices and produces owned meshes, a bone hierarchy, and keyframed
//! animation clips. Texture loading, material binding, and scene transforms
//! are left to the host.

#![forbid(unsafe_code)]

mod animation;
mod container;
mod cursor;
mod error;
mod geometry;
mod keylib;
mod loader;
mod model;
mod skeleton;

pub use container::*;
pub use error::*;
pub use keylib::*;
pub use model::*;

#[cfg(test)]
mod test_fixtures;



#[cfg(test)]
mod skeleton_tests;
