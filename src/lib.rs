//! img2dmg - convert images to the four-color retro handheld palette
//!
//! Library side of the `img2dmg` command: raster I/O, archive codec,
//! the single-consumer job queue, and export. Exposed for integration tests.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
