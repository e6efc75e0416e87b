//! Palette types and utilities
//!
//! This module provides the fixed four-entry palettes, the mode selector
//! that chooses between them, and the error for parsing a mode name.

mod error;
mod palette;

pub use error::ParseModeError;
pub use palette::{Palette, PaletteEntry, PaletteMode};
