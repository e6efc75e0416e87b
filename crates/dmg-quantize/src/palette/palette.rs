//! Fixed four-entry palettes and the mode that selects between them.
//!
//! Palettes are ordered from darkest (index 0) to brightest (index 3), and
//! the index doubles as the luminance band identifier used by the
//! quantizer. The length is part of the type, so a palette can never hold
//! more or fewer than four colors.

use std::fmt;
use std::str::FromStr;

use super::error::ParseModeError;
use crate::quantize::BAND_COUNT;

/// A single palette color as 8-bit sRGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl PaletteEntry {
    /// Create a palette entry from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as an uppercase `#RRGGBB` string.
    ///
    /// ```
    /// use dmg_quantize::PaletteEntry;
    /// assert_eq!(PaletteEntry::new(15, 56, 15).to_hex(), "#0F380F");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for PaletteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An ordered four-color palette, darkest first.
///
/// # Example
///
/// ```
/// use dmg_quantize::{Palette, PaletteEntry};
///
/// let palette = Palette::GRAY;
/// assert_eq!(palette.entry(0), PaletteEntry::new(0, 0, 0));
/// assert_eq!(palette.entry(3), PaletteEntry::new(255, 255, 255));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [PaletteEntry; BAND_COUNT],
}

impl Palette {
    /// Retro handheld LCD greens.
    pub const DMG: Self = Self::new([
        PaletteEntry::new(0x0F, 0x38, 0x0F),
        PaletteEntry::new(0x30, 0x62, 0x30),
        PaletteEntry::new(0x8B, 0xAC, 0x0F),
        PaletteEntry::new(0x9B, 0xBC, 0x0F),
    ]);

    /// Evenly spaced grayscale ramp.
    pub const GRAY: Self = Self::new([
        PaletteEntry::new(0x00, 0x00, 0x00),
        PaletteEntry::new(0x55, 0x55, 0x55),
        PaletteEntry::new(0xAA, 0xAA, 0xAA),
        PaletteEntry::new(0xFF, 0xFF, 0xFF),
    ]);

    /// Create a palette from four entries, darkest first.
    #[inline]
    pub const fn new(entries: [PaletteEntry; BAND_COUNT]) -> Self {
        Self { entries }
    }

    /// Number of entries. Always four.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get the entry for a band index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= 4`.
    #[inline]
    pub fn entry(&self, idx: usize) -> PaletteEntry {
        self.entries[idx]
    }

    /// All entries, darkest first.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry; BAND_COUNT] {
        &self.entries
    }

    /// Returns the band index of an exact RGB match, if any.
    pub fn index_of(&self, rgb: [u8; 3]) -> Option<usize> {
        self.entries.iter().position(|e| e.to_bytes() == rgb)
    }
}

/// Which of the two fixed palettes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteMode {
    /// Retro handheld greens
    #[default]
    Dmg,
    /// Grayscale
    Gray,
}

impl PaletteMode {
    /// All modes, in display order.
    pub const ALL: [PaletteMode; 2] = [PaletteMode::Dmg, PaletteMode::Gray];

    /// Resolve the palette for this mode. Pure and total.
    #[inline]
    pub fn palette(self) -> Palette {
        match self {
            PaletteMode::Dmg => Palette::DMG,
            PaletteMode::Gray => Palette::GRAY,
        }
    }

    /// The other mode.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            PaletteMode::Dmg => PaletteMode::Gray,
            PaletteMode::Gray => PaletteMode::Dmg,
        }
    }

    /// Suffix appended to a per-image export name (`-dmg` or `-gs`).
    #[inline]
    pub fn file_suffix(self) -> &'static str {
        match self {
            PaletteMode::Dmg => "-dmg",
            PaletteMode::Gray => "-gs",
        }
    }

    /// Suffix appended to a batch archive name (empty for the default mode).
    #[inline]
    pub fn archive_suffix(self) -> &'static str {
        match self {
            PaletteMode::Dmg => "",
            PaletteMode::Gray => "-gs",
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteMode::Dmg => "dmg",
            PaletteMode::Gray => "gray",
        }
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "dmg" => Ok(PaletteMode::Dmg),
            "gray" | "grey" | "gs" => Ok(PaletteMode::Gray),
            _ => Err(ParseModeError {
                input: trimmed.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_are_darkest_first() {
        for mode in PaletteMode::ALL {
            let palette = mode.palette();
            let lum: Vec<f64> = palette
                .entries()
                .iter()
                .map(|e| crate::quantize::luminance(e.r, e.g, e.b))
                .collect();
            assert!(
                lum.windows(2).all(|w| w[0] < w[1]),
                "{mode} palette not ordered by luminance: {lum:?}"
            );
        }
    }

    #[test]
    fn test_palette_constants() {
        assert_eq!(Palette::DMG.entry(0).to_hex(), "#0F380F");
        assert_eq!(Palette::DMG.entry(3).to_hex(), "#9BBC0F");
        assert_eq!(Palette::GRAY.entry(1).to_hex(), "#555555");
        assert_eq!(Palette::GRAY.entry(2).to_hex(), "#AAAAAA");
        assert_eq!(Palette::DMG.entry(2).to_string(), "#8BAC0F");
        assert_eq!(Palette::DMG.len(), 4);
        assert!(!Palette::GRAY.is_empty());
    }

    #[test]
    fn test_index_of() {
        assert_eq!(Palette::GRAY.index_of([170, 170, 170]), Some(2));
        assert_eq!(Palette::GRAY.index_of([1, 2, 3]), None);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("dmg".parse::<PaletteMode>(), Ok(PaletteMode::Dmg));
        assert_eq!(" GRAY ".parse::<PaletteMode>(), Ok(PaletteMode::Gray));
        assert_eq!("gs".parse::<PaletteMode>(), Ok(PaletteMode::Gray));
        assert_eq!("grey".parse::<PaletteMode>(), Ok(PaletteMode::Gray));
        assert!("green".parse::<PaletteMode>().is_err());
        let err = "sepia".parse::<PaletteMode>().unwrap_err();
        assert_eq!(err.input, "sepia");
        assert!(err.to_string().contains("sepia"));
        assert_eq!(PaletteMode::Gray.to_string(), "gray");
    }

    #[test]
    fn test_mode_suffixes_and_toggle() {
        assert_eq!(PaletteMode::Dmg.file_suffix(), "-dmg");
        assert_eq!(PaletteMode::Gray.file_suffix(), "-gs");
        assert_eq!(PaletteMode::Dmg.archive_suffix(), "");
        assert_eq!(PaletteMode::Gray.archive_suffix(), "-gs");
        assert_eq!(PaletteMode::Dmg.toggled(), PaletteMode::Gray);
        assert_eq!(PaletteMode::Gray.toggled().toggled(), PaletteMode::Gray);
        assert_eq!(PaletteMode::default(), PaletteMode::Dmg);
    }
}
