//! Rendering configuration

use crate::constants::{DEFAULT_DPI, MAX_BITMAP_PIXELS, PRINT_DPI_LADDER};
use crate::layout::LayoutBounds;
use crate::print::PrintSurface;
use crate::types::{Dpi, RenderError, Result};
use crate::watermark::Watermark;

/// Settings shared by on-screen rendering and printing
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Resolution substituted for [`Dpi::Default`]
    pub default_dpi: u32,
    /// Display ceilings used by the layout engine
    pub display_bounds: LayoutBounds,
    /// Resolutions tried in order for each printed page
    pub print_dpi_ladder: Vec<Dpi>,
    /// Largest bitmap a single attempt may produce
    pub max_bitmap_pixels: u64,
    pub print_surface: PrintSurface,
    pub watermark: Watermark,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_dpi: DEFAULT_DPI,
            display_bounds: LayoutBounds::default(),
            print_dpi_ladder: PRINT_DPI_LADDER.to_vec(),
            max_bitmap_pixels: MAX_BITMAP_PIXELS,
            print_surface: PrintSurface::default(),
            watermark: Watermark::default(),
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.default_dpi == 0 {
            return Err(RenderError::Config(
                "default DPI must be greater than zero".to_string(),
            ));
        }
        if self.print_dpi_ladder.is_empty() {
            return Err(RenderError::Config(
                "print DPI ladder needs at least one entry".to_string(),
            ));
        }
        if self.print_dpi_ladder.contains(&Dpi::Fixed(0)) {
            return Err(RenderError::Config(
                "print DPI ladder cannot contain 0".to_string(),
            ));
        }
        if self.max_bitmap_pixels == 0 {
            return Err(RenderError::Config(
                "bitmap pixel limit must be greater than zero".to_string(),
            ));
        }
        for (name, bounds) in [
            ("portrait", self.display_bounds.portrait),
            ("landscape", self.display_bounds.landscape),
        ] {
            if bounds.width == 0 || bounds.height == 0 {
                return Err(RenderError::Config(format!(
                    "{} display bounds must be non-zero",
                    name
                )));
            }
        }
        self.print_surface.validate()?;
        self.watermark.validate()
    }
}
