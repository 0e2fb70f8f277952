//! # Verdis Core
//!
//! Core types and I/O for the Verdis green-cover analysis library.
//!
//! This crate provides:
//! - `Rgba`: 8-bit RGBA pixel
//! - `Raster<T>` / `RgbaRaster`: row-major 2D grid type
//! - Error types shared across the workspace
//! - Decode/encode of common image formats at the raster boundary

pub mod error;
pub mod io;
pub mod pixel;
pub mod raster;

pub use error::{Error, Result};
pub use pixel::Rgba;
pub use raster::{Raster, RasterElement, RgbaRaster};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pixel::Rgba;
    pub use crate::raster::{Raster, RasterElement, RgbaRaster};
}
