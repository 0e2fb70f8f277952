//! Image decode/encode boundary
//!
//! Uses the `image` crate to decode common formats (PNG, JPEG, TIFF, ...)
//! into an [`RgbaRaster`] and to encode masks and overlays back to PNG.
//! The algorithms themselves never touch files; everything fallible about
//! formats lives here.

use crate::error::{Error, Result};
use crate::raster::RgbaRaster;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Read an image file into an RGBA raster.
///
/// Any format supported by the `image` crate is accepted; pixels are
/// converted to 8-bit RGBA.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<RgbaRaster> {
    let decoded = image::open(path.as_ref()).map_err(|e| Error::Decode(e.to_string()))?;
    raster_from_decoded(decoded)
}

/// Read an image from an in-memory buffer into an RGBA raster.
///
/// Same as [`read_image`] but operates on a byte slice instead of a file
/// path. Useful when the upload never touches the filesystem.
pub fn read_image_from_buffer(data: &[u8]) -> Result<RgbaRaster> {
    let decoded = image::load_from_memory(data).map_err(|e| Error::Decode(e.to_string()))?;
    raster_from_decoded(decoded)
}

/// Internal: convert a decoded image into an RGBA raster
fn raster_from_decoded(decoded: DynamicImage) -> Result<RgbaRaster> {
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbaRaster::from_raw(rgba.as_raw(), height as usize, width as usize)
}

/// Write an RGBA raster to a PNG file
pub fn write_png<P: AsRef<Path>>(raster: &RgbaRaster, path: P) -> Result<()> {
    let encoded = encode_png(raster)?;
    std::fs::write(path.as_ref(), encoded)?;
    Ok(())
}

/// Encode an RGBA raster as an in-memory PNG buffer
pub fn write_png_to_buffer(raster: &RgbaRaster) -> Result<Vec<u8>> {
    encode_png(raster)
}

/// Internal: encode a raster as PNG bytes
fn encode_png(raster: &RgbaRaster) -> Result<Vec<u8>> {
    let (rows, cols) = raster.shape();
    let buffer = image::RgbaImage::from_raw(cols as u32, rows as u32, raster.to_raw())
        .ok_or_else(|| Error::Encode("raster does not fit an RGBA image buffer".to_string()))?;

    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgba;
    use crate::raster::Raster;

    #[test]
    fn test_png_buffer_roundtrip() {
        let mut raster: RgbaRaster = Raster::filled(4, 6, Rgba::WHITE);
        raster.set(1, 2, Rgba::opaque(10, 180, 30)).unwrap();

        let png = write_png_to_buffer(&raster).unwrap();
        let back = read_image_from_buffer(&png).unwrap();

        assert_eq!(back.shape(), (4, 6));
        assert_eq!(back.get(1, 2).unwrap(), Rgba::opaque(10, 180, 30));
        assert_eq!(back.get(0, 0).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = read_image_from_buffer(b"not an image at all");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
