//! Main Raster type

use crate::error::{Error, Result};
use crate::pixel::Rgba;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
pub trait RasterElement: Copy + Clone + Debug + PartialEq + Send + Sync + 'static {}

impl<T> RasterElement for T where T: Copy + Clone + Debug + PartialEq + Send + Sync + 'static {}

/// A 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in row-major order `(row, col)`.
/// Construction validates the buffer shape, so a `Raster` that exists is
/// structurally sound; algorithms never re-check buffer lengths.
///
/// # Example
///
/// ```ignore
/// use verdis_core::{Raster, Rgba};
///
/// // Create a 100x100 image filled with opaque green
/// let image: Raster<Rgba> = Raster::filled(100, 100, Rgba::opaque(0, 200, 0));
///
/// let pixel = image.get(10, 20)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
}

/// An RGBA image raster, the input and output type of the classifier
pub type RgbaRaster = Raster<Rgba>;

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with the default value
    pub fn new(rows: usize, cols: usize) -> Self
    where
        T: Default,
    {
        Self::filled(rows, cols, T::default())
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a raster from existing data.
    ///
    /// Fails with [`Error::InvalidImage`] if either dimension is zero or the
    /// buffer length does not match `rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(Error::InvalidImage {
                rows,
                cols,
                pixels: data.len(),
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Set value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        unsafe { *self.data.uget_mut((row, col)) = value }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Consume the raster and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Get a row slice
    pub fn row(&self, row: usize) -> Result<ArrayView1<'_, T>> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.data.row(row))
    }
}

impl RgbaRaster {
    /// Create an RGBA raster from a flat byte buffer (4 bytes per pixel,
    /// row-major).
    ///
    /// This is the decode boundary: a declared `rows x cols` image whose
    /// buffer does not hold exactly `rows * cols * 4` bytes fails with
    /// [`Error::InvalidImage`].
    pub fn from_raw(bytes: &[u8], rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || bytes.len() != rows * cols * 4 {
            return Err(Error::InvalidImage {
                rows,
                cols,
                pixels: bytes.len() / 4,
            });
        }

        let data: Vec<Rgba> = bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();

        Self::from_vec(data, rows, cols)
    }

    /// Flatten the raster into an RGBA byte buffer (row-major)
    pub fn to_raw(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * 4);
        for &pixel in self.data.iter() {
            bytes.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<u8> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
        assert_eq!(raster.len(), 20_000);
    }

    #[test]
    fn test_raster_access() {
        let mut raster: RgbaRaster = Raster::new(10, 10);
        raster.set(5, 5, Rgba::opaque(1, 2, 3)).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), Rgba::opaque(1, 2, 3));
        assert!(raster.get(10, 0).is_err());
        assert!(raster.set(0, 10, Rgba::BLACK).is_err());
    }

    #[test]
    fn test_from_vec_rejects_bad_shapes() {
        // 3x3 declared, 8 pixels supplied
        let short = vec![Rgba::BLACK; 8];
        assert!(matches!(
            Raster::from_vec(short, 3, 3),
            Err(Error::InvalidImage { rows: 3, cols: 3, pixels: 8 })
        ));

        // zero width
        assert!(Raster::<Rgba>::from_vec(vec![], 5, 0).is_err());
    }

    #[test]
    fn test_raw_roundtrip() {
        let bytes: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        let raster = RgbaRaster::from_raw(&bytes, 2, 3).unwrap();
        assert_eq!(raster.get(0, 0).unwrap(), Rgba::new(0, 1, 2, 3));
        assert_eq!(raster.get(1, 2).unwrap(), Rgba::new(20, 21, 22, 23));
        assert_eq!(raster.to_raw(), bytes);
    }

    #[test]
    fn test_from_raw_rejects_truncated_buffer() {
        let bytes = vec![0u8; 3 * 3 * 4 - 4];
        assert!(RgbaRaster::from_raw(&bytes, 3, 3).is_err());
    }
}
