//! Classify a synthetic scene and route across its mask

use verdis_algorithms::greencover::{green_cover, GreenCoverParams};
use verdis_algorithms::pathfinding::{optimal_path, PathParams};
use verdis_core::{Raster, Rgba, RgbaRaster};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A field with a dark diagonal band of vegetation
    let rows: usize = 64;
    let cols: usize = 64;
    let data: Vec<Rgba> = (0..rows * cols)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            if row.abs_diff(col) < 8 {
                Rgba::opaque(20, 60, 20)
            } else {
                Rgba::opaque(180, 210, 170)
            }
        })
        .collect();
    let image: RgbaRaster = Raster::from_vec(data, rows, cols)?;

    let result = green_cover(&image, GreenCoverParams::default())?;
    println!(
        "Green cover: {:.2}%  Idle land: {:.2}%  (mean green {:.2}, threshold {:.2})",
        result.vegetation_percent, result.idle_percent, result.mean_green, result.threshold
    );

    let route = optimal_path(&result.mask, PathParams::new((0, cols - 1), (rows - 1, 0)))?;
    println!("Route length: {} cells", route.len());

    Ok(())
}
