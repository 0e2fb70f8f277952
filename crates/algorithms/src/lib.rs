//! # Verdis Algorithms
//!
//! Analysis algorithms for aerial/satellite imagery.
//!
//! ## Available algorithms
//!
//! - **greencover**: adaptive-threshold vegetation classification with
//!   coverage percentages and a binary mask
//! - **pathfinding**: least-cost route extraction over a classified mask

pub mod greencover;
pub mod pathfinding;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::greencover::{
        green_cover, mean_green, GreenCover, GreenCoverParams, GREEN_LUMA_WEIGHT,
        THRESHOLD_DIVISOR,
    };
    pub use crate::pathfinding::{
        optimal_path, overlay_path, PathParams, DENSITY_SCALE_NUMERATOR, LOG_DENSITY_WEIGHT,
    };
    pub use verdis_core::prelude::*;
}
