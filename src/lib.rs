// #![warn(missing_docs)]

//! Landmark Based Pose Correction
//!
//! Finds cylinders in planar range scans, pairs them with a known map and
//! corrects a predicted robot pose with the similarity transform that best
//! aligns the two.
//!
//! ```
//! use landmark_fix::prelude::*;
//!
//! let map: ReferenceMap = [(0.0, 0.0), (1000.0, 0.0)].into_iter().map(Point::from).collect();
//! let localizer = Localizer::new(LocalizerConfig::default(), LinearBeamGeometry::default(), map)?;
//!
//! let report = localizer.step(Pose::origin(), &RangeScan::new(vec![3000.0; 660]));
//! assert_eq!(report.pose, Pose::origin());
//! # Ok::<(), landmark_fix::error::Error>(())
//! ```

pub mod beam;
pub mod config;
#[allow(missing_docs)]
pub mod error;
pub mod estimator;
pub mod frame;
pub mod localizer;
pub mod map;
pub mod pose;
pub mod report;
pub mod scan;
pub mod transform;

pub mod prelude {
    pub use crate::{
        beam::{BeamGeometry, LinearBeamGeometry, TabulatedBeamGeometry},
        config::LocalizerConfig,
        estimator::{EstimateError, Estimator, SimilarityEstimator},
        frame::{Point, SensorFrame, WorldFrame},
        localizer::{FrameReport, Localizer},
        map::{Correspondence, ReferenceMap},
        pose::Pose,
        scan::{LandmarkObservation, RangeScan, Segmenter},
        transform::SimilarityTransform,
    };
}
