//! The per-frame correction loop.
//!
//! Every frame runs the same chain:
//!
//! ```text
//! scan -> segment -> to_cartesian -> sensor_to_world -> correspondences
//!      -> estimate -> correct pose
//! ```
//!
//! Only the last steps depend on the pose. Segmentation and conversion of
//! many frames can run in parallel with [`Localizer::par_extract`], while the
//! pose is threaded from frame to frame strictly in order.

use crate::{
    beam::BeamGeometry,
    config::LocalizerConfig,
    error::ConfigError,
    estimator::{EstimateError, Estimator, SimilarityEstimator},
    frame::{Point, SensorFrame, WorldFrame},
    map::{Correspondence, ReferenceMap, paired_points},
    pose::Pose,
    scan::{RangeScan, Segmenter},
    transform::SimilarityTransform,
};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Everything one frame produced.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// The corrected pose, or the predicted pose if no transform was found.
    /// This is the input pose of the next frame.
    pub pose: Pose,

    /// Detected cylinders in the [`SensorFrame`], in scan order.
    pub sensor_landmarks: Vec<Point<SensorFrame>>,

    /// The paired cylinders after correction. Empty without a transform.
    pub world_landmarks: Vec<Point<WorldFrame>>,

    pub correspondences: Vec<Correspondence>,

    /// The alignment applied to the predicted pose, or why there was none.
    pub transform: Result<SimilarityTransform, EstimateError>,
}

impl FrameReport {
    pub fn is_corrected(&self) -> bool {
        self.transform.is_ok()
    }
}

/// Corrects predicted poses using cylinders found in range scans.
pub struct Localizer<G> {
    config: LocalizerConfig,
    segmenter: Segmenter,
    estimator: SimilarityEstimator,
    geometry: G,
    map: ReferenceMap,
}

impl<G: BeamGeometry> Localizer<G> {
    /// Validates `config` once for the whole run.
    pub fn new(config: LocalizerConfig, geometry: G, map: ReferenceMap) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        debug!(landmarks = map.len(), ?config, "localizer ready");

        Ok(Self {
            segmenter: Segmenter::new(config.min_valid_distance, config.jump_threshold),
            estimator: SimilarityEstimator::new(config.fix_scale),
            config,
            geometry,
            map,
        })
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    pub fn map(&self) -> &ReferenceMap {
        &self.map
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Cylinders in `scan` as points in the [`SensorFrame`].
    pub fn extract(&self, scan: &RangeScan) -> Vec<Point<SensorFrame>> {
        self.segmenter
            .segment(scan)
            .iter()
            .map(|obs| self.geometry.to_cartesian(obs, self.config.range_offset))
            .collect()
    }

    /// Run one frame starting from the `predicted` pose.
    pub fn step(&self, predicted: Pose, scan: &RangeScan) -> FrameReport {
        self.correct(predicted, self.extract(scan))
    }

    /// Finish a frame whose cylinders are already extracted.
    pub fn correct(&self, predicted: Pose, sensor_landmarks: Vec<Point<SensorFrame>>) -> FrameReport {
        let observed: Vec<Point<WorldFrame>> = sensor_landmarks
            .iter()
            .map(|p| predicted.sensor_to_world(p))
            .collect();

        let correspondences = self
            .map
            .correspondences(&observed, self.config.max_correspondence_radius);
        let (left, right) = paired_points(&correspondences, &observed, self.map.landmarks());

        let transform = self.estimator.estimate(left.as_slice(), right.as_slice());
        let (pose, world_landmarks) = match &transform {
            Ok(t) => {
                trace!(
                    residual = t.squared_error(&left, &right),
                    before = SimilarityTransform::identity().squared_error(&left, &right),
                    "aligned"
                );
                (t.correct(&predicted), left.iter().map(|p| t.apply(p)).collect())
            }
            Err(err) => {
                debug!(%err, "keeping predicted pose");
                (predicted, Vec::new())
            }
        };

        debug!(
            cylinders = sensor_landmarks.len(),
            paired = correspondences.len(),
            x = pose.x,
            y = pose.y,
            "frame done"
        );

        FrameReport {
            pose,
            sensor_landmarks,
            world_landmarks,
            correspondences,
            transform,
        }
    }

    /// Thread a pose through `scans` in order.
    ///
    /// `predict` is the motion model. It gets the previous frame's output
    /// pose (`initial` for the first frame) and the frame index, and returns
    /// the predicted pose for that frame.
    pub fn run<'a, I, P>(&self, initial: Pose, scans: I, mut predict: P) -> Vec<FrameReport>
    where
        I: IntoIterator<Item = &'a RangeScan>,
        P: FnMut(Pose, usize) -> Pose,
    {
        let mut pose = initial;
        scans
            .into_iter()
            .enumerate()
            .map(|(i, scan)| {
                let report = self.step(predict(pose, i), scan);
                pose = report.pose;
                report
            })
            .collect()
    }
}

impl<G: BeamGeometry + Sync> Localizer<G> {
    /// [`Localizer::extract`] for many scans in parallel.
    pub fn par_extract(&self, scans: &[RangeScan]) -> Vec<Vec<Point<SensorFrame>>> {
        scans.par_iter().map(|scan| self.extract(scan)).collect()
    }

    /// Same result as [`Localizer::run`], with extraction done up front in
    /// parallel.
    pub fn par_run<P>(&self, initial: Pose, scans: &[RangeScan], mut predict: P) -> Vec<FrameReport>
    where
        P: FnMut(Pose, usize) -> Pose,
    {
        let mut pose = initial;
        self.par_extract(scans)
            .into_iter()
            .enumerate()
            .map(|(i, landmarks)| {
                let report = self.correct(predict(pose, i), landmarks);
                pose = report.pose;
                report
            })
            .collect()
    }
}
