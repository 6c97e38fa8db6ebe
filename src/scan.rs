//! Cylinder candidates from a single range scan.
//!
//! A cylinder standing in front of the background shows up in the scan as a
//! run of shorter readings. Its left border is a steep drop in range (a
//! falling edge of the derivative), its right border a steep rise (a rising
//! edge). Every run of valid readings enclosed by a falling edge and the next
//! rising edge becomes one [`LandmarkObservation`].
//!
//! ```text
//!  range
//!    |‾‾‾‾‾‾‾‾\          /‾‾‾‾‾‾‾
//!    |         \________/
//!    +--------------------------- ray
//!              ^        ^
//!           falling   rising
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One sweep of the range finder, one reading per ray.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RangeScan {
    readings: Vec<f64>,
}

impl RangeScan {
    pub fn new(readings: Vec<f64>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[f64] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Centered first derivative of the readings.
    ///
    /// Entry `i` is `(r[i+1] - r[i-1]) / 2` when both neighbours exceed
    /// `min_valid_distance`, and zero otherwise. The first and last entries
    /// are always zero. The result has the same length as the scan.
    pub fn derivative(&self, min_valid_distance: f64) -> Vec<f64> {
        let n = self.readings.len();
        (0..n)
            .map(|i| {
                if i == 0 || i + 1 >= n {
                    return 0.0;
                }

                let l = self.readings[i - 1];
                let r = self.readings[i + 1];
                match l > min_valid_distance && r > min_valid_distance {
                    true => (r - l) / 2.0,
                    false => 0.0,
                }
            })
            .collect()
    }
}

impl From<Vec<f64>> for RangeScan {
    fn from(readings: Vec<f64>) -> Self {
        Self::new(readings)
    }
}

/// A cylinder candidate in scanner polar coordinates.
///
/// `ray` is the mean (usually fractional) ray index of the samples on the
/// cylinder and `depth` their mean range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarkObservation {
    ray: f64,
    depth: f64,
}

impl LandmarkObservation {
    pub fn new(ray: f64, depth: f64) -> Self {
        Self { ray, depth }
    }

    pub fn ray(&self) -> f64 {
        self.ray
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }
}

#[derive(Default)]
struct Accumulator {
    sum_ray: f64,
    sum_depth: f64,
    rays: usize,
}

impl Accumulator {
    fn add(&mut self, ray: usize, depth: f64) {
        self.sum_ray += ray as f64;
        self.sum_depth += depth;
        self.rays += 1;
    }

    fn into_observation(self) -> Option<LandmarkObservation> {
        if self.rays == 0 {
            return None;
        }

        let n = self.rays as f64;
        Some(LandmarkObservation::new(self.sum_ray / n, self.sum_depth / n))
    }
}

/// Derivative based edge detector that splits a [`RangeScan`] into
/// [`LandmarkObservation`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segmenter {
    min_valid_distance: f64,
    jump_threshold: f64,
}

impl Segmenter {
    /// Readings at or below `min_valid_distance` are treated as invalid.
    /// A derivative beyond `jump_threshold` in magnitude is an edge.
    pub fn new(min_valid_distance: f64, jump_threshold: f64) -> Self {
        Self {
            min_valid_distance,
            jump_threshold,
        }
    }

    pub fn segment(&self, scan: &RangeScan) -> Vec<LandmarkObservation> {
        let derivative = scan.derivative(self.min_valid_distance);
        self.segment_with(scan, &derivative)
    }

    /// Segment `scan` using a precomputed `derivative` of the same length.
    ///
    /// A falling edge opens a region and discards anything accumulated so
    /// far. A rising edge closes the open region and emits its mean ray and
    /// depth if it holds at least one valid reading. A region still open at
    /// the end of the scan is dropped.
    pub fn segment_with(&self, scan: &RangeScan, derivative: &[f64]) -> Vec<LandmarkObservation> {
        let mut observations = Vec::new();
        let mut region: Option<Accumulator> = None;

        for (i, (&d, &reading)) in derivative.iter().zip(scan.readings()).enumerate() {
            if d < -self.jump_threshold {
                region = Some(Accumulator::default());
            } else if d > self.jump_threshold {
                if let Some(obs) = region.take().and_then(Accumulator::into_observation) {
                    trace!(ray = obs.ray(), depth = obs.depth(), closed_at = i, "cylinder");
                    observations.push(obs);
                }
            } else if let Some(acc) = region.as_mut()
                && reading > self.min_valid_distance
            {
                acc.add(i, reading);
            }
        }

        if region.is_some() {
            trace!("dropping region left open at end of scan");
        }

        observations
    }
}
