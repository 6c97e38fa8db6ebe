//! The static landmark map and nearest neighbour data association.

use crate::frame::{Point, WorldFrame};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pairs an observed landmark with a map landmark by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correspondence {
    pub observed: usize,
    pub reference: usize,
}

impl Correspondence {
    pub fn new(observed: usize, reference: usize) -> Self {
        Self {
            observed,
            reference,
        }
    }
}

/// Known landmark positions in the [`WorldFrame`]. Read-only for a run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ReferenceMap {
    landmarks: Vec<Point<WorldFrame>>,
}

impl ReferenceMap {
    pub fn new(landmarks: Vec<Point<WorldFrame>>) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Point<WorldFrame>] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Index and distance of the landmark closest to `point`.
    ///
    /// Equidistant landmarks resolve to the lowest index.
    pub fn nearest(&self, point: &Point<WorldFrame>) -> Option<(usize, f64)> {
        nearest(point, &self.landmarks)
    }

    /// See [`find_correspondences`].
    pub fn correspondences(
        &self,
        observed: &[Point<WorldFrame>],
        max_radius: f64,
    ) -> Vec<Correspondence> {
        find_correspondences(observed, &self.landmarks, max_radius)
    }
}

impl FromIterator<Point<WorldFrame>> for ReferenceMap {
    fn from_iter<I: IntoIterator<Item = Point<WorldFrame>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn nearest(point: &Point<WorldFrame>, reference: &[Point<WorldFrame>]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (j, candidate) in reference.iter().enumerate() {
        let distance = point.distance(candidate);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((j, distance)),
        }
    }
    best
}

/// Pair every observed landmark with its nearest reference landmark.
///
/// An observation is paired only if that nearest landmark is strictly closer
/// than `max_radius`. The pairing is greedy and not mutual: several
/// observations may share one reference landmark. Output follows the order of
/// `observed`.
pub fn find_correspondences(
    observed: &[Point<WorldFrame>],
    reference: &[Point<WorldFrame>],
    max_radius: f64,
) -> Vec<Correspondence> {
    observed
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            let (j, distance) = nearest(point, reference)?;
            (distance < max_radius).then_some(Correspondence::new(i, j))
        })
        .collect()
}

/// Split `correspondences` into two aligned point lists, observed first.
pub fn paired_points(
    correspondences: &[Correspondence],
    observed: &[Point<WorldFrame>],
    reference: &[Point<WorldFrame>],
) -> (Vec<Point<WorldFrame>>, Vec<Point<WorldFrame>>) {
    correspondences
        .iter()
        .map(|c| (observed[c.observed], reference[c.reference]))
        .unzip()
}
