use nalgebra::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Coordinates relative to the scanner, x along the zero-angle beam.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorFrame;

/// Coordinates of the reference map.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldFrame;

/// A planar point tagged with the frame it is expressed in.
///
/// Points in different frames cannot be mixed. Moving a point from the
/// [`SensorFrame`] into the [`WorldFrame`] requires a [`Pose`](crate::pose::Pose).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Point<Frame> {
    inner: Vector2<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    _phan: PhantomData<Frame>,
}

impl<Frame> Point<Frame> {
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_vec2(Vector2::new(x, y))
    }

    pub fn from_vec2(inner: Vector2<f64>) -> Self {
        Self {
            inner,
            _phan: PhantomData,
        }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.inner.x
    }

    pub fn y(&self) -> f64 {
        self.inner.y
    }

    pub fn as_vec2(&self) -> &Vector2<f64> {
        &self.inner
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point<Frame>) -> f64 {
        (self.inner - other.inner).norm()
    }
}

impl<Frame> From<(f64, f64)> for Point<Frame> {
    fn from(tuple: (f64, f64)) -> Self {
        let (x, y) = tuple;
        Self::new(x, y)
    }
}

impl<Frame> From<Point<Frame>> for (f64, f64) {
    fn from(point: Point<Frame>) -> Self {
        (point.x(), point.y())
    }
}

/// Center of mass of `points`, or `None` if there are none.
pub fn centroid<Frame>(points: &[Point<Frame>]) -> Option<Vector2<f64>> {
    if points.is_empty() {
        return None;
    }

    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.as_vec2());
    Some(sum / points.len() as f64)
}
