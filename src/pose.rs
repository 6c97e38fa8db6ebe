use crate::frame::{Point, SensorFrame, WorldFrame};
use nalgebra::{Isometry2, Point2, Vector2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

/// Position and heading of the robot in the [`WorldFrame`].
///
/// A `Pose` is a value. Each frame produces a new one, which replaces the
/// previous pose wholesale.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,

    /// Counter-clockwise from the world x axis.
    pub heading: Angle,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: Angle) -> Self {
        Self { x, y, heading }
    }

    /// The pose at the world origin facing along the x axis.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, Angle::new::<radian>(0.0))
    }

    pub fn position(&self) -> Point<WorldFrame> {
        Point::new(self.x, self.y)
    }

    /// The rigid transform taking sensor coordinates into world coordinates.
    pub fn isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.x, self.y), self.heading.get::<radian>())
    }

    /// Express a scanner measurement in the [`WorldFrame`].
    ///
    /// The scanner origin is taken to coincide with the robot origin. Any
    /// mounting offset along the beam belongs in the range calibration.
    pub fn sensor_to_world(&self, point: &Point<SensorFrame>) -> Point<WorldFrame> {
        let world = self.isometry() * Point2::from(*point.as_vec2());
        Point::new(world.x, world.y)
    }
}

impl From<(f64, f64, f64)> for Pose {
    /// Builds a pose from `(x, y, heading in radians)`.
    fn from(tuple: (f64, f64, f64)) -> Self {
        let (x, y, heading) = tuple;
        Self::new(x, y, Angle::new::<radian>(heading))
    }
}

impl From<Pose> for (f64, f64, f64) {
    fn from(pose: Pose) -> Self {
        (pose.x, pose.y, pose.heading.get::<radian>())
    }
}
