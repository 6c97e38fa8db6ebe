//! Scanner geometry and the polar to Cartesian conversion of observations.

use crate::{
    error::Error,
    frame::{Point, SensorFrame},
    scan::LandmarkObservation,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

/// Maps a (possibly fractional) ray index to its bearing in the
/// [`SensorFrame`].
pub trait BeamGeometry {
    fn angle_of(&self, ray: f64) -> Angle;

    /// Place `obs` in the [`SensorFrame`].
    ///
    /// `range_offset` is added to the measured depth. For a cylinder it
    /// moves the point from the visible surface towards the axis.
    fn to_cartesian(&self, obs: &LandmarkObservation, range_offset: f64) -> Point<SensorFrame> {
        let range = obs.depth() + range_offset;
        let angle = self.angle_of(obs.ray()).get::<radian>();
        Point::new(range * angle.cos(), range * angle.sin())
    }
}

/// Rays spaced evenly in angle around a center ray.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearBeamGeometry {
    /// The ray that points along the scanner axis before mounting rotation.
    pub center_ray: f64,
    /// Angular spacing between neighbouring rays.
    pub step: Angle,
    /// Rotation of the scanner relative to the robot.
    pub mounting: Angle,
}

impl LinearBeamGeometry {
    pub fn new(center_ray: f64, step: Angle, mounting: Angle) -> Self {
        Self {
            center_ray,
            step,
            mounting,
        }
    }
}

impl Default for LinearBeamGeometry {
    /// The 660 ray LEGO scanner used with the reference arena.
    fn default() -> Self {
        Self::new(
            330.0,
            Angle::new::<radian>(0.006135923151543),
            Angle::new::<radian>(-0.06981317007977318),
        )
    }
}

impl BeamGeometry for LinearBeamGeometry {
    fn angle_of(&self, ray: f64) -> Angle {
        self.step * (ray - self.center_ray) + self.mounting
    }
}

/// One measured bearing per integer ray.
///
/// Fractional rays are interpolated linearly between the two enclosing rays.
/// Rays before the first or after the last entry take that entry's angle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Angle>", into = "Vec<Angle>"))]
pub struct TabulatedBeamGeometry {
    angles: Vec<Angle>,
}

impl TabulatedBeamGeometry {
    pub fn try_new(angles: Vec<Angle>) -> Result<Self, Error> {
        if angles.is_empty() {
            return Err(Error::InvalidInput("beam table has no rays".into()));
        }

        Ok(Self { angles })
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

impl TryFrom<Vec<Angle>> for TabulatedBeamGeometry {
    type Error = Error;

    fn try_from(angles: Vec<Angle>) -> Result<Self, Self::Error> {
        Self::try_new(angles)
    }
}

impl From<TabulatedBeamGeometry> for Vec<Angle> {
    fn from(geometry: TabulatedBeamGeometry) -> Self {
        geometry.angles
    }
}

impl BeamGeometry for TabulatedBeamGeometry {
    fn angle_of(&self, ray: f64) -> Angle {
        let last = (self.angles.len() - 1) as f64;
        interpolate(ray.clamp(0.0, last), |i| self.angles[i])
    }
}

/// Any per-ray lookup is a geometry. Fractional rays are interpolated.
impl<F> BeamGeometry for F
where
    F: Fn(usize) -> Angle,
{
    fn angle_of(&self, ray: f64) -> Angle {
        interpolate(ray.max(0.0), self)
    }
}

fn interpolate<F: Fn(usize) -> Angle>(ray: f64, lookup: F) -> Angle {
    let lower = ray.floor();
    let frac = ray - lower;
    let i = lower as usize;

    let a = lookup(i);
    if frac == 0.0 {
        return a;
    }

    a + (lookup(i + 1) - a) * frac
}
