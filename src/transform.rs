use crate::{frame::Point, pose::Pose};
use nalgebra::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

/// A planar similarity transform `p' = scale * R(theta) * p + t`.
///
/// The rotation is held as its cosine and sine, which satisfy
/// `cos^2 + sin^2 = 1` up to rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimilarityTransform {
    scale: f64,
    cos: f64,
    sin: f64,
    tx: f64,
    ty: f64,
}

impl SimilarityTransform {
    /// Creates a transform from its raw parameters.
    ///
    /// The caller is responsible for `cos` and `sin` describing a rotation.
    pub fn from_parts(scale: f64, cos: f64, sin: f64, tx: f64, ty: f64) -> Self {
        Self {
            scale,
            cos,
            sin,
            tx,
            ty,
        }
    }

    pub fn from_angle(scale: f64, angle: Angle, translation: Vector2<f64>) -> Self {
        let angle = angle.get::<radian>();
        Self::from_parts(scale, angle.cos(), angle.sin(), translation.x, translation.y)
    }

    pub fn identity() -> Self {
        Self::from_parts(1.0, 1.0, 0.0, 0.0, 0.0)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cos(&self) -> f64 {
        self.cos
    }

    pub fn sin(&self) -> f64 {
        self.sin
    }

    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.tx, self.ty)
    }

    pub fn rotation(&self) -> Angle {
        Angle::new::<radian>(self.sin.atan2(self.cos))
    }

    /// Map `point` through the transform. The frame does not change.
    pub fn apply<Frame>(&self, point: &Point<Frame>) -> Point<Frame> {
        let lac = self.scale * self.cos;
        let las = self.scale * self.sin;
        Point::new(
            lac * point.x() - las * point.y() + self.tx,
            las * point.x() + lac * point.y() + self.ty,
        )
    }

    /// Move a pose by the transform.
    ///
    /// The position is mapped like any other point and the heading turns by
    /// the rotation angle. The result replaces `pose`; it is not blended
    /// with it.
    pub fn correct(&self, pose: &Pose) -> Pose {
        let position = self.apply(&pose.position());
        Pose::new(position.x(), position.y(), pose.heading + self.rotation())
    }

    /// Sum of squared distances between each transformed `left` point and
    /// the `right` point at the same index.
    pub fn squared_error<Frame>(&self, left: &[Point<Frame>], right: &[Point<Frame>]) -> f64 {
        left.iter()
            .zip(right)
            .map(|(l, r)| (self.apply(l).as_vec2() - r.as_vec2()).norm_squared())
            .sum()
    }
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::WorldFrame;
    use approx::{assert_relative_eq, relative_eq};
    use quickcheck::quickcheck;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    quickcheck! {
        fn identity_keeps_points(x: i32, y: i32) -> bool {
            let p = Point::<WorldFrame>::new(x as f64 / 7.0, y as f64 / 3.0);
            SimilarityTransform::identity().apply(&p) == p
        }

        fn rotation_stays_normalized(seed: i16, scale_seed: u8) -> bool {
            let angle = Angle::new::<radian>(seed as f64 / i16::MAX as f64 * PI);
            let t = SimilarityTransform::from_angle(scale_seed as f64, angle, Vector2::zeros());
            relative_eq!(t.cos().powi(2) + t.sin().powi(2), 1.0, epsilon = 1e-12)
        }
    }

    #[rstest]
    #[case(SimilarityTransform::from_parts(1.0, 0.0, 1.0, 0.0, 0.0), (1.0, 0.0), (0.0, 1.0))]
    #[case(SimilarityTransform::from_parts(2.0, 1.0, 0.0, 0.0, 0.0), (1.0, -3.0), (2.0, -6.0))]
    #[case(SimilarityTransform::from_parts(1.0, 1.0, 0.0, 5.0, -5.0), (1.0, 1.0), (6.0, -4.0))]
    #[case(SimilarityTransform::from_parts(2.0, 0.0, -1.0, 1.0, 1.0), (1.0, 2.0), (5.0, -1.0))]
    fn apply(
        #[case] t: SimilarityTransform,
        #[case] p: (f64, f64),
        #[case] expected: (f64, f64),
    ) {
        let q = t.apply(&Point::<WorldFrame>::from(p));
        assert_relative_eq!(q.x(), expected.0);
        assert_relative_eq!(q.y(), expected.1);
    }

    #[test]
    fn correct_rotates_and_translates() {
        let t = SimilarityTransform::from_parts(1.0, 0.0, 1.0, 5.0, 5.0);
        let pose = t.correct(&Pose::origin());

        assert_relative_eq!(pose.x, 5.0);
        assert_relative_eq!(pose.y, 5.0);
        assert_relative_eq!(pose.heading.get::<radian>(), FRAC_PI_2);
    }

    #[test]
    fn correct_moves_off_origin_pose() {
        let t = SimilarityTransform::from_angle(1.0, Angle::new::<radian>(PI), Vector2::new(10.0, 0.0));
        let pose = t.correct(&Pose::from((1.0, 2.0, 0.25)));

        assert_relative_eq!(pose.x, 9.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y, -2.0, epsilon = 1e-12);
        assert_relative_eq!(pose.heading.get::<radian>(), 0.25 + PI);
    }

    #[test]
    fn squared_error_of_identity() {
        let left = vec![Point::<WorldFrame>::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let right = vec![Point::<WorldFrame>::new(3.0, 4.0), Point::new(1.0, 1.0)];
        assert_relative_eq!(SimilarityTransform::identity().squared_error(&left, &right), 25.0);
    }
}
