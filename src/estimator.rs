//! Closed-form alignment of two point sets.
//!
//! [`SimilarityEstimator`] follows Horn's method: after removing both
//! centroids, the rotation that best maps the left set onto the right set
//! follows directly from the summed dot and cross products of the pairs.
//!
//! ```text
//! cs = sum(r . l)        ss = sum(l x r)
//! cos = cs / |(cs, ss)|  sin = ss / |(cs, ss)|
//! scale = sqrt(sum |r|^2 / sum |l|^2)   (or 1 when fixed)
//! t = rc - scale * R * lc
//! ```

use crate::{
    frame::{Point, centroid},
    transform::SimilarityTransform,
};
use thiserror::Error;

/// Why no transform could be estimated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("need at least 2 point pairs but got: {found}")]
    InsufficientCorrespondences { found: usize },
    #[error("point lists differ in length: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("rotation is undetermined: cosine and sine sums are both zero")]
    DegenerateRotation,
    #[error("scale is undetermined: left points have no spread")]
    DegenerateScale,
}

/// Aligns a left point set onto a right point set.
pub trait Estimator<Frame> {
    type Output;
    fn estimate(&self, left: &[Point<Frame>], right: &[Point<Frame>]) -> Self::Output;
}

/// Least squares similarity (or rigid, with a fixed scale) transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimilarityEstimator {
    fix_scale: bool,
}

impl SimilarityEstimator {
    /// With `fix_scale` the scale is pinned to 1 and only a rotation and
    /// translation are estimated.
    pub fn new(fix_scale: bool) -> Self {
        Self { fix_scale }
    }

    pub fn rigid() -> Self {
        Self::new(true)
    }

    pub fn fix_scale(&self) -> bool {
        self.fix_scale
    }
}

impl<Frame> Estimator<Frame> for SimilarityEstimator {
    type Output = Result<SimilarityTransform, EstimateError>;

    fn estimate(&self, left: &[Point<Frame>], right: &[Point<Frame>]) -> Self::Output {
        estimate_transform(left, right, self.fix_scale)
    }
}

/// Transform that minimizes the summed squared distance between each
/// transformed `left[k]` and `right[k]`.
pub fn estimate_transform<Frame>(
    left: &[Point<Frame>],
    right: &[Point<Frame>],
    fix_scale: bool,
) -> Result<SimilarityTransform, EstimateError> {
    if left.len() < 2 || right.len() < 2 {
        return Err(EstimateError::InsufficientCorrespondences {
            found: left.len().min(right.len()),
        });
    }
    if left.len() != right.len() {
        return Err(EstimateError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let (Some(lc), Some(rc)) = (centroid(left), centroid(right)) else {
        return Err(EstimateError::InsufficientCorrespondences { found: 0 });
    };

    let (mut cs, mut ss, mut rr, mut ll) = (0.0, 0.0, 0.0, 0.0);
    for (l, r) in left.iter().zip(right) {
        let li = l.as_vec2() - lc;
        let ri = r.as_vec2() - rc;
        cs += ri.x * li.x + ri.y * li.y;
        ss += -ri.x * li.y + ri.y * li.x;
        rr += ri.norm_squared();
        ll += li.norm_squared();
    }

    let scale = match fix_scale {
        true => 1.0,
        false if ll == 0.0 => return Err(EstimateError::DegenerateScale),
        false => (rr / ll).sqrt(),
    };

    if cs == 0.0 && ss == 0.0 {
        return Err(EstimateError::DegenerateRotation);
    }

    let norm = cs.hypot(ss);
    let (c, s) = (cs / norm, ss / norm);
    let tx = rc.x - scale * (c * lc.x - s * lc.y);
    let ty = rc.y - scale * (s * lc.x + c * lc.y);

    Ok(SimilarityTransform::from_parts(scale, c, s, tx, ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::WorldFrame;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;
    use quickcheck::{TestResult, quickcheck};
    use rstest::rstest;
    use uom::si::{angle::radian, f64::Angle};

    fn points(coords: &[(f64, f64)]) -> Vec<Point<WorldFrame>> {
        coords.iter().map(|c| Point::from(*c)).collect()
    }

    #[test]
    fn aligned_points_give_identity() {
        let left = points(&[(0.0, 0.0), (1.0, 0.0)]);
        let t = estimate_transform(&left, &left, true).unwrap();
        assert_eq!(t, SimilarityTransform::from_parts(1.0, 1.0, 0.0, 0.0, 0.0));
    }

    #[rstest]
    #[case(0.3, (100.0, -20.0), 1.0, true)]
    #[case(-2.5, (0.0, 0.0), 1.0, true)]
    #[case(1.0, (-1850.0, 1897.0), 1.0, false)]
    #[case(0.1, (5.0, 5.0), 1.5, false)]
    fn recovers_exact_transform(
        #[case] angle: f64,
        #[case] translation: (f64, f64),
        #[case] scale: f64,
        #[case] fix_scale: bool,
    ) {
        let truth = SimilarityTransform::from_angle(
            scale,
            Angle::new::<radian>(angle),
            Vector2::new(translation.0, translation.1),
        );
        let left = points(&[(0.0, 0.0), (400.0, 100.0), (-250.0, 800.0), (1200.0, -300.0)]);
        let right: Vec<_> = left.iter().map(|p| truth.apply(p)).collect();

        let t = SimilarityEstimator::new(fix_scale).estimate(left.as_slice(), right.as_slice()).unwrap();

        assert_relative_eq!(t.scale(), scale, epsilon = 1e-9);
        assert_relative_eq!(t.cos(), truth.cos(), epsilon = 1e-9);
        assert_relative_eq!(t.sin(), truth.sin(), epsilon = 1e-9);
        assert_relative_eq!(t.translation(), truth.translation(), epsilon = 1e-6);
    }

    #[test]
    fn fixed_scale_ignores_spread() {
        let left = points(&[(0.0, 0.0), (10.0, 0.0)]);
        let right = points(&[(0.0, 0.0), (20.0, 0.0)]);

        let rigid = estimate_transform(&left, &right, true).unwrap();
        assert_relative_eq!(rigid.scale(), 1.0);
        assert_relative_eq!(rigid.translation(), Vector2::new(5.0, 0.0));

        let similar = estimate_transform(&left, &right, false).unwrap();
        assert_relative_eq!(similar.scale(), 2.0);
        assert_relative_eq!(similar.translation(), Vector2::new(0.0, 0.0));
    }

    #[rstest]
    #[case(&[], &[], EstimateError::InsufficientCorrespondences { found: 0 })]
    #[case(&[(1.0, 1.0)], &[(2.0, 2.0)], EstimateError::InsufficientCorrespondences { found: 1 })]
    #[case(
        &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
        &[(0.0, 0.0), (1.0, 0.0)],
        EstimateError::LengthMismatch { left: 3, right: 2 }
    )]
    #[case(&[(3.0, 3.0), (3.0, 3.0)], &[(0.0, 0.0), (1.0, 0.0)], EstimateError::DegenerateRotation)]
    #[case(&[(0.0, 0.0), (1.0, 0.0)], &[(7.0, 7.0), (7.0, 7.0)], EstimateError::DegenerateRotation)]
    fn rigid_failures(
        #[case] left: &[(f64, f64)],
        #[case] right: &[(f64, f64)],
        #[case] expected: EstimateError,
    ) {
        assert_eq!(
            estimate_transform(&points(left), &points(right), true),
            Err(expected)
        );
    }

    #[test]
    fn collapsed_left_set_has_no_scale() {
        let left = points(&[(3.0, 3.0), (3.0, 3.0)]);
        let right = points(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            estimate_transform(&left, &right, false),
            Err(EstimateError::DegenerateScale)
        );
    }

    quickcheck! {
        fn never_worse_than_identity(pairs: Vec<((i16, i16), (i16, i16))>) -> TestResult {
            let left: Vec<Point<WorldFrame>> = pairs
                .iter()
                .map(|((x, y), _)| Point::new(*x as f64, *y as f64))
                .collect();
            let right: Vec<Point<WorldFrame>> = pairs
                .iter()
                .map(|(_, (x, y))| Point::new(*x as f64, *y as f64))
                .collect();

            let Ok(t) = estimate_transform(&left, &right, true) else {
                return TestResult::discard();
            };

            let estimated = t.squared_error(&left, &right);
            let identity = SimilarityTransform::identity().squared_error(&left, &right);
            TestResult::from_bool(estimated <= identity * (1.0 + 1e-9) + 1e-6)
        }
    }
}
