use landmark_fix::prelude::*;
use uom::si::angle::radian;

pub const RAYS: usize = 660;
pub const BACKGROUND: f64 = 3000.0;
pub const RADIUS: f64 = 50.0;

/// Mean visible depth behind the surface of a cylinder of [`RADIUS`].
pub const RANGE_OFFSET: f64 = 40.0;

/// Cylinder centres as seen from the scanner, well apart in bearing.
pub fn sensor_targets() -> Vec<Point<SensorFrame>> {
    vec![
        Point::new(1000.0, -600.0),
        Point::new(1400.0, 100.0),
        Point::new(900.0, 500.0),
        Point::new(700.0, 900.0),
    ]
}

/// The map that puts [`sensor_targets`] in view from `pose`.
pub fn arena(pose: &Pose) -> ReferenceMap {
    sensor_targets()
        .iter()
        .map(|p| pose.sensor_to_world(p))
        .collect()
}

pub fn config() -> LocalizerConfig {
    LocalizerConfig {
        range_offset: RANGE_OFFSET,
        ..Default::default()
    }
}

/// Cast every ray of `geometry` from `pose` against cylinders of [`RADIUS`].
pub fn simulate_scan(pose: &Pose, geometry: &impl BeamGeometry, map: &ReferenceMap) -> RangeScan {
    let readings = (0..RAYS)
        .map(|ray| {
            let angle = (pose.heading + geometry.angle_of(ray as f64)).get::<radian>();
            let (dx, dy) = (angle.cos(), angle.sin());

            map.landmarks()
                .iter()
                .filter_map(|c| {
                    let (vx, vy) = (c.x() - pose.x, c.y() - pose.y);
                    let along = vx * dx + vy * dy;
                    let off_sq = vx * vx + vy * vy - along * along;
                    (along > 0.0 && off_sq <= RADIUS * RADIUS)
                        .then(|| along - (RADIUS * RADIUS - off_sq).sqrt())
                })
                .fold(BACKGROUND, f64::min)
        })
        .collect();

    RangeScan::new(readings)
}
