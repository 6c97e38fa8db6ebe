//! Plain text frame log.
//!
//! Each frame becomes three lines:
//!
//! ```text
//! F <x> <y> <heading>
//! D C <x> <y> <x> <y> ...
//! W C <x> <y> <x> <y> ...
//! ```
//!
//! `F` is the output pose with the heading in radians. `D C` lists the
//! detected cylinders in the sensor frame and `W C` the paired cylinders
//! after correction, in the world frame.

use crate::{frame::Point, localizer::FrameReport};
use std::io::{self, Write};
use uom::si::angle::radian;

pub fn write_report<W: Write>(out: &mut W, report: &FrameReport) -> io::Result<()> {
    let pose = report.pose;
    writeln!(
        out,
        "F {:.6} {:.6} {:.6}",
        pose.x,
        pose.y,
        pose.heading.get::<radian>()
    )?;
    write_points(out, "D C", &report.sensor_landmarks)?;
    write_points(out, "W C", &report.world_landmarks)
}

pub fn write_points<W: Write, Frame>(out: &mut W, tag: &str, points: &[Point<Frame>]) -> io::Result<()> {
    write!(out, "{tag}")?;
    for p in points {
        write!(out, " {:.1} {:.1}", p.x(), p.y())?;
    }
    writeln!(out)
}
