//! Geometric utility functions for angles and distances.
//!
//! Angles are handled in whole degrees: values are truncated towards zero and
//! reduced into `[0, 360)` before comparison, so a sensing cone is an integer
//! degree window.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};

/// Truncates an angle in radians to whole degrees in `[0, 360)`.
fn whole_degrees(radians: f32) -> i32 {
    (radians.to_degrees() as i32).rem_euclid(360)
}

/// Returns whether `angle` lies in the window that runs counter-clockwise
/// from `a` to `b` (all in radians).
///
/// A window whose start is past its end wraps through 0°/360°.
///
/// # Examples
///
/// ```
/// use botevo::simulation::geometric_utils::angle_is_between;
///
/// let half = 22.5_f32.to_radians();
/// assert!(angle_is_between(0.0, -half, half));
/// assert!(!angle_is_between(std::f32::consts::PI, -half, half));
/// ```
pub fn angle_is_between(angle: f32, a: f32, b: f32) -> bool {
    let angle = whole_degrees(angle);
    let a = whole_degrees(a);
    let b = whole_degrees(b);
    if a < b {
        a <= angle && angle <= b
    } else {
        a <= angle || angle <= b
    }
}

/// Bearing from `(x1, y1)` towards `(x2, y2)` in radians, in `[0, 2π)`.
///
/// The arena uses screen coordinates (y grows downwards), so the bearing is
/// measured with y flipped to keep counter-clockwise angles positive. The
/// result is truncated to a whole degree.
pub fn find_angle(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let degrees = ((y1 - y2).atan2(x2 - x1).to_degrees() as i32).rem_euclid(360);
    (degrees as f32).to_radians()
}

/// Euclidean distance between two points.
pub fn distance_between(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    Euclidean.distance(Point::new(x1, y1), Point::new(x2, y2))
}

/// Normalises an angle in radians into `[0, 2π)`.
pub fn normalize_angle(theta: f32) -> f32 {
    let wrapped = theta.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_window_around_zero() {
        let half = 22.5_f32.to_radians();
        assert!(angle_is_between(0.0, -half, half));
        assert!(!angle_is_between(PI, -half, half));
    }

    #[test]
    fn test_window_crossing_full_turn() {
        let a = 350_f32.to_radians();
        let b = 10_f32.to_radians();
        assert!(angle_is_between(355_f32.to_radians(), a, b));
        assert!(angle_is_between(5_f32.to_radians(), a, b));
        assert!(!angle_is_between(PI, a, b));
    }

    #[test]
    fn test_plain_window() {
        let a = 30_f32.to_radians();
        let b = 60_f32.to_radians();
        assert!(angle_is_between(45_f32.to_radians(), a, b));
        assert!(!angle_is_between(90_f32.to_radians(), a, b));
        assert!(!angle_is_between(20_f32.to_radians(), a, b));
    }

    #[test]
    fn test_find_angle_uses_screen_coordinates() {
        // straight right
        assert!(find_angle(0.0, 0.0, 10.0, 0.0).abs() < 1e-6);
        // up on screen is a smaller y
        let one_degree = 1_f32.to_radians() + 1e-4;
        assert!((find_angle(0.0, 0.0, 0.0, -10.0) - FRAC_PI_2).abs() <= one_degree);
        // down on screen is 270 degrees
        assert!((find_angle(0.0, 0.0, 0.0, 10.0) - 270_f32.to_radians()).abs() <= one_degree);
        assert!((find_angle(0.0, 0.0, -10.0, 0.0) - PI).abs() <= one_degree);
    }

    #[test]
    fn test_distance_between() {
        assert!((distance_between(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-6);
        assert!(distance_between(1.0, 1.0, 1.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(2.0 * PI + 1.0) - 1.0).abs() < 1e-5);
        let n = normalize_angle(-1e-9);
        assert!((0.0..std::f32::consts::TAU).contains(&n));
    }
}
