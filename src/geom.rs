//! Sphere geometry: unit-vector math, near-uniform surface sampling and
//! great-circle interpolation.

use std::f32::consts::PI;
use std::ops::{Add, Sub};

/// Threshold below which two directions are treated as coincident/antipodal.
const DEGENERATE_SIN: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn scale(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    /// Unit-length copy. Degenerate (near-zero) vectors come back unchanged
    /// rather than producing NaN components.
    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len < DEGENERATE_SIN {
            self
        } else {
            self.scale(1.0 / len)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Euclidean distance between two surface directions (chord length; 2.0 for
/// antipodal unit vectors).
#[inline]
pub fn chord(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}

/// Rotate about the vertical (y) axis. The whole globe spins this way, so
/// relative network topology is preserved.
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(v.x * cos_a + v.z * sin_a, v.y, -v.x * sin_a + v.z * cos_a)
}

/// Deterministic near-uniform point distribution on the unit sphere.
///
/// Golden-spiral layout: polar angle = arccos(-1 + 2i/n), azimuth follows
/// sqrt(n*pi) times the polar angle. Even coverage without a random source.
pub fn fibonacci_sphere(n: usize) -> Vec<Vec3> {
    let nf = n as f32;
    let azimuth_rate = (nf * PI).sqrt();
    (0..n)
        .map(|i| {
            let polar = (-1.0 + 2.0 * i as f32 / nf).acos();
            let azimuth = azimuth_rate * polar;
            Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            )
        })
        .collect()
}

/// Great-circle interpolation between two unit directions.
///
/// Returns the unit direction tracing the shortest surface arc from `p1`
/// (t=0) to `p2` (t=1). Coincident or antipodal endpoints degrade to a
/// normalized linear blend instead of dividing by a vanishing sine.
pub fn slerp(p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let angle = p1.dot(p2).clamp(-1.0, 1.0).acos();
    let sin_angle = angle.sin();
    if sin_angle.abs() < DEGENERATE_SIN {
        let blended = p1.scale(1.0 - t) + p2.scale(t);
        if blended.length() < DEGENERATE_SIN {
            // exactly antipodal at the midpoint: no unique arc, pick p1's side
            return p1;
        }
        return blended.normalized();
    }
    let wa = (((1.0 - t) * angle).sin()) / sin_angle;
    let wb = ((t * angle).sin()) / sin_angle;
    (p1.scale(wa) + p2.scale(wb)).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    fn assert_unit(v: Vec3) {
        assert!(
            (v.length() - 1.0).abs() < TOL,
            "expected unit length, got {}",
            v.length()
        );
    }

    #[test]
    fn fibonacci_points_are_unit_length() {
        for v in fibonacci_sphere(500) {
            assert_unit(v);
        }
    }

    #[test]
    fn fibonacci_returns_requested_count() {
        assert_eq!(fibonacci_sphere(0).len(), 0);
        assert_eq!(fibonacci_sphere(1).len(), 1);
        assert_eq!(fibonacci_sphere(1200).len(), 1200);
    }

    #[test]
    fn fibonacci_spreads_points_apart() {
        let points = fibonacci_sphere(200);
        for (i, a) in points.iter().enumerate() {
            for b in points.iter().skip(i + 1) {
                assert!(chord(*a, *b) > 1e-3, "two samples collapsed together");
            }
        }
    }

    #[test]
    fn slerp_hits_endpoints() {
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 0.0, 1.0);
        assert!(chord(slerp(p1, p2, 0.0), p1) < TOL);
        assert!(chord(slerp(p1, p2, 1.0), p2) < TOL);
    }

    #[test]
    fn slerp_output_is_unit_norm() {
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 1.0, 0.0).normalized();
        for i in 0..=16 {
            let t = i as f32 / 16.0;
            assert_unit(slerp(p1, p2, t));
        }
    }

    #[test]
    fn slerp_midpoint_stays_on_arc() {
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 0.0, 1.0);
        let mid = slerp(p1, p2, 0.5);
        // quarter great circle: midpoint is 45 degrees from both ends
        assert!((mid.dot(p1) - (PI / 4.0).cos()).abs() < TOL);
        assert!((mid.dot(p2) - (PI / 4.0).cos()).abs() < TOL);
    }

    #[test]
    fn slerp_degenerate_inputs_never_nan() {
        let p = Vec3::new(0.0, 1.0, 0.0);
        let coincident = slerp(p, p, 0.5);
        assert!(coincident.x.is_finite() && coincident.y.is_finite() && coincident.z.is_finite());
        assert!(chord(coincident, p) < TOL);

        let antipodal = slerp(p, p.scale(-1.0), 0.5);
        assert!(antipodal.x.is_finite() && antipodal.y.is_finite() && antipodal.z.is_finite());
    }

    #[test]
    fn rotate_y_preserves_length_and_height() {
        let v = Vec3::new(0.6, 0.5, -0.3);
        let r = rotate_y(v, 1.234);
        assert!((r.length() - v.length()).abs() < TOL);
        assert!((r.y - v.y).abs() < TOL);
    }

    #[test]
    fn rotate_y_full_turn_is_identity() {
        let v = Vec3::new(0.3, -0.8, 0.52);
        let r = rotate_y(v, std::f32::consts::TAU);
        assert!(chord(v, r) < TOL);
    }
}
