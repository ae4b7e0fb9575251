//! World-space rays

use crate::foundation::math::Vec3;

/// A ray for placement picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalising `direction`
    ///
    /// Callers must pass a non-zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalised() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.point_at(2.5), Vec3::new(0.0, 0.0, -2.5));
    }
}
