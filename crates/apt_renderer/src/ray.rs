//! Ray type for path tracing.
//!
//! A ray is one light-transport sample. Besides its geometry it carries the
//! colour gathered so far, the fraction of light it can still carry (the
//! mask) and the stack of media it is travelling through. Materials and
//! media mutate it in place at every bounce.

use apt_math::Vec3;

use crate::MediumList;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Vec3,
    /// Direction vector, unit length
    pub direction: Vec3,
    /// Light collected along the path so far
    pub colour: Vec3,
    /// Fraction of light not yet absorbed, starts at (1, 1, 1)
    pub mask: Vec3,
    /// Distance to the last intersection
    pub dist: f64,
    /// Time value in [0, 1] for motion blur
    pub time: f64,
    /// Media the ray is in, highest priority first
    pub medium_list: MediumList,
}

impl Ray {
    /// Create a new ray at time 1.
    #[inline]
    pub fn new(
        origin: Vec3,
        direction: Vec3,
        colour: Vec3,
        mask: Vec3,
        medium_list: MediumList,
    ) -> Self {
        Self {
            origin,
            direction,
            colour,
            mask,
            dist: 0.0,
            time: 1.0,
            medium_list,
        }
    }

    /// Set the ray's time value.
    #[inline]
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point at the last intersection distance.
    #[inline]
    pub fn hit_point(&self) -> Vec3 {
        self.at(self.dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::ZERO,
            Vec3::ONE,
            MediumList::new(),
        );

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
        assert_eq!(ray.time, 1.0);
        assert_eq!(ray.with_time(0.25).time, 0.25);
    }

    #[test]
    fn test_hit_point() {
        let mut ray = Ray::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::Y,
            Vec3::ZERO,
            Vec3::ONE,
            MediumList::new(),
        );
        ray.dist = 2.0;
        assert_eq!(ray.hit_point(), Vec3::new(1.0, 4.0, 3.0));
    }
}
