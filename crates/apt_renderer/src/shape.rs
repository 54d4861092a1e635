//! Shape trait for ray-object intersection.

use apt_math::{Aabb, TransformMatrix, Vec3};

use crate::Ray;

/// A successful ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance along the ray
    pub t: f64,
    /// Surface coordinates of the hit, interpreted by the shape
    pub uv: [f64; 2],
}

/// Trait for geometry that can be placed in a [`crate::Scene`].
///
/// Shapes cache world-space data derived from their transformation. After
/// mutating the transformation through [`Shape::transformation_mut`],
/// [`Shape::update`] must be called before the shape is intersected again.
pub trait Shape: Send + Sync {
    /// Intersect a ray with the shape. Rays starting behind the shape or
    /// parallel to it miss.
    fn intersection(&self, ray: &Ray) -> Option<Intersection>;

    /// Shading normal at `uv`.
    fn normal(&self, time: f64, uv: [f64; 2]) -> Vec3;

    /// Shading normal and texture coordinates at `uv`.
    fn normal_uv(&self, time: f64, uv: [f64; 2]) -> (Vec3, [f64; 2]);

    /// Shading normal, texture coordinates and tangent at `uv`.
    fn normal_uv_tangent(&self, time: f64, uv: [f64; 2]) -> (Vec3, [f64; 2], Vec3);

    /// Geometric normal.
    fn normal_face(&self, time: f64) -> Vec3;

    fn mincoord(&self) -> Vec3;

    fn maxcoord(&self) -> Vec3;

    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.mincoord(), self.maxcoord())
    }

    /// Recompute cached world-space data from the transformation.
    fn update(&mut self);

    /// Index of the shape's material in the scene.
    fn material(&self) -> usize;

    fn transformation(&self) -> &TransformMatrix;

    fn transformation_mut(&mut self) -> &mut TransformMatrix;
}
