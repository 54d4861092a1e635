//! Triangle primitive.
//!
//! Uses the Möller–Trumbore algorithm for ray-triangle intersection.
//! Original-space vertices are kept next to their transformed copies so the
//! transformation can be changed at any time and re-applied with `update()`.

use apt_core::MeshGeometry;
use apt_math::{TransformMatrix, Vec3};

use crate::{Intersection, Ray, Shape};

/// Texture coordinates used when none are given.
const DEFAULT_TEXTURE_COORDINATES: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0];

/// A triangle with per-vertex normals and texture coordinates.
#[derive(Debug, Clone)]
pub struct Triangle {
    material: usize,
    transformation: TransformMatrix,

    points_orig: [Vec3; 3],
    normals_orig: [Vec3; 3],
    /// `[u0, v0, u1, v1, u2, v2]`
    texture_coordinates: [f64; 6],

    // Derived in update()
    points: [Vec3; 3],
    normals: [Vec3; 3],
    v0v1: Vec3,
    v0v2: Vec3,
    /// Maps the texture-space u axis onto the edges v0v1 and v0v2
    tuv_to_world: [f64; 2],
    tangent_vec: Vec3,
}

impl Triangle {
    /// Create a triangle in original space and apply `transformation` to it.
    ///
    /// Missing normals default to the face normal, missing texture
    /// coordinates to `(0, 1), (0, 0), (1, 0)`.
    pub fn new(
        material: usize,
        transformation: TransformMatrix,
        points: [Vec3; 3],
        normals: Option<[Vec3; 3]>,
        texture_coordinates: Option<[f64; 6]>,
    ) -> Self {
        let normals_orig = normals.unwrap_or_else(|| {
            let face = (points[1] - points[0])
                .cross(points[2] - points[0])
                .normalize();
            [face; 3]
        });
        let texture_coordinates = texture_coordinates.unwrap_or(DEFAULT_TEXTURE_COORDINATES);

        let tuv0v1 = [
            texture_coordinates[2] - texture_coordinates[0],
            texture_coordinates[3] - texture_coordinates[1],
        ];
        let tuv0v2 = [
            texture_coordinates[4] - texture_coordinates[0],
            texture_coordinates[5] - texture_coordinates[1],
        ];
        let det = tuv0v1[0] * tuv0v2[1] - tuv0v1[1] * tuv0v2[0];
        let tuv_to_world = if det.abs() >= f64::MIN_POSITIVE {
            [-tuv0v2[0] / det, tuv0v1[0] / det]
        } else {
            [1.0, 0.0]
        };

        let mut triangle = Self {
            material,
            transformation,
            points_orig: points,
            normals_orig,
            texture_coordinates,
            points,
            normals: normals_orig,
            v0v1: Vec3::ZERO,
            v0v2: Vec3::ZERO,
            tuv_to_world,
            tangent_vec: Vec3::ZERO,
        };
        triangle.update();
        triangle
    }

    /// Build one triangle per mesh face.
    ///
    /// `material` maps each face's material name to a scene material index.
    pub fn from_mesh<F>(mesh: &MeshGeometry, transformation: &TransformMatrix, material: F) -> Vec<Self>
    where
        F: Fn(&str) -> usize,
    {
        (0..mesh.triangle_count())
            .filter_map(|i| mesh.triangle(i))
            .map(|face| {
                Self::new(
                    material(face.material),
                    *transformation,
                    face.points,
                    face.normals,
                    face.texture_coordinates,
                )
            })
            .collect()
    }

    /// Transformed vertex positions.
    pub fn points(&self) -> &[Vec3; 3] {
        &self.points
    }

    /// Transformed vertex normals.
    pub fn normals(&self) -> &[Vec3; 3] {
        &self.normals
    }

    pub fn texture_coordinates(&self) -> &[f64; 6] {
        &self.texture_coordinates
    }

    fn interpolate_uv(&self, uv: [f64; 2]) -> [f64; 2] {
        let w = 1.0 - uv[0] - uv[1];
        let t = &self.texture_coordinates;
        [
            w * t[0] + uv[0] * t[2] + uv[1] * t[4],
            w * t[1] + uv[0] * t[3] + uv[1] * t[5],
        ]
    }
}

impl Shape for Triangle {
    fn intersection(&self, ray: &Ray) -> Option<Intersection> {
        let pvec = ray.direction.cross(self.v0v2);
        let det = self.v0v1.dot(pvec);

        // Ray parallel to the triangle plane
        if det.abs() < f64::MIN_POSITIVE {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - self.points[0];
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(self.v0v1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.v0v2.dot(qvec) * inv_det;
        if t < 0.0 {
            return None;
        }

        Some(Intersection { t, uv: [u, v] })
    }

    fn normal(&self, _time: f64, uv: [f64; 2]) -> Vec3 {
        let w = 1.0 - uv[0] - uv[1];
        self.normals[0] * w + self.normals[1] * uv[0] + self.normals[2] * uv[1]
    }

    fn normal_uv(&self, time: f64, uv: [f64; 2]) -> (Vec3, [f64; 2]) {
        (self.normal(time, uv), self.interpolate_uv(uv))
    }

    fn normal_uv_tangent(&self, time: f64, uv: [f64; 2]) -> (Vec3, [f64; 2], Vec3) {
        let (normal, tuv) = self.normal_uv(time, uv);
        let tangent = self.tangent_vec.cross(normal).normalize();
        (normal, tuv, tangent)
    }

    fn normal_face(&self, _time: f64) -> Vec3 {
        self.v0v1.cross(self.v0v2).normalize()
    }

    fn mincoord(&self) -> Vec3 {
        self.points[0].min(self.points[1]).min(self.points[2])
    }

    fn maxcoord(&self) -> Vec3 {
        self.points[0].max(self.points[1]).max(self.points[2])
    }

    fn update(&mut self) {
        self.points = self.points_orig.map(|p| self.transformation.mult_vec(p));
        self.normals = self.normals_orig.map(|n| self.transformation.mult_dir(n));
        self.v0v1 = self.points[1] - self.points[0];
        self.v0v2 = self.points[2] - self.points[0];
        self.tangent_vec = self.v0v1 * self.tuv_to_world[0] + self.v0v2 * self.tuv_to_world[1];
    }

    fn material(&self) -> usize {
        self.material
    }

    fn transformation(&self) -> &TransformMatrix {
        &self.transformation
    }

    fn transformation_mut(&mut self) -> &mut TransformMatrix {
        &mut self.transformation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediumList;
    use apt_core::FaceVertex;
    use std::f64::consts::FRAC_PI_4;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction, Vec3::ZERO, Vec3::ONE, MediumList::from_indices(&[0, 0]))
    }

    fn triangle(points: [Vec3; 3]) -> Triangle {
        Triangle::new(0, TransformMatrix::new(), points, None, None)
    }

    fn unit_cube() -> Vec<Triangle> {
        let p = |x: f64, y: f64, z: f64| Vec3::new(x, y, z);
        [
            [p(0., 2., 0.), p(1., 2., 0.), p(0., 2., 1.)],
            [p(1., 2., 0.), p(1., 2., 1.), p(0., 2., 1.)],
            [p(1., 3., 0.), p(0., 3., 0.), p(0., 3., 1.)],
            [p(0., 3., 1.), p(1., 3., 1.), p(1., 3., 0.)],
            [p(1., 2., 0.), p(0., 2., 0.), p(0., 3., 0.)],
            [p(0., 3., 0.), p(1., 3., 0.), p(1., 2., 0.)],
            [p(0., 3., 1.), p(0., 2., 1.), p(1., 2., 1.)],
            [p(1., 2., 1.), p(1., 3., 1.), p(0., 3., 1.)],
            [p(1., 3., 1.), p(1., 2., 1.), p(1., 2., 0.)],
            [p(1., 2., 0.), p(1., 3., 0.), p(1., 3., 1.)],
            [p(0., 2., 0.), p(0., 2., 1.), p(0., 3., 1.)],
            [p(0., 3., 1.), p(0., 3., 0.), p(0., 2., 0.)],
        ]
        .into_iter()
        .map(triangle)
        .collect()
    }

    #[test]
    fn test_axis_aligned_hit() {
        let tri = triangle([
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);
        let hit = tri
            .intersection(&ray(Vec3::new(0.1, 0.0, 0.1), Vec3::Y))
            .expect("ray should hit");

        assert!((hit.t - 2.0).abs() < 1e-12);
        assert!((hit.uv[0] - 0.1).abs() < 1e-12);
        assert!((hit.uv[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_miss_cases() {
        let tri = triangle([
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);

        // Pointing away
        assert!(tri.intersection(&ray(Vec3::new(0.1, 0.0, 0.1), -Vec3::Y)).is_none());
        // Outside the edges
        assert!(tri.intersection(&ray(Vec3::new(0.8, 0.0, 0.8), Vec3::Y)).is_none());
        assert!(tri.intersection(&ray(Vec3::new(-0.1, 0.0, 0.1), Vec3::Y)).is_none());
        // Parallel to the plane
        assert!(tri.intersection(&ray(Vec3::new(0.1, 0.0, 0.1), Vec3::X)).is_none());
    }

    #[test]
    fn test_centroid_hit_along_inverse_normal() {
        for tri in unit_cube() {
            let centroid = (tri.points[0] + tri.points[1] + tri.points[2]) / 3.0;
            let normal = tri.normal_face(1.0);

            let hit = tri
                .intersection(&ray(centroid + normal * 5.0, -normal))
                .expect("centroid should be hit");
            assert!((hit.t - 5.0).abs() < 1e-9);
            assert!(hit.uv[0] >= 0.0 && hit.uv[1] >= 0.0);
            assert!(hit.uv[0] + hit.uv[1] <= 1.0);

            assert!(tri.intersection(&ray(centroid + normal * 5.0, normal)).is_none());
        }
    }

    #[test]
    fn test_degenerate_triangle_never_hit() {
        let tri = triangle([Vec3::ZERO, Vec3::X, Vec3::X * 2.0]);
        assert!(tri.intersection(&ray(Vec3::new(0.5, -1.0, 0.0), Vec3::Y)).is_none());
    }

    #[test]
    fn test_rotate_z_matches_planar_rotation() {
        let (sin, cos) = FRAC_PI_4.sin_cos();

        for (original, mut rotated) in unit_cube().into_iter().zip(unit_cube()) {
            rotated.transformation_mut().rotate_z_axis(FRAC_PI_4);
            rotated.update();

            for (p, q) in original.points.iter().zip(rotated.points.iter()) {
                let expected = Vec3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z);
                assert!((*q - expected).length() < 1e-12, "{q:?} != {expected:?}");
            }
        }
    }

    #[test]
    fn test_stale_until_update() {
        let mut tri = unit_cube().remove(0);
        let before = tri.points;

        tri.transformation_mut().translate(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(tri.points, before);

        tri.update();
        assert_eq!(tri.points[0], before[0] + Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_default_normals_and_interpolation() {
        let tri = triangle([
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);
        let face = tri.normal_face(1.0);
        assert!((face - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-12);

        let (normal, tuv, tangent) = tri.normal_uv_tangent(1.0, [0.25, 0.25]);
        assert!((normal - face).length() < 1e-12);
        // (0, 1) * 0.5 + (0, 0) * 0.25 + (1, 0) * 0.25
        assert!((tuv[0] - 0.25).abs() < 1e-12);
        assert!((tuv[1] - 0.5).abs() < 1e-12);
        assert!((tangent.length() - 1.0).abs() < 1e-12);
        assert!(tangent.dot(normal).abs() < 1e-12);
    }

    #[test]
    fn test_custom_normals_are_interpolated() {
        let normals = [Vec3::X, Vec3::Y, Vec3::Z];
        let tri = Triangle::new(
            2,
            TransformMatrix::new(),
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            Some(normals),
            Some([0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
        );

        assert_eq!(tri.material(), 2);
        assert_eq!(tri.normal(1.0, [0.0, 0.0]), Vec3::X);
        assert_eq!(tri.normal(1.0, [1.0, 0.0]), Vec3::Y);
        assert_eq!(tri.normal(1.0, [0.0, 1.0]), Vec3::Z);
        assert_eq!(tri.normal_uv(1.0, [0.5, 0.25]).1, [0.5, 0.25]);
    }

    #[test]
    fn test_bounds() {
        let tri = triangle([
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 1.0),
        ]);
        assert_eq!(tri.mincoord(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(tri.maxcoord(), Vec3::new(1.0, 2.0, 1.0));

        let bounds = tri.bounds();
        assert!(bounds.y.contains(2.0));
        assert!(bounds.y.size() > 0.0);
    }

    #[test]
    fn test_from_mesh() {
        let mut mesh = MeshGeometry::new();
        mesh.add_node(Vec3::new(0.0, 2.0, 0.0));
        mesh.add_node(Vec3::new(1.0, 2.0, 0.0));
        mesh.add_node(Vec3::new(1.0, 2.0, 1.0));
        mesh.add_node(Vec3::new(0.0, 2.0, 1.0));
        mesh.add_face(&[0, 1, 2, 3].map(FaceVertex::node), "wall")
            .unwrap();
        mesh.finish();

        let mut transform = TransformMatrix::new();
        transform.translate(Vec3::new(0.0, 1.0, 0.0));
        let triangles = Triangle::from_mesh(&mesh, &transform, |name| {
            if name == "wall" { 3 } else { 0 }
        });

        assert_eq!(triangles.len(), 2);
        assert!(triangles.iter().all(|t| t.material() == 3));
        assert_eq!(triangles[0].points()[0], Vec3::new(0.0, 3.0, 0.0));

        let hit = triangles
            .iter()
            .find_map(|t| t.intersection(&ray(Vec3::new(0.7, 0.0, 0.2), Vec3::Y)))
            .expect("quad should be hit");
        assert!((hit.t - 3.0).abs() < 1e-12);
    }
}
