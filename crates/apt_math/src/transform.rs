// Transformation matrices for shapes and cameras
//
// Wraps a glam DMat4 together with its transposed inverse. The forward matrix
// moves points, the transposed inverse rotates directions and normals so that
// they stay perpendicular to surfaces under non-uniform scale.

use crate::{Mat4, Vec3};

/// A 4x4 homogeneous transformation plus its cached transpose-inverse.
///
/// Every mutating operation composes a new transform *after* the existing
/// one and rebuilds the transpose-inverse before returning, so the two
/// matrices are always in sync. Operations return `&mut Self` to be chained:
///
/// ```
/// use apt_math::{TransformMatrix, Vec3};
///
/// let mut transform = TransformMatrix::new();
/// transform
///     .scale_uniform(2.0)
///     .rotate_z_axis(std::f64::consts::FRAC_PI_2)
///     .translate(Vec3::new(0.0, 0.0, 1.0));
///
/// let p = transform.mult_vec(Vec3::X);
/// assert!((p - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-12);
/// ```
///
/// Shapes and cameras hold one of these and read it during their own
/// `update()`; changing the transform has no effect on them until then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    matrix: Mat4,
    matrix_inverse: Mat4,
}

impl TransformMatrix {
    /// The identity transform, which leaves objects unchanged.
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            matrix_inverse: Mat4::IDENTITY,
        }
    }

    /// Build a transform from the 16 coefficients of its matrix, given row by row.
    ///
    /// The translation is in the last column: `values[3]`, `values[7]`, `values[11]`.
    pub fn from_rows(values: [f64; 16]) -> Self {
        Self::from_matrix(Mat4::from_cols_array(&values).transpose())
    }

    /// Build a transform from a glam matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let mut transform = Self {
            matrix,
            matrix_inverse: Mat4::IDENTITY,
        };
        transform.build_inverse();
        transform
    }

    /// The forward matrix, used to transform points.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// The transposed inverse, used to transform directions.
    pub fn matrix_inverse(&self) -> Mat4 {
        self.matrix_inverse
    }

    /// Position of the transform's own origin in world space.
    pub fn center(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Rotates around the world x axis. An object at (0, 1, 0) rotated by pi ends at (0, -1, 0).
    pub fn rotate_x_axis(&mut self, angle: f64) -> &mut Self {
        self.apply(Mat4::from_rotation_x(angle))
    }

    /// Rotates around the world y axis. An object at (1, 0, 0) rotated by pi ends at (-1, 0, 0).
    pub fn rotate_y_axis(&mut self, angle: f64) -> &mut Self {
        self.apply(Mat4::from_rotation_y(angle))
    }

    /// Rotates around the world z axis. An object at (1, 0, 0) rotated by pi ends at (-1, 0, 0).
    pub fn rotate_z_axis(&mut self, angle: f64) -> &mut Self {
        self.apply(Mat4::from_rotation_z(angle))
    }

    /// Rotates in place around the x direction; the centre does not move.
    pub fn rotate_x(&mut self, angle: f64) -> &mut Self {
        self.apply_centered(Mat4::from_rotation_x(angle))
    }

    /// Rotates in place around the y direction; the centre does not move.
    pub fn rotate_y(&mut self, angle: f64) -> &mut Self {
        self.apply_centered(Mat4::from_rotation_y(angle))
    }

    /// Rotates in place around the z direction; the centre does not move.
    pub fn rotate_z(&mut self, angle: f64) -> &mut Self {
        self.apply_centered(Mat4::from_rotation_z(angle))
    }

    /// Rotates around an arbitrary axis passing through the world origin.
    ///
    /// The axis does not need to be normalized.
    pub fn rotate_axis(&mut self, axis: Vec3, angle: f64) -> &mut Self {
        self.apply(Mat4::from_axis_angle(axis.normalize(), angle))
    }

    /// Rotates around an arbitrary axis passing through the transform's centre.
    pub fn rotate(&mut self, axis: Vec3, angle: f64) -> &mut Self {
        self.apply_centered(Mat4::from_axis_angle(axis.normalize(), angle))
    }

    /// Moves the transform by `offset`.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.apply(Mat4::from_translation(offset))
    }

    /// Scales each axis from the world origin. An object at (1, 0, 1) scaled
    /// by (2, 2, 1) ends at (2, 0, 1).
    pub fn scale_axis(&mut self, factors: Vec3) -> &mut Self {
        self.apply(Mat4::from_scale(factors))
    }

    /// Scales uniformly from the world origin.
    pub fn scale_axis_uniform(&mut self, factor: f64) -> &mut Self {
        self.scale_axis(Vec3::splat(factor))
    }

    /// Scales each axis in place; the centre does not move.
    pub fn scale(&mut self, factors: Vec3) -> &mut Self {
        self.apply_centered(Mat4::from_scale(factors))
    }

    /// Scales uniformly in place.
    pub fn scale_uniform(&mut self, factor: f64) -> &mut Self {
        self.scale(Vec3::splat(factor))
    }

    /// Transposes the matrix.
    pub fn transpose(&mut self) -> &mut Self {
        self.matrix = self.matrix.transpose();
        self.build_inverse();
        self
    }

    /// Inverts the matrix.
    ///
    /// The determinant is not checked: a singular matrix produces non-finite
    /// coefficients. Use [`determinant`](Self::determinant) first when the
    /// transform may be degenerate.
    pub fn invert(&mut self) -> &mut Self {
        self.matrix = self.matrix.inverse();
        self.build_inverse();
        self
    }

    /// Negates every coefficient.
    pub fn neg(&mut self) -> &mut Self {
        self.matrix = self.matrix * -1.0;
        self.build_inverse();
        self
    }

    /// Determinant of the forward matrix.
    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    /// Transforms a point, translation included, with the homogeneous divide.
    pub fn mult_vec(&self, point: Vec3) -> Vec3 {
        self.matrix.project_point3(point)
    }

    /// Transforms a direction with the transposed inverse and renormalizes it.
    ///
    /// Translation does not apply. Use this, not [`mult_vec`](Self::mult_vec),
    /// for normals and ray directions.
    pub fn mult_dir(&self, direction: Vec3) -> Vec3 {
        self.matrix_inverse.transform_vector3(direction).normalize()
    }

    /// Largest scale factor of the three axes.
    pub fn get_scale(&self) -> f64 {
        let x = self.matrix.x_axis.truncate().length();
        let y = self.matrix.y_axis.truncate().length();
        let z = self.matrix.z_axis.truncate().length();
        x.max(y).max(z)
    }

    fn apply(&mut self, other: Mat4) -> &mut Self {
        self.matrix = other * self.matrix;
        self.build_inverse();
        self
    }

    fn apply_centered(&mut self, other: Mat4) -> &mut Self {
        let center = self.center();
        self.apply(Mat4::from_translation(center) * other * Mat4::from_translation(-center))
    }

    fn build_inverse(&mut self) {
        self.matrix_inverse = self.matrix.inverse().transpose();
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; 16]> for TransformMatrix {
    fn from(values: [f64; 16]) -> Self {
        Self::from_rows(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "{a:?} != {b:?}");
    }

    fn assert_mat_close(a: Mat4, b: Mat4) {
        let a = a.to_cols_array();
        let b = b.to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < EPS, "{a:?} != {b:?}");
        }
    }

    fn general_transform() -> TransformMatrix {
        let mut transform = TransformMatrix::new();
        transform
            .scale_axis(Vec3::new(2.0, 0.5, 3.0))
            .rotate_axis(Vec3::new(1.0, 1.0, 0.0), 0.7)
            .translate(Vec3::new(1.0, -2.0, 4.0))
            .rotate_y(1.3);
        transform
    }

    #[test]
    fn test_identity_leaves_points() {
        let transform = TransformMatrix::new();
        let p = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(transform.mult_vec(p), p);
        assert_eq!(transform.matrix_inverse(), Mat4::IDENTITY);
    }

    #[test]
    fn test_from_rows_translation_column() {
        let transform = TransformMatrix::from_rows([
            1.0, 0.0, 0.0, 10.0, //
            0.0, 1.0, 0.0, 20.0, //
            0.0, 0.0, 1.0, 30.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);

        assert_vec_close(transform.mult_vec(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(11.0, 22.0, 33.0));
        assert_vec_close(transform.center(), Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_mult_vec_homogeneous_divide() {
        let transform = TransformMatrix::from_rows([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 2.0,
        ]);

        assert_vec_close(transform.mult_vec(Vec3::new(2.0, 4.0, 6.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotate_x_axis_half_turn() {
        let mut transform = TransformMatrix::new();
        transform.rotate_x_axis(PI);

        assert_vec_close(transform.mult_vec(Vec3::Y), -Vec3::Y);
    }

    #[test]
    fn test_rotation_preserves_distance_to_origin() {
        let points = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 0.5, 2.0),
            Vec3::new(0.0, 0.0, -7.0),
        ];
        let axes = [Vec3::X, Vec3::new(1.0, 1.0, 1.0), Vec3::new(-0.3, 2.0, 0.1)];

        for axis in axes {
            for angle in [0.1, FRAC_PI_2, 2.5, -1.0] {
                let mut transform = TransformMatrix::new();
                transform.rotate_axis(axis, angle);
                for p in points {
                    let rotated = transform.mult_vec(p);
                    assert!((rotated.length() - p.length()).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn test_rotate_in_place_keeps_center() {
        let mut transform = TransformMatrix::new();
        transform.translate(Vec3::new(3.0, 0.0, 0.0)).rotate_z(FRAC_PI_2);

        assert_vec_close(transform.center(), Vec3::new(3.0, 0.0, 0.0));
        assert_vec_close(transform.mult_vec(Vec3::X), Vec3::new(3.0, 1.0, 0.0));

        let mut about_origin = TransformMatrix::new();
        about_origin.translate(Vec3::new(3.0, 0.0, 0.0)).rotate_z_axis(FRAC_PI_2);
        assert_vec_close(about_origin.center(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_scale_axis_moves_points_scale_does_not_move_center() {
        let mut from_origin = TransformMatrix::new();
        from_origin.scale_axis(Vec3::new(2.0, 2.0, 1.0));
        assert_vec_close(from_origin.mult_vec(Vec3::new(1.0, 0.0, 1.0)), Vec3::new(2.0, 0.0, 1.0));

        let mut in_place = TransformMatrix::new();
        in_place.translate(Vec3::new(5.0, 5.0, 5.0)).scale_uniform(3.0);
        assert_vec_close(in_place.center(), Vec3::splat(5.0));
        assert_vec_close(in_place.mult_vec(Vec3::X), Vec3::new(8.0, 5.0, 5.0));
        assert!((in_place.get_scale() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_world_axis_rotations() {
        let mut about_y = TransformMatrix::new();
        about_y.rotate_y_axis(PI);
        assert_vec_close(about_y.mult_vec(Vec3::X), -Vec3::X);

        let mut about_z = TransformMatrix::new();
        about_z.rotate_z_axis(FRAC_PI_2);
        assert_vec_close(about_z.mult_vec(Vec3::X), Vec3::Y);
    }

    #[test]
    fn test_in_place_rotations() {
        let mut around_x = TransformMatrix::new();
        around_x.translate(Vec3::new(0.0, 0.0, 2.0)).rotate_x(FRAC_PI_2);
        assert_vec_close(around_x.center(), Vec3::new(0.0, 0.0, 2.0));
        assert_vec_close(around_x.mult_vec(Vec3::Y), Vec3::new(0.0, 0.0, 3.0));

        let mut around_y = TransformMatrix::new();
        around_y.translate(Vec3::X).rotate_y(FRAC_PI_2);
        assert_vec_close(around_y.center(), Vec3::X);
        assert_vec_close(around_y.mult_vec(Vec3::Z), Vec3::new(2.0, 0.0, 0.0));

        // Unnormalized axis through the centre
        let mut around_axis = TransformMatrix::new();
        around_axis
            .translate(Vec3::new(3.0, 0.0, 0.0))
            .rotate(Vec3::new(0.0, 0.0, 5.0), FRAC_PI_2);
        assert_vec_close(around_axis.center(), Vec3::new(3.0, 0.0, 0.0));
        assert_vec_close(around_axis.mult_vec(Vec3::X), Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_non_uniform_scale_in_place() {
        let mut transform = TransformMatrix::new();
        transform
            .translate(Vec3::ONE)
            .scale(Vec3::new(2.0, 3.0, 4.0));

        assert_vec_close(transform.center(), Vec3::ONE);
        assert_vec_close(transform.mult_vec(Vec3::ONE), Vec3::new(3.0, 4.0, 5.0));
        assert!((transform.get_scale() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_mult_dir_ignores_translation() {
        let mut transform = TransformMatrix::new();
        transform.translate(Vec3::new(10.0, 20.0, 30.0));

        assert_vec_close(transform.mult_dir(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_mult_dir_unit_length() {
        let transform = general_transform();
        for dir in [Vec3::X, Vec3::new(3.0, -1.0, 2.0), Vec3::new(0.0, 0.001, 0.0)] {
            assert!((transform.mult_dir(dir).length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_mult_dir_keeps_normals_perpendicular_under_non_uniform_scale() {
        let mut transform = TransformMatrix::new();
        transform.scale_axis(Vec3::new(4.0, 1.0, 1.0));

        // Surface tangent along (1, 1, 0) with normal (1, -1, 0).
        let tangent = transform.mult_vec(Vec3::new(1.0, 1.0, 0.0));
        let normal = transform.mult_dir(Vec3::new(1.0, -1.0, 0.0));
        assert!(tangent.dot(normal).abs() < EPS);
    }

    #[test]
    fn test_double_invert_roundtrip() {
        let transform = general_transform();
        let mut inverted = transform;
        inverted.invert().invert();

        assert_mat_close(inverted.matrix(), transform.matrix());
        assert_mat_close(inverted.matrix_inverse(), transform.matrix_inverse());
    }

    #[test]
    fn test_invert_undoes_transform() {
        let transform = general_transform();
        let mut inverse = transform;
        inverse.invert();

        let p = Vec3::new(0.3, -1.2, 5.0);
        assert_vec_close(inverse.mult_vec(transform.mult_vec(p)), p);
    }

    #[test]
    fn test_singular_invert_is_not_finite() {
        let mut transform = TransformMatrix::new();
        transform.scale_axis(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(transform.determinant(), 0.0);

        transform.invert();
        assert!(!transform.matrix().is_finite());
    }

    #[test]
    fn test_transpose_and_neg() {
        let mut transform = TransformMatrix::new();
        transform.translate(Vec3::new(1.0, 2.0, 3.0)).transpose();
        assert_eq!(transform.matrix().row(3).truncate(), Vec3::new(1.0, 2.0, 3.0));

        let mut negated = TransformMatrix::new();
        negated.neg();
        assert_mat_close(negated.matrix(), Mat4::IDENTITY * -1.0);
        assert_vec_close(negated.mult_vec(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_z_rotation_matches_planar_rotation() {
        let mut transform = TransformMatrix::new();
        transform.rotate_z_axis(FRAC_PI_4);

        let p = Vec3::new(1.0, 2.0, 0.5);
        let (s, c) = FRAC_PI_4.sin_cos();
        let expected = Vec3::new(c * p.x - s * p.y, s * p.x + c * p.y, p.z);
        assert_vec_close(transform.mult_vec(p), expected);
    }
}
