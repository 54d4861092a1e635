// Spherical coordinate utilities for Vec3
//
// Spherical vectors are stored as (r, theta, phi): radius, polar angle
// measured from the third axis, and azimuthal angle measured from the first
// axis towards the second.

use crate::Vec3;

/// Extension trait for Vec3 to convert between cartesian and spherical coordinates.
pub trait Vec3Ext {
    /// Cartesian (x, y, z) to spherical (r, theta, phi).
    fn to_sph(self) -> Vec3;

    /// Spherical (r, theta, phi) to cartesian (x, y, z) in the world frame.
    fn to_xyz(self) -> Vec3;

    /// Spherical (r, theta, phi) to cartesian, expressed in the frame
    /// `(ref1, ref2, ref3)`.
    ///
    /// theta = pi/2, phi = 0 points along `ref1`, phi = pi/2 along `ref2`
    /// and theta = 0 along `ref3`.
    fn to_xyz_offset(self, ref1: Vec3, ref2: Vec3, ref3: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn to_sph(self) -> Vec3 {
        let r = self.length();
        let theta = if r > 0.0 { (self.z / r).acos() } else { 0.0 };
        let phi = self.y.atan2(self.x);
        Vec3::new(r, theta, phi)
    }

    fn to_xyz(self) -> Vec3 {
        let (sin_theta, cos_theta) = self.y.sin_cos();
        let (sin_phi, cos_phi) = self.z.sin_cos();
        Vec3::new(
            self.x * sin_theta * cos_phi,
            self.x * sin_theta * sin_phi,
            self.x * cos_theta,
        )
    }

    fn to_xyz_offset(self, ref1: Vec3, ref2: Vec3, ref3: Vec3) -> Vec3 {
        let local = self.to_xyz();
        ref1 * local.x + ref2 * local.y + ref3 * local.z
    }
}
