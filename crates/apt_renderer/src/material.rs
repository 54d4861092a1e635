//! Material trait for surface interaction.

use apt_math::Vec3;
use rand::RngCore;
use std::f64::consts::TAU;

use crate::{gen_f64, Ray, Shape};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Bounce a ray off `hit` at surface coordinates `uv`.
    ///
    /// `ray.dist` holds the distance to the hit point. The material moves the
    /// ray's origin there, picks a new direction and updates its colour and
    /// mask.
    fn bounce(&self, rng: &mut dyn RngCore, uv: [f64; 2], hit: &dyn Shape, ray: &mut Ray);
}

impl<T: Material + ?Sized> Material for Box<T> {
    fn bounce(&self, rng: &mut dyn RngCore, uv: [f64; 2], hit: &dyn Shape, ray: &mut Ray) {
        (**self).bounce(rng, uv, hit, ray)
    }
}

/// Offset along the normal that keeps a bounced ray off its own surface.
const SURFACE_EPSILON: f64 = 1e-8;

/// Lambertian material with emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diffuse {
    emission: Color,
    colour: Color,
    roughness: f64,
}

impl Diffuse {
    /// Create a new diffuse material.
    ///
    /// - `emission`: light emitted by the surface
    /// - `colour`: fraction of light reflected
    /// - `roughness`: exponent on the cosine term, 1 is lambertian and 0 drops it
    pub fn new(emission: Color, colour: Color, roughness: f64) -> Self {
        Self {
            emission,
            colour,
            roughness,
        }
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn colour(&self) -> Color {
        self.colour
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }
}

impl Material for Diffuse {
    fn bounce(&self, rng: &mut dyn RngCore, uv: [f64; 2], hit: &dyn Shape, ray: &mut Ray) {
        let mut normal = hit.normal(ray.time, uv);
        // Face the incoming ray
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        let rand1 = TAU * gen_f64(rng);
        let rand2 = gen_f64(rng);
        let rand2s = rand2.sqrt();

        // Orthonormal basis around the normal
        let axis = if normal.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
        let u = axis.cross(normal).normalize();
        let v = normal.cross(u);

        let new_direction = (u * rand1.cos() * rand2s
            + v * rand1.sin() * rand2s
            + normal * (1.0 - rand2).sqrt())
        .normalize();

        ray.origin += ray.direction * ray.dist + normal * SURFACE_EPSILON;
        ray.colour += ray.mask * self.emission;
        ray.mask *= self.colour * new_direction.dot(normal).powf(self.roughness);
        ray.direction = new_direction;
    }
}
