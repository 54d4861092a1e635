//! Backgrounds seen by rays that escape the scene.

use apt_math::Vec3;

use crate::Color;

/// An infinitely distant background.
pub trait Skybox: Send + Sync {
    /// Colour seen along `direction`.
    fn get(&self, direction: Vec3) -> Color;
}

/// Same colour in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxFlat {
    background: Color,
}

impl SkyboxFlat {
    pub fn new(background: Color) -> Self {
        Self { background }
    }
}

impl Skybox for SkyboxFlat {
    fn get(&self, _direction: Vec3) -> Color {
        self.background
    }
}

/// Linear blend from `bottom` to `top` along the `up` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxGradient {
    bottom: Color,
    top: Color,
    up: Vec3,
}

impl SkyboxGradient {
    pub fn new(bottom: Color, top: Color, up: Vec3) -> Self {
        Self {
            bottom,
            top,
            up: up.normalize(),
        }
    }
}

impl Default for SkyboxGradient {
    /// White horizon fading to light blue overhead, Z up.
    fn default() -> Self {
        Self::new(Color::ONE, Color::new(0.5, 0.7, 1.0), Vec3::Z)
    }
}

impl Skybox for SkyboxGradient {
    fn get(&self, direction: Vec3) -> Color {
        let a = 0.5 * (direction.normalize().dot(self.up) + 1.0);
        self.bottom * (1.0 - a) + self.top * a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ignores_direction() {
        let sky = SkyboxFlat::new(Color::new(1.0, 0.0, 1.0));
        assert_eq!(sky.get(Vec3::X), Color::new(1.0, 0.0, 1.0));
        assert_eq!(sky.get(-Vec3::Z), Color::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_gradient_endpoints() {
        let sky = SkyboxGradient::new(Color::ZERO, Color::ONE, Vec3::new(0.0, 0.0, 3.0));
        assert!((sky.get(Vec3::Z) - Color::ONE).length() < 1e-12);
        assert!(sky.get(-Vec3::Z).length() < 1e-12);
        assert!((sky.get(Vec3::X) - Color::splat(0.5)).length() < 1e-12);
    }
}
