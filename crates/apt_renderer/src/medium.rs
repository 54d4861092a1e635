//! Medium trait for volumetric interaction.

use rand::RngCore;

use crate::Ray;

/// A volume a ray travels through, such as air or glass.
pub trait Medium: Send + Sync {
    /// Give the medium a chance to intercept the ray before it reaches the
    /// surface at `ray.dist`.
    ///
    /// Returns true if the ray was scattered, in which case the medium has
    /// already updated it and the surface bounce is skipped.
    fn scatter(&self, rng: &mut dyn RngCore, ray: &mut Ray) -> bool;

    /// Refractive index.
    fn ind(&self) -> f64;

    /// Priority in a [`crate::MediumList`]; higher wins.
    fn priority(&self) -> u32;
}

impl<T: Medium + ?Sized> Medium for Box<T> {
    fn scatter(&self, rng: &mut dyn RngCore, ray: &mut Ray) -> bool {
        (**self).scatter(rng, ray)
    }

    fn ind(&self) -> f64 {
        (**self).ind()
    }

    fn priority(&self) -> u32 {
        (**self).priority()
    }
}

/// Medium that never interacts with light. Used for vacuum/air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonAbsorber {
    ind: f64,
    priority: u32,
}

impl NonAbsorber {
    pub fn new(ind: f64, priority: u32) -> Self {
        Self { ind, priority }
    }
}

impl Medium for NonAbsorber {
    fn scatter(&self, _rng: &mut dyn RngCore, _ray: &mut Ray) -> bool {
        false
    }

    fn ind(&self) -> f64 {
        self.ind
    }

    fn priority(&self) -> u32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediumList;
    use apt_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_non_absorber_leaves_ray_untouched() {
        let medium = NonAbsorber::new(1.33, 4);
        let mut rng = StdRng::seed_from_u64(7);
        let mut ray = Ray::new(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::ZERO,
            Vec3::ONE,
            MediumList::from_indices(&[0, 0]),
        );
        ray.dist = 3.0;
        let before = ray;

        assert!(!medium.scatter(&mut rng, &mut ray));
        assert_eq!(ray.origin, before.origin);
        assert_eq!(ray.direction, before.direction);
        assert_eq!(ray.mask, before.mask);
        assert_eq!(medium.ind(), 1.33);
        assert_eq!(medium.priority(), 4);
    }

    #[test]
    fn test_boxed_medium() {
        let media: Vec<Box<dyn Medium>> = vec![
            Box::new(NonAbsorber::new(1.0, 0)),
            Box::new(NonAbsorber::new(1.5, 10)),
        ];
        let mut list = MediumList::from_indices(&[0, 0]);
        list.add(&media, 1);
        assert_eq!(list.current(), 1);
        assert_eq!(media[list.current()].ind(), 1.5);
    }
}
