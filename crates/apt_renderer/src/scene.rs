//! Scene storage, closest-hit intersection and the bounce loop.
//!
//! Shapes, materials and media live in three flat collections and refer to
//! each other by index: a shape stores its material index, a ray's medium
//! list stores media indices. Rendering only needs `&Scene`, structural edits
//! need `&mut Scene`, so a render pass can never overlap an edit.

use apt_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use rayon::prelude::*;

use crate::{
    Diffuse, Intersection, Material, Medium, MediumList, NonAbsorber, Ray, RenderError, Result,
    Shape, Skybox, Triangle,
};

/// Below this squared mask length a path carries too little light to matter.
const MASK_CUTOFF: f64 = 0.01;

/// A collection of shapes, materials and media.
#[derive(Debug, Clone)]
pub struct Scene<S = Triangle, M = Diffuse, D = NonAbsorber> {
    shapes: Vec<S>,
    materials: Vec<M>,
    media: Vec<D>,
}

impl<S, M, D> Default for Scene<S, M, D> {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            materials: Vec::new(),
            media: Vec::new(),
        }
    }
}

impl<S: Shape, M: Material, D: Medium> Scene<S, M, D> {
    /// Create a scene, checking that every shape's material exists.
    pub fn new(shapes: Vec<S>, materials: Vec<M>, media: Vec<D>) -> Result<Self> {
        let scene = Self {
            shapes,
            materials,
            media,
        };
        scene.validate()?;

        log::debug!(
            "Scene created: {} shapes, {} materials, {} media",
            scene.shapes.len(),
            scene.materials.len(),
            scene.media.len()
        );
        Ok(scene)
    }

    pub fn shapes(&self) -> &[S] {
        &self.shapes
    }

    /// Mutable access, e.g. to change transformations. Call [`Scene::update`]
    /// afterwards.
    pub fn shapes_mut(&mut self) -> &mut [S] {
        &mut self.shapes
    }

    pub fn materials(&self) -> &[M] {
        &self.materials
    }

    pub fn media(&self) -> &[D] {
        &self.media
    }

    /// Check that every shape refers to an existing material.
    pub fn validate(&self) -> Result<()> {
        let len = self.materials.len();
        match self
            .shapes
            .iter()
            .enumerate()
            .find(|(_, shape)| shape.material() >= len)
        {
            Some((shape, s)) => Err(RenderError::MaterialOutOfRange {
                shape,
                index: s.material(),
                len,
            }),
            None => Ok(()),
        }
    }

    /// Check that `medium_list` can be used with this scene.
    pub fn check_medium_list(&self, medium_list: &MediumList) -> Result<()> {
        if medium_list.is_empty() {
            return Err(RenderError::EmptyMediumList);
        }
        match medium_list.iter().find(|&m| m >= self.media.len()) {
            Some(index) => Err(RenderError::MediumOutOfRange {
                index,
                len: self.media.len(),
            }),
            None => Ok(()),
        }
    }

    /// Append shapes. They must refer to existing materials.
    pub fn add_shapes(&mut self, shapes: impl IntoIterator<Item = S>) -> Result<()> {
        let start = self.shapes.len();
        self.shapes.extend(shapes);
        if let Err(err) = self.validate() {
            self.shapes.truncate(start);
            return Err(err);
        }
        log::debug!("Added {} shapes", self.shapes.len() - start);
        Ok(())
    }

    pub fn add_materials(&mut self, materials: impl IntoIterator<Item = M>) {
        self.materials.extend(materials);
    }

    pub fn add_media(&mut self, media: impl IntoIterator<Item = D>) {
        self.media.extend(media);
    }

    /// Remove the shapes at `indices`. Later shapes move down to fill the gaps.
    pub fn remove_shapes(&mut self, indices: &[usize]) {
        remove_indices(&mut self.shapes, indices);
    }

    /// Remove the materials at `indices`.
    ///
    /// Material indices stored in shapes are not rewritten, so the removal is
    /// rejected if any shape would be left pointing past the end.
    pub fn remove_materials(&mut self, indices: &[usize]) -> Result<()> {
        let removed = remove_indices(&mut self.materials, indices);
        if let Err(err) = self.validate() {
            // Put them back in their original slots
            for (index, material) in removed {
                self.materials.insert(index, material);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove the media at `indices`. Medium lists referring to removed or
    /// shifted media must be rebuilt by the caller.
    pub fn remove_media(&mut self, indices: &[usize]) {
        remove_indices(&mut self.media, indices);
    }

    /// Recompute every shape's cached data after transformation changes.
    pub fn update(&mut self) {
        self.shapes.par_iter_mut().for_each(|shape| shape.update());
        log::debug!("Updated {} shapes", self.shapes.len());
    }

    /// World-space bounds of all shapes.
    pub fn bounds(&self) -> Aabb {
        self.shapes
            .iter()
            .fold(Aabb::EMPTY, |acc, shape| Aabb::surrounding(&acc, &shape.bounds()))
    }

    /// Closest shape hit by `ray` at a strictly positive distance.
    ///
    /// Ties go to the first shape.
    pub fn intersect_brute(&self, ray: &Ray) -> Option<(&S, Intersection)> {
        let mut closest: Option<(&S, Intersection)> = None;
        let mut range = Interval::POSITIVE;

        for shape in &self.shapes {
            if let Some(hit) = shape.intersection(ray) {
                if range.surrounds(hit.t) {
                    range.max = hit.t;
                    closest = Some((shape, hit));
                }
            }
        }

        closest
    }

    /// Trace `ray` through the scene until it escapes, runs out of bounces
    /// or carries almost no light.
    ///
    /// At each bounce the current medium may scatter the ray before it
    /// reaches the surface; otherwise the surface material bounces it.
    /// Escaping rays pick up the skybox colour weighted by their mask.
    ///
    /// # Panics
    ///
    /// Panics if the ray's medium list is empty or refers to a missing
    /// medium, or if a shape refers to a missing material. [`Scene::new`]
    /// and [`Scene::check_medium_list`] rule these out.
    pub fn raycast<K: Skybox + ?Sized>(
        &self,
        rng: &mut dyn RngCore,
        ray: &mut Ray,
        max_bounces: u32,
        skybox: &K,
    ) {
        let mut bounces = 0;

        while bounces < max_bounces && ray.mask.length_squared() > MASK_CUTOFF {
            let Some((shape, hit)) = self.intersect_brute(ray) else {
                ray.colour += ray.mask * skybox.get(ray.direction);
                return;
            };

            ray.dist = hit.t;
            bounces += 1;

            if !self.media[ray.medium_list.current()].scatter(rng, ray) {
                self.materials[shape.material()].bounce(rng, hit.uv, shape, ray);
            }
        }
    }
}

/// Remove the elements at `indices` as one batch, returning them with the
/// positions they occupied. Out of range and repeated indices are ignored.
fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) -> Vec<(usize, T)> {
    let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < items.len()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut removed = Vec::with_capacity(sorted.len());
    // Back to front so earlier indices stay valid
    for &index in sorted.iter().rev() {
        removed.push((index, items.remove(index)));
    }
    removed.reverse();
    removed
}

/// Colour of a single ray cast from `origin` along `direction`.
pub fn trace<S: Shape, M: Material, D: Medium, K: Skybox + ?Sized>(
    scene: &Scene<S, M, D>,
    rng: &mut dyn RngCore,
    origin: Vec3,
    direction: Vec3,
    medium_list: MediumList,
    max_bounces: u32,
    skybox: &K,
) -> Vec3 {
    let mut ray = Ray::new(origin, direction, Vec3::ZERO, Vec3::ONE, medium_list);
    scene.raycast(rng, &mut ray, max_bounces, skybox);
    ray.colour
}
