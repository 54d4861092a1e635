//! Spherical camera for ray generation and progressive accumulation.
//!
//! Pixels are spaced evenly in polar and azimuthal angle around the camera's
//! viewing direction instead of on a projection plane, so wide fields of
//! view, up to and past 180 degrees, do not stretch towards the edges.

use std::f64::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use apt_math::{TransformMatrix, Vec3, Vec3Ext};
use rayon::prelude::*;

use crate::scene::trace;
use crate::{
    gen_f64, AccumulationImage, Image, Material, Medium, MediumList, RandomGenerator, RenderConfig,
    RenderError, Result, Scene, Shape, Skybox, SkyboxFlat,
};

/// Camera casting rays on a spherical grid into a [`Scene`].
///
/// `fov` and `up` are double buffered: [`SphericalCamera::zoom`] and
/// [`SphericalCamera::set_up`] only touch the buffered values, which become
/// active on the next [`SphericalCamera::update`].
#[derive(Debug, Clone)]
pub struct SphericalCamera<K = SkyboxFlat, I = AccumulationImage> {
    /// Camera placement. Call `update()` after changing it.
    pub transformation: TransformMatrix,
    filename: PathBuf,

    up: Vec3,
    up_buffer: Vec3,
    origin: Vec3,
    direction: Vec3,
    /// `[vertical, horizontal]` in radians
    fov: [f64; 2],
    fov_buffer: [f64; 2],
    /// Sub-pixel grid `[vertical, horizontal]`
    subpix: [u32; 2],

    medium_list: MediumList,
    skybox: K,
    max_bounces: u32,
    gamma: f64,
    image: I,
}

/// Per-pass projection data, derived from the active camera state.
struct Projection {
    direction: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    size_x: usize,
    size_y: usize,
    pixel_span: [f64; 2],
    subpix_span: [f64; 2],
}

impl Projection {
    /// Direction of sub-pixel (k, l) of pixel (i, j), `jitter` in [0, 1).
    fn direction(&self, i: usize, j: usize, k: u32, l: u32, jitter: [f64; 2]) -> Vec3 {
        let pix = Vec3::new(
            1.0,
            FRAC_PI_2 + (j as f64 - self.size_y as f64 / 2.0 + 0.5) * self.pixel_span[0],
            (i as f64 - self.size_x as f64 / 2.0 + 0.5) * self.pixel_span[1],
        );
        let sub = pix
            - Vec3::new(
                0.0,
                self.pixel_span[0] * 0.5 - self.subpix_span[0] * (k as f64 + jitter[0]),
                self.pixel_span[1] * 0.5 - self.subpix_span[1] * (l as f64 + jitter[1]),
            );

        sub.to_xyz_offset(self.direction, self.horizontal, self.vertical)
    }
}

impl<K: Skybox, I: Image> SphericalCamera<K, I> {
    /// Create a camera. Origin and direction are taken from `transformation`
    /// right away; the remaining settings come from `config`.
    ///
    /// `medium_list` is the list every emitted ray starts with. It must not
    /// be empty and should hold the outside medium at least twice, so that
    /// leaving a closed volume still leaves one behind.
    pub fn new(
        transformation: TransformMatrix,
        config: &RenderConfig,
        medium_list: MediumList,
        skybox: K,
        image: I,
    ) -> Result<Self> {
        if medium_list.is_empty() {
            return Err(RenderError::EmptyMediumList);
        }
        if config.subpix.contains(&0) {
            return Err(RenderError::InvalidSubpix {
                subpix: config.subpix,
            });
        }
        if medium_list.len() < 2 {
            log::warn!(
                "Camera medium list has {} entry, rays leaving a volume may run out of media",
                medium_list.len()
            );
        }

        Ok(Self {
            origin: transformation.mult_vec(Vec3::ZERO),
            direction: transformation.mult_dir(Vec3::Y),
            transformation,
            filename: config.filename.clone(),
            up: config.up,
            up_buffer: config.up,
            fov: config.fov,
            fov_buffer: config.fov,
            subpix: config.subpix,
            medium_list,
            skybox,
            max_bounces: config.max_bounces,
            gamma: config.gamma,
            image,
        })
    }

    /// Commit buffered fov and up vector, and re-derive origin and
    /// direction from the transformation.
    pub fn update(&mut self) {
        self.origin = self.transformation.mult_vec(Vec3::ZERO);
        self.direction = self.transformation.mult_dir(Vec3::Y);
        self.fov = self.fov_buffer;
        self.up = self.up_buffer;
        log::debug!(
            "Camera at {:?} looking along {:?}, fov {:?}",
            self.origin,
            self.direction,
            self.fov
        );
    }

    fn projection(&self) -> Projection {
        let size_x = self.image.size_x();
        let size_y = self.image.size_y();
        let horizontal = self.direction.cross(self.up).normalize();
        let vertical = horizontal.cross(self.direction).normalize();
        let pixel_span = [self.fov[0] / size_y as f64, self.fov[1] / size_x as f64];

        Projection {
            direction: self.direction,
            horizontal,
            vertical,
            size_x,
            size_y,
            pixel_span,
            subpix_span: [
                pixel_span[0] / f64::from(self.subpix[0]),
                pixel_span[1] / f64::from(self.subpix[1]),
            ],
        }
    }

    /// Render one sample set for every pixel and fold it into the image.
    pub fn raytrace<S, M, D>(&mut self, scene: &Scene<S, M, D>, rng: &mut RandomGenerator) -> Result<()>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        scene.check_medium_list(&self.medium_list)?;

        let expected = self.image.size_x() * self.image.size_y();
        if rng.len() != expected {
            return Err(RenderError::GeneratorSizeMismatch {
                expected,
                actual: rng.len(),
            });
        }

        let projection = self.projection();
        let origin = self.origin;
        let medium_list = self.medium_list;
        let max_bounces = self.max_bounces;
        let skybox = &self.skybox;
        let [subpix_y, subpix_x] = self.subpix;
        let n_subpix = f64::from(subpix_y) * f64::from(subpix_x);

        let colours: Vec<Vec3> = rng
            .generators_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(index, generator)| {
                let i = index % projection.size_x;
                let j = index / projection.size_x;
                let mut colour = Vec3::ZERO;

                for k in 0..subpix_y {
                    for l in 0..subpix_x {
                        let jitter = [gen_f64(generator), gen_f64(generator)];
                        let direction = projection.direction(i, j, k, l, jitter);
                        colour += trace(
                            scene,
                            generator,
                            origin,
                            direction,
                            medium_list,
                            max_bounces,
                            skybox,
                        );
                    }
                }

                colour / n_subpix
            })
            .collect();

        self.image.update();
        self.image.update_all(&colours);
        Ok(())
    }

    /// Run `n_iter` passes.
    pub fn accumulate<S, M, D>(
        &mut self,
        scene: &Scene<S, M, D>,
        rng: &mut RandomGenerator,
        n_iter: u32,
    ) -> Result<()>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        for iter in 0..n_iter {
            self.timed_pass(scene, rng, iter)?;
        }
        Ok(())
    }

    /// Run passes until `cancel` is set. Returns the number of passes run.
    pub fn accumulate_until<S, M, D>(
        &mut self,
        scene: &Scene<S, M, D>,
        rng: &mut RandomGenerator,
        cancel: &AtomicBool,
    ) -> Result<u32>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        let mut iter = 0;
        while !cancel.load(Ordering::Relaxed) {
            self.timed_pass(scene, rng, iter)?;
            iter += 1;
        }
        Ok(iter)
    }

    /// Run `n_iter` passes, writing the image every `interval` passes and
    /// once at the end. An interval of 0 only writes at the end.
    pub fn accumulate_write<S, M, D>(
        &mut self,
        scene: &Scene<S, M, D>,
        rng: &mut RandomGenerator,
        n_iter: u32,
        interval: u32,
    ) -> Result<()>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        for iter in 0..n_iter {
            self.timed_pass(scene, rng, iter)?;
            if interval > 0 && (iter + 1) % interval == 0 {
                self.write()?;
            }
        }
        self.write()
    }

    /// Run passes until `cancel` is set, writing the image every `interval`
    /// passes and once when stopping. Returns the number of passes run.
    pub fn accumulate_write_until<S, M, D>(
        &mut self,
        scene: &Scene<S, M, D>,
        rng: &mut RandomGenerator,
        interval: u32,
        cancel: &AtomicBool,
    ) -> Result<u32>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        let mut iter = 0;
        while !cancel.load(Ordering::Relaxed) {
            self.timed_pass(scene, rng, iter)?;
            iter += 1;
            if interval > 0 && iter % interval == 0 {
                self.write()?;
            }
        }
        self.write()?;
        Ok(iter)
    }

    fn timed_pass<S, M, D>(
        &mut self,
        scene: &Scene<S, M, D>,
        rng: &mut RandomGenerator,
        iter: u32,
    ) -> Result<()>
    where
        S: Shape,
        M: Material,
        D: Medium,
    {
        let start = Instant::now();
        self.raytrace(scene, rng)?;
        log::info!(
            "Iteration {} done in {:.3}s",
            iter + 1,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Write the image to the configured filename.
    pub fn write(&self) -> Result<()> {
        self.write_to(&self.filename)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.write(path.as_ref(), self.gamma)
    }

    /// Discard accumulated samples.
    pub fn reset(&mut self) {
        self.image.reset();
    }

    /// Buffer a new up vector.
    pub fn set_up(&mut self, up: Vec3) {
        self.up_buffer = up;
    }

    /// Buffer the active fov scaled by `factor`.
    pub fn zoom(&mut self, factor: f64) {
        self.fov_buffer = [self.fov[0] * factor, self.fov[1] * factor];
    }

    /// Buffer a new fov, `[vertical, horizontal]` in radians.
    pub fn zoom_fov(&mut self, fov: [f64; 2]) {
        self.fov_buffer = fov;
    }

    /// Every direction is in focus for this camera.
    pub fn focus(&mut self, _focus_distance: f64) {}

    /// Every direction is in focus for this camera.
    pub fn auto_focus<S, M, D>(&mut self, _scene: &Scene<S, M, D>, _position: [f64; 2]) {}

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov(&self) -> [f64; 2] {
        self.fov
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<PathBuf>) {
        self.filename = filename.into();
    }

    pub fn medium_list(&self) -> &MediumList {
        &self.medium_list
    }

    pub fn skybox(&self) -> &K {
        &self.skybox
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut I {
        &mut self.image
    }
}
