//! Progressive image accumulation.
//!
//! Each render pass contributes one new sample per pixel. The image keeps a
//! running average so that the buffer is always a valid picture, and applies
//! gamma only when written to disk.

use std::path::Path;

use apt_math::{Interval, Vec3};
use rayon::prelude::*;

use crate::{Color, RenderError, Result};

/// Pixel buffer fed by the camera.
pub trait Image: Send + Sync {
    fn size_x(&self) -> usize;

    fn size_y(&self) -> usize;

    /// Start a new pass.
    fn update(&mut self);

    /// Fold one sample into pixel (x, y), y = 0 being the top row.
    fn update_pixel(&mut self, colour: Color, x: usize, y: usize);

    /// Fold a full pass, indexed `x + y * size_x`.
    fn update_all(&mut self, colours: &[Color]) {
        let size_x = self.size_x();
        for (index, colour) in colours.iter().enumerate() {
            self.update_pixel(*colour, index % size_x, index / size_x);
        }
    }

    /// Write the image with `1 / gamma` applied to every channel.
    fn write(&self, path: &Path, gamma: f64) -> Result<()>;

    /// Discard all accumulated samples.
    fn reset(&mut self);
}

/// Running-average accumulator written out as 8-bit PNG.
#[derive(Debug, Clone)]
pub struct AccumulationImage {
    size_x: usize,
    size_y: usize,
    img: Vec<Color>,
    updates: u32,
}

impl AccumulationImage {
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Self {
            size_x,
            size_y,
            img: vec![Color::ZERO; size_x * size_y],
            updates: 0,
        }
    }

    /// Number of passes folded in since the last reset.
    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.img[x + y * self.size_x]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.img
    }

    /// Gamma corrected 8-bit value of one channel.
    fn to_byte(value: f64, gamma: f64) -> u8 {
        (Interval::UNIT.clamp(value.powf(1.0 / gamma)) * 255.0) as u8
    }

    fn weights(&self) -> (f64, f64) {
        let n = f64::from(self.updates.max(1));
        (1.0 - 1.0 / n, 1.0 / n)
    }
}

impl Image for AccumulationImage {
    fn size_x(&self) -> usize {
        self.size_x
    }

    fn size_y(&self) -> usize {
        self.size_y
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn update_pixel(&mut self, colour: Color, x: usize, y: usize) {
        let (keep, add) = self.weights();
        let pixel = &mut self.img[x + y * self.size_x];
        *pixel = *pixel * keep + colour * add;
    }

    fn update_all(&mut self, colours: &[Color]) {
        let (keep, add) = self.weights();
        self.img
            .par_iter_mut()
            .zip(colours.par_iter())
            .for_each(|(pixel, colour)| *pixel = *pixel * keep + *colour * add);
    }

    fn write(&self, path: &Path, gamma: f64) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let buffer = image::RgbImage::from_fn(self.size_x as u32, self.size_y as u32, |x, y| {
            let colour: Vec3 = self.pixel(x as usize, y as usize);
            image::Rgb([
                Self::to_byte(colour.x, gamma),
                Self::to_byte(colour.y, gamma),
                Self::to_byte(colour.z, gamma),
            ])
        });

        buffer.save(path).map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Wrote {}x{} image to {}", self.size_x, self.size_y, path.display());
        Ok(())
    }

    fn reset(&mut self) {
        self.updates = 0;
        self.img.fill(Color::ZERO);
    }
}
