//! Primary-ray rendering of a single shape.

use clap::ValueEnum;
use image::{Rgb, RgbImage};
use rayon::prelude::*;
use relief_math::{Point3, Transform, Vec3};
use relief_shapes::{Ray, Shape};

use crate::scene::CameraConfig;

/// What each pixel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// Shading normal mapped to RGB.
    Normal,
    /// Hit distance, nearer is brighter.
    Depth,
}

/// A pinhole camera.
#[derive(Debug, Clone)]
pub struct Camera {
    camera_to_world: Transform,
    tan_half_fov: f64,
}

impl Camera {
    /// Camera from its scene description.
    pub fn from_config(config: &CameraConfig) -> anyhow::Result<Self> {
        Ok(Self {
            camera_to_world: config.camera_to_world()?,
            tan_half_fov: (config.fov.to_radians() * 0.5).tan(),
        })
    }

    /// Primary ray through the center of pixel `(px, py)`.
    pub fn generate_ray(&self, px: u32, py: u32, width: u32, height: u32) -> Ray {
        let aspect = f64::from(width) / f64::from(height);
        let sx = (2.0 * (f64::from(px) + 0.5) / f64::from(width) - 1.0) * aspect * self.tan_half_fov;
        let sy = (1.0 - 2.0 * (f64::from(py) + 0.5) / f64::from(height)) * self.tan_half_fov;
        // Camera x is `up x forward`, which points to screen left.
        let dir = Vec3::new(-sx, sy, 1.0);
        Ray::new(
            self.camera_to_world.apply_point(&Point3::origin()),
            self.camera_to_world.apply_vec(&dir),
        )
    }
}

/// Per-pixel result of the primary ray.
#[derive(Debug, Clone, Copy)]
struct Sample {
    t: f64,
    normal: Vec3,
}

/// Trace one ray per pixel, rows in parallel.
pub fn render(shape: &dyn Shape, camera: &Camera, width: u32, height: u32, mode: RenderMode) -> RgbImage {
    let object_to_world = &shape.base().object_to_world;
    let mut samples = vec![None; width as usize * height as usize];

    samples
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, slot) in row.iter_mut().enumerate() {
                let ray = camera.generate_ray(px as u32, py as u32, width, height);
                *slot = shape.intersect(&ray).map(|hit| Sample {
                    t: hit.t_hit,
                    normal: shape.shading_geometry(object_to_world, &hit.dg).nn,
                });
            }
        });

    let hits = samples.iter().flatten().count();
    log::info!("{hits} of {} primary rays hit", samples.len());

    let (t_lo, t_hi) = samples
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s.t), hi.max(s.t)));

    RgbImage::from_fn(width, height, |px, py| {
        let Some(sample) = samples[(py * width + px) as usize] else {
            return Rgb([0, 0, 0]);
        };
        match mode {
            RenderMode::Normal => {
                let c = sample.normal.map(|x| to_byte(0.5 * x + 0.5));
                Rgb([c.x, c.y, c.z])
            }
            RenderMode::Depth => {
                let span = t_hi - t_lo;
                let d = if span > 0.0 { (sample.t - t_lo) / span } else { 0.0 };
                let g = to_byte(1.0 - 0.8 * d);
                Rgb([g, g, g])
            }
        }
    })
}

fn to_byte(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}
