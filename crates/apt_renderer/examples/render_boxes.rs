//! Render a handful of coloured, partly emissive triangles.
//!
//! Run with: cargo run --release --example render_boxes -- [iterations] [config.json]
//!
//! The optional JSON file overrides any `RenderConfig` field, for example
//! `{ "size_x": 300, "size_y": 200, "filename": "images/small.png" }`.

use std::env;
use std::time::Instant;

use anyhow::{Context, Result};
use apt_renderer::{
    AccumulationImage, Diffuse, MediumList, NonAbsorber, RandomGenerator, RenderConfig, Scene,
    SkyboxFlat, SphericalCamera, TransformMatrix, Triangle, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let iterations: u32 = match args.get(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid iteration count: {arg}"))?,
        None => 100,
    };
    let config = match args.get(2) {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => RenderConfig::default(),
    };

    println!("APT Path Tracer - Boxes");
    println!("=======================");

    let start = Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    let mut transformation = TransformMatrix::new();
    transformation.translate(Vec3::new(0.0, -2.0, 0.0));

    let mut camera = SphericalCamera::new(
        transformation,
        &config,
        MediumList::from_indices(&[0, 0]),
        SkyboxFlat::new(Vec3::new(0.75, 0.75, 0.99)),
        AccumulationImage::new(config.size_x, config.size_y),
    )?;
    camera.update();

    let mut rng = RandomGenerator::new(config.size_x, config.size_y, config.seed);

    println!(
        "Rendering {}x{} for {} iterations...",
        config.size_x, config.size_y, iterations
    );
    let start = Instant::now();
    camera.accumulate_write(&scene, &mut rng, iterations, config.write_interval)?;
    println!("Rendered in {:?}", start.elapsed());
    println!("Saved to {}", camera.filename().display());

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let p = |x: f64, y: f64, z: f64| Vec3::new(x, y, z);
    let faces = [
        (0, [p(-2., 4., 2.), p(-2., 4., 0.), p(0., 4., 0.)]),
        (1, [p(-3., 3., -1.), p(-3., 3., -3.), p(0., 3., -1.)]),
        (2, [p(-3., 4., -3.), p(0., 4., -3.), p(0., 4., -1.)]),
        (3, [p(0., 5., 0.), p(0., 5., -4.), p(4., 5., -4.)]),
        (4, [p(1., 2., 0.), p(0., 2., 0.), p(0., 3., 0.)]),
        (0, [p(0., 3., 0.), p(1., 3., 0.), p(1., 2., 0.)]),
        (1, [p(0., 3., 1.), p(0., 2., 1.), p(1., 2., 1.)]),
        (2, [p(1., 2., 1.), p(1., 3., 1.), p(0., 3., 1.)]),
        (3, [p(1., 3., 1.), p(1., 2., 1.), p(1., 2., 0.)]),
        (4, [p(1., 2., 0.), p(1., 3., 0.), p(1., 3., 1.)]),
        (0, [p(0., 2., 0.), p(0., 2., 1.), p(0., 3., 1.)]),
        (1, [p(0., 3., 1.), p(0., 3., 0.), p(0., 2., 0.)]),
    ];
    let shapes = faces
        .into_iter()
        .map(|(material, points)| {
            Triangle::new(material, TransformMatrix::new(), points, None, None)
        })
        .collect();

    let materials = vec![
        Diffuse::new(Vec3::ZERO, Vec3::new(0.98, 0.7, 0.85), 1.0),
        Diffuse::new(Vec3::splat(2.0), Vec3::ONE, 1.0),
        Diffuse::new(Vec3::ZERO, Vec3::new(0.8, 0.95, 0.6), 1.0),
        Diffuse::new(Vec3::ZERO, Vec3::new(0.98, 1.0, 0.9), 0.0),
        Diffuse::new(Vec3::ZERO, Vec3::ONE, 0.5),
    ];

    let media = vec![NonAbsorber::new(1.0, 0)];

    Ok(Scene::new(shapes, materials, media)?)
}
