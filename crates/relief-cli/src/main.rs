//! relief CLI - render and probe height-field scenes
//!
//! Loads a TOML scene holding one height field and a pinhole camera, then
//! renders it, summarizes it, or traces a single ray through it.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use relief_math::{Point3, Vec3};
use relief_shapes::{Ray, Shape};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod render;
mod scene;

use render::{Camera, RenderMode};
use scene::SceneConfig;

#[derive(Parser)]
#[command(name = "relief")]
#[command(about = "Height-field ray tracer", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to a PNG image
    Render {
        /// Scene file
        scene: PathBuf,
        /// Output image
        #[arg(short, long, default_value = "relief.png")]
        output: PathBuf,
        /// Image width in pixels
        #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
        /// What each pixel shows
        #[arg(long, value_enum, default_value_t = RenderMode::Normal)]
        mode: RenderMode,
        /// Worker threads (default: one per core)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Display information about a scene's height field
    Info {
        /// Scene file
        scene: PathBuf,
    },
    /// Trace a single world-space ray and print the hit
    Probe {
        /// Scene file
        scene: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: [f64; 3],
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        dir: [f64; 3],
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            scene,
            output,
            width,
            height,
            mode,
            threads,
        } => {
            render_scene(&scene, &output, width, height, mode, threads)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
        Commands::Probe { scene, origin, dir } => {
            probe(&scene, origin, dir)?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn parse_vec3(s: &str) -> std::result::Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let num = |p: &str| p.parse::<f64>().map_err(|e| format!("'{p}': {e}"));
    Ok([num(*x)?, num(*y)?, num(*z)?])
}

fn render_scene(
    scene_path: &Path,
    output: &Path,
    width: u32,
    height: u32,
    mode: RenderMode,
    threads: Option<usize>,
) -> Result<()> {
    let scene = SceneConfig::load(scene_path)?;
    let shape = scene.heightfield.build()?;
    let camera = Camera::from_config(&scene.camera)?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        pool = pool.num_threads(n);
    }
    let pool = pool.build().context("failed to start render threads")?;

    let start = Instant::now();
    let image = pool.install(|| render::render(&shape, &camera, width, height, mode));
    log::info!(
        "rendered {width}x{height} on {} threads in {:.2?}",
        pool.current_num_threads(),
        start.elapsed()
    );

    image
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn show_info(scene_path: &Path) -> Result<()> {
    let scene = SceneConfig::load(scene_path)?;
    let shape = scene.heightfield.build()?;
    let grid = shape.grid();
    let ob = shape.object_bound();
    let wb = shape.world_bound();

    println!("relief scene: {}", scene_path.display());
    println!("  Shape: {}", shape.base().id);
    println!("  Resolution: {} x {} ({} cells)", grid.nx(), grid.ny(), grid.cell_count());
    println!("  Elevation: [{}, {}]", grid.min_z(), grid.max_z());
    println!("  Shading: {}", shape.shading_mode());
    println!("  Object bounds: {} .. {}", fmt_point(&ob.min), fmt_point(&ob.max));
    println!("  World bounds: {} .. {}", fmt_point(&wb.min), fmt_point(&wb.max));
    if shape.base().reverse_orientation {
        println!("  Orientation: reversed");
    }
    Ok(())
}

fn probe(scene_path: &Path, origin: [f64; 3], dir: [f64; 3]) -> Result<()> {
    let scene = SceneConfig::load(scene_path)?;
    let shape = scene.heightfield.build()?;
    let ray = Ray::new(Point3::from(origin), Vec3::from(dir));

    match shape.intersect(&ray) {
        Some(hit) => {
            let dg = &hit.dg;
            let shading = shape.shading_geometry(&shape.base().object_to_world, dg);
            println!("hit at t = {}", hit.t_hit);
            println!("  ray epsilon: {}", hit.ray_epsilon);
            println!("  point: {}", fmt_point(&dg.p));
            println!("  (u, v): ({}, {})", dg.u, dg.v);
            println!("  dpdu: {}", fmt_vec(&dg.dpdu));
            println!("  dpdv: {}", fmt_vec(&dg.dpdv));
            println!("  normal: {}", fmt_vec(&dg.nn));
            println!("  shading normal: {}", fmt_vec(&shading.nn));
        }
        None => println!("miss"),
    }
    println!("occluded: {}", shape.intersect_p(&ray));
    Ok(())
}

fn fmt_point(p: &Point3) -> String {
    format!("({:.4}, {:.4}, {:.4})", p.x, p.y, p.z)
}

fn fmt_vec(v: &Vec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("0.5, -1,2").unwrap(), [0.5, -1.0, 2.0]);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,2").is_err());
    }

    #[test]
    fn test_cli_parses_probe() {
        let cli = Cli::try_parse_from([
            "relief", "-vv", "probe", "scene.toml", "--origin", "0.5,0.5,1", "--dir", "0,0,-1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Probe { origin, dir, .. } => {
                assert_eq!(origin, [0.5, 0.5, 1.0]);
                assert_eq!(dir, [0.0, 0.0, -1.0]);
            }
            _ => panic!("expected probe"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_width() {
        assert!(Cli::try_parse_from(["relief", "render", "s.toml", "--width", "0"]).is_err());
    }

    #[test]
    fn test_bundled_scene_parses() {
        let src = include_str!("../scenes/dune.toml");
        let scene = SceneConfig::from_toml(src).unwrap();
        let shape = scene.heightfield.build().unwrap();
        assert_eq!(shape.grid().nx(), 8);
    }
}
