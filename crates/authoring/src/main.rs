//! Authoring tool for torus terrain.
//!
//! Reads a terrain settings file, samples the height map it references, generates
//! the displaced torus mesh and saves mesh, grid cache and scene descriptor.
//!
//! ```text
//! torus-terrain <SETTINGS.ron> [OPTIONS]
//!   --out <DIR>               Asset root (default: assets)
//!   --seam <wrap|recompute>   Override the settings' seam mode
//!   --weld <TOLERANCE>        Smooth normals across duplicate positions
//!   --from-cache              Re-tessellate the saved grid instead of sampling
//! ```

mod config;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use procgen::OutputSink;
use terrain_core::SeamMode;

use crate::export::AssetSink;

#[derive(Debug)]
struct Args {
    settings: PathBuf,
    out: PathBuf,
    seam: Option<SeamMode>,
    weld: Option<f32>,
    from_cache: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let mut settings = config::load_settings(&args.settings)?;
    if let Some(seam) = args.seam {
        settings.seam = seam;
    }
    let name = config::terrain_name(&args.settings)?;
    let mut sink = AssetSink::new(&args.out, name);

    let (mut mesh, grid) = if args.from_cache {
        let grid = sink.load_grid()?;
        let mesh = procgen::regenerate(&grid, &settings).with_context(|| {
            format!("{:?} no longer matches the cached grid", args.settings)
        })?;
        log::info!("Re-tessellated cached grid {:?}", sink.paths().grid);
        (mesh, grid)
    } else {
        let height_map = config::load_height_map(&args.settings, &settings)?;
        let generated = procgen::generate(&settings, &height_map)?;
        (generated.mesh, generated.grid)
    };

    if let Some(tolerance) = args.weld {
        mesh.recalculate_normals_welded(tolerance);
        log::info!("Welded normals with tolerance {}", tolerance);
    }

    sink.accept(&mesh, &grid, &settings)
        .with_context(|| format!("saving terrain from {:?}", args.settings))
}

/// Parse command-line arguments with plain `std::env::args()` matching.
fn parse_args() -> Args {
    let mut settings = None;
    let mut out = PathBuf::from("assets");
    let mut seam = None;
    let mut weld = None;
    let mut from_cache = false;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                i += 1;
                out = args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--out requires a directory");
                    std::process::exit(1);
                });
            }
            "--seam" => {
                i += 1;
                seam = Some(match args.get(i).map(String::as_str) {
                    Some("wrap") => SeamMode::Wrap,
                    Some("recompute") => SeamMode::Recompute,
                    _ => {
                        eprintln!("--seam requires 'wrap' or 'recompute'");
                        std::process::exit(1);
                    }
                });
            }
            "--weld" => {
                i += 1;
                weld = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--weld requires a tolerance");
                    std::process::exit(1);
                }));
            }
            "--from-cache" => from_cache = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            path => settings = Some(PathBuf::from(path)),
        }
        i += 1;
    }

    let Some(settings) = settings else {
        print_usage();
        std::process::exit(1);
    };

    Args {
        settings,
        out,
        seam,
        weld,
        from_cache,
    }
}

fn print_usage() {
    eprintln!("Usage: torus-terrain <SETTINGS.ron> [OPTIONS]");
    eprintln!("  --out <DIR>               Asset root (default: assets)");
    eprintln!("  --seam <wrap|recompute>   Override the settings' seam mode");
    eprintln!("  --weld <TOLERANCE>        Smooth normals across duplicate positions");
    eprintln!("  --from-cache              Re-tessellate the saved grid instead of sampling");
}
