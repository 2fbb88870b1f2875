//! Plotting demo
//!
//! `plot_demo surface` draws a cosine ripple in red and, held on top of it,
//! the same ripple raised by 10 with random per-point colors.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use ptviz::prelude::*;
use rand::Rng;
use std::path::PathBuf;

#[derive(Parser)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
    /// Build the scene without opening a window
    #[clap(long)]
    headless: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Cosine ripple plus a colored copy
    Surface {
        #[clap(short, long, default_value = "256")]
        size: usize,
    },
    /// Points on a sphere with their normals as a hedgehog
    Hedgehog {
        #[clap(short, long, default_value = "2000")]
        count: usize,
        #[clap(long, default_value = "0.1")]
        scale: f32,
    },
    /// A PLY or STL mesh
    Mesh { path: PathBuf },
}

fn ripple(size: usize) -> Result<(PointTable, PointTable)> {
    let mut rng = rand::thread_rng();
    let half = size as f64 / 2.0;
    let mut plain = Vec::with_capacity(size * size * 3);
    let mut colored = Vec::with_capacity(size * size * 6);

    for y in 0..size {
        for x in 0..size {
            let (x, y) = (x as f64, y as f64);
            let z = 10.0 * (0.1 * ((x - half).powi(2) + (y - half).powi(2)).sqrt()).cos();
            plain.extend_from_slice(&[x, y, z]);
            colored.extend_from_slice(&[
                x,
                y,
                z + 10.0,
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
            ]);
        }
    }

    Ok((PointTable::new(3, plain)?, PointTable::new(6, colored)?))
}

fn sphere_normals(count: usize) -> Result<(PointTable, PointTable)> {
    let mut rng = rand::thread_rng();
    let mut positions = Vec::with_capacity(count);
    let mut rows = Vec::with_capacity(count);
    while rows.len() < count {
        let v: [f64; 3] = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm < 1e-3 || norm > 1.0 {
            continue;
        }
        let n = [v[0] / norm, v[1] / norm, v[2] / norm];
        positions.push(n);
        rows.push([n[0], n[1], n[2], n[0], n[1], n[2]]);
    }
    Ok((PointTable::from_rows(&positions)?, PointTable::from_rows(&rows)?))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CommandLine::parse();

    let mut session = Session::create(ViewerConfig::default());
    match args.command {
        Command::Surface { size } => {
            let (plain, colored) = ripple(size)?;
            session.plot_xyz(&plain, 'r', false)?;
            session.plot_xyzrgb(&colored, true)?;
        }
        Command::Hedgehog { count, scale } => {
            let (points, hedgehog) = sphere_normals(count)?;
            session.plot_xyz(&points, 'y', false)?;
            session.plot_hedgehog(&hedgehog, scale, true)?;
        }
        Command::Mesh { path } => {
            session
                .plot_mesh_file(&path, false)
                .with_context(|| format!("loading {}", path.display()))?;
        }
    }

    let stats = if args.headless {
        session.shutdown()
    } else {
        Viewer::new(session).run()?
    };
    info!("{} actors, {} redraws", stats.actors, stats.redraws);
    Ok(())
}
