//! Holetrim CLI - trims the two arm holes of a surface mesh.
//!
//! Usage: holetrim [OPTIONS] <SURFACE> <ATTRIBUTED> <OUTPUT>
//!
//! The faces removed from SURFACE are removed from ATTRIBUTED as well,
//! matching faces by the order they appear in the files, and the result is
//! written to OUTPUT.

use std::path::PathBuf;

use clap::Parser;

use holetrim::{FaceSoup, PipelineConfig, PolyMesh, trim_arm_holes};

#[derive(Parser)]
#[command(name = "holetrim")]
#[command(author, version, about = "Trim the arm holes of a surface mesh", long_about = None)]
struct Cli {
    /// Surface mesh with the holes to trim (.off or .obj)
    surface: PathBuf,

    /// OBJ mesh with the same faces as the surface, in the same order
    attributed: PathBuf,

    /// Output OBJ file for the trimmed attributed mesh
    output: PathBuf,

    /// Smoothing passes applied to the holes before estimating cutoffs
    #[arg(long, default_value = "10")]
    smoothing_iterations: usize,

    /// Number of the largest holes to pick the arm holes from
    #[arg(long, default_value = "4")]
    candidates: usize,

    /// Portion of each hole scanned for the cutoff (0.0 to 1.0)
    #[arg(long, default_value = "0.3")]
    fraction: f64,

    /// Give up trimming a hole after this many rounds
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Also write the trimmed surface to this OBJ file
    #[arg(long)]
    trimmed_surface: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::default()
        .with_smoothing_iterations(cli.smoothing_iterations)
        .with_candidates(cli.candidates)
        .with_fraction(cli.fraction);
    if let Some(max_rounds) = cli.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }

    let mut mesh = PolyMesh::load(&cli.surface)?;
    println!(
        "Loaded {}: {} vertices, {} faces",
        cli.surface.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );

    let report = trim_arm_holes(&mut mesh, &config)?;
    println!("Boundary loops: {}", report.loops_found);
    println!(
        "Cutoff left: {} ({} faces removed)",
        report.left.cutoff.height,
        report.left.removed.len()
    );
    println!(
        "Cutoff right: {} ({} faces removed)",
        report.right.cutoff.height,
        report.right.removed.len()
    );

    if let Some(path) = &cli.trimmed_surface {
        mesh.write_obj(path)?;
        println!("Wrote trimmed surface to {}", path.display());
    }

    let mut soup = FaceSoup::load_obj(&cli.attributed)?;
    let removed = soup.remove_faces(&report.removed_set());
    if removed != report.removed_ids().len() {
        log::warn!(
            "{} faces were removed from the surface, but only {} of them exist in {}",
            report.removed_ids().len(),
            removed,
            cli.attributed.display()
        );
    }
    soup.write_obj(&cli.output)?;
    println!(
        "Wrote {} faces to {}",
        soup.num_faces(),
        cli.output.display()
    );
    Ok(())
}
