//! Gravel CLI - geodesic Voronoi remeshing tool.
//!
//! Usage: gravel <INPUT> <SAMPLES> [-o OUT] [-r] [-e], or gravel -f config.json
//!
//! Run `gravel --help` for details.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use nalgebra::Point3;
use serde::Deserialize;

use gravel::algo::dual::{dual_mesh, reorient_faces, CoarseMesh};
use gravel::algo::evaluate::{evaluate, rescale_to_unit_box};
use gravel::algo::resample::{max_edge_length, resample};
use gravel::algo::sampling::voronoi_fps_with_progress;
use gravel::algo::weights::weight_map_with_progress;
use gravel::algo::Progress;
use gravel::graph::SurfaceGraph;
use gravel::io;

#[derive(Parser)]
#[command(name = "gravel")]
#[command(author, version, about = "Geodesic Voronoi remeshing CLI", long_about = None)]
struct Cli {
    /// Input mesh file (OBJ or OFF)
    #[arg(required_unless_present = "config")]
    input: Option<PathBuf>,

    /// Target number of coarse vertices
    #[arg(required_unless_present = "config")]
    samples: Option<usize>,

    /// Output mesh file (default: input file name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Split long input edges before sampling for a more uniform result
    #[arg(short, long)]
    resample: bool,

    /// Report Hausdorff/Chamfer distances and triangle quality statistics
    #[arg(short, long)]
    evaluate: bool,

    /// Read all arguments from a JSON configuration file
    #[arg(short = 'f', long = "file", conflicts_with_all = ["input", "samples", "output", "resample", "evaluate"])]
    config: Option<PathBuf>,
}

/// JSON configuration file contents.
///
/// `input_mesh` and `num_samples` are required; the rest default to the
/// same values as their command-line counterparts.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RemeshConfig {
    input_mesh: PathBuf,
    num_samples: usize,
    out_mesh: Option<PathBuf>,
    #[serde(default)]
    resampling: bool,
    #[serde(default)]
    evaluate: bool,
}

struct Job {
    input: PathBuf,
    output: PathBuf,
    samples: usize,
    resample: bool,
    evaluate: bool,
}

fn main() {
    let cli = Cli::parse();

    let job = match resolve_job(cli) {
        Ok(job) => job,
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&job) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_job(cli: Cli) -> Result<Job, String> {
    let (input, samples, output, resample, evaluate) = match cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            let config: RemeshConfig = serde_json::from_str(&text)
                .map_err(|e| format!("invalid configuration {}: {}", path.display(), e))?;
            (
                config.input_mesh,
                config.num_samples,
                config.out_mesh,
                config.resampling,
                config.evaluate,
            )
        }
        None => (
            cli.input.expect("clap enforces input"),
            cli.samples.expect("clap enforces samples"),
            cli.output,
            cli.resample,
            cli.evaluate,
        ),
    };

    if samples == 0 {
        return Err("number of samples must be at least 1".to_string());
    }

    // Default output: the input's file name, in the current directory.
    let output = output.unwrap_or_else(|| {
        input
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("out.obj"))
    });

    Ok(Job {
        input,
        output,
        samples,
        resample,
        evaluate,
    })
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Parallel stages report out of order; only ever move forward.
        let (percent, increased) = loop {
            let old_max = max_percent.load(Ordering::Relaxed);
            let new_max = old_max.max(raw_percent);
            if new_max == old_max {
                break (old_max, false);
            }
            match max_percent.compare_exchange_weak(
                old_max,
                new_max,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break (new_max, true),
                Err(_) => continue,
            }
        };

        if !increased && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar: String = "=".repeat(filled);
        let space: String = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn run(job: &Job) -> Result<(), Box<dyn std::error::Error>> {
    let total_start = Instant::now();

    let start = Instant::now();
    let (mut points, mut triangles) = io::load(&job.input)?;
    println!(
        "Loaded {}: {} vertices, {} triangles ({:.2?})",
        job.input.display(),
        points.len(),
        triangles.len(),
        start.elapsed()
    );

    let n_orig = points.len();
    let original_triangles = triangles.clone();

    if job.resample {
        let start = Instant::now();
        let bound = max_edge_length(&points, &triangles, job.samples)?;
        resample(&mut points, &mut triangles, bound)?;
        println!(
            "Resampled to max edge length {:.6}: {} vertices, {} triangles ({:.2?})",
            bound,
            points.len(),
            triangles.len(),
            start.elapsed()
        );
    }

    let start = Instant::now();
    let graph = SurfaceGraph::from_triangles(&points, &triangles)?;
    println!(
        "Built surface graph: {} edges ({:.2?})",
        graph.num_edges(),
        start.elapsed()
    );
    println!("Connected components: {}", graph.num_components());

    let start = Instant::now();
    let progress = create_progress();
    let sampling = voronoi_fps_with_progress(&graph, job.samples, &progress)?;
    if sampling.num_seeds() < job.samples {
        println!(
            "Sampling saturated at {} of {} requested vertices",
            sampling.num_seeds(),
            job.samples
        );
    }

    let mut coarse = dual_mesh(&graph, &sampling, &triangles)?;
    reorient_faces(&mut coarse, &points, &triangles, sampling.partition())?;
    println!(
        "Remeshed to {} vertices, {} triangles ({:.2?})",
        coarse.num_vertices(),
        coarse.num_triangles(),
        start.elapsed()
    );

    let start = Instant::now();
    io::save(&job.output, &coarse.points, &coarse.triangles)?;
    println!("Saved {} ({:.2?})", job.output.display(), start.elapsed());

    if coarse.triangles.is_empty() {
        println!(
            "Sampling density is not enough to capture any face. \
             Maybe there are too many connected components?"
        );
        return Ok(());
    }

    let start = Instant::now();
    let progress = create_progress();
    let weights = weight_map_with_progress(&points, &coarse, n_orig, &progress)?;
    let weights_path = job.output.with_extension("mtx");
    io::matrix::save_matrix_market(&weights_path, &weights)?;
    println!(
        "Saved weight map {} ({} x {}, {} non-zeros, {:.2?})",
        weights_path.display(),
        weights.rows(),
        weights.cols(),
        weights.nnz(),
        start.elapsed()
    );

    if job.evaluate {
        let start = Instant::now();
        print_metrics(&points, n_orig, &original_triangles, &coarse)?;
        println!("Evaluated ({:.2?})", start.elapsed());
    }

    println!("Total time: {:.2?}", total_start.elapsed());
    Ok(())
}

fn print_metrics(
    points: &[Point3<f64>],
    n_orig: usize,
    original_triangles: &[[usize; 3]],
    coarse: &CoarseMesh,
) -> Result<(), Box<dyn std::error::Error>> {
    // Compare inside the unit box so numbers are model-independent. Only
    // the pre-resampling vertices carry the original triangulation.
    let mut orig_points = points[..n_orig].to_vec();
    let mut coarse_points = coarse.points.clone();
    rescale_to_unit_box(&mut orig_points);
    rescale_to_unit_box(&mut coarse_points);

    let metrics = evaluate(
        &orig_points,
        original_triangles,
        &coarse_points,
        &coarse.triangles,
    )?;

    println!("Hausdorff distance: {:.6}", metrics.hausdorff);
    println!("Chamfer distance:   {:.6}", metrics.chamfer);
    println!("Triangle area:");
    println!("    Min: {:.6}", metrics.min_area);
    println!("    Max: {:.6}", metrics.max_area);
    println!("    Avg: {:.6}", metrics.avg_area);
    println!("    Std: {:.6}", metrics.std_area);
    println!("Triangle quality:");
    println!("    Min: {:.6}", metrics.min_quality);
    println!("    Max: {:.6}", metrics.max_quality);
    println!("    Avg: {:.6}", metrics.avg_quality);
    println!("    Std: {:.6}", metrics.std_quality);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let config: RemeshConfig = serde_json::from_str(
            r#"{
                "input_mesh": "bunny.obj",
                "num_samples": 500,
                "resampling": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.input_mesh, PathBuf::from("bunny.obj"));
        assert_eq!(config.num_samples, 500);
        assert!(config.resampling);
        assert!(!config.evaluate);
        assert!(config.out_mesh.is_none());
    }

    #[test]
    fn test_config_rejects_unknown_and_missing_fields() {
        assert!(serde_json::from_str::<RemeshConfig>(r#"{"num_samples": 5}"#).is_err());
        assert!(serde_json::from_str::<RemeshConfig>(
            r#"{"input_mesh": "a.obj", "num_samples": 5, "typo": 1}"#
        )
        .is_err());
    }

    #[test]
    fn test_default_output_is_input_file_name() {
        let job = resolve_job(Cli {
            input: Some(PathBuf::from("/meshes/bunny.obj")),
            samples: Some(100),
            output: None,
            resample: false,
            evaluate: false,
            config: None,
        })
        .unwrap();

        assert_eq!(job.output, PathBuf::from("bunny.obj"));
        assert_eq!(job.samples, 100);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = resolve_job(Cli {
            input: Some(PathBuf::from("a.obj")),
            samples: Some(0),
            output: None,
            resample: false,
            evaluate: false,
            config: None,
        });
        assert!(result.is_err());
    }
}
