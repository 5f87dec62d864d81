//! CLI front end: load a site list, run the sweep, optionally clip
//! unfinished hull edges to a bounding box, and optionally offset every
//! extracted cell (SPEC_FULL.md §2).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use voronoi::builder::BoundingBox;
use voronoi::{build_voronoi, io, offset};

/// Build a Voronoi diagram from a site list and print the resulting cell
/// polygons, optionally offset by a signed amount.
#[derive(Parser)]
#[command(name = "voronoi-offset-cli")]
struct Cli {
    /// Path to a site-list file: one `<x> <y>` pair per line.
    path: PathBuf,

    /// Shrink (negative) or inflate (positive) every extracted cell by this amount.
    #[arg(long)]
    offset: Option<f64>,

    /// Clip unfinished hull edges to `x0 y0 x1 y1` before cell assembly.
    #[arg(long, num_args = 4, value_names = ["X0", "Y0", "X1", "Y1"])]
    bbox: Option<Vec<f64>>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let sites = match io::load_sites(&cli.path) {
        Ok(sites) => sites,
        Err(err) => {
            eprintln!("error loading {}: {err}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };
    info!("loaded {} sites from {}", sites.len(), cli.path.display());

    let mut diagram = build_voronoi(&sites);

    if let Some(bbox) = &cli.bbox {
        let [x0, y0, x1, y1] = [bbox[0], bbox[1], bbox[2], bbox[3]];
        diagram.close_unfinished_edges(BoundingBox::new(x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1)));
    }

    let mut polygons = diagram.polygons();
    info!("assembled {} cell polygons", polygons.len());

    if let Some(amount) = cli.offset {
        polygons = polygons.iter().map(|p| offset(p, amount)).collect();
    }

    for polygon in &polygons {
        let coords: Vec<String> = polygon
            .vertices
            .iter()
            .map(|p| format!("{} {}", p.x, p.y))
            .collect();
        println!("{}", coords.join(" "));
    }

    ExitCode::SUCCESS
}
