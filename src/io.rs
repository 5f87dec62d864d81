//! Site-list load/save (spec.md §6): plain ASCII, one `<x> <y>` pair per
//! line, no header and no comments. Site ids are assigned densely in file
//! order, so the Nth line becomes site N-1.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::error::VoronoiError;
use crate::geometry::Point;

/// Parse a site list from `path`. Blank lines are skipped; anything else
/// that doesn't parse as two whitespace-separated floats is an error.
pub fn load_sites(path: &Path) -> Result<Vec<Point>, VoronoiError> {
    let contents = fs::read_to_string(path)?;
    let mut sites = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(VoronoiError::InvalidSiteLine {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
            return Err(VoronoiError::InvalidSiteLine {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        sites.push(Point::new(x, y));
    }
    Ok(sites)
}

/// Write a site list in the same format `load_sites` reads, one line per
/// site in order.
pub fn save_sites(path: &Path, sites: &[Point]) -> Result<(), VoronoiError> {
    let mut file = fs::File::create(path)?;
    for site in sites {
        writeln!(file, "{} {}", site.x, site.y)?;
    }
    Ok(())
}
