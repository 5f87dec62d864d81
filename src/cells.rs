//! The cell assembler (spec.md §4.2): groups finished Voronoi edges by their
//! two incident sites and stitches each group into a closed polygon.

use std::collections::HashMap;

use crate::beachline::SiteId;
use crate::builder::Segment;
use crate::geometry::{self, Polygon, Segment as FiniteSegment, STITCH_EPS};

/// Extract one polygon per site whose finished edges form a closed loop.
/// Sites on the diagram's unbounded boundary (whose bucket can't be fully
/// stitched into a single loop) are silently omitted, per spec.md §4.2 step
/// 2 and §7's "some cells may fail stitching."
pub fn get_polygons(segments: &[Segment]) -> Vec<Polygon> {
    let mut buckets: HashMap<SiteId, Vec<FiniteSegment>> = HashMap::new();
    for segment in segments {
        if let Some(finite) = segment.as_finite() {
            buckets.entry(segment.site1).or_default().push(finite);
            buckets.entry(segment.site2).or_default().push(finite);
        }
    }

    let mut polygons = Vec::new();
    for (_, mut bucket) in buckets {
        if bucket.len() <= 2 {
            continue;
        }
        if let Some(polygon) = stitch(&mut bucket) {
            polygons.push(polygon);
        }
    }
    polygons
}

/// Stitch a site's segment bucket into a closed polygon, consuming the
/// bucket. Returns `None` if the segments don't close into a single loop.
fn stitch(bucket: &mut Vec<FiniteSegment>) -> Option<Polygon> {
    let n = bucket.len();
    let first = bucket.remove(0);
    let mut vertex = first[1];
    let mut vertices = vec![vertex];

    for _ in 0..(n - 1) {
        let idx = bucket.iter().position(|seg| {
            geometry::point_eq(seg[0], vertex, STITCH_EPS) || geometry::point_eq(seg[1], vertex, STITCH_EPS)
        })?;
        let seg = bucket.remove(idx);
        vertex = if geometry::point_eq(seg[0], vertex, STITCH_EPS) {
            seg[1]
        } else {
            seg[0]
        };
        vertices.push(vertex);
    }

    if !bucket.is_empty() {
        return None;
    }

    let mut polygon = Polygon::new(vertices);
    if geometry::winding_direction(&polygon) < 0 {
        polygon.reverse();
    }
    Some(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_voronoi;
    use crate::geometry::Point;

    fn seg(a: Point, b: Point, site1: SiteId, site2: SiteId) -> Segment {
        Segment {
            a,
            b,
            finished: true,
            site1,
            site2,
        }
    }

    #[test]
    fn stitches_a_closed_triangle() {
        // site 0's cell bordered by sites 1, 2, 3 — a closed triangle.
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let p3 = Point::new(5.0, 10.0);
        let segments = vec![
            seg(p1, p2, 0, 1),
            seg(p2, p3, 0, 2),
            seg(p3, p1, 0, 3),
        ];
        let polygons = get_polygons(&segments);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertices.len(), 3);
        assert_eq!(geometry::winding_direction(&polygons[0]), 1);
    }

    #[test]
    fn clockwise_stitch_is_reversed_to_ccw() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(5.0, 10.0);
        let p3 = Point::new(10.0, 0.0);
        let segments = vec![
            seg(p1, p2, 0, 1),
            seg(p2, p3, 0, 2),
            seg(p3, p1, 0, 3),
        ];
        let polygons = get_polygons(&segments);
        assert_eq!(polygons.len(), 1);
        assert_eq!(geometry::winding_direction(&polygons[0]), 1);
    }

    #[test]
    fn unstitchable_bucket_is_discarded() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let p3 = Point::new(100.0, 100.0);
        let p4 = Point::new(200.0, 200.0);
        // site 0's bucket has a gap: segments don't close into one loop.
        let segments = vec![seg(p1, p2, 0, 1), seg(p3, p4, 0, 2)];
        assert!(get_polygons(&segments).is_empty());
    }

    #[test]
    fn small_buckets_never_form_cells() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let segments = vec![seg(p1, p2, 0, 1)];
        assert!(get_polygons(&segments).is_empty());
    }

    #[test]
    fn stitches_a_real_sweep_into_one_bounded_cell() {
        // A center site surrounded by N/S/E/W neighbors at equal distance
        // has a naturally bounded square cell (no bbox clipping needed);
        // the four neighbors' own cells stay unbounded and are omitted.
        let sites = vec![
            Point::new(200.0, 200.0),
            Point::new(200.0, 100.0),
            Point::new(300.0, 200.0),
            Point::new(200.0, 300.0),
            Point::new(100.0, 200.0),
        ];
        let diagram = build_voronoi(&sites);
        let polygons = get_polygons(diagram.segments());
        assert_eq!(polygons.len(), 1);

        let cell = &polygons[0];
        assert_eq!(cell.vertices.len(), 4);
        for expected in [
            Point::new(150.0, 150.0),
            Point::new(250.0, 150.0),
            Point::new(250.0, 250.0),
            Point::new(150.0, 250.0),
        ] {
            assert!(cell
                .vertices
                .iter()
                .any(|v| geometry::point_eq(*v, expected, 1e-6)));
        }
    }
}
