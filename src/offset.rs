//! Polygon offset with self-intersection cleanup (spec.md §4.3), grounded in
//! `original_source/Geometry.cpp`'s `offset`/`intersect`/`windingDirection`.
//!
//! Three stages: extrude every edge along its right-hand normal into a
//! non-simple closed polyline, find and splice in every self-intersection as
//! a named junction vertex, then decompose the spliced polyline into
//! sub-loops by walking it and watching for revisited junctions, keeping
//! only the sub-loops whose winding matches the input.

use std::collections::HashMap;

use itertools::Itertools;

use crate::geometry::{self, Point, Polygon};

type Name = usize;

#[derive(Clone, Copy)]
struct NamedVertex {
    name: Name,
    p: Point,
}

#[derive(Clone, Copy)]
struct Crossing {
    name: Name,
    p: Point,
}

/// Offset `polygon` by `amount` along each edge's right-hand (clockwise)
/// normal. Positive `amount` inflates a counterclockwise polygon and shrinks
/// a clockwise one (spec.md §4.3).
pub fn offset(polygon: &Polygon, amount: f64) -> Polygon {
    if polygon.vertices.len() < 2 {
        return Polygon::default();
    }

    let extruded = extrude(polygon, amount);
    let buckets = find_intersections(&extruded);
    let spliced = splice_intersections(&extruded, &buckets);

    let original_winding = geometry::winding_direction(polygon);
    decompose(&spliced, original_winding)
}

fn extrude(polygon: &Polygon, amount: f64) -> Vec<NamedVertex> {
    let n = polygon.vertices.len();
    let mut list = Vec::with_capacity(2 * n);
    for (&v, &next) in polygon.vertices.iter().circular_tuple_windows() {
        let edge = next - v;
        let normal = if edge.length() == 0.0 {
            Point::default()
        } else {
            edge.rotate_cw().normalized()
        };
        let displacement = normal * amount;
        list.push(NamedVertex {
            name: list.len(),
            p: v + displacement,
        });
        list.push(NamedVertex {
            name: list.len(),
            p: next + displacement,
        });
    }
    list
}

fn segments_adjacent(i: usize, j: usize, len: usize) -> bool {
    (i + 1) % len == j || (j + 1) % len == i
}

/// Parametric segment intersection: `p1 + t*r == p2 + u*s` for `t, u` in
/// `[0, 1]`. Collinear and parallel segments (`rxs == 0`) are ignored.
fn segment_intersect(s1: [Point; 2], s2: [Point; 2]) -> Option<Point> {
    let (p1, q1, p2, q2) = (s1[0], s1[1], s2[0], s2[1]);
    let r = q1 - p1;
    let s = q2 - p2;
    let rxs = r.cross(s);
    if rxs == 0.0 {
        return None;
    }
    let qmp = p2 - p1;
    let t = qmp.cross(s) / rxs;
    let u = qmp.cross(r) / rxs;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

/// Find every pair of non-adjacent segments in the cyclic `list` that cross
/// in their interiors, and bucket each crossing under the starting vertex
/// name of both segments it was found on.
fn find_intersections(list: &[NamedVertex]) -> HashMap<Name, Vec<Crossing>> {
    let len = list.len();
    let mut buckets: HashMap<Name, Vec<Crossing>> = HashMap::new();
    let mut next_name = len;

    for i in 0..len {
        let s1 = [list[i].p, list[(i + 1) % len].p];
        for j in (i + 1)..len {
            if segments_adjacent(i, j, len) {
                continue;
            }
            let s2 = [list[j].p, list[(j + 1) % len].p];
            if let Some(p) = segment_intersect(s1, s2) {
                let name = next_name;
                next_name += 1;
                buckets.entry(list[i].name).or_default().push(Crossing { name, p });
                buckets.entry(list[j].name).or_default().push(Crossing { name, p });
            }
        }
    }
    buckets
}

/// Walk `list` in order; for every vertex with recorded crossings, sort them
/// by projection onto the outgoing edge (`dot(intersection - v, next - v)`,
/// ascending — the correct projection, see DESIGN.md's Open Question note)
/// and insert them immediately after `v`.
fn splice_intersections(list: &[NamedVertex], buckets: &HashMap<Name, Vec<Crossing>>) -> Vec<NamedVertex> {
    let len = list.len();
    let extra: usize = buckets.values().map(Vec::len).sum();
    let mut spliced = Vec::with_capacity(len + extra);

    for i in 0..len {
        let v = list[i];
        spliced.push(v);
        if let Some(crossings) = buckets.get(&v.name) {
            let next = list[(i + 1) % len].p;
            let mut sorted = crossings.clone();
            sorted.sort_by(|a, b| {
                let da = (a.p - v.p).dot(next - v.p);
                let db = (b.p - v.p).dot(next - v.p);
                da.partial_cmp(&db).unwrap()
            });
            for c in sorted {
                spliced.push(NamedVertex { name: c.name, p: c.p });
            }
        }
    }
    spliced
}

/// Walk the spliced cyclic list, tracking the currently-open run of
/// not-yet-closed vertices and the list position each name was first seen
/// at. A revisited name closes a sub-loop from its stored position to here;
/// that sub-loop is kept only if its winding matches `original_winding`
/// (spec.md §4.3 step 4). The closed span is then dropped from the open run
/// so the walk can keep extending whatever preceded it.
fn decompose(spliced: &[NamedVertex], original_winding: i32) -> Polygon {
    let len = spliced.len();
    if len == 0 {
        return Polygon::default();
    }

    let mut result = Vec::new();
    let mut run: Vec<Point> = Vec::new();
    let mut visited: HashMap<Name, usize> = HashMap::new();

    let max_steps = 2 * len;
    for step in 0..max_steps {
        let v = spliced[step % len];
        if let Some(&start_pos) = visited.get(&v.name) {
            let loop_vertices = run[start_pos..].to_vec();
            let loop_winding = geometry::winding_direction(&Polygon::new(loop_vertices.clone()));
            if loop_winding == original_winding {
                result.extend(loop_vertices);
            }
            run.truncate(start_pos);
            visited.retain(|_, pos| *pos < start_pos);
        } else {
            visited.insert(v.name, run.len());
            run.push(v.p);
        }
    }

    Polygon::new(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_cw() -> Polygon {
        // vertex order chosen so winding_direction reports -1 (clockwise)
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
    }

    #[test]
    fn unit_square_shrinks_inward() {
        let square = unit_square_cw();
        assert_eq!(geometry::winding_direction(&square), -1);
        let shrunk = offset(&square, 0.25);
        assert_eq!(geometry::winding_direction(&shrunk), -1);

        let xs: Vec<f64> = shrunk.vertices.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = shrunk.vertices.iter().map(|p| p.y).collect();
        let (min_x, max_x) = (xs.iter().cloned().fold(f64::MAX, f64::min), xs.iter().cloned().fold(f64::MIN, f64::max));
        let (min_y, max_y) = (ys.iter().cloned().fold(f64::MAX, f64::min), ys.iter().cloned().fold(f64::MIN, f64::max));
        assert_relative_eq!(min_x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(max_x, 0.75, epsilon = 1e-6);
        assert_relative_eq!(min_y, 0.25, epsilon = 1e-6);
        assert_relative_eq!(max_y, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn regular_heptagon_inflates_to_larger_radius() {
        let center = Point::new(400.0, 400.0);
        let radius = 250.0;
        let n = 7;
        let mut verts = Vec::with_capacity(n);
        for i in 0..n {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            verts.push(Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin()));
        }
        let heptagon = Polygon::new(verts);
        assert_eq!(geometry::winding_direction(&heptagon), 1);

        let inflated = offset(&heptagon, 75.0);
        assert_eq!(geometry::winding_direction(&inflated), 1);
        for v in &inflated.vertices {
            assert_relative_eq!(v.dist(center), 325.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_offset_is_congruent_to_input() {
        let square = unit_square_cw();
        let same = offset(&square, 0.0);
        for v in &square.vertices {
            assert!(same.vertices.iter().any(|p| geometry::point_eq(*p, *v, 1e-9)));
        }
    }

    #[test]
    fn empty_polygon_offsets_to_empty() {
        let empty = Polygon::default();
        assert!(offset(&empty, 5.0).vertices.is_empty());
    }

    #[test]
    fn offset_then_negative_offset_restores_convex_polygon() {
        let center = Point::new(400.0, 400.0);
        let radius = 250.0;
        let n = 7;
        let mut verts = Vec::with_capacity(n);
        for i in 0..n {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            verts.push(Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin()));
        }
        let heptagon = Polygon::new(verts);

        let d = 10.0;
        let inflated = offset(&heptagon, d);
        let restored = offset(&inflated, -d);

        assert_eq!(restored.vertices.len(), heptagon.vertices.len());
        for v in &heptagon.vertices {
            assert!(restored
                .vertices
                .iter()
                .any(|p| geometry::point_eq(*p, *v, 1e-6)));
        }
    }
}
