//! Fortune's sweep-line Voronoi builder (spec.md §4.1).

use log::{debug, trace};

use crate::beachline::{ArcId, Beachline, SiteId};
use crate::cells;
use crate::events::{EventKind, EventQueue};
use crate::geometry::{self, Point, Polygon, Segment as FiniteSegment};

/// A Voronoi edge under construction. Created with only `a` known; `b` is
/// assigned exactly once, when the segment is finished (spec.md §3).
#[derive(Clone, Debug)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
    pub finished: bool,
    pub site1: SiteId,
    pub site2: SiteId,
}

impl Segment {
    fn new(a: Point, site1: SiteId, site2: SiteId) -> Self {
        Self {
            a,
            b: Point::default(),
            finished: false,
            site1,
            site2,
        }
    }

    fn finish(&mut self, b: Point) {
        debug_assert!(!self.finished, "segment finished twice");
        self.b = b;
        self.finished = true;
    }

    pub fn as_finite(&self) -> Option<FiniteSegment> {
        self.finished.then_some([self.a, self.b])
    }
}

/// An axis-aligned clipping window used to close edges that would otherwise
/// run to infinity (see `SPEC_FULL.md` §3 — a capability the teacher's
/// `extend_edges_to_bounding_box` contributes, absent from the distilled
/// `original_source` state machine).
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Clip a ray starting at `origin` heading away from `away_from` (the
    /// direction perpendicular to the two sites it separates) to the box.
    fn clip_ray(&self, origin: Point, direction: Point) -> Point {
        let cx = if direction.x == 0.0 {
            f64::INFINITY
        } else if direction.x < 0.0 {
            (self.x_min - origin.x) / direction.x
        } else {
            (self.x_max - origin.x) / direction.x
        };
        let cy = if direction.y == 0.0 {
            f64::INFINITY
        } else if direction.y < 0.0 {
            (self.y_min - origin.y) / direction.y
        } else {
            (self.y_max - origin.y) / direction.y
        };
        let c = cx.min(cy);
        Point::new(origin.x + c * direction.x, origin.y + c * direction.y)
    }
}

/// Owns the beachline, event queue, and output segment buffer for one
/// Fortune sweep run.
pub struct VoronoiDiagram {
    sites: Vec<Point>,
    beachline: Beachline,
    events: EventQueue,
    pub segments: Vec<Segment>,
    sweep_y: f64,
}

impl VoronoiDiagram {
    /// `sites` must already be sorted by ascending y; ids are dense `[0, N)`
    /// in that order (spec.md §4.1 Construction). Callers that cannot
    /// guarantee this should use `build_voronoi`, which sorts and renumbers
    /// for them.
    pub fn new(sites: Vec<Point>) -> Self {
        let mut events = EventQueue::new();
        for (id, site) in sites.iter().enumerate() {
            events.push_site_event(id, site.y);
        }
        Self {
            sites,
            beachline: Beachline::new(),
            events,
            segments: Vec::new(),
            sweep_y: 0.0,
        }
    }

    /// Services exactly one effective event (Site or active Vertex).
    /// Returns `false` once the queue is exhausted.
    pub fn step(&mut self) -> bool {
        loop {
            let (y, kind) = match self.events.pop() {
                Some(e) => e,
                None => return false,
            };
            self.sweep_y = y;
            match kind {
                EventKind::Site(site) => {
                    self.handle_site_event(site);
                    return true;
                }
                EventKind::Vertex(site) => {
                    if self.handle_vertex_event(site) {
                        return true;
                    }
                    // stale vertex event: keep draining the queue
                }
            }
        }
    }

    pub fn run(&mut self) {
        while self.step() {}
    }

    fn push_segment(&mut self, origin: Point, site1: SiteId, site2: SiteId) -> usize {
        let id = self.segments.len();
        self.segments.push(Segment::new(origin, site1, site2));
        id
    }

    fn handle_site_event(&mut self, site: SiteId) {
        debug!("handling site event, site: {site}");
        let location = self.sites[site];

        let Some(arc) = self.beachline.find_arc_above(location, self.sweep_y) else {
            self.beachline.add_first_arc(site, location);
            return;
        };

        let intersection =
            geometry::parabola_intersect(self.beachline.arc(arc).location, location, self.sweep_y);

        self.events.invalidate_vertex_event(arc);

        let (a, b, c) = self.beachline.split_arc(arc, site, location);

        let ab = self.push_segment(intersection, self.beachline.arc(a).site, site);
        let bc = self.push_segment(intersection, site, self.beachline.arc(c).site);
        self.beachline.arc_mut(a).s2 = Some(ab);
        self.beachline.arc_mut(b).s1 = Some(ab);
        self.beachline.arc_mut(b).s2 = Some(bc);
        self.beachline.arc_mut(c).s1 = Some(bc);

        self.check_vertex_event(a);
        self.check_vertex_event(c);
    }

    /// Returns `true` if a valid arc collapsed and progress was made; `false`
    /// if the event was stale and should be silently discarded (spec.md
    /// §4.1 vertex-event step 1/2, §7 failure semantics).
    fn handle_vertex_event(&mut self, site: SiteId) -> bool {
        trace!("handling vertex event, site: {site}");

        let Some(arc) = self.relocate_collapsing_arc(site) else {
            trace!("did not find arc for vertex event, site: {site}");
            return false;
        };

        // relocate_collapsing_arc already required `arc` itself not be a
        // boundary arc, so these are always present.
        let prev = self.beachline.left_neighbor(arc).unwrap();
        let next = self.beachline.right_neighbor(arc).unwrap();

        // P or N itself being a boundary arc means this circle event is no
        // longer valid (spec.md §4.1 vertex-event step 2).
        if self.beachline.left_neighbor(prev).is_none() || self.beachline.right_neighbor(next).is_none() {
            return false;
        }

        let cc = geometry::circumcircle(
            self.beachline.arc(prev).location,
            self.beachline.arc(arc).location,
            self.beachline.arc(next).location,
        );
        let vertex = cc.origin;

        let s1 = self.beachline.arc(arc).s1;
        let s2 = self.beachline.arc(arc).s2;
        if let Some(s1) = s1 {
            self.segments[s1].finish(vertex);
        }
        if let Some(s2) = s2 {
            self.segments[s2].finish(vertex);
        }

        let new_seg = self.push_segment(vertex, self.beachline.arc(prev).site, self.beachline.arc(next).site);
        self.beachline.arc_mut(prev).s2 = Some(new_seg);
        self.beachline.arc_mut(next).s1 = Some(new_seg);

        self.events.invalidate_vertex_event(arc);
        self.beachline.remove(arc);

        self.check_vertex_event(prev);
        self.check_vertex_event(next);

        true
    }

    /// Scan for an arc of `site` whose left and right breakpoints coincide
    /// within ε² at the current sweep line — the arc this vertex event
    /// actually refers to (spec.md §4.1 vertex-event step 1).
    fn relocate_collapsing_arc(&self, site: SiteId) -> Option<ArcId> {
        let mut curr = self.beachline.head();
        while let Some(id) = curr {
            let arc = self.beachline.arc(id);
            if arc.site == site && !self.beachline.is_boundary(id) {
                let prev = self.beachline.left_neighbor(id).unwrap();
                let next = self.beachline.right_neighbor(id).unwrap();
                let bp1 = geometry::breakpoint(self.beachline.arc(prev).location, arc.location, self.sweep_y);
                let bp2 = geometry::breakpoint(arc.location, self.beachline.arc(next).location, self.sweep_y);
                if bp1.dist_sqr(bp2) < geometry::BREAKPOINT_EPS_SQ {
                    return Some(id);
                }
            }
            curr = self.beachline.right_neighbor(id);
        }
        None
    }

    /// Clear any existing vertex event on `arc`; enqueue a fresh one if the
    /// arc's left/right neighbors converge to a circle whose lowest point is
    /// still ahead of the sweep line (spec.md §4.1 checkVertexEvent).
    fn check_vertex_event(&mut self, arc: ArcId) {
        self.events.invalidate_vertex_event(arc);

        if self.beachline.is_boundary(arc) {
            return;
        }
        let prev = self.beachline.left_neighbor(arc).unwrap();
        let next = self.beachline.right_neighbor(arc).unwrap();
        if self.beachline.arc(prev).site == self.beachline.arc(next).site {
            return;
        }

        let cc = geometry::circumcircle(
            self.beachline.arc(prev).location,
            self.beachline.arc(arc).location,
            self.beachline.arc(next).location,
        );
        if cc.origin.x.is_nan() || cc.origin.y.is_nan() {
            // collinear triple; circumcircle degenerates, no event.
            return;
        }
        let lowest = geometry::lowest_point(&cc);
        if lowest.y < self.sweep_y {
            return;
        }

        let site = self.beachline.arc(arc).site;
        trace!("adding vertex event on arc {arc}; lowest y: {}", lowest.y);
        self.events.push_vertex_event(arc, site, lowest.y);
    }

    /// Clip every still-unfinished segment's open end to `bbox`, turning the
    /// diagram's convex-hull rays into closed segments so `get_polygons`
    /// can stitch hull-adjacent cells too (SPEC_FULL.md §3).
    pub fn close_unfinished_edges(&mut self, bbox: BoundingBox) {
        for segment in self.segments.iter_mut() {
            if segment.finished {
                continue;
            }
            let (site1, site2) = (self.sites[segment.site1], self.sites[segment.site2]);
            let direction = (site2 - site1).rotate_cw();
            let direction = if direction.length() == 0.0 {
                direction
            } else {
                direction.normalized()
            };
            let end = bbox.clip_ray(segment.a, direction);
            segment.finish(end);
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Group this diagram's finished edges into closed cell polygons
    /// (spec.md §6's "diagram exposes finished edges and extracted cell
    /// polygons"). Cells that can't be stitched into a single closed loop —
    /// typically the unbounded cells on the hull, unless `close_unfinished_edges`
    /// ran first — are omitted.
    pub fn polygons(&self) -> Vec<Polygon> {
        cells::get_polygons(&self.segments)
    }
}

/// Sorts `sites` by ascending y (spec.md §4.1 requires this of the builder;
/// callers that hand the builder pre-sorted, pre-numbered sites can
/// construct `VoronoiDiagram::new` directly instead).
pub fn build_voronoi(sites: &[Point]) -> VoronoiDiagram {
    let mut sorted = sites.to_vec();
    sorted.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    let mut diagram = VoronoiDiagram::new(sorted);
    diagram.run();
    diagram
}
