//! The beachline: an ordered, doubly-linked sequence of parabolic arcs,
//! addressed by stable per-node identity so that references into it (held by
//! pending vertex events) survive insertions and deletions of *other* arcs.
//!
//! Modeled as an arena keyed by monotonically increasing `ArcId` rather than
//! vector position, per spec.md §5's iterator-stability requirement — a
//! vector index would be invalidated by removing an earlier element, an
//! arc id never is.

use std::collections::HashMap;

use crate::geometry::{self, Point};

pub type ArcId = usize;
pub type SegmentId = usize;
pub type SiteId = usize;

/// One continuous piece of the beachline contributed by a single site.
#[derive(Clone, Debug)]
pub struct Arc {
    pub id: ArcId,
    pub site: SiteId,
    pub location: Point,
    pub s1: Option<SegmentId>,
    pub s2: Option<SegmentId>,
}

struct Node {
    arc: Arc,
    prev: Option<ArcId>,
    next: Option<ArcId>,
}

pub struct Beachline {
    nodes: HashMap<ArcId, Node>,
    head: Option<ArcId>,
    tail: Option<ArcId>,
    next_id: ArcId,
}

impl Beachline {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            head: None,
            tail: None,
            next_id: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<ArcId> {
        self.head
    }

    fn alloc_id(&mut self) -> ArcId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.nodes[&id].arc
    }

    pub fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.nodes.get_mut(&id).unwrap().arc
    }

    pub fn left_neighbor(&self, id: ArcId) -> Option<ArcId> {
        self.nodes[&id].prev
    }

    pub fn right_neighbor(&self, id: ArcId) -> Option<ArcId> {
        self.nodes[&id].next
    }

    /// A boundary arc (no left or no right neighbor) cannot host a vertex
    /// event, per spec.md §3's Beachline invariant.
    pub fn is_boundary(&self, id: ArcId) -> bool {
        self.left_neighbor(id).is_none() || self.right_neighbor(id).is_none()
    }

    pub fn add_first_arc(&mut self, site: SiteId, location: Point) -> ArcId {
        assert!(self.is_empty(), "beachline already has a first arc");
        let id = self.alloc_id();
        self.nodes.insert(
            id,
            Node {
                arc: Arc {
                    id,
                    site,
                    location,
                    s1: None,
                    s2: None,
                },
                prev: None,
                next: None,
            },
        );
        self.head = Some(id);
        self.tail = Some(id);
        id
    }

    /// Linear scan left-to-right for the arc currently above `p`: the first
    /// arc whose right breakpoint with its neighbor exceeds `p.x`, or the
    /// last arc if none does. O(beachline size), acceptable since the
    /// beachline is typically O(sqrt(N)) (spec.md §4.1).
    pub fn find_arc_above(&self, p: Point, sweep_y: f64) -> Option<ArcId> {
        let mut curr = self.head?;
        loop {
            match self.right_neighbor(curr) {
                Some(next) => {
                    let bp =
                        geometry::breakpoint(self.arc(curr).location, self.arc(next).location, sweep_y);
                    if p.x < bp.x {
                        return Some(curr);
                    }
                    curr = next;
                }
                None => return Some(curr),
            }
        }
    }

    /// Split `arc_idx` into three arcs `(a, b, c)`: `a` and `c` share the old
    /// arc's site/location, `b` carries the new site. `a` inherits the old
    /// arc's `s1`, `c` inherits its `s2`. Returns the new arc ids in left-to-
    /// right order. The caller is responsible for creating the two new
    /// segments and wiring `a.s2`/`b.s1`/`b.s2`/`c.s1`.
    pub fn split_arc(
        &mut self,
        arc_idx: ArcId,
        new_site: SiteId,
        new_location: Point,
    ) -> (ArcId, ArcId, ArcId) {
        let old = self.nodes.remove(&arc_idx).expect("split_arc: unknown arc");
        let prev = old.prev;
        let next = old.next;
        let old_arc = old.arc;

        let a_id = self.alloc_id();
        let b_id = self.alloc_id();
        let c_id = self.alloc_id();

        self.nodes.insert(
            a_id,
            Node {
                arc: Arc {
                    id: a_id,
                    site: old_arc.site,
                    location: old_arc.location,
                    s1: old_arc.s1,
                    s2: None,
                },
                prev,
                next: Some(b_id),
            },
        );
        self.nodes.insert(
            b_id,
            Node {
                arc: Arc {
                    id: b_id,
                    site: new_site,
                    location: new_location,
                    s1: None,
                    s2: None,
                },
                prev: Some(a_id),
                next: Some(c_id),
            },
        );
        self.nodes.insert(
            c_id,
            Node {
                arc: Arc {
                    id: c_id,
                    site: old_arc.site,
                    location: old_arc.location,
                    s1: None,
                    s2: old_arc.s2,
                },
                prev: Some(b_id),
                next,
            },
        );

        match prev {
            Some(p) => self.nodes.get_mut(&p).unwrap().next = Some(a_id),
            None => self.head = Some(a_id),
        }
        match next {
            Some(n) => self.nodes.get_mut(&n).unwrap().prev = Some(c_id),
            None => self.tail = Some(c_id),
        }

        (a_id, b_id, c_id)
    }

    /// Remove a collapsed arc, splicing its neighbors together.
    pub fn remove(&mut self, arc_idx: ArcId) -> Arc {
        let node = self.nodes.remove(&arc_idx).expect("remove: unknown arc");
        match node.prev {
            Some(p) => self.nodes.get_mut(&p).unwrap().next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes.get_mut(&n).unwrap().prev = node.prev,
            None => self.tail = node.prev,
        }
        node.arc
    }

    #[cfg(test)]
    pub fn to_vec(&self) -> Vec<ArcId> {
        let mut out = vec![];
        let mut curr = self.head;
        while let Some(id) = curr {
            out.push(id);
            curr = self.right_neighbor(id);
        }
        out
    }
}

impl Default for Beachline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_arc_has_no_neighbors() {
        let mut bl = Beachline::new();
        let id = bl.add_first_arc(0, Point::new(0.0, 0.0));
        assert!(bl.is_boundary(id));
        assert_eq!(bl.left_neighbor(id), None);
        assert_eq!(bl.right_neighbor(id), None);
    }

    #[test]
    fn split_preserves_order_and_inheritance() {
        let mut bl = Beachline::new();
        let arc = bl.add_first_arc(0, Point::new(100.0, 100.0));
        bl.arc_mut(arc).s1 = Some(7);
        bl.arc_mut(arc).s2 = Some(9);

        let (a, b, c) = bl.split_arc(arc, 1, Point::new(150.0, 300.0));
        assert_eq!(bl.to_vec(), vec![a, b, c]);
        assert_eq!(bl.arc(a).s1, Some(7));
        assert_eq!(bl.arc(a).s2, None);
        assert_eq!(bl.arc(c).s2, Some(9));
        assert_eq!(bl.arc(c).s1, None);
        assert_eq!(bl.arc(b).site, 1);
        assert_eq!(bl.left_neighbor(b), Some(a));
        assert_eq!(bl.right_neighbor(b), Some(c));
    }

    #[test]
    fn remove_splices_neighbors() {
        let mut bl = Beachline::new();
        let arc = bl.add_first_arc(0, Point::new(100.0, 100.0));
        let (a, b, c) = bl.split_arc(arc, 1, Point::new(150.0, 300.0));
        bl.remove(b);
        assert_eq!(bl.to_vec(), vec![a, c]);
        assert_eq!(bl.right_neighbor(a), Some(c));
        assert_eq!(bl.left_neighbor(c), Some(a));
    }
}
