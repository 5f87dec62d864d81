//! The sweep's event queue: a tagged sum type of Site/Vertex events with
//! lazy invalidation (spec.md §3 Event, §9 "Lazy event invalidation").
//!
//! Events are appended to a flat vector and never removed; cancelling an
//! event just flips its `active` flag. This avoids a decrease-key operation
//! on the priority structure and keeps `arc_id -> event index` stable. The
//! priority structure itself is keyed by `round(y)` as an integer so ties at
//! the same scan line group together, with insertion order breaking ties
//! within a group.

use std::cmp::Reverse;
use std::collections::HashMap;

use priority_queue::PriorityQueue;

use crate::beachline::{ArcId, SiteId};

#[derive(Clone, Copy, Debug)]
pub enum EventKind {
    Site(SiteId),
    /// The site of the arc whose collapse this vertex event anticipates.
    /// Not the arc id: several beachline arcs can share a site after splits,
    /// so the handler re-locates the actual collapsing arc by breakpoint
    /// coincidence (spec.md §4.1 vertex-event step 1) rather than trusting a
    /// stale arc id across events it didn't create.
    Vertex(SiteId),
}

pub struct EventRecord {
    pub y: f64,
    pub kind: EventKind,
    pub active: bool,
}

type Priority = Reverse<(i64, u64)>;

pub struct EventQueue {
    events: Vec<EventRecord>,
    heap: PriorityQueue<usize, Priority>,
    /// At most one active vertex event per arc (spec.md §3 invariant).
    arc_events: HashMap<ArcId, usize>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            heap: PriorityQueue::new(),
            arc_events: HashMap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, y: f64, kind: EventKind) -> usize {
        let idx = self.events.len();
        self.events.push(EventRecord {
            y,
            kind,
            active: true,
        });
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(idx, Reverse((y.round() as i64, seq)));
        idx
    }

    pub fn push_site_event(&mut self, site: SiteId, y: f64) {
        self.push(y, EventKind::Site(site));
    }

    /// Enqueue a vertex event anticipating `arc`'s collapse, recording it so
    /// a later `invalidate_vertex_event(arc)` can find and cancel it.
    pub fn push_vertex_event(&mut self, arc: ArcId, site: SiteId, y: f64) {
        let idx = self.push(y, EventKind::Vertex(site));
        self.arc_events.insert(arc, idx);
    }

    /// Mark `arc`'s pending vertex event (if any) inactive. It stays in the
    /// heap and is skipped when eventually popped.
    pub fn invalidate_vertex_event(&mut self, arc: ArcId) {
        if let Some(idx) = self.arc_events.remove(&arc) {
            self.events[idx].active = false;
        }
    }

    /// Pop the next active event, in ascending-y order (skipping any
    /// inactive ones lazily). Returns `(y, kind)`.
    pub fn pop(&mut self) -> Option<(f64, EventKind)> {
        loop {
            let (idx, _) = self.heap.pop()?;
            let record = &self.events[idx];
            if !record.active {
                continue;
            }
            return Some((record.y, record.kind));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
