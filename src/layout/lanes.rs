//! Greedy lane packing for the segments of one task row.
//!
//! Segments are visited in `(start, end, id)` order and each takes the lowest
//! lane where none of its calendar days is already claimed. This is first-fit
//! interval colouring, so the result only depends on the set of segments and
//! not on the order they were created in.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{DateWindow, Segment};

/// Lane of every segment of a row plus the number of lanes in use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneLayout {
    /// Indexed like the input slice. `None` for segments that were not placed.
    lanes: Vec<Option<usize>>,
    lane_count: usize,
}

impl LaneLayout {
    pub fn lane(&self, index: usize) -> Option<usize> {
        self.lanes.get(index).copied().flatten()
    }

    pub fn lanes(&self) -> &[Option<usize>] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }
}

fn placement_order(a: &Segment, b: &Segment) -> Ordering {
    a.start_date
        .cmp(&b.start_date)
        .then(a.end_date.cmp(&b.end_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Assign lanes to `segments`.
///
/// Only segments intersecting `window` take part; a segment that is entirely
/// off the timeline gets no lane and does not grow the row. Participating
/// segments are packed by their full, unclipped span.
pub fn assign_lanes(segments: &[Segment], window: Option<DateWindow>) -> LaneLayout {
    let mut lanes = vec![None; segments.len()];
    let Some(window) = window else {
        return LaneLayout {
            lanes,
            lane_count: 0,
        };
    };

    let mut order: Vec<usize> = (0..segments.len())
        .filter(|&i| {
            let (start, end) = segments[i].span();
            window.intersects(start, end)
        })
        .collect();
    order.sort_by(|&a, &b| placement_order(&segments[a], &segments[b]));

    // Spans claimed on each lane so far.
    let mut occupied: Vec<Vec<(NaiveDate, NaiveDate)>> = Vec::new();
    for i in order {
        let (start, end) = segments[i].span();
        let lane = occupied
            .iter()
            .position(|spans| spans.iter().all(|&(s, e)| e < start || end < s))
            .unwrap_or(occupied.len());
        if lane == occupied.len() {
            occupied.push(Vec::new());
        }
        occupied[lane].push((start, end));
        lanes[i] = Some(lane);
    }

    LaneLayout {
        lanes,
        lane_count: occupied.len(),
    }
}
