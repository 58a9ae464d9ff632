//! Projection of segments onto pixel space. Coordinates are relative to the
//! top-left corner of the task row.

use chrono::NaiveDate;
use egui::{pos2, Pos2, Rect};

use super::lanes::assign_lanes;
use super::metrics::ChartMetrics;
use super::totals::format_value;
use crate::model::{Segment, Task, Timeline};

/// An endpoint or point marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Pos2,
    pub done: bool,
}

/// Slot for a per-day effort value; `text` is set when a value exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMarker {
    pub date: NaiveDate,
    pub pos: Pos2,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLabel {
    pub pos: Pos2,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentShape {
    Point(Marker),
    Range {
        bar: Rect,
        start: Marker,
        end: Marker,
        /// Completed part of the bar.
        progress: Option<Rect>,
    },
}

/// Everything needed to draw one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGeometry {
    pub lane: usize,
    pub top: f32,
    pub shape: SegmentShape,
    pub values: Vec<ValueMarker>,
    pub label: Option<SegmentLabel>,
}

impl SegmentGeometry {
    /// Area that reacts to clicks on the segment itself.
    pub fn hit_rect(&self, metrics: &ChartMetrics) -> Rect {
        let radius = metrics.cell_width / 2.0;
        match &self.shape {
            SegmentShape::Point(marker) => Rect::from_center_size(
                marker.center,
                egui::vec2(radius * 2.0, metrics.bar_thickness * 2.0),
            ),
            SegmentShape::Range { bar, .. } => bar.expand2(egui::vec2(radius / 2.0, metrics.bar_thickness / 2.0)),
        }
    }
}

/// Project `segment` placed on `lane`. `None` when nothing of it is on the
/// timeline.
pub fn project_segment(
    segment: &Segment,
    lane: usize,
    timeline: &Timeline,
    metrics: &ChartMetrics,
) -> Option<SegmentGeometry> {
    let top = metrics.lane_top(lane);
    let x = |i: usize| metrics.column_center(i);

    let (shape, x_start, x_end) = if segment.is_point() {
        let index = timeline.index_of(segment.start_date)?;
        let marker = Marker {
            center: pos2(x(index), top),
            done: segment.is_done_at(segment.start_date),
        };
        (SegmentShape::Point(marker), x(index), x(index))
    } else {
        let (visible_start, visible_end) = timeline
            .window()?
            .clip(segment.start_date, segment.end_date)?;
        let first = timeline.index_of(visible_start)?;
        let last = timeline.index_of(visible_end)?;
        let (sx, ex) = (x(first), x(last));
        let half = metrics.bar_thickness / 2.0;
        let bar = Rect::from_min_max(
            pos2(sx.min(ex), top - half),
            pos2(sx.min(ex) + (sx - ex).abs().max(1.0), top + half),
        );
        let shape = SegmentShape::Range {
            bar,
            start: Marker {
                center: pos2(sx, top),
                done: segment.is_done_at(segment.start_date),
            },
            end: Marker {
                center: pos2(ex, top),
                done: segment.is_done_at(segment.end_date),
            },
            progress: progress_rect(segment, timeline, metrics, top),
        };
        (shape, sx, ex)
    };

    let values = segment
        .days()
        .filter_map(|date| {
            let index = timeline.index_of(date)?;
            Some(ValueMarker {
                date,
                pos: pos2(x(index), top + metrics.value_offset),
                text: segment.daily_values.get(&date).map(|v| format_value(*v)),
            })
        })
        .collect();

    let label = (!segment.label.is_empty()).then(|| SegmentLabel {
        pos: pos2((x_start + x_end) / 2.0, top - metrics.label_offset),
        text: segment.label.clone(),
        done: segment.is_completed(),
    });

    Some(SegmentGeometry {
        lane,
        top,
        shape,
        values,
        label,
    })
}

/// Completed part of a range: from the start column centre to the end of the
/// progress day, or to the progress column centre once the end is reached.
fn progress_rect(
    segment: &Segment,
    timeline: &Timeline,
    metrics: &ChartMetrics,
    top: f32,
) -> Option<Rect> {
    let progress = segment.progress_end_date?;
    let start = timeline.index_of(segment.start_date)?;
    let done = timeline.index_of(progress)?;
    if done < start {
        return None;
    }
    let left = metrics.column_center(start);
    let right = match timeline.index_of(segment.end_date) {
        Some(end) if done < end => metrics.column_left(done + 1),
        _ => metrics.column_center(done),
    };
    let half = metrics.bar_thickness / 2.0;
    (right > left).then(|| Rect::from_min_max(pos2(left, top - half), pos2(right, top + half)))
}

/// Layout of one task row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub height: f32,
    pub lane_count: usize,
    /// Index into `task.segments` with its geometry.
    pub segments: Vec<(usize, SegmentGeometry)>,
}

/// Assign lanes to a task's segments and project each of them.
pub fn layout_row(task: &Task, timeline: &Timeline, metrics: &ChartMetrics) -> RowLayout {
    let lanes = assign_lanes(&task.segments, timeline.window());
    let segments = task
        .segments
        .iter()
        .enumerate()
        .filter_map(|(i, segment)| {
            let lane = lanes.lane(i)?;
            project_segment(segment, lane, timeline, metrics).map(|g| (i, g))
        })
        .collect();
    RowLayout {
        height: metrics.row_height(lanes.lane_count()),
        lane_count: lanes.lane_count(),
        segments,
    }
}
