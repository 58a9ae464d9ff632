use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlanError;

/// Upper bound for a single daily effort entry.
pub const MAX_DAILY_VALUE: f64 = 10.0;

/// Whether a segment marks a single day or spans several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Point,
    Range,
}

/// A labeled date-point or date-range entry on a task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    #[serde(default)]
    pub label: String,
    /// Completion is recorded up to and including this date.
    #[serde(default)]
    pub progress_end_date: Option<NaiveDate>,
    /// Sparse per-day effort entries.
    #[serde(default)]
    pub daily_values: BTreeMap<NaiveDate, f64>,
}

impl Segment {
    /// Create a segment over `[start, end]`, swapping reversed endpoints.
    /// Equal endpoints produce a point.
    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            id: format!("seg_{}", Uuid::new_v4().simple()),
            start_date: start,
            end_date: end,
            kind: if start == end {
                SegmentKind::Point
            } else {
                SegmentKind::Range
            },
            label: label.into(),
            progress_end_date: None,
            daily_values: BTreeMap::new(),
        }
    }

    pub fn is_point(&self) -> bool {
        self.kind == SegmentKind::Point
    }

    /// Inclusive span, lowest date first.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        (
            self.start_date.min(self.end_date),
            self.start_date.max(self.end_date),
        )
    }

    /// Every calendar day of the span.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let (start, end) = self.span();
        start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        let (start, end) = self.span();
        start <= date && date <= end
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let (own_start, own_end) = self.span();
        own_start <= end && start <= own_end
    }

    /// True when progress has been recorded on or after `date`.
    pub fn is_done_at(&self, date: NaiveDate) -> bool {
        self.progress_end_date.is_some_and(|p| p >= date)
    }

    /// Completed through its last day.
    pub fn is_completed(&self) -> bool {
        self.is_done_at(self.end_date)
    }

    pub fn has_progress(&self) -> bool {
        self.progress_end_date.is_some()
    }

    /// Sum of all effort entries.
    pub fn total_effort(&self) -> f64 {
        self.daily_values.values().sum()
    }

    /// Move the whole segment (and its effort entries). Refused once any
    /// progress is recorded, or when a date would leave the calendar.
    pub fn move_by(&mut self, days: i64) -> bool {
        if days == 0 || self.has_progress() {
            return false;
        }
        let delta = Duration::days(days);
        let (Some(start), Some(end)) = (
            self.start_date.checked_add_signed(delta),
            self.end_date.checked_add_signed(delta),
        ) else {
            return false;
        };
        let Some(values) = self
            .daily_values
            .iter()
            .map(|(date, value)| date.checked_add_signed(delta).map(|d| (d, *value)))
            .collect::<Option<BTreeMap<_, _>>>()
        else {
            return false;
        };
        self.start_date = start;
        self.end_date = end;
        self.daily_values = values;
        true
    }

    /// Move the start date of a range. The start never passes the end.
    pub fn move_start_by(&mut self, days: i64) -> bool {
        if self.is_point() || self.has_progress() {
            return false;
        }
        let Some(next) = self.start_date.checked_add_signed(Duration::days(days)) else {
            return false;
        };
        if next > self.end_date {
            return false;
        }
        self.start_date = next;
        true
    }

    /// Move the end date of a range. The end never precedes the start or the
    /// recorded progress.
    pub fn move_end_by(&mut self, days: i64) -> bool {
        if self.is_point() {
            return false;
        }
        let Some(next) = self.end_date.checked_add_signed(Duration::days(days)) else {
            return false;
        };
        if next < self.start_date || self.progress_end_date.is_some_and(|p| next < p) {
            return false;
        }
        self.end_date = next;
        true
    }

    /// Apply a progress click on `date`.
    ///
    /// Points toggle between complete and not started. For ranges, clicking
    /// the current progress date steps back one day (clearing progress when
    /// that falls before the start); any other date becomes the new progress
    /// end.
    pub fn mark_progress(&mut self, date: NaiveDate) -> Result<(), PlanError> {
        if !self.covers(date) {
            return Err(PlanError::OutsideSegment {
                date,
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.is_point() {
            self.progress_end_date = match self.progress_end_date {
                Some(_) => None,
                None => Some(self.start_date),
            };
        } else if self.progress_end_date == Some(date) {
            self.progress_end_date = date.pred_opt().filter(|previous| *previous >= self.start_date);
        } else {
            self.progress_end_date = Some(date);
        }
        Ok(())
    }

    /// Check the date rules a loaded segment must satisfy: ordered
    /// endpoints, a single day for points, and progress inside the span.
    pub fn validate(&self) -> Result<(), PlanError> {
        let malformed = |reason: &str| PlanError::MalformedSegment {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.start_date > self.end_date {
            return Err(malformed("start date is after end date"));
        }
        if self.is_point() && self.start_date != self.end_date {
            return Err(malformed("a point must start and end on the same day"));
        }
        if self.progress_end_date.is_some_and(|p| !self.covers(p)) {
            return Err(malformed("progress lies outside the segment"));
        }
        if self.daily_values.values().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(malformed("daily values must be non-negative numbers"));
        }
        Ok(())
    }

    /// Set the effort for `date` from user input. Blank input clears the
    /// entry; numbers are clamped to `0..=MAX_DAILY_VALUE`.
    pub fn set_daily_value(&mut self, date: NaiveDate, input: &str) -> Result<(), PlanError> {
        let input = input.trim();
        if input.is_empty() {
            self.daily_values.remove(&date);
            return Ok(());
        }
        let value: f64 = input.parse().map_err(|_| PlanError::InvalidValue {
            input: input.to_string(),
        })?;
        if !value.is_finite() {
            return Err(PlanError::InvalidValue {
                input: input.to_string(),
            });
        }
        self.daily_values
            .insert(date, value.clamp(0.0, MAX_DAILY_VALUE));
        Ok(())
    }
}

/// Which of the three free-text task labels to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSlot {
    First,
    Second,
    Third,
}

/// A row of the chart owning its segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub label1: String,
    #[serde(default)]
    pub label2: String,
    #[serde(default)]
    pub label3: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub is_hidden: bool,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: format!("task_{}", Uuid::new_v4().simple()),
            label1: String::new(),
            label2: String::new(),
            label3: String::new(),
            segments: Vec::new(),
            is_done: false,
            is_hidden: false,
        }
    }
}

impl Task {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, slot: LabelSlot) -> &str {
        match slot {
            LabelSlot::First => &self.label1,
            LabelSlot::Second => &self.label2,
            LabelSlot::Third => &self.label3,
        }
    }

    pub fn label_mut(&mut self, slot: LabelSlot) -> &mut String {
        match slot {
            LabelSlot::First => &mut self.label1,
            LabelSlot::Second => &mut self.label2,
            LabelSlot::Third => &mut self.label3,
        }
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_mut(&mut self, id: &str) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// Remove a segment, returning whether it existed.
    pub fn remove_segment(&mut self, id: &str) -> bool {
        let before = self.segments.len();
        self.segments.retain(|s| s.id != id);
        self.segments.len() != before
    }

    /// Number of segments covering `date`.
    pub fn concurrent_on(&self, date: NaiveDate) -> usize {
        self.segments.iter().filter(|s| s.covers(date)).count()
    }
}
