use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{Task, Timeline};

/// Largest total shown in a totals cell.
pub const TOTAL_DISPLAY_CAP: f64 = 99.9;

/// Effort per timeline day summed over visible tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTotals {
    totals: BTreeMap<NaiveDate, f64>,
}

impl DailyTotals {
    /// Total for `date`; zero for days off the timeline.
    pub fn get(&self, date: NaiveDate) -> f64 {
        self.totals.get(&date).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.totals.contains_key(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.totals.iter().map(|(d, v)| (*d, *v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Sum the daily values of every non-hidden task. Every timeline day is
/// present, starting from zero; entries dated off the timeline are ignored.
pub fn compute_totals(tasks: &[Task], timeline: &Timeline) -> DailyTotals {
    let mut totals: BTreeMap<NaiveDate, f64> =
        timeline.days().iter().map(|d| (d.date, 0.0)).collect();

    for task in tasks.iter().filter(|t| !t.is_hidden) {
        for segment in &task.segments {
            for (date, value) in &segment.daily_values {
                if let Some(total) = totals.get_mut(date) {
                    *total += value;
                }
            }
        }
    }
    DailyTotals { totals }
}

/// Text for a daily value label: integral values without decimals, others
/// with one.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Text for a totals cell. Nothing for zero, capped at `TOTAL_DISPLAY_CAP`.
pub fn format_total(value: f64) -> Option<String> {
    (value > 0.0).then(|| format_value(value.min(TOTAL_DISPLAY_CAP)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::Segment;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn january() -> Timeline {
        Timeline::build(d("2024-01-01"), d("2024-01-31"), &BTreeSet::new(), d("2024-01-15"))
    }

    fn task_with_value(date: &str, value: f64) -> Task {
        let mut segment = Segment::new(d(date), d(date), "");
        segment.daily_values.insert(d(date), value);
        let mut task = Task::new();
        task.segments.push(segment);
        task
    }

    #[test]
    fn sums_across_visible_tasks() {
        let tasks = vec![task_with_value("2024-01-01", 2.0), task_with_value("2024-01-01", 3.5)];
        let totals = compute_totals(&tasks, &january());
        assert_eq!(totals.get(d("2024-01-01")), 5.5);
        assert_eq!(format_total(totals.get(d("2024-01-01"))).as_deref(), Some("5.5"));
    }

    #[test]
    fn hidden_tasks_and_off_timeline_values_are_skipped() {
        let mut hidden = task_with_value("2024-01-02", 4.0);
        hidden.is_hidden = true;
        let tasks = vec![hidden, task_with_value("2024-02-10", 1.0)];
        let totals = compute_totals(&tasks, &january());
        assert_eq!(totals.get(d("2024-01-02")), 0.0);
        assert!(!totals.contains(d("2024-02-10")));
    }

    #[test]
    fn every_day_starts_at_zero() {
        let totals = compute_totals(&[], &january());
        assert_eq!(totals.len(), 31);
        assert!(totals.iter().all(|(_, v)| v == 0.0));
        assert!(totals.contains(d("2024-01-31")));
    }

    #[test]
    fn display_rules() {
        assert_eq!(format_total(0.0), None);
        assert_eq!(format_total(4.0).as_deref(), Some("4"));
        assert_eq!(format_total(0.1 + 0.2).as_deref(), Some("0.3"));
        assert_eq!(format_total(250.0).as_deref(), Some("99.9"));
        assert_eq!(format_value(7.0), "7");
        assert_eq!(format_value(2.34), "2.3");
    }
}
