use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

/// One column of the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineDay {
    pub index: usize,
    pub date: NaiveDate,
    pub iso: String,
    /// 0 = Sunday … 6 = Saturday.
    pub weekday: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_today: bool,
}

/// Inclusive date range covered by the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && self.start <= end
    }

    /// The part of `[start, end]` inside the window.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        self.intersects(start, end)
            .then(|| (start.max(self.start), end.min(self.end)))
    }
}

/// The ordered day sequence of the active plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    days: Vec<TimelineDay>,
}

impl Timeline {
    /// Build one day per calendar date of `[start, end]`. Empty when the
    /// range is reversed.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        holidays: &BTreeSet<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .enumerate()
            .map(|(index, date)| {
                let weekday = date.weekday().num_days_from_sunday();
                TimelineDay {
                    index,
                    date,
                    iso: date.format("%Y-%m-%d").to_string(),
                    weekday,
                    is_weekend: weekday == 0 || weekday == 6,
                    is_holiday: holidays.contains(&date),
                    is_today: date == today,
                }
            })
            .collect();
        Self { days }
    }

    pub fn days(&self) -> &[TimelineDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, index: usize) -> Option<&TimelineDay> {
        self.days.get(index)
    }

    pub fn window(&self) -> Option<DateWindow> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => Some(DateWindow {
                start: first.date,
                end: last.date,
            }),
            _ => None,
        }
    }

    /// Column index of `date`, if it is on the timeline.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.days.first()?.date;
        let offset = (date - first).num_days();
        usize::try_from(offset)
            .ok()
            .filter(|&i| i < self.days.len())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    pub fn today_index(&self) -> Option<usize> {
        self.days.iter().position(|d| d.is_today)
    }

    /// Human readable range, e.g. `2024-01-01 〜 2024-03-31`.
    pub fn range_label(&self) -> String {
        match self.window() {
            Some(w) => format!(
                "{} 〜 {}",
                w.start.format("%Y-%m-%d"),
                w.end.format("%Y-%m-%d")
            ),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn builds_inclusive_range_with_flags() {
        let holidays: BTreeSet<_> = [d("2024-01-01")].into_iter().collect();
        let timeline = Timeline::build(d("2024-01-01"), d("2024-01-07"), &holidays, d("2024-01-03"));
        assert_eq!(timeline.len(), 7);
        let days = timeline.days();
        assert!(days[0].is_holiday);
        assert_eq!(days[0].weekday, 1); // Monday
        assert_eq!(days[0].iso, "2024-01-01");
        assert!(days[2].is_today);
        assert!(days[5].is_weekend && days[6].is_weekend);
        assert!(!days[4].is_weekend);
        assert_eq!(days[6].index, 6);
        assert_eq!(timeline.range_label(), "2024-01-01 〜 2024-01-07");
    }

    #[test]
    fn reversed_range_is_empty() {
        let timeline = Timeline::build(d("2024-01-07"), d("2024-01-01"), &BTreeSet::new(), d("2024-01-03"));
        assert!(timeline.is_empty());
        assert_eq!(timeline.window(), None);
        assert_eq!(timeline.range_label(), "");
        assert_eq!(timeline.index_of(d("2024-01-03")), None);
    }

    #[test]
    fn index_lookup_and_clip() {
        let timeline = Timeline::build(d("2024-01-10"), d("2024-01-20"), &BTreeSet::new(), d("2024-01-01"));
        assert_eq!(timeline.index_of(d("2024-01-10")), Some(0));
        assert_eq!(timeline.index_of(d("2024-01-20")), Some(10));
        assert_eq!(timeline.index_of(d("2024-01-21")), None);
        assert_eq!(timeline.index_of(d("2024-01-09")), None);
        assert_eq!(timeline.today_index(), None);

        let window = timeline.window().unwrap();
        assert_eq!(
            window.clip(d("2024-01-05"), d("2024-01-12")),
            Some((d("2024-01-10"), d("2024-01-12")))
        );
        assert_eq!(window.clip(d("2024-01-01"), d("2024-01-09")), None);
    }
}
