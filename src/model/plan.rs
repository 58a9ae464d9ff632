use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::{Segment, Task};
use crate::error::PlanError;

pub const DEFAULT_PROJECT_NAME: &str = "Untitled Plan";
pub const BLANK_PROJECT_NAME: &str = "New Plan";

/// Calendar range and non-working days of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl Settings {
    /// A quarter: the first day of `today`'s month through the last day of
    /// the second following month.
    pub fn default_for(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = start
            .checked_add_months(Months::new(3))
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        Self {
            start_date: start,
            end_date: end,
            holidays: BTreeSet::new(),
        }
    }

    /// Build settings from user input, rejecting an end before the start.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        holidays: BTreeSet<NaiveDate>,
    ) -> Result<Self, PlanError> {
        if end_date < start_date {
            return Err(PlanError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            holidays,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::default_for(chrono::Local::now().date_naive())
    }
}

/// Parse a comma separated list of ISO dates. Blank entries are ignored.
pub fn parse_holidays(text: &str) -> Result<BTreeSet<NaiveDate>, PlanError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| PlanError::InvalidHoliday {
                input: s.to_string(),
            })
        })
        .collect()
}

/// Render holidays back into the editable list form.
pub fn format_holidays(holidays: &BTreeSet<NaiveDate>) -> String {
    holidays
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The full persisted unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub memo: String,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            settings: Settings::default(),
            tasks: Vec::new(),
            memo: String::new(),
        }
    }
}

impl Plan {
    /// A fresh plan covering the quarter around `today` with one empty row.
    pub fn new_for(today: NaiveDate) -> Self {
        Self {
            project_name: default_project_name(),
            settings: Settings::default_for(today),
            tasks: vec![Task::new()],
            memo: String::new(),
        }
    }

    /// An empty plan that keeps the given calendar settings.
    pub fn blank(settings: Settings) -> Self {
        Self {
            project_name: BLANK_PROJECT_NAME.to_string(),
            settings,
            tasks: vec![Task::new()],
            memo: String::new(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn task_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Locate a segment anywhere in the plan.
    pub fn find_segment(&self, segment_id: &str) -> Option<(&Task, &Segment)> {
        self.tasks
            .iter()
            .find_map(|t| t.segment(segment_id).map(|s| (t, s)))
    }

    pub fn find_segment_mut(&mut self, segment_id: &str) -> Option<&mut Segment> {
        self.tasks
            .iter_mut()
            .find_map(|t| t.segment_mut(segment_id))
    }

    /// Check a plan read from storage or an import: the calendar range must
    /// be ordered and every segment consistent.
    pub fn validate(&self) -> Result<(), PlanError> {
        Settings::new(
            self.settings.start_date,
            self.settings.end_date,
            BTreeSet::new(),
        )?;
        self.tasks
            .iter()
            .flat_map(|t| t.segments.iter())
            .try_for_each(Segment::validate)
    }

    /// Guarantee at least one row to click on.
    pub fn ensure_task(&mut self) -> bool {
        if self.tasks.is_empty() {
            self.tasks.push(Task::new());
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn default_range_is_a_quarter() {
        let settings = Settings::default_for(d("2024-11-17"));
        assert_eq!(settings.start_date, d("2024-11-01"));
        assert_eq!(settings.end_date, d("2025-01-31"));
    }

    #[test]
    fn settings_reject_end_before_start() {
        let err = Settings::new(d("2024-02-01"), d("2024-01-01"), BTreeSet::new()).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidRange {
                start: d("2024-02-01"),
                end: d("2024-01-01")
            }
        );
        assert!(Settings::new(d("2024-01-01"), d("2024-01-01"), BTreeSet::new()).is_ok());
    }

    #[test]
    fn holidays_parse_and_format() {
        let set = parse_holidays(" 2024-01-08, ,2024-01-01 ").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(format_holidays(&set), "2024-01-01, 2024-01-08");
        assert!(matches!(
            parse_holidays("2024-13-01"),
            Err(PlanError::InvalidHoliday { .. })
        ));
    }

    #[test]
    fn validate_checks_range_and_segments() {
        let mut plan = Plan::new_for(d("2024-01-15"));
        plan.tasks[0]
            .segments
            .push(Segment::new(d("2024-01-02"), d("2024-01-04"), ""));
        assert!(plan.validate().is_ok());

        let mut reversed_range = plan.clone();
        reversed_range.settings.start_date = d("2024-03-01");
        reversed_range.settings.end_date = d("2024-02-01");
        assert!(matches!(
            reversed_range.validate(),
            Err(PlanError::InvalidRange { .. })
        ));

        plan.tasks[0].segments[0].end_date = d("2024-01-01");
        assert!(matches!(
            plan.validate(),
            Err(PlanError::MalformedSegment { .. })
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let plan: Plan = serde_json::from_str(
            r#"{"settings":{"startDate":"2024-01-01","endDate":"2024-01-31"},
                "tasks":[{"id":"task_1","segments":[{"id":"seg_1","startDate":"2024-01-02",
                "endDate":"2024-01-02","type":"point","progressEndDate":null}]}]}"#,
        )
        .unwrap();
        assert_eq!(plan.project_name, DEFAULT_PROJECT_NAME);
        assert!(plan.settings.holidays.is_empty());
        let task = &plan.tasks[0];
        assert_eq!(task.label1, "");
        assert!(!task.is_hidden);
        assert!(task.segments[0].daily_values.is_empty());
        assert!(task.segments[0].is_point());
    }
}
