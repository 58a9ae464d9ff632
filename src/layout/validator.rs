use chrono::NaiveDate;

use crate::error::PlanError;
use crate::model::Task;

/// Most segments of one task allowed on a single day.
pub const MAX_CONCURRENT_SEGMENTS: usize = 3;

/// Check that a segment over `[start, end]` may be added to `task`.
///
/// Rejects the whole range as soon as one calendar day already carries
/// `MAX_CONCURRENT_SEGMENTS` segments. Reversed endpoints are accepted.
pub fn can_place_segment(task: &Task, start: NaiveDate, end: NaiveDate) -> Result<(), PlanError> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    for date in start.iter_days().take_while(|d| *d <= end) {
        let count = task.concurrent_on(date);
        if count >= MAX_CONCURRENT_SEGMENTS {
            return Err(PlanError::OverlapLimit {
                date,
                count,
                limit: MAX_CONCURRENT_SEGMENTS,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn task_with(spans: &[(&str, &str)]) -> Task {
        let mut task = Task::new();
        for (start, end) in spans {
            task.segments.push(Segment::new(d(start), d(end), ""));
        }
        task
    }

    #[test]
    fn fourth_segment_on_a_day_is_rejected() {
        let task = task_with(&[
            ("2024-02-01", "2024-02-01"),
            ("2024-01-30", "2024-02-03"),
            ("2024-02-01", "2024-02-10"),
        ]);
        let err = can_place_segment(&task, d("2024-01-25"), d("2024-02-05")).unwrap_err();
        assert_eq!(
            err,
            PlanError::OverlapLimit {
                date: d("2024-02-01"),
                count: 3,
                limit: 3
            }
        );
        assert!(can_place_segment(&task, d("2024-02-01"), d("2024-02-01")).is_err());
    }

    #[test]
    fn two_overlaps_still_allow_a_third() {
        let task = task_with(&[("2024-02-01", "2024-02-05"), ("2024-02-03", "2024-02-04")]);
        assert!(can_place_segment(&task, d("2024-02-04"), d("2024-02-02")).is_ok());
    }

    #[test]
    fn days_outside_the_proposal_do_not_count() {
        let task = task_with(&[
            ("2024-02-01", "2024-02-01"),
            ("2024-02-01", "2024-02-01"),
            ("2024-02-01", "2024-02-01"),
        ]);
        assert!(can_place_segment(&task, d("2024-02-02"), d("2024-02-09")).is_ok());
    }
}
