use std::path::Path;

use chrono::NaiveDate;

use crate::error::StorageError;
use crate::layout::format_value;
use crate::model::{Plan, SegmentKind};

const HEADER: [&str; 9] = [
    "Item 1",
    "Item 2",
    "Item 3",
    "Segment",
    "Type",
    "Start Date",
    "End Date",
    "Progress",
    "Effort",
];

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Write one semicolon-delimited row per segment, tasks in display order.
/// Returns the number of segment rows written.
pub fn write_segments<W: std::io::Write>(plan: &Plan, writer: W) -> Result<usize, StorageError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut count = 0;
    for task in &plan.tasks {
        for segment in &task.segments {
            let kind = match segment.kind {
                SegmentKind::Point => "point",
                SegmentKind::Range => "range",
            };
            let start = iso(segment.start_date);
            let end = iso(segment.end_date);
            let progress = segment.progress_end_date.map(iso).unwrap_or_default();
            let effort = format_value(segment.total_effort());
            wtr.write_record([
                task.label1.as_str(),
                task.label2.as_str(),
                task.label3.as_str(),
                segment.label.as_str(),
                kind,
                start.as_str(),
                end.as_str(),
                progress.as_str(),
                effort.as_str(),
            ])?;
            count += 1;
        }
    }
    wtr.flush()
        .map_err(|e| StorageError::Csv { source: e.into() })?;
    Ok(count)
}

/// Export the segment schedule of `plan` to a CSV file.
pub fn export_csv(plan: &Plan, path: &Path) -> Result<usize, StorageError> {
    let file = std::fs::File::create(path).map_err(|e| StorageError::io(path, e))?;
    write_segments(plan, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Segment, Task};

    #[test]
    fn writes_one_row_per_segment() {
        let mut task = Task::new();
        task.label1 = "Foundations".into();
        let mut segment = Segment::new(
            "2024-01-02".parse().unwrap(),
            "2024-01-04".parse().unwrap(),
            "pour",
        );
        segment.daily_values.insert("2024-01-02".parse().unwrap(), 2.0);
        segment.daily_values.insert("2024-01-03".parse().unwrap(), 1.5);
        segment.progress_end_date = Some("2024-01-03".parse().unwrap());
        task.segments.push(segment);
        let mut plan = Plan::default();
        plan.tasks.push(task);
        plan.tasks.push(Task::new());

        let mut out = Vec::new();
        let count = write_segments(&plan, &mut out).unwrap();
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Foundations;;;pour;range;2024-01-02;2024-01-04;2024-01-03;3.5"
        );
    }
}
