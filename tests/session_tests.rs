mod common;

use common::{date, file_session, reopen, slot_file};
use lane_planner::error::PlanError;
use lane_planner::io::FileStore;
use lane_planner::layout::{format_total, layout_row, ChartMetrics};
use lane_planner::session::{ClickOutcome, Mode};

#[test]
fn test_fresh_session_is_persisted() {
    let (temp_dir, session) = file_session("2024-01-15");

    assert_eq!(session.plan().tasks.len(), 1);
    assert_eq!(session.plan().settings.start_date, date("2024-01-01"));
    assert_eq!(session.plan().settings.end_date, date("2024-03-31"));
    assert!(slot_file(&temp_dir).exists());
}

#[test]
fn test_plan_survives_restart() {
    let (temp_dir, mut session) = file_session("2024-01-15");
    let task_id = session.plan().tasks[0].id.clone();

    session.set_project_name("Harbour wall");
    session.click_cell(&task_id, date("2024-01-03")).expect("first click");
    let outcome = session.click_cell(&task_id, date("2024-01-06")).expect("second click");
    let ClickOutcome::Created { segment_id, .. } = outcome else {
        panic!("expected a new segment, got {:?}", outcome);
    };
    session.set_segment_label(&segment_id, "  piling  ");
    session
        .set_daily_value(&segment_id, date("2024-01-04"), "4")
        .expect("valid value");

    let restored = reopen(&temp_dir, "2024-01-16");
    assert_eq!(restored.plan(), session.plan());
    let (_, segment) = restored.plan().find_segment(&segment_id).expect("segment kept");
    assert_eq!(segment.label, "piling");
    assert_eq!(segment.daily_values.get(&date("2024-01-04")), Some(&4.0));
}

#[test]
fn test_overlapping_segments_stack_into_lanes() {
    let (_temp_dir, mut session) = file_session("2024-01-15");
    let task_id = session.plan().tasks[0].id.clone();

    for (start, end) in [
        ("2024-01-01", "2024-01-05"),
        ("2024-01-03", "2024-01-08"),
        ("2024-01-04", "2024-01-04"),
    ] {
        session
            .create_segment(&task_id, date(start), date(end), "")
            .expect("within the overlap limit");
    }

    let metrics = ChartMetrics::default();
    let task = &session.plan().tasks[0];
    let row = layout_row(task, session.timeline(), &metrics);

    assert_eq!(row.lane_count, 3);
    assert_eq!(row.height, metrics.row_height(3));
    let lanes: Vec<(usize, usize)> = row.segments.iter().map(|(i, g)| (*i, g.lane)).collect();
    assert_eq!(lanes, vec![(0, 0), (1, 1), (2, 2)]);
}

#[test]
fn test_fourth_overlapping_segment_is_rejected() {
    let (temp_dir, mut session) = file_session("2024-01-15");
    let task_id = session.plan().tasks[0].id.clone();
    for _ in 0..3 {
        session
            .create_segment(&task_id, date("2024-02-01"), date("2024-02-01"), "")
            .expect("within the overlap limit");
    }

    session.click_cell(&task_id, date("2024-02-01")).expect("first click");
    let result = session.click_cell(&task_id, date("2024-02-03"));

    assert!(matches!(result, Err(PlanError::OverlapLimit { count: 3, .. })));
    assert_eq!(session.plan().tasks[0].segments.len(), 3);
    assert_eq!(reopen(&temp_dir, "2024-01-15").plan().tasks[0].segments.len(), 3);
}

#[test]
fn test_daily_totals_across_tasks() {
    let (_temp_dir, mut session) = file_session("2024-01-15");
    let first = session.plan().tasks[0].id.clone();
    let second = session.add_task();

    for (task_id, value) in [(&first, "2"), (&second, "3.5")] {
        let segment_id = session
            .create_segment(task_id, date("2024-01-01"), date("2024-01-01"), "")
            .expect("valid segment")
            .expect("task exists");
        session
            .set_daily_value(&segment_id, date("2024-01-01"), value)
            .expect("valid value");
    }

    let totals = session.totals();
    assert_eq!(totals.get(date("2024-01-01")), 5.5);
    assert_eq!(format_total(totals.get(date("2024-01-01"))), Some("5.5".to_string()));
    assert_eq!(totals.get(date("2024-01-02")), 0.0);
    assert_eq!(totals.len(), session.timeline().len());

    session.set_hidden(&second, true);
    assert_eq!(format_total(session.totals().get(date("2024-01-01"))), Some("2".to_string()));
}

#[test]
fn test_corrupt_slot_starts_fresh() {
    let (temp_dir, _session) = file_session("2024-01-15");
    std::fs::write(slot_file(&temp_dir), "not json").expect("Failed to corrupt slot");

    let session = reopen(&temp_dir, "2024-01-15");
    assert_eq!(session.plan().tasks.len(), 1);
    assert_eq!(session.plan().project_name, "Untitled Plan");
    assert!(session.restore_error().is_some());
    let after = std::fs::read_to_string(slot_file(&temp_dir)).expect("slot still there");
    assert_eq!(after, "not json");
}

#[test]
fn test_unreadable_slot_is_kept_until_first_edit() {
    let (temp_dir, session) = file_session("2024-01-15");
    let task_id = session.plan().tasks[0].id.clone();
    drop(session);

    // Parses as JSON, but the segment type is not one the model knows.
    let original = format!(
        r#"{{"projectName":"Quay","settings":{{"startDate":"2024-01-01","endDate":"2024-01-31"}},"tasks":[{{"id":"{}","segments":[{{"id":"seg_1","startDate":"2024-01-02","endDate":"2024-01-05","type":"RANGE"}}]}}]}}"#,
        task_id
    );
    std::fs::write(slot_file(&temp_dir), &original).expect("Failed to write slot");

    let mut session = reopen(&temp_dir, "2024-01-15");
    let untouched = std::fs::read_to_string(slot_file(&temp_dir)).expect("slot readable");
    assert_eq!(untouched, original);

    session.set_project_name("Fresh start");
    let backup = FileStore::new(temp_dir.path().join("data")).backup_path();
    assert_eq!(std::fs::read_to_string(backup).expect("backup written"), original);
    assert_eq!(reopen(&temp_dir, "2024-01-15").plan().project_name, "Fresh start");
}

#[test]
fn test_inconsistent_slot_is_not_restored() {
    let (temp_dir, session) = file_session("2024-01-15");
    drop(session);
    let original = r#"{"projectName":"Quay","settings":{"startDate":"2024-03-01","endDate":"2024-02-01"}}"#;
    std::fs::write(slot_file(&temp_dir), original).expect("Failed to write slot");

    let session = reopen(&temp_dir, "2024-01-15");
    assert!(!session.timeline().is_empty());
    assert_eq!(session.plan().settings.start_date, date("2024-01-01"));
    assert_eq!(
        std::fs::read_to_string(slot_file(&temp_dir)).expect("slot readable"),
        original
    );
}

#[test]
fn test_progress_marking_round_trip() {
    let (temp_dir, mut session) = file_session("2024-01-15");
    let task_id = session.plan().tasks[0].id.clone();
    let segment_id = session
        .create_segment(&task_id, date("2024-01-10"), date("2024-01-12"), "")
        .expect("valid segment")
        .expect("task exists");

    session.set_mode(Mode::Progress);
    session.click_segment(&task_id, &segment_id, false);
    session.click_cell(&task_id, date("2024-01-12")).expect("inside the segment");
    // Clicking the current progress day steps back one day.
    session.click_cell(&task_id, date("2024-01-12")).expect("inside the segment");

    let restored = reopen(&temp_dir, "2024-01-15");
    let (_, segment) = restored.plan().find_segment(&segment_id).expect("segment kept");
    assert_eq!(segment.progress_end_date, Some(date("2024-01-11")));
    assert!(!segment.is_completed());
}
