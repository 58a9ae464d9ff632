pub mod dialogs;
pub mod gantt_chart;
pub mod task_table;
pub mod theme;
pub mod toolbar;

use lane_planner::layout::{layout_row, ChartMetrics, RowLayout};
use lane_planner::session::Session;

/// A task row as drawn this frame, shared by the table and the chart so
/// both sides use the same heights.
pub struct VisibleRow {
    /// Index into `plan.tasks`.
    pub task_index: usize,
    pub layout: RowLayout,
}

pub fn visible_rows(session: &Session, metrics: &ChartMetrics, show_hidden: bool) -> Vec<VisibleRow> {
    session
        .plan()
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| show_hidden || !task.is_hidden)
        .map(|(task_index, task)| VisibleRow {
            task_index,
            layout: layout_row(task, session.timeline(), metrics),
        })
        .collect()
}
