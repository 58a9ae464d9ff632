use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use lane_planner::layout::{format_total, ChartMetrics, SegmentGeometry, SegmentShape};
use lane_planner::model::{Segment, Task, Timeline, TimelineDay};
use lane_planner::session::{Mode, Session};

use crate::ui::theme;
use crate::ui::VisibleRow;

/// What the user asked the chart to do this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartAction {
    None,
    CellClicked {
        task_id: String,
        date: NaiveDate,
    },
    SegmentClicked {
        task_id: String,
        segment_id: String,
        additive: bool,
    },
    EditLabel {
        segment_id: String,
    },
    DeleteSegment {
        task_id: String,
        segment_id: String,
    },
    EditValue {
        segment_id: String,
        date: NaiveDate,
    },
}

pub struct ChartResponse {
    pub action: ChartAction,
    /// Vertical scroll offset, mirrored by the task table.
    pub scroll_y: f32,
}

/// Render the timeline chart (central panel). With `scroll_to_today` the
/// view is centred on today's column, when the range contains it.
pub fn show_gantt_chart(
    session: &Session,
    rows: &[VisibleRow],
    metrics: &mut ChartMetrics,
    scroll_to_today: bool,
    ui: &mut Ui,
) -> ChartResponse {
    let timeline = session.timeline();
    let available = ui.available_size();

    // Ctrl+scroll zooms the columns
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        let delta = ui.input(|i| i.smooth_scroll_delta.y);
        if delta > 0.0 {
            metrics.zoom_in();
        } else if delta < 0.0 {
            metrics.zoom_out();
        }
    }
    let metrics = *metrics;

    let body_height: f32 = rows.iter().map(|r| r.layout.height).sum();
    let content_width = metrics.total_width(timeline.len());
    let content_height = theme::HEADER_HEIGHT + body_height + theme::TOTALS_HEIGHT;

    let mut scroll = egui::ScrollArea::both()
        .id_salt("chart_scroll")
        .auto_shrink([false, false]);
    if let Some(index) = timeline.today_index().filter(|_| scroll_to_today) {
        scroll = scroll.horizontal_scroll_offset(metrics.centering_offset(index, available.x));
    }

    let output = scroll.show(ui, |ui| {
        let (canvas, painter) = ui.allocate_painter(
            Vec2::new(content_width.max(available.x), content_height.max(available.y)),
            Sense::hover(),
        );
        let origin = canvas.rect.min;
        painter.rect_filled(canvas.rect, 0.0, theme::BG_DARK);

        // Month labels overhang to the right; start a few columns early.
        let clip = ui.clip_rect();
        let visible = metrics.visible_columns(clip.left() - origin.x, clip.right() - origin.x, timeline.len());
        let columns = visible.start.saturating_sub(3)..visible.end;

        let body = Rect::from_min_size(
            origin + Vec2::new(0.0, theme::HEADER_HEIGHT),
            Vec2::new(content_width, body_height),
        );
        draw_day_columns(&painter, body, timeline, columns.clone(), &metrics);
        draw_header(&painter, origin, timeline, columns.clone(), &metrics);

        let mut action = ChartAction::None;
        let mut y = body.top();
        for row in rows {
            let Some(task) = session.plan().tasks.get(row.task_index) else {
                continue;
            };
            let row_rect = Rect::from_min_size(
                Pos2::new(origin.x, y),
                Vec2::new(content_width, row.layout.height),
            );
            if let Some(a) = show_row(ui, &painter, session, task, row, row_rect, &metrics) {
                action = a;
            }
            y += row.layout.height;
        }

        draw_today_line(&painter, body, timeline, &metrics);
        draw_totals(&painter, session, Pos2::new(origin.x, y), columns, &metrics);
        action
    });

    ChartResponse {
        action: output.inner,
        scroll_y: output.state.offset.y,
    }
}

fn show_row(
    ui: &mut Ui,
    painter: &egui::Painter,
    session: &Session,
    task: &Task,
    row: &VisibleRow,
    row_rect: Rect,
    metrics: &ChartMetrics,
) -> Option<ChartAction> {
    let timeline = session.timeline();
    let mut action = None;

    if session.active_task() == Some(task.id.as_str()) {
        painter.rect_filled(row_rect, 0.0, theme::BG_ACTIVE_ROW);
    }
    painter.line_segment(
        [row_rect.left_bottom(), row_rect.right_bottom()],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    // Empty-cell clicks; segments registered afterwards sit on top of this.
    let row_response = ui.interact(row_rect, Id::new(("chart-row", &task.id)), Sense::click());
    if row_response.clicked() {
        let date = row_response
            .interact_pointer_pos()
            .and_then(|p| metrics.column_at(p.x - row_rect.left(), timeline.len()))
            .and_then(|i| timeline.day(i))
            .map(|d| d.date);
        if let Some(date) = date {
            action = Some(ChartAction::CellClicked {
                task_id: task.id.clone(),
                date,
            });
        }
    }

    if let Some(pending) = session.pending().filter(|p| p.task_id == task.id) {
        if let Some(index) = timeline.index_of(pending.date) {
            let center = row_rect.min + Vec2::new(metrics.column_center(index), metrics.lane_top(0));
            painter.circle_stroke(center, theme::MARKER_RADIUS + 2.0, Stroke::new(2.0, theme::PENDING));
        }
    }

    let offset = row_rect.min.to_vec2();
    for (seg_index, geometry) in &row.layout.segments {
        let Some(segment) = task.segments.get(*seg_index) else {
            continue;
        };
        let style = SegmentStyle::new(session, task, segment);
        draw_segment(painter, geometry, offset, &style);

        if let Some(a) = segment_interaction(ui, session, task, segment, geometry, offset, metrics) {
            action = Some(a);
        }
    }
    action
}

struct SegmentStyle {
    fill: Color32,
    progress: Color32,
    outline: Option<Color32>,
    text: Color32,
}

impl SegmentStyle {
    fn new(session: &Session, task: &Task, segment: &Segment) -> Self {
        let finished = task.is_done || segment.is_completed();
        let mut style = Self {
            fill: if finished { theme::SEGMENT_DONE } else { theme::SEGMENT },
            progress: theme::PROGRESS,
            outline: None,
            text: theme::TEXT_PRIMARY,
        };
        if session.progress_segment() == Some(segment.id.as_str()) {
            style.outline = Some(theme::PROGRESS_TARGET);
        } else if session.is_selected(&task.id, &segment.id) {
            style.outline = Some(theme::SELECTED);
        }
        if task.is_hidden {
            style.fill = theme::dimmed(style.fill);
            style.progress = theme::dimmed(style.progress);
            style.text = theme::dimmed(style.text);
        }
        style
    }

    fn marker(&self, done: bool) -> Color32 {
        if done {
            self.progress
        } else {
            self.fill
        }
    }
}

fn draw_segment(painter: &egui::Painter, geometry: &SegmentGeometry, offset: Vec2, style: &SegmentStyle) {
    let outline = style.outline.map(|c| Stroke::new(2.0, c));
    match &geometry.shape {
        SegmentShape::Point(marker) => {
            let center = marker.center + offset;
            painter.circle_filled(center, theme::MARKER_RADIUS, style.marker(marker.done));
            if let Some(stroke) = outline {
                painter.circle_stroke(center, theme::MARKER_RADIUS + 2.0, stroke);
            }
        }
        SegmentShape::Range {
            bar,
            start,
            end,
            progress,
        } => {
            let bar = bar.translate(offset);
            painter.rect_filled(bar, Rounding::same(2.0), style.fill);
            if let Some(done) = progress {
                painter.rect_filled(done.translate(offset), Rounding::same(2.0), style.progress);
            }
            if let Some(stroke) = outline {
                painter.rect_stroke(bar.expand(2.0), Rounding::same(3.0), stroke);
            }
            for marker in [start, end] {
                painter.circle_filled(marker.center + offset, theme::MARKER_RADIUS, style.marker(marker.done));
            }
        }
    }

    if let Some(label) = &geometry.label {
        let color = if label.done { theme::TEXT_DIM } else { style.text };
        painter.text(label.pos + offset, Align2::CENTER_CENTER, &label.text, theme::font_label(), color);
    }
    for value in &geometry.values {
        if let Some(text) = &value.text {
            painter.text(
                value.pos + offset,
                Align2::CENTER_TOP,
                text,
                theme::font_small(),
                theme::VALUE_TEXT,
            );
        }
    }
}

fn segment_interaction(
    ui: &mut Ui,
    session: &Session,
    task: &Task,
    segment: &Segment,
    geometry: &SegmentGeometry,
    offset: Vec2,
    metrics: &ChartMetrics,
) -> Option<ChartAction> {
    let planning = session.mode() == Mode::Plan;
    let mut action = None;

    let response = ui
        .interact(
            geometry.hit_rect(metrics).translate(offset),
            Id::new(("segment", &segment.id)),
            Sense::click(),
        )
        .on_hover_ui(|ui| segment_tooltip(ui, segment));

    if response.double_clicked() && planning {
        action = Some(ChartAction::EditLabel {
            segment_id: segment.id.clone(),
        });
    } else if response.clicked() {
        action = Some(ChartAction::SegmentClicked {
            task_id: task.id.clone(),
            segment_id: segment.id.clone(),
            additive: ui.input(|i| i.modifiers.shift),
        });
    }
    if planning {
        response.context_menu(|ui| {
            if ui.button(format!("{} Edit label", egui_phosphor::regular::PENCIL_SIMPLE)).clicked() {
                action = Some(ChartAction::EditLabel {
                    segment_id: segment.id.clone(),
                });
                ui.close_menu();
            }
            if ui.button(format!("{} Delete segment", egui_phosphor::regular::TRASH)).clicked() {
                action = Some(ChartAction::DeleteSegment {
                    task_id: task.id.clone(),
                    segment_id: segment.id.clone(),
                });
                ui.close_menu();
            }
        });

        // Effort slots below the lane, one per visible day.
        for value in &geometry.values {
            let slot = Rect::from_center_size(
                value.pos + offset + Vec2::new(0.0, 5.0),
                Vec2::new(metrics.cell_width - 2.0, 10.0),
            );
            let slot_response = ui
                .interact(slot, Id::new(("value", &segment.id, value.date)), Sense::click())
                .on_hover_cursor(egui::CursorIcon::Text);
            if slot_response.clicked() {
                action = Some(ChartAction::EditValue {
                    segment_id: segment.id.clone(),
                    date: value.date,
                });
            }
        }
    }
    action
}

fn segment_tooltip(ui: &mut Ui, segment: &Segment) {
    if !segment.label.is_empty() {
        ui.strong(&segment.label);
    }
    if segment.is_point() {
        ui.label(segment.start_date.format("%Y-%m-%d").to_string());
    } else {
        ui.label(format!(
            "{} → {}",
            segment.start_date.format("%Y-%m-%d"),
            segment.end_date.format("%Y-%m-%d")
        ));
    }
    if let Some(done) = segment.progress_end_date {
        ui.label(format!("Done through {}", done.format("%Y-%m-%d")));
    }
    let effort = segment.total_effort();
    if effort > 0.0 {
        ui.label(format!("Effort: {}", lane_planner::layout::format_value(effort)));
    }
}

fn visible_days(timeline: &Timeline, columns: Range<usize>) -> &[TimelineDay] {
    timeline.days().get(columns).unwrap_or(&[])
}

fn draw_day_columns(
    painter: &egui::Painter,
    body: Rect,
    timeline: &Timeline,
    columns: Range<usize>,
    metrics: &ChartMetrics,
) {
    for day in visible_days(timeline, columns) {
        let left = body.left() + metrics.column_left(day.index);
        let column = Rect::from_min_size(
            Pos2::new(left, body.top()),
            Vec2::new(metrics.cell_width, body.height()),
        );
        let fill = if day.is_today {
            Some(theme::BG_TODAY)
        } else if day.is_holiday {
            Some(theme::BG_HOLIDAY)
        } else if day.is_weekend {
            Some(theme::BG_WEEKEND)
        } else {
            None
        };
        if let Some(fill) = fill {
            painter.rect_filled(column, 0.0, fill);
        }
        painter.line_segment(
            [column.left_top(), column.left_bottom()],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_header(
    painter: &egui::Painter,
    origin: Pos2,
    timeline: &Timeline,
    columns: Range<usize>,
    metrics: &ChartMetrics,
) {
    let width = metrics.total_width(timeline.len());
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, theme::HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + theme::HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + theme::HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for day in visible_days(timeline, columns) {
        let left = origin.x + metrics.column_left(day.index);
        let center = origin.x + metrics.column_center(day.index);

        if day.index == 0 || day.date.day() == 1 {
            painter.text(
                Pos2::new(left + 3.0, origin.y + 9.0),
                Align2::LEFT_CENTER,
                day.date.format("%Y/%m").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        let color = match day.weekday {
            0 => theme::TEXT_SUNDAY,
            6 => theme::TEXT_SATURDAY,
            _ if day.is_holiday => theme::TEXT_SUNDAY,
            _ => theme::TEXT_SECONDARY,
        };
        painter.text(
            Pos2::new(center, origin.y + 24.0),
            Align2::CENTER_CENTER,
            day.date.day().to_string(),
            theme::font_sub(),
            color,
        );
        painter.text(
            Pos2::new(center, origin.y + 36.0),
            Align2::CENTER_CENTER,
            weekday_letter(day.weekday),
            theme::font_small(),
            color,
        );
    }
}

fn weekday_letter(weekday: u32) -> &'static str {
    ["S", "M", "T", "W", "T", "F", "S"]
        .get(weekday as usize)
        .copied()
        .unwrap_or("")
}

fn draw_today_line(painter: &egui::Painter, body: Rect, timeline: &Timeline, metrics: &ChartMetrics) {
    let Some(index) = timeline.today_index() else {
        return;
    };
    let x = body.left() + metrics.column_center(index);
    painter.line_segment(
        [Pos2::new(x, body.top()), Pos2::new(x, body.bottom())],
        Stroke::new(1.0, theme::TODAY_LINE.gamma_multiply(0.6)),
    );
}

fn draw_totals(
    painter: &egui::Painter,
    session: &Session,
    top_left: Pos2,
    columns: Range<usize>,
    metrics: &ChartMetrics,
) {
    let timeline = session.timeline();
    let rect = Rect::from_min_size(
        top_left,
        Vec2::new(metrics.total_width(timeline.len()), theme::TOTALS_HEIGHT),
    );
    painter.rect_filled(rect, 0.0, theme::BG_TOTALS);

    let totals = session.totals();
    for day in visible_days(timeline, columns) {
        if let Some(text) = format_total(totals.get(day.date)) {
            painter.text(
                Pos2::new(rect.left() + metrics.column_center(day.index), rect.center().y),
                Align2::CENTER_CENTER,
                text,
                theme::font_small(),
                theme::TEXT_PRIMARY,
            );
        }
    }
}
