use egui::{Align, Color32, Id, Layout, Rect, RichText, Sense, Ui, UiBuilder, Vec2};
use egui_phosphor::regular as icons;

use lane_planner::model::{LabelSlot, Task};
use lane_planner::session::Session;

use crate::ui::theme;
use crate::ui::VisibleRow;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(String),
    SetLabel(String, LabelSlot, String),
    ToggleDone(String),
    SetHidden(String, bool),
    Delete(String),
    Move { from: usize, to: usize },
    Add,
}

const LABEL_COLUMNS: [(LabelSlot, &str, f32); 3] = [
    (LabelSlot::First, "Item 1", 120.0),
    (LabelSlot::Second, "Item 2", 100.0),
    (LabelSlot::Third, "Time", 56.0),
];

/// Render the left-hand task table. Rows follow the chart's scroll offset.
pub fn show_task_table(
    session: &Session,
    rows: &[VisibleRow],
    scroll_y: f32,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    egui::ScrollArea::vertical()
        .id_salt("table_scroll")
        .auto_shrink([false, false])
        .vertical_scroll_offset(scroll_y)
        .enable_scrolling(false)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            if show_header(ui) {
                action = TaskTableAction::Add;
            }
            for row in rows {
                let Some(task) = session.plan().tasks.get(row.task_index) else {
                    continue;
                };
                let active = session.active_task() == Some(task.id.as_str());
                if let Some(a) = show_row(ui, task, row, active) {
                    action = a;
                }
            }
            show_totals_label(ui);
        });

    action
}

/// Column titles plus the add button. Returns true when the button was clicked.
fn show_header(ui: &mut Ui) -> bool {
    let rect = Rect::from_min_size(ui.cursor().min, Vec2::new(ui.available_width(), theme::HEADER_HEIGHT));
    ui.painter().rect_filled(rect, 0.0, theme::BG_HEADER);
    let mut add = false;
    ui.allocate_new_ui(UiBuilder::new().max_rect(rect), |ui| {
        ui.set_min_size(rect.size());
        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
            ui.add_space(22.0);
            for (_, title, width) in LABEL_COLUMNS {
                ui.allocate_ui(Vec2::new(width, 16.0), |ui| {
                    ui.label(RichText::new(title).size(10.0).color(theme::TEXT_DIM).strong());
                });
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_space(6.0);
                let btn = egui::Button::new(RichText::new(format!("{} Row", icons::PLUS)).color(Color32::WHITE))
                    .fill(theme::ACCENT);
                if ui.add(btn).on_hover_text("Add a task row").clicked() {
                    add = true;
                }
            });
        });
    });
    add
}

fn show_row(ui: &mut Ui, task: &Task, row: &VisibleRow, active: bool) -> Option<TaskTableAction> {
    let mut action = None;
    let rect = Rect::from_min_size(ui.cursor().min, Vec2::new(ui.available_width(), row.layout.height));

    // Registered before the row widgets so the text fields stay on top.
    let response = ui.interact(rect, Id::new(("table-row", &task.id)), Sense::click());
    if active {
        ui.painter().rect_filled(rect, 0.0, theme::BG_ACTIVE_ROW);
    }
    if response.dnd_hover_payload::<usize>().is_some() {
        ui.painter()
            .rect_stroke(rect.shrink(1.0), 2.0, egui::Stroke::new(1.0, theme::ACCENT));
    }
    ui.painter().line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        egui::Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    let text_color = match (task.is_done, task.is_hidden) {
        (_, true) => theme::dimmed(theme::TEXT_PRIMARY),
        (true, false) => theme::TEXT_DIM,
        (false, false) => theme::TEXT_PRIMARY,
    };

    ui.allocate_new_ui(UiBuilder::new().max_rect(rect), |ui| {
        ui.set_min_size(rect.size());
        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
            ui.add_space(4.0);
            let grip = ui
                .dnd_drag_source(Id::new(("grip", &task.id)), row.task_index, |ui| {
                    ui.label(RichText::new(icons::DOTS_SIX_VERTICAL).color(theme::TEXT_DIM));
                })
                .response
                .on_hover_text("Drag to reorder");
            row_menu(&grip, task, &mut action);

            for (slot, hint, width) in LABEL_COLUMNS {
                let mut text = task.label(slot).to_string();
                let edit = egui::TextEdit::singleline(&mut text)
                    .hint_text(hint)
                    .desired_width(width)
                    .text_color(text_color);
                let edit_response = ui.add(edit);
                if edit_response.gained_focus() {
                    action = Some(TaskTableAction::Select(task.id.clone()));
                }
                if edit_response.changed() {
                    action = Some(TaskTableAction::SetLabel(task.id.clone(), slot, text));
                }
            }

            let (icon, tip) = if task.is_done {
                (icons::CHECK_SQUARE, "Mark as not done")
            } else {
                (icons::SQUARE, "Mark as done")
            };
            if ui
                .add(egui::Button::new(RichText::new(icon).color(text_color)).frame(false))
                .on_hover_text(tip)
                .clicked()
            {
                action = Some(TaskTableAction::ToggleDone(task.id.clone()));
            }
            if task.is_hidden {
                ui.label(RichText::new(icons::EYE_SLASH).color(theme::TEXT_DIM))
                    .on_hover_text("Hidden row");
            }
        });
    });

    if let Some(from) = response.dnd_release_payload::<usize>() {
        action = Some(TaskTableAction::Move {
            from: *from,
            to: row.task_index,
        });
    }
    if response.clicked() {
        action = Some(TaskTableAction::Select(task.id.clone()));
    }
    row_menu(&response, task, &mut action);
    action
}

fn row_menu(response: &egui::Response, task: &Task, action: &mut Option<TaskTableAction>) {
    response.context_menu(|ui| {
        let done = if task.is_done { "Mark as not done" } else { "Mark as done" };
        if ui.button(done).clicked() {
            *action = Some(TaskTableAction::ToggleDone(task.id.clone()));
            ui.close_menu();
        }
        let (icon, text) = if task.is_hidden {
            (icons::EYE, "Show row")
        } else {
            (icons::EYE_SLASH, "Hide row")
        };
        if ui.button(format!("{} {}", icon, text)).clicked() {
            *action = Some(TaskTableAction::SetHidden(task.id.clone(), !task.is_hidden));
            ui.close_menu();
        }
        ui.separator();
        if ui.button(format!("{} Delete row", icons::TRASH)).clicked() {
            *action = Some(TaskTableAction::Delete(task.id.clone()));
            ui.close_menu();
        }
    });
}

fn show_totals_label(ui: &mut Ui) {
    let rect = Rect::from_min_size(ui.cursor().min, Vec2::new(ui.available_width(), theme::TOTALS_HEIGHT));
    ui.painter().rect_filled(rect, 0.0, theme::BG_TOTALS);
    ui.allocate_new_ui(UiBuilder::new().max_rect(rect), |ui| {
        ui.set_min_size(rect.size());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("Daily total").size(10.5).color(theme::TEXT_SECONDARY));
        });
    });
}
