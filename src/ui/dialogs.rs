use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};

use lane_planner::model::plan::format_holidays;
use lane_planner::model::Settings;

use crate::app::PlannerApp;
use crate::ui::theme;

/// Editable copy of the plan settings.
pub struct SettingsDraft {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Comma separated ISO dates.
    pub holidays: String,
    pub error: Option<String>,
}

impl SettingsDraft {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            start: settings.start_date,
            end: settings.end_date,
            holidays: format_holidays(&settings.holidays),
            error: None,
        }
    }
}

pub struct LabelDraft {
    pub segment_id: String,
    pub text: String,
    focus_requested: bool,
}

impl LabelDraft {
    pub fn new(segment_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            segment_id: segment_id.into(),
            text: text.into(),
            focus_requested: false,
        }
    }
}

pub struct ValueDraft {
    pub segment_id: String,
    pub date: NaiveDate,
    pub text: String,
    pub error: Option<String>,
}

fn dialog_window(title: &str) -> Window<'static> {
    Window::new(RichText::new(title.to_string()).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text.to_string()).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

fn error_label(ui: &mut egui::Ui, error: &Option<String>) {
    if let Some(error) = error {
        ui.label(RichText::new(error).color(theme::TEXT_SUNDAY).size(11.0));
    }
}

/// Render the "Plan Settings" dialog.
pub fn show_settings_dialog(app: &mut PlannerApp, ctx: &Context) {
    let Some(mut draft) = app.settings_draft.take() else {
        return;
    };
    let mut apply = false;
    let mut close = false;

    dialog_window("Plan Settings")
        .fixed_size([360.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.start).id_salt("settings_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.end).id_salt("settings_end"));
                    ui.end_row();

                    ui.label(RichText::new("Holidays").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui::TextEdit::multiline(&mut draft.holidays)
                            .hint_text("2024-01-01, 2024-05-03")
                            .desired_rows(3)
                            .desired_width(220.0),
                    );
                    ui.end_row();
                });
            error_label(ui, &draft.error);

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], primary_button("Apply")).clicked() {
                    apply = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
        });

    if apply {
        match app.apply_settings(&draft) {
            Ok(()) => close = true,
            Err(e) => draft.error = Some(e.to_string()),
        }
    }
    if !close && !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.settings_draft = Some(draft);
    }
}

/// Render the segment label prompt.
pub fn show_label_dialog(app: &mut PlannerApp, ctx: &Context) {
    let Some(mut draft) = app.label_draft.take() else {
        return;
    };
    let mut commit = false;
    let mut close = false;

    dialog_window("Segment Label")
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            let edit = ui.add_sized(
                [280.0, 24.0],
                egui::TextEdit::singleline(&mut draft.text).hint_text("Label (optional)"),
            );
            if !draft.focus_requested {
                edit.request_focus();
                draft.focus_requested = true;
            }
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                commit = true;
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], primary_button("OK")).clicked() {
                    commit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
        });

    if commit {
        app.session.set_segment_label(&draft.segment_id, &draft.text);
        close = true;
    }
    if !close && !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.label_draft = Some(draft);
    }
}

/// Render the daily effort prompt.
pub fn show_value_dialog(app: &mut PlannerApp, ctx: &Context) {
    let Some(mut draft) = app.value_draft.take() else {
        return;
    };
    let mut commit = false;
    let mut close = false;

    dialog_window("Daily Effort")
        .fixed_size([300.0, 0.0])
        .show(ctx, |ui| {
            ui.label(
                RichText::new(draft.date.format("%Y-%m-%d (%a)").to_string())
                    .color(theme::TEXT_SECONDARY),
            );
            let edit = ui.add_sized(
                [280.0, 24.0],
                egui::TextEdit::singleline(&mut draft.text).hint_text("0 to 10, empty to clear"),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                commit = true;
            }
            error_label(ui, &draft.error);
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], primary_button("OK")).clicked() {
                    commit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Clear")).clicked() {
                    draft.text.clear();
                    commit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
        });

    if commit {
        match app.session.set_daily_value(&draft.segment_id, draft.date, &draft.text) {
            Ok(()) => close = true,
            Err(e) => draft.error = Some(e.to_string()),
        }
    }
    if !close && !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.value_draft = Some(draft);
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut close = false;
    dialog_window("About")
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading(RichText::new("Lane Planner").strong());
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(8.0);
                ui.label("Click a cell twice to add a segment.");
                ui.label("Shift+click selects several segments.");
                ui.label(RichText::new(format!("Storage: {}", app.session.store().describe())).small());
                ui.add_space(10.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    close = true;
                }
            });
        });
    if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
