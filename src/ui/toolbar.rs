use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use lane_planner::session::{Mode, SegmentShift};

use crate::app::PlannerApp;
use crate::ui::theme;

/// Render the menu bar and the editing bar below it.
pub fn show_toolbar(app: &mut PlannerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  New Plan").clicked() {
                ui.close_menu();
                app.clear_plan();
            }
            ui.separator();
            if ui.button("  Import JSON...").clicked() {
                ui.close_menu();
                app.import_json();
            }
            if ui.button("  Export JSON...").clicked() {
                ui.close_menu();
                app.export_json();
            }
            if ui.button("  Export CSV...").clicked() {
                ui.close_menu();
                app.export_csv();
            }
            ui.separator();
            if ui.button("  Open Data Folder").clicked() {
                ui.close_menu();
                app.open_data_folder();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.metrics.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.metrics.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            ui.checkbox(&mut app.show_hidden, "Show hidden rows");
            ui.checkbox(&mut app.show_memo, "Memo panel");
        });

        ui.menu_button(RichText::new("  Plan  ").font(theme::font_header()), |ui| {
            if ui.button("  Settings...").clicked() {
                app.open_settings();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(app.session.timeline().range_label())
                    .size(11.0)
                    .color(theme::TEXT_SECONDARY),
            );
        });
    });

    ui.add_space(2.0);
    ui.horizontal(|ui| show_edit_bar(app, ui));
    ui.add_space(2.0);
}

fn show_edit_bar(app: &mut PlannerApp, ui: &mut Ui) {
    let mut name = app.session.plan().project_name.clone();
    let edit = egui::TextEdit::singleline(&mut name)
        .hint_text("Project name")
        .desired_width(180.0)
        .font(theme::font_header());
    if ui.add(edit).changed() {
        app.session.set_project_name(&name);
    }
    ui.separator();

    let mode = app.session.mode();
    if ui
        .selectable_label(mode == Mode::Plan, format!("{} Plan", icons::PENCIL_SIMPLE))
        .on_hover_text("Create and edit segments")
        .clicked()
        && mode != Mode::Plan
    {
        app.set_mode(Mode::Plan);
    }
    if ui
        .selectable_label(mode == Mode::Progress, format!("{} Progress", icons::CHECK_SQUARE))
        .on_hover_text("Mark completed days")
        .clicked()
        && mode != Mode::Progress
    {
        app.set_mode(Mode::Progress);
    }
    ui.separator();

    let planning = mode == Mode::Plan;
    ui.add_enabled_ui(planning, |ui| {
        ui.label(RichText::new("Move").size(10.5).color(theme::TEXT_DIM));
        let moves = [
            (icons::CARET_DOUBLE_LEFT, "1 week earlier", SegmentShift::Move(-7)),
            (icons::CARET_LEFT, "1 day earlier", SegmentShift::Move(-1)),
            (icons::CARET_RIGHT, "1 day later", SegmentShift::Move(1)),
            (icons::CARET_DOUBLE_RIGHT, "1 week later", SegmentShift::Move(7)),
        ];
        for (icon, tip, shift) in moves {
            if ui.button(icon).on_hover_text(tip).clicked() {
                app.shift(shift);
            }
        }

        ui.label(RichText::new("Start").size(10.5).color(theme::TEXT_DIM));
        if ui.button("−1").on_hover_text("Start one day earlier").clicked() {
            app.shift(SegmentShift::Start(-1));
        }
        if ui.button("+1").on_hover_text("Start one day later").clicked() {
            app.shift(SegmentShift::Start(1));
        }

        ui.label(RichText::new("End").size(10.5).color(theme::TEXT_DIM));
        if ui.button("−1").on_hover_text("End one day earlier").clicked() {
            app.shift(SegmentShift::End(-1));
        }
        if ui.button("+1").on_hover_text("End one day later").clicked() {
            app.shift(SegmentShift::End(1));
        }

        ui.separator();
        ui.label(RichText::new("Row").size(10.5).color(theme::TEXT_DIM));
        if ui
            .button(icons::ARROW_LEFT)
            .on_hover_text("Move the active row's open segments one day earlier")
            .clicked()
        {
            app.shift_row(-1);
        }
        if ui
            .button(icons::ARROW_RIGHT)
            .on_hover_text("Move the active row's open segments one day later")
            .clicked()
        {
            app.shift_row(1);
        }
    });
}
