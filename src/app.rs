use log::{info, warn};

use lane_planner::config::AppConfig;
use lane_planner::error::PlanError;
use lane_planner::io::csv_export::export_csv;
use lane_planner::io::{export_file_name, load_plan, open_store, save_plan};
use lane_planner::layout::{format_value, ChartMetrics};
use lane_planner::model::plan::parse_holidays;
use lane_planner::session::{ClickOutcome, Mode, SegmentShift, Session};

use crate::ui;
use crate::ui::dialogs::{LabelDraft, SettingsDraft, ValueDraft};
use crate::ui::gantt_chart::ChartAction;
use crate::ui::task_table::TaskTableAction;

/// Main application state.
pub struct PlannerApp {
    pub session: Session,
    pub config: AppConfig,
    pub metrics: ChartMetrics,
    pub status_message: String,

    // View toggles
    pub show_hidden: bool,
    pub show_memo: bool,
    pub show_about: bool,

    // Open dialogs
    pub settings_draft: Option<SettingsDraft>,
    pub label_draft: Option<LabelDraft>,
    pub value_draft: Option<ValueDraft>,

    /// Chart scroll position from the previous frame.
    chart_scroll_y: f32,
    /// Bring today's column into view on the next frame.
    scroll_to_today: bool,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = AppConfig::load();
        let store = open_store(config.data_dir());
        let today = chrono::Local::now().date_naive();
        let session = Session::open(store, today);
        let status_message = match session.restore_error() {
            Some(e) => format!("Saved plan could not be read, started fresh ({})", e),
            None => format!("Ready · {}", session.store().describe()),
        };

        Self {
            metrics: ChartMetrics::from_config(&config),
            session,
            config,
            status_message,
            show_hidden: false,
            show_memo: false,
            show_about: false,
            settings_draft: None,
            label_draft: None,
            value_draft: None,
            chart_scroll_y: 0.0,
            scroll_to_today: true,
        }
    }

    fn dialog_open(&self) -> bool {
        self.settings_draft.is_some()
            || self.label_draft.is_some()
            || self.value_draft.is_some()
            || self.show_about
    }

    fn report_error(&mut self, error: PlanError) {
        if matches!(error, PlanError::OverlapLimit { .. }) {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("Too many overlapping segments")
                .set_description(error.to_string())
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
        self.status_message = error.to_string();
    }

    fn confirm(title: &str, description: &str) -> bool {
        rfd::MessageDialog::new()
            .set_title(title)
            .set_description(description)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    // --- File operations ---

    pub fn export_json(&mut self) {
        let now = chrono::Local::now().naive_local();
        let name = export_file_name(&self.session.plan().project_name, now);
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Plan JSON", &["json"])
            .set_file_name(&name)
            .save_file()
        else {
            return;
        };
        match save_plan(self.session.plan(), &path) {
            Ok(()) => self.status_message = format!("Exported to {}", path.display()),
            Err(e) => {
                warn!("Export failed: {}", e);
                self.status_message = format!("Export failed: {}", e);
            }
        }
    }

    pub fn import_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Plan JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        let plan = match load_plan(&path) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Import of {:?} failed: {}", path, e);
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Import failed")
                    .set_description(e.to_string())
                    .show();
                self.status_message = format!("Import failed: {}", e);
                return;
            }
        };
        let question = format!(
            "Replace the current plan with '{}' ({} rows)?",
            plan.project_name,
            plan.tasks.len()
        );
        if Self::confirm("Import plan", &question) {
            let name = plan.project_name.clone();
            match self.session.replace_plan(plan) {
                Ok(()) => {
                    self.status_message = format!("Imported '{}'", name);
                    self.scroll_to_today = true;
                }
                Err(e) => self.status_message = format!("Import failed: {}", e),
            }
        }
    }

    pub fn export_csv(&mut self) {
        let default_name = format!("{}.csv", self.session.plan().project_name);
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };
        match export_csv(self.session.plan(), &path) {
            Ok(count) => {
                info!("Exported {} segments to {:?}", count, path);
                self.status_message = format!("Exported {} segments to CSV", count);
            }
            Err(e) => {
                warn!("CSV export failed: {}", e);
                self.status_message = format!("CSV export failed: {}", e);
            }
        }
    }

    pub fn clear_plan(&mut self) {
        if Self::confirm("New plan", "Discard every row and start a new plan?") {
            self.session.clear_plan();
            self.status_message = "Started a new plan".to_string();
        }
    }

    pub fn open_data_folder(&mut self) {
        let Some(dir) = self.config.data_dir() else {
            self.status_message = "No data folder available".to_string();
            return;
        };
        if let Err(e) = open::that(&dir) {
            warn!("Could not open {:?}: {}", dir, e);
            self.status_message = format!("Could not open data folder: {}", e);
        }
    }

    // --- Settings ---

    pub fn open_settings(&mut self) {
        self.settings_draft = Some(SettingsDraft::from_settings(&self.session.plan().settings));
    }

    pub fn apply_settings(&mut self, draft: &SettingsDraft) -> Result<(), PlanError> {
        let holidays = parse_holidays(&draft.holidays)?;
        self.session.apply_settings(draft.start, draft.end, holidays)?;
        self.scroll_to_today = true;
        self.status_message = format!("Range: {}", self.session.timeline().range_label());
        Ok(())
    }

    // --- Editing ---

    pub fn set_mode(&mut self, mode: Mode) {
        self.session.set_mode(mode);
        self.status_message = match mode {
            Mode::Plan => "Plan mode: click two cells to add a segment".to_string(),
            Mode::Progress => "Progress mode: pick a segment, then click its days".to_string(),
        };
    }

    pub fn shift(&mut self, shift: SegmentShift) {
        if self.session.selected().is_empty() {
            self.status_message = "Select a segment first".to_string();
            return;
        }
        let changed = self.session.shift_selected(shift);
        self.status_message = format!("Adjusted {} segment(s)", changed);
    }

    pub fn shift_row(&mut self, days: i64) {
        if self.session.active_task().is_none() {
            self.status_message = "Select a row first".to_string();
            return;
        }
        let changed = self.session.shift_active_row(days);
        self.status_message = format!("Moved {} segment(s) in the row", changed);
    }

    fn handle_chart_action(&mut self, action: ChartAction) {
        match action {
            ChartAction::None => {}
            ChartAction::CellClicked { task_id, date } => match self.session.click_cell(&task_id, date) {
                Ok(ClickOutcome::Pending(start)) => {
                    self.status_message = format!("Start {}: click the end date (Esc cancels)", start);
                }
                Ok(ClickOutcome::Created { segment_id, .. }) => {
                    self.status_message = "Segment added".to_string();
                    self.label_draft = Some(LabelDraft::new(segment_id, ""));
                }
                Ok(ClickOutcome::ProgressMarked { .. }) => {
                    self.status_message = "Progress updated".to_string();
                }
                Ok(ClickOutcome::Ignored) => {}
                Err(e) => self.report_error(e),
            },
            ChartAction::SegmentClicked {
                task_id,
                segment_id,
                additive,
            } => {
                self.session.click_segment(&task_id, &segment_id, additive);
                if self.session.mode() == Mode::Progress {
                    self.status_message = match self.session.progress_segment() {
                        Some(_) => "Click days of the segment to mark progress".to_string(),
                        None => "Pick a segment to mark progress".to_string(),
                    };
                }
            }
            ChartAction::EditLabel { segment_id } => {
                if let Some((_, segment)) = self.session.plan().find_segment(&segment_id) {
                    self.label_draft = Some(LabelDraft::new(segment_id.clone(), segment.label.clone()));
                }
            }
            ChartAction::DeleteSegment { task_id, segment_id } => {
                self.session.delete_segment(&task_id, &segment_id);
                self.status_message = "Segment deleted".to_string();
            }
            ChartAction::EditValue { segment_id, date } => {
                if let Some((_, segment)) = self.session.plan().find_segment(&segment_id) {
                    let text = segment
                        .daily_values
                        .get(&date)
                        .map(|v| format_value(*v))
                        .unwrap_or_default();
                    self.value_draft = Some(ValueDraft {
                        segment_id,
                        date,
                        text,
                        error: None,
                    });
                }
            }
        }
    }

    fn handle_table_action(&mut self, action: TaskTableAction) {
        match action {
            TaskTableAction::None => {}
            TaskTableAction::Select(id) => self.session.select_task(&id),
            TaskTableAction::SetLabel(id, slot, text) => self.session.set_task_label(&id, slot, &text),
            TaskTableAction::ToggleDone(id) => self.session.toggle_done(&id),
            TaskTableAction::SetHidden(id, hidden) => {
                self.session.set_hidden(&id, hidden);
                if hidden && !self.show_hidden {
                    self.status_message = "Row hidden (View → Show hidden rows)".to_string();
                }
            }
            TaskTableAction::Delete(id) => {
                if Self::confirm("Delete row", "Delete this row and all of its segments?") {
                    self.session.delete_task(&id);
                    self.status_message = "Row deleted".to_string();
                }
            }
            TaskTableAction::Move { from, to } => self.session.move_task(from, to),
            TaskTableAction::Add => {
                self.session.add_task();
                self.status_message = "Row added".to_string();
            }
        }
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            ui.label(
                egui::RichText::new(&self.status_message)
                    .size(11.0)
                    .color(ui::theme::TEXT_SECONDARY),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dim = |text: String| egui::RichText::new(text).size(10.5).color(ui::theme::TEXT_DIM);
                if let Some(error) = self.session.last_save_error() {
                    ui.label(
                        egui::RichText::new(format!("Not saved: {}", error))
                            .size(10.5)
                            .color(ui::theme::TEXT_SUNDAY),
                    );
                    ui.label(dim(" · ".into()));
                }
                let zoom = self.metrics.cell_width / self.config.cell_width * 100.0;
                ui.label(dim(format!("Zoom: {:.0}%", zoom)));
                ui.label(dim(" · ".into()));
                ui.label(dim(format!("Rows: {}", self.session.plan().tasks.len())));
                ui.label(dim(" · ".into()));
                let mode = match self.session.mode() {
                    Mode::Plan => "Plan",
                    Mode::Progress => "Progress",
                };
                ui.label(dim(format!("Mode: {}", mode)));
            });
        });
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if !self.dialog_open() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.session.pending().is_some() {
                self.session.cancel_pending();
                self.status_message = "Cancelled".to_string();
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| self.show_status_bar(ui));

        if self.show_memo {
            egui::TopBottomPanel::bottom("memo_panel")
                .resizable(true)
                .default_height(90.0)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("Memo").strong().size(11.0));
                    let mut memo = self.session.plan().memo.clone();
                    let edit = egui::TextEdit::multiline(&mut memo)
                        .desired_width(f32::INFINITY)
                        .hint_text("Notes for this plan");
                    if ui.add_sized(ui.available_size(), edit).changed() {
                        self.session.set_memo(&memo);
                    }
                });
        }

        let rows = ui::visible_rows(&self.session, &self.metrics, self.show_hidden);

        let mut table_action = TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::TABLE_WIDTH)
            .min_width(240.0)
            .resizable(true)
            .frame(egui::Frame::default().fill(ui::theme::BG_PANEL))
            .show(ctx, |ui| {
                table_action = ui::task_table::show_task_table(&self.session, &rows, self.chart_scroll_y, ui);
            });

        let mut chart_action = ChartAction::None;
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                let scroll_to_today = std::mem::take(&mut self.scroll_to_today);
                let response = ui::gantt_chart::show_gantt_chart(
                    &self.session,
                    &rows,
                    &mut self.metrics,
                    scroll_to_today,
                    ui,
                );
                chart_action = response.action;
                if (response.scroll_y - self.chart_scroll_y).abs() > f32::EPSILON {
                    self.chart_scroll_y = response.scroll_y;
                    ctx.request_repaint();
                }
            });

        self.handle_table_action(table_action);
        self.handle_chart_action(chart_action);

        if self.settings_draft.is_some() {
            ui::dialogs::show_settings_dialog(self, ctx);
        }
        if self.label_draft.is_some() {
            ui::dialogs::show_label_dialog(self, ctx);
        }
        if self.value_draft.is_some() {
            ui::dialogs::show_value_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
