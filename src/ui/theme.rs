use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_ACTIVE_ROW: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 28);
pub const BG_WEEKEND: Color32 = Color32::from_rgb(36, 34, 46);
pub const BG_HOLIDAY: Color32 = Color32::from_rgb(52, 34, 40);
pub const BG_TODAY: Color32 = Color32::from_rgb(40, 48, 62);
pub const BG_TOTALS: Color32 = Color32::from_rgb(28, 32, 42);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 42, 54);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_SUNDAY: Color32 = Color32::from_rgb(230, 110, 110);
pub const TEXT_SATURDAY: Color32 = Color32::from_rgb(110, 150, 230);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);

pub const SEGMENT: Color32 = Color32::from_rgb(66, 133, 244);
pub const SEGMENT_DONE: Color32 = Color32::from_rgb(110, 115, 130);
pub const PROGRESS: Color32 = Color32::from_rgb(52, 168, 83);
pub const SELECTED: Color32 = Color32::from_rgb(255, 193, 7);
pub const PROGRESS_TARGET: Color32 = Color32::from_rgb(0, 188, 212);
pub const PENDING: Color32 = Color32::from_rgb(251, 140, 0);
pub const VALUE_TEXT: Color32 = Color32::from_rgb(200, 205, 220);

// ── Sizes ────────────────────────────────────────────────────────────────────

/// Month/day line plus weekday line.
pub const HEADER_HEIGHT: f32 = 44.0;
pub const TOTALS_HEIGHT: f32 = 24.0;
pub const MARKER_RADIUS: f32 = 6.0;
pub const TABLE_WIDTH: f32 = 360.0;
pub const STATUS_BAR_HEIGHT: f32 = 22.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_label() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

/// Dimmed variant used for hidden rows shown on request.
pub fn dimmed(color: Color32) -> Color32 {
    color.gamma_multiply(0.4)
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    let rounding = Rounding::same(4.0);

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 28);
    visuals.faint_bg_color = BG_PANEL;
    visuals.striped = false;

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = BG_PANEL;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    widgets.inactive.bg_fill = Color32::from_rgb(42, 44, 56);
    widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    widgets.hovered.bg_fill = Color32::from_rgb(52, 54, 68);
    widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    widgets.active.bg_fill = Color32::from_rgb(60, 62, 76);
    widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    for w in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        w.rounding = rounding;
    }

    visuals.selection.bg_fill = Color32::from_rgba_premultiplied(80, 140, 220, 45);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    ctx.set_style(style);
}
