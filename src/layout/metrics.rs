use std::ops::Range;

use crate::config::AppConfig;

const MIN_CELL_WIDTH: f32 = 14.0;
const MAX_CELL_WIDTH: f32 = 56.0;

/// Pixel constants shared by layout and rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMetrics {
    /// Width of one day column.
    pub cell_width: f32,
    pub base_row_height: f32,
    pub margin_top: f32,
    pub lane_height: f32,
    /// Labels float this far above their lane.
    pub label_offset: f32,
    /// Daily value labels sit this far below their lane.
    pub value_offset: f32,
    pub bar_thickness: f32,
}

impl Default for ChartMetrics {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ChartMetrics {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cell_width: config.cell_width.clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH),
            base_row_height: config.base_row_height,
            margin_top: config.margin_top,
            lane_height: config.lane_height,
            label_offset: 20.0,
            value_offset: 8.0,
            bar_thickness: 6.0,
        }
    }

    pub fn column_left(&self, index: usize) -> f32 {
        index as f32 * self.cell_width
    }

    pub fn column_center(&self, index: usize) -> f32 {
        self.column_left(index) + self.cell_width / 2.0
    }

    /// Column under an x offset, clamped to `0..len`.
    pub fn column_at(&self, x: f32, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = (x / self.cell_width).floor().max(0.0) as usize;
        Some(index.min(len - 1))
    }

    /// Vertical anchor of a lane within its row.
    pub fn lane_top(&self, lane: usize) -> f32 {
        self.margin_top + lane as f32 * self.lane_height
    }

    /// Row height for a given number of lanes.
    pub fn row_height(&self, lane_count: usize) -> f32 {
        self.base_row_height
            .max(self.margin_top + lane_count as f32 * self.lane_height)
    }

    /// Total width of `days` columns.
    pub fn total_width(&self, days: usize) -> f32 {
        self.column_left(days)
    }

    /// Columns that overlap `[x_min, x_max)`, both relative to column 0.
    pub fn visible_columns(&self, x_min: f32, x_max: f32, len: usize) -> Range<usize> {
        if len == 0 || x_max <= x_min {
            return 0..0;
        }
        let first = (x_min / self.cell_width).floor().max(0.0) as usize;
        let last = (x_max / self.cell_width).ceil().max(0.0) as usize;
        first.min(len)..last.min(len)
    }

    /// Horizontal scroll offset that centres column `index` in a viewport.
    pub fn centering_offset(&self, index: usize, viewport_width: f32) -> f32 {
        (self.column_center(index) - viewport_width / 2.0).max(0.0)
    }

    pub fn zoom_in(&mut self) {
        self.cell_width = (self.cell_width * 1.2).min(MAX_CELL_WIDTH);
    }

    pub fn zoom_out(&mut self) {
        self.cell_width = (self.cell_width / 1.2).max(MIN_CELL_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_height_grows_per_lane() {
        let m = ChartMetrics::default();
        assert_eq!(m.row_height(0), 52.0);
        assert_eq!(m.row_height(1), 74.0);
        assert_eq!(m.row_height(3), 162.0);
        let mut previous = 0.0;
        for lanes in 0..10 {
            let h = m.row_height(lanes);
            assert!(h >= previous);
            previous = h;
        }
    }

    #[test]
    fn column_lookup_clamps() {
        let m = ChartMetrics::default();
        assert_eq!(m.column_center(0), 14.0);
        assert_eq!(m.column_at(-5.0, 10), Some(0));
        assert_eq!(m.column_at(57.0, 10), Some(2));
        assert_eq!(m.column_at(10_000.0, 10), Some(9));
        assert_eq!(m.column_at(3.0, 0), None);
    }

    #[test]
    fn visible_columns_follow_the_viewport() {
        let m = ChartMetrics::default();
        assert_eq!(m.visible_columns(0.0, 100.0, 90), 0..4);
        assert_eq!(m.visible_columns(56.0, 112.0, 90), 2..4);
        assert_eq!(m.visible_columns(-40.0, 30.0, 90), 0..2);
        assert_eq!(m.visible_columns(2_000.0, 3_000.0, 90), 71..90);
        assert_eq!(m.visible_columns(5_000.0, 6_000.0, 90), 90..90);
        assert_eq!(m.visible_columns(0.0, 100.0, 0), 0..0);
    }

    #[test]
    fn centering_offset_puts_the_column_mid_view() {
        let m = ChartMetrics::default();
        assert_eq!(m.centering_offset(50, 400.0), 1_414.0 - 200.0);
        assert_eq!(m.centering_offset(2, 400.0), 0.0);
    }

    #[test]
    fn zoom_stays_in_bounds() {
        let mut m = ChartMetrics::default();
        for _ in 0..20 {
            m.zoom_in();
        }
        assert_eq!(m.cell_width, MAX_CELL_WIDTH);
        for _ in 0..20 {
            m.zoom_out();
        }
        assert_eq!(m.cell_width, MIN_CELL_WIDTH);
    }
}
