//! Lane packing, projection, overlap checks and daily totals.

pub mod geometry;
pub mod lanes;
pub mod metrics;
pub mod totals;
pub mod validator;

pub use geometry::{layout_row, project_segment, RowLayout, SegmentGeometry, SegmentShape};
pub use lanes::{assign_lanes, LaneLayout};
pub use metrics::ChartMetrics;
pub use totals::{compute_totals, format_total, format_value, DailyTotals};
pub use validator::{can_place_segment, MAX_CONCURRENT_SEGMENTS};
