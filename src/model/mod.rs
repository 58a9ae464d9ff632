pub mod plan;
pub mod task;
pub mod timeline;

pub use plan::{Plan, Settings};
pub use task::{LabelSlot, Segment, SegmentKind, Task};
pub use timeline::{DateWindow, Timeline, TimelineDay};
