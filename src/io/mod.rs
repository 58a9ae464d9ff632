pub mod csv_export;
pub mod file;
pub mod storage;

pub use file::{export_file_name, load_plan, parse_plan, save_plan};
pub use storage::{open_store, FileStore, MemoryStore, PlanStore, PLAN_SLOT};
