use std::path::Path;

use chrono::NaiveDateTime;
use log::info;

use crate::error::StorageError;
use crate::model::Plan;

/// Save a plan to a pretty-printed JSON file.
pub fn save_plan(plan: &Plan, path: &Path) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json).map_err(|e| StorageError::io(path, e))?;
    info!("Exported plan '{}' to {:?}", plan.project_name, path);
    Ok(())
}

/// Load a plan from a JSON file. Nothing is returned unless the whole
/// document parses.
pub fn load_plan(path: &Path) -> Result<Plan, StorageError> {
    let json = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    let plan = parse_plan(&json)?;
    info!("Read plan '{}' from {:?}", plan.project_name, path);
    Ok(plan)
}

/// Parse a plan document and check it against the model rules.
pub fn parse_plan(json: &str) -> Result<Plan, StorageError> {
    let plan: Plan = serde_json::from_str(json)?;
    plan.validate()?;
    Ok(plan)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || matches!(c,
            '\u{3040}'..='\u{30ff}' // kana
            | '\u{4e00}'..='\u{9faf}' // CJK ideographs
            | '\u{ff10}'..='\u{ff19}' // full-width digits
        )
}

/// Collapse every run of unsupported characters into a single `_` and trim
/// underscores from both ends.
pub fn sanitize_project_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if is_name_char(c) { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// File name for an export: `<sanitized name>_<YYYYMMDDHHMM>.json`.
pub fn export_file_name(project_name: &str, now: NaiveDateTime) -> String {
    let name = sanitize_project_name(project_name);
    let name = if name.is_empty() { "plan".to_string() } else { name };
    format!("{}_{}.json", name, now.format("%Y%m%d%H%M"))
}
