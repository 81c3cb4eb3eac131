//! Presentation of bug search results.
//!
//! Both renderers are pure functions of an already collected row list and
//! never filter or reorder it.
use serde::Serialize;

/// HTML rendering through a Tera template.
pub mod html;

/// Aligned plain-text console table.
pub mod table;

/// Owner shown for tasks without an assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// One reported bug task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BugRow {
    pub charm: String,
    pub status: String,
    pub description: String,
    pub owner: String,
    pub priority: String,
    pub link: String,
}
