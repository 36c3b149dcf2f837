//! Agent activity history: entries, roles, and the plain-text export format.

pub mod entities;
pub mod export;

pub use entities::{HistoryItem, HistoryRole, now_rfc3339};
pub use export::{ExportedEntry, export_file_name, parse_export, render_export};
