//! Plain-text export of an agent's activity log.
//!
//! Layout:
//!
//! ```text
//! Agent Name: <name>
//! Goal: <goal>
//! Exported At: <timestamp>
//!
//! --- CHAT & ACTIVITY LOG ---
//!
//! [<timestamp>] [<ROLE>] <content>
//! ```
//!
//! Content is escaped (`\\`, `\n`, `\r`) so each entry occupies exactly one
//! line and [`parse_export`] can recover it verbatim.

use super::entities::HistoryRole;
use crate::agent::entities::Agent;
use crate::core::error::DomainError;

const LOG_MARKER: &str = "--- CHAT & ACTIVITY LOG ---";

/// One entry recovered from an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedEntry {
    pub timestamp: String,
    pub role: HistoryRole,
    pub content: String,
}

/// Renders the agent's full history as a plain-text artifact.
pub fn render_export(agent: &Agent, exported_at: &str) -> String {
    let mut out = format!(
        "Agent Name: {}\nGoal: {}\nExported At: {}\n\n{}\n\n",
        agent.name, agent.goal, exported_at, LOG_MARKER
    );
    for item in &agent.history {
        out.push_str(&format!(
            "[{}] [{}] {}\n",
            item.timestamp,
            item.role,
            escape(&item.content)
        ));
    }
    out
}

/// Parses the log section of an export back into ordered entries.
pub fn parse_export(text: &str) -> Result<Vec<ExportedEntry>, DomainError> {
    let mut lines = text.lines().enumerate();
    if !lines.any(|(_, line)| line == LOG_MARKER) {
        return Err(DomainError::MalformedExport {
            line: 0,
            reason: "missing log marker".to_string(),
        });
    }

    let mut entries = Vec::new();
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        entries.push(parse_line(line).map_err(|reason| DomainError::MalformedExport {
            line: index + 1,
            reason,
        })?);
    }
    Ok(entries)
}

/// Download file name for an export: whitespace runs in the name become `_`.
pub fn export_file_name(agent: &Agent, unix_millis: i64) -> String {
    let name = agent.name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("agent_{}_logs_{}.txt", name, unix_millis)
}

fn parse_line(line: &str) -> Result<ExportedEntry, String> {
    let rest = line
        .strip_prefix('[')
        .ok_or_else(|| "entry must start with '['".to_string())?;
    let (timestamp, rest) = rest
        .split_once("] [")
        .ok_or_else(|| "missing role bracket".to_string())?;
    let (role, content) = rest
        .split_once("] ")
        .ok_or_else(|| "missing content separator".to_string())?;
    let role = role.parse::<HistoryRole>().map_err(|e| e.to_string())?;

    Ok(ExportedEntry {
        timestamp: timestamp.to_string(),
        role,
        content: unescape(content)?,
    })
}

fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(content: &str) -> Result<String, String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => return Err(format!("unknown escape '\\{}'", other)),
            None => return Err("dangling escape".to_string()),
        }
    }
    Ok(out)
}
