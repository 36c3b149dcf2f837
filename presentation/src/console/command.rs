//! Console command parsing
//!
//! Turns one input line into a [`Command`]. Lines not starting with `/` are
//! follow-up messages for the selected agent.

use std::collections::BTreeMap;
use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show(Option<String>),
    Select(String),
    New { goal: String, tags: Vec<String> },
    Templates,
    Run(Option<String>),
    Pause(Option<String>),
    Reset(Option<String>),
    Approve(Option<String>),
    Deny(Option<String>),
    Say(String),
    Tags(Vec<String>),
    Tools,
    Toggle(String),
    Configure {
        tool: String,
        values: BTreeMap<String, String>,
    },
    Export(Option<String>),
    Delete(Option<String>),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try /help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Expected key=value, got {0:?}")]
    InvalidAssignment(String),
}

/// Parses a non-empty, trimmed input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Ok(Command::Say(line.to_string()));
    }

    let (command, args) = match line.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (line, ""),
    };
    let optional = || (!args.is_empty()).then(|| args.to_string());

    let parsed = match command {
        "/help" | "/h" | "/?" => Command::Help,
        "/list" | "/ls" => Command::List,
        "/show" => Command::Show(optional()),
        "/select" | "/use" => {
            if args.is_empty() {
                return Err(CommandError::Usage("/select <agent>"));
            }
            Command::Select(args.to_string())
        }
        "/new" => {
            let (goal, tags) = split_tags(args);
            if goal.is_empty() {
                return Err(CommandError::Usage("/new <goal | template number> [#tag ...]"));
            }
            Command::New { goal, tags }
        }
        "/templates" => Command::Templates,
        "/run" | "/start" => Command::Run(optional()),
        "/pause" => Command::Pause(optional()),
        "/reset" | "/stop" => Command::Reset(optional()),
        "/approve" => Command::Approve(optional()),
        "/deny" => Command::Deny(optional()),
        "/say" => {
            if args.is_empty() {
                return Err(CommandError::Usage("/say <message>"));
            }
            Command::Say(args.to_string())
        }
        "/tags" => Command::Tags(
            args.split_whitespace()
                .map(|t| t.trim_start_matches('#').to_string())
                .collect(),
        ),
        "/tools" => Command::Tools,
        "/toggle" => {
            if args.is_empty() {
                return Err(CommandError::Usage("/toggle <tool>"));
            }
            Command::Toggle(args.to_string())
        }
        "/configure" | "/config" => {
            let mut words = args.split_whitespace();
            let Some(tool) = words.next() else {
                return Err(CommandError::Usage("/configure <tool> key=value ..."));
            };
            let mut values = BTreeMap::new();
            for word in words {
                let Some((key, value)) = word.split_once('=').filter(|(k, _)| !k.is_empty())
                else {
                    return Err(CommandError::InvalidAssignment(word.to_string()));
                };
                values.insert(key.to_string(), value.to_string());
            }
            Command::Configure {
                tool: tool.to_string(),
                values,
            }
        }
        "/export" => Command::Export(optional()),
        "/delete" | "/rm" => Command::Delete(optional()),
        "/quit" | "/exit" | "/q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(parsed)
}

/// Separates `#tag` tokens from the rest of the text.
fn split_tags(args: &str) -> (String, Vec<String>) {
    let mut words = Vec::new();
    let mut tags = Vec::new();
    for word in args.split_whitespace() {
        match word.strip_prefix('#') {
            Some(tag) if !tag.is_empty() => tags.push(tag.to_string()),
            _ => words.push(word),
        }
    }
    (words.join(" "), tags)
}
