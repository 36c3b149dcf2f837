//! Console output formatter for agents, tools and activity

use colored::{ColoredString, Colorize};
use steward_application::{AgentUpdatedEvent, UiEvent};
use steward_domain::{
    Agent, AgentStatus, AgentTemplate, HistoryItem, HistoryRole, Task, TaskStatus, Tool,
    ToolConfiguration,
};

/// Formats agent state for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn banner() -> String {
        format!(
            "{}\n{}",
            Self::header("Steward Agent Console"),
            "Type /help for commands, /quit to exit.".dimmed()
        )
    }

    /// One line per agent; `selected` is marked with `*`.
    pub fn agent_list(agents: &[Agent], selected: Option<&Agent>) -> String {
        if agents.is_empty() {
            return format!("{}\n", "No agents yet. Create one with /new <goal>.".dimmed());
        }

        let mut output = Self::section_header("Agents");
        for (i, agent) in agents.iter().enumerate() {
            let marker = if selected.is_some_and(|s| s.id == agent.id) {
                "*".green().bold()
            } else {
                " ".normal()
            };
            let done = agent
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count();
            output.push_str(&format!(
                "{} {:>2}. {:<34} {:<11} {}/{} tasks {}{}\n",
                marker,
                i + 1,
                agent.name,
                Self::status(agent.status),
                done,
                agent.tasks.len(),
                agent.id.as_str().dimmed(),
                Self::tags(&agent.tags),
            ));
        }
        output
    }

    /// Full view of one agent: goal, tasks and the recent history.
    pub fn agent_detail(agent: &Agent, history_limit: usize) -> String {
        let mut output = Self::header(&agent.name);
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Id:".cyan().bold(), agent.id));
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), Self::status(agent.status)));
        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), agent.goal));
        if !agent.tags.is_empty() {
            output.push_str(&format!("{}{}\n", "Tags:".cyan().bold(), Self::tags(&agent.tags)));
        }

        output.push_str(&Self::section_header("Tasks"));
        for (i, task) in agent.tasks.iter().enumerate() {
            output.push_str(&Self::task_line(i, task));
        }

        output.push_str(&Self::section_header("Activity"));
        let skip = agent.history.len().saturating_sub(history_limit);
        if skip > 0 {
            output.push_str(&format!("{}\n", format!("... {} earlier entries", skip).dimmed()));
        }
        for entry in &agent.history[skip..] {
            output.push_str(&Self::history_entry(entry));
            output.push('\n');
        }
        output
    }

    fn task_line(index: usize, task: &Task) -> String {
        let icon = match task.status {
            TaskStatus::Pending => "o".dimmed(),
            TaskStatus::InProgress => ">".yellow().bold(),
            TaskStatus::AwaitingApproval => "?".magenta().bold(),
            TaskStatus::Completed => "v".green(),
            TaskStatus::Failed => "x".red(),
            TaskStatus::Skipped => "-".dimmed(),
        };
        let gate = if task.needs_approval() {
            " [approval]".magenta().to_string()
        } else {
            String::new()
        };
        let mut line = format!(
            "  {} {}. {} {}{} {}\n",
            icon,
            index + 1,
            task.name.bold(),
            format!("({})", task.tool).dimmed(),
            gate,
            task.id.as_str().dimmed(),
        );
        if let Some(result) = &task.result {
            line.push_str(&Self::indent(result, "       "));
            line.push('\n');
        }
        line
    }

    /// `[time] [ROLE] content`, colored by role.
    pub fn history_entry(entry: &HistoryItem) -> String {
        let time = entry
            .timestamp
            .get(11..19)
            .unwrap_or(entry.timestamp.as_str());
        format!(
            "{} {} {}",
            format!("[{}]", time).dimmed(),
            Self::role(entry.role),
            entry.content
        )
    }

    /// Renders a supervisor event; `None` when there is nothing to show.
    pub fn event(event: &UiEvent) -> Option<String> {
        match event {
            UiEvent::AgentCreated(agent) => Some(format!(
                "{} Created {} with {} tasks ({})",
                "+".green().bold(),
                agent.name.bold(),
                agent.tasks.len(),
                agent.id.as_str().dimmed()
            )),
            UiEvent::AgentUpdated(update) => Self::update(update),
            UiEvent::AgentDeleted { name, .. } => {
                Some(format!("{} Deleted {}", "-".red().bold(), name.bold()))
            }
            UiEvent::ReplanStarted { name, .. } => Some(format!(
                "{} Replanning {} after a failure...",
                "~".yellow().bold(),
                name.bold()
            )),
            UiEvent::Exported { path, .. } => Some(format!(
                "{} Exported activity to {}",
                "v".green(),
                path.display()
            )),
            UiEvent::BackgroundError { message } => {
                Some(format!("{} {}", "Error:".red().bold(), message))
            }
        }
    }

    fn update(update: &AgentUpdatedEvent) -> Option<String> {
        let mut lines: Vec<String> = update
            .new_entries
            .iter()
            .map(|entry| format!("{} {}", update.agent.name.cyan(), Self::history_entry(entry)))
            .collect();
        if update.status_changed() {
            lines.push(format!(
                "{} {} {} -> {}",
                update.agent.name.cyan(),
                "status".dimmed(),
                Self::status(update.previous_status),
                Self::status(update.agent.status)
            ));
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    pub fn tools(tools: &[Tool], configured: impl Fn(&str) -> ToolConfiguration) -> String {
        let mut output = Self::section_header("Tools");
        for tool in tools {
            let state = if tool.enabled {
                "on ".green().bold()
            } else {
                "off".red()
            };
            output.push_str(&format!("  [{}] {}\n", state, tool.name.bold()));
            output.push_str(&format!("        {}\n", tool.description.dimmed()));

            let values = configured(&tool.name);
            for field in &tool.configuration_fields {
                let value = match values.get(&field.name) {
                    Some(v) if field.kind.is_secret() && !v.is_empty() => "********".to_string(),
                    Some(v) => v.clone(),
                    None => format!("<{}>", field.placeholder).dimmed().to_string(),
                };
                output.push_str(&format!("        {}={}\n", field.name.cyan(), value));
            }
        }
        output
    }

    pub fn templates(templates: &[AgentTemplate]) -> String {
        let mut output = Self::section_header("Templates");
        for (i, template) in templates.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, template.name.bold()));
            output.push_str(&format!("{}\n", Self::indent(template.goal, "     ")));
        }
        output.push_str(&format!("\n{}\n", "Use /new <number> to start from a template.".dimmed()));
        output
    }

    pub fn help() -> String {
        let commands: &[(&str, &str)] = &[
            ("/list", "List agents"),
            ("/show [agent]", "Show tasks and activity"),
            ("/select <agent>", "Select the agent other commands act on"),
            ("/new <goal|n> [#tag]", "Plan a new agent (n picks a template)"),
            ("/templates", "List goal templates"),
            ("/run | /pause | /reset", "Control the selected agent"),
            ("/approve | /deny [task]", "Resolve an approval gate"),
            ("/say <message>", "Send a follow-up (plain text works too)"),
            ("/tags <tag...>", "Replace the selected agent's tags"),
            ("/tools", "List tools and their settings"),
            ("/toggle <tool>", "Enable or disable a tool"),
            ("/configure <tool> k=v", "Save tool settings"),
            ("/export", "Write the activity log to a file"),
            ("/delete", "Delete the selected agent"),
            ("/quit", "Exit"),
        ];
        let mut output = Self::section_header("Commands");
        for (command, description) in commands {
            output.push_str(&format!("  {:<26} {}\n", command.cyan(), description));
        }
        output
    }

    pub fn status(status: AgentStatus) -> ColoredString {
        match status {
            AgentStatus::Idle => status.as_str().normal(),
            AgentStatus::Running => status.as_str().green().bold(),
            AgentStatus::Paused => status.as_str().yellow(),
            AgentStatus::Replanning => status.as_str().magenta().bold(),
            AgentStatus::Finished => status.as_str().blue(),
            AgentStatus::Error => status.as_str().red().bold(),
        }
    }

    fn role(role: HistoryRole) -> ColoredString {
        let label = format!("[{}]", role.as_str());
        match role {
            HistoryRole::User => label.green().bold(),
            HistoryRole::Agent => label.cyan().bold(),
            HistoryRole::System => label.yellow(),
            HistoryRole::ToolInput => label.blue(),
            HistoryRole::ToolOutput => label.magenta(),
        }
    }

    fn tags(tags: &[String]) -> String {
        tags.iter().map(|t| format!(" #{}", t)).collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_domain::{HistoryItem, sample_agents};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_history_entry_uses_clock_time() {
        plain();
        let entry = HistoryItem::new(HistoryRole::System, "Agent started.")
            .at("2024-05-01T09:15:42.123Z");
        assert_eq!(
            ConsoleFormatter::history_entry(&entry),
            "[09:15:42] [SYSTEM] Agent started."
        );
    }

    #[test]
    fn test_agent_list_marks_selection() {
        plain();
        let agents = sample_agents();
        let listing = ConsoleFormatter::agent_list(&agents, agents.get(1));
        let lines: Vec<&str> = listing.lines().filter(|l| l.contains("tasks")).collect();
        assert_eq!(lines.len(), agents.len());
        assert!(lines[1].starts_with('*'));
        assert!(!lines[0].starts_with('*'));
    }

    #[test]
    fn test_detail_truncates_history() {
        plain();
        let mut agent = sample_agents().remove(0);
        for i in 0..5 {
            agent.record(HistoryRole::User, format!("note {}", i));
        }
        let detail = ConsoleFormatter::agent_detail(&agent, 2);
        assert!(detail.contains("note 4"));
        assert!(detail.contains("note 3"));
        assert!(!detail.contains("note 2"));
        assert!(detail.contains("earlier entries"));
    }

    #[test]
    fn test_update_event_lists_new_entries_and_status() {
        plain();
        let mut agent = sample_agents().remove(0);
        agent.record(HistoryRole::System, "Agent paused.");
        let event = UiEvent::AgentUpdated(Box::new(AgentUpdatedEvent {
            previous_status: AgentStatus::Running,
            new_entries: vec![agent.history.last().unwrap().clone()],
            agent: Agent {
                status: AgentStatus::Paused,
                ..agent
            },
        }));
        let text = ConsoleFormatter::event(&event).unwrap();
        assert!(text.contains("Agent paused."));
        assert!(text.contains("RUNNING -> PAUSED"));
    }

    #[test]
    fn test_secret_fields_are_masked() {
        plain();
        let tools = steward_domain::default_tools();
        let text = ConsoleFormatter::tools(&tools, |name| {
            if name == "SlackAPI" {
                ToolConfiguration::from([("botToken".to_string(), "xoxb-secret".to_string())])
            } else {
                ToolConfiguration::new()
            }
        });
        assert!(!text.contains("xoxb-secret"));
        assert!(text.contains("botToken=********"));
    }
}
