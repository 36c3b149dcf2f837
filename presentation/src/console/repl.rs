//! Interactive agent console
//!
//! Line editing runs on a dedicated thread (reedline blocks). Each submitted
//! line travels to the async side together with an acknowledgement channel;
//! the editor waits for the ack before prompting again, so command output is
//! never interleaved with the prompt. Events that arrive while the user is
//! typing are drawn above the prompt through reedline's external printer.

use super::command::{Command, CommandError, parse_command};
use crate::output::ConsoleFormatter;
use crate::progress::PlannerSpinner;
use colored::Colorize;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, ExternalPrinter, FileBackedHistory, Reedline, Signal,
};
use std::path::PathBuf;
use std::thread;
use steward_application::{
    AgentSupervisor, ApprovalDecision, ControlAction, CreateAgentInput, SupervisorError, UiEvent,
};
use steward_domain::{Agent, AgentId, TaskId, agent_templates};
use steward_domain::core::string::prefix_with_ellipsis;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 500;
const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error("No agent selected. Use /select <agent> or /new <goal>.")]
    NoSelection,

    #[error("No agent matches {0:?}")]
    UnknownAgent(String),

    #[error("No task matches {0:?}")]
    UnknownTask(String),

    #[error("No task is awaiting approval")]
    NothingToApprove,
}

/// Whether the console keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A line submitted by the editor thread. `None` means end of input.
struct Submitted {
    text: Option<String>,
    /// Answered with the next prompt label, or `None` to stop reading.
    ack: oneshot::Sender<Option<String>>,
}

/// REPL over an [`AgentSupervisor`]
pub struct AgentConsole {
    supervisor: AgentSupervisor,
    events: mpsc::UnboundedReceiver<UiEvent>,
    selected: Option<AgentId>,
    history_file: Option<PathBuf>,
    history_limit: usize,
}

impl AgentConsole {
    pub fn new(supervisor: AgentSupervisor, events: mpsc::UnboundedReceiver<UiEvent>) -> Self {
        let selected = supervisor.store().agents().first().map(|a| a.id.clone());
        Self {
            supervisor,
            events,
            selected,
            history_file: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Persist line history to `path`.
    pub fn with_history_file(mut self, path: PathBuf) -> Self {
        self.history_file = Some(path);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Runs until `/quit`, Ctrl-D or the editor thread goes away.
    pub async fn run(mut self) {
        println!("{}", ConsoleFormatter::banner());
        print!(
            "{}",
            ConsoleFormatter::agent_list(self.supervisor.store().agents(), self.selected_agent())
        );
        self.print_pending_events();

        let printer = ExternalPrinter::<String>::default();
        let (line_tx, mut lines) = mpsc::unbounded_channel();
        let editor = spawn_editor(
            self.history_file.clone(),
            printer.clone(),
            self.prompt_label(),
            line_tx,
        );

        loop {
            tokio::select! {
                submitted = lines.recv() => {
                    let Some(Submitted { text, ack }) = submitted else {
                        break;
                    };
                    let flow = match text {
                        Some(text) => self.handle_line(&text).await,
                        None => Flow::Quit,
                    };
                    self.print_pending_events();
                    let next = (flow == Flow::Continue).then(|| self.prompt_label());
                    let _ = ack.send(next);
                    if flow == Flow::Quit {
                        break;
                    }
                }
                _ = self.supervisor.next_update() => {}
                Some(event) = self.events.recv() => {
                    if let Some(text) = ConsoleFormatter::event(&event) {
                        if printer.print(text).is_err() {
                            debug!("External printer closed");
                        }
                    }
                }
            }
        }

        self.supervisor.shutdown();
        drop(lines);
        if editor.join().is_err() {
            warn!("Line editor thread panicked");
        }
        println!("Bye!");
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        let result = match parse_command(line) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => Err(e.into()),
        };
        result.unwrap_or_else(|e| {
            eprintln!("{} {}", "Error:".red().bold(), e);
            Flow::Continue
        })
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow, ConsoleError> {
        match command {
            Command::Help => print!("{}", ConsoleFormatter::help()),
            Command::List => print!(
                "{}",
                ConsoleFormatter::agent_list(
                    self.supervisor.store().agents(),
                    self.selected_agent()
                )
            ),
            Command::Show(reference) => {
                let id = self.target(reference.as_deref())?;
                if let Some(agent) = self.supervisor.store().get(&id) {
                    println!("{}", ConsoleFormatter::agent_detail(agent, self.history_limit));
                }
            }
            Command::Select(reference) => {
                let id = self.target(Some(&reference))?;
                self.selected = Some(id);
                if let Some(agent) = self.selected_agent() {
                    println!("Selected {}", agent.name.bold());
                }
            }
            Command::New { goal, tags } => {
                let goal = template_goal(&goal).map(str::to_string).unwrap_or(goal);
                let spinner = PlannerSpinner::start("Planning tasks...");
                let result = self
                    .supervisor
                    .create_agent(CreateAgentInput::new(goal).with_tags(tags))
                    .await;
                spinner.finish();
                self.selected = Some(result?.id);
            }
            Command::Templates => print!("{}", ConsoleFormatter::templates(agent_templates())),
            Command::Run(reference) => self.control(reference, ControlAction::Run)?,
            Command::Pause(reference) => self.control(reference, ControlAction::Pause)?,
            Command::Reset(reference) => self.control(reference, ControlAction::Reset)?,
            Command::Approve(task) => self.resolve(task, ApprovalDecision::Approve)?,
            Command::Deny(task) => self.resolve(task, ApprovalDecision::Deny)?,
            Command::Say(message) => {
                let id = self.target(None)?;
                let spinner = PlannerSpinner::start("Considering your message...");
                let result = self.supervisor.send_message(&id, &message).await;
                spinner.finish();
                result?;
            }
            Command::Tags(tags) => {
                let id = self.target(None)?;
                let agent = self.supervisor.update_tags(&id, &tags)?;
                if agent.tags.is_empty() {
                    println!("Cleared tags of {}", agent.name.bold());
                } else {
                    println!("Tagged {}: #{}", agent.name.bold(), agent.tags.join(" #"));
                }
            }
            Command::Tools => {
                let store = self.supervisor.store();
                print!(
                    "{}",
                    ConsoleFormatter::tools(store.tools(), |name| store.tool_configuration(name))
                );
            }
            Command::Toggle(tool) => {
                let enabled = self.supervisor.toggle_tool(&tool)?;
                let state = if enabled {
                    "enabled".green()
                } else {
                    "disabled".red()
                };
                println!("{} {}", tool.bold(), state);
            }
            Command::Configure { tool, values } => {
                let saved = self.supervisor.configure_tool(&tool, values)?;
                println!("Saved {} setting(s) for {}", saved.len(), tool.bold());
            }
            Command::Export(reference) => {
                let id = self.target(reference.as_deref())?;
                self.supervisor.export(&id)?;
            }
            Command::Delete(reference) => {
                let id = self.target(reference.as_deref())?;
                self.supervisor.delete(&id)?;
                if self.selected.as_ref() == Some(&id) {
                    self.selected = None;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn control(&mut self, reference: Option<String>, action: ControlAction) -> Result<(), ConsoleError> {
        let id = self.target(reference.as_deref())?;
        self.supervisor.control(&id, action)?;
        Ok(())
    }

    fn resolve(&mut self, task: Option<String>, decision: ApprovalDecision) -> Result<(), ConsoleError> {
        let id = self.target(None)?;
        let agent = self
            .supervisor
            .store()
            .get(&id)
            .ok_or_else(|| ConsoleError::UnknownAgent(id.to_string()))?;
        let task_id = resolve_task(agent, task.as_deref())?;
        self.supervisor.resolve_approval(&id, &task_id, decision)?;
        Ok(())
    }

    /// The referenced agent, or the selection when no reference is given.
    fn target(&self, reference: Option<&str>) -> Result<AgentId, ConsoleError> {
        match reference {
            Some(reference) => self
                .supervisor
                .store()
                .find(reference)
                .map(|agent| agent.id.clone())
                .ok_or_else(|| ConsoleError::UnknownAgent(reference.to_string())),
            None => self
                .selected_agent()
                .map(|agent| agent.id.clone())
                .ok_or(ConsoleError::NoSelection),
        }
    }

    fn selected_agent(&self) -> Option<&Agent> {
        self.selected
            .as_ref()
            .and_then(|id| self.supervisor.store().get(id))
    }

    fn prompt_label(&self) -> String {
        match self.selected_agent() {
            Some(agent) => format!("steward:{}", prefix_with_ellipsis(&agent.name, 20)),
            None => "steward".to_string(),
        }
    }

    /// Prints events raised while a command ran.
    fn print_pending_events(&mut self) {
        self.supervisor.pump();
        while let Ok(event) = self.events.try_recv() {
            if let Some(text) = ConsoleFormatter::event(&event) {
                println!("{}", text);
            }
        }
    }
}

/// Goal text of template `n` (1-based) when `goal` is just a number.
fn template_goal(goal: &str) -> Option<&'static str> {
    let n: usize = goal.trim().parse().ok()?;
    agent_templates()
        .get(n.checked_sub(1)?)
        .map(|template| template.goal)
}

/// Finds a task by id or 1-based position; defaults to the pending gate.
fn resolve_task(agent: &Agent, reference: Option<&str>) -> Result<TaskId, ConsoleError> {
    let Some(reference) = reference else {
        return agent
            .awaiting_approval()
            .map(|task| task.id.clone())
            .ok_or(ConsoleError::NothingToApprove);
    };
    if let Some(task) = agent.task(&TaskId::new(reference)) {
        return Ok(task.id.clone());
    }
    reference
        .parse::<usize>()
        .ok()
        .and_then(|n| agent.tasks.get(n.checked_sub(1)?))
        .map(|task| task.id.clone())
        .ok_or_else(|| ConsoleError::UnknownTask(reference.to_string()))
}

fn prompt(label: String) -> DefaultPrompt {
    DefaultPrompt::new(DefaultPromptSegment::Basic(label), DefaultPromptSegment::Empty)
}

fn spawn_editor(
    history_file: Option<PathBuf>,
    printer: ExternalPrinter<String>,
    label: String,
    lines: mpsc::UnboundedSender<Submitted>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut editor = Reedline::create().with_external_printer(printer);
        if let Some(path) = history_file {
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!("Line history unavailable: {}", e),
            }
        }

        let mut current = prompt(label);
        loop {
            let text = match editor.read_line(&current) {
                Ok(Signal::Success(buffer)) => Some(buffer),
                Ok(Signal::CtrlD) => None,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Line editor failed: {}", e);
                    None
                }
            };
            let (ack, answer) = oneshot::channel();
            if lines.send(Submitted { text, ack }).is_err() {
                break;
            }
            match answer.blocking_recv() {
                Ok(Some(label)) => current = prompt(label),
                _ => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use steward_application::{
        AgentStore, AlwaysSucceed, ExecutionOrchestrator, ExecutionTimings, ExportError,
        ExportWriterPort, InMemoryPersistence, PlannerError, PlannerPort,
    };
    use steward_domain::{AgentStatus, TaskDescriptor, TaskStatus, sample_agents};

    struct FixedPlanner;

    #[async_trait]
    impl PlannerPort for FixedPlanner {
        async fn create_plan(
            &self,
            _goal: &str,
            _enabled_tools: &[String],
        ) -> Result<Vec<TaskDescriptor>, PlannerError> {
            Ok(vec![
                TaskDescriptor::new("Look", "desc", "GoogleSearch"),
                TaskDescriptor::new("Act", "desc", "GenericAPI").with_approval(),
            ])
        }

        async fn generate_follow_up(
            &self,
            _agent: &Agent,
            _message: &str,
            _enabled_tools: &[String],
        ) -> Result<Vec<TaskDescriptor>, PlannerError> {
            Ok(vec![TaskDescriptor::new("Extra", "desc", "GenericAPI")])
        }

        async fn replan(
            &self,
            _agent: &Agent,
            _enabled_tools: &[String],
        ) -> Result<Vec<TaskDescriptor>, PlannerError> {
            Err(PlannerError::NoToolsForReplan)
        }
    }

    struct NoExport;

    impl ExportWriterPort for NoExport {
        fn write(&self, file_name: &str, _contents: &str) -> Result<PathBuf, ExportError> {
            Ok(PathBuf::from(file_name))
        }
    }

    fn console() -> AgentConsole {
        colored::control::set_override(false);
        let (tx, rx) = mpsc::unbounded_channel();
        let store = AgentStore::load(Arc::new(InMemoryPersistence::new()));
        let orchestrator =
            ExecutionOrchestrator::new(Arc::new(AlwaysSucceed), ExecutionTimings::instant());
        let supervisor =
            AgentSupervisor::new(store, Arc::new(FixedPlanner), orchestrator, Arc::new(NoExport), tx);
        AgentConsole::new(supervisor, rx)
    }

    #[test]
    fn test_template_goal_by_number() {
        assert_eq!(template_goal("1"), Some(agent_templates()[0].goal));
        assert_eq!(template_goal("0"), None);
        assert_eq!(template_goal("99"), None);
        assert_eq!(template_goal("Watch the backups"), None);
    }

    #[test]
    fn test_resolve_task_by_id_position_and_gate() {
        let mut agent = sample_agents().remove(0);
        let second = agent.tasks[1].id.clone();
        assert_eq!(resolve_task(&agent, Some(second.as_str())).unwrap(), second);
        assert_eq!(resolve_task(&agent, Some("2")).unwrap(), second);
        assert!(matches!(
            resolve_task(&agent, Some("42")),
            Err(ConsoleError::UnknownTask(_))
        ));

        for task in &mut agent.tasks {
            if task.status == TaskStatus::AwaitingApproval {
                task.status = TaskStatus::Pending;
            }
        }
        assert!(matches!(
            resolve_task(&agent, None),
            Err(ConsoleError::NothingToApprove)
        ));
        agent.tasks[0].status = TaskStatus::AwaitingApproval;
        assert_eq!(resolve_task(&agent, None).unwrap(), agent.tasks[0].id);
    }

    #[tokio::test]
    async fn test_new_from_template_selects_agent() {
        let mut console = console();
        let before = console.supervisor.store().agents().len();
        assert_eq!(console.handle_line("/new 2 #security").await, Flow::Continue);

        let agents = console.supervisor.store().agents();
        assert_eq!(agents.len(), before + 1);
        let created = agents.last().unwrap();
        assert_eq!(created.goal, agent_templates()[1].goal);
        assert_eq!(created.tags, ["security"]);
        assert_eq!(console.selected.as_ref(), Some(&created.id));
        assert!(console.prompt_label().starts_with("steward:"));
    }

    #[tokio::test]
    async fn test_run_until_gate_then_approve() {
        let mut console = console();
        console
            .handle_line("/new Keep an eye on the nightly backup jobs")
            .await;
        let id = console.selected.clone().unwrap();

        console.handle_line("/run").await;
        while console.supervisor.store().get(&id).unwrap().status == AgentStatus::Running {
            console.supervisor.next_update().await;
        }
        let agent = console.supervisor.store().get(&id).unwrap();
        assert_eq!(agent.status, AgentStatus::Paused);
        assert_eq!(agent.tasks[1].status, TaskStatus::AwaitingApproval);

        console.handle_line("/approve").await;
        while console.supervisor.store().get(&id).unwrap().status != AgentStatus::Finished {
            console.supervisor.next_update().await;
        }
        assert!(
            console
                .supervisor
                .store()
                .get(&id)
                .unwrap()
                .tasks
                .iter()
                .all(|t| t.status == TaskStatus::Completed)
        );
    }

    #[tokio::test]
    async fn test_delete_clears_selection() {
        let mut console = console();
        let first = console.selected.clone().unwrap();
        console.handle_line("/delete").await;
        assert!(console.selected.is_none());
        assert!(console.supervisor.store().get(&first).is_none());
        assert!(matches!(
            console.target(None),
            Err(ConsoleError::NoSelection)
        ));
    }

    #[tokio::test]
    async fn test_quit_and_errors_keep_flow() {
        let mut console = console();
        assert_eq!(console.handle_line("/nope").await, Flow::Continue);
        assert_eq!(console.handle_line("/select nobody").await, Flow::Continue);
        assert_eq!(console.handle_line("").await, Flow::Continue);
        assert_eq!(console.handle_line("/quit").await, Flow::Quit);
    }
}
