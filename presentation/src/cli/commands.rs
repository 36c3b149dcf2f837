//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for steward
#[derive(Parser, Debug)]
#[command(name = "steward")]
#[command(author, version, about = "Supervise autonomous agents that plan, execute and ask for approval")]
#[command(long_about = r#"
Steward is an interactive console for goal-driven agents.

Each agent turns a goal into a plan of tool-bound tasks and works through
them one by one. Risky steps pause for your approval, failures trigger an
automatic replan, and everything the agent does is kept in an activity log
you can export.

Tool calls are simulated: they take a configurable time and succeed with a
configurable probability.

Configuration files are loaded from (in priority order):
1. STEWARD_* environment variables (e.g. STEWARD_EXECUTION__THINK_MS=0)
2. --config <path>     Explicit config file
3. ./steward.toml      Project-level config
4. ~/.config/steward/config.toml   Global config

Example:
  steward
  steward --fast --fresh
  steward --data-dir ./demo-data -vv
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for persisted agents and tool settings
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Start from the sample agents, ignoring persisted ones
    #[arg(long)]
    pub fresh: bool,

    /// Skip all simulated delays
    #[arg(long)]
    pub fast: bool,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
