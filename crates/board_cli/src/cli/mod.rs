use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Local kanban task board", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in
    ///
    /// Example: board login --email intern@demo.com --password intern123 --remember
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Stay signed in across restarts
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and wipe all tasks and activity
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Add a new task to To Do
    ///
    /// Example: board add "Write report" --priority high --due 2026-03-01 --tag work
    Add {
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// Edit a task
    ///
    /// Example: board edit 3f2a... --title "Write final report" --clear-due
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
        /// Tag to append
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Drop existing tags before appending
        #[arg(long)]
        clear_tags: bool,
    },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to another column
    ///
    /// Example: board move 3f2a... doing
    Move { id: String, column: String },
    /// Replay a drag gesture: hover over targets, then drop
    ///
    /// Example: board drag 3f2a... --over doing --over done --drop done
    /// Example: board drag 3f2a... --over doing (no drop: cancelled)
    Drag {
        id: String,
        #[arg(long = "over", value_name = "TARGET")]
        over: Vec<String>,
        #[arg(long, value_name = "TARGET")]
        drop: Option<String>,
    },
    /// Reorder a task within its column
    ///
    /// Example: board reorder todo 2 0
    Reorder {
        column: String,
        from: usize,
        to: usize,
    },
    /// Show details of a task
    Show { id: String },
    /// Show the board, or a single column
    List { column: Option<String> },
    /// Set the title search (omit to clear)
    Search { query: Option<String> },
    /// Filter by priority: all, low, medium or high
    Filter { priority: String },
    /// Toggle sorting by due date
    SortDue,
    /// Show the activity log
    Activity {
        /// Clear the log
        #[arg(long)]
        clear: bool,
    },
    /// Delete every task and reset search, filter and sort
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DataDir,
    LoginDelayMs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "data_dir" => ConfigOverrideTarget::DataDir,
        "login_delay_ms" | "login_delay" => {
            value
                .parse::<u64>()
                .map_err(|_| format!("login_delay_ms must be a whole number, got '{value}'"))?;
            ConfigOverrideTarget::LoginDelayMs
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override '{field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

impl ParsedConfigOverride {
    pub fn apply(&self, overrides: &mut board_core::config::ConfigOverrides) {
        match self.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(self.value.clone()),
            ConfigOverrideTarget::DataDir => overrides.data_dir = Some(PathBuf::from(&self.value)),
            ConfigOverrideTarget::LoginDelayMs => {
                overrides.login_delay_ms = self.value.parse().ok();
            }
        }
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
