use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DUE_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DUE_DATE_DISPLAY: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Todo,
    Doing,
    Done,
}

impl Column {
    /// Board order, left to right.
    pub const ALL: [Column; 3] = [Column::Todo, Column::Doing, Column::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::Doing => "doing",
            Column::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Todo => "To Do",
            Column::Doing => "In Progress",
            Column::Done => "Done",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Column::Todo),
            "doing" => Ok(Column::Doing),
            "done" => Ok(Column::Done),
            other => Err(AppError::invalid_input(format!(
                "unknown column '{other}' (expected todo, doing or done)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(AppError::invalid_input(format!(
                "unknown priority '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

/// Priority filter of the board query; persisted as `"all"` or a priority name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => wanted == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(priority) => priority.fmt(f),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        raw.parse().map(PriorityFilter::Only)
    }
}

impl From<PriorityFilter> for String {
    fn from(filter: PriorityFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for PriorityFilter {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub column: Column,
    pub created_at: String,
}

impl Task {
    /// Parsed due date. Stored values that do not parse count as undated.
    pub fn due(&self) -> Option<Date> {
        self.due_date
            .as_deref()
            .and_then(|raw| Date::parse(raw, DUE_DATE_FORMAT).ok())
    }

    /// Due strictly before `today`; a task due today is not overdue.
    pub fn is_overdue(&self, today: Date) -> bool {
        self.due().is_some_and(|due| due < today)
    }

    pub fn formatted_due_date(&self) -> Option<String> {
        self.due().and_then(|due| due.format(DUE_DATE_DISPLAY).ok())
    }
}

/// Field values for a task about to be created. Validation happens upstream,
/// see [`crate::model::TaskDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn titled<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update merged into an existing task. `None` leaves a field alone;
/// the nested options of `description` and `due_date` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub column: Option<Column>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(column) = self.column {
            task.column = column;
        }
    }
}

impl From<NewTask> for TaskUpdate {
    fn from(fields: NewTask) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            priority: Some(fields.priority),
            due_date: Some(fields.due_date),
            tags: Some(fields.tags),
            column: None,
        }
    }
}

/// Parses editor input into the stored `YYYY-MM-DD` form. Blank input means
/// no due date; a full timestamp keeps only its date part.
pub fn parse_due_date(raw: &str) -> Result<Option<String>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    let date = Date::parse(date_part, DUE_DATE_FORMAT)
        .map_err(|_| AppError::invalid_input("due date must be YYYY-MM-DD"))?;
    let normalized = date
        .format(DUE_DATE_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok(Some(normalized))
}
