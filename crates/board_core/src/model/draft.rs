use crate::error::AppError;
use crate::model::task::{NewTask, Priority, Task, parse_due_date};

/// Editor form state for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn titled<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Pre-fills the editor from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            due_date: task.due_date.clone().unwrap_or_default(),
            tags: task.tags.clone(),
        }
    }

    /// Appends a tag unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.tags.iter().any(|existing| existing == trimmed) {
            return false;
        }
        self.tags.push(trimmed.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|existing| existing != tag);
    }

    pub fn validate(&self) -> Result<NewTask, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let description = Some(self.description.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let mut normalized = TaskDraft::default();
        for tag in &self.tags {
            normalized.add_tag(tag);
        }

        Ok(NewTask {
            title: title.to_string(),
            description,
            priority: self.priority,
            due_date: parse_due_date(&self.due_date)?,
            tags: normalized.tags,
        })
    }
}
