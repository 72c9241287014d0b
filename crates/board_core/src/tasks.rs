//! Task store: the task collection plus the board query (search, priority
//! filter, due-date sort) and the per-column views derived from both.

use crate::confirm::{Confirm, RESET_BOARD_PROMPT};
use crate::error::AppError;
use crate::model::{Column, NewTask, PriorityFilter, Task, TaskUpdate};
use crate::observe::Listeners;
use crate::storage::{self, KeyValueStore};
use crate::teardown::SessionScoped;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

pub const TASK_STORAGE_KEY: &str = "task-storage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub priority_filter: PriorityFilter,
    #[serde(default)]
    pub sort_by_due_date: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub query: BoardQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView<'a> {
    pub column: Column,
    pub tasks: Vec<&'a Task>,
}

pub struct TaskStore {
    state: TaskState,
    storage: Arc<dyn KeyValueStore>,
    listeners: Listeners<TaskState>,
}

impl TaskStore {
    /// Restores the last snapshot from `storage`, or starts empty.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let state: TaskState =
            storage::load_blob(storage.as_ref(), TASK_STORAGE_KEY)?.unwrap_or_default();

        let mut seen = HashSet::new();
        for task in &state.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(AppError::invalid_data(format!(
                    "{TASK_STORAGE_KEY}: duplicate task id {}",
                    task.id
                )));
            }
        }

        tracing::debug!(tasks = state.tasks.len(), "task store loaded");
        Ok(Self {
            state,
            storage,
            listeners: Listeners::default(),
        })
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn query(&self) -> &BoardQuery {
        &self.state.query
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TaskState) + 'static,
    {
        self.listeners.add(listener);
    }

    pub fn add_task(&mut self, fields: NewTask) -> Result<Task, AppError> {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

        let task = Task {
            id: self.fresh_id(),
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            due_date: fields.due_date,
            tags: fields.tags,
            column: Column::Todo,
            created_at,
        };

        self.state.tasks.push(task.clone());
        self.commit()?;
        tracing::debug!(id = %task.id, "task added");
        Ok(task)
    }

    /// Merges `update` into the task with `id`. Unknown ids are a no-op.
    pub fn update_task(
        &mut self,
        id: &str,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let Some(task) = self.state.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(id, "update ignored, no such task");
            return Ok(None);
        };

        update.apply(task);
        let updated = task.clone();
        self.commit()?;
        tracing::debug!(id, "task updated");
        Ok(Some(updated))
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Option<Task>, AppError> {
        let Some(index) = self.state.tasks.iter().position(|task| task.id == id) else {
            tracing::debug!(id, "delete ignored, no such task");
            return Ok(None);
        };

        let removed = self.state.tasks.remove(index);
        self.commit()?;
        tracing::debug!(id, "task deleted");
        Ok(Some(removed))
    }

    /// Moves by column name. Names outside todo/doing/done leave every task
    /// untouched.
    pub fn move_task(&mut self, id: &str, column: &str) -> Result<Option<Task>, AppError> {
        match column.parse::<Column>() {
            Ok(column) => self.move_task_to(id, column),
            Err(_) => {
                tracing::debug!(id, column, "move ignored, unknown column");
                Ok(None)
            }
        }
    }

    pub fn move_task_to(&mut self, id: &str, column: Column) -> Result<Option<Task>, AppError> {
        let Some(task) = self.state.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(id, "move ignored, no such task");
            return Ok(None);
        };

        if task.column == column {
            return Ok(Some(task.clone()));
        }

        let from = task.column;
        task.column = column;
        let moved = task.clone();
        self.commit()?;
        tracing::debug!(id, %from, to = %column, "task moved");
        Ok(Some(moved))
    }

    /// Moves the task at column-local position `from` to position `to` within
    /// the same column. Tasks of other columns keep their slots in the
    /// collection. Returns whether anything moved.
    pub fn reorder_task(
        &mut self,
        column: Column,
        from: usize,
        to: usize,
    ) -> Result<bool, AppError> {
        let slots: Vec<usize> = self
            .state
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.column == column)
            .map(|(index, _)| index)
            .collect();

        if from >= slots.len() || to >= slots.len() {
            tracing::debug!(%column, from, to, "reorder ignored, index out of range");
            return Ok(false);
        }
        if from == to {
            return Ok(false);
        }

        let mut ordered: Vec<Task> = slots
            .iter()
            .map(|&slot| self.state.tasks[slot].clone())
            .collect();
        let moved = ordered.remove(from);
        ordered.insert(to, moved);

        for (slot, task) in slots.into_iter().zip(ordered) {
            self.state.tasks[slot] = task;
        }

        self.commit()?;
        tracing::debug!(%column, from, to, "column reordered");
        Ok(true)
    }

    /// Clears every task and the query, once `confirm` agrees.
    pub fn reset_board(&mut self, confirm: &dyn Confirm) -> Result<bool, AppError> {
        if !confirm.confirm(RESET_BOARD_PROMPT) {
            tracing::debug!("board reset declined");
            return Ok(false);
        }

        self.state = TaskState::default();
        self.commit()?;
        tracing::info!("board reset");
        Ok(true)
    }

    pub fn set_search_query<Q: Into<String>>(&mut self, query: Q) -> Result<(), AppError> {
        self.state.query.search_query = query.into();
        self.commit()
    }

    pub fn set_priority_filter(&mut self, filter: PriorityFilter) -> Result<(), AppError> {
        self.state.query.priority_filter = filter;
        self.commit()
    }

    pub fn toggle_sort_by_due_date(&mut self) -> Result<bool, AppError> {
        self.state.query.sort_by_due_date = !self.state.query.sort_by_due_date;
        self.commit()?;
        Ok(self.state.query.sort_by_due_date)
    }

    pub fn tasks_by_column(&self, column: Column) -> Vec<&Task> {
        derive_column(&self.state.tasks, &self.state.query, column)
    }

    pub fn board_view(&self) -> Vec<ColumnView<'_>> {
        Column::ALL
            .into_iter()
            .map(|column| ColumnView {
                column,
                tasks: self.tasks_by_column(column),
            })
            .collect()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.task(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self) -> Result<(), AppError> {
        storage::save_blob(self.storage.as_ref(), TASK_STORAGE_KEY, &self.state)?;
        self.listeners.notify(&self.state);
        Ok(())
    }
}

impl SessionScoped for TaskStore {
    fn scope_name(&self) -> &'static str {
        TASK_STORAGE_KEY
    }

    fn purge(&mut self) -> Result<(), AppError> {
        self.state = TaskState::default();
        self.storage.remove(TASK_STORAGE_KEY)?;
        self.listeners.notify(&self.state);
        Ok(())
    }
}

/// Column membership, then title search, then priority filter, then the
/// optional stable due-date sort with undated tasks last.
pub fn derive_column<'a>(tasks: &'a [Task], query: &BoardQuery, column: Column) -> Vec<&'a Task> {
    let needle = query.search_query.to_lowercase();

    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.column == column)
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .filter(|task| query.priority_filter.matches(task.priority))
        .collect();

    if query.sort_by_due_date {
        view.sort_by(|a, b| match (a.due(), b.due()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    view
}
