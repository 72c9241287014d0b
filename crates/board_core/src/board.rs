//! Board coordinator: owns the stores, routes user intents to them, logs the
//! matching activity, and tears the session down on logout.

use crate::activity::ActivityLog;
use crate::auth::{AuthStore, CredentialVerifier};
use crate::confirm::{Confirm, DELETE_TASK_PROMPT};
use crate::drag::{ColumnMove, DragMachine};
use crate::error::AppError;
use crate::model::{
    ActivityDetails, ActivityKind, Column, PriorityFilter, Task, TaskDraft, TaskUpdate,
};
use crate::storage::KeyValueStore;
use crate::tasks::TaskStore;
use crate::teardown::run_teardown;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Task),
    Declined,
    NotFound,
}

pub struct Board {
    auth: AuthStore,
    tasks: TaskStore,
    activity: ActivityLog,
    drag: DragMachine,
}

impl Board {
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            auth: AuthStore::load(Arc::clone(&storage), verifier)?,
            tasks: TaskStore::load(Arc::clone(&storage))?,
            activity: ActivityLog::load(storage)?,
            drag: DragMachine::default(),
        })
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.auth = self.auth.with_login_delay(delay);
        self
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn drag(&self) -> &DragMachine {
        &self.drag
    }

    /// Mutable store handles, for subscribing listeners.
    pub fn stores_mut(&mut self) -> (&mut AuthStore, &mut TaskStore, &mut ActivityLog) {
        (&mut self.auth, &mut self.tasks, &mut self.activity)
    }

    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<bool, AppError> {
        self.auth.login(email, password, remember_me)
    }

    /// Ends the session and wipes task and activity data. No confirmation.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.drag.cancel();
        let signed_out = self.auth.logout();
        let purged = run_teardown(&mut [&mut self.tasks, &mut self.activity]);
        signed_out.and(purged)
    }

    pub fn create_task(&mut self, draft: &TaskDraft) -> Result<Task, AppError> {
        self.signed_in()?;
        let fields = draft.validate()?;
        let task = self.tasks.add_task(fields)?;
        self.activity
            .log_activity(ActivityKind::Created, ActivityDetails::task(&task.title))?;
        Ok(task)
    }

    /// Replaces the editable fields of `id` with the draft. Unknown ids change
    /// nothing and log nothing.
    pub fn edit_task(&mut self, id: &str, draft: &TaskDraft) -> Result<Option<Task>, AppError> {
        self.signed_in()?;
        let fields = draft.validate()?;
        let Some(task) = self.tasks.update_task(id, &TaskUpdate::from(fields))? else {
            return Ok(None);
        };
        self.activity
            .log_activity(ActivityKind::Edited, ActivityDetails::task(&task.title))?;
        Ok(Some(task))
    }

    pub fn delete_task(
        &mut self,
        id: &str,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, AppError> {
        self.signed_in()?;
        if self.tasks.task(id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        if !confirm.confirm(DELETE_TASK_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        let Some(removed) = self.tasks.delete_task(id)? else {
            return Ok(DeleteOutcome::NotFound);
        };
        self.activity
            .log_activity(ActivityKind::Deleted, ActivityDetails::task(&removed.title))?;
        Ok(DeleteOutcome::Deleted(removed))
    }

    pub fn reset_board(&mut self, confirm: &dyn Confirm) -> Result<bool, AppError> {
        self.signed_in()?;
        self.drag.cancel();
        self.tasks.reset_board(confirm)
    }

    /// Clears the activity log. No confirmation.
    pub fn clear_activities(&mut self) -> Result<(), AppError> {
        self.signed_in()?;
        self.activity.clear_activities()
    }

    pub fn set_search_query<Q: Into<String>>(&mut self, query: Q) -> Result<(), AppError> {
        self.signed_in()?;
        self.tasks.set_search_query(query)
    }

    pub fn set_priority_filter(&mut self, filter: PriorityFilter) -> Result<(), AppError> {
        self.signed_in()?;
        self.tasks.set_priority_filter(filter)
    }

    pub fn toggle_sort_by_due_date(&mut self) -> Result<bool, AppError> {
        self.signed_in()?;
        self.tasks.toggle_sort_by_due_date()
    }

    pub fn start_drag(&mut self, task_id: &str) -> Result<(), AppError> {
        self.signed_in()?;
        self.drag.pick_up(task_id);
        Ok(())
    }

    pub fn drag_over(&mut self, target: &str) -> Result<Option<ColumnMove>, AppError> {
        self.signed_in()?;
        let tasks = &self.tasks;
        let column_move = self
            .drag
            .hover(target, |id| tasks.task(id).map(|task| task.column));
        self.apply_move(column_move)
    }

    /// Ends the drag; `None` means released over no target.
    pub fn drop_on(&mut self, target: Option<&str>) -> Result<Option<ColumnMove>, AppError> {
        self.signed_in()?;
        let tasks = &self.tasks;
        let column_move = self
            .drag
            .release(target, |id| tasks.task(id).map(|task| task.column));
        self.apply_move(column_move)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Pick-up followed directly by release over `column`, the path a
    /// keyboard drag takes.
    pub fn move_task(&mut self, id: &str, column: Column) -> Result<Option<ColumnMove>, AppError> {
        self.start_drag(id)?;
        self.drop_on(Some(column.as_str()))
    }

    /// Within-column reordering; column membership and the log are untouched.
    pub fn reorder_task(
        &mut self,
        column: Column,
        from: usize,
        to: usize,
    ) -> Result<bool, AppError> {
        self.signed_in()?;
        self.tasks.reorder_task(column, from, to)
    }

    fn apply_move(
        &mut self,
        column_move: Option<ColumnMove>,
    ) -> Result<Option<ColumnMove>, AppError> {
        let Some(column_move) = column_move else {
            return Ok(None);
        };
        let Some(task) = self.tasks.move_task_to(&column_move.task_id, column_move.to)? else {
            return Ok(None);
        };

        self.activity.log_activity(
            ActivityKind::Moved,
            ActivityDetails::moved(&task.title, column_move.from, column_move.to),
        )?;
        Ok(Some(column_move))
    }

    fn signed_in(&self) -> Result<(), AppError> {
        self.auth.require_user().map(|_| ())
    }
}
