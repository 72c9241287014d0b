//! Drag gesture state machine.
//!
//! Idle --pick_up--> Dragging --hover--> Dragging --release/cancel--> Idle
//!
//! Hovering a column other than the task's current one yields a move right
//! away, so the card follows the pointer across columns. Release re-checks the
//! task's column at that moment, so a move already applied while hovering is
//! not emitted twice, while drags that never hover (keyboard) still move.

use crate::model::Column;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMove {
    pub task_id: String,
    pub from: Column,
    pub to: Column,
}

#[derive(Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active_task(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { task_id } => Some(task_id),
        }
    }

    /// Starts a gesture. Picking up while already dragging starts over with
    /// the new task.
    pub fn pick_up<T: Into<String>>(&mut self, task_id: T) {
        self.state = DragState::Dragging {
            task_id: task_id.into(),
        };
    }

    /// `column_of` reports the current column of a task, `None` once it is gone.
    pub fn hover<F>(&mut self, target: &str, column_of: F) -> Option<ColumnMove>
    where
        F: Fn(&str) -> Option<Column>,
    {
        let task_id = self.active_task()?;
        transition(task_id, target, column_of)
    }

    /// Ends the gesture. Releasing over nothing is a cancellation.
    pub fn release<F>(&mut self, target: Option<&str>, column_of: F) -> Option<ColumnMove>
    where
        F: Fn(&str) -> Option<Column>,
    {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { task_id } = state else {
            return None;
        };
        transition(&task_id, target?, column_of)
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

fn transition<F>(task_id: &str, target: &str, column_of: F) -> Option<ColumnMove>
where
    F: Fn(&str) -> Option<Column>,
{
    let to = target.parse::<Column>().ok()?;
    let from = column_of(task_id)?;
    (from != to).then(|| ColumnMove {
        task_id: task_id.to_string(),
        from,
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::{ColumnMove, DragMachine, DragState};
    use crate::model::Column;
    use std::cell::Cell;

    #[test]
    fn hover_over_other_column_emits_move() {
        let mut drag = DragMachine::default();
        drag.pick_up("t1");

        let moved = drag.hover("doing", |_| Some(Column::Todo));
        assert_eq!(
            moved,
            Some(ColumnMove {
                task_id: "t1".to_string(),
                from: Column::Todo,
                to: Column::Doing,
            })
        );
        assert_eq!(drag.active_task(), Some("t1"));
    }

    #[test]
    fn hover_then_release_on_same_column_emits_once() {
        let column = Cell::new(Column::Todo);
        let mut drag = DragMachine::default();
        drag.pick_up("t1");

        let moved = drag.hover("done", |_| Some(column.get())).unwrap();
        column.set(moved.to);
        assert!(drag.hover("done", |_| Some(column.get())).is_none());
        assert!(drag.release(Some("done"), |_| Some(column.get())).is_none());
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn release_without_hover_still_moves() {
        let mut drag = DragMachine::default();
        drag.pick_up("t1");

        let moved = drag.release(Some("done"), |_| Some(Column::Doing)).unwrap();
        assert_eq!((moved.from, moved.to), (Column::Doing, Column::Done));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn release_over_nothing_cancels() {
        let mut drag = DragMachine::default();
        drag.pick_up("t1");
        assert!(drag.release(None, |_| Some(Column::Todo)).is_none());
        assert!(drag.active_task().is_none());
    }

    #[test]
    fn invalid_targets_and_missing_tasks_are_ignored() {
        let mut drag = DragMachine::default();
        drag.pick_up("t1");
        assert!(drag.hover("another-card-id", |_| Some(Column::Todo)).is_none());
        assert!(drag.hover("doing", |_| None).is_none());
        assert!(drag.release(Some("backlog"), |_| Some(Column::Todo)).is_none());
    }

    #[test]
    fn idle_machine_ignores_hover_and_release() {
        let mut drag = DragMachine::default();
        assert!(drag.hover("doing", |_| Some(Column::Todo)).is_none());
        assert!(drag.release(Some("doing"), |_| Some(Column::Todo)).is_none());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut drag = DragMachine::default();
        drag.pick_up("t1");
        drag.cancel();
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(drag.hover("doing", |_| Some(Column::Todo)).is_none());
    }
}
