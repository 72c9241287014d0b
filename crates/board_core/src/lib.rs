pub mod activity;
pub mod auth;
pub mod board;
pub mod config;
pub mod confirm;
pub mod drag;
pub mod error;
pub mod model;
pub mod observe;
pub mod storage;
pub mod tasks;
pub mod teardown;

#[cfg(test)]
mod tests {
    use crate::auth::{DEMO_EMAIL, DEMO_PASSWORD, FixedCredentials};
    use crate::board::Board;
    use crate::model::{Column, TaskDraft};
    use crate::storage::JsonDirStore;
    use std::sync::Arc;

    #[test]
    fn board_round_trips_through_a_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(JsonDirStore::new(dir.path()));

        let mut board =
            Board::open(storage.clone(), Box::new(FixedCredentials::default())).unwrap();
        assert!(board.login(DEMO_EMAIL, DEMO_PASSWORD, true).unwrap());
        let task = board.create_task(&TaskDraft::titled("A")).unwrap();
        board.move_task(&task.id, Column::Doing).unwrap();

        let reopened = Board::open(storage, Box::new(FixedCredentials::default())).unwrap();
        assert!(reopened.auth().is_authenticated());
        assert_eq!(reopened.tasks().tasks_by_column(Column::Doing).len(), 1);
        assert_eq!(reopened.activity().activities().len(), 2);
        assert!(dir.path().join("task-storage.json").exists());
        assert!(dir.path().join("activity-storage.json").exists());
        assert!(dir.path().join("auth-storage.json").exists());
    }

    #[test]
    fn app_error_exposes_code() {
        let err = crate::error::AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
    }
}
