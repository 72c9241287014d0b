use crate::error::AppError;
use crate::model::{ActivityDetails, ActivityKind, ActivityRecord};
use crate::observe::Listeners;
use crate::storage::{self, KeyValueStore};
use crate::teardown::SessionScoped;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const ACTIVITY_STORAGE_KEY: &str = "activity-storage";
pub const MAX_ACTIVITIES: usize = 50;

const FORMATTED_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [hour]:[minute]");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    /// Newest first.
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

/// Bounded, newest-first history of task lifecycle events.
pub struct ActivityLog {
    state: ActivityState,
    storage: Arc<dyn KeyValueStore>,
    listeners: Listeners<ActivityState>,
}

impl ActivityLog {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let mut state: ActivityState =
            storage::load_blob(storage.as_ref(), ACTIVITY_STORAGE_KEY)?.unwrap_or_default();
        state.activities.truncate(MAX_ACTIVITIES);

        Ok(Self {
            state,
            storage,
            listeners: Listeners::default(),
        })
    }

    pub fn activities(&self) -> &[ActivityRecord] {
        &self.state.activities
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ActivityState) + 'static,
    {
        self.listeners.add(listener);
    }

    /// Prepends a record, evicting the oldest beyond [`MAX_ACTIVITIES`].
    pub fn log_activity(
        &mut self,
        kind: ActivityKind,
        details: ActivityDetails,
    ) -> Result<ActivityRecord, AppError> {
        let now = OffsetDateTime::now_utc();
        let timestamp = now
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        let formatted_time = now
            .to_offset(offset)
            .format(FORMATTED_TIME)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

        let record = ActivityRecord {
            id: self.next_id(now),
            kind,
            details,
            timestamp,
            formatted_time,
        };

        self.state.activities.insert(0, record.clone());
        self.state.activities.truncate(MAX_ACTIVITIES);
        self.commit()?;
        tracing::debug!(id = record.id, kind = %record.kind, "activity logged");
        Ok(record)
    }

    pub fn clear_activities(&mut self) -> Result<(), AppError> {
        self.state.activities.clear();
        self.commit()?;
        tracing::debug!("activity log cleared");
        Ok(())
    }

    /// Millisecond timestamp, bumped past the newest record so ids stay
    /// strictly increasing even within the same millisecond.
    fn next_id(&self, now: OffsetDateTime) -> u64 {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        match self.state.activities.first() {
            Some(newest) if newest.id >= millis => newest.id.saturating_add(1),
            _ => millis,
        }
    }

    fn commit(&mut self) -> Result<(), AppError> {
        storage::save_blob(self.storage.as_ref(), ACTIVITY_STORAGE_KEY, &self.state)?;
        self.listeners.notify(&self.state);
        Ok(())
    }
}

impl SessionScoped for ActivityLog {
    fn scope_name(&self) -> &'static str {
        ACTIVITY_STORAGE_KEY
    }

    fn purge(&mut self) -> Result<(), AppError> {
        self.state = ActivityState::default();
        self.storage.remove(ACTIVITY_STORAGE_KEY)?;
        self.listeners.notify(&self.state);
        Ok(())
    }
}
