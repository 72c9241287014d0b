use crate::model::task::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Edited,
    Moved,
    Deleted,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Created => "created",
            ActivityKind::Edited => "edited",
            ActivityKind::Moved => "moved",
            ActivityKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetails {
    pub task_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Column>,
}

impl ActivityDetails {
    pub fn task<T: Into<String>>(title: T) -> Self {
        Self {
            task_title: title.into(),
            from: None,
            to: None,
        }
    }

    pub fn moved<T: Into<String>>(title: T, from: Column, to: Column) -> Self {
        Self {
            task_title: title.into(),
            from: Some(from),
            to: Some(to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub details: ActivityDetails,
    pub timestamp: String,
    pub formatted_time: String,
}

impl ActivityRecord {
    /// One-line description for the activity panel.
    pub fn summary(&self) -> String {
        let title = &self.details.task_title;
        match (self.kind, self.details.from, self.details.to) {
            (ActivityKind::Moved, Some(from), Some(to)) => {
                format!("Moved \"{title}\" from {} to {}", from.label(), to.label())
            }
            (ActivityKind::Moved, _, _) => format!("Moved \"{title}\""),
            (ActivityKind::Created, _, _) => format!("Created \"{title}\""),
            (ActivityKind::Edited, _, _) => format!("Edited \"{title}\""),
            (ActivityKind::Deleted, _, _) => format!("Deleted \"{title}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityDetails, ActivityKind, ActivityRecord};
    use crate::model::Column;

    fn record(kind: ActivityKind, details: ActivityDetails) -> ActivityRecord {
        ActivityRecord {
            id: 1,
            kind,
            details,
            timestamp: "2026-03-05T10:00:00Z".to_string(),
            formatted_time: "Mar 05, 10:00".to_string(),
        }
    }

    #[test]
    fn moved_summary_names_both_columns() {
        let moved = record(
            ActivityKind::Moved,
            ActivityDetails::moved("A", Column::Todo, Column::Doing),
        );
        assert_eq!(moved.summary(), "Moved \"A\" from To Do to In Progress");
    }

    #[test]
    fn serializes_type_and_details_layout() {
        let created = record(ActivityKind::Created, ActivityDetails::task("A"));
        let value = serde_json::to_value(&created).unwrap();

        assert_eq!(value["type"], "created");
        assert_eq!(value["details"]["taskTitle"], "A");
        assert!(value["details"].get("from").is_none());
        assert_eq!(value["formattedTime"], "Mar 05, 10:00");
    }
}
