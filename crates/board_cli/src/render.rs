use board_core::config::Palette;
use board_core::error::AppError;
use board_core::model::{ActivityRecord, Session, Task};
use board_core::tasks::{BoardQuery, ColumnView};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::Date;

#[derive(Tabled)]
struct TaskRow {
    id: String,
    title: String,
    priority: String,
    due: String,
    tags: String,
}

#[derive(Tabled)]
struct ActivityRow {
    time: String,
    #[tabled(rename = "type")]
    kind: String,
    details: String,
}

fn due_label(task: &Task, today: Date, palette: &Palette) -> String {
    match task.formatted_due_date() {
        Some(formatted) if task.is_overdue(today) => {
            palette.warn(&format!("{formatted} (overdue)"))
        }
        Some(formatted) => formatted,
        None => "-".to_string(),
    }
}

fn task_row(task: &Task, today: Date, palette: &Palette) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        title: task.title.clone(),
        priority: task.priority.to_string(),
        due: due_label(task, today, palette),
        tags: if task.tags.is_empty() {
            "-".to_string()
        } else {
            task.tags.join(", ")
        },
    }
}

pub fn query_plain(query: &BoardQuery, palette: &Palette) -> String {
    let search = if query.search_query.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", query.search_query)
    };
    let sort = if query.sort_by_due_date { "on" } else { "off" };
    palette.mutedize(&format!(
        "search: {search} | priority: {} | sort by due date: {sort}",
        query.priority_filter
    ))
}

pub fn board_plain(
    views: &[ColumnView<'_>],
    query: &BoardQuery,
    palette: &Palette,
    today: Date,
) -> String {
    let mut out = query_plain(query, palette);
    for view in views {
        out.push_str("\n\n");
        out.push_str(&palette.accentize(&format!(
            "{} ({})",
            view.column.label(),
            view.tasks.len()
        )));
        out.push('\n');
        if view.tasks.is_empty() {
            out.push_str(&palette.mutedize("  no tasks"));
            continue;
        }
        let rows: Vec<TaskRow> = view
            .tasks
            .iter()
            .map(|task| task_row(task, today, palette))
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        out.push_str(&table.to_string());
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardPayload<'a> {
    #[serde(flatten)]
    query: &'a BoardQuery,
    columns: Vec<ColumnPayload<'a>>,
}

#[derive(Serialize)]
struct ColumnPayload<'a> {
    id: &'static str,
    title: &'static str,
    tasks: &'a [&'a Task],
}

pub fn board_json(
    views: &[ColumnView<'_>],
    query: &BoardQuery,
) -> Result<serde_json::Value, AppError> {
    let payload = BoardPayload {
        query,
        columns: views
            .iter()
            .map(|view| ColumnPayload {
                id: view.column.as_str(),
                title: view.column.label(),
                tasks: &view.tasks,
            })
            .collect(),
    };
    serde_json::to_value(payload).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn task_plain(task: &Task, today: Date, palette: &Palette) -> String {
    let mut lines = vec![
        palette.accentize(&task.title),
        format!("id:          {}", task.id),
        format!("column:      {}", task.column.label()),
        format!("priority:    {}", task.priority),
        format!("due:         {}", due_label(task, today, palette)),
        format!(
            "tags:        {}",
            if task.tags.is_empty() {
                "-".to_string()
            } else {
                task.tags.join(", ")
            }
        ),
        format!("created:     {}", task.created_at),
    ];
    if let Some(description) = task.description.as_deref() {
        lines.push(String::new());
        lines.push(description.to_string());
    }
    lines.join("\n")
}

pub fn task_json(task: &Task) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn activity_plain(records: &[ActivityRecord], palette: &Palette) -> String {
    if records.is_empty() {
        return palette.mutedize("No activity yet");
    }

    let rows: Vec<ActivityRow> = records
        .iter()
        .map(|record| ActivityRow {
            time: record.formatted_time.clone(),
            kind: record.kind.to_string(),
            details: record.summary(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

pub fn activity_json(records: &[ActivityRecord]) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(records).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn session_plain(session: &Session) -> String {
    match session.user.as_ref() {
        Some(user) if session.is_authenticated => {
            let remembered = if session.remember_me {
                "remembered"
            } else {
                "this session only"
            };
            format!("Signed in as {} <{}> ({remembered})", user.name, user.email)
        }
        _ => "Not signed in".to_string(),
    }
}

pub fn session_json(session: &Session) -> serde_json::Value {
    serde_json::json!({
        "user": session.user,
        "isAuthenticated": session.is_authenticated,
        "rememberMe": session.remember_me,
    })
}
