use board_cli::cli::{Cli, Command, parse_config_override};
use board_cli::render;
use board_core::auth::{FixedCredentials, INVALID_CREDENTIALS};
use board_core::board::{Board, DeleteOutcome};
use board_core::config::{self, ConfigOverrides, Palette};
use board_core::confirm::{Confirm, Preconfirmed};
use board_core::drag::ColumnMove;
use board_core::error::AppError;
use board_core::model::{Column, PriorityFilter, Task, TaskDraft};
use board_core::storage::{JsonDirStore, json_store};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::sync::Arc;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

struct App {
    board: Board,
    palette: Palette,
}

/// Asks on the terminal; anything but an explicit yes declines.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(Preconfirmed)
    } else {
        Box::new(PromptConfirm)
    }
}

fn init_tracing() {
    // Opt-in via RUST_LOG; stderr keeps stdout clean for --json.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn open_app(raw_overrides: &[String]) -> Result<App, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "ignoring configuration file");
        eprintln!("WARNING: using default configuration: {err}");
    }

    let mut overrides = ConfigOverrides::default();
    for raw in raw_overrides {
        parse_config_override(raw)
            .map_err(AppError::invalid_input)?
            .apply(&mut overrides);
    }
    let config = config::merge_overrides(&loaded.config, &overrides);

    let data_dir = json_store::data_dir(config.data_dir.as_deref())?;
    tracing::debug!(data_dir = %data_dir.display(), "opening board");
    let storage = Arc::new(JsonDirStore::new(data_dir));
    let board = Board::open(storage, Box::new(FixedCredentials::default()))?
        .with_login_delay(config.login_delay());

    Ok(App {
        board,
        palette: config::palette_for_theme(config.theme.as_deref()),
    })
}

fn today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Exact id, or an unambiguous id prefix.
fn resolve_task_id(board: &Board, raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let tasks = board.tasks().tasks();
    if let Some(task) = tasks.iter().find(|task| task.id == trimmed) {
        return Ok(task.id.clone());
    }

    let mut matches = tasks.iter().filter(|task| task.id.starts_with(trimmed));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(AppError::invalid_input(format!(
            "task id prefix '{trimmed}' is ambiguous"
        ))),
        (None, _) => Err(AppError::invalid_input("task not found")),
    }
}

fn find_task(board: &Board, raw: &str) -> Result<Task, AppError> {
    let id = resolve_task_id(board, raw)?;
    board
        .tasks()
        .task(&id)
        .cloned()
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

fn print_task(json: bool, verb: &str, task: &Task) -> Result<(), AppError> {
    if json {
        print_json(&render::task_json(task)?);
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
    }
    Ok(())
}

fn print_moves(json: bool, board: &Board, moves: &[ColumnMove]) {
    if json {
        let payload: Vec<serde_json::Value> = moves
            .iter()
            .map(|column_move| {
                serde_json::json!({
                    "taskId": column_move.task_id,
                    "from": column_move.from,
                    "to": column_move.to,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(payload));
        return;
    }

    for column_move in moves {
        let title = board
            .tasks()
            .task(&column_move.task_id)
            .map(|task| task.title.as_str())
            .unwrap_or("-");
        println!(
            "Moved task: {} ({} -> {})",
            title,
            column_move.from.label(),
            column_move.to.label()
        );
    }
}

fn print_board(app: &App, json: bool, only: Option<Column>) -> Result<(), AppError> {
    let tasks = app.board.tasks();
    let views: Vec<_> = tasks
        .board_view()
        .into_iter()
        .filter(|view| only.is_none_or(|column| view.column == column))
        .collect();

    if json {
        print_json(&render::board_json(&views, tasks.query())?);
    } else {
        println!(
            "{}",
            render::board_plain(&views, tasks.query(), &app.palette, today())
        );
    }
    Ok(())
}

fn print_query(app: &App, json: bool) -> Result<(), AppError> {
    let query = app.board.tasks().query();
    if json {
        let value = serde_json::to_value(query)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        print_json(&value);
    } else {
        println!("{}", render::query_plain(query, &app.palette));
    }
    Ok(())
}

fn run_command(app: &mut App, cli: Cli) -> Result<(), AppError> {
    let json = cli.json;

    match cli.command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            if !app.board.login(&email, &password, remember)? {
                let message = app
                    .board
                    .auth()
                    .session()
                    .error
                    .clone()
                    .unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
                return Err(AppError::auth_failed(message));
            }
            let session = app.board.auth().session();
            if json {
                print_json(&render::session_json(session));
            } else {
                println!("{}", render::session_plain(session));
            }
        }
        Command::Logout => {
            app.board.logout()?;
            if json {
                print_json(&render::session_json(app.board.auth().session()));
            } else {
                println!("Signed out. Tasks and activity were cleared.");
            }
        }
        Command::Whoami => {
            let session = app.board.auth().session();
            if json {
                print_json(&render::session_json(session));
            } else {
                println!("{}", render::session_plain(session));
            }
        }
        command => {
            app.board.auth().require_user()?;
            run_board_command(app, command, json)?;
        }
    }

    Ok(())
}

fn run_board_command(app: &mut App, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add {
            title,
            description,
            priority,
            due,
            tags,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let mut draft = TaskDraft::titled(title);
            draft.description = description.unwrap_or_default();
            if let Some(priority) = priority {
                draft.priority = priority.parse()?;
            }
            draft.due_date = due.unwrap_or_default();
            for tag in &tags {
                draft.add_tag(tag);
            }

            let task = app.board.create_task(&draft)?;
            print_task(json, "Added", &task)?;
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
            tags,
            clear_tags,
        } => {
            let task = find_task(&app.board, &id)?;
            let untouched = title.is_none()
                && description.is_none()
                && priority.is_none()
                && due.is_none()
                && !clear_due
                && tags.is_empty()
                && !clear_tags;
            if untouched {
                return Err(AppError::invalid_input("nothing to edit"));
            }

            let mut draft = TaskDraft::from_task(&task);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(priority) = priority {
                draft.priority = priority.parse()?;
            }
            if let Some(due) = due {
                draft.due_date = due;
            }
            if clear_due {
                draft.due_date.clear();
            }
            if clear_tags {
                draft.tags.clear();
            }
            for tag in &tags {
                draft.add_tag(tag);
            }

            let updated = app
                .board
                .edit_task(&task.id, &draft)?
                .ok_or_else(|| AppError::invalid_input("task not found"))?;
            print_task(json, "Updated", &updated)?;
        }
        Command::Delete { id, yes } => {
            let id = resolve_task_id(&app.board, &id)?;
            match app.board.delete_task(&id, confirmer(yes).as_ref())? {
                DeleteOutcome::Deleted(task) => print_task(json, "Deleted", &task)?,
                DeleteOutcome::Declined => {
                    return Err(AppError::cancelled("delete not confirmed (pass --yes)"));
                }
                DeleteOutcome::NotFound => return Err(AppError::invalid_input("task not found")),
            }
        }
        Command::Move { id, column } => {
            let column: Column = column.parse()?;
            let task = find_task(&app.board, &id)?;
            match app.board.move_task(&task.id, column)? {
                Some(column_move) => print_moves(json, &app.board, &[column_move]),
                None if json => print_moves(json, &app.board, &[]),
                None => println!(
                    "Task already in {}: {} ({})",
                    column.label(),
                    task.title,
                    task.id
                ),
            }
        }
        Command::Drag { id, over, drop } => {
            let task = find_task(&app.board, &id)?;
            app.board.start_drag(&task.id)?;

            let mut moves = Vec::new();
            for target in &over {
                moves.extend(app.board.drag_over(target)?);
            }
            moves.extend(app.board.drop_on(drop.as_deref())?);

            print_moves(json, &app.board, &moves);
            if !json && drop.is_none() {
                println!("Drag released over no column");
            }
        }
        Command::Reorder { column, from, to } => {
            let column: Column = column.parse()?;
            let moved = app.board.reorder_task(column, from, to)?;
            if json {
                print_json(&serde_json::json!({ "reordered": moved }));
            } else if moved {
                println!("Reordered {}: {} -> {}", column.label(), from, to);
            } else {
                println!("Nothing to reorder");
            }
        }
        Command::Show { id } => {
            let task = find_task(&app.board, &id)?;
            if json {
                print_json(&render::task_json(&task)?);
            } else {
                println!("{}", render::task_plain(&task, today(), &app.palette));
            }
        }
        Command::List { column } => {
            let only = column.as_deref().map(str::parse::<Column>).transpose()?;
            print_board(app, json, only)?;
        }
        Command::Search { query } => {
            app.board.set_search_query(query.unwrap_or_default())?;
            print_query(app, json)?;
        }
        Command::Filter { priority } => {
            let filter: PriorityFilter = priority.parse()?;
            app.board.set_priority_filter(filter)?;
            print_query(app, json)?;
        }
        Command::SortDue => {
            app.board.toggle_sort_by_due_date()?;
            print_query(app, json)?;
        }
        Command::Activity { clear } => {
            if clear {
                app.board.clear_activities()?;
                if !json {
                    println!("Activity log cleared");
                }
            }
            let records = app.board.activity().activities();
            if json {
                print_json(&render::activity_json(records)?);
            } else if !clear {
                println!("{}", render::activity_plain(records, &app.palette));
            }
        }
        Command::Reset { yes } => {
            if !app.board.reset_board(confirmer(yes).as_ref())? {
                return Err(AppError::cancelled("reset not confirmed (pass --yes)"));
            }
            if json {
                print_query(app, json)?;
            } else {
                println!("Board reset");
            }
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => {
            return Err(AppError::invalid_input("not a board command"));
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive() -> Result<(), AppError> {
    let mut app = open_app(&[])?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("board".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            eprintln!("WARNING: --config-override only applies when the board is opened");
        }

        if let Err(err) = run_command(&mut app, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let mut app = match open_app(&cli.config_override) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(&mut app, cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
