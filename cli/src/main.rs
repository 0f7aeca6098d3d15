mod table;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use todoapp_core::seed::seed_if_empty;
use todoapp_core::{
    parse_due, parse_with_keys, Config, CreateTodo, FileTodoStore, MemoryTodoStore, Priority,
    TodoId, TodoPatch, TodoService, TodoStore,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todoapp", version)]
#[command(about = "Personal todo tracker", long_about = None)]
struct Cli {
    /// Directory holding todos.json (default: $TODOAPP_DIR or ~/.todoapp)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a throwaway in-memory store preloaded with sample todos
    #[arg(long, global = true)]
    memory: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all todos
    List,
    /// Active todos, highest priority first
    Active,
    /// Completed todos, most recent first
    Completed,
    /// Show one todo
    Show { id: TodoId },
    /// Add a todo (usage: add Buy milk pri:high due:tomorrow desc:"2 litres")
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Edit fields of a todo (usage: edit 3 pri:urgent due:none)
    Edit {
        id: TodoId,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Delete a todo
    Rm { id: TodoId },
    /// Mark a todo completed
    Done { id: TodoId },
    /// Mark a todo active again
    Undo { id: TodoId },
    /// Search titles and descriptions
    Search { term: Vec<String> },
    /// Active todos past their due date
    Overdue,
    /// Active todos due today
    Today,
    /// Counts of total, active, completed and overdue todos
    Stats,
    /// Load sample todos into an empty store
    Seed,
}

const ADD_KEYS: &[&str] = &["priority", "due", "description"];
const EDIT_KEYS: &[&str] = &["title", "priority", "due", "description"];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todoapp=warn,todoapp_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Active);

    if cli.memory {
        let store = MemoryTodoStore::new();
        seed_if_empty(&store, Utc::now())?;
        return run(TodoService::new(store), command, cli.json);
    }

    let config = Config::resolve(cli.data_dir)?;
    debug!(data_dir = %config.data_dir().display(), "using file store");
    let store = FileTodoStore::new(config.data_dir())?;
    run(TodoService::new(store), command, cli.json)
}

fn run<R: TodoStore>(service: TodoService<R>, command: Commands, json: bool) -> Result<()> {
    let now = Utc::now();
    let out = Output { json, now };

    match command {
        Commands::List => out.todos(&service.list_all()?),
        Commands::Active => out.todos(&service.list_active()?),
        Commands::Completed => out.todos(&service.list_completed()?),
        Commands::Show { id } => out.todo(&service.get_by_id(id)?),
        Commands::Add { args } => {
            let input = create_input(&args)?;
            let created = service.create(input)?;
            if !json {
                println!("Todo added: {} (ID: {})", created.title, created.id);
            }
            out.todo(&created)
        }
        Commands::Edit { id, args } => {
            let patch = patch_input(&args)?;
            out.todo(&service.update(id, patch)?)
        }
        Commands::Rm { id } => {
            service.delete(id)?;
            if !json {
                println!("Todo {} deleted.", id);
            }
            Ok(())
        }
        Commands::Done { id } => out.todo(&service.mark_completed(id)?),
        Commands::Undo { id } => out.todo(&service.mark_incomplete(id)?),
        Commands::Search { term } => {
            let term = term.join(" ");
            out.todos(&service.search(Some(&term))?)
        }
        Commands::Overdue => out.todos(&service.list_overdue(now)?),
        Commands::Today => out.todos(&service.list_due_today(&Local::now())?),
        Commands::Stats => {
            let stats = service.get_stats(now)?;
            if json {
                print_json(&stats)
            } else {
                table::print_stats(&stats);
                Ok(())
            }
        }
        Commands::Seed => {
            let inserted = seed_if_empty(service.store(), now)?;
            if inserted == 0 {
                println!("Store is not empty; nothing seeded.");
            } else {
                println!("Seeded {} sample todos.", inserted);
            }
            Ok(())
        }
    }
}

fn create_input(args: &[String]) -> Result<CreateTodo> {
    let parsed = parse_with_keys(args, ADD_KEYS)?;
    let priority = match parsed.metadata.get("priority") {
        Some(p) => p.parse::<Priority>()?,
        None => Priority::default(),
    };

    let mut input = CreateTodo::new(parsed.text, priority);
    if let Some(desc) = parsed.metadata.get("description") {
        input = input.with_description(desc.as_str());
    }
    if let Some(due) = parsed.metadata.get("due") {
        input = input.with_due_date(parse_due(due, &Local::now())?);
    }
    Ok(input)
}

fn patch_input(args: &[String]) -> Result<TodoPatch> {
    let parsed = parse_with_keys(args, EDIT_KEYS)?;
    let meta = &parsed.metadata;

    let title = match meta.get("title") {
        Some(title) => Some(title.clone()),
        None if !parsed.text.is_empty() => Some(parsed.text.clone()),
        None => None,
    };
    let priority = meta.get("priority").map(|p| p.parse::<Priority>()).transpose()?;
    let description = meta.get("description").map(|d| clearable(d).map(str::to_string));
    let due_date = match meta.get("due") {
        Some(due) => Some(clearable(due).map(|d| parse_due(d, &Local::now())).transpose()?),
        None => None,
    };

    let patch = TodoPatch { title, description, priority, due_date };

    if patch.is_empty() {
        return Err(anyhow!("Nothing to change; pass title:, pri:, due: or desc:"));
    }
    Ok(patch)
}

/// `none` (or an empty value) means "clear this field".
fn clearable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}

struct Output {
    json: bool,
    now: chrono::DateTime<Utc>,
}

impl Output {
    fn todos(&self, todos: &[todoapp_core::Todo]) -> Result<()> {
        if self.json {
            print_json(&todos)
        } else {
            table::print_todos(todos, self.now);
            Ok(())
        }
    }

    fn todo(&self, todo: &todoapp_core::Todo) -> Result<()> {
        if self.json {
            print_json(todo)
        } else {
            table::print_todo(todo, self.now);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
