use chrono::{DateTime, Local, Utc};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use todoapp_core::{Todo, TodoStats};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 40;

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    done: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl TodoRow {
    fn new(todo: &Todo, now: DateTime<Utc>) -> Self {
        let due = match todo.due_date {
            Some(d) => {
                let local = d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
                if todo.is_overdue(now) {
                    format!("{} !", local)
                } else {
                    local
                }
            }
            None => "-".to_string(),
        };
        Self {
            id: todo.id.to_string(),
            done: if todo.completed { "x" } else { " " },
            priority: todo.priority.to_string(),
            due,
            title: truncate(&todo.title, TITLE_WIDTH),
        }
    }
}

/// Cuts `s` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn print_todos(todos: &[Todo], now: DateTime<Utc>) {
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }
    let rows: Vec<TodoRow> = todos.iter().map(|t| TodoRow::new(t, now)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn print_todo(todo: &Todo, now: DateTime<Utc>) {
    let local = |d: DateTime<Utc>| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();

    println!("#{} {}", todo.id, todo.title);
    if let Some(desc) = &todo.description {
        println!("  {}", desc);
    }
    println!("  Priority:  {}", todo.priority);
    println!("  Status:    {}", if todo.completed { "Completed" } else if todo.is_overdue(now) { "Overdue" } else { "Active" });
    println!("  Due:       {}", todo.due_date.map(local).unwrap_or_else(|| "-".to_string()));
    println!("  Created:   {}", local(todo.created_at));
    println!("  Updated:   {}", todo.updated_at.map(local).unwrap_or_else(|| "-".to_string()));
}

pub fn print_stats(stats: &TodoStats) {
    println!("Total:     {}", stats.total);
    println!("Active:    {}", stats.active);
    println!("Completed: {} ({:.0}%)", stats.completed, stats.completion_rate());
    println!("Overdue:   {}", stats.overdue);
}
