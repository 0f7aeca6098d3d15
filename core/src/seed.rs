//! Demo data for a fresh store.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::model::todo::{NewTodo, Priority};
use crate::repository::TodoStore;

struct Sample {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    due_in: Option<Duration>,
    created_ago: Duration,
    // When set, the todo is stored completed at `now - completed_ago`.
    completed_ago: Option<Duration>,
}

fn samples() -> Vec<Sample> {
    vec![
        Sample {
            title: "Buy groceries",
            description: "Milk, bread, eggs, vegetables for salad",
            priority: Priority::High,
            due_in: Some(Duration::hours(3)),
            created_ago: Duration::hours(2),
            completed_ago: None,
        },
        Sample {
            title: "Write report",
            description: "Prepare monthly project report",
            priority: Priority::Urgent,
            due_in: Some(Duration::days(1)),
            created_ago: Duration::days(1),
            completed_ago: None,
        },
        Sample {
            title: "Call doctor",
            description: "Schedule an appointment with the therapist",
            priority: Priority::Medium,
            due_in: Some(Duration::days(2)),
            created_ago: Duration::hours(5),
            completed_ago: None,
        },
        Sample {
            title: "Study Rust",
            description: "Finish the async chapter and build a pet project",
            priority: Priority::Low,
            due_in: Some(Duration::weeks(1)),
            created_ago: Duration::days(7),
            completed_ago: Some(Duration::days(1)),
        },
        Sample {
            title: "Clean apartment",
            description: "General cleaning: vacuum, mop floors, dust",
            priority: Priority::Medium,
            due_in: Some(Duration::days(3)),
            created_ago: Duration::hours(8),
            completed_ago: None,
        },
        Sample {
            title: "Overdue task",
            description: "This is an example of an overdue task for demonstration",
            priority: Priority::High,
            due_in: Some(Duration::days(-1)),
            created_ago: Duration::days(3),
            completed_ago: None,
        },
        Sample {
            title: "Prepare presentation",
            description: "Create a presentation for a client meeting",
            priority: Priority::Urgent,
            due_in: Some(Duration::hours(6)),
            created_ago: Duration::hours(12),
            completed_ago: None,
        },
        Sample {
            title: "Order gift",
            description: "Choose and order a birthday gift",
            priority: Priority::Low,
            due_in: None,
            created_ago: Duration::days(5),
            completed_ago: Some(Duration::days(2)),
        },
    ]
}

/// Inserts the sample todos when the store is empty. Returns how many
/// records were written.
pub fn seed_if_empty<R: TodoStore>(store: &R, now: DateTime<Utc>) -> Result<usize> {
    if store.count()? > 0 {
        return Ok(0);
    }

    let samples = samples();
    for sample in &samples {
        let id = store.insert(NewTodo {
            title: sample.title.to_string(),
            description: Some(sample.description.to_string()),
            priority: sample.priority,
            created_at: now - sample.created_ago,
            due_date: sample.due_in.map(|d| now + d),
        })?;

        if let Some(ago) = sample.completed_ago {
            if let Some(mut todo) = store.find_by_id(id)? {
                todo.completed = true;
                todo.updated_at = Some(now - ago);
                store.save(&todo)?;
            }
        }
    }

    info!(count = samples.len(), "seeded sample todos");
    Ok(samples.len())
}
