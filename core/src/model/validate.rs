use chrono::{DateTime, Utc};

use crate::error::{Field, Rule, ValidationError};
use crate::model::todo::{CreateTodo, NewTodo};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

pub fn title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Title, Rule::Blank));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::new(
            Field::Title,
            Rule::TooLong { max: TITLE_MAX_CHARS },
        ));
    }
    Ok(trimmed.to_string())
}

/// Blank descriptions collapse to `None`.
pub fn description(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::new(
            Field::Description,
            Rule::TooLong { max: DESCRIPTION_MAX_CHARS },
        ));
    }
    Ok(Some(trimmed.to_string()))
}

pub fn new_todo(input: CreateTodo, created_at: DateTime<Utc>) -> Result<NewTodo, ValidationError> {
    Ok(NewTodo {
        title: title(&input.title)?,
        description: description(input.description.as_deref())?,
        priority: input.priority,
        created_at,
        due_date: input.due_date,
    })
}
