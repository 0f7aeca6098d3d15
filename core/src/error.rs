//! Domain errors surfaced by [`TodoService`](crate::TodoService).

use std::fmt;

use crate::model::todo::TodoId;

/// Field a validation rule was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Priority,
    DueDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Priority => "priority",
            Field::DueDate => "due_date",
        };
        f.write_str(name)
    }
}

/// The constraint that was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Empty or whitespace only.
    Blank,
    TooLong { max: usize },
    UnknownValue(String),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Blank => f.write_str("cannot be empty"),
            Rule::TooLong { max } => write!(f, "cannot be longer than {} characters", max),
            Rule::UnknownValue(value) => write!(f, "has unrecognised value '{}'", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {rule}")]
pub struct ValidationError {
    pub field: Field,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo not found with id: {0}")]
    NotFound(TodoId),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Collaborator failure, passed through untouched.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }

    /// The failing validation, if this is an `InvalidInput`.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            TodoError::InvalidInput(v) => Some(v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
