//! Kanban board model definitions
//!
//! The serialized form is `{ "todo": [...], "inProgress": [...], "completed": [...] }`
//! with tasks stored as `{ "id", "text" }`.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One of the three fixed board columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Todo,
    InProgress,
    Completed,
}

impl Default for Column {
    fn default() -> Self {
        Self::Todo
    }
}

impl Column {
    /// Columns in display order
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Completed];

    /// Storage key of the column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    /// Heading shown above the column
    pub fn title(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In-Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown column: {}", s)))
    }
}

/// A task on the board
///
/// Id and text never change once created; the column is implied by the
/// list holding the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
}

impl Task {
    /// Create a task with a fresh creation-time id
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_task_id(),
            text: text.into(),
        }
    }

    /// Create a task with a known id
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// `task-<unix millis>-<8 hex chars>`
pub fn generate_task_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "task-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        &uuid[..8]
    )
}

/// The complete board
///
/// A column missing from serialized input reads as empty. Only an object
/// deserializes into a board; sequences are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BoardVisitor)
    }
}

struct BoardVisitor;

impl<'de> Visitor<'de> for BoardVisitor {
    type Value = Board;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with todo, inProgress and completed task lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Board, A::Error> {
        let mut todo = None;
        let mut in_progress = None;
        let mut completed = None;

        while let Some(key) = map.next_key::<String>()? {
            let slot = match key.as_str() {
                "todo" => &mut todo,
                "inProgress" => &mut in_progress,
                "completed" => &mut completed,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if slot.is_some() {
                return Err(de::Error::custom(format!("duplicate column `{}`", key)));
            }
            *slot = Some(map.next_value::<Vec<Task>>()?);
        }

        Ok(Board {
            todo: todo.unwrap_or_default(),
            in_progress: in_progress.unwrap_or_default(),
            completed: completed.unwrap_or_default(),
        })
    }
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, column: Column) -> &[Task] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Completed => &self.completed,
        }
    }

    pub(crate) fn column_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Completed => &mut self.completed,
        }
    }

    /// Iterate columns in display order with their tasks
    pub fn columns(&self) -> impl Iterator<Item = (Column, &[Task])> {
        Column::ALL.into_iter().map(move |c| (c, self.column(c)))
    }

    /// Total number of tasks across all columns
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate a task by id
    pub fn find(&self, task_id: &str) -> Option<(Column, usize)> {
        self.columns().find_map(|(column, tasks)| {
            tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| (column, index))
        })
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.find(task_id)
            .map(|(column, index)| &self.column(column)[index])
    }

    /// Restore the board invariants on loaded data
    ///
    /// Trims text, drops tasks with blank text and drops any id already seen
    /// earlier in display order. Returns the number of tasks dropped.
    pub fn normalize(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut dropped = 0;

        for column in Column::ALL {
            let tasks = self.column_mut(column);
            let before = tasks.len();
            tasks.retain_mut(|task| {
                let trimmed = task.text.trim();
                if trimmed.is_empty() || !seen.insert(task.id.clone()) {
                    return false;
                }
                if trimmed.len() != task.text.len() {
                    task.text = trimmed.to_string();
                }
                true
            });
            dropped += before - tasks.len();
        }

        dropped
    }
}
